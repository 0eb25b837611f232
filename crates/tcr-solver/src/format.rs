//! Rendering types for diagnostics.

use crate::TypeDatabase;
use crate::types::{FunctionShape, TypeData, TypeId};

pub struct TypeFormatter<'a> {
    db: &'a dyn TypeDatabase,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        Self { db }
    }

    pub fn format(&self, ty: TypeId) -> String {
        let mut out = String::new();
        self.write(&mut out, ty);
        out
    }

    fn write(&self, out: &mut String, ty: TypeId) {
        let Some(data) = self.db.lookup(ty) else {
            out.push_str("<unknown>");
            return;
        };
        match data {
            TypeData::Intrinsic(kind) => out.push_str(kind.name()),
            TypeData::Class { class, args } => {
                self.write_class_name(out, class);
                if !args.is_empty() {
                    out.push('<');
                    self.write_list(out, &args);
                    out.push('>');
                }
            }
            TypeData::Function(shape) => self.write_function(out, &shape),
            TypeData::TypeParameter(param) => match self.db.type_param_info(param) {
                Some(info) => out.push_str(&self.db.names().resolve(info.name)),
                None => out.push_str(&format!("T#{}", param.0)),
            },
            TypeData::Variable(var) => out.push_str(&format!("?T{}", var.0)),
            TypeData::Stub(var) => out.push_str(&format!("Stub(?T{})", var.0)),
            TypeData::Captured { lower, upper } => {
                out.push_str("Captured(");
                self.write(out, lower);
                out.push_str("..");
                self.write(out, upper);
                out.push(')');
            }
            TypeData::Local { class, .. } => {
                out.push_str("<local>.");
                self.write_class_name(out, class);
            }
            TypeData::Nullable(inner) => {
                let parenthesize = matches!(self.db.lookup(inner), Some(TypeData::Function(_)));
                if parenthesize {
                    out.push('(');
                }
                self.write(out, inner);
                if parenthesize {
                    out.push(')');
                }
                out.push('?');
            }
        }
    }

    fn write_class_name(&self, out: &mut String, class: crate::types::ClassId) {
        match self.db.class_info(class) {
            Some(info) => out.push_str(&self.db.names().resolve(info.name)),
            None => out.push_str(&format!("C#{}", class.0)),
        }
    }

    fn write_function(&self, out: &mut String, shape: &FunctionShape) {
        if shape.is_suspend {
            out.push_str("suspend ");
        }
        if let Some(receiver) = shape.receiver {
            self.write(out, receiver);
            out.push('.');
        }
        out.push('(');
        self.write_list(out, &shape.params);
        out.push_str(") -> ");
        self.write(out, shape.return_type);
    }

    fn write_list(&self, out: &mut String, list: &[TypeId]) {
        for (i, &ty) in list.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write(out, ty);
        }
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
