use super::AtomCompleter;
use crate::atom::CollectionLiteralAtom;
use crate::context::{ContextDependency, ExpectedType};
use tracing::trace;

impl AtomCompleter<'_> {
    /// Retype a collection literal now that its expected type is solved.
    pub(crate) fn complete_collection_literal(&mut self, atom: &CollectionLiteralAtom) {
        let expected_type = match atom.expected_type {
            Some(ty) => ExpectedType::Type(self.substitute(ty)),
            None => ExpectedType::NoExpectedType,
        };
        let context = atom
            .outer_context
            .replace_expected_type(expected_type)
            .replace_context_dependency(ContextDependency::Independent);

        let store = self.ctx.store;
        let info = self
            .ctx
            .collaborators
            .typing
            .get_type_info(atom.expression, &context, store);
        trace!(node = %atom.expression, ty = ?info.ty, "collection literal");
        if let Some(expected) = expected_type.concrete() {
            store.record_expected_type(atom.expression, expected);
        }
        store.record_expression_type_info(atom.expression, info);
    }
}
