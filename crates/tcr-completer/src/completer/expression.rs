//! Re-recording expression types against a final expected type.

use super::AtomCompleter;
use crate::binding::ExpressionTypeInfo;
use crate::context::ExpressionContext;
use tcr_common::diagnostics::diagnostic_codes;
use tcr_common::{Diagnostic, NodeId};
use tcr_solver::{TypeId, is_subtype_of};
use tracing::debug;

impl AtomCompleter<'_> {
    /// Record the final type of `expression` under `context`.
    ///
    /// The already recorded type is kept; the typing service is asked only
    /// when nothing was recorded. A concrete expected type other than `Unit`
    /// must be satisfied, otherwise `TYPE_MISMATCH` is reported.
    pub(crate) fn update_recorded_type(
        &self,
        expression: NodeId,
        context: &ExpressionContext,
    ) -> Option<TypeId> {
        let store = self.ctx.store;
        let recorded = store.get_type(expression).or_else(|| {
            self.ctx
                .collaborators
                .typing
                .get_type_info(expression, context, store)
                .ty
        });

        if let Some(expected) = context.expected_type.concrete() {
            store.record_expected_type(expression, expected);
            if let Some(ty) = recorded
                && expected != TypeId::UNIT
                && !is_subtype_of(self.ctx.db, ty, expected)
            {
                debug!(node = %expression, ty = ty.0, expected = expected.0, "type mismatch");
                if self.ctx.options.report_type_mismatch {
                    let actual = self.format_type(ty);
                    let expected = self.format_type(expected);
                    self.ctx.collaborators.sink.report(Diagnostic::from_code(
                        expression,
                        diagnostic_codes::TYPE_MISMATCH,
                        &[actual.as_str(), expected.as_str()],
                    ));
                }
            }
        }

        store.record_expression_type_info(
            expression,
            ExpressionTypeInfo::new(recorded, context.data_flow.clone()),
        );
        recorded
    }
}
