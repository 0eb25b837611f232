use super::AtomCompleter;
use crate::atom::SubCallArgumentAtom;
use crate::context::ExpectedType;

impl AtomCompleter<'_> {
    /// A nested call used as an argument keeps its own type; the expected
    /// type captured during constraint collection is stale by now.
    pub(crate) fn complete_sub_call_argument(&mut self, atom: &SubCallArgumentAtom) {
        let Some(expression) = atom.expression else {
            return;
        };
        let context = self
            .ctx
            .call_context
            .replace_expected_type(ExpectedType::NoExpectedType);
        self.update_recorded_type(expression, &context);
    }
}
