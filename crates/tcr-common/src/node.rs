//! Surface-syntax node identities.
//!
//! The parser and AST live outside this stage. Everything the completion
//! pass writes is keyed by the identity of the syntax node it originates
//! from, so a `NodeId` is all we need to know about the tree.

use serde::Serialize;
use std::fmt;

/// Identity of a surface-syntax node (expression, call element, reference).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel for "no node".
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            f.write_str("#none")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}
