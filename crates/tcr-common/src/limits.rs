//! Centralized limits and thresholds for the completion stage.
//!
//! Every recursive walk in the solver and the completer is bounded by one of
//! these constants. When a limit is hit the walk degrades (to the error type,
//! or to "not a subtype") rather than overflowing the stack.

/// Maximum nesting depth of a type tree visited by substitution.
///
/// Exceeding it yields the error type.
pub const MAX_SUBSTITUTION_DEPTH: u32 = 64;

/// Maximum depth of nested subtype checks (function shapes, class arguments,
/// supertype chains).
pub const MAX_SUBTYPE_DEPTH: u32 = 100;

/// Maximum number of classes visited while searching for a common supertype.
pub const MAX_SUPERTYPE_SEARCH: usize = 1_000;

/// Stack red zone for the recursive atom-tree traversal.
///
/// Lambdas nested inside calls nested inside lambdas can get deep in
/// generated code; `stacker` grows the stack when fewer than this many bytes
/// remain.
pub const ATOM_TRAVERSAL_RED_ZONE: usize = 64 * 1024;

/// Size of each stack segment allocated by `stacker` during traversal.
pub const ATOM_TRAVERSAL_STACK_SIZE: usize = 1024 * 1024;
