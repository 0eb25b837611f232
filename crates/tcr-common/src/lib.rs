//! Common types and utilities shared by the tcr crates.
//!
//! This crate provides foundational types used across all tcr crates:
//! - String interning (`Atom`, `Interner`)
//! - Surface-syntax identities (`NodeId`)
//! - Diagnostics (`Diagnostic`, codes and message templates)
//! - Centralized limits and thresholds

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Surface-syntax identity used as the key of every binding slice
pub mod node;
pub use node::NodeId;

pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};

// Centralized limits and thresholds
pub mod limits;
