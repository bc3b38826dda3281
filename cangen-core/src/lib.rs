//! Core utilities and types for the cangen code generator.
//!
//! This crate provides the name canonicalizer shared by every generator and
//! the primitives used to write generated files.

mod file;
mod name;
mod naming;

// File operations
pub use file::{File, GeneratedFile};
// Database naming
pub use name::{DatabaseName, NameError};
// String utilities
pub use naming::{sanitize, to_camel_case, to_pascal_case, to_snake_case};
