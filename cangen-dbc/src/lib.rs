//! DBC database loading for the cangen code generator.
//!
//! Parses the subset of the DBC format needed for code generation into an
//! in-memory [`Database`], optionally validating it for consistency.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
mod load;
mod model;
mod parse;
mod prune;
mod validate;

pub use error::{Error, Result};
pub use load::{Encoding, LoadOptions, load_file};
pub use model::{ByteOrder, Database, MAX_MESSAGE_LENGTH, Message, Multiplex, Node, Signal};
