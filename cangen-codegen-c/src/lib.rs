//! C source generator for cangen.
//!
//! Renders a `<database>.h`/`<database>.c` pair with one struct per message
//! and functions to pack, unpack, initialise, convert and range-check
//! signals. The JNI bridge reuses [`MessageLayout`] so both agree on symbol
//! names.

mod generator;
mod layout;
mod types;

pub mod files;

pub use generator::CSourceGenerator;
pub use layout::{MessageLayout, SignalLayout, field_name};
pub use types::{CType, float_literal};
