//! What commands print.
//!
//! Operations return report values; rendering them to the terminal happens
//! separately through the [`Output`](output::Output) trait.

mod generate;
mod output;

pub use generate::{GenerateReport, GeneratorFailure};
pub use output::{Report, TerminalOutput};
