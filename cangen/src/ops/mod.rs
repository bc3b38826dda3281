//! Command logic, independent of argument parsing and printing.

pub mod generate;

pub use generate::generate;
