//! Shared code generation utilities for the cangen code generator.
//!
//! Language-specific crates (`cangen-codegen-c`, `cangen-codegen-java`)
//! implement [`ArtifactGenerator`]; the [`Orchestrator`] runs them in order
//! against a single [`GenerationRequest`].
//!
//! # Module Organization
//!
//! - [`builder`] - Code generation building blocks (CodeBuilder, Indent)
//! - [`GenerationRequest`] - Inputs shared by every generator of one run
//! - [`Orchestrator`] - Runs generators, writes files, aggregates outcomes
//! - [`Provenance`] - Licence and version header for generated files

pub mod builder;
mod generator;
mod orchestrator;
mod provenance;
mod request;

pub use generator::ArtifactGenerator;
pub use orchestrator::{FailurePolicy, GeneratorOutcome, Orchestrator, RunReport};
pub use provenance::{CommentStyle, Provenance};
pub use request::{DEFAULT_PACKAGE, GenerationOptions, GenerationRequest, JavaPackage};
