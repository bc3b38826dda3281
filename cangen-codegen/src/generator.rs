//! Artifact generator trait.

use cangen_core::File;
use eyre::Result;

use crate::GenerationRequest;

/// One step of a generation run, owning a fixed set of output files.
///
/// Generators only render; the [`Orchestrator`](crate::Orchestrator) writes
/// the returned files. A generator never reads the output of another.
pub trait ArtifactGenerator: Send + Sync {
    /// The generator name (used in logs and run reports).
    fn name(&self) -> &'static str;

    /// Render the files for this request, with paths relative to the output
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be expressed by this
    /// generator. The run records the error and moves on.
    fn render(&self, request: &GenerationRequest) -> Result<Vec<File>>;
}
