//! Generate operation - runs generators against a loaded database.

use cangen_codegen::{ArtifactGenerator, FailurePolicy, GenerationRequest, Orchestrator};
use eyre::{Context, Result};

use crate::reports::{GenerateReport, GeneratorFailure};

/// Execute the generate operation.
///
/// Generator failures end up in the report; only a missing output directory
/// is an error.
pub fn generate(
    request: &GenerationRequest,
    generators: Vec<Box<dyn ArtifactGenerator>>,
    policy: FailurePolicy,
) -> Result<GenerateReport> {
    let orchestrator = Orchestrator::new(generators).policy(policy);
    let generator_count = orchestrator.generator_names().len();
    let run = orchestrator
        .run(request)
        .wrap_err("Failed to generate code")?;

    let failures = run
        .failures()
        .map(|outcome| GeneratorFailure {
            generator: outcome.generator.to_string(),
            message: outcome
                .result
                .as_ref()
                .err()
                .map(|err| {
                    err.chain()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(": ")
                })
                .unwrap_or_default(),
        })
        .collect();

    Ok(GenerateReport {
        database_name: request.names().to_string(),
        output_dir: request.output_dir().to_path_buf(),
        generators: generator_count,
        written: run.written_files().into_iter().cloned().collect(),
        failures,
        rolled_back: run.rolled_back().to_vec(),
    })
}
