//! Runs an ordered list of generators against one request.

use std::{fs, path::PathBuf};

use eyre::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::{ArtifactGenerator, GenerationRequest};

/// What to do once a generator fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Record the failure and run the remaining generators.
    #[default]
    Continue,
    /// Stop at the first failure and delete every file written by this run.
    AllOrNothing,
}

/// Result of running one generator.
#[derive(Debug)]
pub struct GeneratorOutcome {
    pub generator: &'static str,
    /// Paths written by the generator, or the reason it failed.
    pub result: Result<Vec<PathBuf>, eyre::Report>,
    /// Files already written when a later write failed.
    pub partial: Vec<PathBuf>,
}

impl GeneratorOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Files this generator left on disk, whether or not it failed.
    pub fn files(&self) -> &[PathBuf] {
        match &self.result {
            Ok(written) => written,
            Err(_) => &self.partial,
        }
    }
}

/// Aggregated outcome of a run.
#[derive(Debug, Default)]
pub struct RunReport {
    outcomes: Vec<GeneratorOutcome>,
    rolled_back: Vec<PathBuf>,
}

impl RunReport {
    /// Per-generator outcomes, in execution order.
    pub fn outcomes(&self) -> &[GeneratorOutcome] {
        &self.outcomes
    }

    /// True when every generator succeeded.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(GeneratorOutcome::is_success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &GeneratorOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Files left on disk by this run.
    pub fn written_files(&self) -> Vec<&PathBuf> {
        self.outcomes
            .iter()
            .flat_map(GeneratorOutcome::files)
            .filter(|path| !self.rolled_back.contains(path))
            .collect()
    }

    /// Files deleted again after an all-or-nothing failure.
    pub fn rolled_back(&self) -> &[PathBuf] {
        &self.rolled_back
    }
}

/// Runs generators in a fixed order and collects their outcomes.
///
/// # Example
///
/// ```ignore
/// let report = Orchestrator::new(java_generators())
///     .policy(FailurePolicy::AllOrNothing)
///     .run(&request)?;
///
/// if !report.is_success() {
///     for failure in report.failures() {
///         eprintln!("{} failed", failure.generator);
///     }
/// }
/// ```
pub struct Orchestrator {
    generators: Vec<Box<dyn ArtifactGenerator>>,
    policy: FailurePolicy,
}

impl Orchestrator {
    pub fn new(generators: Vec<Box<dyn ArtifactGenerator>>) -> Self {
        Self {
            generators,
            policy: FailurePolicy::default(),
        }
    }

    pub fn policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Names of the generators, in execution order.
    pub fn generator_names(&self) -> Vec<&'static str> {
        self.generators.iter().map(|g| g.name()).collect()
    }

    /// Run every generator against `request`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the output directory cannot be created.
    /// Generator failures are recorded in the [`RunReport`].
    pub fn run(&self, request: &GenerationRequest) -> Result<RunReport> {
        let output_dir = request.output_dir();
        fs::create_dir_all(output_dir).wrap_err_with(|| {
            format!("failed to create output directory {}", output_dir.display())
        })?;

        let mut report = RunReport::default();
        for generator in &self.generators {
            let name = generator.name();
            debug!(generator = name, "running generator");

            let mut written = Vec::new();
            let outcome = match Self::run_generator(generator.as_ref(), request, &mut written) {
                Ok(()) => GeneratorOutcome {
                    generator: name,
                    result: Ok(written),
                    partial: Vec::new(),
                },
                Err(err) => {
                    error!(generator = name, error = ?err, "generator failed");
                    GeneratorOutcome {
                        generator: name,
                        result: Err(err),
                        partial: written,
                    }
                }
            };
            let failed = !outcome.is_success();
            report.outcomes.push(outcome);

            if failed && self.policy == FailurePolicy::AllOrNothing {
                report.rolled_back = Self::roll_back(&report);
                break;
            }
        }

        info!(
            database = request.names().as_str(),
            files = report.written_files().len(),
            failures = report.failures().count(),
            "generation finished"
        );
        Ok(report)
    }

    /// Render and write, pushing each written path to `written` as it lands.
    fn run_generator(
        generator: &dyn ArtifactGenerator,
        request: &GenerationRequest,
        written: &mut Vec<PathBuf>,
    ) -> Result<()> {
        let files = generator
            .render(request)
            .wrap_err_with(|| format!("{} failed to render", generator.name()))?;

        for file in files {
            let path = file
                .write(request.output_dir())
                .wrap_err_with(|| format!("{} failed to write", generator.name()))?;
            debug!(generator = generator.name(), path = %path.display(), "wrote file");
            written.push(path);
        }
        Ok(())
    }

    fn roll_back(report: &RunReport) -> Vec<PathBuf> {
        let mut removed = Vec::new();
        for path in report.outcomes.iter().flat_map(GeneratorOutcome::files) {
            match fs::remove_file(path) {
                Ok(()) => {
                    warn!(path = %path.display(), "removed file after failed run");
                    removed.push(path.clone());
                }
                Err(err) => warn!(path = %path.display(), error = %err, "failed to remove file"),
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use cangen_core::{DatabaseName, File};
    use cangen_dbc::Database;
    use eyre::bail;
    use tempfile::TempDir;

    use super::*;

    struct Fixed {
        name: &'static str,
        file: &'static str,
    }

    impl ArtifactGenerator for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }

        fn render(&self, _request: &GenerationRequest) -> Result<Vec<File>> {
            Ok(vec![File::new(self.file, self.name)])
        }
    }

    struct Failing;

    impl ArtifactGenerator for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn render(&self, _request: &GenerationRequest) -> Result<Vec<File>> {
            bail!("boom")
        }
    }

    /// Writes its first file, then fails on a path nested under that file.
    struct HalfWritten;

    impl ArtifactGenerator for HalfWritten {
        fn name(&self) -> &'static str {
            "half"
        }

        fn render(&self, _request: &GenerationRequest) -> Result<Vec<File>> {
            Ok(vec![
                File::new("first.h", "first"),
                File::new("first.h/second.c", "second"),
            ])
        }
    }

    /// Records the name variants each generator was handed.
    struct Recording {
        name: &'static str,
        seen: Arc<Mutex<Vec<(&'static str, String, String)>>>,
    }

    impl ArtifactGenerator for Recording {
        fn name(&self) -> &'static str {
            self.name
        }

        fn render(&self, request: &GenerationRequest) -> Result<Vec<File>> {
            let names = request.names();
            self.seen.lock().unwrap().push((
                self.name,
                names.snake().to_string(),
                names.pascal().to_string(),
            ));
            Ok(Vec::new())
        }
    }

    fn request(dir: &TempDir) -> GenerationRequest {
        GenerationRequest::new(
            Database::default(),
            DatabaseName::explicit("demo").unwrap(),
            dir.path().join("out"),
        )
    }

    #[test]
    fn test_every_generator_sees_same_names() {
        let temp = TempDir::new().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let generators: Vec<Box<dyn ArtifactGenerator>> = ["a", "b", "c"]
            .into_iter()
            .map(|name| {
                Box::new(Recording {
                    name,
                    seen: seen.clone(),
                }) as Box<dyn ArtifactGenerator>
            })
            .collect();

        let report = Orchestrator::new(generators).run(&request(&temp)).unwrap();

        assert!(report.is_success());
        let seen = seen.lock().unwrap();
        let order: Vec<_> = seen.iter().map(|(g, _, _)| *g).collect();
        assert_eq!(order, ["a", "b", "c"]);
        assert!(seen.iter().all(|(_, snake, pascal)| snake == "demo" && pascal == "Demo"));
    }

    #[test]
    fn test_creates_output_directory() {
        let temp = TempDir::new().unwrap();
        let request = request(&temp);

        let report = Orchestrator::new(vec![Box::new(Fixed {
            name: "one",
            file: "one.txt",
        })])
        .run(&request)
        .unwrap();

        assert!(report.is_success());
        assert_eq!(
            fs::read_to_string(request.output_dir().join("one.txt")).unwrap(),
            "one"
        );
        assert_eq!(report.written_files().len(), 1);
    }

    #[test]
    fn test_continue_policy_runs_remaining_generators() {
        let temp = TempDir::new().unwrap();
        let request = request(&temp);
        let generators: Vec<Box<dyn ArtifactGenerator>> = vec![
            Box::new(Fixed {
                name: "first",
                file: "first.txt",
            }),
            Box::new(Failing),
            Box::new(Fixed {
                name: "last",
                file: "last.txt",
            }),
        ];

        let report = Orchestrator::new(generators).run(&request).unwrap();

        assert!(!report.is_success());
        assert_eq!(report.outcomes().len(), 3);
        let failed: Vec<_> = report.failures().map(|o| o.generator).collect();
        assert_eq!(failed, ["failing"]);
        assert!(request.output_dir().join("first.txt").exists());
        assert!(request.output_dir().join("last.txt").exists());
        assert!(report.rolled_back().is_empty());
    }

    #[test]
    fn test_all_or_nothing_rolls_back() {
        let temp = TempDir::new().unwrap();
        let request = request(&temp);
        let generators: Vec<Box<dyn ArtifactGenerator>> = vec![
            Box::new(Fixed {
                name: "first",
                file: "first.txt",
            }),
            Box::new(Failing),
            Box::new(Fixed {
                name: "last",
                file: "last.txt",
            }),
        ];

        let report = Orchestrator::new(generators)
            .policy(FailurePolicy::AllOrNothing)
            .run(&request)
            .unwrap();

        assert!(!report.is_success());
        assert_eq!(report.outcomes().len(), 2);
        assert_eq!(report.rolled_back(), [request.output_dir().join("first.txt")]);
        assert!(report.written_files().is_empty());
        assert!(!request.output_dir().join("first.txt").exists());
        assert!(!request.output_dir().join("last.txt").exists());
    }

    #[test]
    fn test_failed_write_keeps_earlier_files_in_report() {
        let temp = TempDir::new().unwrap();
        let request = request(&temp);

        let report = Orchestrator::new(vec![Box::new(HalfWritten)])
            .run(&request)
            .unwrap();

        let first = request.output_dir().join("first.h");
        assert!(!report.is_success());
        assert_eq!(report.failures().next().unwrap().partial, [first.clone()]);
        assert_eq!(report.written_files(), [&first]);
        assert!(first.exists());
    }

    #[test]
    fn test_all_or_nothing_removes_files_of_failed_generator() {
        let temp = TempDir::new().unwrap();
        let request = request(&temp);
        let generators: Vec<Box<dyn ArtifactGenerator>> = vec![
            Box::new(Fixed {
                name: "before",
                file: "before.txt",
            }),
            Box::new(HalfWritten),
        ];

        let report = Orchestrator::new(generators)
            .policy(FailurePolicy::AllOrNothing)
            .run(&request)
            .unwrap();

        let out = request.output_dir();
        assert_eq!(
            report.rolled_back(),
            [out.join("before.txt"), out.join("first.h")]
        );
        assert!(report.written_files().is_empty());
        assert_eq!(fs::read_dir(out).unwrap().count(), 0);
    }

    #[test]
    fn test_failure_message_names_generator() {
        let temp = TempDir::new().unwrap();
        let report = Orchestrator::new(vec![Box::new(Failing)])
            .run(&request(&temp))
            .unwrap();

        let failure = report.failures().next().unwrap();
        let err = failure.result.as_ref().unwrap_err();
        assert_eq!(err.to_string(), "failing failed to render");
        assert_eq!(err.root_cause().to_string(), "boom");
    }

    #[test]
    fn test_output_directory_error() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let request = GenerationRequest::new(
            Database::default(),
            DatabaseName::explicit("demo").unwrap(),
            blocker.join("out"),
        );

        let err = Orchestrator::new(Vec::new()).run(&request).unwrap_err();
        assert!(err.to_string().contains("failed to create output directory"));
    }
}
