//! Generate command report data structures.

use std::path::{Path, PathBuf};

use super::output::{Output, Report};

/// Report data from a generation run.
#[derive(Debug)]
pub struct GenerateReport {
    /// Canonical database name.
    pub database_name: String,

    /// Output directory.
    pub output_dir: PathBuf,

    /// Number of generators in the run.
    pub generators: usize,

    /// Files left on disk.
    pub written: Vec<PathBuf>,

    /// Generators that failed, in execution order.
    pub failures: Vec<GeneratorFailure>,

    /// Files removed again after an all-or-nothing failure.
    pub rolled_back: Vec<PathBuf>,
}

/// A failed generator and its error chain.
#[derive(Debug)]
pub struct GeneratorFailure {
    pub generator: String,
    pub message: String,
}

impl GenerateReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        for failure in &self.failures {
            out.error(&format!("{}: {}", failure.generator, failure.message));
        }

        if self.is_success() {
            out.preformatted("Successfully generated");
            out.key_value("Database", &self.database_name);
        } else {
            out.key_value(
                "Generation failed",
                &format!("{} of {} generators", self.failures.len(), self.generators),
            );
        }

        if !self.written.is_empty() {
            out.newline();
            out.section(&format!("Files ({})", self.output_dir.display()));
            for path in &self.written {
                out.added_item(&file_name(path));
            }
        }

        if !self.rolled_back.is_empty() {
            out.newline();
            out.section("Removed");
            for path in &self.rolled_back {
                out.removed_item(&file_name(path));
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::BufferOutput;

    fn report(failures: Vec<GeneratorFailure>) -> GenerateReport {
        GenerateReport {
            database_name: "demo".to_string(),
            output_dir: PathBuf::from("out"),
            generators: 2,
            written: vec![PathBuf::from("out/demo.h"), PathBuf::from("out/demo.c")],
            failures,
            rolled_back: Vec::new(),
        }
    }

    #[test]
    fn test_success_report() {
        let mut out = BufferOutput::default();
        report(Vec::new()).render(&mut out);

        assert_eq!(
            out.lines,
            [
                "Successfully generated",
                "Database: demo",
                "",
                "Files (out):",
                "  + demo.h",
                "  + demo.c"
            ]
        );
    }

    #[test]
    fn test_failure_report() {
        let mut out = BufferOutput::default();
        let failures = vec![GeneratorFailure {
            generator: "jni-source".to_string(),
            message: "boom".to_string(),
        }];
        report(failures).render(&mut out);

        assert_eq!(out.lines[0], "error: jni-source: boom");
        assert_eq!(out.lines[1], "Generation failed: 1 of 2 generators");
        assert!(!out.lines.iter().any(|l| l == "Successfully generated"));
    }
}
