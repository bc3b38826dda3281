use std::path::{Path, PathBuf};

use eyre::{Context, Result};

/// Trait for types that represent a generated file
pub trait GeneratedFile {
    /// Get the file path relative to the base directory
    fn path(&self, base: &Path) -> PathBuf;

    /// Render the file content
    fn render(&self) -> String;

    /// Write the file to disk, replacing any existing file
    fn write(&self, base: &Path) -> Result<PathBuf> {
        let path = self.path(base);
        write_file(&path, &self.render())?;
        Ok(path)
    }

    /// Render into a detached [`File`] with a path relative to the output directory
    fn to_file(&self) -> File {
        File::new(self.path(Path::new("")), self.render())
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).wrap_err_with(|| format!("failed to write {}", path.display()))
}

/// A rendered file waiting to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    path: PathBuf,
    content: String,
}

impl File {
    /// Create a new file with the given path (relative to the output directory) and content
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Get the relative file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the file content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Write the file below `base`, overwriting without confirmation.
    ///
    /// The output directory is expected to exist; no subdirectories are created.
    pub fn write(&self, base: &Path) -> Result<PathBuf> {
        let path = base.join(&self.path);
        write_file(&path, &self.content)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    struct Readme;

    impl GeneratedFile for Readme {
        fn path(&self, base: &Path) -> PathBuf {
            base.join("README")
        }

        fn render(&self) -> String {
            "hello\n".to_string()
        }
    }

    #[test]
    fn test_write_file_creates_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.txt");

        write_file(&path, "hello").unwrap();

        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn test_write_file_missing_parent_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join("test.txt");

        let err = write_file(&path, "nested").unwrap_err();
        assert!(err.to_string().contains("failed to write"));
    }

    #[test]
    fn test_file_write_overwrites_existing() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("test.txt"), "original").unwrap();

        let file = File::new("test.txt", "updated");
        let path = file.write(temp.path()).unwrap();

        assert_eq!(path, temp.path().join("test.txt"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "updated");
    }

    #[test]
    fn test_generated_file_write() {
        let temp = TempDir::new().unwrap();

        let path = Readme.write(temp.path()).unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "hello\n");
    }

    #[test]
    fn test_generated_file_to_file_is_relative() {
        let file = Readme.to_file();
        assert_eq!(file.path(), Path::new("README"));
        assert_eq!(file.content(), "hello\n");
    }
}
