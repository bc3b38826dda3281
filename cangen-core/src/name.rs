//! The database name shared by every artifact of one generation run.

use std::{fmt, path::Path};

use thiserror::Error;

use crate::naming::{to_camel_case, to_pascal_case, to_snake_case};

/// Errors raised while resolving a [`DatabaseName`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("database name derived from '{source_text}' is empty")]
    Empty { source_text: String },

    #[error("database name '{name}' may only contain letters, digits and underscores")]
    InvalidCharacters { name: String },
}

/// Canonical database name and its naming variants.
///
/// Built once per run and handed to every generator, so the C file names, the
/// Java class names, the JNI symbols and the CMake target all derive from the
/// same value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseName {
    snake: String,
    camel: String,
    pascal: String,
}

impl DatabaseName {
    /// Use an explicitly supplied name verbatim.
    pub fn explicit(name: &str) -> Result<Self, NameError> {
        if name.is_empty() {
            return Err(NameError::Empty {
                source_text: name.to_string(),
            });
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(NameError::InvalidCharacters {
                name: name.to_string(),
            });
        }
        Ok(Self::from_snake(name.to_string()))
    }

    /// Derive the name from the stem of an input file path.
    pub fn from_path(path: &Path) -> Result<Self, NameError> {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let snake = to_snake_case(&stem);

        if snake.chars().all(|c| c == '_') {
            return Err(NameError::Empty {
                source_text: path.display().to_string(),
            });
        }
        Ok(Self::from_snake(snake))
    }

    /// Resolve from an optional explicit name, falling back to the input path.
    pub fn resolve(explicit: Option<&str>, path: &Path) -> Result<Self, NameError> {
        match explicit {
            Some(name) => Self::explicit(name),
            None => Self::from_path(path),
        }
    }

    fn from_snake(snake: String) -> Self {
        Self {
            camel: to_camel_case(&snake),
            pascal: to_pascal_case(&snake),
            snake,
        }
    }

    /// The canonical name (snake_case, or verbatim when given explicitly).
    pub fn as_str(&self) -> &str {
        &self.snake
    }

    pub fn snake(&self) -> &str {
        &self.snake
    }

    pub fn camel(&self) -> &str {
        &self.camel
    }

    pub fn pascal(&self) -> &str {
        &self.pascal
    }

    /// `<name>.h`
    pub fn c_header_file(&self) -> String {
        format!("{}.h", self.snake)
    }

    /// `<name>.c`
    pub fn c_source_file(&self) -> String {
        format!("{}.c", self.snake)
    }

    /// Java data-model class name.
    pub fn model_class(&self) -> String {
        format!("{}Model", self.pascal)
    }

    /// Java native-bridge class name.
    pub fn native_class(&self) -> String {
        format!("{}Native", self.pascal)
    }

    /// C++ JNI bridge source file name.
    pub fn jni_source_file(&self) -> String {
        format!("{}.cpp", self.pascal)
    }
}

impl fmt::Display for DatabaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.snake)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_from_path_uses_stem() {
        let name = DatabaseName::from_path(Path::new("/data/My Motor-Controller.dbc")).unwrap();
        assert_eq!(name.as_str(), "my_motor_controller");
        assert_eq!(name.pascal(), "MyMotorController");
        assert_eq!(name.camel(), "myMotorController");
        assert_eq!(name.jni_source_file(), "MyMotorController.cpp");
    }

    #[test]
    fn test_explicit_is_verbatim() {
        let name = DatabaseName::explicit("demo").unwrap();
        assert_eq!(name.as_str(), "demo");
        assert_eq!(name.c_header_file(), "demo.h");
        assert_eq!(name.c_source_file(), "demo.c");
        assert_eq!(name.model_class(), "DemoModel");
        assert_eq!(name.native_class(), "DemoNative");
    }

    #[test]
    fn test_explicit_rejects_invalid() {
        assert!(matches!(
            DatabaseName::explicit(""),
            Err(NameError::Empty { .. })
        ));
        assert!(matches!(
            DatabaseName::explicit("my-db"),
            Err(NameError::InvalidCharacters { .. })
        ));
    }

    #[test]
    fn test_from_path_rejects_punctuation_only() {
        let err = DatabaseName::from_path(Path::new("--- .dbc")).unwrap_err();
        assert!(matches!(err, NameError::Empty { .. }));
    }

    #[test]
    fn test_resolve_prefers_explicit() {
        let path = PathBuf::from("Powertrain.dbc");
        let name = DatabaseName::resolve(Some("pt"), &path).unwrap();
        assert_eq!(name.as_str(), "pt");

        let name = DatabaseName::resolve(None, &path).unwrap();
        assert_eq!(name.as_str(), "powertrain");
    }

    #[test]
    fn test_variants_agree_with_naming() {
        let name = DatabaseName::from_path(Path::new("EngineRPM.dbc")).unwrap();
        assert_eq!(name.pascal(), to_pascal_case(&to_snake_case("EngineRPM")));
        assert_eq!(name.to_string(), name.as_str());
    }
}
