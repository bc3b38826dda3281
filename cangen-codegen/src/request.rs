//! Inputs shared by every generator of one run.

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use cangen_core::DatabaseName;
use cangen_dbc::{Database, Message};
use eyre::{Result, bail};

use crate::Provenance;

/// Package used when none is configured.
pub const DEFAULT_PACKAGE: &str = "can.tools";

/// A dotted Java package name such as `can.tools`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaPackage(String);

impl JavaPackage {
    pub fn new(name: &str) -> Result<Self> {
        let valid_segment = |segment: &str| {
            let mut chars = segment.chars();
            chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        };
        if !name.split('.').all(valid_segment) {
            bail!("'{name}' is not a valid Java package name");
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments, e.g. `can/tools`.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

impl Default for JavaPackage {
    fn default() -> Self {
        Self(DEFAULT_PACKAGE.to_string())
    }
}

impl FromStr for JavaPackage {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for JavaPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Switches that change the shape of generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Target Android: the JNI bridge logs through `__android_log_print`.
    pub android: bool,
    /// Only generate code for messages this node sends or receives.
    pub node: Option<String>,
    /// Emit C bit-fields in message structs.
    pub bit_fields: bool,
    /// Use `float` instead of `double` for physical values.
    pub use_float: bool,
    /// Generate scaled physical value conversions.
    pub floating_point_numbers: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            android: false,
            node: None,
            bit_fields: false,
            use_float: false,
            floating_point_numbers: true,
        }
    }
}

/// Everything a generator needs, built once per run.
///
/// Generators only receive a shared reference, so every artifact of a run
/// sees the same name variants, package and message subset.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    database: Database,
    names: DatabaseName,
    package: JavaPackage,
    output_dir: PathBuf,
    options: GenerationOptions,
    provenance: Provenance,
}

impl GenerationRequest {
    pub fn new(database: Database, names: DatabaseName, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            database,
            names,
            package: JavaPackage::default(),
            output_dir: output_dir.into(),
            options: GenerationOptions::default(),
            provenance: Provenance::now(),
        }
    }

    pub fn with_package(mut self, package: JavaPackage) -> Self {
        self.package = package;
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn names(&self) -> &DatabaseName {
        &self.names
    }

    pub fn package(&self) -> &JavaPackage {
        &self.package
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Messages to generate code for, after applying the node filter.
    pub fn messages(&self) -> Vec<&Message> {
        self.database.messages_for_node(self.options.node.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use cangen_dbc::Signal;

    use super::*;

    #[test]
    fn test_java_package_validation() {
        assert_eq!(JavaPackage::new("com.example.can").unwrap().as_str(), "com.example.can");
        assert!(JavaPackage::new("com..example").is_err());
        assert!(JavaPackage::new("1com.example").is_err());
        assert!(JavaPackage::new("com.ex-ample").is_err());
        assert!(JavaPackage::new("").is_err());
    }

    #[test]
    fn test_default_package() {
        let package = JavaPackage::default();
        assert_eq!(package.to_string(), "can.tools");
        assert_eq!(package.segments().collect::<Vec<_>>(), ["can", "tools"]);
    }

    #[test]
    fn test_default_options_generate_floating_point() {
        let options = GenerationOptions::default();
        assert!(options.floating_point_numbers);
        assert!(!options.android);
        assert!(options.node.is_none());
    }

    #[test]
    fn test_messages_apply_node_filter() {
        let database = Database {
            messages: vec![
                Message::new(1, "FromEngine", 1).with_sender("Engine"),
                Message::new(2, "ToEngine", 1)
                    .with_sender("Dash")
                    .with_signal(Signal::new("Cmd", 0, 8).with_receiver("Engine")),
                Message::new(3, "Other", 1).with_sender("Dash"),
            ],
            ..Default::default()
        };
        let names = DatabaseName::explicit("demo").unwrap();

        let request = GenerationRequest::new(database.clone(), names.clone(), ".");
        assert_eq!(request.messages().len(), 3);

        let request = GenerationRequest::new(database, names, ".").with_options(GenerationOptions {
            node: Some("Engine".to_string()),
            ..GenerationOptions::default()
        });
        let filtered: Vec<_> = request.messages().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(filtered, ["FromEngine", "ToEngine"]);
    }
}
