use std::path::{Path, PathBuf};

use cangen_codegen::{CommentStyle, Provenance, builder::CodeBuilder};
use cangen_core::{DatabaseName, GeneratedFile};

/// Minimum CMake version supported by the Android Gradle plugin toolchain.
pub const DEFAULT_MINIMUM_VERSION: &str = "3.18.1";

/// Kind of library produced by a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryKind {
    Shared,
    Static,
}

impl LibraryKind {
    fn as_str(self) -> &'static str {
        match self {
            LibraryKind::Shared => "SHARED",
            LibraryKind::Static => "STATIC",
        }
    }
}

/// A prebuilt library located with `find_library` and linked by variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundLibrary {
    pub variable: String,
    pub name: String,
}

impl FoundLibrary {
    pub fn new(variable: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            name: name.into(),
        }
    }
}

/// An `add_library` target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryTarget {
    pub name: String,
    pub kind: LibraryKind,
    pub sources: Vec<String>,
    pub links: Vec<FoundLibrary>,
}

impl LibraryTarget {
    pub fn new(name: impl Into<String>, kind: LibraryKind) -> Self {
        Self {
            name: name.into(),
            kind,
            sources: Vec::new(),
            links: Vec::new(),
        }
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.sources.push(source.into());
        self
    }

    pub fn link(mut self, library: FoundLibrary) -> Self {
        self.links.push(library);
        self
    }
}

/// The `CMakeLists.txt` build descriptor for the native library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CMakeLists {
    pub minimum_version: String,
    pub project: String,
    pub targets: Vec<LibraryTarget>,
    pub provenance: Provenance,
}

impl CMakeLists {
    pub fn new(project: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            minimum_version: DEFAULT_MINIMUM_VERSION.to_string(),
            project: project.into(),
            targets: Vec::new(),
            provenance,
        }
    }

    /// The shared JNI library built from the bridge and the C source,
    /// linked against the Android log library.
    pub fn for_database(names: &DatabaseName, provenance: Provenance) -> Self {
        let target = LibraryTarget::new(names.snake(), LibraryKind::Shared)
            .source(names.jni_source_file())
            .source(names.c_source_file())
            .link(FoundLibrary::new("log-lib", "log"));

        Self::new(names.snake(), provenance).target(target)
    }

    pub fn minimum_version(mut self, version: impl Into<String>) -> Self {
        self.minimum_version = version.into();
        self
    }

    pub fn target(mut self, target: LibraryTarget) -> Self {
        self.targets.push(target);
        self
    }

    fn render_target(b: CodeBuilder, target: &LibraryTarget) -> CodeBuilder {
        let mut add_library = format!("add_library({} {}", target.name, target.kind.as_str());
        for source in &target.sources {
            add_library.push(' ');
            add_library.push_str(source);
        }
        add_library.push(')');

        let variables: Vec<String> = target
            .links
            .iter()
            .map(|l| format!("${{{}}}", l.variable))
            .collect();

        b.blank()
            .line(&add_library)
            .each(&target.links, |b, library| {
                b.blank().line(&format!(
                    "find_library({} {})",
                    library.variable, library.name
                ))
            })
            .when(!variables.is_empty(), |b| {
                b.blank().line(&format!(
                    "target_link_libraries({} {})",
                    target.name,
                    variables.join(" ")
                ))
            })
    }
}

impl GeneratedFile for CMakeLists {
    fn path(&self, base: &Path) -> PathBuf {
        base.join("CMakeLists.txt")
    }

    fn render(&self) -> String {
        let b = CodeBuilder::default()
            .raw(&self.provenance.header(CommentStyle::Hash))
            .blank()
            .comment(
                "#",
                "For more information about using CMake with Android Studio, read the",
            )
            .comment(
                "#",
                "documentation: https://d.android.com/studio/projects/add-native-code.html",
            )
            .blank()
            .comment(
                "#",
                "Sets the minimum version of CMake required to build the native library.",
            )
            .line(&format!(
                "cmake_minimum_required(VERSION {})",
                self.minimum_version
            ))
            .blank()
            .line(&format!("project(\"{}\")", self.project));

        self.targets
            .iter()
            .fold(b, Self::render_target)
            .build()
    }
}
