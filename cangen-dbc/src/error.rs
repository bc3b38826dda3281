use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for database loading (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for error reporting.
///
/// Encapsulates the decoded database text and its filename so parse and
/// consistency errors can point at the offending statement.
#[derive(Debug, Clone)]
pub(crate) struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Create a parse error pointing at `span`.
    pub fn parse_error(&self, message: impl Into<String>, span: impl Into<SourceSpan>) -> Box<Error> {
        Box::new(Error::Parse {
            src: self.named_source(),
            span: span.into(),
            message: message.into(),
        })
    }

    /// Create a consistency error, optionally pointing at the offending definition.
    pub fn consistency_error(
        &self,
        message: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::Consistency {
            src: self.named_source(),
            span,
            message: message.into(),
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(code(cangen::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported encoding '{encoding}'")]
    #[diagnostic(
        code(cangen::unsupported_encoding),
        help("supported encodings are: utf-8, latin-1 (iso-8859-1), cp1252 (windows-1252)")
    )]
    UnsupportedEncoding { encoding: String },

    #[error("'{filename}' is not valid UTF-8")]
    #[diagnostic(
        code(cangen::decode_error),
        help("pass '--encoding cp1252' for databases exported by older tools")
    )]
    Decode {
        filename: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("failed to parse database: {message}")]
    #[diagnostic(code(cangen::parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: SourceSpan,
        message: String,
    },

    #[error("inconsistent database: {message}")]
    #[diagnostic(
        code(cangen::consistency_error),
        help("fix the database or pass '--no-strict' to skip consistency checks")
    )]
    Consistency {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },
}
