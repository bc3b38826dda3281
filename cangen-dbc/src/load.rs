//! Loading databases from files and strings.

use std::{fmt, path::Path, str::FromStr};

use crate::{
    Error, Result, error::SourceContext, model::Database, parse::parse_database,
    prune::prune_choices, validate::validate_database,
};

/// Text encoding of a database file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    /// ISO-8859-1, one byte per code point.
    Latin1,
    /// Windows-1252, the default of most DBC editors.
    Cp1252,
}

impl Encoding {
    fn decode(self, bytes: Vec<u8>, filename: &str) -> Result<String> {
        match self {
            Encoding::Utf8 => {
                let text = String::from_utf8(bytes).map_err(|source| {
                    Box::new(Error::Decode {
                        filename: filename.to_string(),
                        source,
                    })
                })?;
                Ok(text
                    .strip_prefix('\u{feff}')
                    .map(str::to_string)
                    .unwrap_or(text))
            }
            Encoding::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
            Encoding::Cp1252 => {
                let (text, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(&bytes);
                Ok(text.into_owned())
            }
        }
    }
}

impl FromStr for Encoding {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(Encoding::Latin1),
            "cp1252" | "windows-1252" => Ok(Encoding::Cp1252),
            _ => Err(Box::new(Error::UnsupportedEncoding {
                encoding: s.to_string(),
            })),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Utf8 => write!(f, "utf-8"),
            Encoding::Latin1 => write!(f, "latin-1"),
            Encoding::Cp1252 => write!(f, "cp1252"),
        }
    }
}

/// Options controlling how a database is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub encoding: Encoding,
    /// Shorten choice names by removing shared words.
    pub prune_choices: bool,
    /// Run consistency checks after parsing.
    pub strict: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            encoding: Encoding::Utf8,
            prune_choices: false,
            strict: true,
        }
    }
}

/// Load a database file.
pub fn load_file(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Database> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| {
        Box::new(Error::Io {
            path: path.to_path_buf(),
            source,
        })
    })?;
    let filename = path.display().to_string();
    let content = options.encoding.decode(bytes, &filename)?;
    Database::from_str_with_options(&content, &filename, options)
}

impl Database {
    /// Parse database text, using `filename` for error reporting.
    pub fn from_str_with_options(
        content: &str,
        filename: &str,
        options: &LoadOptions,
    ) -> Result<Self> {
        let ctx = SourceContext::new(content, filename);
        let mut database = parse_database(&ctx, content)?;
        if options.strict {
            validate_database(&ctx, &database)?;
        }
        if options.prune_choices {
            prune_choices(&mut database);
        }
        Ok(database)
    }
}

impl FromStr for Database {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_with_options(s, "database.dbc", &LoadOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const SOURCE: &str = "BU_: Ecu\n\nBO_ 1 Status: 1 Ecu\n SG_ Mode : 0|2@1+ (1,0) [0|3] \"\" Ecu\n\nVAL_ 1 Mode 0 \"MODE_OFF\" 1 \"MODE_ON\" ;\n";

    #[test]
    fn test_load_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("status.dbc");
        fs::write(&path, SOURCE).unwrap();

        let db = load_file(&path, &LoadOptions::default()).unwrap();
        assert_eq!(db.messages.len(), 1);
        assert_eq!(db.messages[0].signals[0].choices[&0], "MODE_OFF");
    }

    #[test]
    fn test_load_file_with_pruning() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("status.dbc");
        fs::write(&path, SOURCE).unwrap();

        let options = LoadOptions {
            prune_choices: true,
            ..Default::default()
        };
        let db = load_file(&path, &options).unwrap();
        assert_eq!(db.messages[0].signals[0].choices[&1], "ON");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_file("/nonexistent/db.dbc", &LoadOptions::default()).unwrap_err();
        assert!(matches!(*err, Error::Io { .. }));
    }

    #[test]
    fn test_load_latin1() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("legacy.dbc");
        let mut bytes = b"BO_ 1 Status: 1 Ecu\n SG_ Temp : 0|8@1+ (1,0) [0|0] \"".to_vec();
        bytes.push(0xB0); // degree sign
        bytes.extend_from_slice(b"C\" Ecu\n");
        fs::write(&path, &bytes).unwrap();

        let err = load_file(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(*err, Error::Decode { .. }));

        let options = LoadOptions {
            encoding: Encoding::Latin1,
            ..Default::default()
        };
        let db = load_file(&path, &options).unwrap();
        assert_eq!(db.messages[0].signals[0].unit.as_deref(), Some("\u{b0}C"));
    }

    #[test]
    fn test_load_cp1252() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("prices.dbc");
        let mut bytes = b"BO_ 1 Status: 1 Ecu\n SG_ Cost : 0|8@1+ (1,0) [0|0] \"".to_vec();
        bytes.push(0x80); // euro sign
        bytes.extend_from_slice(b"\" Ecu\n");
        fs::write(&path, &bytes).unwrap();

        let load = |encoding| {
            let options = LoadOptions {
                encoding,
                ..Default::default()
            };
            load_file(&path, &options).unwrap().messages[0].signals[0].unit.clone()
        };
        assert_eq!(load(Encoding::Cp1252).as_deref(), Some("\u{20ac}"));
        assert_eq!(load(Encoding::Latin1).as_deref(), Some("\u{80}"));
    }

    #[test]
    fn test_strict_can_be_disabled() {
        let source = "BO_ 1 A: 1 Ecu\n SG_ Wide : 0|16@1+ (1,0) [0|0] \"\" Ecu\n";

        let err = source.parse::<Database>().unwrap_err();
        assert!(matches!(*err, Error::Consistency { .. }));

        let options = LoadOptions {
            strict: false,
            ..Default::default()
        };
        let db = Database::from_str_with_options(source, "a.dbc", &options).unwrap();
        assert_eq!(db.messages[0].signals[0].length, 16);
    }

    #[test]
    fn test_encoding_from_str() {
        assert_eq!("UTF-8".parse::<Encoding>().unwrap(), Encoding::Utf8);
        assert_eq!("cp1252".parse::<Encoding>().unwrap(), Encoding::Cp1252);
        assert_eq!("ISO-8859-1".parse::<Encoding>().unwrap(), Encoding::Latin1);
        assert!("ebcdic".parse::<Encoding>().is_err());
        assert_eq!(Encoding::Latin1.to_string(), "latin-1");
    }
}
