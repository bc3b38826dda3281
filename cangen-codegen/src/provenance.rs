//! Licence and "generated by" header placed at the top of generated files.

use chrono::Local;

const LICENSE: &str = "\
The MIT License (MIT)

Copyright (c) The cangen developers

Permission is hereby granted, free of charge, to any person
obtaining a copy of this software and associated documentation
files (the \"Software\"), to deal in the Software without
restriction, including without limitation the rights to use, copy,
modify, merge, publish, distribute, sublicense, and/or sell copies
of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be
included in all copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND,
EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS
BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN
ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.";

/// How a header is turned into comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `# ` line comments (CMake).
    Hash,
    /// A `/** ... */` block (C, C++, Java).
    Block,
}

/// Tool version and generation time stamped into every artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    version: String,
    date: String,
}

impl Provenance {
    /// This build's version and the current local time in ctime format.
    pub fn now() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            date: Local::now().format("%a %b %e %H:%M:%S %Y").to_string(),
        }
    }

    /// A fixed provenance, for reproducible output.
    pub fn fixed(version: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            date: date.into(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    /// The licence followed by the generator line, unformatted.
    pub fn text(&self) -> String {
        format!(
            "{LICENSE}\n\nThis file was generated by cangen version {} {}.",
            self.version, self.date
        )
    }

    /// Render the header as a comment, ending with a newline.
    pub fn header(&self, style: CommentStyle) -> String {
        let text = self.text();
        let mut out = String::new();
        match style {
            CommentStyle::Hash => {
                for line in text.lines() {
                    if line.is_empty() {
                        out.push_str("#\n");
                    } else {
                        out.push_str("# ");
                        out.push_str(line);
                        out.push('\n');
                    }
                }
            }
            CommentStyle::Block => {
                out.push_str("/**\n");
                for line in text.lines() {
                    if line.is_empty() {
                        out.push_str(" *\n");
                    } else {
                        out.push_str(" * ");
                        out.push_str(line);
                        out.push('\n');
                    }
                }
                out.push_str(" */\n");
            }
        }
        out
    }
}

impl Default for Provenance {
    fn default() -> Self {
        Self::now()
    }
}
