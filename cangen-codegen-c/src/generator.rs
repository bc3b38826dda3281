use cangen_codegen::{ArtifactGenerator, GenerationRequest};
use cangen_core::{File, GeneratedFile};
use eyre::Result;
use tracing::debug;

use crate::{
    files::{CHeader, CSource},
    layout::MessageLayout,
};

/// Generates `<database>.h` and `<database>.c` with pack/unpack functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct CSourceGenerator;

impl ArtifactGenerator for CSourceGenerator {
    fn name(&self) -> &'static str {
        "c-source"
    }

    fn render(&self, request: &GenerationRequest) -> Result<Vec<File>> {
        let names = request.names();
        let messages = request
            .messages()
            .into_iter()
            .map(|message| MessageLayout::new(names, message))
            .collect::<Result<Vec<_>>>()?;
        debug!(messages = messages.len(), "rendering C source");

        let header = CHeader {
            names,
            messages: &messages,
            options: request.options(),
            provenance: request.provenance(),
        };
        let source = CSource {
            names,
            messages: &messages,
            options: request.options(),
            provenance: request.provenance(),
        };

        Ok(vec![header.to_file(), source.to_file()])
    }
}
