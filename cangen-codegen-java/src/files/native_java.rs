use std::path::{Path, PathBuf};

use cangen_codegen::{CommentStyle, JavaPackage, Provenance, builder::CodeBuilder};
use cangen_core::{DatabaseName, GeneratedFile};
use cangen_dbc::Message;

use crate::java::{message_class, method_prefix};

/// `<Database>Native.java`: native pack/unpack entry points.
pub struct NativeJava<'a> {
    pub names: &'a DatabaseName,
    pub package: &'a JavaPackage,
    pub messages: &'a [&'a Message],
    pub provenance: &'a Provenance,
}

impl GeneratedFile for NativeJava<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(format!("{}.java", self.names.native_class()))
    }

    fn render(&self) -> String {
        let class = self.names.native_class();
        let model = self.names.model_class();

        CodeBuilder::java()
            .raw(&self.provenance.header(CommentStyle::Block))
            .blank()
            .line(&format!("package {};", self.package))
            .blank()
            .block_comment(
                "/**",
                &format!(
                    "Native pack and unpack functions of the {} database.",
                    self.names
                ),
            )
            .braced(&format!("public final class {class}"), |b| {
                b.braced("static", |b| {
                    b.line(&format!("System.loadLibrary(\"{}\");", self.names.snake()))
                })
                .blank()
                .line(&format!("private {class}() {{"))
                .line("}")
                .each(self.messages, |b, message| {
                    let inner = message_class(message);
                    let method = method_prefix(message);
                    b.blank()
                        .block_comment(
                            "/**",
                            &format!(
                                "Pack {} into its CAN payload.\n\n@return the payload, or null on failure",
                                message.name
                            ),
                        )
                        .line(&format!(
                            "public static native byte[] {method}Pack({model}.{inner} message);"
                        ))
                        .blank()
                        .block_comment(
                            "/**",
                            &format!(
                                "Unpack a CAN payload into {}.\n\n@return the message, or null on failure",
                                message.name
                            ),
                        )
                        .line(&format!(
                            "public static native {model}.{inner} {method}Unpack(byte[] data);"
                        ))
                })
            })
            .build()
    }
}
