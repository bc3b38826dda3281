use std::path::{Path, PathBuf};

use cangen_codegen::{CommentStyle, JavaPackage, Provenance, builder::CodeBuilder};
use cangen_core::{DatabaseName, GeneratedFile};
use cangen_dbc::Message;

use crate::java::{FieldType, choice_constant, field_name, message_class};

/// `<Database>Model.java`: one nested class per message holding signal values.
pub struct ModelJava<'a> {
    pub names: &'a DatabaseName,
    pub package: &'a JavaPackage,
    pub messages: &'a [&'a Message],
    pub field_type: FieldType,
    pub provenance: &'a Provenance,
}

impl ModelJava<'_> {
    fn render_message(&self, b: CodeBuilder, message: &Message) -> CodeBuilder {
        let mut doc = format!("Message {}.", message.name);
        if let Some(comment) = &message.comment {
            doc.push_str("\n\n");
            doc.push_str(&comment.replace("*/", "* /"));
        }

        let choices: Vec<String> = message
            .signals
            .iter()
            .flat_map(|s| {
                s.choices.iter().map(move |(value, name)| {
                    format!(
                        "public static final long {} = {value}L;",
                        choice_constant(s, *value, name)
                    )
                })
            })
            .collect();

        b.blank()
            .block_comment("/**", &doc)
            .braced(&format!("public static class {}", message_class(message)), |b| {
                b.line(&format!(
                    "public static final int FRAME_ID = {:#x};",
                    message.frame_id
                ))
                .line(&format!("public static final int LENGTH = {};", message.length))
                .line(&format!(
                    "public static final boolean IS_EXTENDED = {};",
                    message.is_extended_frame
                ))
                .when(!choices.is_empty(), |b| {
                    b.blank().each(&choices, |b, line| b.line(line))
                })
                .each(&message.signals, |b, signal| {
                    let mut doc = Vec::new();
                    if let Some(comment) = &signal.comment {
                        doc.push(comment.replace("*/", "* /"));
                    }
                    if let Some(unit) = &signal.unit {
                        doc.push(format!("Unit: {unit}"));
                    }
                    b.blank()
                        .when(!doc.is_empty(), |b| b.block_comment("/**", &doc.join("\n")))
                        .line(&format!(
                            "public {} {};",
                            self.field_type.java(),
                            field_name(signal)
                        ))
                })
            })
    }
}

impl GeneratedFile for ModelJava<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(format!("{}.java", self.names.model_class()))
    }

    fn render(&self) -> String {
        let class = self.names.model_class();

        CodeBuilder::java()
            .raw(&self.provenance.header(CommentStyle::Block))
            .blank()
            .line(&format!("package {};", self.package))
            .blank()
            .block_comment(
                "/**",
                &format!("Signal values of the messages in the {} database.", self.names),
            )
            .braced(&format!("public final class {class}"), |b| {
                let b = b.line(&format!("private {class}() {{")).line("}");
                self.messages
                    .iter()
                    .fold(b, |b, message| self.render_message(b, message))
            })
            .build()
    }
}
