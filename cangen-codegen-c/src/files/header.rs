use std::path::{Path, PathBuf};

use cangen_codegen::{CommentStyle, GenerationOptions, Provenance, builder::CodeBuilder};
use cangen_core::{DatabaseName, GeneratedFile, to_snake_case};

use crate::{
    layout::{MessageLayout, SignalLayout},
    types::CType,
};

/// The `<database>.h` header declaring message structs and functions.
pub struct CHeader<'a> {
    pub names: &'a DatabaseName,
    pub messages: &'a [MessageLayout<'a>],
    pub options: &'a GenerationOptions,
    pub provenance: &'a Provenance,
}

impl CHeader<'_> {
    fn guard(&self) -> String {
        format!("{}_H", self.names.snake().to_uppercase())
    }

    fn physical_type(&self) -> &'static str {
        if self.options.use_float { "float" } else { "double" }
    }

    fn render_defines(&self, b: CodeBuilder) -> CodeBuilder {
        let b = b
            .comment("/*", "Frame ids. */")
            .each(self.messages, |b, m| {
                b.line(&format!(
                    "#define {}_FRAME_ID ({:#x}u)",
                    m.macro_prefix(),
                    m.message.frame_id
                ))
            })
            .blank()
            .comment("/*", "Frame lengths in bytes. */")
            .each(self.messages, |b, m| {
                b.line(&format!(
                    "#define {}_LENGTH ({}u)",
                    m.macro_prefix(),
                    m.message.length
                ))
            })
            .blank()
            .comment("/*", "Extended or standard frame types. */")
            .each(self.messages, |b, m| {
                b.line(&format!(
                    "#define {}_IS_EXTENDED ({})",
                    m.macro_prefix(),
                    u8::from(m.message.is_extended_frame)
                ))
            })
            .blank();

        let choices: Vec<String> = self
            .messages
            .iter()
            .flat_map(|m| m.signals.iter().map(move |s| (m, s)))
            .flat_map(|(m, s)| {
                s.signal.choices.iter().map(move |(value, name)| {
                    format!(
                        "#define {} ({})",
                        choice_macro(m, s, *value, name),
                        s.raw_type.literal(i128::from(*value))
                    )
                })
            })
            .collect();

        b.when(!choices.is_empty(), |b| {
            b.comment("/*", "Signal choices. */")
                .each(&choices, |b, line| b.line(line))
                .blank()
        })
    }

    fn render_struct(&self, b: CodeBuilder, m: &MessageLayout<'_>) -> CodeBuilder {
        let mut doc = format!("Signals in message {}.", m.message.name);
        if let Some(comment) = &m.message.comment {
            doc.push_str("\n\n");
            doc.push_str(&escape_comment(comment));
        }
        doc.push_str("\n\nAll signal values are as on the CAN bus.");

        b.block_comment("/**", &doc)
            .block_with_close(&format!("struct {} {{", m.struct_name()), "};", |b| {
                b.when(m.signals.is_empty(), |b| {
                    b.comment("/*", "Dummy signal in empty message. */")
                        .line("uint8_t dummy;")
                })
                .each(m.signals.iter().enumerate(), |b, (i, s)| {
                    let member = if self.options.bit_fields {
                        format!("{} {} : {};", s.raw_type.as_str(), s.field, s.signal.length)
                    } else {
                        format!("{} {};", s.raw_type.as_str(), s.field)
                    };
                    b.when(i > 0, |b| b.blank())
                        .block_comment("/**", &signal_doc(s))
                        .line(&member)
                })
            })
            .blank()
    }

    fn render_prototypes(&self, b: CodeBuilder, m: &MessageLayout<'_>) -> CodeBuilder {
        let struct_name = m.struct_name();
        let b = b
            .block_comment(
                "/**",
                &format!(
                    "Pack message {}.\n\n@param[out] dst_p Buffer to pack the message into.\n@param[in] src_p Data to pack.\n@param[in] size Size of dst_p.\n\n@return Size of packed data, or negative error code.",
                    m.message.name
                ),
            )
            .line(&format!(
                "int {}(uint8_t *dst_p, const struct {} *src_p, size_t size);",
                m.pack_fn(),
                struct_name
            ))
            .blank()
            .block_comment(
                "/**",
                &format!(
                    "Unpack message {}.\n\n@param[out] dst_p Object to unpack the message into.\n@param[in] src_p Message to unpack.\n@param[in] size Size of src_p.\n\n@return zero(0) or negative error code.",
                    m.message.name
                ),
            )
            .line(&format!(
                "int {}(struct {} *dst_p, const uint8_t *src_p, size_t size);",
                m.unpack_fn(),
                struct_name
            ))
            .blank()
            .block_comment(
                "/**",
                &format!(
                    "Init message fields to default values from {}.\n\n@param[in] msg_p Message to init.\n\n@return zero(0) on success or (-1) in case of nullptr argument.",
                    m.message.name
                ),
            )
            .line(&format!("int {}(struct {} *msg_p);", m.init_fn(), struct_name))
            .blank();

        b.each(&m.signals, |b, s| {
            let raw = s.raw_type.as_str();
            let physical = self.physical_type();
            b.when(self.options.floating_point_numbers, |b| {
                b.line(&format!(
                    "{raw} {}({physical} value);",
                    m.signal_fn(s, "encode")
                ))
                .line(&format!(
                    "{physical} {}({raw} value);",
                    m.signal_fn(s, "decode")
                ))
            })
            .line(&format!("bool {}({raw} value);", m.signal_fn(s, "is_in_range")))
            .blank()
        })
    }
}

impl GeneratedFile for CHeader<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(self.names.c_header_file())
    }

    fn render(&self) -> String {
        let guard = self.guard();

        let b = CodeBuilder::c()
            .raw(&self.provenance.header(CommentStyle::Block))
            .blank()
            .line(&format!("#ifndef {guard}"))
            .line(&format!("#define {guard}"))
            .blank()
            .line("#ifdef __cplusplus")
            .line("extern \"C\" {")
            .line("#endif")
            .blank()
            .line("#include <stdint.h>")
            .line("#include <stdbool.h>")
            .line("#include <stddef.h>")
            .blank()
            .line("#ifndef EINVAL")
            .line("#    define EINVAL 22")
            .line("#endif")
            .blank();

        let b = self.render_defines(b);
        let b = self
            .messages
            .iter()
            .fold(b, |b, m| self.render_struct(b, m));
        let b = self
            .messages
            .iter()
            .fold(b, |b, m| self.render_prototypes(b, m));

        b.line("#ifdef __cplusplus")
            .line("}")
            .line("#endif")
            .blank()
            .line(&format!("#endif /* {guard} */"))
            .build()
    }
}

/// `<MESSAGE>_<SIGNAL>_<NAME>_CHOICE` macro for a named value.
pub(crate) fn choice_macro(
    message: &MessageLayout<'_>,
    signal: &SignalLayout<'_>,
    value: i64,
    name: &str,
) -> String {
    let mut choice = to_snake_case(name).trim_matches('_').to_uppercase();
    if choice.is_empty() {
        choice = value.unsigned_abs().to_string();
    }
    format!(
        "{}_{}_{}_CHOICE",
        message.macro_prefix(),
        signal.field.trim_matches('_').to_uppercase(),
        choice
    )
}

fn signal_doc(s: &SignalLayout<'_>) -> String {
    let signal = s.signal;
    let mut lines = Vec::new();
    if let Some(comment) = &signal.comment {
        lines.push(escape_comment(comment));
        lines.push(String::new());
    }
    let unit = signal.unit.as_deref().unwrap_or("-");
    let physical = match (signal.minimum, signal.maximum) {
        (Some(min), Some(max)) => format!("{min}..{max} {unit}"),
        _ => format!("- {unit}"),
    };
    lines.push(format!(
        "Range: {}..{} ({physical})",
        signal.raw_minimum(),
        signal.raw_maximum()
    ));
    lines.push(format!("Scale: {}", signal.scale));
    lines.push(format!("Offset: {}", signal.offset));
    lines.join("\n")
}

fn escape_comment(text: &str) -> String {
    text.replace("*/", "* /")
}

/// Integer range check for a raw value, or `None` when every value of the type is valid.
pub(crate) fn range_condition(s: &SignalLayout<'_>) -> Option<String> {
    let (lo, hi) = raw_bounds(s);
    let ty: CType = s.raw_type;
    let mut checks = Vec::new();
    if lo > ty.min() {
        checks.push(format!("(value >= {})", ty.literal(lo)));
    }
    if hi < ty.max() {
        checks.push(format!("(value <= {})", ty.literal(hi)));
    }
    match checks.len() {
        0 => None,
        1 => checks.pop(),
        _ => Some(format!("({})", checks.join(" && "))),
    }
}

/// Valid raw range from the bit width, narrowed by the physical min/max.
fn raw_bounds(s: &SignalLayout<'_>) -> (i128, i128) {
    let signal = s.signal;
    let (mut lo, mut hi) = (signal.raw_minimum(), signal.raw_maximum());
    if let (Some(min), Some(max)) = (signal.minimum, signal.maximum) {
        if signal.scale != 0.0 {
            let a = snap((min - signal.offset) / signal.scale);
            let b = snap((max - signal.offset) / signal.scale);
            let (a, b) = if a <= b { (a, b) } else { (b, a) };
            lo = lo.max(a.ceil() as i128);
            hi = hi.min(b.floor() as i128);
        }
    }
    (lo, hi)
}

/// Round values within floating point noise of an integer.
fn snap(value: f64) -> f64 {
    if (value - value.round()).abs() < 1e-6 {
        value.round()
    } else {
        value
    }
}
