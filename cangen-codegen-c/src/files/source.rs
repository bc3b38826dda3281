use std::path::{Path, PathBuf};

use cangen_codegen::{CommentStyle, GenerationOptions, Provenance, builder::CodeBuilder};
use cangen_core::{DatabaseName, GeneratedFile};
use cangen_dbc::Multiplex;

use super::header::range_condition;
use crate::{
    layout::{MessageLayout, SignalLayout},
    types::float_literal,
};

const PACK_BITS: &str = "\
static void pack_bits(uint8_t *dst_p, uint64_t value, const uint16_t *bits_p, uint8_t length)
{
    uint8_t i;

    for (i = 0u; i < length; i++) {
        if (((value >> (length - 1u - i)) & 1u) != 0u) {
            dst_p[bits_p[i] / 8u] |= (uint8_t)(1u << (bits_p[i] % 8u));
        }
    }
}
";

const UNPACK_BITS: &str = "\
static uint64_t unpack_bits(const uint8_t *src_p, const uint16_t *bits_p, uint8_t length)
{
    uint64_t value = 0u;
    uint8_t i;

    for (i = 0u; i < length; i++) {
        value <<= 1;
        value |= (uint64_t)((src_p[bits_p[i] / 8u] >> (bits_p[i] % 8u)) & 1u);
    }

    return (value);
}
";

const SIGN_EXTEND: &str = "\
static int64_t sign_extend(uint64_t value, uint8_t length)
{
    if ((length < 64u) && (((value >> (length - 1u)) & 1u) != 0u)) {
        value |= ~((1ull << length) - 1u);
    }

    return ((int64_t)value);
}
";

/// The `<database>.c` source implementing pack, unpack and conversions.
pub struct CSource<'a> {
    pub names: &'a DatabaseName,
    pub messages: &'a [MessageLayout<'a>],
    pub options: &'a GenerationOptions,
    pub provenance: &'a Provenance,
}

impl CSource<'_> {
    fn physical_type(&self) -> &'static str {
        if self.options.use_float { "float" } else { "double" }
    }

    fn has_signals(&self) -> bool {
        self.messages.iter().any(|m| !m.signals.is_empty())
    }

    fn has_signed(&self) -> bool {
        self.messages
            .iter()
            .flat_map(|m| &m.signals)
            .any(|s| s.raw_type.is_signed())
    }

    fn render_bit_tables(&self, b: CodeBuilder, m: &MessageLayout<'_>) -> CodeBuilder {
        b.each(&m.signals, |b, s| {
            let bits: Vec<String> = s.bits.iter().map(|bit| format!("{bit}u")).collect();
            b.line(&format!(
                "static const uint16_t {}[{}] = {{ {} }};",
                bits_table(m, s),
                s.bits.len(),
                bits.join(", ")
            ))
        })
    }

    fn render_pack(&self, b: CodeBuilder, m: &MessageLayout<'_>) -> CodeBuilder {
        let length = m.message.length;
        let header = format!(
            "int {}(\n    uint8_t *dst_p,\n    const struct {} *src_p,\n    size_t size)",
            m.pack_fn(),
            m.struct_name()
        );

        b.raw(&header)
            .line("")
            .block_with_close("{", "}", |b| {
                b.when(m.signals.is_empty(), |b| b.line("(void)src_p;").blank())
                    .block_with_close(&format!("if (size < {length}u) {{"), "}", |b| {
                        b.line("return (-EINVAL);")
                    })
                    .blank()
                    .line(&format!("memset(&dst_p[0], 0, {length});"))
                    .blank()
                    .each(&m.signals, |b, s| {
                        let call = format!(
                            "pack_bits(dst_p, (uint64_t)src_p->{}, {}, {}u);",
                            s.field,
                            bits_table(m, s),
                            s.bits.len()
                        );
                        guarded(b, m, s, "src_p", |b| b.line(&call))
                    })
                    .when(!m.signals.is_empty(), |b| b.blank())
                    .line(&format!("return ({length});"))
            })
            .blank()
    }

    fn render_unpack(&self, b: CodeBuilder, m: &MessageLayout<'_>) -> CodeBuilder {
        let length = m.message.length;
        let header = format!(
            "int {}(\n    struct {} *dst_p,\n    const uint8_t *src_p,\n    size_t size)",
            m.unpack_fn(),
            m.struct_name()
        );

        b.raw(&header)
            .line("")
            .block_with_close("{", "}", |b| {
                b.when(m.signals.is_empty(), |b| {
                    b.line("(void)dst_p;").line("(void)src_p;").blank()
                })
                .block_with_close(&format!("if (size < {length}u) {{"), "}", |b| {
                    b.line("return (-EINVAL);")
                })
                .blank()
                .each(m.unpack_order(), |b, s| {
                    let raw = format!(
                        "unpack_bits(src_p, {}, {}u)",
                        bits_table(m, s),
                        s.bits.len()
                    );
                    let value = if s.raw_type.is_signed() {
                        format!("sign_extend({raw}, {}u)", s.bits.len())
                    } else {
                        raw
                    };
                    let assign = format!("dst_p->{} = ({}){value};", s.field, s.raw_type.as_str());
                    guarded(b, m, s, "dst_p", |b| b.line(&assign))
                })
                .when(!m.signals.is_empty(), |b| b.blank())
                .line("return (0);")
            })
            .blank()
    }

    fn render_init(&self, b: CodeBuilder, m: &MessageLayout<'_>) -> CodeBuilder {
        b.line(&format!("int {}(struct {} *msg_p)", m.init_fn(), m.struct_name()))
            .block_with_close("{", "}", |b| {
                b.block_with_close("if (msg_p == NULL) {", "}", |b| b.line("return (-1);"))
                    .blank()
                    .line(&format!("memset(msg_p, 0, sizeof(struct {}));", m.struct_name()))
                    .blank()
                    .line("return (0);")
            })
            .blank()
    }

    fn render_conversions(&self, b: CodeBuilder, m: &MessageLayout<'_>) -> CodeBuilder {
        let physical = self.physical_type();
        let use_float = self.options.use_float;

        b.each(&m.signals, |b, s| {
            let raw = s.raw_type.as_str();
            let scale = float_literal(s.signal.scale, use_float);
            let offset = float_literal(s.signal.offset, use_float);

            let b = b.when(self.options.floating_point_numbers, |b| {
                b.line(&format!("{raw} {}({physical} value)", m.signal_fn(s, "encode")))
                    .block_with_close("{", "}", |b| {
                        b.line(&format!("return ({raw})((value - {offset}) / {scale});"))
                    })
                    .blank()
                    .line(&format!("{physical} {}({raw} value)", m.signal_fn(s, "decode")))
                    .block_with_close("{", "}", |b| {
                        b.line(&format!("return ((({physical})value * {scale}) + {offset});"))
                    })
                    .blank()
            });

            b.line(&format!("bool {}({raw} value)", m.signal_fn(s, "is_in_range")))
                .block_with_close("{", "}", |b| match range_condition(s) {
                    Some(condition) => b.line(&format!("return {condition};")),
                    None => b.line("(void)value;").blank().line("return (true);"),
                })
                .blank()
        })
    }
}

impl GeneratedFile for CSource<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(self.names.c_source_file())
    }

    fn render(&self) -> String {
        let b = CodeBuilder::c()
            .raw(&self.provenance.header(CommentStyle::Block))
            .blank()
            .line("#include <string.h>")
            .blank()
            .line(&format!("#include \"{}\"", self.names.c_header_file()))
            .blank()
            .when(self.has_signals(), |b| {
                b.raw(PACK_BITS).blank().raw(UNPACK_BITS).blank()
            })
            .when(self.has_signed(), |b| b.raw(SIGN_EXTEND).blank());

        let b = self
            .messages
            .iter()
            .fold(b, |b, m| self.render_bit_tables(b, m));
        let b = b.when(self.has_signals(), |b| b.blank());

        let b = self.messages.iter().fold(b, |b, m| {
            let b = self.render_pack(b, m);
            let b = self.render_unpack(b, m);
            let b = self.render_init(b, m);
            self.render_conversions(b, m)
        });

        let mut out = b.build();
        // No trailing blank line.
        while out.ends_with("\n\n") {
            out.pop();
        }
        out
    }
}

fn bits_table(m: &MessageLayout<'_>, s: &SignalLayout<'_>) -> String {
    format!("{}_{}_bits", m.prefix, s.field)
}

/// Wrap multiplexed signals in a check of the multiplexer value.
fn guarded<F>(b: CodeBuilder, m: &MessageLayout<'_>, s: &SignalLayout<'_>, var: &str, f: F) -> CodeBuilder
where
    F: FnOnce(CodeBuilder) -> CodeBuilder,
{
    match (s.signal.multiplex, m.multiplexer()) {
        (Multiplex::Multiplexed(id), Some(mux)) => b.block_with_close(
            &format!(
                "if ({var}->{} == {}) {{",
                mux.field,
                mux.raw_type.literal(i128::from(id))
            ),
            "}",
            f,
        ),
        _ => f(b),
    }
}

#[cfg(test)]
mod tests {
    use cangen_dbc::{Message, Signal};

    use super::*;

    fn render(messages: Vec<Message>, options: GenerationOptions) -> String {
        let names = DatabaseName::explicit("demo").unwrap();
        let layouts: Vec<_> = messages
            .iter()
            .map(|m| MessageLayout::new(&names, m).unwrap())
            .collect();
        let provenance = Provenance::fixed("0.0.0", "today");
        CSource {
            names: &names,
            messages: &layouts,
            options: &options,
            provenance: &provenance,
        }
        .render()
    }

    fn status() -> Message {
        Message::new(0x123, "Status", 2)
            .with_signal(Signal::new("Mode", 0, 2))
            .with_signal(
                Signal::new("Temp", 15, 8)
                    .big_endian()
                    .signed()
                    .with_conversion(0.5, -10.0),
            )
    }

    #[test]
    fn test_includes_and_helpers() {
        let source = render(vec![status()], GenerationOptions::default());

        assert!(source.contains("#include <string.h>\n\n#include \"demo.h\"\n"));
        assert!(source.contains("static void pack_bits("));
        assert!(source.contains("static uint64_t unpack_bits("));
        assert!(source.contains("static int64_t sign_extend("));
        assert!(source.ends_with("}\n"));
    }

    #[test]
    fn test_bit_tables() {
        let source = render(vec![status()], GenerationOptions::default());

        assert!(source.contains("static const uint16_t demo_status_mode_bits[2] = { 1u, 0u };"));
        assert!(source.contains(
            "static const uint16_t demo_status_temp_bits[8] = { 15u, 14u, 13u, 12u, 11u, 10u, 9u, 8u };"
        ));
    }

    #[test]
    fn test_pack_and_unpack() {
        let source = render(vec![status()], GenerationOptions::default());

        assert!(source.contains("    if (size < 2u) {\n        return (-EINVAL);\n    }\n"));
        assert!(source.contains("    memset(&dst_p[0], 0, 2);\n"));
        assert!(source.contains(
            "    pack_bits(dst_p, (uint64_t)src_p->mode, demo_status_mode_bits, 2u);\n"
        ));
        assert!(source.contains(
            "    dst_p->temp = (int8_t)sign_extend(unpack_bits(src_p, demo_status_temp_bits, 8u), 8u);\n"
        ));
        assert!(source.contains("    return (2);\n"));
    }

    #[test]
    fn test_conversions() {
        let source = render(vec![status()], GenerationOptions::default());

        assert!(source.contains("int8_t demo_status_temp_encode(double value)\n{\n    return (int8_t)((value - -10.0) / 0.5);\n}"));
        assert!(source.contains("double demo_status_temp_decode(int8_t value)\n{\n    return (((double)value * 0.5) + -10.0);\n}"));
        assert!(source.contains("bool demo_status_mode_is_in_range(uint8_t value)\n{\n    return (value <= 3u);\n}"));
    }

    #[test]
    fn test_conversions_disabled() {
        let options = GenerationOptions {
            floating_point_numbers: false,
            ..Default::default()
        };
        let source = render(vec![status()], options);

        assert!(!source.contains("_encode("));
        assert!(source.contains("_is_in_range("));
    }

    #[test]
    fn test_multiplexed_signals_are_guarded() {
        let message = Message::new(1, "Mux", 2)
            .with_signal(Signal::new("Select", 0, 8).with_multiplex(Multiplex::Multiplexer))
            .with_signal(Signal::new("A", 8, 8).with_multiplex(Multiplex::Multiplexed(1)));
        let source = render(vec![message], GenerationOptions::default());

        assert!(source.contains(
            "    if (src_p->select == 1u) {\n        pack_bits(dst_p, (uint64_t)src_p->a, demo_mux_a_bits, 8u);\n    }\n"
        ));
        assert!(source.contains("    if (dst_p->select == 1u) {\n        dst_p->a = (uint8_t)unpack_bits("));
    }

    #[test]
    fn test_empty_database_has_no_helpers() {
        let source = render(Vec::new(), GenerationOptions::default());
        assert!(!source.contains("pack_bits"));
    }
}
