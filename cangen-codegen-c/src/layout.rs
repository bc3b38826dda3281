//! Per-message C symbol names and bit layouts shared by the C and JNI sources.

use cangen_core::{DatabaseName, to_snake_case};
use cangen_dbc::{ByteOrder, Message, Multiplex, Signal};
use eyre::{Result, bail, eyre};

use crate::types::CType;

/// Identifiers that cannot be used as struct members in C or C++.
const RESERVED: &[&str] = &[
    "auto", "bool", "break", "case", "char", "class", "const", "continue", "default", "delete",
    "do", "double", "else", "enum", "extern", "float", "for", "goto", "if", "inline", "int",
    "long", "new", "private", "public", "register", "restrict", "return", "short", "signed",
    "sizeof", "static", "struct", "switch", "template", "this", "typedef", "union", "unsigned",
    "void", "volatile", "while",
];

/// C view of one message.
#[derive(Debug, Clone)]
pub struct MessageLayout<'a> {
    pub message: &'a Message,
    /// `<database>_<message>`, the prefix of every function and type.
    pub prefix: String,
    pub signals: Vec<SignalLayout<'a>>,
}

/// C view of one signal.
#[derive(Debug, Clone)]
pub struct SignalLayout<'a> {
    pub signal: &'a Signal,
    /// Struct member name.
    pub field: String,
    pub raw_type: CType,
    /// Absolute bit positions, most significant bit first.
    pub bits: Vec<u16>,
}

impl<'a> MessageLayout<'a> {
    /// Compute the layout, failing for signals the generated code cannot address.
    pub fn new(names: &DatabaseName, message: &'a Message) -> Result<Self> {
        let prefix = format!("{}_{}", names.snake(), to_snake_case(&message.name));
        let frame_bits = i64::from(message.length) * 8;

        let mut signals = Vec::with_capacity(message.signals.len());
        for signal in &message.signals {
            if signal.length == 0 || signal.length > 64 {
                bail!(
                    "signal '{}' in message '{}' has unsupported length {}",
                    signal.name,
                    message.name,
                    signal.length
                );
            }
            let mut positions = signal.bit_positions();
            if positions.iter().any(|&p| p < 0 || p >= frame_bits) {
                bail!(
                    "signal '{}' does not fit in message '{}' ({} bytes)",
                    signal.name,
                    message.name,
                    message.length
                );
            }
            if signal.byte_order == ByteOrder::LittleEndian {
                positions.reverse();
            }
            let bits = positions
                .into_iter()
                .map(u16::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| {
                    eyre!(
                        "signal '{}' in message '{}' has bit positions beyond the C bit table range",
                        signal.name,
                        message.name
                    )
                })?;
            signals.push(SignalLayout {
                signal,
                field: field_name(&signal.name),
                raw_type: CType::for_signal(signal.length, signal.is_signed),
                bits,
            });
        }

        Ok(Self {
            message,
            prefix,
            signals,
        })
    }

    /// Upper-case prefix for macros.
    pub fn macro_prefix(&self) -> String {
        self.prefix.to_uppercase()
    }

    pub fn struct_name(&self) -> String {
        format!("{}_t", self.prefix)
    }

    pub fn pack_fn(&self) -> String {
        format!("{}_pack", self.prefix)
    }

    pub fn unpack_fn(&self) -> String {
        format!("{}_unpack", self.prefix)
    }

    pub fn init_fn(&self) -> String {
        format!("{}_init", self.prefix)
    }

    /// Signal function name, e.g. `demo_status_mode_encode`.
    pub fn signal_fn(&self, signal: &SignalLayout<'_>, operation: &str) -> String {
        format!("{}_{}_{}", self.prefix, signal.field, operation)
    }

    pub fn multiplexer(&self) -> Option<&SignalLayout<'a>> {
        self.signals
            .iter()
            .find(|s| matches!(s.signal.multiplex, Multiplex::Multiplexer))
    }

    /// Signals in the order they must be unpacked: multiplexers first.
    pub fn unpack_order(&self) -> Vec<&SignalLayout<'a>> {
        let (mut first, rest): (Vec<_>, Vec<_>) = self
            .signals
            .iter()
            .partition(|s| matches!(s.signal.multiplex, Multiplex::Multiplexer));
        first.extend(rest);
        first
    }
}

/// Struct member name for a signal.
pub fn field_name(signal_name: &str) -> String {
    let name = to_snake_case(signal_name);
    if RESERVED.contains(&name.as_str()) {
        format!("{name}_")
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{name}")
    } else {
        name
    }
}
