//! In-memory message database model.

use indexmap::IndexMap;
use miette::SourceSpan;

/// Sender/receiver placeholder used by DBC editors for "no node".
pub(crate) const NO_NODE: &str = "Vector__XXX";

/// Largest payload in bytes (CAN FD).
pub const MAX_MESSAGE_LENGTH: u64 = 64;

/// A loaded CAN message database.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Database {
    /// Value of the `VERSION` statement, if any.
    pub version: Option<String>,
    pub nodes: Vec<Node>,
    pub messages: Vec<Message>,
}

impl Database {
    /// Look up a message by name.
    pub fn message_by_name(&self, name: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.name == name)
    }

    /// Messages sent or received by `node`, or every message when no node is given.
    pub fn messages_for_node(&self, node: Option<&str>) -> Vec<&Message> {
        match node {
            None => self.messages.iter().collect(),
            Some(node) => self
                .messages
                .iter()
                .filter(|m| m.is_sent_by(node) || m.is_received_by(node))
                .collect(),
        }
    }
}

/// A node (ECU) on the bus.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub comment: Option<String>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: None,
        }
    }
}

/// A CAN frame definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub frame_id: u32,
    pub is_extended_frame: bool,
    pub name: String,
    /// Payload length in bytes.
    pub length: u32,
    pub senders: Vec<String>,
    pub signals: Vec<Signal>,
    pub comment: Option<String>,
    pub(crate) span: Option<SourceSpan>,
}

impl Message {
    pub fn new(frame_id: u32, name: impl Into<String>, length: u32) -> Self {
        Self {
            frame_id,
            is_extended_frame: false,
            name: name.into(),
            length,
            senders: Vec::new(),
            signals: Vec::new(),
            comment: None,
            span: None,
        }
    }

    pub fn extended(mut self) -> Self {
        self.is_extended_frame = true;
        self
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.senders.push(sender.into());
        self
    }

    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.signals.push(signal);
        self
    }

    pub fn is_sent_by(&self, node: &str) -> bool {
        self.senders.iter().any(|s| s == node)
    }

    pub fn is_received_by(&self, node: &str) -> bool {
        self.signals
            .iter()
            .any(|s| s.receivers.iter().any(|r| r == node))
    }

    /// The multiplexer signal, if the message is multiplexed.
    pub fn multiplexer(&self) -> Option<&Signal> {
        self.signals
            .iter()
            .find(|s| matches!(s.multiplex, Multiplex::Multiplexer))
    }
}

/// Bit numbering of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Intel, `@1` in DBC.
    LittleEndian,
    /// Motorola, `@0` in DBC.
    BigEndian,
}

/// Role of a signal in a multiplexed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Multiplex {
    #[default]
    None,
    /// The signal selecting the active group (`M`).
    Multiplexer,
    /// Present only when the multiplexer equals the value (`m<n>`).
    Multiplexed(u64),
}

/// A signal inside a message.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub name: String,
    /// Start bit in DBC numbering (LSB for little endian, MSB for big endian).
    pub start: u32,
    pub length: u32,
    pub byte_order: ByteOrder,
    pub is_signed: bool,
    pub scale: f64,
    pub offset: f64,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub unit: Option<String>,
    pub receivers: Vec<String>,
    pub multiplex: Multiplex,
    /// Named raw values, in declaration order.
    pub choices: IndexMap<i64, String>,
    pub comment: Option<String>,
    pub(crate) span: Option<SourceSpan>,
}

impl Signal {
    pub fn new(name: impl Into<String>, start: u32, length: u32) -> Self {
        Self {
            name: name.into(),
            start,
            length,
            byte_order: ByteOrder::LittleEndian,
            is_signed: false,
            scale: 1.0,
            offset: 0.0,
            minimum: None,
            maximum: None,
            unit: None,
            receivers: Vec::new(),
            multiplex: Multiplex::None,
            choices: IndexMap::new(),
            comment: None,
            span: None,
        }
    }

    pub fn big_endian(mut self) -> Self {
        self.byte_order = ByteOrder::BigEndian;
        self
    }

    pub fn signed(mut self) -> Self {
        self.is_signed = true;
        self
    }

    pub fn with_conversion(mut self, scale: f64, offset: f64) -> Self {
        self.scale = scale;
        self.offset = offset;
        self
    }

    pub fn with_range(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    pub fn with_receiver(mut self, receiver: impl Into<String>) -> Self {
        self.receivers.push(receiver.into());
        self
    }

    pub fn with_choice(mut self, value: i64, name: impl Into<String>) -> Self {
        self.choices.insert(value, name.into());
        self
    }

    pub fn with_multiplex(mut self, multiplex: Multiplex) -> Self {
        self.multiplex = multiplex;
        self
    }

    /// Smallest raw value representable in `length` bits.
    pub fn raw_minimum(&self) -> i128 {
        if self.is_signed {
            -(1i128 << (self.length.max(1) - 1))
        } else {
            0
        }
    }

    /// Largest raw value representable in `length` bits.
    pub fn raw_maximum(&self) -> i128 {
        if self.is_signed {
            (1i128 << (self.length.max(1) - 1)) - 1
        } else {
            (1i128 << self.length) - 1
        }
    }

    /// Absolute bit positions covered by the signal, MSB first for big endian.
    ///
    /// Position `n` is bit `n % 8` of byte `n / 8`. Positions may fall
    /// outside the message; callers check bounds.
    pub fn bit_positions(&self) -> Vec<i64> {
        match self.byte_order {
            ByteOrder::LittleEndian => (0..self.length)
                .map(|i| i64::from(self.start) + i64::from(i))
                .collect(),
            ByteOrder::BigEndian => {
                let mut pos = i64::from(self.start);
                let mut positions = Vec::with_capacity(self.length as usize);
                for _ in 0..self.length {
                    positions.push(pos);
                    pos = if pos % 8 == 0 { pos + 15 } else { pos - 1 };
                }
                positions
            }
        }
    }
}
