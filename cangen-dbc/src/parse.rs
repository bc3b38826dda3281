//! DBC text parser.
//!
//! Handles the statements code generation needs (`VERSION`, `BU_`, `BO_`,
//! `SG_`, `CM_`, `VAL_`) and skips everything else.

use std::collections::HashMap;

use indexmap::IndexMap;
use miette::SourceSpan;

use crate::{
    Result,
    error::SourceContext,
    model::{
        ByteOrder, Database, MAX_MESSAGE_LENGTH, Message, Multiplex, NO_NODE, Node, Signal,
    },
};

const EXTENDED_FRAME_FLAG: u64 = 0x8000_0000;
const FRAME_ID_MASK: u64 = 0x1FFF_FFFF;

/// Parse DBC text into a [`Database`].
pub(crate) fn parse_database(ctx: &SourceContext, src: &str) -> Result<Database> {
    Parser::new(ctx, src).parse()
}

struct Parser<'a> {
    ctx: &'a SourceContext,
    src: &'a str,
    pos: usize,
    database: Database,
    /// DBC frame id (with the extended flag) of each parsed message.
    raw_ids: Vec<u64>,
    message_comments: HashMap<u64, String>,
    signal_comments: HashMap<(u64, String), String>,
    node_comments: HashMap<String, String>,
    choices: HashMap<(u64, String), IndexMap<i64, String>>,
}

impl<'a> Parser<'a> {
    fn new(ctx: &'a SourceContext, src: &'a str) -> Self {
        Self {
            ctx,
            src,
            pos: 0,
            database: Database::default(),
            raw_ids: Vec::new(),
            message_comments: HashMap::new(),
            signal_comments: HashMap::new(),
            node_comments: HashMap::new(),
            choices: HashMap::new(),
        }
    }

    fn parse(mut self) -> Result<Database> {
        loop {
            self.skip_ws();
            if self.at_end() {
                break;
            }
            let (keyword, span) = self.ident("a statement keyword")?;
            match keyword {
                "VERSION" => {
                    self.skip_ws();
                    self.database.version = Some(self.string()?);
                }
                "NS_" => self.skip_symbol_block(),
                "BS_" => self.skip_line(),
                "BU_" => self.parse_nodes()?,
                "BO_" => self.parse_message(span)?,
                "SG_" => self.parse_signal(span)?,
                "CM_" => self.parse_comment()?,
                "VAL_" => self.parse_choices()?,
                _ => self.skip_statement(),
            }
        }
        self.attach_metadata();
        Ok(self.database)
    }

    fn parse_nodes(&mut self) -> Result<()> {
        self.skip_inline_ws();
        self.expect(':')?;
        loop {
            self.skip_inline_ws();
            if self.at_line_end() {
                break;
            }
            let (name, _) = self.ident("a node name")?;
            self.database.nodes.push(Node::new(name));
        }
        Ok(())
    }

    fn parse_message(&mut self, keyword: SourceSpan) -> Result<()> {
        self.skip_ws();
        let raw_id = u64::from(self.u32("a frame id")?);
        self.skip_ws();
        let (name, name_span) = self.ident("a message name")?;
        self.skip_ws();
        self.expect(':')?;
        self.skip_ws();
        let (length, length_span) = self.uint_spanned("a message length")?;
        if length > MAX_MESSAGE_LENGTH {
            return Err(self.ctx.parse_error(
                format!("message length {length} exceeds {MAX_MESSAGE_LENGTH} bytes"),
                length_span,
            ));
        }
        let mut message = Message::new((raw_id & FRAME_ID_MASK) as u32, name, length as u32);
        message.is_extended_frame = raw_id & EXTENDED_FRAME_FLAG != 0;
        message.span = Some(join(keyword, name_span));

        self.skip_inline_ws();
        if !self.at_line_end() {
            let (sender, _) = self.ident("a sender")?;
            if sender != NO_NODE {
                message.senders.push(sender.to_string());
            }
        }

        self.database.messages.push(message);
        self.raw_ids.push(raw_id);
        Ok(())
    }

    fn parse_signal(&mut self, keyword: SourceSpan) -> Result<()> {
        if self.database.messages.is_empty() {
            return Err(self
                .ctx
                .parse_error("signal defined outside of a message", keyword));
        }

        self.skip_inline_ws();
        let (name, name_span) = self.ident("a signal name")?;
        let mut signal = Signal::new(name, 0, 0);
        signal.span = Some(join(keyword, name_span));

        self.skip_inline_ws();
        if self.peek() != Some(':') {
            let (indicator, span) = self.ident("a multiplex indicator")?;
            signal.multiplex = parse_multiplex(indicator)
                .ok_or_else(|| self.ctx.parse_error("invalid multiplex indicator", span))?;
            self.skip_inline_ws();
        }
        self.expect(':')?;

        self.skip_inline_ws();
        signal.start = self.u32("a start bit")?;
        self.expect('|')?;
        signal.length = self.u32("a signal length")?;
        self.expect('@')?;
        signal.byte_order = match self.bump() {
            Some('0') => ByteOrder::BigEndian,
            Some('1') => ByteOrder::LittleEndian,
            _ => return Err(self.error_here("expected byte order '0' or '1'")),
        };
        signal.is_signed = match self.bump() {
            Some('-') => true,
            Some('+') => false,
            _ => return Err(self.error_here("expected sign '+' or '-'")),
        };

        self.skip_inline_ws();
        self.expect('(')?;
        signal.scale = self.float("a scale")?;
        self.expect(',')?;
        signal.offset = self.float("an offset")?;
        self.expect(')')?;

        self.skip_inline_ws();
        self.expect('[')?;
        let minimum = self.float("a minimum")?;
        self.expect('|')?;
        let maximum = self.float("a maximum")?;
        self.expect(']')?;
        // [0|0] means "not specified"
        if minimum != 0.0 || maximum != 0.0 {
            signal.minimum = Some(minimum);
            signal.maximum = Some(maximum);
        }

        self.skip_inline_ws();
        let unit = self.string()?;
        if !unit.is_empty() {
            signal.unit = Some(unit);
        }

        loop {
            self.skip_inline_ws();
            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                }
                _ if self.at_line_end() => break,
                _ => {
                    let (receiver, _) = self.ident("a receiver")?;
                    if receiver != NO_NODE {
                        signal.receivers.push(receiver.to_string());
                    }
                }
            }
        }

        if let Some(message) = self.database.messages.last_mut() {
            message.signals.push(signal);
        }
        Ok(())
    }

    fn parse_comment(&mut self) -> Result<()> {
        self.skip_ws();
        if self.peek() == Some('"') {
            // Database-level comment
            self.string()?;
        } else {
            let (kind, _) = self.ident("a comment target")?;
            self.skip_ws();
            match kind {
                "BU_" => {
                    let (node, _) = self.ident("a node name")?;
                    let node = node.to_string();
                    self.skip_ws();
                    let text = self.string()?;
                    self.node_comments.insert(node, text);
                }
                "BO_" => {
                    let id = self.uint("a frame id")?;
                    self.skip_ws();
                    let text = self.string()?;
                    self.message_comments.insert(id, text);
                }
                "SG_" => {
                    let id = self.uint("a frame id")?;
                    self.skip_ws();
                    let (signal, _) = self.ident("a signal name")?;
                    let signal = signal.to_string();
                    self.skip_ws();
                    let text = self.string()?;
                    self.signal_comments.insert((id, signal), text);
                }
                _ => {
                    self.skip_statement();
                    return Ok(());
                }
            }
        }
        self.skip_ws();
        self.expect(';')
    }

    fn parse_choices(&mut self) -> Result<()> {
        self.skip_ws();
        let id = self.uint("a frame id")?;
        self.skip_ws();
        let (signal, _) = self.ident("a signal name")?;
        let signal = signal.to_string();

        let mut choices = IndexMap::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(';') {
                self.pos += 1;
                break;
            }
            let value = self.int("a choice value")?;
            self.skip_ws();
            let name = self.string()?;
            choices.insert(value, name);
        }
        self.choices.insert((id, signal), choices);
        Ok(())
    }

    /// Move comments and value tables onto the definitions they refer to.
    fn attach_metadata(&mut self) {
        for node in &mut self.database.nodes {
            node.comment = self.node_comments.remove(&node.name);
        }
        for (message, raw_id) in self.database.messages.iter_mut().zip(&self.raw_ids) {
            message.comment = self.message_comments.remove(raw_id);
            for signal in &mut message.signals {
                let key = (*raw_id, signal.name.clone());
                signal.comment = self.signal_comments.remove(&key);
                if let Some(choices) = self.choices.remove(&key) {
                    signal.choices = choices;
                }
            }
        }
    }

    // ---------------------------------------------------------------------
    // Lexing helpers
    // ---------------------------------------------------------------------

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn at_line_end(&self) -> bool {
        matches!(self.peek(), None | Some('\n') | Some('\r'))
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn skip_inline_ws(&mut self) {
        while matches!(self.peek(), Some(' ') | Some('\t')) {
            self.pos += 1;
        }
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
    }

    /// Skip `NS_ :` and its indented symbol list.
    fn skip_symbol_block(&mut self) {
        self.skip_line();
        while matches!(self.peek(), Some(' ') | Some('\t')) {
            self.skip_line();
        }
    }

    /// Skip an unsupported statement up to its terminating `;`.
    fn skip_statement(&mut self) {
        let mut in_string = false;
        while let Some(c) = self.bump() {
            match c {
                '"' => in_string = !in_string,
                '\\' if in_string => {
                    self.bump();
                }
                ';' if !in_string => break,
                _ => {}
            }
        }
    }

    fn error_here(&self, message: impl Into<String>) -> Box<crate::Error> {
        let len = self.peek().map(char::len_utf8).unwrap_or(0);
        self.ctx.parse_error(message, (self.pos, len))
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            Ok(())
        } else {
            Err(self.error_here(format!("expected '{}'", expected)))
        }
    }

    fn ident(&mut self, what: &str) -> Result<(&'a str, SourceSpan)> {
        let start = self.pos;
        let len = self
            .rest()
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(self.rest().len());
        if len == 0 {
            return Err(self.error_here(format!("expected {}", what)));
        }
        self.pos += len;
        Ok((&self.src[start..self.pos], (start, len).into()))
    }

    fn number_token(&mut self, what: &str) -> Result<(&'a str, SourceSpan)> {
        let start = self.pos;
        let len = self
            .rest()
            .char_indices()
            .find(|&(i, c)| {
                let sign = (c == '-' || c == '+')
                    && (i == 0 || matches!(self.rest()[..i].chars().last(), Some('e' | 'E')));
                !(c.is_ascii_alphanumeric() || c == '.' || sign)
            })
            .map(|(i, _)| i)
            .unwrap_or(self.rest().len());
        if len == 0 {
            return Err(self.error_here(format!("expected {}", what)));
        }
        self.pos += len;
        Ok((&self.src[start..self.pos], (start, len).into()))
    }

    fn uint(&mut self, what: &str) -> Result<u64> {
        self.uint_spanned(what).map(|(value, _)| value)
    }

    fn uint_spanned(&mut self, what: &str) -> Result<(u64, SourceSpan)> {
        let (token, span) = self.number_token(what)?;
        let value = token
            .parse()
            .map_err(|_| self.ctx.parse_error(format!("expected {}", what), span))?;
        Ok((value, span))
    }

    fn u32(&mut self, what: &str) -> Result<u32> {
        let (value, span) = self.uint_spanned(what)?;
        u32::try_from(value)
            .map_err(|_| self.ctx.parse_error(format!("expected {}, found out of range value {}", what, value), span))
    }

    fn int(&mut self, what: &str) -> Result<i64> {
        let (token, span) = self.number_token(what)?;
        token
            .parse()
            .map_err(|_| self.ctx.parse_error(format!("expected {}", what), span))
    }

    fn float(&mut self, what: &str) -> Result<f64> {
        let (token, span) = self.number_token(what)?;
        token
            .parse()
            .map_err(|_| self.ctx.parse_error(format!("expected {}", what), span))
    }

    fn string(&mut self) -> Result<String> {
        let start = self.pos;
        self.expect('"')?;
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(out),
                Some('\\') => {
                    if let Some(c) = self.bump() {
                        out.push(c);
                    }
                }
                Some(c) => out.push(c),
                None => {
                    return Err(self
                        .ctx
                        .parse_error("unterminated string", (start, self.pos - start)));
                }
            }
        }
    }
}

fn parse_multiplex(indicator: &str) -> Option<Multiplex> {
    if indicator == "M" {
        return Some(Multiplex::Multiplexer);
    }
    // Extended multiplexing (`m3M`) is read as a plain multiplexed signal.
    let value = indicator.strip_prefix('m')?.trim_end_matches('M');
    value.parse().ok().map(Multiplex::Multiplexed)
}

fn join(first: SourceSpan, last: SourceSpan) -> SourceSpan {
    let start = first.offset();
    (start, last.offset() + last.len() - start).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"VERSION "1.2"

NS_ :
	NS_DESC_
	CM_
	BA_DEF_

BS_:

BU_: Engine Dash

BO_ 100 EngineData: 8 Engine
 SG_ EngineRpm : 0|16@1+ (0.25,0) [0|16383.75] "rpm" Dash
 SG_ Gear : 16|3@1+ (1,0) [0|7] "" Dash,Vector__XXX
 SG_ Temp : 31|8@0- (1,-40) [-40|87] "degC" Dash

BO_ 2147484672 Diag: 2 Vector__XXX
 SG_ Mode M : 0|4@1+ (1,0) [0|0] "" Dash
 SG_ Code m1 : 8|8@1+ (1,0) [0|0] "" Dash

BA_DEF_ BO_ "GenMsgCycleTime" INT 0 10000;
CM_ "Database comment";
CM_ BU_ Engine "Engine controller";
CM_ BO_ 100 "Engine state";
CM_ SG_ 100 EngineRpm "Crankshaft speed";
VAL_ 100 Gear 0 "GEAR_NEUTRAL" 1 "GEAR_FIRST" 2 "GEAR_SECOND" ;
"#;

    fn parse(src: &str) -> Result<Database> {
        let ctx = SourceContext::new(src, "test.dbc");
        parse_database(&ctx, src)
    }

    #[test]
    fn test_parse_sample() {
        let db = parse(SAMPLE).unwrap();

        assert_eq!(db.version.as_deref(), Some("1.2"));
        assert_eq!(db.nodes.len(), 2);
        assert_eq!(db.nodes[0].comment.as_deref(), Some("Engine controller"));
        assert_eq!(db.messages.len(), 2);

        let engine = &db.messages[0];
        assert_eq!(engine.frame_id, 100);
        assert!(!engine.is_extended_frame);
        assert_eq!(engine.length, 8);
        assert_eq!(engine.senders, ["Engine"]);
        assert_eq!(engine.comment.as_deref(), Some("Engine state"));
        assert_eq!(engine.signals.len(), 3);
    }

    #[test]
    fn test_parse_signal_fields() {
        let db = parse(SAMPLE).unwrap();
        let engine = &db.messages[0];

        let rpm = &engine.signals[0];
        assert_eq!(rpm.start, 0);
        assert_eq!(rpm.length, 16);
        assert_eq!(rpm.byte_order, ByteOrder::LittleEndian);
        assert!(!rpm.is_signed);
        assert_eq!(rpm.scale, 0.25);
        assert_eq!(rpm.maximum, Some(16383.75));
        assert_eq!(rpm.unit.as_deref(), Some("rpm"));
        assert_eq!(rpm.comment.as_deref(), Some("Crankshaft speed"));

        let gear = &engine.signals[1];
        assert_eq!(gear.receivers, ["Dash"]);
        assert_eq!(gear.unit, None);
        assert_eq!(gear.choices.get(&1).map(String::as_str), Some("GEAR_FIRST"));

        let temp = &engine.signals[2];
        assert_eq!(temp.byte_order, ByteOrder::BigEndian);
        assert!(temp.is_signed);
        assert_eq!(temp.offset, -40.0);
        assert_eq!(temp.minimum, Some(-40.0));
    }

    #[test]
    fn test_parse_extended_multiplexed_message() {
        let db = parse(SAMPLE).unwrap();
        let diag = &db.messages[1];

        assert!(diag.is_extended_frame);
        assert_eq!(diag.frame_id, 1024);
        assert!(diag.senders.is_empty());
        assert_eq!(diag.signals[0].multiplex, Multiplex::Multiplexer);
        assert_eq!(diag.signals[1].multiplex, Multiplex::Multiplexed(1));
        assert_eq!(diag.signals[0].minimum, None);
        assert_eq!(diag.multiplexer().map(|s| s.name.as_str()), Some("Mode"));
    }

    #[test]
    fn test_signal_outside_message() {
        let err = parse(" SG_ Lost : 0|8@1+ (1,0) [0|0] \"\" X\n").unwrap_err();
        assert!(matches!(*err, crate::Error::Parse { .. }));
        assert!(err.to_string().contains("outside of a message"));
    }

    #[test]
    fn test_malformed_message() {
        let err = parse("BO_ abc Foo: 8 X\n").unwrap_err();
        assert!(err.to_string().contains("expected a frame id"));
    }

    #[test]
    fn test_message_length_limit() {
        assert!(parse("BO_ 1 Fd: 64 X\n").is_ok());

        let err = parse("BO_ 1 Big: 4000000000 X\n").unwrap_err();
        assert!(matches!(*err, crate::Error::Parse { .. }));
        assert!(err.to_string().contains("message length 4000000000 exceeds 64 bytes"));
    }

    #[test]
    fn test_out_of_range_numbers_are_rejected() {
        let err = parse("BO_ 1 M: 8 X\n SG_ S : 0|4294967304@1+ (1,0) [0|0] \"\" X\n")
            .unwrap_err();
        assert!(err.to_string().contains("expected a signal length, found out of range"));

        let err = parse("BO_ 1 M: 8 X\n SG_ S : 4294967296|8@1+ (1,0) [0|0] \"\" X\n")
            .unwrap_err();
        assert!(err.to_string().contains("expected a start bit, found out of range"));

        let err = parse("BO_ 4294967297 M: 8 X\n").unwrap_err();
        assert!(err.to_string().contains("expected a frame id, found out of range"));
    }

    #[test]
    fn test_unterminated_string() {
        let err = parse("VERSION \"1.0\n").unwrap_err();
        assert!(err.to_string().contains("unterminated string"));
    }

    #[test]
    fn test_parse_multiplex_indicator() {
        assert_eq!(parse_multiplex("M"), Some(Multiplex::Multiplexer));
        assert_eq!(parse_multiplex("m7"), Some(Multiplex::Multiplexed(7)));
        assert_eq!(parse_multiplex("m2M"), Some(Multiplex::Multiplexed(2)));
        assert_eq!(parse_multiplex("x"), None);
    }
}
