//! Strict consistency checks run after parsing.

use std::collections::HashMap;

use crate::{
    Result,
    error::SourceContext,
    model::{Database, MAX_MESSAGE_LENGTH, Message, Multiplex, Signal},
};

/// Check message uniqueness and signal layout.
pub(crate) fn validate_database(ctx: &SourceContext, database: &Database) -> Result<()> {
    let mut names = HashMap::new();
    let mut frame_ids = HashMap::new();

    for message in &database.messages {
        if let Some(first) = names.insert(message.name.as_str(), message) {
            return Err(ctx.consistency_error(
                format!(
                    "message '{}' is defined more than once (first with frame id {:#x})",
                    message.name, first.frame_id
                ),
                message.span,
            ));
        }
        let key = (message.frame_id, message.is_extended_frame);
        if let Some(first) = frame_ids.insert(key, message) {
            return Err(ctx.consistency_error(
                format!(
                    "messages '{}' and '{}' share frame id {:#x}",
                    first.name, message.name, message.frame_id
                ),
                message.span,
            ));
        }
        validate_layout(ctx, message)?;
    }
    Ok(())
}

fn validate_layout(ctx: &SourceContext, message: &Message) -> Result<()> {
    if u64::from(message.length) > MAX_MESSAGE_LENGTH {
        return Err(ctx.consistency_error(
            format!(
                "message '{}' is {} bytes long (at most {} allowed)",
                message.name, message.length, MAX_MESSAGE_LENGTH
            ),
            message.span,
        ));
    }
    let bits = i64::from(message.length) * 8;

    for signal in &message.signals {
        if signal.length == 0 || signal.length > 64 {
            return Err(ctx.consistency_error(
                format!(
                    "signal '{}' has unsupported length {} (must be 1..=64 bits)",
                    signal.name, signal.length
                ),
                signal.span,
            ));
        }
        if signal.bit_positions().iter().any(|&p| p < 0 || p >= bits) {
            return Err(ctx.consistency_error(
                format!(
                    "signal '{}' does not fit in message '{}' ({} bytes)",
                    signal.name, message.name, message.length
                ),
                signal.span,
            ));
        }
    }

    // Signals outside any multiplex group must not overlap, and each group
    // must not overlap with them or with itself.
    let (shared, multiplexed): (Vec<&Signal>, Vec<&Signal>) = message
        .signals
        .iter()
        .partition(|s| !matches!(s.multiplex, Multiplex::Multiplexed(_)));

    let mut groups: HashMap<u64, Vec<&Signal>> = HashMap::new();
    for signal in multiplexed {
        if let Multiplex::Multiplexed(id) = signal.multiplex {
            groups.entry(id).or_default().push(signal);
        }
    }

    check_overlap(ctx, message, &shared)?;
    for group in groups.values() {
        let signals: Vec<&Signal> = shared.iter().chain(group.iter()).copied().collect();
        check_overlap(ctx, message, &signals)?;
    }
    Ok(())
}

fn check_overlap(ctx: &SourceContext, message: &Message, signals: &[&Signal]) -> Result<()> {
    let mut owners: Vec<Option<&str>> = vec![None; message.length as usize * 8];

    for signal in signals {
        for pos in signal.bit_positions() {
            let slot = &mut owners[pos as usize];
            if let Some(owner) = *slot {
                return Err(ctx.consistency_error(
                    format!(
                        "signals '{}' and '{}' overlap in message '{}'",
                        owner, signal.name, message.name
                    ),
                    signal.span,
                ));
            }
            *slot = Some(signal.name.as_str());
        }
    }
    Ok(())
}
