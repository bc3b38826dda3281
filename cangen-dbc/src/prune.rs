//! Shortening of signal choice names.

use indexmap::IndexMap;

use crate::model::Database;

/// Strip word prefixes and suffixes shared by every choice of a signal.
///
/// `GEAR_NEUTRAL`, `GEAR_FIRST` become `NEUTRAL`, `FIRST`. Every name keeps
/// at least one word.
pub(crate) fn prune_choices(database: &mut Database) {
    for message in &mut database.messages {
        for signal in &mut message.signals {
            prune_signal_choices(&mut signal.choices);
        }
    }
}

fn prune_signal_choices(choices: &mut IndexMap<i64, String>) {
    if choices.len() < 2 {
        return;
    }

    let words: Vec<Vec<&str>> = choices.values().map(|n| n.split('_').collect()).collect();
    let shortest = words.iter().map(Vec::len).min().unwrap_or(0);
    let keep = shortest.saturating_sub(1);

    let mut prefix = 0;
    while prefix < keep && all_share(&words, |_| prefix) {
        prefix += 1;
    }
    let mut suffix = 0;
    while prefix + suffix < keep && all_share(&words, |len| len - 1 - suffix) {
        suffix += 1;
    }
    if prefix == 0 && suffix == 0 {
        return;
    }

    let pruned: Vec<String> = words
        .iter()
        .map(|w| w[prefix..w.len() - suffix].join("_"))
        .collect();
    for (name, new_name) in choices.values_mut().zip(pruned) {
        *name = new_name;
    }
}

/// Whether every name has the same word at `position(word_count)`.
fn all_share(words: &[Vec<&str>], position: impl Fn(usize) -> usize) -> bool {
    let first = words[0][position(words[0].len())];
    words.iter().all(|w| w[position(w.len())] == first)
}
