use std::collections::HashMap;

use serde::Serialize;

use crate::types::{CardEntry, TournamentDocument};

/// Archetype labels starting with this prefix are deliberately left out of
/// the metagame breakdown (mirror and test entries).
pub(crate) const IGNORE_PREFIX: &str = "__";

pub(crate) const OTHER_LABEL: &str = "Other";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct MetaRow {
    pub(crate) archetype: String,
    pub(crate) count: u64,
    /// Percent of the full total, collapsed remainder included.
    pub(crate) share: f64,
}

/// Deck counts per archetype across all classified decks, descending, ties
/// kept in first-encounter order. With `truncate = Some(n)` and more than
/// `n + 1` distinct archetypes, everything beyond the top `n` collapses into
/// a single synthetic `Other` row appended after them.
pub(crate) fn metagame_breakdown(
    docs: &[TournamentDocument],
    truncate: Option<usize>,
) -> Vec<MetaRow> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, u64> = HashMap::new();
    for doc in docs {
        for deck in &doc.decks {
            let Some(label) = deck.archetype.as_deref() else {
                continue;
            };
            if label.starts_with(IGNORE_PREFIX) {
                continue;
            }
            if !counts.contains_key(label) {
                order.push(label.to_string());
            }
            *counts.entry(label.to_string()).or_insert(0) += 1;
        }
    }

    let mut rows: Vec<(String, u64)> = order
        .into_iter()
        .map(|label| {
            let count = counts[&label];
            (label, count)
        })
        .collect();
    // Stable sort: equal counts keep first-encounter order.
    rows.sort_by(|a, b| b.1.cmp(&a.1));

    if let Some(n) = truncate {
        if rows.len() > n + 1 {
            let tail: u64 = rows.drain(n..).map(|(_, count)| count).sum();
            rows.push((OTHER_LABEL.to_string(), tail));
        }
    }

    let total: u64 = rows.iter().map(|(_, count)| count).sum();
    rows.into_iter()
        .map(|(archetype, count)| MetaRow {
            archetype,
            count,
            share: if total == 0 {
                0.0
            } else {
                count as f64 * 100.0 / total as f64
            },
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct CardPresence {
    pub(crate) card: String,
    pub(crate) match_count: u64,
    pub(crate) total_count: u64,
    /// Percent of scanned decks containing the card anywhere.
    pub(crate) match_rate: f64,
    /// Average copies over decks where the card was found at all — not over
    /// every deck scanned. A matched deck contributes its mainboard and
    /// sideboard counts even when one of them is 0.
    pub(crate) mainboard_avg: f64,
    pub(crate) sideboard_avg: f64,
}

fn copies_of(entries: &[CardEntry], lowered: &str) -> u64 {
    entries
        .iter()
        .filter(|e| e.name.to_lowercase() == lowered)
        .map(|e| u64::from(e.count))
        .sum()
}

/// Presence statistics for one card over classified decks passing the
/// archetype and player filters; an empty filter restricts nothing.
pub(crate) fn card_presence(
    docs: &[TournamentDocument],
    card: &str,
    archetypes: &[String],
    players: &[String],
) -> CardPresence {
    let lowered = card.to_lowercase();
    let mut total_count = 0u64;
    let mut match_count = 0u64;
    let mut main_sum = 0u64;
    let mut side_sum = 0u64;

    for doc in docs {
        for deck in &doc.decks {
            let Some(label) = deck.archetype.as_deref() else {
                continue;
            };
            if !archetypes.is_empty() && !archetypes.iter().any(|a| a == label) {
                continue;
            }
            if !players.is_empty() && !players.iter().any(|p| p == &deck.player) {
                continue;
            }

            total_count += 1;
            let main = copies_of(&deck.mainboard, &lowered);
            let side = copies_of(&deck.sideboard, &lowered);
            if main + side > 0 {
                match_count += 1;
                main_sum += main;
                side_sum += side;
            }
        }
    }

    let over_matches = |sum: u64| {
        if match_count == 0 {
            0.0
        } else {
            sum as f64 / match_count as f64
        }
    };
    CardPresence {
        card: card.to_string(),
        match_count,
        total_count,
        match_rate: if total_count == 0 {
            0.0
        } else {
            match_count as f64 * 100.0 / total_count as f64
        },
        mainboard_avg: over_matches(main_sum),
        sideboard_avg: over_matches(side_sum),
    }
}
