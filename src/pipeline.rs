use std::fmt::Write as _;
use std::path::PathBuf;

use crate::classify::{Classification, classify};
use crate::error::Result;
use crate::files::{load_document, save_document};
use crate::types::{Decklist, Rule};

/// Terminal state of a classification pass. Callers branch on the variant:
/// a halt is an ordinary outcome that asks for a ruleset edit, not an error.
#[derive(Debug)]
pub(crate) enum PipelineReport {
    Completed {
        files: usize,
        decks: usize,
    },
    Halted {
        file: PathBuf,
        player: String,
        deck: Decklist,
        reason: HaltReason,
    },
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum HaltReason {
    Unmatched,
    Ambiguous(Vec<String>),
}

/// Classify every deck in every working file, writing each file back as it
/// finishes. The first unresolved deck stops the whole pass — after the
/// current file is persisted with everything already classified, so no
/// resolved work is lost. Re-running after a ruleset fix re-classifies
/// already-resolved files, which is idempotent.
///
/// `silent` suppresses the per-deck echo only; the caller still prints the
/// halt diagnostic.
pub(crate) fn classify_working_files(
    paths: &[PathBuf],
    rules: &[Rule],
    silent: bool,
) -> Result<PipelineReport> {
    let mut decks_classified = 0usize;
    for path in paths {
        let mut doc = load_document(path)?;
        for idx in 0..doc.decks.len() {
            let reason = match classify(&doc.decks[idx], rules) {
                Classification::Resolved(label) => {
                    if !silent {
                        println!("{}: {} -> {label}", path.display(), doc.decks[idx].player);
                    }
                    doc.decks[idx].archetype = Some(label);
                    decks_classified += 1;
                    continue;
                }
                Classification::Ambiguous(rule_names) => HaltReason::Ambiguous(rule_names),
                Classification::Unmatched => HaltReason::Unmatched,
            };

            let deck = doc.decks[idx].clone();
            save_document(path, &mut doc)?;
            return Ok(PipelineReport::Halted {
                file: path.clone(),
                player: deck.player.clone(),
                deck,
                reason,
            });
        }
        save_document(path, &mut doc)?;
    }
    Ok(PipelineReport::Completed {
        files: paths.len(),
        decks: decks_classified,
    })
}

/// The full decklist as `<count> <name>` lines, mainboard then sideboard,
/// for halt diagnostics.
pub(crate) fn format_deck(deck: &Decklist) -> String {
    let mut out = String::new();
    for entry in &deck.mainboard {
        let _ = writeln!(out, "{} {}", entry.count, entry.name);
    }
    if !deck.sideboard.is_empty() {
        let _ = writeln!(out, "Sideboard");
        for entry in &deck.sideboard {
            let _ = writeln!(out, "{} {}", entry.count, entry.name);
        }
    }
    out
}
