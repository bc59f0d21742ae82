use crate::matcher::{CardPool, rule_matches};
use crate::types::{Decklist, Rule};

/// Outcome of classifying one deck against the full ruleset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Classification {
    Resolved(String),
    /// The matching rules span two or more distinct archetype labels. Carries
    /// the rule names (not the labels) so the operator can see which rules
    /// need tightening.
    Ambiguous(Vec<String>),
    Unmatched,
}

/// Classify a deck by evaluating every rule against its mainboard multiset.
///
/// Matching rules reduce to the set of distinct archetype labels they
/// produce before any conflict is declared: two rules that describe the same
/// archetype are variants, not a contradiction. Only when the surviving
/// labels still disagree does the deck come back `Ambiguous`.
pub(crate) fn classify(deck: &Decklist, rules: &[Rule]) -> Classification {
    let pool = CardPool::from_entries(&deck.mainboard);
    let matching: Vec<&Rule> = rules.iter().filter(|r| rule_matches(&pool, r)).collect();

    let mut labels: Vec<&str> = Vec::new();
    for rule in &matching {
        if !labels.contains(&rule.archetype.as_str()) {
            labels.push(rule.archetype.as_str());
        }
    }

    match labels.len() {
        0 => Classification::Unmatched,
        1 => Classification::Resolved(labels[0].to_string()),
        _ => Classification::Ambiguous(matching.iter().map(|r| r.name.clone()).collect()),
    }
}
