use std::collections::HashMap;

use crate::types::{CardEntry, Rule};

/// A deck's mainboard card multiset, keyed by lowercased name. All case
/// normalization for matching lives here; callers never pre-lower.
#[derive(Debug, Default)]
pub(crate) struct CardPool {
    copies: HashMap<String, u32>,
}

impl CardPool {
    pub(crate) fn from_entries(entries: &[CardEntry]) -> Self {
        let mut copies: HashMap<String, u32> = HashMap::new();
        for entry in entries {
            *copies.entry(entry.name.to_lowercase()).or_insert(0) += entry.count;
        }
        Self { copies }
    }

    pub(crate) fn copies(&self, card: &str) -> u32 {
        self.copies.get(&card.to_lowercase()).copied().unwrap_or(0)
    }
}

/// True iff every constraint of `rule` holds against the pool. Short-circuits
/// on the first failing constraint; constraint order affects nothing else.
pub(crate) fn rule_matches(pool: &CardPool, rule: &Rule) -> bool {
    rule.matches.iter().all(|m| {
        let have = pool.copies(&m.card);
        if m.count == 0 {
            have == 0
        } else {
            have >= m.count
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Constraint;

    fn card(name: &str, count: u32) -> CardEntry {
        CardEntry {
            name: name.to_string(),
            count,
        }
    }

    fn rule(constraints: &[(&str, u32)]) -> Rule {
        Rule {
            name: "r".to_string(),
            archetype: "A".to_string(),
            matches: constraints
                .iter()
                .map(|(card, count)| Constraint {
                    card: card.to_string(),
                    count: *count,
                })
                .collect(),
        }
    }

    #[test]
    fn exclusion_matches_only_absent_card() {
        let r = rule(&[("Ragavan", 0)]);
        let without = CardPool::from_entries(&[card("Island", 20)]);
        let with = CardPool::from_entries(&[card("Ragavan", 1), card("Island", 20)]);
        assert!(rule_matches(&without, &r));
        assert!(!rule_matches(&with, &r));
    }

    #[test]
    fn threshold_is_at_least_count() {
        let r = rule(&[("Lightning Bolt", 4)]);
        let short = CardPool::from_entries(&[card("Lightning Bolt", 3)]);
        let exact = CardPool::from_entries(&[card("Lightning Bolt", 4)]);
        assert!(!rule_matches(&short, &r));
        assert!(rule_matches(&exact, &r));
    }

    #[test]
    fn matching_is_monotonic_in_copy_count() {
        let r = rule(&[("Thoughtseize", 2)]);
        for copies in 0..6 {
            let pool = CardPool::from_entries(&[card("Thoughtseize", copies)]);
            assert_eq!(rule_matches(&pool, &r), copies >= 2);
        }
    }

    #[test]
    fn name_case_is_insignificant() {
        let r = rule(&[("lightning BOLT", 4)]);
        let pool = CardPool::from_entries(&[card("Lightning Bolt", 4)]);
        assert!(rule_matches(&pool, &r));
    }

    #[test]
    fn duplicate_entries_accumulate() {
        // Split card lines still count as one multiset.
        let pool = CardPool::from_entries(&[card("Island", 2), card("island", 3)]);
        assert_eq!(pool.copies("Island"), 5);
    }

    #[test]
    fn all_constraints_must_hold() {
        let r = rule(&[("Island", 4), ("Mountain", 0)]);
        let ok = CardPool::from_entries(&[card("Island", 4)]);
        let bad = CardPool::from_entries(&[card("Island", 4), card("Mountain", 1)]);
        assert!(rule_matches(&ok, &r));
        assert!(!rule_matches(&bad, &r));
    }
}
