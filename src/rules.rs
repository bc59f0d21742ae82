use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{MetaError, Result};
use crate::types::{Constraint, Rule};
use crate::util::write_json_atomic;

/// The archetype ruleset together with the file it lives in. Every mutation
/// writes the whole ruleset back before returning, so the file is always the
/// source of truth for the next classification pass.
#[derive(Debug)]
pub(crate) struct RuleStore {
    path: PathBuf,
    rules: Vec<Rule>,
}

impl RuleStore {
    /// A missing file is an empty ruleset (first run). An unreadable file is
    /// an I/O error; anything unparseable or with duplicate rule names is
    /// `MalformedRuleset`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self {
                path: path.to_path_buf(),
                rules: Vec::new(),
            });
        }
        let data = std::fs::read_to_string(path).map_err(|e| MetaError::io(path, e))?;
        let rules: Vec<Rule> =
            serde_json::from_str(&data).map_err(|e| MetaError::MalformedRuleset {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.name.as_str()) {
                return Err(MetaError::MalformedRuleset {
                    path: path.to_path_buf(),
                    reason: format!("duplicate rule name '{}'", rule.name),
                });
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            rules,
        })
    }

    pub(crate) fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Exact, case-sensitive name lookup.
    pub(crate) fn find(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Sorted rule names, for display only.
    pub(crate) fn list_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.rules.iter().map(|r| r.name.clone()).collect();
        names.sort();
        names
    }

    /// Replace the rule with the same name in place (keeping its position),
    /// or append. Idempotent under repeated identical calls.
    pub(crate) fn upsert(&mut self, rule: Rule) -> Result<()> {
        validate_rule(&rule)?;
        match self.rules.iter_mut().find(|r| r.name == rule.name) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
        self.persist()
    }

    /// Remove by name, reporting whether a rule was found. The file is only
    /// rewritten when something changed.
    pub(crate) fn delete(&mut self, name: &str) -> Result<bool> {
        let before = self.rules.len();
        self.rules.retain(|r| r.name != name);
        if self.rules.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    fn persist(&self) -> Result<()> {
        // Pretty-printed: the ruleset file is user-maintained.
        write_json_atomic(&self.path, &self.rules, true)
    }
}

fn validate_rule(rule: &Rule) -> Result<()> {
    if rule.name.trim().is_empty() {
        return Err(MetaError::InvalidRule {
            reason: "rule name must not be empty".to_string(),
        });
    }
    if rule.archetype.trim().is_empty() {
        return Err(MetaError::InvalidRule {
            reason: "archetype label must not be empty".to_string(),
        });
    }
    if rule.matches.is_empty() {
        return Err(MetaError::InvalidRule {
            reason: "a rule needs at least one constraint".to_string(),
        });
    }
    for m in &rule.matches {
        if m.card.trim().is_empty() {
            return Err(MetaError::InvalidRule {
                reason: "constraint card name must not be empty".to_string(),
            });
        }
    }
    Ok(())
}

/// Parse a CLI constraint of the form `<count> <card>`. Zero is an
/// exclusion; negative counts are rejected here, at rule-creation time.
pub(crate) fn parse_constraint(raw: &str) -> Result<Constraint> {
    let trimmed = raw.trim();
    let Some((count_part, card_part)) = trimmed.split_once(char::is_whitespace) else {
        return Err(MetaError::InvalidRule {
            reason: format!("constraint '{raw}' is not of the form '<count> <card>'"),
        });
    };
    let count: i64 = count_part.parse().map_err(|_| MetaError::InvalidRule {
        reason: format!("constraint '{raw}' has a non-numeric count"),
    })?;
    if count < 0 {
        return Err(MetaError::InvalidRule {
            reason: format!("constraint '{raw}' has a negative count"),
        });
    }
    let card = card_part.trim();
    if card.is_empty() {
        return Err(MetaError::InvalidRule {
            reason: format!("constraint '{raw}' is missing a card name"),
        });
    }
    Ok(Constraint {
        card: card.to_string(),
        count: count as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_rules_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("deckmeta_test");
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(format!("rules_{}_{name}.json", std::process::id()))
    }

    fn rule(name: &str, archetype: &str, card: &str, count: u32) -> Rule {
        Rule {
            name: name.to_string(),
            archetype: archetype.to_string(),
            matches: vec![Constraint {
                card: card.to_string(),
                count,
            }],
        }
    }

    #[test]
    fn missing_file_is_an_empty_ruleset() {
        let path = temp_rules_path("missing");
        let _ = std::fs::remove_file(&path);
        let store = RuleStore::load(&path).unwrap();
        assert!(store.rules().is_empty());
    }

    #[test]
    fn round_trip_preserves_rules() {
        let path = temp_rules_path("round_trip");
        let _ = std::fs::remove_file(&path);

        let mut store = RuleStore::load(&path).unwrap();
        store.upsert(rule("burn", "Burn", "Lightning Bolt", 4)).unwrap();
        store.upsert(rule("tron", "Tron", "Urza's Tower", 4)).unwrap();

        let reloaded = RuleStore::load(&path).unwrap();
        assert_eq!(reloaded.rules(), store.rules());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn upsert_replaces_in_place_keeping_position() {
        let path = temp_rules_path("upsert_position");
        let _ = std::fs::remove_file(&path);

        let mut store = RuleStore::load(&path).unwrap();
        store.upsert(rule("a", "A", "Card A", 1)).unwrap();
        store.upsert(rule("b", "B", "Card B", 1)).unwrap();
        store.upsert(rule("a", "A2", "Card A", 2)).unwrap();

        assert_eq!(store.rules().len(), 2);
        assert_eq!(store.rules()[0].name, "a");
        assert_eq!(store.rules()[0].archetype, "A2");
        assert_eq!(store.rules()[1].name, "b");
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn repeated_identical_upsert_is_idempotent() {
        let path = temp_rules_path("idempotent");
        let _ = std::fs::remove_file(&path);

        let mut store = RuleStore::load(&path).unwrap();
        store.upsert(rule("a", "A", "Card A", 1)).unwrap();
        let first = std::fs::read_to_string(&path).unwrap();
        store.upsert(rule("a", "A", "Card A", 1)).unwrap();
        let second = std::fs::read_to_string(&path).unwrap();

        assert_eq!(first, second);
        assert_eq!(store.rules().len(), 1);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn delete_missing_reports_false_and_leaves_file_alone() {
        let path = temp_rules_path("delete_missing");
        let _ = std::fs::remove_file(&path);

        let mut store = RuleStore::load(&path).unwrap();
        store.upsert(rule("a", "A", "Card A", 1)).unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        assert!(!store.delete("nonexistent").unwrap());
        let after = std::fs::read_to_string(&path).unwrap();
        assert_eq!(before, after);

        assert!(store.delete("a").unwrap());
        assert!(store.rules().is_empty());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn find_is_case_sensitive() {
        let path = temp_rules_path("find_case");
        let _ = std::fs::remove_file(&path);

        let mut store = RuleStore::load(&path).unwrap();
        store.upsert(rule("Burn", "Burn", "Lightning Bolt", 4)).unwrap();
        assert!(store.find("Burn").is_some());
        assert!(store.find("burn").is_none());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn list_names_is_sorted() {
        let path = temp_rules_path("list_names");
        let _ = std::fs::remove_file(&path);

        let mut store = RuleStore::load(&path).unwrap();
        store.upsert(rule("zoo", "Zoo", "Wild Nacatl", 4)).unwrap();
        store.upsert(rule("burn", "Burn", "Lightning Bolt", 4)).unwrap();
        assert_eq!(store.list_names(), vec!["burn".to_string(), "zoo".to_string()]);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn duplicate_names_in_file_are_malformed() {
        let path = temp_rules_path("duplicates");
        std::fs::write(
            &path,
            r#"[{"name":"a","archetype":"A","matches":[]},{"name":"a","archetype":"B","matches":[]}]"#,
        )
        .unwrap();
        assert!(matches!(
            RuleStore::load(&path),
            Err(MetaError::MalformedRuleset { .. })
        ));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn garbage_file_is_malformed() {
        let path = temp_rules_path("garbage");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            RuleStore::load(&path),
            Err(MetaError::MalformedRuleset { .. })
        ));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn negative_count_in_file_is_malformed() {
        let path = temp_rules_path("negative_file");
        std::fs::write(
            &path,
            r#"[{"name":"a","archetype":"A","matches":[{"card":"X","count":-1}]}]"#,
        )
        .unwrap();
        assert!(matches!(
            RuleStore::load(&path),
            Err(MetaError::MalformedRuleset { .. })
        ));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn parse_constraint_forms() {
        let c = parse_constraint("4 Lightning Bolt").unwrap();
        assert_eq!(c.card, "Lightning Bolt");
        assert_eq!(c.count, 4);

        let exclusion = parse_constraint("0 Ragavan").unwrap();
        assert_eq!(exclusion.count, 0);

        assert!(parse_constraint("-1 Ragavan").is_err());
        assert!(parse_constraint("four Bolts").is_err());
        assert!(parse_constraint("4").is_err());
    }

    #[test]
    fn empty_fields_are_rejected_at_creation() {
        let path = temp_rules_path("validation");
        let _ = std::fs::remove_file(&path);
        let mut store = RuleStore::load(&path).unwrap();

        assert!(store.upsert(rule("", "A", "Card", 1)).is_err());
        assert!(store.upsert(rule("a", "", "Card", 1)).is_err());
        assert!(store.upsert(rule("a", "A", " ", 1)).is_err());
        assert!(
            store
                .upsert(Rule {
                    name: "a".to_string(),
                    archetype: "A".to_string(),
                    matches: Vec::new(),
                })
                .is_err()
        );
        assert!(!path.exists());
    }
}
