use serde::{Deserialize, Serialize};

/// One card line of a mainboard or sideboard, in the cache's wire format.
/// Name case is preserved for display; matching lowers it internally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct CardEntry {
    #[serde(rename = "CardName")]
    pub(crate) name: String,
    #[serde(rename = "Count")]
    pub(crate) count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Decklist {
    #[serde(rename = "Player", default)]
    pub(crate) player: String,
    #[serde(rename = "Mainboard", default)]
    pub(crate) mainboard: Vec<CardEntry>,
    #[serde(rename = "Sideboard", default)]
    pub(crate) sideboard: Vec<CardEntry>,
    /// Written by the classification pipeline; absent until a rule resolves.
    #[serde(
        rename = "Archetype",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) archetype: Option<String>,
    /// Fields this tool does not interpret (date, result, anchor URIs, ...)
    /// round-trip through here untouched.
    #[serde(flatten)]
    pub(crate) extra: serde_json::Map<String, serde_json::Value>,
}

/// A whole tournament document as stored in the cache. `DeckCount` is
/// refreshed from `Decks` on every save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TournamentDocument {
    #[serde(rename = "Decks", default)]
    pub(crate) decks: Vec<Decklist>,
    #[serde(rename = "DeckCount", default)]
    pub(crate) deck_count: u64,
    #[serde(flatten)]
    pub(crate) extra: serde_json::Map<String, serde_json::Value>,
}

/// One card/count condition inside a rule. A positive count is an inclusion
/// minimum; zero means the deck must not contain the card at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Constraint {
    pub(crate) card: String,
    pub(crate) count: u32,
}

/// A named conjunction of constraints mapping decks to one archetype label.
/// Rule names are unique within a ruleset; archetype labels are not —
/// several rule shapes may describe the same archetype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Rule {
    pub(crate) name: String,
    pub(crate) archetype: String,
    pub(crate) matches: Vec<Constraint>,
}
