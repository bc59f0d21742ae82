use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "deckmeta")]
#[command(
    about = "Archetype classification and metagame reports for tournament decklists",
    long_about = None
)]
#[command(version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// List cached tournament files at or after a date and write the file list.
    Filelist {
        /// Earliest tournament date to include (YYYY-MM-DD)
        #[arg(long)]
        after_date: String,
        /// Substring the filename must contain (e.g. "modern")
        #[arg(long)]
        format: String,
        /// Cache directory root (env: DECKMETA_CACHE_DIR)
        #[arg(long)]
        cache_dir: Option<PathBuf>,
        /// Output JSON summary
        #[arg(long)]
        json: bool,
    },

    /// Copy the listed cache files into the modified working tree.
    CopyWorking,

    /// Recompute DeckCount for every working file.
    Enrich,

    /// Classify every deck in the working files against the archetype ruleset.
    ///
    /// Stops at the first deck no rule matches, or that two archetypes
    /// claim, after saving everything already classified.
    Classify {
        /// Suppress the per-deck echo (halt diagnostics always print)
        #[arg(long)]
        silent: bool,
    },

    /// Manage archetype rules.
    Rule {
        #[command(subcommand)]
        command: RuleCommand,
    },

    /// Archetype frequency breakdown across the classified working files.
    Meta {
        /// Collapse archetypes beyond the top N into "Other"
        #[arg(short = 'n', long)]
        top: Option<usize>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Presence statistics for one card across the classified working files.
    Card {
        name: String,
        /// Restrict to these archetypes (repeatable)
        #[arg(short, long)]
        archetype: Vec<String>,
        /// Restrict to these players (repeatable)
        #[arg(long)]
        player: Vec<String>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub(crate) enum RuleCommand {
    /// Add a rule, or replace the rule with the same name.
    Add {
        name: String,
        /// Archetype label the rule assigns
        #[arg(short, long)]
        archetype: String,
        /// Constraint "<count> <card>"; 0 means the card must be absent (repeatable)
        #[arg(short = 'm', long = "match")]
        matches: Vec<String>,
    },
    /// Delete a rule by name.
    Delete { name: String },
    /// Show a single rule.
    Show {
        name: String,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// List rule names.
    List,
}
