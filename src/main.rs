mod classify;
mod cli;
mod error;
mod files;
mod matcher;
mod pipeline;
mod rules;
mod stats;
mod types;
mod util;

use clap::Parser;

use cli::{Cli, Command, RuleCommand};
use pipeline::{HaltReason, PipelineReport};
use rules::{RuleStore, parse_constraint};
use types::{Rule, TournamentDocument};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Filelist {
            after_date,
            format,
            cache_dir,
            json,
        } => {
            let root = util::resolve_cache_root(cache_dir);
            let after = files::parse_after_date(&after_date)?;
            let found = files::collect_cache_files(&root, after, &format)?;
            let list_path = util::resolve_filelist_path();
            files::write_filelist(&list_path, &found)?;

            if json {
                let summary = serde_json::json!({
                    "files": found.len(),
                    "list": list_path,
                });
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "Found {} files, written to '{}'",
                    found.len(),
                    list_path.display()
                );
            }
            Ok(())
        }

        Command::CopyWorking => {
            let sources = files::load_filelist(&util::resolve_filelist_path())?;
            let modified_root = util::resolve_modified_root();
            let working = files::materialize_working_copies(&sources, &modified_root)?;
            let working_path = util::working_filelist_path();
            files::write_filelist(&working_path, &working)?;
            println!(
                "Copied {} files into '{}', list at '{}'",
                working.len(),
                modified_root,
                working_path.display()
            );
            Ok(())
        }

        Command::Enrich => {
            let paths = files::load_filelist(&util::working_filelist_path())?;
            let decks = files::enrich_documents(&paths)?;
            println!("Enriched {} files ({decks} decks)", paths.len());
            Ok(())
        }

        Command::Classify { silent } => {
            let store = RuleStore::load(&util::resolve_rules_path())?;
            let paths = files::load_filelist(&util::working_filelist_path())?;
            let report = pipeline::classify_working_files(&paths, store.rules(), silent)?;

            match report {
                PipelineReport::Completed { files, decks } => {
                    println!("Classified {decks} decks across {files} files");
                }
                PipelineReport::Halted {
                    file,
                    player,
                    deck,
                    reason,
                } => {
                    match &reason {
                        HaltReason::Unmatched => {
                            eprintln!("No rule matched {player}'s deck in '{}':", file.display());
                        }
                        HaltReason::Ambiguous(names) => {
                            eprintln!(
                                "Rules [{}] disagree on {player}'s deck in '{}':",
                                names.join(", "),
                                file.display()
                            );
                        }
                    }
                    eprint!("{}", pipeline::format_deck(&deck));
                    eprintln!("Fix the ruleset and re-run.");
                }
            }
            // A halt is a normal outcome, not a failure.
            Ok(())
        }

        Command::Rule { command } => run_rule_command(command),

        Command::Meta { top, json } => {
            let docs = load_working_docs()?;
            let rows = stats::metagame_breakdown(&docs, top);
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for row in &rows {
                    println!("{}, {}, {:.1}%", row.archetype, row.count, row.share);
                }
            }
            Ok(())
        }

        Command::Card {
            name,
            archetype,
            player,
            json,
        } => {
            let docs = load_working_docs()?;
            let presence = stats::card_presence(&docs, &name, &archetype, &player);
            if json {
                println!("{}", serde_json::to_string_pretty(&presence)?);
            } else {
                println!(
                    "{}: {}/{} decks ({:.1}%), avg {:.2} main / {:.2} side where played",
                    presence.card,
                    presence.match_count,
                    presence.total_count,
                    presence.match_rate,
                    presence.mainboard_avg,
                    presence.sideboard_avg
                );
            }
            Ok(())
        }
    }
}

fn load_working_docs() -> error::Result<Vec<TournamentDocument>> {
    files::load_working_documents(&util::working_filelist_path())
}

fn run_rule_command(command: RuleCommand) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = RuleStore::load(&util::resolve_rules_path())?;

    match command {
        RuleCommand::Add {
            name,
            archetype,
            matches,
        } => {
            let constraints = matches
                .iter()
                .map(|raw| parse_constraint(raw))
                .collect::<error::Result<Vec<_>>>()?;
            store.upsert(Rule {
                name: name.clone(),
                archetype,
                matches: constraints,
            })?;
            println!("Saved rule '{name}'");
            Ok(())
        }

        RuleCommand::Delete { name } => {
            // Not finding the rule is reported, not fatal.
            if store.delete(&name)? {
                println!("Deleted rule '{name}'");
            } else {
                println!("No rule named '{name}'");
            }
            Ok(())
        }

        RuleCommand::Show { name, json } => {
            match store.find(&name) {
                Some(rule) if json => println!("{}", serde_json::to_string_pretty(rule)?),
                Some(rule) => {
                    println!("{} -> {}", rule.name, rule.archetype);
                    for m in &rule.matches {
                        if m.count == 0 {
                            println!("  no {}", m.card);
                        } else {
                            println!("  at least {} {}", m.count, m.card);
                        }
                    }
                }
                None => println!("No rule named '{name}'"),
            }
            Ok(())
        }

        RuleCommand::List => {
            for name in store.list_names() {
                println!("{name}");
            }
            Ok(())
        }
    }
}
