// src/config/validate.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::warn;

use crate::config::deck::{DeckFile, RawDeckFile};
use crate::errors::{CmdchainError, Result};
use crate::model::ArgumentKind;

impl TryFrom<RawDeckFile> for DeckFile {
    type Error = crate::errors::CmdchainError;

    fn try_from(raw: RawDeckFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_deck(&raw)?;
        Ok(DeckFile::new_unchecked(raw.command))
    }
}

fn validate_raw_deck(deck: &RawDeckFile) -> Result<()> {
    ensure_has_commands(deck)?;
    validate_commands(deck)?;
    check_deck_cycles(deck);
    Ok(())
}

fn ensure_has_commands(deck: &RawDeckFile) -> Result<()> {
    if deck.command.is_empty() {
        return Err(CmdchainError::ConfigError(
            "deck must contain at least one [command.<id>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_commands(deck: &RawDeckFile) -> Result<()> {
    for (id, command) in deck.command.iter() {
        if command.executable.trim().is_empty() {
            return Err(CmdchainError::ConfigError(format!(
                "command '{}' has an empty executable",
                id
            )));
        }
        for dep in command.depends_on.iter() {
            if dep == id {
                return Err(CmdchainError::ConfigError(format!(
                    "command '{}' cannot depend on itself in `depends_on`",
                    id
                )));
            }
        }
        for arg in command.argument.iter() {
            if arg.kind == ArgumentKind::Variable && arg.source_command_id.as_deref() == Some(id) {
                return Err(CmdchainError::ConfigError(format!(
                    "command '{}' cannot use itself as a variable argument source",
                    id
                )));
            }
        }
    }
    Ok(())
}

/// Cycles among deck-internal dependencies are suspicious but not fatal:
/// runs are manual, and dependency checks look at recorded statuses, so a
/// cycle can still be worked through one command at a time. References to
/// commands outside the deck are ignored here; the store may already hold
/// them.
fn check_deck_cycles(deck: &RawDeckFile) {
    // Edge direction: dependency -> dependent.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for id in deck.command.keys() {
        graph.add_node(id.as_str());
    }

    for (id, command) in deck.command.iter() {
        for dep in command.depends_on.iter() {
            if deck.command.contains_key(dep) {
                graph.add_edge(dep.as_str(), id.as_str(), ());
            }
        }
        for arg in command.argument.iter() {
            if arg.kind != ArgumentKind::Variable {
                continue;
            }
            if let Some(source) = arg.source_command_id.as_deref() {
                if deck.command.contains_key(source) {
                    graph.add_edge(source, id.as_str(), ());
                }
            }
        }
    }

    if let Err(cycle) = toposort(&graph, None) {
        warn!(
            command = %cycle.node_id(),
            "dependency cycle in deck; the commands involved can never all be ready at once"
        );
    }
}
