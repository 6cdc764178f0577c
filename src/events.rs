// src/events.rs

//! Event hub: a broadcast channel carrying everything observers need to
//! mirror state changes live.
//!
//! Every mutation of a command (created / updated / deleted), every captured
//! output line and every status change is published here. Subscribers that
//! fall behind lose the oldest events (tokio broadcast semantics); the store
//! always holds the full picture, so a lagging subscriber can re-read it.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;

use crate::model::CommandDefinition;
use crate::types::{CommandStatus, StreamKind};

/// Events observable while commands are managed and run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Event {
    CommandCreated {
        command: CommandDefinition,
    },
    CommandUpdated {
        command: CommandDefinition,
    },
    CommandDeleted {
        command_id: String,
    },
    /// One line captured from a running command's stdout or stderr.
    OutputLine {
        command_id: String,
        stream: StreamKind,
        line: String,
    },
    StatusChanged {
        command_id: String,
        status: CommandStatus,
        return_code: Option<i32>,
    },
}

/// Cheaply cloneable handle publishing [`Event`]s to any number of
/// subscribers. Publishing with no subscribers is fine and drops the event.
#[derive(Debug, Clone)]
pub struct EventHub {
    tx: broadcast::Sender<Event>,
}

impl EventHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        EventHub { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: Event) {
        trace!(?event, "emit");
        // Err here only means nobody is listening right now.
        let _ = self.tx.send(event);
    }
}

impl Default for EventHub {
    fn default() -> Self {
        EventHub::new(256)
    }
}
