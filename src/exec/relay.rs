// src/exec/relay.rs

//! Output relay: stream a child's stdout and stderr, line by line, into the
//! store and out through the event hub.
//!
//! One reader task per stream feeds a single sink task over a bounded
//! channel. The sink is the only writer for a running command's captured
//! output, so lines within a stream keep their order. Ordering across the
//! two streams is whatever the channel saw first; no promise is made there.
//!
//! A read failure on a stream ends that stream's relay and is logged, but
//! never fails the command: the exit code decides the command's fate.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{ChildStderr, ChildStdout};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::events::{Event, EventHub};
use crate::store::StateStore;
use crate::types::StreamKind;

#[derive(Debug)]
struct RelayLine {
    stream: StreamKind,
    line: String,
}

/// Spawn the reader tasks and the sink. The returned handle completes after
/// both streams hit end-of-input and every captured line has been persisted
/// and broadcast; the reaper awaits it before finalizing the run.
pub fn spawn_relay(
    command_id: String,
    stdout: Option<ChildStdout>,
    stderr: Option<ChildStderr>,
    store: Arc<dyn StateStore>,
    events: EventHub,
    buffer: usize,
) -> JoinHandle<()> {
    let (tx, rx) = mpsc::channel::<RelayLine>(buffer.max(1));

    if let Some(stdout) = stdout {
        spawn_reader(command_id.clone(), StreamKind::Stdout, stdout, tx.clone());
    }
    if let Some(stderr) = stderr {
        spawn_reader(command_id.clone(), StreamKind::Stderr, stderr, tx.clone());
    }
    // The sink finishes once every reader has dropped its sender.
    drop(tx);

    tokio::spawn(sink(command_id, rx, store, events))
}

fn spawn_reader<R>(command_id: String, stream: StreamKind, reader: R, tx: mpsc::Sender<RelayLine>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(RelayLine { stream, line }).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    warn!(command = %command_id, stream = %stream, error = %err, "stream read failed");
                    break;
                }
            }
        }
        debug!(command = %command_id, stream = %stream, "stream closed");
    });
}

async fn sink(
    command_id: String,
    mut rx: mpsc::Receiver<RelayLine>,
    store: Arc<dyn StateStore>,
    events: EventHub,
) {
    while let Some(RelayLine { stream, line }) = rx.recv().await {
        append_line(&store, &command_id, stream, &line);
        events.emit(Event::OutputLine {
            command_id: command_id.clone(),
            stream,
            line,
        });
    }
}

fn append_line(store: &Arc<dyn StateStore>, command_id: &str, stream: StreamKind, line: &str) {
    match store.get(command_id) {
        Ok(Some(mut def)) => {
            def.append_line(stream, line.to_string());
            if let Err(err) = store.put(&def) {
                warn!(command = %command_id, error = %err, "failed to persist output line");
            }
        }
        Ok(None) => {
            warn!(command = %command_id, "definition vanished while relaying output");
        }
        Err(err) => {
            warn!(command = %command_id, error = %err, "failed to load definition for output line");
        }
    }
}
