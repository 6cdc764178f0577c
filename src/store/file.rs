// src/store/file.rs

//! JSON-file-backed state store.
//!
//! The whole state is one serde document, kept in memory behind a mutex and
//! rewritten to disk after every mutation. Writes go to a sibling `.tmp`
//! file first and are renamed into place, so a crash mid-write leaves the
//! previous document intact.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::Result;
use crate::model::CommandDefinition;
use crate::store::{ArgumentHistory, CommandStore, VariableStore, WorkingDirHistory};

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    inner: Mutex<Document>,
}

/// On-disk shape. Same camelCase convention as the command blobs themselves.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Document {
    commands: BTreeMap<String, CommandDefinition>,
    argument_history: Vec<HistoryRow>,
    variables: BTreeMap<String, String>,
    working_dir_history: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryRow {
    command_id: String,
    argument: String,
    value: String,
}

impl FileStore {
    /// Open (or create) the store at `path`. A missing file starts empty;
    /// a present but unparsable file is an error, never silently discarded.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let document = if path.is_file() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("reading state file {:?}", path))?;
            serde_json::from_str(&raw)?
        } else {
            Document::default()
        };
        debug!(path = %path.display(), "opened file store");
        Ok(FileStore {
            path,
            inner: Mutex::new(document),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Document> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `mutate` to the document and flush the result to disk.
    fn update<R>(&self, mutate: impl FnOnce(&mut Document) -> R) -> Result<R> {
        let mut doc = self.lock();
        let out = mutate(&mut doc);
        self.flush(&doc)?;
        Ok(out)
    }

    fn flush(&self, doc: &Document) -> Result<()> {
        let raw = serde_json::to_vec_pretty(doc)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating dir {:?}", parent))?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &raw).with_context(|| format!("writing state file {:?}", tmp))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing state file {:?}", self.path))?;
        Ok(())
    }
}

impl CommandStore for FileStore {
    fn get(&self, id: &str) -> Result<Option<CommandDefinition>> {
        Ok(self.lock().commands.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<CommandDefinition>> {
        Ok(self.lock().commands.values().cloned().collect())
    }

    fn put(&self, def: &CommandDefinition) -> Result<()> {
        self.update(|doc| {
            doc.commands.insert(def.id.clone(), def.clone());
        })
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.update(|doc| {
            doc.commands.remove(id);
        })
    }
}

impl ArgumentHistory for FileStore {
    fn record(&self, command_id: &str, argument: &str, value: &str) -> Result<()> {
        let row = HistoryRow {
            command_id: command_id.to_string(),
            argument: argument.to_string(),
            value: value.to_string(),
        };
        self.update(|doc| {
            if !doc.argument_history.contains(&row) {
                doc.argument_history.push(row);
            }
        })
    }

    fn query(&self, command_id: &str, argument: &str, limit: usize) -> Result<Vec<String>> {
        let doc = self.lock();
        Ok(doc
            .argument_history
            .iter()
            .rev()
            .filter(|r| r.command_id == command_id && r.argument == argument)
            .map(|r| r.value.clone())
            .take(limit)
            .collect())
    }

    fn forget_command(&self, command_id: &str) -> Result<()> {
        self.update(|doc| {
            doc.argument_history.retain(|r| r.command_id != command_id);
        })
    }
}

impl VariableStore for FileStore {
    fn variables(&self) -> Result<BTreeMap<String, String>> {
        Ok(self.lock().variables.clone())
    }

    fn set_variable(&self, name: &str, value: &str) -> Result<()> {
        self.update(|doc| {
            doc.variables.insert(name.to_string(), value.to_string());
        })
    }

    fn delete_variable(&self, name: &str) -> Result<()> {
        self.update(|doc| {
            doc.variables.remove(name);
        })
    }
}

impl WorkingDirHistory for FileStore {
    fn record_working_dir(&self, path: &str) -> Result<()> {
        self.update(|doc| {
            if !doc.working_dir_history.iter().any(|p| p == path) {
                doc.working_dir_history.push(path.to_string());
            }
        })
    }

    fn working_dirs(&self, limit: usize) -> Result<Vec<String>> {
        Ok(self
            .lock()
            .working_dir_history
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }
}
