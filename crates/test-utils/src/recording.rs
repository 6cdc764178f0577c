use std::sync::{Arc, Mutex};

use cmdchain::resolve::HistorySink;

/// A history sink that records every `(command, argument, value)` triple it
/// is handed, in call order. Tests assert against [`entries`](Self::entries).
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    recorded: Arc<Mutex<Vec<(String, String, String)>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(String, String, String)> {
        self.recorded.lock().unwrap().clone()
    }
}

impl HistorySink for RecordingSink {
    fn record(&self, command_id: &str, argument: &str, value: &str) {
        self.recorded.lock().unwrap().push((
            command_id.to_string(),
            argument.to_string(),
            value.to_string(),
        ));
    }
}
