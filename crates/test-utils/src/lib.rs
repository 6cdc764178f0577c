pub mod builders;
pub mod recording;

use std::sync::{Arc, Once};

use tracing_subscriber::{EnvFilter, fmt};

use cmdchain::config::model::ExecSection;
use cmdchain::events::EventHub;
use cmdchain::service::CommandService;
use cmdchain::store::{MemoryStore, StateStore};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Run a future with a 5-second timeout.
#[allow(dead_code)]
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}

/// Service wired to a fresh in-memory store. What most tests want.
pub fn memory_service() -> CommandService {
    service_with_store(Arc::new(MemoryStore::new()))
}

/// Service wired to a specific store backend. Tests keep their own clone of
/// the `Arc` to inspect persisted state directly.
pub fn service_with_store(store: Arc<dyn StateStore>) -> CommandService {
    CommandService::new(store, EventHub::new(256), &ExecSection::default())
}
