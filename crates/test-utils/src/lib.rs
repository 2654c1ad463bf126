//! Shared helpers for the `taskstage` integration tests.
//!
//! - [`builders`]: in-memory project graphs, tasks and workspace configs.
//! - [`fake_executor`]: an `ExecutorBackend` that never spawns a process.

pub mod builders;
pub mod fake_executor;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING: Once = Once::new();

/// How long a single async test step may take before the test fails.
const STEP_TIMEOUT: Duration = Duration::from_secs(5);

/// Install a test-captured subscriber once per test binary.
///
/// Staging and driver decisions are logged at `debug`; run with
/// `RUST_LOG=taskstage=debug cargo test -- --nocapture` to see them.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("taskstage=info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Await `f`, failing the test if a stage run or child process hangs.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(STEP_TIMEOUT, f)
        .await
        .unwrap_or_else(|_| panic!("test step did not finish within {STEP_TIMEOUT:?}"))
}
