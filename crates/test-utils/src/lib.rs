pub mod builders;

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

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
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Run a future with a 5-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}

/// Receive items from the channel until one matches `pred`.
///
/// Returns `None` when `timeout` elapses or the channel closes before a
/// matching item arrives. Non-matching items are discarded, which is what
/// watcher tests want: platforms differ in how many incidental events they
/// report around the interesting one.
pub async fn recv_matching<T, F>(
    rx: &mut tokio::sync::mpsc::UnboundedReceiver<T>,
    timeout: std::time::Duration,
    mut pred: F,
) -> Option<T>
where
    F: FnMut(&T) -> bool,
{
    tokio::time::timeout(timeout, async {
        while let Some(item) = rx.recv().await {
            if pred(&item) {
                return Some(item);
            }
        }
        None
    })
    .await
    .ok()
    .flatten()
}
