pub mod builders;
pub mod fake_backend;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use buildjs::logging::{build_filter, LOG_ENV_VAR};

static INIT: Once = Once::new();

/// Upper bound for any single runtime test.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Install a test-writer subscriber once per test binary.
///
/// Uses the same filter rules as the binary, so `BUILDJS_LOG=debug cargo test
/// -- --nocapture` shows engine decisions for a failing test.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = build_filter(None, std::env::var(LOG_ENV_VAR).ok().as_deref());
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Await `f`, panicking if it takes longer than [`TEST_TIMEOUT`].
///
/// A hung runtime loop shows up as a failed test instead of a stuck run.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TEST_TIMEOUT, f).await {
        Ok(value) => value,
        Err(_) => panic!("runtime did not finish within {TEST_TIMEOUT:?}"),
    }
}
