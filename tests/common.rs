use std::sync::Once;
use tracing::Level;

/// Global one-time tracing initialization guard for the integration tests.
///
/// The `Once` ensures that `tracing_subscriber::fmt` is only installed once,
/// even if multiple tests from this crate call `init_tracing` concurrently.
static INIT_TRACING: Once = Once::new();

/// Initialize a structured `tracing` subscriber for the codec tests.
///
/// The configuration:
/// - Uses `DEBUG` as the maximum log level so decode-tolerance warnings are
///   visible.
/// - Disables targets and timestamps to keep output compact in test runs.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_target(false)
            .without_time()
            .try_init();
    });
}
