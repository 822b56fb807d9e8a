//! Console and run-log output.
//!
//! Everything is emitted through [`tracing`]: [`init_subscriber`] renders
//! it on the console and appends it to a per-command run log.  [`Logger`]
//! is the [`Log`] implementation handed to commands and the engine; it also
//! collects one [`PassEntry`] per convergence pass for the closing summary.
mod logger;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
pub use subscriber::init_subscriber;
pub use types::{Log, PassEntry, PassStatus};
pub use utils::LOG_DIR_ENV_VAR;

/// Serializes log directory environment changes across parallel tests.
#[cfg(test)]
pub(crate) static TEST_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// A [`Logger`] whose events reach a run log in a fresh temporary
/// directory, through a subscriber scoped to the current thread.
///
/// Keep the returned guard alive for the duration of the test.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn isolated_logger() -> (Logger, tempfile::TempDir, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let env_lock = TEST_ENV_MUTEX
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    // SAFETY: Protected by TEST_ENV_MUTEX; restored before lock is released.
    #[allow(unsafe_code)]
    unsafe {
        std::env::set_var(LOG_DIR_ENV_VAR, tmp.path());
    }
    let run_log = subscriber::FileLayer::new("test").expect("failed to open run log");
    let log = Logger::new("test");
    #[allow(unsafe_code)]
    unsafe {
        std::env::remove_var(LOG_DIR_ENV_VAR);
    }
    drop(env_lock);
    let subscriber = tracing_subscriber::registry().with(run_log.with_filter(LevelFilter::DEBUG));
    let guard = tracing::dispatcher::set_default(&tracing::Dispatch::new(subscriber));
    (log, tmp, guard)
}
