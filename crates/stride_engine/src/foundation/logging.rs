//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system
///
/// `default_filter` (for example `"info"` or `"stride_engine=debug"`) applies
/// unless `RUST_LOG` is set. Calling this more than once is harmless, which
/// keeps it usable from tests.
pub fn init(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    if env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init()
        .is_err()
    {
        log::trace!("logger already initialised");
    }
}
