//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system with a fallback filter
///
/// `default_filter` uses `env_logger` filter syntax (e.g. `"debug"` or
/// `"sandbox_engine=trace,walker_app=info"`) and only applies when
/// `RUST_LOG` is not set. Safe to call more than once; only the first
/// call installs a logger.
pub fn init_with_level(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    if env_logger::Builder::from_env(env).try_init().is_ok() {
        log::debug!("Logging initialized (default filter: {})", default_filter);
    }
}
