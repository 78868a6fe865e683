//! Logging setup

/// Initialize `env_logger` with a fallback level
///
/// `RUST_LOG` still wins when it is set. Later calls are ignored.
pub fn init_with_level(level: log::LevelFilter) {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}
