//! Logger setup: browser console on wasm, stderr elsewhere.

use log::LevelFilter;

/// Env var read by the native logger, e.g. `PLAYPAUSE_LOG=debug`.
#[cfg(not(target_arch = "wasm32"))]
pub const LOG_ENV: &str = "PLAYPAUSE_LOG";

/// Install the logger. Later calls only adjust the max level.
#[cfg(target_arch = "wasm32")]
pub fn init_logging(level: LevelFilter) {
    let installed = match level.to_level() {
        Some(level) => console_log::init_with_level(level).is_ok(),
        None => false,
    };
    if !installed {
        log::set_max_level(level);
    }
}

/// Install the logger. Later calls only adjust the max level.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging(level: LevelFilter) {
    let installed = pretty_env_logger::formatted_builder()
        .filter_level(level)
        .parse_env(LOG_ENV)
        .try_init()
        .is_ok();
    if !installed {
        log::set_max_level(level);
    }
}
