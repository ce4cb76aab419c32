// ── Logging ───────────────────────────────────────────────────────────────────
//
// winshim logs through the `log` facade.  `init` is a convenience for
// binaries and tests that do not install their own logger.

use crate::config::Config;

/// Overrides the configured filter, in `env_logger` directive syntax.
pub const LOG_ENV: &str = "WINSHIM_LOG";

/// Install an `env_logger` for the `winshim` target at `config.log_level`.
///
/// A logger that is already installed is left alone.
pub fn init(config: &Config) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log::LevelFilter::Off)
        .filter_module("winshim", config.log_level)
        .parse_env(LOG_ENV);

    if builder.try_init().is_err() {
        log::debug!("a logger is already installed; keeping it");
    }
}
