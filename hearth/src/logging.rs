//! Subscriber installation.
//!
//! The library only emits `tracing` events; applications call [`init`] once
//! at startup.

use once_cell::sync::OnceCell;

use crate::error::LoggingError;

static INSTALLED: OnceCell<tracing::Level> = OnceCell::new();

/// Install the global subscriber at `level`.
///
/// In the browser, events go to the console through `tracing-wasm` and
/// panics are reported with `console_error_panic_hook`. Natively, a
/// `tracing-subscriber` formatter is used and `RUST_LOG` takes precedence
/// over `level`.
pub fn init(level: &str) -> Result<(), LoggingError> {
    let parsed: tracing::Level = level
        .parse()
        .map_err(|_| LoggingError::InvalidLevel(level.to_string()))?;

    if INSTALLED.get().is_some() {
        return Err(LoggingError::AlreadyInitialized);
    }
    install(parsed, level)?;
    INSTALLED
        .set(parsed)
        .map_err(|_| LoggingError::AlreadyInitialized)
}

/// The level passed to the successful [`init`] call, if any.
pub fn installed_level() -> Option<tracing::Level> {
    INSTALLED.get().copied()
}

#[cfg(target_arch = "wasm32")]
fn install(level: tracing::Level, _directive: &str) -> Result<(), LoggingError> {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));

    let config = tracing_wasm::WASMLayerConfigBuilder::new()
        .set_max_level(level)
        .set_report_logs_in_timings(false)
        .build();
    tracing_wasm::set_as_global_default_with_config(config);
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn install(_level: tracing::Level, directive: &str) -> Result<(), LoggingError> {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level() {
        assert!(matches!(
            init("chatty"),
            Err(LoggingError::InvalidLevel(level)) if level == "chatty"
        ));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_foreign_subscriber_leaves_level_unset() {
        // Another subscriber already owns the global default.
        tracing_subscriber::fmt().try_init().ok();

        assert!(matches!(
            init("debug"),
            Err(LoggingError::AlreadyInitialized)
        ));
        assert_eq!(installed_level(), None);
    }
}
