#![deny(missing_docs)]
//! Install a global [`tracing`] subscriber for a hashbang application.
//!
//! In the browser the events go to the developer console through [`tracing_wasm`]. Everywhere else
//! they are written to stdout by a compact [`tracing_subscriber`] formatter.
//!
//! ```rust
//! // the first call wins, later calls report an error instead of panicking
//! let first = hashbang_logger::init(tracing::Level::INFO);
//! assert!(hashbang_logger::init(tracing::Level::DEBUG).is_err() || first.is_err());
//! ```

use tracing::{subscriber::SetGlobalDefaultError, Level};

/// The environment variable that overrides the level passed to [`init`] on native targets.
///
/// Accepts the usual level names: `trace`, `debug`, `info`, `warn` and `error`.
pub const LOG_ENV: &str = "HASHBANG_LOG";

/// Errors that can occur while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Another subscriber was installed before.
    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled(#[from] SetGlobalDefaultError),
}

/// Install the global subscriber, showing events at `level` and above.
pub fn init(level: Level) -> Result<(), LoggerError> {
    install(level)?;
    tracing::debug!(%level, "logger initialized");
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn install(level: Level) -> Result<(), SetGlobalDefaultError> {
    let level = std::env::var(LOG_ENV)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(level);

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .without_time()
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}

#[cfg(target_arch = "wasm32")]
fn install(level: Level) -> Result<(), SetGlobalDefaultError> {
    use tracing_subscriber::layer::SubscriberExt;

    let config = tracing_wasm::WASMLayerConfigBuilder::default()
        .set_max_level(level)
        .build();
    let subscriber = tracing_subscriber::registry().with(tracing_wasm::WASMLayer::new(config));

    tracing::subscriber::set_global_default(subscriber)
}
