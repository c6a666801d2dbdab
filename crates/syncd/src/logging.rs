//! Log level management driven by the shared store.
//!
//! The active level follows the `LOGLEVEL` key: the dispatcher re-reads it
//! once per loop pass and reloads the subscriber filter when it changes,
//! writing the canonicalized value back so operators see what took effect.

use sai_bus::{store, store::LogLevel, Bus};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::reload;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Registry;

pub type ReloadHandle = reload::Handle<LevelFilter, Registry>;

/// Installs the global subscriber and returns the reload handle.
pub fn init() -> ReloadHandle {
    let (filter, handle) = reload::Layer::new(LevelFilter::INFO);
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
    handle
}

pub fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Info | LogLevel::Notice => LevelFilter::INFO,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Error => LevelFilter::ERROR,
    }
}

/// Applies the stored level if it differs from `current`.
pub fn sync_from_store(bus: &dyn Bus, handle: &ReloadHandle, current: &mut LogLevel) {
    let stored: LogLevel = bus
        .get(store::LOG_LEVEL)
        .ok()
        .flatten()
        .and_then(|text| text.parse().ok())
        .unwrap_or_default();

    if stored != *current {
        if handle.reload(level_filter(stored)).is_ok() {
            info!(level = %stored, "log level changed");
            *current = stored;
            // rewrite the canonical form in case the operator typoed case
            let _ = bus.set(store::LOG_LEVEL, &stored.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter_mapping() {
        assert_eq!(level_filter(LogLevel::Debug), LevelFilter::DEBUG);
        assert_eq!(level_filter(LogLevel::Notice), LevelFilter::INFO);
        assert_eq!(level_filter(LogLevel::Error), LevelFilter::ERROR);
    }
}
