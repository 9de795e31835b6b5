mod structs;

pub use structs::*;

use std::sync::OnceLock;

static CONFIG: OnceLock<StaticConfig> = OnceLock::new();

/// Load configuration once at startup. Later calls return the first result.
pub fn init_config() -> &'static StaticConfig {
    CONFIG.get_or_init(StaticConfig::load)
}

/// Panics if `init_config` has not been called yet.
pub fn get_config() -> &'static StaticConfig {
    CONFIG
        .get()
        .expect("Configuration not initialized, call init_config() first")
}
