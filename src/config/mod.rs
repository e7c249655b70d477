//! Guide Configuration Module
//!
//! Operator defaults loaded from TOML: starting snapshot, pressure presets
//! and report format. Procedure rules themselves are not configurable.
//!
//! ## Loading Order
//!
//! 1. `STRIPPING_GUIDE_CONFIG` environment variable (path to TOML file)
//! 2. `guide_config.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! ```ignore
//! // In main():
//! config::init(GuideConfig::load());
//!
//! // Anywhere in the codebase:
//! let start = config::get().simulation.initial_pressures;
//! ```

mod guide_config;
pub mod defaults;
pub mod validation;

pub use guide_config::*;

use std::sync::OnceLock;

/// Global guide configuration, initialized once at startup.
static GUIDE_CONFIG: OnceLock<GuideConfig> = OnceLock::new();

/// Initialize the global guide configuration.
///
/// Later calls are ignored with a warning.
pub fn init(config: GuideConfig) {
    if GUIDE_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// Get a reference to the global guide configuration.
///
/// Falls back to built-in defaults if `init()` was never called.
pub fn get() -> &'static GuideConfig {
    GUIDE_CONFIG.get_or_init(GuideConfig::default)
}
