//! System-wide default constants.
//!
//! Rule constants here are fixed parts of the procedures and are not exposed
//! in `guide_config.toml`. Operator defaults (initial pressures, presets) are
//! seeded from here but can be overridden in the config file.

// ============================================================================
// Procedure Rules
// ============================================================================

/// Two pressures are treated as balanced when `|a - b|` is below this (MPa).
///
/// Applies to the procedure trees only; zero checks are always exact.
pub const BALANCE_TOLERANCE_MPA: f64 = 0.1;

/// Double-ram valve rule: the lower chamber counts as balanced high once
/// `P2 > ratio × P3`.
pub const RAM_SWAP_BALANCE_RATIO: f64 = 0.9;

// ============================================================================
// Operator Defaults
// ============================================================================

/// Casing pressure the simulation starts from (MPa).
pub const DEFAULT_CASING_PRESSURE_MPA: f64 = 5.0;

/// "Simulate fault" preset: P0, P1 leaking and P2 at casing pressure (MPa).
pub const FAULT_PRESET_MPA: [f64; 4] = [2.0, 2.0, 5.0, 5.0];

/// Pressures above this are accepted but flagged in config as atypical (MPa).
///
/// 140 MPa is roughly a 20k psi BOP rating.
pub const TYPICAL_MAX_PRESSURE_MPA: f64 = 140.0;

// ============================================================================
// Config Discovery
// ============================================================================

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "STRIPPING_GUIDE_CONFIG";

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "guide_config.toml";
