//! Guide Configuration - operator defaults as TOML values
//!
//! Each struct implements `Default` with the values the simulation starts
//! from, so the guide behaves identically with no config file present.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults::{
    CONFIG_ENV_VAR, CONFIG_FILE_NAME, DEFAULT_CASING_PRESSURE_MPA, FAULT_PRESET_MPA,
};
use crate::scenario::Scenario;
use crate::types::{Direction, Gauge, PressureState};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for the stripping guide.
///
/// Load with `GuideConfig::load()` which searches:
/// 1. `$STRIPPING_GUIDE_CONFIG` env var
/// 2. `./guide_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuideConfig {
    /// Starting snapshot
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Named pressure presets
    #[serde(default)]
    pub presets: PresetsConfig,

    /// Report rendering
    #[serde(default)]
    pub output: OutputConfig,
}

impl GuideConfig {
    /// Load configuration using the standard search order:
    /// 1. `$STRIPPING_GUIDE_CONFIG` environment variable
    /// 2. `./guide_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(
                            path = %p.display(),
                            scenario = config.simulation.scenario.id(),
                            "Loaded guide config from {}",
                            CONFIG_ENV_VAR
                        );
                        return config;
                    }
                    Err(e) => {
                        warn!(
                            path = %p.display(),
                            error = %e,
                            "Failed to load config from {}, falling back",
                            CONFIG_ENV_VAR
                        );
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", CONFIG_ENV_VAR);
            }
        }

        // 2. Check ./guide_config.toml
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(
                        scenario = config.simulation.scenario.id(),
                        "Loaded guide config from ./{}",
                        CONFIG_FILE_NAME
                    );
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", CONFIG_FILE_NAME);
                }
            }
        }

        // 3. Defaults
        info!("No {} found, using built-in defaults", CONFIG_FILE_NAME);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        // Two-pass: check for unknown keys first (warnings only)
        for w in super::validation::validate_unknown_keys(&contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Save config to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Guide config saved");
        Ok(())
    }

    /// Pressures for a named preset
    pub fn preset(&self, preset: Preset) -> PressureState {
        self.presets.pressures(preset)
    }

    /// Validate all values.
    ///
    /// Rules:
    /// - Every configured pressure must be finite
    /// - Out-of-typical-range pressures only warn
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        let sections = [
            ("simulation.initial_pressures", &self.simulation.initial_pressures),
            ("presets.normal", &self.presets.normal),
            ("presets.fault", &self.presets.fault),
        ];
        for (name, pressures) in sections {
            if !pressures.is_finite() {
                Self::report_non_finite(pressures, name, &mut errors);
            }
        }

        let (range_errors, range_warnings) = super::validation::validate_pressure_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn report_non_finite(pressures: &PressureState, name: &str, errors: &mut Vec<String>) {
        for gauge in Gauge::ALL {
            let value = pressures.reading(gauge);
            if !value.is_finite() {
                errors.push(format!(
                    "{name}.{}: pressure must be finite (got {value})",
                    gauge.short_code().to_lowercase()
                ));
            }
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {e}"),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {e}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Simulation
// ============================================================================

/// Snapshot the guide starts from before any operator input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Scenario id (1-3)
    #[serde(default)]
    pub scenario: Scenario,

    /// "rih" or "pooh"
    #[serde(default)]
    pub direction: Direction,

    #[serde(default)]
    pub passing_joint: bool,

    #[serde(default = "default_initial_pressures")]
    pub initial_pressures: PressureState,
}

fn default_initial_pressures() -> PressureState {
    PressureState::new(0.0, 0.0, 0.0, DEFAULT_CASING_PRESSURE_MPA)
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            scenario: Scenario::default(),
            direction: Direction::default(),
            passing_joint: false,
            initial_pressures: default_initial_pressures(),
        }
    }
}

// ============================================================================
// Presets
// ============================================================================

/// Named pressure sets an operator can jump to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Reset to normal: chambers empty, casing pressure only
    Normal,
    /// Simulate a leaking stack
    Fault,
}

impl Preset {
    /// Parse from string (for CLI)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "normal" | "reset" => Some(Preset::Normal),
            "fault" | "error" | "abnormal" => Some(Preset::Fault),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetsConfig {
    #[serde(default = "default_initial_pressures")]
    pub normal: PressureState,

    #[serde(default = "default_fault_preset")]
    pub fault: PressureState,
}

fn default_fault_preset() -> PressureState {
    let [p0, p1, p2, p3] = FAULT_PRESET_MPA;
    PressureState::new(p0, p1, p2, p3)
}

impl PresetsConfig {
    pub fn pressures(&self, preset: Preset) -> PressureState {
        match preset {
            Preset::Normal => self.normal,
            Preset::Fault => self.fault,
        }
    }
}

impl Default for PresetsConfig {
    fn default() -> Self {
        Self {
            normal: default_initial_pressures(),
            fault: default_fault_preset(),
        }
    }
}

// ============================================================================
// Output
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    /// Parse from string (for CLI)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Include inactive steps in text reports
    #[serde(default)]
    pub show_inactive: bool,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = GuideConfig::default();
        assert!(config.validate().is_ok(), "Default config must always validate");
    }

    #[test]
    fn test_empty_toml_produces_defaults() {
        let config: GuideConfig = toml::from_str("").expect("empty TOML should parse");
        assert_eq!(config, GuideConfig::default());
        assert_eq!(config.simulation.initial_pressures.p3, 5.0);
        assert_eq!(config.simulation.scenario, Scenario::DirectPush);
        assert_eq!(config.presets.fault, PressureState::new(2.0, 2.0, 5.0, 5.0));
    }

    #[test]
    fn test_partial_toml_override() {
        let toml_str = r#"
[simulation]
scenario = 3
direction = "pooh"

[simulation.initial_pressures]
p3 = 7.5
"#;
        let config: GuideConfig = toml::from_str(toml_str).expect("partial TOML should parse");
        assert_eq!(config.simulation.scenario, Scenario::AnnularRamHybrid);
        assert_eq!(config.simulation.direction, Direction::Pooh);
        // Missing gauges inside a given table default to zero
        assert_eq!(
            config.simulation.initial_pressures,
            PressureState::new(0.0, 0.0, 0.0, 7.5)
        );
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_unknown_scenario_is_parse_error() {
        let result: Result<GuideConfig, _> = toml::from_str("[simulation]\nscenario = 4\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_catches_non_finite() {
        let mut config = GuideConfig::default();
        config.presets.fault.p2 = f64::NAN;
        match config.validate() {
            Err(ConfigError::Validation(errors)) => {
                assert!(errors.iter().any(|e| e.contains("presets.fault.p2")));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_preset_lookup() {
        let config = GuideConfig::default();
        assert_eq!(config.preset(Preset::Normal), PressureState::new(0.0, 0.0, 0.0, 5.0));
        assert_eq!(config.preset(Preset::Fault), PressureState::new(2.0, 2.0, 5.0, 5.0));
        assert_eq!(Preset::from_str("Reset"), Some(Preset::Normal));
        assert_eq!(Preset::from_str("boom"), None);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = GuideConfig::default();
        config.simulation.scenario = Scenario::DoubleRam;
        config.output.format = OutputFormat::Json;
        let s = config.to_toml().expect("serialize");
        let back: GuideConfig = toml::from_str(&s).expect("parse back");
        assert_eq!(back, config);
    }
}
