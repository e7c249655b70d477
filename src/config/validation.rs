//! Config validation: unknown-key detection with Levenshtein suggestions
//! and pressure range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

use super::defaults::TYPICAL_MAX_PRESSURE_MPA;
use crate::types::{Gauge, PressureState};

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for GuideConfig.
///
/// Maintained by hand to match the struct hierarchy in guide_config.rs.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [simulation]
        "simulation",
        "simulation.scenario",
        "simulation.direction",
        "simulation.passing_joint",
        "simulation.initial_pressures",
        "simulation.initial_pressures.p0",
        "simulation.initial_pressures.p1",
        "simulation.initial_pressures.p2",
        "simulation.initial_pressures.p3",
        // [presets]
        "presets",
        "presets.normal",
        "presets.normal.p0",
        "presets.normal.p1",
        "presets.normal.p2",
        "presets.normal.p3",
        "presets.fault",
        "presets.fault.p0",
        "presets.fault.p1",
        "presets.fault.p2",
        "presets.fault.p3",
        // [output]
        "output",
        "output.format",
        "output.show_inactive",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Ties resolve to the lexicographically smallest key so output is stable.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|k| (levenshtein(unknown, k), *k))
        .filter(|(dist, _)| *dist <= 3)
        .min()
        .map(|(_, k)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys; it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Pressure Range Validation
// ============================================================================

/// Check configured pressures for suspicious values.
///
/// Returns (errors, warnings). Negative or very large pressures are legal
/// simulation inputs, so they only warn; nothing here is currently an error.
pub fn validate_pressure_ranges(
    config: &super::GuideConfig,
) -> (Vec<String>, Vec<ValidationWarning>) {
    let errors = Vec::new();
    let mut warnings = Vec::new();

    let sets: [(&str, &PressureState); 3] = [
        ("simulation.initial_pressures", &config.simulation.initial_pressures),
        ("presets.normal", &config.presets.normal),
        ("presets.fault", &config.presets.fault),
    ];

    for (section, pressures) in sets {
        for gauge in Gauge::ALL {
            let value = pressures.reading(gauge);
            if !value.is_finite() {
                continue;
            }
            let field = format!("{section}.{}", gauge.short_code().to_lowercase());
            if value < 0.0 {
                warnings.push(ValidationWarning {
                    message: format!("{field} = {value:.2} MPa is negative"),
                    field,
                    suggestion: None,
                });
            } else if value > TYPICAL_MAX_PRESSURE_MPA {
                warnings.push(ValidationWarning {
                    message: format!(
                        "{field} = {value:.1} MPa exceeds typical BOP rating ({TYPICAL_MAX_PRESSURE_MPA:.0} MPa)"
                    ),
                    field,
                    suggestion: None,
                });
            }
        }
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GuideConfig;

    #[test]
    fn test_levenshtein_identical() {
        assert_eq!(levenshtein("hello", "hello"), 0);
    }

    #[test]
    fn test_levenshtein_one_edit() {
        assert_eq!(levenshtein("senario", "scenario"), 1);
    }

    #[test]
    fn test_levenshtein_empty() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn test_walk_toml_keys_nested() {
        let toml: toml::Value = r#"
            [simulation]
            scenario = 2
            [simulation.initial_pressures]
            p3 = 5.0
        "#
        .parse()
        .unwrap();
        let keys = walk_toml_keys(&toml, "");
        assert!(keys.contains(&"simulation".to_string()));
        assert!(keys.contains(&"simulation.scenario".to_string()));
        assert!(keys.contains(&"simulation.initial_pressures.p3".to_string()));
    }

    #[test]
    fn test_typo_key_produces_warning_with_suggestion() {
        let toml_str = r#"
[simulation]
senario = 2
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "simulation.senario");
        assert_eq!(warnings[0].suggestion.as_deref(), Some("simulation.scenario"));
        assert!(warnings[0].to_string().contains("did you mean 'simulation.scenario'"));
    }

    #[test]
    fn test_all_valid_keys_produce_zero_warnings() {
        let toml_str = r#"
[simulation]
scenario = 2
direction = "rih"
passing_joint = true

[simulation.initial_pressures]
p0 = 0.0
p3 = 5.0

[presets.fault]
p0 = 2.0

[output]
format = "json"
show_inactive = true
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert!(warnings.is_empty(), "Expected 0 warnings, got: {warnings:?}");
    }

    #[test]
    fn test_unknown_section_produces_warning() {
        let warnings = validate_unknown_keys("[dashboard]\nport = 8080\n");
        assert!(warnings.iter().any(|w| w.field == "dashboard"));
        assert!(warnings.iter().any(|w| w.field == "dashboard.port"));
    }

    #[test]
    fn test_suggest_correction_no_match_for_garbage() {
        let known = known_config_keys();
        assert!(suggest_correction("completely_unrelated_garbage_key_xyz", &known).is_none());
    }

    #[test]
    fn test_pressure_ranges_defaults_clean() {
        let (errors, warnings) = validate_pressure_ranges(&GuideConfig::default());
        assert!(errors.is_empty());
        assert!(warnings.is_empty(), "Defaults should produce no warnings: {warnings:?}");
    }

    #[test]
    fn test_pressure_ranges_flag_negative_and_extreme() {
        let mut config = GuideConfig::default();
        config.simulation.initial_pressures.p1 = -1.0;
        config.presets.fault.p3 = 500.0;
        let (errors, warnings) = validate_pressure_ranges(&config);
        assert!(errors.is_empty());
        assert!(warnings.iter().any(|w| w.field == "simulation.initial_pressures.p1"));
        assert!(warnings.iter().any(|w| w.field == "presets.fault.p3"));
    }
}
