//! Core state types: PressureState, OperationState, Direction, Gauge

use serde::{Deserialize, Serialize};

// ============================================================================
// Pressure Gauges
// ============================================================================

/// One of the four pressure measurement points on the BOP stack, top to bottom.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Gauge {
    /// Tubing / work area above the annular
    P0,
    /// Upper chamber, between annular and upper ram
    P1,
    /// Lower chamber, between upper and lower ram
    P2,
    /// Casing (wellbore) pressure
    P3,
}

impl Gauge {
    pub const ALL: [Self; 4] = [Self::P0, Self::P1, Self::P2, Self::P3];

    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            Gauge::P0 => "Tubing (P0)",
            Gauge::P1 => "Upper Chamber (P1)",
            Gauge::P2 => "Lower Chamber (P2)",
            Gauge::P3 => "Casing (P3)",
        }
    }

    /// Get short code for logging
    pub fn short_code(&self) -> &'static str {
        match self {
            Gauge::P0 => "P0",
            Gauge::P1 => "P1",
            Gauge::P2 => "P2",
            Gauge::P3 => "P3",
        }
    }
}

impl std::fmt::Display for Gauge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short_code())
    }
}

// ============================================================================
// Pressure State
// ============================================================================

/// Snapshot of the stack pressures in MPa.
///
/// No range is enforced: values are manually entered simulation inputs and
/// may be negative or of any magnitude. Callers normalize unparseable input
/// to zero before it reaches this type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PressureState {
    /// Tubing pressure (work area, atmospheric side)
    #[serde(default)]
    pub p0: f64,
    /// Upper chamber pressure
    #[serde(default)]
    pub p1: f64,
    /// Lower chamber pressure (between the rams)
    #[serde(default)]
    pub p2: f64,
    /// Casing pressure (wellbore)
    #[serde(default)]
    pub p3: f64,
}

impl PressureState {
    pub const fn new(p0: f64, p1: f64, p2: f64, p3: f64) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Read a single gauge
    pub const fn reading(&self, gauge: Gauge) -> f64 {
        match gauge {
            Gauge::P0 => self.p0,
            Gauge::P1 => self.p1,
            Gauge::P2 => self.p2,
            Gauge::P3 => self.p3,
        }
    }

    /// Overwrite a single gauge, leaving the others untouched
    pub fn set(&mut self, gauge: Gauge, value: f64) {
        match gauge {
            Gauge::P0 => self.p0 = value,
            Gauge::P1 => self.p1 = value,
            Gauge::P2 => self.p2 = value,
            Gauge::P3 => self.p3 = value,
        }
    }

    /// True when every reading is a finite number
    pub fn is_finite(&self) -> bool {
        Gauge::ALL.iter().all(|g| self.reading(*g).is_finite())
    }
}

impl std::fmt::Display for PressureState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "P0={} P1={} P2={} P3={} MPa",
            self.p0, self.p1, self.p2, self.p3
        )
    }
}

// ============================================================================
// Operation State
// ============================================================================

/// Direction of tool-string movement through the stack
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Running in hole
    #[default]
    Rih,
    /// Pulling out of hole
    Pooh,
}

impl Direction {
    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            Direction::Rih => "Running In Hole",
            Direction::Pooh => "Pulling Out Of Hole",
        }
    }

    /// Get short code for logging
    pub fn short_code(&self) -> &'static str {
        match self {
            Direction::Rih => "RIH",
            Direction::Pooh => "POOH",
        }
    }

    /// Parse from string (for CLI/config)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "rih" | "in" | "running_in" | "trip_in" => Some(Direction::Rih),
            "pooh" | "out" | "pulling_out" | "trip_out" => Some(Direction::Pooh),
            _ => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short_code())
    }
}

/// Operational mode of the stripping job.
///
/// `direction` only changes the outcome for the hybrid annular/ram scenario.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct OperationState {
    /// Tool joint (collar) currently transiting the seals
    #[serde(default)]
    pub passing_joint: bool,
    #[serde(default)]
    pub direction: Direction,
}

impl OperationState {
    pub const fn new(passing_joint: bool, direction: Direction) -> Self {
        Self {
            passing_joint,
            direction,
        }
    }
}

impl std::fmt::Display for OperationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let transit = if self.passing_joint {
            "passing joint"
        } else {
            "no joint"
        };
        write!(f, "{} / {}", self.direction, transit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_and_set_address_same_gauge() {
        let mut p = PressureState::default();
        for (i, gauge) in Gauge::ALL.iter().enumerate() {
            p.set(*gauge, i as f64 + 1.5);
        }
        assert_eq!(p, PressureState::new(1.5, 2.5, 3.5, 4.5));
        assert_eq!(p.reading(Gauge::P2), 3.5);
    }

    #[test]
    fn test_is_finite() {
        assert!(PressureState::new(-3.0, 1e12, 0.0, 5.0).is_finite());
        assert!(!PressureState::new(f64::NAN, 0.0, 0.0, 0.0).is_finite());
        assert!(!PressureState::new(0.0, 0.0, 0.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_direction_from_str() {
        assert_eq!(Direction::from_str("RIH"), Some(Direction::Rih));
        assert_eq!(Direction::from_str(" pooh "), Some(Direction::Pooh));
        assert_eq!(Direction::from_str("sideways"), None);
    }

    #[test]
    fn test_operation_defaults() {
        let op = OperationState::default();
        assert!(!op.passing_joint);
        assert_eq!(op.direction, Direction::Rih);
    }

    #[test]
    fn test_serde_lowercase_direction() {
        let op: OperationState =
            serde_json::from_str(r#"{"passing_joint": true, "direction": "pooh"}"#).unwrap();
        assert_eq!(op, OperationState::new(true, Direction::Pooh));
    }

    #[test]
    fn test_missing_pressure_fields_default_to_zero() {
        let p: PressureState = serde_json::from_str(r#"{"p3": 5.0}"#).unwrap();
        assert_eq!(p, PressureState::new(0.0, 0.0, 0.0, 5.0));
    }
}
