//! Stripping scenarios
//!
//! Each scenario pairs one procedure tree with one valve rule set. Switching
//! scenario swaps both; it never touches the pressure or operation state.
//!
//! | id | Scenario           | Barrier strategy                                  |
//! |----|--------------------|---------------------------------------------------|
//! | 1  | `DirectPush`       | strip straight through a closed annular           |
//! | 2  | `DoubleRam`        | alternate upper/lower ram across each joint       |
//! | 3  | `AnnularRamHybrid` | annular plus both working rams used together      |

use serde::{Deserialize, Serialize};

use crate::guide::GuideError;

/// The three predefined stripping procedures
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum Scenario {
    /// Scenario 1: push the joint directly through the annular
    #[default]
    DirectPush,
    /// Scenario 2: double-ram alternating seal (annular failed or pressure too high)
    DoubleRam,
    /// Scenario 3: annular and both working rams alternate
    AnnularRamHybrid,
}

impl Scenario {
    pub const ALL: [Self; 3] = [Self::DirectPush, Self::DoubleRam, Self::AnnularRamHybrid];

    /// Numeric identifier used by operators and config files (1-3)
    pub const fn id(&self) -> u8 {
        match self {
            Scenario::DirectPush => 1,
            Scenario::DoubleRam => 2,
            Scenario::AnnularRamHybrid => 3,
        }
    }

    /// Look up a scenario by numeric id.
    ///
    /// Fails with [`GuideError::UnknownScenario`] rather than defaulting: a
    /// silently substituted scenario would show the wrong barrier state.
    pub fn from_id(id: u8) -> Result<Self, GuideError> {
        match id {
            1 => Ok(Scenario::DirectPush),
            2 => Ok(Scenario::DoubleRam),
            3 => Ok(Scenario::AnnularRamHybrid),
            other => Err(GuideError::UnknownScenario(other.to_string())),
        }
    }

    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            Scenario::DirectPush => "Scenario 1: Direct push through annular",
            Scenario::DoubleRam => "Scenario 2: Double-ram alternating seal",
            Scenario::AnnularRamHybrid => "Scenario 3: Annular and ram alternating",
        }
    }

    /// Initial barrier arrangement the procedure starts from
    pub fn description(&self) -> &'static str {
        match self {
            Scenario::DirectPush => "Initial state: annular closed, upper and lower rams open",
            Scenario::DoubleRam => {
                "Initial state: upper and lower rams seal alternately to pass each collar"
            }
            Scenario::AnnularRamHybrid => {
                "Initial state: annular and upper/lower working rams used together"
            }
        }
    }

    /// Get short code for logging
    pub fn short_code(&self) -> &'static str {
        match self {
            Scenario::DirectPush => "S1-ANNULAR",
            Scenario::DoubleRam => "S2-DOUBLE-RAM",
            Scenario::AnnularRamHybrid => "S3-HYBRID",
        }
    }
}

impl TryFrom<u8> for Scenario {
    type Error = GuideError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::from_id(id)
    }
}

impl From<Scenario> for u8 {
    fn from(scenario: Scenario) -> Self {
        scenario.id()
    }
}

impl std::str::FromStr for Scenario {
    type Err = GuideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if let Ok(id) = normalized.parse::<u8>() {
            return Self::from_id(id);
        }
        match normalized.as_str() {
            "s1" | "direct_push" | "direct-push" | "annular" => Ok(Scenario::DirectPush),
            "s2" | "double_ram" | "double-ram" => Ok(Scenario::DoubleRam),
            "s3" | "hybrid" | "annular_ram_hybrid" | "annular-ram-hybrid" => {
                Ok(Scenario::AnnularRamHybrid)
            }
            _ => Err(GuideError::UnknownScenario(s.to_string())),
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
