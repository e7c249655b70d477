//! Guide facade
//!
//! Combines the procedure tree evaluation and the valve derivation for one
//! scenario snapshot. The caller owns the snapshot and re-evaluates it in full
//! after every change; nothing is retained between calls.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::{GuideConfig, Preset, PresetsConfig};
use crate::procedure::{self, ActivePath};
use crate::scenario::Scenario;
use crate::types::{Direction, Gauge, OperationState, PressureState};
use crate::valves::{derive_valves, ValveState};

#[derive(Debug, Error)]
pub enum GuideError {
    #[error("Unknown scenario: {0} (expected 1, 2 or 3)")]
    UnknownScenario(String),

    #[error("Invalid snapshot update: {0}")]
    Snapshot(#[from] serde_json::Error),
}

// ============================================================================
// Snapshot
// ============================================================================

/// Everything both evaluators read: scenario, pressures, operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Snapshot {
    pub scenario: Scenario,
    pub pressures: PressureState,
    pub operation: OperationState,
}

impl Snapshot {
    pub const fn new(
        scenario: Scenario,
        pressures: PressureState,
        operation: OperationState,
    ) -> Self {
        Self {
            scenario,
            pressures,
            operation,
        }
    }

    /// Starting snapshot from the `[simulation]` config section
    pub fn from_config(config: &GuideConfig) -> Self {
        let sim = &config.simulation;
        Self::new(
            sim.scenario,
            sim.initial_pressures,
            OperationState::new(sim.passing_joint, sim.direction),
        )
    }

    /// Apply an operator update.
    ///
    /// A preset replaces all four pressures first; individual gauge fields
    /// then override it. Changing scenario keeps pressures and operation.
    pub fn apply(&mut self, update: &SnapshotUpdate, presets: &PresetsConfig) {
        if let Some(scenario) = update.scenario {
            self.scenario = scenario;
        }
        if let Some(preset) = update.preset {
            self.pressures = presets.pressures(preset);
        }
        for (gauge, value) in update.gauges() {
            self.pressures.set(gauge, value);
        }
        if let Some(passing_joint) = update.passing_joint {
            self.operation.passing_joint = passing_joint;
        }
        if let Some(direction) = update.direction {
            self.operation.direction = direction;
        }
    }
}

/// Partial change to a [`Snapshot`]; absent fields are left untouched.
///
/// One JSON object per line on the CLI's `--stdin` stream, e.g.
/// `{"scenario": 2, "passing_joint": true, "p2": 4.6}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotUpdate {
    #[serde(default)]
    pub scenario: Option<Scenario>,
    #[serde(default)]
    pub preset: Option<Preset>,
    #[serde(default)]
    pub p0: Option<f64>,
    #[serde(default)]
    pub p1: Option<f64>,
    #[serde(default)]
    pub p2: Option<f64>,
    #[serde(default)]
    pub p3: Option<f64>,
    #[serde(default)]
    pub passing_joint: Option<bool>,
    #[serde(default)]
    pub direction: Option<Direction>,
}

impl SnapshotUpdate {
    /// Parse one JSON line. Blank lines yield `Ok(None)`.
    pub fn parse_line(line: &str) -> Result<Option<Self>, GuideError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(line)?))
    }

    /// Gauge overrides present in this update
    pub fn gauges(&self) -> impl Iterator<Item = (Gauge, f64)> + '_ {
        [
            (Gauge::P0, self.p0),
            (Gauge::P1, self.p1),
            (Gauge::P2, self.p2),
            (Gauge::P3, self.p3),
        ]
        .into_iter()
        .filter_map(|(g, v)| v.map(|v| (g, v)))
    }
}

// ============================================================================
// Evaluation
// ============================================================================

/// Result of evaluating one snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub snapshot: Snapshot,
    pub active_path: ActivePath,
    /// Deepest active step ids, in tree order
    pub current_steps: Vec<String>,
    pub valves: ValveState,
}

/// Evaluate the procedure tree and the valve rules for a snapshot.
pub fn evaluate(snapshot: &Snapshot) -> Evaluation {
    let tree = procedure::tree(snapshot.scenario);
    let active_path = procedure::evaluate(tree.root(), &snapshot.pressures, &snapshot.operation);
    let current_steps = procedure::current_steps(tree.root(), &active_path)
        .into_iter()
        .map(|node| node.id.clone())
        .collect();
    let valves = derive_valves(snapshot.scenario, &snapshot.pressures, &snapshot.operation);

    debug!(
        scenario = snapshot.scenario.short_code(),
        %valves,
        "Snapshot evaluated"
    );

    Evaluation {
        snapshot: *snapshot,
        active_path,
        current_steps,
        valves,
    }
}
