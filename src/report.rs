//! Text and JSON reports of an evaluation for the command line.

use serde::Serialize;
use std::fmt;

use crate::guide::Evaluation;
use crate::procedure::{self, ProcedureNode};
use crate::types::Gauge;
use crate::valves::ValveState;

const ACTIVE_MARK: &str = "●";
const INACTIVE_MARK: &str = "○";

/// Human-readable report of one evaluation.
///
/// Inactive steps are omitted unless `show_inactive` is set.
pub struct TextReport<'a> {
    pub evaluation: &'a Evaluation,
    pub show_inactive: bool,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let evaluation = self.evaluation;
        let snapshot = &evaluation.snapshot;
        let tree = procedure::tree(snapshot.scenario);

        writeln!(
            f,
            "{} [{}]",
            snapshot.scenario.display_name(),
            snapshot.scenario.short_code()
        )?;
        writeln!(f, "{}", snapshot.scenario.description())?;
        writeln!(f, "Pressures:")?;
        for gauge in Gauge::ALL {
            writeln!(
                f,
                "  {:<20} {:>8.2} MPa",
                gauge.display_name(),
                snapshot.pressures.reading(gauge)
            )?;
        }
        let transit = if snapshot.operation.passing_joint {
            "passing joint"
        } else {
            "no joint"
        };
        writeln!(
            f,
            "Operation: {}, {transit}",
            snapshot.operation.direction.display_name()
        )?;
        writeln!(f, "Valves: {}", evaluation.valves)?;
        writeln!(f)?;
        writeln!(f, "Procedure:")?;

        for (depth, node) in tree.root().walk() {
            let active = evaluation.active_path.is_active(&node.id);
            if !active && !self.show_inactive {
                continue;
            }
            let mark = if active { ACTIVE_MARK } else { INACTIVE_MARK };
            write!(
                f,
                "{}{} [{}] {}",
                "  ".repeat(depth),
                mark,
                node.category,
                node.label
            )?;
            if let Some(detail) = &node.detail {
                write!(f, " - {detail}")?;
            }
            writeln!(f)?;
        }

        writeln!(f)?;
        for id in &evaluation.current_steps {
            if let Some(node) = tree.find(id) {
                writeln!(f, "Current step: {}", step_summary(node))?;
            }
        }
        Ok(())
    }
}

/// Render a human-readable report.
pub fn render_text(evaluation: &Evaluation, show_inactive: bool) -> String {
    TextReport {
        evaluation,
        show_inactive,
    }
    .to_string()
}

fn step_summary(node: &ProcedureNode) -> String {
    match &node.detail {
        Some(detail) => format!("{} ({detail})", node.label),
        None => node.label.clone(),
    }
}

/// JSON document emitted per evaluation
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    scenario: u8,
    scenario_name: &'static str,
    pressures: &'a crate::types::PressureState,
    operation: &'a crate::types::OperationState,
    valves: &'a ValveState,
    current_steps: &'a [String],
    active_steps: Vec<&'a str>,
}

/// Render a single-line JSON report
pub fn render_json(evaluation: &Evaluation) -> Result<String, serde_json::Error> {
    let snapshot = &evaluation.snapshot;
    let report = JsonReport {
        scenario: snapshot.scenario.id(),
        scenario_name: snapshot.scenario.display_name(),
        pressures: &snapshot.pressures,
        operation: &snapshot.operation,
        valves: &evaluation.valves,
        current_steps: &evaluation.current_steps,
        active_steps: evaluation.active_path.active_ids().collect(),
    };
    serde_json::to_string(&report)
}
