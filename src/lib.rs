//! Stripping Guide: BOP stripping procedure decision support
//!
//! Guides operators through stripping a tool joint through the BOP stack by
//! marking which procedure step is currently valid for the entered pressures
//! and operation, and which barrier elements should be open.
//!
//! ## Architecture
//!
//! - **Procedure**: declarative step trees and the active-path evaluator
//! - **Valves**: per-scenario barrier (annular / upper ram / lower ram) rules
//! - **Guide**: snapshot model and the combined evaluation
//! - **Report**: text / JSON rendering for the CLI

pub mod config;
pub mod guide;
pub mod procedure;
pub mod report;
pub mod scenario;
pub mod types;
pub mod valves;

// Re-export configuration
pub use config::GuideConfig;

// Re-export commonly used types
pub use guide::{evaluate, Evaluation, GuideError, Snapshot, SnapshotUpdate};
pub use procedure::{ActivePath, Category, Condition, ProcedureNode, ProcedureTree, TreeError};
pub use scenario::Scenario;
pub use types::{Direction, Gauge, OperationState, PressureState};
pub use valves::{derive_valves, ValveState};
