//! Shared data structures for the stripping procedure guide
//!
//! This module defines the operator-entered simulation state that both rule
//! evaluators read:
//! - `PressureState`: the four stack gauges (P0..P3, MPa)
//! - `OperationState`: joint transit flag and tripping direction

mod state;

pub use state::*;
