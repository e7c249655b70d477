//! Procedural Decision Engine
//!
//! Declarative procedure trees and the evaluator that marks the active path
//! through them for the current pressure / operation snapshot.
//!
//! ## Functions
//! - `tree()` - validated built-in tree for a scenario
//! - `evaluate()` - active path for a snapshot
//! - `evaluate_with()` - active path with a custom condition interpreter
//! - `current_steps()` - deepest active steps of an evaluated tree

pub mod engine;
pub mod node;
pub mod trees;

pub use engine::{current_steps, evaluate, evaluate_with, ActivePath, NodeActivation};
pub use node::{is_balanced, is_zero, Category, Condition, ProcedureNode, ProcedureTree, TreeError};
pub use trees::tree;
