//! Active-path evaluation
//!
//! The root is always active. Any other step is active iff its parent is
//! active and its own condition holds. Conditions below an inactive step are
//! never evaluated. Every call builds a fresh [`ActivePath`]; nothing is
//! cached between calls.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use super::node::{Condition, ProcedureNode};
use crate::types::{OperationState, PressureState};

/// Activation status of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeActivation {
    pub is_active: bool,
    /// Distance from the root (root = 0)
    pub depth: usize,
}

/// Per-step activation for one evaluation, keyed by node id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ActivePath {
    nodes: BTreeMap<String, NodeActivation>,
    /// Node ids in depth-first visiting order
    #[serde(skip)]
    order: Vec<String>,
}

impl ActivePath {
    /// Activation of a step, or `None` if the id is not in the evaluated tree
    pub fn get(&self, id: &str) -> Option<NodeActivation> {
        self.nodes.get(id).copied()
    }

    /// True only for known, active steps
    pub fn is_active(&self, id: &str) -> bool {
        self.nodes.get(id).is_some_and(|a| a.is_active)
    }

    /// Active step ids in depth-first order
    pub fn active_ids(&self) -> impl Iterator<Item = &str> {
        self.order
            .iter()
            .filter(|id| self.is_active(id))
            .map(String::as_str)
    }

    /// Number of evaluated steps
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.nodes.values().filter(|a| a.is_active).count()
    }

    fn record(&mut self, id: &str, activation: NodeActivation) {
        self.order.push(id.to_string());
        self.nodes.insert(id.to_string(), activation);
    }
}

/// Evaluate the active path of a procedure tree for one state snapshot.
pub fn evaluate(
    root: &ProcedureNode,
    pressures: &PressureState,
    operation: &OperationState,
) -> ActivePath {
    let path = evaluate_with(root, |condition| condition.holds(pressures, operation));
    debug!(
        root = %root.id,
        steps = path.len(),
        active = path.active_count(),
        %pressures,
        %operation,
        "Procedure tree evaluated"
    );
    path
}

/// Evaluate with a caller-supplied condition interpreter.
///
/// `holds` is called at most once per step, and never for a step whose parent
/// is inactive. Steps without a condition inherit their parent's status.
pub fn evaluate_with<F>(root: &ProcedureNode, mut holds: F) -> ActivePath
where
    F: FnMut(&Condition) -> bool,
{
    let mut path = ActivePath::default();
    path.record(
        &root.id,
        NodeActivation {
            is_active: true,
            depth: 0,
        },
    );

    let mut stack: Vec<(&ProcedureNode, usize, bool)> = root
        .children
        .iter()
        .rev()
        .map(|child| (child, 1, true))
        .collect();

    while let Some((node, depth, parent_active)) = stack.pop() {
        let is_active = parent_active && node.condition.as_ref().map_or(true, &mut holds);
        path.record(&node.id, NodeActivation { is_active, depth });
        stack.extend(
            node.children
                .iter()
                .rev()
                .map(|child| (child, depth + 1, is_active)),
        );
    }

    path
}

/// The deepest active steps: active nodes none of whose children are active.
///
/// For the built-in trees this is the operator's current step (or the pair of
/// parallel checks in the hybrid scenario).
pub fn current_steps<'a>(root: &'a ProcedureNode, path: &ActivePath) -> Vec<&'a ProcedureNode> {
    root.walk()
        .map(|(_, node)| node)
        .filter(|node| path.is_active(&node.id))
        .filter(|node| !node.children.iter().any(|c| path.is_active(&c.id)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procedure::node::Category;
    use crate::types::{Direction, Gauge};

    fn sample_tree() -> ProcedureNode {
        ProcedureNode::new("root", "root", Category::Start).children(vec![
            ProcedureNode::new("joint", "joint", Category::Decision)
                .when(Condition::PassingJoint)
                .children(vec![
                    ProcedureNode::new("zero", "p0 zero", Category::Check)
                        .when(Condition::IsZero(Gauge::P0)),
                    ProcedureNode::new("inherit", "no condition", Category::Action),
                ]),
            ProcedureNode::new("idle", "idle", Category::Decision)
                .when(Condition::NotPassingJoint)
                .children(vec![ProcedureNode::new("pooh", "pooh", Category::Action)
                    .when(Condition::Heading(Direction::Pooh))]),
        ])
    }

    #[test]
    fn test_root_always_active() {
        let tree = sample_tree();
        for joint in [true, false] {
            let path = evaluate(
                &tree,
                &PressureState::new(f64::NAN, -1.0, 1e300, 0.0),
                &OperationState::new(joint, Direction::Rih),
            );
            assert!(path.is_active("root"));
            assert_eq!(path.get("root").map(|a| a.depth), Some(0));
        }
    }

    #[test]
    fn test_absent_condition_inherits_parent() {
        let tree = sample_tree();
        let on = evaluate(
            &tree,
            &PressureState::default(),
            &OperationState::new(true, Direction::Rih),
        );
        assert!(on.is_active("inherit"));

        let off = evaluate(
            &tree,
            &PressureState::default(),
            &OperationState::new(false, Direction::Rih),
        );
        assert!(!off.is_active("inherit"));
    }

    #[test]
    fn test_inactive_parent_forces_inactive_child() {
        let tree = sample_tree();
        // pooh's own condition holds, but its parent does not
        let path = evaluate(
            &tree,
            &PressureState::default(),
            &OperationState::new(true, Direction::Pooh),
        );
        assert!(!path.is_active("idle"));
        assert!(!path.is_active("pooh"));
        assert_eq!(path.get("pooh").map(|a| a.depth), Some(2));
    }

    #[test]
    fn test_conditions_under_inactive_step_are_not_evaluated() {
        let tree = sample_tree();
        let mut seen = Vec::new();
        let path = evaluate_with(&tree, |c| {
            seen.push(c.clone());
            // only the "joint" branch passes
            matches!(c, Condition::PassingJoint)
        });
        assert!(path.is_active("joint"));
        assert!(!path.is_active("idle"));
        assert!(!seen.contains(&Condition::Heading(Direction::Pooh)));
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_every_node_is_reported() {
        let tree = sample_tree();
        let path = evaluate(&tree, &PressureState::default(), &OperationState::default());
        assert_eq!(path.len(), tree.walk().count());
        assert!(path.get("missing").is_none());
        assert!(!path.is_active("missing"));
    }

    #[test]
    fn test_active_ids_in_depth_first_order() {
        let tree = sample_tree();
        let path = evaluate(
            &tree,
            &PressureState::default(),
            &OperationState::new(true, Direction::Rih),
        );
        let ids: Vec<&str> = path.active_ids().collect();
        assert_eq!(ids, vec!["root", "joint", "zero", "inherit"]);
    }

    #[test]
    fn test_repeated_evaluation_is_identical() {
        let tree = sample_tree();
        let p = PressureState::new(0.0, 2.0, 5.0, 5.0);
        let op = OperationState::new(true, Direction::Pooh);
        assert_eq!(evaluate(&tree, &p, &op), evaluate(&tree, &p, &op));
    }

    #[test]
    fn test_current_steps_are_deepest_active() {
        let tree = sample_tree();
        let path = evaluate(
            &tree,
            &PressureState::new(1.0, 0.0, 0.0, 5.0),
            &OperationState::new(true, Direction::Rih),
        );
        let steps: Vec<&str> = current_steps(&tree, &path)
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(steps, vec!["inherit"]);
    }
}
