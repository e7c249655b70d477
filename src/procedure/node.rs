//! Procedure tree nodes and activation conditions

use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

use crate::config::defaults::BALANCE_TOLERANCE_MPA;
use crate::types::{Direction, Gauge, OperationState, PressureState};

// ============================================================================
// Comparisons
// ============================================================================

/// Exact zero test.
///
/// Zero is a sentinel the operator types in directly, so no tolerance applies:
/// 0.0001 is not zero.
#[allow(clippy::float_cmp)]
pub fn is_zero(value: f64) -> bool {
    value == 0.0
}

/// Approximate equality for two measured pressures: `|a - b| < 0.1 MPa`.
pub fn is_balanced(a: f64, b: f64) -> bool {
    (a - b).abs() < BALANCE_TOLERANCE_MPA
}

// ============================================================================
// Conditions
// ============================================================================

/// Activation rule attached to a procedure step.
///
/// Every variant is total over all `f64` inputs, including negatives, NaN and
/// infinities; NaN compares unequal to everything so it never satisfies a
/// zero or balance test.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "args", rename_all = "snake_case")]
pub enum Condition {
    /// A tool joint is transiting the stack
    PassingJoint,
    /// No tool joint in the stack
    NotPassingJoint,
    /// Tripping in the given direction
    Heading(Direction),
    /// Gauge reads exactly zero
    IsZero(Gauge),
    /// Gauge reads anything other than exactly zero
    NonZero(Gauge),
    /// The two gauges agree within the balance tolerance
    Balanced(Gauge, Gauge),
    /// The two gauges differ by at least the balance tolerance
    Unbalanced(Gauge, Gauge),
    /// Every inner condition holds
    All(Vec<Condition>),
    /// At least one inner condition holds
    Any(Vec<Condition>),
}

impl Condition {
    /// Evaluate against a state snapshot
    pub fn holds(&self, pressures: &PressureState, operation: &OperationState) -> bool {
        match self {
            Condition::PassingJoint => operation.passing_joint,
            Condition::NotPassingJoint => !operation.passing_joint,
            Condition::Heading(direction) => operation.direction == *direction,
            Condition::IsZero(g) => is_zero(pressures.reading(*g)),
            Condition::NonZero(g) => !is_zero(pressures.reading(*g)),
            Condition::Balanced(a, b) => is_balanced(pressures.reading(*a), pressures.reading(*b)),
            Condition::Unbalanced(a, b) => {
                !is_balanced(pressures.reading(*a), pressures.reading(*b))
            }
            Condition::All(inner) => inner.iter().all(|c| c.holds(pressures, operation)),
            Condition::Any(inner) => inner.iter().any(|c| c.holds(pressures, operation)),
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::PassingJoint => write!(f, "passing joint"),
            Condition::NotPassingJoint => write!(f, "no joint"),
            Condition::Heading(d) => write!(f, "{d}"),
            Condition::IsZero(g) => write!(f, "{g}=0"),
            Condition::NonZero(g) => write!(f, "{g}≠0"),
            Condition::Balanced(a, b) => write!(f, "{a}≈{b}"),
            Condition::Unbalanced(a, b) => write!(f, "{a}≉{b}"),
            Condition::All(inner) => join(f, inner, " & "),
            Condition::Any(inner) => join(f, inner, " | "),
        }
    }
}

fn join(f: &mut std::fmt::Formatter<'_>, items: &[Condition], sep: &str) -> std::fmt::Result {
    write!(f, "(")?;
    for (i, c) in items.iter().enumerate() {
        if i > 0 {
            write!(f, "{sep}")?;
        }
        write!(f, "{c}")?;
    }
    write!(f, ")")
}

// ============================================================================
// Nodes
// ============================================================================

/// Display category of a step. Has no effect on evaluation.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Start,
    Decision,
    Action,
    Check,
}

impl Category {
    /// Get short code for logging
    pub fn short_code(&self) -> &'static str {
        match self {
            Category::Start => "START",
            Category::Decision => "DECIDE",
            Category::Action => "ACTION",
            Category::Check => "CHECK",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short_code())
    }
}

/// One step of a stripping procedure.
///
/// `condition: None` means the step is active whenever its parent is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcedureNode {
    pub id: String,
    pub label: String,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ProcedureNode>,
}

impl ProcedureNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            category,
            detail: None,
            condition: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    #[must_use]
    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    #[must_use]
    pub fn children(mut self, children: Vec<ProcedureNode>) -> Self {
        self.children = children;
        self
    }

    /// Depth-first, pre-order walk yielding `(depth, node)`
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self)],
        }
    }
}

/// Pre-order iterator over a node and its descendants
pub struct Walk<'a> {
    stack: Vec<(usize, &'a ProcedureNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a ProcedureNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|c| (depth + 1, c)));
        Some((depth, node))
    }
}

// ============================================================================
// Validated Tree
// ============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("Procedure node has an empty id (label: {0})")]
    EmptyId(String),

    #[error("Duplicate procedure node id: {0}")]
    DuplicateId(String),

    #[error("Root node {0} must be a start step, found {1}")]
    RootNotStart(String, Category),
}

/// A procedure tree that passed construction-time validation.
///
/// Ownership already rules out cycles and shared subtrees; validation adds
/// unique non-empty ids and a `Start` root.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureTree {
    root: ProcedureNode,
    len: usize,
}

impl ProcedureTree {
    pub fn new(root: ProcedureNode) -> Result<Self, TreeError> {
        if root.category != Category::Start {
            return Err(TreeError::RootNotStart(root.id.clone(), root.category));
        }

        let mut seen = HashSet::new();
        for (_, node) in root.walk() {
            if node.id.trim().is_empty() {
                return Err(TreeError::EmptyId(node.label.clone()));
            }
            if !seen.insert(node.id.as_str()) {
                return Err(TreeError::DuplicateId(node.id.clone()));
            }
        }
        let len = seen.len();

        Ok(Self { root, len })
    }

    pub fn root(&self) -> &ProcedureNode {
        &self.root
    }

    /// Number of steps in the tree
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Depth of the deepest step (root = 0)
    pub fn depth(&self) -> usize {
        self.root.walk().map(|(d, _)| d).max().unwrap_or(0)
    }

    pub fn find(&self, id: &str) -> Option<&ProcedureNode> {
        self.root.walk().map(|(_, n)| n).find(|n| n.id == id)
    }
}
