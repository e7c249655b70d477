//! Built-in stripping procedures, one tree per scenario.
//!
//! Trees are built once on first use and validated at construction. They are
//! never mutated afterwards.

use std::sync::OnceLock;

use super::node::{Category, Condition, ProcedureNode, ProcedureTree};
use crate::scenario::Scenario;
use crate::types::{Direction, Gauge};

use Category::{Action, Check, Decision, Start};
use Condition::{
    All, Any, Balanced, Heading, IsZero, NonZero, NotPassingJoint, PassingJoint, Unbalanced,
};
use Gauge::{P0, P1, P2, P3};

static DIRECT_PUSH: OnceLock<ProcedureTree> = OnceLock::new();
static DOUBLE_RAM: OnceLock<ProcedureTree> = OnceLock::new();
static ANNULAR_RAM_HYBRID: OnceLock<ProcedureTree> = OnceLock::new();

/// Validated procedure tree for a scenario.
pub fn tree(scenario: Scenario) -> &'static ProcedureTree {
    let (cell, build): (&OnceLock<ProcedureTree>, fn() -> ProcedureNode) = match scenario {
        Scenario::DirectPush => (&DIRECT_PUSH, direct_push),
        Scenario::DoubleRam => (&DOUBLE_RAM, double_ram),
        Scenario::AnnularRamHybrid => (&ANNULAR_RAM_HYBRID, annular_ram_hybrid),
    };
    cell.get_or_init(|| validated(build()))
}

/// The built-in trees are static data; a validation failure here is an
/// authoring bug caught by this module's tests, never an operator condition.
#[allow(clippy::panic)]
fn validated(root: ProcedureNode) -> ProcedureTree {
    match ProcedureTree::new(root) {
        Ok(tree) => tree,
        Err(e) => panic!("built-in procedure tree is malformed: {e}"),
    }
}

fn step(id: &str, label: &str, category: Category) -> ProcedureNode {
    ProcedureNode::new(id, label, category)
}

// ============================================================================
// Scenario 1: Direct push through annular
// ============================================================================

pub fn direct_push() -> ProcedureNode {
    step("s1", "Start: direct push through annular", Start)
        .detail("Initial state: annular closed, upper and lower rams open")
        .children(vec![step("s1.closing-pressure", "Set annular closing pressure", Action)
            .detail("Determined from casing pressure P3 = P2 = P1")
            .children(vec![step("s1.check-p0", "Check P0", Decision)
                .detail("Watch for P0 ≠ 0")
                .children(vec![
                    step("s1.adjust-annular", "Adjust annular closing pressure", Action)
                        .detail("P0 is not zero: increase annular closing pressure")
                        .when(NonZero(P0)),
                    step("s1.pressure-ok", "Pressure normal", Action)
                        .detail("P0 is zero: continue stripping")
                        .when(IsZero(P0)),
                ])])])
}

// ============================================================================
// Scenario 2: Double-ram alternating seal
// ============================================================================

pub fn double_ram() -> ProcedureNode {
    let no_joint = step("s2.no-joint", "No joint in stack", Decision)
        .when(NotPassingJoint)
        .children(vec![step("s2.single-ram", "Single-ram seal", Action)
            .detail("Lower ram closed by default")
            .children(vec![
                step("s2.seal-ok", "Seal check", Check)
                    .detail("Requires P2 = 0 and P0 = 0")
                    .when(All(vec![IsZero(P2), IsZero(P0)])),
                step("s2.seal-fault", "Seal abnormal", Action)
                    .detail("P2 rising: inspect lower ram")
                    .when(Any(vec![NonZero(P2), NonZero(P0)])),
            ])]);

    let joint = step("s2.joint", "Passing joint", Decision)
        .when(PassingJoint)
        .children(vec![step("s2.swap-prep", "1. Prepare ram swap", Action)
            .detail("Close upper ram")
            .children(vec![step("s2.balance-check", "2. Pressure balance check", Decision)
                .detail("Is P2 equal to P3?")
                .children(vec![
                    step("s2.balance-ok", "Balanced (P2 = P3)", Action)
                        .detail("Open lower ram, pass the joint")
                        .when(Balanced(P2, P3))
                        .children(vec![step("s2.joint-passed", "Joint passed", Action)
                            .detail("Close lower ram, bleed off P2, open upper ram")]),
                    step("s2.balance-needed", "Balance required (P2 ≠ P3)", Action)
                        .detail("Open equalizing valve to bring in casing pressure")
                        .when(Unbalanced(P2, P3)),
                ])])]);

    step("s2", "Scenario 2: double-ram alternating seal", Start)
        .detail("Used when the annular has failed or pressure is too high")
        .children(vec![no_joint, joint])
}

// ============================================================================
// Scenario 3: Annular and ram alternating
// ============================================================================

fn upper_ram_ready() -> Condition {
    All(vec![IsZero(P1), IsZero(P2)])
}

fn upper_ram_blocked() -> Condition {
    Any(vec![NonZero(P1), NonZero(P2)])
}

fn lower_ram_ready() -> Condition {
    All(vec![Balanced(P2, P3), IsZero(P0), IsZero(P1)])
}

fn lower_ram_blocked() -> Condition {
    Any(vec![Unbalanced(P2, P3), NonZero(P0), NonZero(P1)])
}

pub fn annular_ram_hybrid() -> ProcedureNode {
    let no_joint = step("s3.no-joint", "No joint in stack", Decision)
        .when(NotPassingJoint)
        .children(vec![step("s3.nj.lower-ram-pressure", "Set lower working ram pressure", Action)
            .detail("Determined from P3")
            .children(vec![
                step("s3.nj.rih", "Running in", Check)
                    .detail("Target: P0 = P1 = P2 = 0")
                    .when(Heading(Direction::Rih))
                    .children(vec![step("s3.nj.rih.check-p2", "Check P2", Decision)
                        .detail("P2 ≠ 0")
                        .when(NonZero(P2))
                        .children(vec![step(
                            "s3.nj.rih.adjust-lower",
                            "Adjust lower ram",
                            Action,
                        )])]),
                step("s3.nj.pooh", "Pulling out", Check)
                    .detail("Target: P0 = P1 = 0 and P2 = P3")
                    .when(Heading(Direction::Pooh))
                    .children(vec![step("s3.nj.pooh.check-p1", "Check P1", Decision)
                        .detail("P1 ≠ 0")
                        .when(NonZero(P1))
                        .children(vec![step(
                            "s3.nj.pooh.adjust-upper",
                            "Adjust upper ram",
                            Action,
                        )])]),
            ])]);

    let rih = step("s3.rih", "Running in: passing joint", Decision)
        .when(Heading(Direction::Rih))
        .children(vec![
            step("s3.rih.upper", "1. Before opening upper ram", Check)
                .detail("Confirm P1 = P2 = 0")
                .children(vec![
                    step("s3.rih.upper.ok", "Conditions met", Action)
                        .detail("Open upper ram, pass the joint")
                        .when(upper_ram_ready()),
                    step("s3.rih.upper.fail", "Conditions not met", Action)
                        .detail("Open bleed-off cross until P2 = P1 = 0")
                        .when(upper_ram_blocked()),
                ]),
            step("s3.rih.lower", "2. Before opening lower ram", Check)
                .detail("Confirm P2 = P3 and P0 = P1 = 0")
                .children(vec![
                    step("s3.rih.lower.ok", "Conditions met", Action)
                        .detail("Open lower ram, pass the joint")
                        .when(lower_ram_ready()),
                    step("s3.rih.lower.fail", "Conditions not met", Action)
                        .detail("Open equalizing cross: transfer pressure until P2 = P3")
                        .when(lower_ram_blocked())
                        .children(vec![step("s3.rih.lower.fault", "Fault handling", Decision)
                            .detail(
                                "P2 ≠ P3: check the cross; P1 ≠ 0: adjust upper ram; \
                                 P0 ≠ 0: adjust annular",
                            )]),
                ]),
        ]);

    let pooh = step("s3.pooh", "Pulling out: passing joint", Decision)
        .when(Heading(Direction::Pooh))
        .children(vec![
            step("s3.pooh.lower", "1. Before opening lower ram", Check)
                .detail("Confirm P2 = P3 and P0 = P1 = 0")
                .children(vec![
                    step("s3.pooh.lower.ok", "Conditions met", Action)
                        .detail("Open lower ram, pass the joint")
                        .when(lower_ram_ready()),
                    step("s3.pooh.lower.fail", "Conditions not met", Action)
                        .detail("Open equalizing cross: transfer pressure")
                        .when(lower_ram_blocked()),
                ]),
            step("s3.pooh.upper", "2. Before opening upper ram", Check)
                .detail("Confirm P1 = P2 = 0")
                .children(vec![
                    step("s3.pooh.upper.ok", "Conditions met", Action)
                        .detail("Open upper ram")
                        .when(upper_ram_ready()),
                    step("s3.pooh.upper.fail", "Conditions not met", Action)
                        .detail("Open bleed-off cross until P2 = P1 = 0")
                        .when(upper_ram_blocked()),
                ]),
        ]);

    let joint = step("s3.joint", "Passing joint", Decision)
        .when(PassingJoint)
        .children(vec![rih, pooh]);

    step("s3", "Scenario 3: annular / ram coordination", Start)
        .detail("Uses the collar transit")
        .children(vec![no_joint, joint])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_trees_validate() {
        for build in [direct_push, double_ram, annular_ram_hybrid] {
            assert!(ProcedureTree::new(build()).is_ok());
        }
    }

    #[test]
    fn test_tree_per_scenario() {
        assert_eq!(tree(Scenario::DirectPush).root().id, "s1");
        assert_eq!(tree(Scenario::DoubleRam).root().id, "s2");
        assert_eq!(tree(Scenario::AnnularRamHybrid).root().id, "s3");
    }

    #[test]
    fn test_tree_is_built_once() {
        let a: *const ProcedureTree = tree(Scenario::DoubleRam);
        let b: *const ProcedureTree = tree(Scenario::DoubleRam);
        assert_eq!(a, b);
    }

    #[test]
    fn test_tree_shapes() {
        // Scenario 1 is a single chain until the final fork
        let s1 = tree(Scenario::DirectPush);
        assert_eq!(s1.len(), 5);
        assert_eq!(s1.root().children.len(), 1);
        assert_eq!(s1.depth(), 3);

        // Scenario 2 forks on joint transit at the top
        let s2 = tree(Scenario::DoubleRam);
        let top: Vec<&str> = s2.root().children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(top, vec!["s2.no-joint", "s2.joint"]);
        assert_eq!(s2.len(), 11);

        // Scenario 3 forks on transit, then direction on both sides
        let s3 = tree(Scenario::AnnularRamHybrid);
        assert_eq!(s3.root().children.len(), 2);
        let joint = s3.find("s3.joint").unwrap();
        assert_eq!(joint.children.len(), 2);
        assert_eq!(s3.find("s3.nj.lower-ram-pressure").unwrap().children.len(), 2);
    }

    #[test]
    fn test_ids_prefixed_by_scenario() {
        for (scenario, prefix) in [
            (Scenario::DirectPush, "s1"),
            (Scenario::DoubleRam, "s2"),
            (Scenario::AnnularRamHybrid, "s3"),
        ] {
            assert!(tree(scenario)
                .root()
                .walk()
                .all(|(_, n)| n.id.starts_with(prefix)));
        }
    }
}
