//! Valve-State Deriver
//!
//! Maps the state snapshot to the open/closed status of the three barrier
//! elements for each scenario. These rules describe the physical seal
//! arrangement and are kept separate from the procedure tree conditions; the
//! two are not guaranteed to agree in every edge case.
//!
//! Notable differences from the procedure trees:
//! - Scenario 2 judges the lower chamber against 90% of casing pressure, not
//!   the ±0.1 MPa balance band.
//! - Scenario 3 compares P2 and P3 exactly, not within the balance band.

use serde::{Deserialize, Serialize};

use crate::config::defaults::RAM_SWAP_BALANCE_RATIO;
use crate::procedure::is_zero;
use crate::scenario::Scenario;
use crate::types::{OperationState, PressureState};

/// Open (`true`) / closed (`false`) status of the BOP barrier elements
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValveState {
    pub annular_open: bool,
    pub upper_ram_open: bool,
    pub lower_ram_open: bool,
}

impl ValveState {
    pub const fn new(annular_open: bool, upper_ram_open: bool, lower_ram_open: bool) -> Self {
        Self {
            annular_open,
            upper_ram_open,
            lower_ram_open,
        }
    }
}

impl std::fmt::Display for ValveState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let word = |open: bool| if open { "open" } else { "closed" };
        write!(
            f,
            "annular {}, upper ram {}, lower ram {}",
            word(self.annular_open),
            word(self.upper_ram_open),
            word(self.lower_ram_open)
        )
    }
}

/// Derive barrier status for a scenario snapshot.
pub fn derive_valves(
    scenario: Scenario,
    pressures: &PressureState,
    operation: &OperationState,
) -> ValveState {
    match scenario {
        Scenario::DirectPush => direct_push(),
        Scenario::DoubleRam => double_ram(pressures, operation),
        Scenario::AnnularRamHybrid => annular_ram_hybrid(pressures, operation),
    }
}

/// Scenario 1: the annular seals, both rams stay open, whatever the inputs.
const fn direct_push() -> ValveState {
    ValveState::new(false, true, true)
}

/// Scenario 2: the annular stays closed and idle, never used as a seal.
/// Rams alternate; while a joint transits exactly one ram is open.
fn double_ram(p: &PressureState, op: &OperationState) -> ValveState {
    let (upper_ram_open, lower_ram_open) = if !op.passing_joint {
        // Default seal on the lower ram
        (true, false)
    } else if p.p2 > p.p3 * RAM_SWAP_BALANCE_RATIO {
        // Lower chamber balanced high: safe to open the lower ram
        (false, true)
    } else {
        // Lower chamber bled low: safe to open the upper ram
        (true, false)
    };

    ValveState::new(false, upper_ram_open, lower_ram_open)
}

/// Scenario 3: annular seals throughout; rams seal unless a joint is transiting
/// and their opening conditions hold. Direction does not change the rules.
#[allow(clippy::float_cmp)]
fn annular_ram_hybrid(p: &PressureState, op: &OperationState) -> ValveState {
    if !op.passing_joint {
        return ValveState::new(false, false, false);
    }

    let upper_ram_open = is_zero(p.p1) && is_zero(p.p2);
    let lower_ram_open = p.p2 == p.p3 && is_zero(p.p0);

    ValveState::new(false, upper_ram_open, lower_ram_open)
}
