// src/relax.rs
//
// Relaxation controller: repeat optimisation passes until the relative energy
// change drops below RELATIVE_ENERGY_PRECISION or the pass budget (`precision`)
// runs out.
//
// Relative change of one pass:
//   delta = (E_old - E_new) / E_old,   negative delta -> 1 - delta
// so a pass that raises the energy never counts as converged.

use tracing::{info, warn};

use crate::energy::EnergyBreakdown;
use crate::error::SimError;
use crate::params::RELATIVE_ENERGY_PRECISION;
use crate::sample::Sample;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelaxStopReason {
    /// Relative energy change fell below the threshold.
    Converged,
    /// Ran `precision` passes without converging.
    BudgetExhausted,
}

#[derive(Debug, Clone, Copy)]
pub struct RelaxReport {
    pub start: EnergyBreakdown,
    pub end: EnergyBreakdown,
    /// Optimisation passes run.
    pub steps: usize,
    pub stop_reason: RelaxStopReason,
}

/// Relative energy change between two passes. Two zero energies count as no change.
pub fn relative_change(old: f64, new: f64) -> f64 {
    if old == 0.0 && new == 0.0 {
        return 0.0;
    }
    let delta = (old - new) / old;
    if delta < 0.0 {
        1.0 - delta
    } else {
        delta
    }
}

impl Sample {
    /// Rebuild the effective fields and run optimisation passes to convergence.
    ///
    /// At least one pass always runs. Running out of passes is reported through
    /// `stop_reason`, not as an error.
    pub fn relax(&mut self) -> Result<RelaxReport, SimError> {
        self.compute_effective_fields();
        let start = self.energies();

        let budget = self.params.precision.max(1);
        let mut previous = None;
        let mut steps = 0usize;
        let mut stop_reason = RelaxStopReason::BudgetExhausted;

        while steps < budget {
            let (old, new) = self.optimize_pass(previous)?;
            steps += 1;
            if relative_change(old, new) < RELATIVE_ENERGY_PRECISION {
                stop_reason = RelaxStopReason::Converged;
                break;
            }
            previous = Some(new);
        }

        let end = self.energies();
        match stop_reason {
            RelaxStopReason::Converged => info!(steps, "relaxed: {end}"),
            RelaxStopReason::BudgetExhausted => {
                warn!(steps, "relaxation budget exhausted before convergence: {end}")
            }
        }

        Ok(RelaxReport {
            start,
            end,
            steps,
            stop_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_change_conventions() {
        assert_eq!(relative_change(0.0, 0.0), 0.0);
        assert!((relative_change(2.0, 1.0) - 0.5).abs() < 1e-15);
        // energy went up: 1 - (-0.5)
        assert!((relative_change(2.0, 3.0) - 1.5).abs() < 1e-15);
        assert!(relative_change(0.0, 1e-30) > RELATIVE_ENERGY_PRECISION);
    }
}
