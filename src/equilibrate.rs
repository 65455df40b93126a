// src/equilibrate.rs
//
// Model-level orchestration on top of `relax()`:
//   (1) process_model: relax, then (T > 0) walk simulated time in `time_step`
//       increments, attempting thermal jumps and re-relaxing after each success
//   (2) hysteresis_step: set the external field, then run (1)
//
// Callers can observe the state after the first relaxation and around every
// accepted jump (e.g. to dump moments).

use tracing::info;

use crate::energy::EnergyBreakdown;
use crate::error::SimError;
use crate::params::S_TO_NS;
use crate::relax::RelaxStopReason;
use crate::sample::Sample;
use crate::vec3::Vector3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotPhase {
    /// Right after a jump, before re-relaxing.
    AfterJump,
    /// After a relaxation (the initial one, or the one following a jump).
    AfterRelax,
}

/// Where in the run an observer is being called.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    /// Jumps accepted so far in this run.
    pub jumps: usize,
    pub time_ns: f64,
    pub phase: SnapshotPhase,
}

impl Snapshot {
    /// `momenta_<jumps>_<1|2>_<t in s>.txt`; 1 marks the state right after a jump.
    pub fn file_name(&self) -> String {
        let id = match self.phase {
            SnapshotPhase::AfterJump => 1,
            SnapshotPhase::AfterRelax => 2,
        };
        format!("momenta_{}_{}_{:.9}.txt", self.jumps, id, self.time_ns / S_TO_NS)
    }
}

#[derive(Debug, Clone)]
pub struct ModelReport {
    /// Energies before the first relaxation.
    pub start: EnergyBreakdown,
    /// Energies after the last relaxation.
    pub end: EnergyBreakdown,
    /// Optimisation passes summed over every relaxation.
    pub total_steps: usize,
    /// Jumps accepted during this run.
    pub jumps: usize,
    pub jump_times_ns: Vec<f64>,
    /// The time loop ended because no particle had two minima left.
    pub stopped_early: bool,
    /// At least one relaxation ran out of passes.
    pub budget_exhausted: bool,
}

impl Sample {
    pub fn process_model(&mut self) -> Result<ModelReport, SimError> {
        self.process_model_with(|_, _| {})
    }

    /// As [`Sample::process_model`], calling `observer` after the first
    /// relaxation and twice per accepted jump (after the jump and after the
    /// following relaxation).
    pub fn process_model_with<F>(&mut self, mut observer: F) -> Result<ModelReport, SimError>
    where
        F: FnMut(&Sample, &Snapshot),
    {
        let first = self.relax()?;
        let start = first.start;
        let mut end = first.end;
        let mut total_steps = first.steps;
        let mut budget_exhausted = first.stop_reason == RelaxStopReason::BudgetExhausted;
        let mut jumps = 0usize;
        let mut jump_times_ns = Vec::new();
        let mut stopped_early = false;

        observer(
            &*self,
            &Snapshot {
                jumps,
                time_ns: 0.0,
                phase: SnapshotPhase::AfterRelax,
            },
        );

        let dt = self.params.time_step;
        if self.params.kt > 0.0 && dt > 0.0 {
            let n_ticks = (self.params.total_time / dt).floor() as usize;
            for tick in 0..=n_ticks {
                let t = tick as f64 * dt;
                if self.two_minimum.is_empty() {
                    info!(t_ns = t, "no two-minimum particles left, stopping thermal loop");
                    stopped_early = true;
                    break;
                }
                if !self.energy_jumps() {
                    continue;
                }

                jumps += 1;
                self.jump_count += 1;
                jump_times_ns.push(t);
                info!(t_s = t / S_TO_NS, total = self.jump_count, "thermal jump");
                observer(
                    &*self,
                    &Snapshot {
                        jumps,
                        time_ns: t,
                        phase: SnapshotPhase::AfterJump,
                    },
                );

                let rep = self.relax()?;
                end = rep.end;
                total_steps += rep.steps;
                budget_exhausted |= rep.stop_reason == RelaxStopReason::BudgetExhausted;
                observer(
                    &*self,
                    &Snapshot {
                        jumps,
                        time_ns: t,
                        phase: SnapshotPhase::AfterRelax,
                    },
                );
            }
        }

        Ok(ModelReport {
            start,
            end,
            total_steps,
            jumps,
            jump_times_ns,
            stopped_early,
            budget_exhausted,
        })
    }

    /// One point of a field sweep: apply `field` and equilibrate from the
    /// current moments.
    pub fn hysteresis_step(&mut self, field: Vector3) -> Result<ModelReport, SimError> {
        self.set_external_field(field);
        self.process_model()
    }
}
