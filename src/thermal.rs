// src/thermal.rs
//
// Thermally activated jumps between the two minima of a bistable particle.
//
// Attempt probability per time step (Arrhenius):
//   p = exp(-dE / kT) * time_step,   dE = min(E_max) - E_current
//
// An accepted jump snaps the moment straight to the other minimum, independent
// of viscosity.

use rand::Rng;
use tracing::trace;

use crate::params::PhysicalParams;
use crate::particle::Particle;
use crate::sample::Sample;

/// Shortest unsigned angular distance between two angles, in [0, pi].
#[inline]
fn wrapped_distance(a: f64, b: f64) -> f64 {
    let d = a - b;
    d.sin().atan2(d.cos()).abs()
}

impl Particle {
    /// Barrier from the current minimum to the lower saddle. `None` unless the
    /// last optimisation found two minima and at least one maximum.
    pub fn barrier(&self) -> Option<f64> {
        if self.minima.len() < 2 || self.maxima.is_empty() {
            return None;
        }
        let lowest_max = self
            .maxima
            .iter()
            .map(|m| m.energy)
            .fold(f64::INFINITY, f64::min);
        Some(lowest_max - self.energy)
    }

    pub fn jump_probability(&self, kt: f64, time_step: f64) -> f64 {
        if kt <= 0.0 {
            return 0.0;
        }
        match self.barrier() {
            Some(de) => (-de / kt).exp() * time_step,
            None => 0.0,
        }
    }

    /// Draw once against the jump probability; on success rotate the moment to
    /// the other minimum and return `true`.
    pub fn attempt_jump<R: Rng + ?Sized>(&mut self, rng: &mut R, params: &PhysicalParams) -> bool {
        let p = self.jump_probability(params.kt, params.time_step);
        if p <= 0.0 {
            return false;
        }
        let u: f64 = rng.gen();
        if u >= p {
            return false;
        }
        let current = self.current_angle();
        let (first, second) = (self.minima[0].angle, self.minima[1].angle);
        let target = if wrapped_distance(current, first) >= wrapped_distance(current, second) {
            first
        } else {
            second
        };
        self.rotate_toward(target, 1.0);
        trace!(particle = self.id, p, target, "thermal jump");
        true
    }
}

impl Sample {
    /// Attempt a jump on every two-minimum particle. Every particle draws, even
    /// after an earlier one has jumped; returns whether any of them did.
    pub fn energy_jumps(&mut self) -> bool {
        let params = self.params;
        let mut jumped = false;
        for &i in &self.two_minimum {
            jumped |= self.particles[i].attempt_jump(&mut self.rng, &params);
        }
        jumped
    }
}
