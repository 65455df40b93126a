// src/minimize.rs
//
// Single-particle energy optimisation in the plane spanned by the easy axis and
// the effective field.
//
// Angles are those of the easy axis measured from the moment (or from the field),
// about the plane normal e_z. In those angles the in-plane energy is
//   E(phi) = K sin^2(phi) + |B| M (1 - cos(phi - theta))
// and its stationary points solve, with x = tan(phi / 2),
//   b x^4 + (c - a) x^3 + (c + a) x - b = 0,   a = 4K, b = |B| M sin(theta), c = 2 |B| M cos(theta)
//
// Three branches:
//   zero field       decay toward the nearer end of the easy axis
//   B parallel to u  theta in {0, pi}, b = 0 and phi = pi is added by hand
//   general          project m into the plane and solve the quartic

use std::f64::consts::{PI, TAU};

use crate::energy::in_plane_energy;
use crate::error::{DegenerateKind, SimError};
use crate::params::{PhysicalParams, DELTA};
use crate::particle::{Extremum, Particle};
use crate::quartic::{solve_with_retry, QuarticSolver};

/// Which geometric branch the optimiser took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    ZeroField,
    Collinear,
    General,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Optimization {
    pub branch: Branch,
    /// The particle sits between two minima and is eligible for a thermal jump.
    pub two_minima: bool,
    /// Angle the moment was rotated toward.
    pub target: f64,
}

/// Forward angular distance from `from` to `to`, in [0, 2pi).
#[inline]
pub fn forward_distance(from: f64, to: f64) -> f64 {
    let d = to - from;
    if d < 0.0 {
        d + TAU
    } else {
        d
    }
}

/// Pick between two minima by counting the maxima that lie strictly closer, going
/// forward from `current`, than the first minimum. An even count keeps the first
/// minimum (index 0); an odd count selects the second (index 1).
pub fn select_minimum(current: f64, minima: &[Extremum], maxima: &[Extremum]) -> usize {
    let to_first = forward_distance(current, minima[0].angle);
    let crossed = maxima
        .iter()
        .filter(|m| forward_distance(current, m.angle) < to_first)
        .count();
    if crossed % 2 == 0 {
        0
    } else {
        1
    }
}

/// Sort stationary points by energy and split them: the lower `(n + 1) / 2` are
/// minima, the rest maxima.
pub fn split_extrema(mut points: Vec<Extremum>) -> (Vec<Extremum>, Vec<Extremum>) {
    points.sort_by(|p, q| p.energy.total_cmp(&q.energy));
    let n_min = (points.len() + 1) / 2;
    let maxima = points.split_off(n_min);
    (points, maxima)
}

impl Particle {
    /// Rotate the moment toward its local energy minimum for the current `b_eff`,
    /// closing `viscosity` of the angular gap, and store the resulting energy.
    pub fn optimize_energy(
        &mut self,
        params: &PhysicalParams,
        solver: &dyn QuarticSolver,
    ) -> Result<Optimization, SimError> {
        self.minima.clear();
        self.maxima.clear();

        let axis = self.anisotropy_axis;
        let b_eff = self.b_eff;
        let b_norm = b_eff.norm();

        if b_norm < DELTA {
            return Ok(self.decay_to_axis(params));
        }

        let (branch, theta) = if b_eff.is_collinear(&axis) {
            if self.moment.is_collinear(&axis) {
                return Err(SimError::Degenerate {
                    particle: self.id,
                    kind: DegenerateKind::FieldAndMomentAlongAxis,
                });
            }
            self.plane_normal = self.moment.cross(&axis).direction();
            let theta = if axis.dot(&b_eff) >= 0.0 { 0.0 } else { PI };
            (Branch::Collinear, theta)
        } else {
            let e_z = b_eff.cross(&axis).direction();
            self.plane_normal = e_z;
            let in_plane = self.moment - e_z * self.moment.dot(&e_z);
            self.moment = if in_plane.norm() < DELTA {
                axis.direction()
            } else {
                in_plane.direction()
            };
            (Branch::General, axis.angle_to_in_plane(&b_eff, &e_z))
        };

        let k = params.anisotropy;
        let b_m = b_norm * params.moment_magnitude;
        let a = 4.0 * k;
        let b = if branch == Branch::Collinear {
            0.0
        } else {
            b_m * theta.sin()
        };
        let c = 2.0 * b_m * theta.cos();

        let roots = solve_with_retry(solver, a, b, c).map_err(|source| SimError::SolverFailure {
            particle: self.id,
            source,
        })?;

        let mut angles: Vec<f64> = roots.iter().map(|x| 2.0 * x.atan()).collect();
        if b == 0.0 {
            angles.push(PI);
        }
        let points = angles
            .into_iter()
            .map(|phi| Extremum {
                energy: in_plane_energy(phi, theta, k, b_m),
                angle: phi,
            })
            .collect();
        let (minima, maxima) = split_extrema(points);

        let (target, two_minima) = match minima.len() {
            0 => {
                return Err(SimError::Degenerate {
                    particle: self.id,
                    kind: DegenerateKind::NoStationaryPoints,
                })
            }
            1 => (minima[0].angle, false),
            _ => {
                let pick = select_minimum(self.current_angle(), &minima, &maxima);
                (minima[pick].angle, true)
            }
        };

        self.minima = minima;
        self.maxima = maxima;
        self.rotate_toward(target, params.viscosity);
        self.energy = self.compute_energy(params);

        Ok(Optimization {
            branch,
            two_minima,
            target,
        })
    }

    /// Zero effective field: only anisotropy acts, so the moment relaxes toward
    /// whichever end of the easy axis is closer (ties go to the positive end).
    fn decay_to_axis(&mut self, params: &PhysicalParams) -> Optimization {
        let axis = self.anisotropy_axis;
        let mut target = 0.0;
        if !self.moment.is_collinear(&axis) {
            self.plane_normal = self.moment.cross(&axis).direction();
            let current = self.current_angle();
            if current.abs() > PI / 2.0 {
                target = PI.copysign(current);
            }
            self.rotate_toward(target, params.viscosity);
        }
        self.energy = self.compute_energy(params);
        Optimization {
            branch: Branch::ZeroField,
            two_minima: false,
            target,
        }
    }
}
