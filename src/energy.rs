// src/energy.rs
//
// Energy of a single moment (J), with m and the anisotropy axis unit vectors:
//   E = K |m × u|^2 + M (|m||B| - m · B)
//
// The field term is non-negative and vanishes when m is aligned with B, so both
// terms share the zero of a fully relaxed, field-aligned moment. The in-plane form
// used by the extremum search is the same energy written in angles:
//   E(phi) = K sin^2(phi) + |B| M (1 - cos(phi - theta))

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use crate::params::EV_TO_J;
use crate::vec3::Vector3;

/// Total energy split by origin (J).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnergyBreakdown {
    pub anisotropy: f64,
    /// Dipole + exchange part of the field term.
    pub interaction: f64,
    /// External-field part of the field term.
    pub zeeman: f64,
}

impl EnergyBreakdown {
    pub fn total(&self) -> f64 {
        self.anisotropy + self.interaction + self.zeeman
    }
}

impl Add for EnergyBreakdown {
    type Output = EnergyBreakdown;
    fn add(self, rhs: EnergyBreakdown) -> EnergyBreakdown {
        EnergyBreakdown {
            anisotropy: self.anisotropy + rhs.anisotropy,
            interaction: self.interaction + rhs.interaction,
            zeeman: self.zeeman + rhs.zeeman,
        }
    }
}

impl Sum for EnergyBreakdown {
    fn sum<I: Iterator<Item = EnergyBreakdown>>(iter: I) -> Self {
        iter.fold(EnergyBreakdown::default(), Add::add)
    }
}

/// Printed in eV.
impl fmt::Display for EnergyBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total: {:.3e} eV (an: {:.3e}, int: {:.3e}, B: {:.3e})",
            self.total() / EV_TO_J,
            self.anisotropy / EV_TO_J,
            self.interaction / EV_TO_J,
            self.zeeman / EV_TO_J
        )
    }
}

#[inline]
pub fn anisotropy_energy(m: &Vector3, axis: &Vector3, k: f64) -> f64 {
    let s = m.cross(axis).norm();
    k * s * s
}

#[inline]
pub fn field_energy(m: &Vector3, b: &Vector3, moment_magnitude: f64) -> f64 {
    moment_magnitude * (m.norm() * b.norm() - m.dot(b))
}

/// Energy of moment `m` in effective field `b_eff`.
pub fn moment_energy(m: &Vector3, axis: &Vector3, b_eff: &Vector3, k: f64, moment_magnitude: f64) -> f64 {
    anisotropy_energy(m, axis, k) + field_energy(m, b_eff, moment_magnitude)
}

/// Energy at in-plane angle `phi` from the axis, with the field at `theta` and
/// `b_m = |B_eff| * M`.
#[inline]
pub fn in_plane_energy(phi: f64, theta: f64, k: f64, b_m: f64) -> f64 {
    let s = phi.sin();
    k * s * s + b_m * (1.0 - (phi - theta).cos())
}

/// Breakdown of one moment's energy; `b_ext` is the external part of `b_eff`.
pub fn moment_energies(
    m: &Vector3,
    axis: &Vector3,
    b_eff: &Vector3,
    b_ext: &Vector3,
    k: f64,
    moment_magnitude: f64,
) -> EnergyBreakdown {
    let e_field = field_energy(m, b_eff, moment_magnitude);
    let e_ext = field_energy(m, b_ext, moment_magnitude);
    EnergyBreakdown {
        anisotropy: anisotropy_energy(m, axis, k),
        interaction: e_field - e_ext,
        zeeman: e_ext,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn aligned_moment_has_zero_energy() {
        let z = Vector3::unit_z();
        let e = moment_energy(&z, &z, &(z * 0.3), 2.0, 1.5);
        assert!(e.abs() < 1e-15);
    }

    #[test]
    fn vector_and_angle_forms_agree() {
        let (k, bm) = (1.3, 0.7);
        let axis = Vector3::unit_z();
        let theta = 0.4_f64;
        // field at theta from the axis in the xz-plane, |B| = 1, M = bm
        let b = Vector3::new(theta.sin(), 0.0, theta.cos());
        for phi in [0.0, 0.3, FRAC_PI_2, 2.0, PI, -1.0] {
            let m = Vector3::new(phi.sin(), 0.0, phi.cos());
            let e_vec = moment_energy(&m, &axis, &b, k, bm);
            let e_ang = in_plane_energy(phi, theta, k, bm);
            assert!((e_vec - e_ang).abs() < 1e-12, "phi={phi}: {e_vec} vs {e_ang}");
        }
    }

    #[test]
    fn breakdown_sums_to_moment_energy() {
        let m = Vector3::new(0.6, 0.0, 0.8);
        let axis = Vector3::unit_x();
        let b_ext = Vector3::new(0.0, 0.0, 0.2);
        let b_eff = b_ext + Vector3::new(0.05, 0.01, 0.0);
        let br = moment_energies(&m, &axis, &b_eff, &b_ext, 1.0, 2.0);
        let e = moment_energy(&m, &axis, &b_eff, 1.0, 2.0);
        assert!((br.total() - e).abs() < 1e-12);
    }
}
