// src/effective_field/dipole.rs
//
// Point-dipole coupling between particles:
//   B_dip = DIPOLE_CONST * M * sum_j (3 (n · m_j) n - m_j) / |r|^3,   r = loc_j - loc_i, n = r / |r|
//
// Positions never change, so n and 1/|r|^3 are computed once when the neighbour
// list is attached.

use crate::params::DIPOLE_CONST;
use crate::vec3::Vector3;

/// Precomputed geometry of one dipole neighbour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DipoleLink {
    pub index: usize,
    pub n: Vector3,
    pub inv_r3: f64,
}

impl DipoleLink {
    pub fn new(index: usize, from: Vector3, to: Vector3) -> Self {
        let r = to - from;
        let dist = r.norm();
        Self {
            index,
            n: r.direction(),
            inv_r3: 1.0 / (dist * dist * dist),
        }
    }
}

pub fn dipole_field(links: &[DipoleLink], moments: &[Vector3], moment_magnitude: f64) -> Vector3 {
    if links.is_empty() {
        return Vector3::zero();
    }
    let sum = links.iter().fold(Vector3::zero(), |acc, link| {
        let mj = moments[link.index];
        acc + (3.0 * link.n.dot(&mj) * link.n - mj) * link.inv_r3
    });
    sum * (moment_magnitude * DIPOLE_CONST)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_to_tail_field_is_twice_side_by_side() {
        let moments = vec![Vector3::unit_x(), Vector3::unit_x()];
        let along = DipoleLink::new(1, Vector3::zero(), Vector3::new(2.0, 0.0, 0.0));
        let beside = DipoleLink::new(1, Vector3::zero(), Vector3::new(0.0, 2.0, 0.0));

        let b_along = dipole_field(&[along], &moments, 1e-20);
        let b_beside = dipole_field(&[beside], &moments, 1e-20);

        // along the axis: 2 m / r^3; beside: -m / r^3 (DIPOLE_CONST * 1e-20 = 1)
        assert!((b_along.x() - 2.0 / 8.0).abs() < 1e-12);
        assert!((b_beside.x() + 1.0 / 8.0).abs() < 1e-12);
        assert!(b_beside.y().abs() < 1e-12);
    }
}
