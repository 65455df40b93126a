// src/effective_field/mod.rs
//
// Effective induction B_eff (Tesla) acting on one particle:
//   B_eff = B_ext + B_dipole + B_exchange
//
// Neighbour moments are always read from a frozen snapshot taken before any moment
// of the current pass is updated.
pub mod dipole;
pub mod exchange;
pub mod zeeman;

use crate::params::PhysicalParams;
use crate::vec3::Vector3;

pub use dipole::DipoleLink;

/// Per-contribution effective field of one particle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FieldBreakdown {
    pub external: Vector3,
    pub dipole: Vector3,
    pub exchange: Vector3,
}

impl FieldBreakdown {
    pub fn total(&self) -> Vector3 {
        self.external + self.dipole + self.exchange
    }
}

/// Build the field breakdown for one particle from neighbour moments in `moments`.
pub fn build_b_eff(
    b_ext: Vector3,
    dipole_links: &[DipoleLink],
    exchange_links: &[usize],
    moments: &[Vector3],
    params: &PhysicalParams,
) -> FieldBreakdown {
    FieldBreakdown {
        external: zeeman::zeeman_field(b_ext),
        dipole: dipole::dipole_field(dipole_links, moments, params.moment_magnitude),
        exchange: exchange::exchange_field(
            exchange_links,
            moments,
            params.exchange,
            params.moment_magnitude,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> PhysicalParams {
        PhysicalParams {
            moment_magnitude: 2.0,
            anisotropy: 1.0,
            exchange: 0.5,
            kt: 0.0,
            viscosity: 1.0,
            time_step: 1.0,
            total_time: 0.0,
            precision: 1,
            dipole_distance: 10.0,
            exchange_distance: 2.0,
        }
    }

    #[test]
    fn total_is_sum_of_contributions() {
        let moments = vec![Vector3::unit_z(), Vector3::unit_z()];
        let link = DipoleLink::new(1, Vector3::zero(), Vector3::new(2.0, 0.0, 0.0));
        let b = build_b_eff(Vector3::new(0.1, 0.0, 0.0), &[link], &[1], &moments, &params());
        assert_eq!(b.external, Vector3::new(0.1, 0.0, 0.0));
        // exchange: 0.5 * 2.0 * z
        assert_eq!(b.exchange, Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(b.total(), b.external + b.dipole + b.exchange);
    }
}
