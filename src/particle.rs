// src/particle.rs
//
// A particle goes through two stages:
//   ParticleState: position, moment, easy axis and cell (what gets persisted)
//   Particle: the same data sealed together with its neighbour lists
//
// `ParticleState::attach_neighbors` consumes the state, so neighbours can be
// attached exactly once.

use serde::{Deserialize, Serialize};

use crate::effective_field::{build_b_eff, DipoleLink, FieldBreakdown};
use crate::energy::{moment_energies, moment_energy, EnergyBreakdown};
use crate::neighbors::NeighborLists;
use crate::params::PhysicalParams;
use crate::rotation::RotationMatrix;
use crate::vec3::Vector3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleState {
    /// Position [nm].
    pub location: Vector3,
    /// Unit moment direction.
    pub moment: Vector3,
    /// Unit easy axis.
    pub anisotropy_axis: Vector3,
    /// Ring cell (x, y, z), if the particle was placed on a lattice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell: Option<[i32; 3]>,
}

impl ParticleState {
    pub fn new(location: Vector3, moment: Vector3, anisotropy_axis: Vector3) -> Self {
        Self {
            location,
            moment,
            anisotropy_axis,
            cell: None,
        }
    }

    pub fn with_cell(mut self, cell: [i32; 3]) -> Self {
        self.cell = Some(cell);
        self
    }

    /// Seal the particle with its neighbours. `locations` holds every particle's
    /// position, indexed like the neighbour lists.
    pub fn attach_neighbors(self, id: usize, lists: NeighborLists, locations: &[Vector3]) -> Particle {
        let dipole = lists
            .dipole
            .iter()
            .map(|&j| DipoleLink::new(j, self.location, locations[j]))
            .collect();
        Particle {
            id,
            location: self.location,
            moment: self.moment,
            anisotropy_axis: self.anisotropy_axis,
            cell: self.cell,
            dipole,
            exchange: lists.exchange,
            field: FieldBreakdown::default(),
            b_eff: Vector3::zero(),
            plane_normal: Vector3::zero(),
            minima: Vec::new(),
            maxima: Vec::new(),
            energy: 0.0,
        }
    }
}

/// A stationary point of the in-plane energy: (energy, angle).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremum {
    pub energy: f64,
    pub angle: f64,
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub(crate) id: usize,
    pub(crate) location: Vector3,
    pub(crate) moment: Vector3,
    pub(crate) anisotropy_axis: Vector3,
    pub(crate) cell: Option<[i32; 3]>,

    pub(crate) dipole: Vec<DipoleLink>,
    pub(crate) exchange: Vec<usize>,

    // per-pass state
    pub(crate) field: FieldBreakdown,
    pub(crate) b_eff: Vector3,
    pub(crate) plane_normal: Vector3,
    pub(crate) minima: Vec<Extremum>,
    pub(crate) maxima: Vec<Extremum>,
    pub(crate) energy: f64,
}

impl Particle {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn location(&self) -> Vector3 {
        self.location
    }

    pub fn moment(&self) -> Vector3 {
        self.moment
    }

    pub fn anisotropy_axis(&self) -> Vector3 {
        self.anisotropy_axis
    }

    pub fn cell(&self) -> Option<[i32; 3]> {
        self.cell
    }

    pub fn dipole_neighbors(&self) -> impl Iterator<Item = usize> + '_ {
        self.dipole.iter().map(|l| l.index)
    }

    pub fn exchange_neighbors(&self) -> &[usize] {
        &self.exchange
    }

    pub fn b_eff(&self) -> Vector3 {
        self.b_eff
    }

    pub fn field_breakdown(&self) -> &FieldBreakdown {
        &self.field
    }

    /// Normal of the plane spanned by the easy axis and the effective field.
    pub fn plane_normal(&self) -> Vector3 {
        self.plane_normal
    }

    pub fn minima(&self) -> &[Extremum] {
        &self.minima
    }

    pub fn maxima(&self) -> &[Extremum] {
        &self.maxima
    }

    /// Energy stored by the last optimisation.
    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn state(&self) -> ParticleState {
        ParticleState {
            location: self.location,
            moment: self.moment,
            anisotropy_axis: self.anisotropy_axis,
            cell: self.cell,
        }
    }

    /// Recompute B_eff from the frozen neighbour `moments`.
    pub fn compute_effective_field(&mut self, b_ext: Vector3, moments: &[Vector3], params: &PhysicalParams) {
        self.field = build_b_eff(b_ext, &self.dipole, &self.exchange, moments, params);
        self.b_eff = self.field.total();
    }

    pub fn compute_energy(&self, params: &PhysicalParams) -> f64 {
        moment_energy(
            &self.moment,
            &self.anisotropy_axis,
            &self.b_eff,
            params.anisotropy,
            params.moment_magnitude,
        )
    }

    pub fn compute_energies(&self, params: &PhysicalParams) -> EnergyBreakdown {
        moment_energies(
            &self.moment,
            &self.anisotropy_axis,
            &self.b_eff,
            &self.field.external,
            params.anisotropy,
            params.moment_magnitude,
        )
    }

    /// Signed in-plane angle of the easy axis measured from the moment, about the
    /// plane normal. Target angles of the optimiser use the same convention.
    pub fn current_angle(&self) -> f64 {
        self.anisotropy_axis
            .angle_to_in_plane(&self.moment, &self.plane_normal)
    }

    /// Rotate the moment about the plane normal, closing `fraction` of the gap
    /// between the current angle and `target`.
    pub fn rotate_toward(&mut self, target: f64, fraction: f64) {
        let delta = (self.current_angle() - target) * fraction;
        self.moment = RotationMatrix::about(&self.plane_normal, delta).apply(&self.moment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn isolated(moment: Vector3, axis: Vector3) -> Particle {
        ParticleState::new(Vector3::zero(), moment, axis).attach_neighbors(
            0,
            NeighborLists::default(),
            &[Vector3::zero()],
        )
    }

    #[test]
    fn attach_precomputes_dipole_geometry() {
        let locs = [Vector3::zero(), Vector3::new(0.0, 3.0, 0.0)];
        let lists = NeighborLists {
            dipole: vec![1],
            exchange: vec![],
        };
        let p = ParticleState::new(locs[0], Vector3::unit_z(), Vector3::unit_z())
            .with_cell([0, 0, 0])
            .attach_neighbors(0, lists, &locs);
        assert_eq!(p.dipole_neighbors().collect::<Vec<_>>(), vec![1]);
        assert_eq!(p.dipole[0].n, Vector3::unit_y());
        assert!((p.dipole[0].inv_r3 - 1.0 / 27.0).abs() < 1e-15);
        assert_eq!(p.cell(), Some([0, 0, 0]));
    }

    #[test]
    fn full_rotation_reaches_target_angle() {
        let mut p = isolated(Vector3::unit_x(), Vector3::unit_z());
        p.plane_normal = p.moment.cross(&p.anisotropy_axis).direction();
        assert!((p.current_angle() - FRAC_PI_2).abs() < 1e-12);

        p.rotate_toward(0.0, 1.0);
        assert!(p.current_angle().abs() < 1e-12);
        assert!((p.moment - Vector3::unit_z()).norm() < 1e-12);
    }

    #[test]
    fn partial_rotation_closes_fraction_of_gap() {
        let mut p = isolated(Vector3::unit_x(), Vector3::unit_z());
        p.plane_normal = p.moment.cross(&p.anisotropy_axis).direction();
        p.rotate_toward(0.0, 0.5);
        assert!((p.current_angle() - FRAC_PI_2 / 2.0).abs() < 1e-12);
        assert!((p.moment.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn state_round_trips_through_json() {
        let s = ParticleState::new(
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::unit_x(),
            Vector3::unit_z(),
        )
        .with_cell([1, 0, 2]);
        let json = serde_json::to_string(&s).unwrap();
        let back: ParticleState = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}
