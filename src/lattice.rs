// src/lattice.rs

use std::f64::consts::PI;

use crate::config::Settings;
use crate::vec3::Vector3;

/// Rings of particles on an nx × ny × nz grid of cells.
///
/// Ring centres sit `d + offset` apart in x and y; layers are `1 + offset` apart in z.
#[derive(Debug, Clone, Copy)]
pub struct RingLattice {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    pub per_ring: usize,
    pub diameter: f64,
    pub offset: f64,
}

impl RingLattice {
    pub fn new(nx: usize, ny: usize, nz: usize, per_ring: usize, diameter: f64, offset: f64) -> Self {
        Self {
            nx,
            ny,
            nz,
            per_ring,
            diameter,
            offset,
        }
    }

    pub fn from_settings(s: &Settings) -> Self {
        Self::new(s.x, s.y, s.z, s.n, s.d, s.offset)
    }

    pub fn n_cells(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    pub fn n_particles(&self) -> usize {
        self.n_cells() * self.per_ring
    }

    /// Cell indices (x, y, z) and position of the i-th particle.
    ///
    /// Particles fill a ring first, then cells run fastest in z, then y, then x.
    pub fn site(&self, i: usize) -> ([i32; 3], Vector3) {
        debug_assert!(i < self.n_particles());
        let cell = i / self.per_ring;
        let k = i % self.per_ring;
        let z = cell % self.nz;
        let layer = cell / self.nz;
        let x = layer / self.ny;
        let y = layer % self.ny;

        let pitch = self.diameter + self.offset;
        let radius = self.diameter / 2.0;
        let beta = k as f64 * 2.0 * PI / self.per_ring as f64;

        let loc = Vector3::new(
            x as f64 * pitch + radius * beta.cos(),
            y as f64 * pitch + radius * beta.sin(),
            z as f64 * (1.0 + self.offset),
        );
        ([x as i32, y as i32, z as i32], loc)
    }

    pub fn sites(&self) -> impl Iterator<Item = ([i32; 3], Vector3)> + '_ {
        (0..self.n_particles()).map(move |i| self.site(i))
    }

    /// Neighbouring particles on one ring overlap (particle radius `r`).
    pub fn ring_particles_overlap(&self, r: f64) -> bool {
        self.per_ring as f64 * r * 2.0 > self.diameter * PI
    }

    /// Neighbouring rings overlap (particle radius `r`).
    pub fn rings_overlap(&self, r: f64) -> bool {
        r * 2.0 > self.offset && self.n_cells() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_indexing_is_consistent() {
        let lat = RingLattice::new(2, 3, 2, 4, 10.0, 2.0);
        assert_eq!(lat.n_particles(), 48);

        let (cell, loc) = lat.site(0);
        assert_eq!(cell, [0, 0, 0]);
        assert_eq!(loc, Vector3::new(5.0, 0.0, 0.0));

        // second cell along z
        let (cell, loc) = lat.site(4);
        assert_eq!(cell, [0, 0, 1]);
        assert!((loc.z() - 3.0).abs() < 1e-12);

        // first cell of the second y row
        let (cell, _) = lat.site(4 * 2);
        assert_eq!(cell, [0, 1, 0]);

        // first cell of the second x column
        let (cell, loc) = lat.site(4 * 2 * 3);
        assert_eq!(cell, [1, 0, 0]);
        assert!((loc.x() - (12.0 + 5.0)).abs() < 1e-12);
    }

    #[test]
    fn ring_sites_lie_on_the_circle() {
        let lat = RingLattice::new(1, 1, 1, 7, 20.0, 4.0);
        for (_, loc) in lat.sites() {
            let r = (loc.x().powi(2) + loc.y().powi(2)).sqrt();
            assert!((r - 10.0).abs() < 1e-12);
        }
    }

    #[test]
    fn overlap_checks() {
        let lat = RingLattice::new(1, 1, 1, 50, 20.0, 4.0);
        assert!(lat.ring_particles_overlap(1.5));
        assert!(!lat.rings_overlap(1.5));
        let lat = RingLattice::new(2, 1, 1, 4, 20.0, 2.0);
        assert!(lat.rings_overlap(1.5));
    }
}
