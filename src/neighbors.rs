// src/neighbors.rs
//
// Pairwise cutoff neighbour lists. Every unordered pair is visited once and, when
// inside a cutoff, registered on both sides, so the lists are symmetric.

use crate::params::DELTA;
use crate::vec3::Vector3;

/// Neighbour indices of one particle (sorted ascending).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeighborLists {
    pub dipole: Vec<usize>,
    pub exchange: Vec<usize>,
}

/// Build neighbour lists for particles at `locations`.
///
/// A pair at distance `dist` is a dipole pair if `dist < dipole_cutoff` and an
/// exchange pair if `dist < exchange_cutoff`.
pub fn build_neighbor_lists(
    locations: &[Vector3],
    dipole_cutoff: f64,
    exchange_cutoff: f64,
) -> Vec<NeighborLists> {
    let n = locations.len();
    let mut lists = vec![NeighborLists::default(); n];
    for i in 0..n {
        for j in (i + 1)..n {
            let dist = (locations[j] - locations[i]).norm();
            if dist < dipole_cutoff {
                lists[i].dipole.push(j);
                lists[j].dipole.push(i);
            }
            if dist < exchange_cutoff {
                lists[i].exchange.push(j);
                lists[j].exchange.push(i);
            }
        }
    }
    lists
}

/// First pair of particles closer than `DELTA`, if any.
pub fn first_coincident_pair(locations: &[Vector3]) -> Option<(usize, usize)> {
    let n = locations.len();
    (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .find(|&(i, j)| (locations[j] - locations[i]).norm() < DELTA)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn lists_are_symmetric_and_match_cutoffs() {
        let mut rng = StdRng::seed_from_u64(3);
        let locs: Vec<Vector3> = (0..60)
            .map(|_| {
                Vector3::new(
                    rng.gen_range(0.0..40.0),
                    rng.gen_range(0.0..40.0),
                    rng.gen_range(0.0..10.0),
                )
            })
            .collect();
        let (dip, ex) = (15.0, 6.0);
        let lists = build_neighbor_lists(&locs, dip, ex);

        for i in 0..locs.len() {
            for j in 0..locs.len() {
                if i == j {
                    assert!(!lists[i].dipole.contains(&j));
                    continue;
                }
                let dist = (locs[i] - locs[j]).norm();
                assert_eq!(lists[i].dipole.contains(&j), dist < dip);
                assert_eq!(lists[i].exchange.contains(&j), dist < ex);
                assert_eq!(lists[i].dipole.contains(&j), lists[j].dipole.contains(&i));
                assert_eq!(lists[i].exchange.contains(&j), lists[j].exchange.contains(&i));
            }
        }
    }

    #[test]
    fn coincident_locations_are_reported() {
        let locs = [
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
        ];
        assert_eq!(first_coincident_pair(&locs), Some((1, 2)));
        assert_eq!(first_coincident_pair(&locs[..2]), None);
    }
}
