// src/effective_field/exchange.rs

use crate::vec3::Vector3;

/// Exchange induction from close neighbours:
///   B_ex = J_ex * M * sum_j m_j
///
/// `exchange` is J_ex in T^2/J and `moment_magnitude` is M in J/T.
pub fn exchange_field(
    neighbors: &[usize],
    moments: &[Vector3],
    exchange: f64,
    moment_magnitude: f64,
) -> Vector3 {
    if exchange == 0.0 || neighbors.is_empty() {
        return Vector3::zero();
    }
    let sum = neighbors
        .iter()
        .fold(Vector3::zero(), |acc, &j| acc + moments[j]);
    sum * (exchange * moment_magnitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_pulls_along_neighbour_sum() {
        let moments = vec![
            Vector3::unit_x(),
            Vector3::unit_x(),
            Vector3::new(0.0, 1.0, 0.0),
        ];
        let b = exchange_field(&[1, 2], &moments, 2.0, 0.5);
        assert_eq!(b, Vector3::new(1.0, 1.0, 0.0));
        assert_eq!(exchange_field(&[], &moments, 2.0, 0.5), Vector3::zero());
    }
}
