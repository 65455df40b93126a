// src/effective_field/zeeman.rs

use crate::vec3::Vector3;

/// Uniform background induction B_ext (Tesla), passed through unchanged.
#[inline]
pub fn zeeman_field(b_ext: Vector3) -> Vector3 {
    b_ext
}
