// src/quartic.rs
//
// Real roots of the extremum equation of the in-plane energy
//
//     b x^4 + (c - a) x^3 + (c + a) x - b = 0,      x = tan(phi / 2)
//
// The root finder is a capability handed to the sample at construction. The default
// implementation never normalises by the leading coefficient: b vanishes as the
// field turns onto the easy axis, and one root then runs off toward infinity while
// the other three settle onto the b = 0 cubic. Instead the real line is cut at the
// critical points of the polynomial (found the same way, one degree lower), and
// each monotone piece with a sign change is refined by safeguarded Newton.

use tracing::warn;

use crate::error::SolverError;

/// Finds all real roots of `b x^4 + (c - a) x^3 + (c + a) x - b = 0`.
pub trait QuarticSolver: Send + Sync {
    fn solve(&self, a: f64, b: f64, c: f64) -> Result<Vec<f64>, SolverError>;
}

/// Value of the extremum polynomial at `x`.
#[inline]
pub fn quartic_value(a: f64, b: f64, c: f64, x: f64) -> f64 {
    let x2 = x * x;
    b * x2 * x2 + (c - a) * x2 * x + (c + a) * x - b
}

/// Residual at `x`, relative to the size of the individual terms.
pub fn quartic_residual(a: f64, b: f64, c: f64, x: f64) -> f64 {
    let ax = x.abs();
    let scale = b.abs() * ax.powi(4) + (c - a).abs() * ax.powi(3) + (c + a).abs() * ax + b.abs();
    if scale == 0.0 {
        return 0.0;
    }
    quartic_value(a, b, c, x).abs() / scale
}

/// Solve once; on failure retry a single time with the coefficients rescaled to
/// unit magnitude (the roots are unchanged by a common factor).
pub fn solve_with_retry(
    solver: &dyn QuarticSolver,
    a: f64,
    b: f64,
    c: f64,
) -> Result<Vec<f64>, SolverError> {
    match solver.solve(a, b, c) {
        Ok(roots) => Ok(roots),
        Err(err) => {
            let s = a.abs().max(b.abs()).max(c.abs());
            if !(s.is_finite() && s > 0.0) {
                return Err(err);
            }
            warn!(%err, "quartic solve failed, retrying with rescaled coefficients");
            solver.solve(a / s, b / s, c / s)
        }
    }
}

/// Roots beyond this are dropped (phi within 1e-60 of pi).
const MAX_ROOT: f64 = 1e60;

const MAX_REFINE_ITERS: usize = 500;

/// Root isolation between critical points, refined by bracketed Newton.
#[derive(Debug, Clone, Copy)]
pub struct BracketingSolver {
    /// Largest accepted relative residual of a returned root.
    pub tolerance: f64,
}

impl Default for BracketingSolver {
    fn default() -> Self {
        Self { tolerance: 1e-8 }
    }
}

impl QuarticSolver for BracketingSolver {
    fn solve(&self, a: f64, b: f64, c: f64) -> Result<Vec<f64>, SolverError> {
        if !(a.is_finite() && b.is_finite() && c.is_finite()) {
            return Err(SolverError::NonFinite { a, b, c });
        }

        let mut roots = polynomial_real_roots(&[-b, c + a, 0.0, c - a, b]);
        roots.retain(|x| x.is_finite());
        roots.sort_by(|x, y| x.total_cmp(y));
        roots.dedup_by(|x, y| (*x - *y).abs() <= 1e-9 * x.abs().max(y.abs()).max(1.0));

        for &root in &roots {
            let residual = quartic_residual(a, b, c, root);
            if !(residual <= self.tolerance) {
                return Err(SolverError::InvalidRoot { root, residual });
            }
        }
        Ok(roots)
    }
}

/// Horner evaluation of `sum coeffs[i] x^i`.
#[inline]
fn horner(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

fn derivative(coeffs: &[f64]) -> Vec<f64> {
    coeffs
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, &c)| i as f64 * c)
        .collect()
}

/// Cauchy bound on the root magnitudes, capped at `MAX_ROOT`.
fn root_bound(coeffs: &[f64]) -> f64 {
    let (lead, rest) = match coeffs.split_last() {
        Some((lead, rest)) => (lead.abs(), rest),
        None => return 0.0,
    };
    let largest = rest.iter().fold(0.0_f64, |m, c| m.max(c.abs()));
    (1.0 + largest / lead).min(MAX_ROOT)
}

/// Real roots of `sum coeffs[i] x^i` (constant term first). Trailing zero
/// coefficients lower the degree; roots of even multiplicity may be missed.
pub fn polynomial_real_roots(coeffs: &[f64]) -> Vec<f64> {
    let degree = match coeffs.iter().rposition(|&c| c != 0.0) {
        Some(d) => d,
        None => return Vec::new(),
    };
    let p = &coeffs[..=degree];
    match degree {
        0 => Vec::new(),
        1 => vec![-p[0] / p[1]],
        _ => {
            let dp = derivative(p);
            let bound = root_bound(p);
            let mut knots = vec![-bound, bound];
            knots.extend(
                polynomial_real_roots(&dp)
                    .into_iter()
                    .filter(|x| x.abs() < bound),
            );
            knots.sort_by(|x, y| x.total_cmp(y));
            knots
                .windows(2)
                .filter_map(|w| refine_in_bracket(p, &dp, w[0], w[1]))
                .collect()
        }
    }
}

/// The root of `p` in `[lo, hi]`, if `p` changes sign there or vanishes at an end.
fn refine_in_bracket(p: &[f64], dp: &[f64], lo: f64, hi: f64) -> Option<f64> {
    let (f_lo, f_hi) = (horner(p, lo), horner(p, hi));
    if f_lo == 0.0 {
        return Some(lo);
    }
    if f_hi == 0.0 {
        return Some(hi);
    }
    if (f_lo < 0.0) == (f_hi < 0.0) {
        return None;
    }

    // p(neg) < 0 < p(pos) throughout
    let (mut neg, mut pos) = if f_lo < 0.0 { (lo, hi) } else { (hi, lo) };
    let mut x = 0.5 * (lo + hi);
    let mut last_step = hi - lo;
    for _ in 0..MAX_REFINE_ITERS {
        let f = horner(p, x);
        if f == 0.0 {
            return Some(x);
        }
        if f < 0.0 {
            neg = x;
        } else {
            pos = x;
        }
        let (left, right) = if neg < pos { (neg, pos) } else { (pos, neg) };

        let newton = x - f / horner(dp, x);
        let next = if newton > left && newton < right && (newton - x).abs() < 0.5 * last_step {
            newton
        } else {
            0.5 * (left + right)
        };
        let step = (next - x).abs();
        if step == 0.0 || step <= 2.0 * f64::EPSILON * next.abs() {
            return Some(next);
        }
        last_step = step;
        x = next;
    }
    Some(x)
}
