//! Angular momentum coupling.
use super::half::Half;

/// Returns `(-1)^φ`
#[inline]
pub fn phase(phi: i32) -> f64 {
    if phi % 2 == 0 {
        1.0
    } else {
        -1.0
    }
}

/// Returns `−(-1)^φ`, the sign picked up when exchanging the two
/// constituents of a coupled pair (with `φ = j1 + j2 − J`).
#[inline]
pub fn phase_neg(phi: i32) -> f64 {
    -phase(phi)
}

/// Exchange phase `−(−1)^(j1 + j2 − J)` of a two-particle state.
#[inline]
pub fn exchange_phase(j1: Half<i32>, j2: Half<i32>, j12: Half<i32>) -> f64 {
    -(j1 + j2 - j12).phase()
}

/// `√(2 j + 1)`
#[inline]
pub fn hat(j: Half<i32>) -> f64 {
    ((j.twice() + 1) as f64).sqrt()
}

/// `2 j + 1`
#[inline]
pub fn hat_sq(j: Half<i32>) -> f64 {
    (j.twice() + 1) as f64
}

/// Smallest value allowed by the triangular condition.
#[inline]
pub fn tri_min(j1: Half<i32>, j2: Half<i32>) -> Half<i32> {
    j1.abs_diff(j2)
}

/// Largest value allowed by the triangular condition.
#[inline]
pub fn tri_max(j1: Half<i32>, j2: Half<i32>) -> Half<i32> {
    j1 + j2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factors() {
        assert_eq!(phase(3), -1.0);
        assert_eq!(phase(-2), 1.0);
        assert_eq!(phase_neg(0), -1.0);
        assert_eq!(hat_sq(Half(3)), 4.0);
        assert_eq!(hat(Half(3)), 2.0);
        assert_eq!(tri_min(Half(1), Half(5)), Half(4));
        assert_eq!(tri_max(Half(1), Half(5)), Half(6));
        // two j = 1/2 particles: J = 0 even, J = 1 odd
        assert_eq!(exchange_phase(Half(1), Half(1), Half(0)), 1.0);
        assert_eq!(exchange_phase(Half(1), Half(1), Half(2)), -1.0);
    }
}
