// Copyright 2026 the Keyway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Epsilon-tolerant float comparisons.
//!
//! Layout coordinates are floats subject to rounding, so the engines never
//! compare them with exact `==`/`<`. The tolerance is relative to the
//! magnitudes involved, with a floor of 1.0 so coordinates near zero still
//! compare sanely.

const RELATIVE_EPS: f64 = 1e-6;

/// Whether `a` and `b` are close enough to count as equal.
pub(crate) fn are_close(a: f64, b: f64) -> bool {
    if a == b {
        // Covers exact equality, including infinities of the same sign.
        return true;
    }
    (a - b).abs() <= f64::max(f64::max(a.abs(), b.abs()), 1.0) * RELATIVE_EPS
}

/// Whether `a` is greater than `b` by more than the tolerance.
pub(crate) fn definitely_greater(a: f64, b: f64) -> bool {
    a > b && !are_close(a, b)
}

/// Whether `a` is less than `b` by more than the tolerance.
pub(crate) fn definitely_less(a: f64, b: f64) -> bool {
    a < b && !are_close(a, b)
}

/// Whether `a` is greater than `b` or close to it.
pub(crate) fn greater_or_close(a: f64, b: f64) -> bool {
    a > b || are_close(a, b)
}

/// Whether `a` is less than `b` or close to it.
pub(crate) fn less_or_close(a: f64, b: f64) -> bool {
    a < b || are_close(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_comparisons() {
        assert!(are_close(10.0, 10.0 + 1e-9));
        assert!(!are_close(10.0, 10.1));
        assert!(definitely_greater(10.1, 10.0));
        assert!(!definitely_greater(10.0 + 1e-9, 10.0));
        assert!(definitely_less(10.0, 10.1));
        assert!(greater_or_close(10.0, 10.0 + 1e-9));
        assert!(less_or_close(10.0 + 1e-9, 10.0));
    }

    #[test]
    fn near_zero_uses_absolute_floor() {
        assert!(are_close(0.0, 1e-9));
        assert!(!are_close(0.0, 0.1));
    }
}
