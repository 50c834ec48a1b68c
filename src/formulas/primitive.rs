//! The `xⁿ / n!` primitive shared by every formula family.
//!
//! [`power_over_factorial`] evaluates a single term. Sums over many terms
//! use [`scaled_power_over_factorials`] instead: `aᶜ/c!` leaves the range of
//! `f64` near `a = c ≈ 700`, while every probability built from those terms
//! is a ratio that does not.

/// Evaluate `xⁿ / n!` without materialising either `xⁿ` or `n!`.
///
/// The value is built as the running product `Π_{i=1}^{n} x/i`, so every
/// intermediate stays close to the magnitude of the result. `n = 0` yields
/// exactly 1 for any `x`, including `x = 0`.
///
/// # Example
///
/// ```rust
/// use erlangc::formulas::power_over_factorial;
///
/// assert_eq!(power_over_factorial(0.0, 0), 1.0);
/// assert!((power_over_factorial(2.0, 3) - 8.0 / 6.0).abs() < 1e-15);
/// ```
#[must_use]
pub fn power_over_factorial(x: f64, n: u32) -> f64 {
    (1..=n).fold(1.0, |acc, i| acc * (x / f64::from(i)))
}

/// The terms `xᵏ/k!` for `0 ≤ k ≤ n`, all divided by the largest of them.
///
/// The largest term sits at `k = min(⌊|x|⌋, n)` and becomes exactly 1; the
/// others are reached from it by the ratios `x/k` going up and `k/x` going
/// down, so nothing overflows. Terms far from the peak may underflow to 0.
///
/// # Example
///
/// ```rust
/// use erlangc::formulas::scaled_power_over_factorials;
///
/// let terms = scaled_power_over_factorials(1_000.0, 1_000);
/// assert_eq!(terms.len(), 1_001);
/// assert_eq!(terms[1_000], 1.0);
/// assert!(terms.iter().all(|t| t.is_finite()));
/// ```
#[must_use]
pub fn scaled_power_over_factorials(x: f64, n: u32) -> Vec<f64> {
    let peak = x.abs().floor().min(f64::from(n)) as usize;
    let mut terms = vec![0.0; n as usize + 1];
    terms[peak] = 1.0;
    for k in (1..=peak).rev() {
        terms[k - 1] = terms[k] * k as f64 / x;
    }
    for k in peak..n as usize {
        terms[k + 1] = terms[k] * x / (k + 1) as f64;
    }
    terms
}
