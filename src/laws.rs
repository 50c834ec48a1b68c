//! Conservation laws every stable queue must satisfy.
//!
//! Used as a consistency check on computed indicators: a set of metrics that
//! violates `L = λW` points at a numerical problem (truncation, overflow,
//! cancellation) rather than at the model.
//!
//! # References
//!
//! - Little, J.D.C. (1961). "A Proof for the Queuing Formula: L = λW"

/// Little's law `L = λW`.
///
/// Holds for the queue alone (`E[N_Q] = λ·E[W]`) and for the whole system
/// (`E[N] = λ·E[V]`), independent of arrival and service distributions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LittlesLaw;

impl LittlesLaw {
    /// `L = λW`.
    #[must_use]
    pub fn evaluate(self, lambda: f64, w: f64) -> f64 {
        lambda * w
    }

    /// Relative deviation of `l` from `λw`.
    ///
    /// Measured against `l`, or against `λw` when `l` is zero. Two zeros
    /// agree perfectly.
    #[must_use]
    pub fn relative_error(self, l: f64, lambda: f64, w: f64) -> f64 {
        let expected = self.evaluate(lambda, w);
        if l.abs() > f64::EPSILON {
            (l - expected).abs() / l.abs()
        } else if expected.abs() > f64::EPSILON {
            (l - expected).abs() / expected.abs()
        } else {
            0.0
        }
    }

    /// Check that `l`, `lambda` and `w` satisfy Little's law.
    ///
    /// # Errors
    ///
    /// Returns a description of the violation if the relative error exceeds
    /// `tolerance` (or is NaN).
    pub fn validate(self, l: f64, lambda: f64, w: f64, tolerance: f64) -> Result<(), String> {
        let relative_error = self.relative_error(l, lambda, w);
        if relative_error <= tolerance {
            Ok(())
        } else {
            Err(format!(
                "Little's law violation: L={l:.6}, λW={:.6}, relative_error={relative_error:.3e} > tolerance={tolerance:.3e}",
                self.evaluate(lambda, w)
            ))
        }
    }

    /// Solve for `W` given `L` and `λ`.
    #[must_use]
    pub fn solve_w(self, l: f64, lambda: f64) -> f64 {
        if lambda.abs() < f64::EPSILON {
            f64::INFINITY
        } else {
            l / lambda
        }
    }
}
