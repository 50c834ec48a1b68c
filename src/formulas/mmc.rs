//! Steady-state probabilities of the M/M/c system (unlimited waiting room).
//!
//! With offered load `a = λ/μ` and `c` servers:
//!
//! ```text
//! p_0 = 1 / ( Σ_{k=0}^{c-1} aᵏ/k!  +  aᶜ/c! · c/(c−a) )
//! p_n = aⁿ/n! · p_0                      1 ≤ n ≤ c
//! p_n = aᶜ/c! · (a/c)^{n−c} · p_0        n > c
//! P(wait) = aᶜ/c! · c/(c−a) · p_0
//! ```

use tracing::trace;

use super::primitive::scaled_power_over_factorials;

/// The normalising sum with every term divided by the largest `aᵏ/k!`.
///
/// The common factor cancels in every probability, so `aᶜ/c!` is never
/// formed on its own and large server pools stay finite.
struct Normaliser {
    terms: Vec<f64>,
    queue: f64,
    sum: f64,
}

impl Normaliser {
    /// `None` when the sum is not a positive finite number.
    fn new(a: f64, c: u32) -> Option<Self> {
        let servers = f64::from(c);
        let terms = scaled_power_over_factorials(a, c);
        let queue = terms[c as usize] * servers / (servers - a);
        let sum = terms[..c as usize].iter().sum::<f64>() + queue;

        if sum > 0.0 && sum.is_finite() {
            Some(Self { terms, queue, sum })
        } else {
            trace!(a, c, sum, "degenerate M/M/c normaliser");
            None
        }
    }

    fn state(&self, a: f64, c: u32, n: u32) -> f64 {
        match self.terms.get(n as usize) {
            Some(term) => term / self.sum,
            None => self.terms[c as usize] * (a / f64::from(c)).powf(f64::from(n - c)) / self.sum,
        }
    }
}

/// Probability that the M/M/c system is empty.
///
/// Returns 0 when the normalising sum is not a positive finite number, which
/// is what happens at `a = c` exactly. For `a > c` the expression has no
/// probabilistic meaning; callers that need a steady state must check
/// `a < c` themselves. For loads in the hundreds the true value is below
/// the smallest `f64` and also comes out as 0; the other functions here
/// do not go through `p_0` and remain accurate.
#[must_use]
pub fn mmc_state_p0(a: f64, c: u32) -> f64 {
    mmc_state_p(a, c, 0)
}

/// Probability of exactly `n` customers in the M/M/c system.
///
/// 0 wherever [`mmc_state_p0`] degenerates.
#[must_use]
pub fn mmc_state_p(a: f64, c: u32, n: u32) -> f64 {
    Normaliser::new(a, c).map_or(0.0, |norm| norm.state(a, c, n))
}

/// Probability that an arriving customer finds all `c` servers busy.
///
/// This is the Erlang C probability `C(c, a)` every metric of
/// [`super::erlang_c`] is built from. 0 wherever [`mmc_state_p0`]
/// degenerates.
#[must_use]
pub fn mmc_wait_probability(a: f64, c: u32) -> f64 {
    Normaliser::new(a, c).map_or(0.0, |norm| norm.queue / norm.sum)
}
