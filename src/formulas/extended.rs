//! Extended Erlang C: the M/M/c/K+M system.
//!
//! `c` servers, at most `K` customers in the system (waiting plus in
//! service), and waiting customers who abandon at rate `ν` each. The
//! birth-death weights relative to the empty state are
//!
//! ```text
//! C_n = aⁿ/n!                                   n ≤ c
//! C_n = C_c · Π_{i=1}^{n−c} λ / (cμ + iν)       c < n ≤ K
//! p_n = C_n / Σ_{i=0}^{K} C_i
//! ```
//!
//! A customer arriving with `n ≥ c` customers present has to wait for
//! `n − c + 1` completions of rate `cμ + ν`, an Erlang-distributed delay,
//! which is where the incomplete gamma function in
//! [`extended_wait_cdf`] comes from. Customers arriving at capacity are
//! lost and count as not served within `t`.

use tracing::trace;

use super::primitive::power_over_factorial;
use crate::special::{LowerIncompleteGamma, NumericGamma};

/// Upper bound for [`extended_truncation_capacity`].
pub const MAX_TRUNCATED_CAPACITY: u32 = 1_000_000;

/// Relative tail mass below which an unlimited waiting room is cut off.
const TRUNCATION_EPS: f64 = 1e-15;

/// `C_n / C_{n−1}` for `n ≥ 1`.
fn weight_ratio(lambda: f64, mu: f64, nu: f64, c: u32, n: u32) -> f64 {
    if n <= c {
        (lambda / mu) / f64::from(n)
    } else {
        lambda / (f64::from(c) * mu + f64::from(n - c) * nu)
    }
}

/// Unnormalised state weight `C_n`.
///
/// Overflows to `∞` for large pools; the probabilities below never go
/// through this function.
#[must_use]
pub fn extended_cn(lambda: f64, mu: f64, nu: f64, c: u32, n: u32) -> f64 {
    if n <= c {
        return power_over_factorial(lambda / mu, n);
    }
    ((c + 1)..=n).fold(power_over_factorial(lambda / mu, c), |acc, i| {
        acc * weight_ratio(lambda, mu, nu, c, i)
    })
}

/// Running weights are divided down once they pass this value.
const RESCALE_ABOVE: f64 = 1e250;

/// State probabilities `p_0..=p_K`, built in one pass over the weights.
///
/// The weights `C_n` are carried relative to a running scale: whenever the
/// product passes [`RESCALE_ABOVE`] the table so far is divided through.
/// Only ratios of weights reach the probabilities, so `C_n` beyond the
/// range of `f64` never shows up as `∞` or `0·∞`. A degenerate normaliser
/// leaves every probability at 0.
#[derive(Debug, Clone)]
struct StateWeights {
    probabilities: Vec<f64>,
}

impl StateWeights {
    fn new(lambda: f64, mu: f64, nu: f64, c: u32, k: u32) -> Self {
        let mut weights = Vec::with_capacity(k as usize + 1);
        let mut current = 1.0;
        weights.push(current);
        for n in 1..=k {
            current *= weight_ratio(lambda, mu, nu, c, n);
            if current > RESCALE_ABOVE && current.is_finite() {
                for w in &mut weights {
                    *w /= current;
                }
                current = 1.0;
            }
            weights.push(current);
        }

        let sum: f64 = weights.iter().sum();
        if sum > 0.0 && sum.is_finite() {
            for w in &mut weights {
                *w /= sum;
            }
        } else {
            trace!(lambda, mu, nu, c, k, sum, "degenerate M/M/c/K+M normaliser");
            weights.fill(0.0);
        }

        Self {
            probabilities: weights,
        }
    }

    fn capacity(&self) -> u32 {
        (self.probabilities.len() - 1) as u32
    }

    /// `p_n`, 0 beyond capacity.
    fn probability(&self, n: u32) -> f64 {
        self.probabilities.get(n as usize).copied().unwrap_or(0.0)
    }

    /// `(n, p_n)` for `from ≤ n ≤ K`.
    fn probabilities_from(&self, from: u32) -> impl Iterator<Item = (u32, f64)> + '_ {
        (from..=self.capacity()).map(move |n| (n, self.probability(n)))
    }
}

/// Probability of exactly `n` customers in the M/M/c/K+M system.
///
/// Zero for `n > K`: arrivals beyond capacity are not represented.
#[must_use]
pub fn extended_state_p(lambda: f64, mu: f64, nu: f64, c: u32, k: u32, n: u32) -> f64 {
    if n > k {
        return 0.0;
    }
    StateWeights::new(lambda, mu, nu, c, k).probability(n)
}

/// Fraction of arrivals that abandon: `Σ_{n=c+1}^{K} (ν/λ)(n−c) p_n`.
#[must_use]
pub fn extended_abandon_probability(lambda: f64, mu: f64, nu: f64, c: u32, k: u32) -> f64 {
    let state = StateWeights::new(lambda, mu, nu, c, k);
    state
        .probabilities_from(c + 1)
        .map(|(n, p)| nu / lambda * f64::from(n - c) * p)
        .sum()
}

/// Probability that an arrival is admitted but finds every server busy:
/// `Σ_{n=c}^{K−1} p_n`.
#[must_use]
pub fn extended_delay_probability(lambda: f64, mu: f64, nu: f64, c: u32, k: u32) -> f64 {
    let state = StateWeights::new(lambda, mu, nu, c, k);
    state
        .probabilities_from(c)
        .filter(|&(n, _)| n < k)
        .map(|(_, p)| p)
        .sum()
}

/// Extended Erlang C waiting-time distribution `P(W ≤ t)`, evaluated with
/// [`NumericGamma`].
#[must_use]
pub fn extended_wait_cdf(lambda: f64, mu: f64, nu: f64, c: u32, k: u32, t: f64) -> f64 {
    extended_wait_cdf_with(&NumericGamma, lambda, mu, nu, c, k, t)
}

/// Extended Erlang C waiting-time distribution with a caller-supplied
/// regularized lower incomplete gamma function.
///
/// ```text
/// P(W ≤ t) = 1 − p_K − Σ_{n=c}^{K−1} p_n · (1 − P(n−c+1, (cμ+ν)t))
/// ```
///
/// When the normaliser degenerates every `p_n` is 0 and the result is 1.
#[must_use]
pub fn extended_wait_cdf_with<G>(
    gamma: &G,
    lambda: f64,
    mu: f64,
    nu: f64,
    c: u32,
    k: u32,
    t: f64,
) -> f64
where
    G: LowerIncompleteGamma + ?Sized,
{
    let state = StateWeights::new(lambda, mu, nu, c, k);
    let x = (f64::from(c) * mu + nu) * t;

    let mut p = 1.0 - state.probability(k);
    for (n, p_n) in state.probabilities_from(c) {
        if n == k || p_n == 0.0 {
            continue;
        }
        let shape = f64::from(n - c + 1);
        p -= p_n * (1.0 - gamma.lower(shape, x));
    }

    p
}

/// Expected number of waiting customers `Σ_{n=c+1}^{K} (n−c) p_n`.
#[must_use]
pub fn extended_expected_queue_length(lambda: f64, mu: f64, nu: f64, c: u32, k: u32) -> f64 {
    let state = StateWeights::new(lambda, mu, nu, c, k);
    state
        .probabilities_from(c + 1)
        .map(|(n, p)| f64::from(n - c) * p)
        .sum()
}

/// Expected number of customers in the system `Σ_{n=1}^{K} n p_n`.
#[must_use]
pub fn extended_expected_system_length(lambda: f64, mu: f64, nu: f64, c: u32, k: u32) -> f64 {
    let state = StateWeights::new(lambda, mu, nu, c, k);
    state
        .probabilities_from(1)
        .map(|(n, p)| f64::from(n) * p)
        .sum()
}

/// Expected waiting time `E[N_Q]/λ` (Little's law on the raw arrival rate).
#[must_use]
pub fn extended_expected_wait(lambda: f64, mu: f64, nu: f64, c: u32, k: u32) -> f64 {
    extended_expected_queue_length(lambda, mu, nu, c, k) / lambda
}

/// Expected time in system `E[N]/λ`.
#[must_use]
pub fn extended_expected_sojourn(lambda: f64, mu: f64, nu: f64, c: u32, k: u32) -> f64 {
    extended_expected_system_length(lambda, mu, nu, c, k) / lambda
}

/// Capacity at which an unlimited waiting room can be cut off.
///
/// Returns the smallest `K ≥ c` whose remaining tail `Σ_{n>K} C_n` is below
/// `1e-15` of `Σ_{n≤K} C_n`. Beyond `c` the ratios `C_{n+1}/C_n` never
/// increase, so the tail is bounded by `C_{K+1} / (1 − C_{K+1}/C_K)`.
///
/// Weight and sum are rescaled together, as in the state table, so the
/// relative criterion stays meaningful for weights beyond the `f64` range.
///
/// `None` if the tail never converges (`ν = 0` with `a ≥ c`) or needs more
/// than [`MAX_TRUNCATED_CAPACITY`] states.
#[must_use]
pub fn extended_truncation_capacity(lambda: f64, mu: f64, nu: f64, c: u32) -> Option<u32> {
    if nu <= 0.0 && lambda / mu >= f64::from(c) {
        trace!(lambda, mu, c, "unlimited waiting room without abandonment diverges");
        return None;
    }

    let mut current = 1.0;
    let mut sum = 1.0;
    let mut advance = |n: u32| {
        current *= weight_ratio(lambda, mu, nu, c, n);
        sum += current;
        if current > RESCALE_ABOVE && current.is_finite() {
            sum /= current;
            current = 1.0;
        }
        (current, sum)
    };
    for n in 1..=c {
        advance(n);
    }

    let mut k = c;
    while k < MAX_TRUNCATED_CAPACITY {
        let (next, total) = advance(k + 1);
        if !total.is_finite() {
            trace!(lambda, mu, nu, c, k, "truncation weights are not finite");
            return None;
        }
        let ratio = weight_ratio(lambda, mu, nu, c, k + 1);
        if ratio < 1.0 && next / (1.0 - ratio) <= (total - next) * TRUNCATION_EPS {
            return Some(k);
        }
        k += 1;
    }

    trace!(lambda, mu, nu, c, "truncation capacity exceeds limit");
    None
}
