//! Erlang C family: metrics of the M/M/c system.
//!
//! Every function takes the arrival rate `λ`, service rate `μ` and server
//! count `c` and works with the offered load `a = λ/μ`.
//!
//! # Unstable systems
//!
//! For `a ≥ c` the queue grows without bound and none of these quantities
//! exists. All functions then return exactly `0.0`. That value is a
//! sentinel meaning "undefined", not "nobody waits": use
//! [`crate::models::ErlangCModel`] to get an explicit
//! [`crate::models::Stability`] flag and a checked error instead.

use tracing::trace;

use super::mmc::mmc_wait_probability;

/// Offered load `λ/μ`, or `None` when the system has no steady state.
pub(crate) fn stable_load(lambda: f64, mu: f64, c: u32) -> Option<f64> {
    let a = lambda / mu;
    if a >= f64::from(c) {
        trace!(lambda, mu, c, a, "unstable M/M/c parameters");
        None
    } else {
        Some(a)
    }
}

/// Erlang C waiting-time distribution `P(W ≤ t) = 1 − C(c,a)·e^{−(c−a)μt}`.
///
/// Returns 0 for unstable systems.
#[must_use]
pub fn erlang_c_wait_cdf(lambda: f64, mu: f64, c: u32, t: f64) -> f64 {
    let Some(a) = stable_load(lambda, mu, c) else {
        return 0.0;
    };
    1.0 - mmc_wait_probability(a, c) * (-(f64::from(c) - a) * mu * t).exp()
}

/// Expected number of waiting customers `E[N_Q] = C(c,a)·a/(c−a)`.
///
/// Returns 0 for unstable systems.
#[must_use]
pub fn erlang_c_expected_queue_length(lambda: f64, mu: f64, c: u32) -> f64 {
    let Some(a) = stable_load(lambda, mu, c) else {
        return 0.0;
    };
    mmc_wait_probability(a, c) * a / (f64::from(c) - a)
}

/// Expected number of customers in the system `E[N] = E[N_Q] + a`.
///
/// Returns 0 for unstable systems.
#[must_use]
pub fn erlang_c_expected_system_length(lambda: f64, mu: f64, c: u32) -> f64 {
    let Some(a) = stable_load(lambda, mu, c) else {
        return 0.0;
    };
    erlang_c_expected_queue_length(lambda, mu, c) + a
}

/// Expected waiting time `E[W] = C(c,a)/(cμ − λ)`.
///
/// Returns 0 for unstable systems.
#[must_use]
pub fn erlang_c_expected_wait(lambda: f64, mu: f64, c: u32) -> f64 {
    let Some(a) = stable_load(lambda, mu, c) else {
        return 0.0;
    };
    mmc_wait_probability(a, c) / (f64::from(c) * mu - lambda)
}

/// Expected time in system `E[V] = E[W] + 1/μ`.
///
/// Returns 0 for unstable systems.
#[must_use]
pub fn erlang_c_expected_sojourn(lambda: f64, mu: f64, c: u32) -> f64 {
    if stable_load(lambda, mu, c).is_none() {
        return 0.0;
    }
    erlang_c_expected_wait(lambda, mu, c) + 1.0 / mu
}
