//! M/M/c/K+M model with finite or unlimited waiting room.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{PerformanceIndicators, QueueModel, Stability};
use crate::error::{ErlangError, ErlangResult};
use crate::formulas::{
    extended_abandon_probability, extended_delay_probability, extended_expected_queue_length,
    extended_expected_sojourn, extended_expected_system_length, extended_expected_wait,
    extended_state_p, extended_truncation_capacity, extended_wait_cdf, MAX_TRUNCATED_CAPACITY,
};

/// Maximum number of customers in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capacity {
    /// At most `K` customers, waiting plus in service.
    Finite(u32),
    /// No limit. Evaluated on a truncated state space.
    Unlimited,
}

impl From<Option<u32>> for Capacity {
    fn from(capacity: Option<u32>) -> Self {
        capacity.map_or(Self::Unlimited, Self::Finite)
    }
}

/// M/M/c/K+M: `c` servers, capacity `K`, exponential patience with rate `ν`.
///
/// With a forwarding probability `p`, each served customer is sent back
/// into the queue with probability `p`. This is approximated by raising
/// the arrival rate to `λ(1 + p)` and treating the returns as fresh
/// Poisson arrivals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtendedModel {
    /// Arrival rate `λ`.
    pub lambda: f64,
    /// Service rate per server `μ`.
    pub mu: f64,
    /// Abandonment rate per waiting customer `ν`.
    pub nu: f64,
    /// Number of servers `c`.
    pub servers: u32,
    /// System capacity `K`.
    pub capacity: Capacity,
    /// Probability that a served customer is forwarded back into the queue.
    #[serde(default)]
    pub forwarding_probability: f64,
}

impl ExtendedModel {
    /// Create a model.
    #[must_use]
    pub const fn new(lambda: f64, mu: f64, nu: f64, servers: u32, capacity: Capacity) -> Self {
        Self {
            lambda,
            mu,
            nu,
            servers,
            capacity,
            forwarding_probability: 0.0,
        }
    }

    /// Forward a fraction of the served customers back into the queue.
    #[must_use]
    pub const fn with_forwarding(mut self, probability: f64) -> Self {
        self.forwarding_probability = probability;
        self
    }

    /// Arrival rate the servers see, `λ(1 + p)`.
    #[must_use]
    pub fn offered_arrival_rate(&self) -> f64 {
        self.lambda * (1.0 + self.forwarding_probability)
    }

    /// Capacity used for evaluation.
    ///
    /// # Errors
    ///
    /// [`ErlangError::Unstable`] if the waiting room is unlimited and nobody
    /// abandons while `a ≥ c`; [`ErlangError::Config`] if the state space
    /// does not truncate below [`MAX_TRUNCATED_CAPACITY`].
    pub fn resolved_capacity(&self) -> ErlangResult<u32> {
        match self.capacity {
            Capacity::Finite(k) => Ok(k),
            Capacity::Unlimited => {
                if !self.stability().is_stable() {
                    return Err(ErlangError::Unstable {
                        traffic: self.traffic_intensity(),
                        servers: self.servers,
                    });
                }
                let lambda = self.offered_arrival_rate();
                let k = extended_truncation_capacity(lambda, self.mu, self.nu, self.servers)
                    .ok_or_else(|| {
                        ErlangError::config(format!(
                            "unlimited waiting room needs more than {MAX_TRUNCATED_CAPACITY} states"
                        ))
                    })?;
                debug!(capacity = k, "truncated unlimited waiting room");
                Ok(k)
            }
        }
    }

    /// Probability of `n` customers in the system.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ExtendedModel::resolved_capacity`].
    pub fn state_probability(&self, n: u32) -> ErlangResult<f64> {
        let k = self.resolved_capacity()?;
        Ok(extended_state_p(
            self.offered_arrival_rate(),
            self.mu,
            self.nu,
            self.servers,
            k,
            n,
        ))
    }
}

impl QueueModel for ExtendedModel {
    fn kind(&self) -> &'static str {
        "M/M/c/K+M"
    }

    fn servers(&self) -> u32 {
        self.servers
    }

    fn traffic_intensity(&self) -> f64 {
        self.offered_arrival_rate() / self.mu
    }

    /// A finite state space or abandonment always yields a steady state.
    fn stability(&self) -> Stability {
        match self.capacity {
            Capacity::Finite(_) => Stability::Stable,
            Capacity::Unlimited if self.nu > 0.0 => Stability::Stable,
            Capacity::Unlimited => Stability::from_load(self.traffic_intensity(), self.servers),
        }
    }

    fn indicators(&self) -> ErlangResult<PerformanceIndicators> {
        let k = self.resolved_capacity()?;
        let (lambda, mu, nu, c) = (self.offered_arrival_rate(), self.mu, self.nu, self.servers);
        debug!(lambda, mu, nu, servers = c, capacity = k, "computing M/M/c/K+M indicators");

        Ok(PerformanceIndicators {
            traffic_intensity: self.traffic_intensity(),
            utilization: self.utilization(),
            effective_arrival_rate: lambda,
            wait_probability: Some(extended_delay_probability(lambda, mu, nu, c, k)),
            blocking_probability: Some(extended_state_p(lambda, mu, nu, c, k, k)),
            abandon_probability: Some(extended_abandon_probability(lambda, mu, nu, c, k)),
            expected_queue_length: extended_expected_queue_length(lambda, mu, nu, c, k),
            expected_system_length: extended_expected_system_length(lambda, mu, nu, c, k),
            expected_wait: extended_expected_wait(lambda, mu, nu, c, k),
            expected_sojourn: extended_expected_sojourn(lambda, mu, nu, c, k),
        })
    }

    fn service_level(&self, t: f64) -> ErlangResult<Option<f64>> {
        let k = self.resolved_capacity()?;
        Ok(Some(extended_wait_cdf(
            self.offered_arrival_rate(),
            self.mu,
            self.nu,
            self.servers,
            k,
            t,
        )))
    }
}
