//! M/M/c model.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{PerformanceIndicators, QueueModel, Stability};
use crate::error::{ErlangError, ErlangResult};
use crate::formulas::{
    erlang_c_expected_queue_length, erlang_c_expected_sojourn, erlang_c_expected_system_length,
    erlang_c_expected_wait, erlang_c_wait_cdf, mmc_state_p, mmc_wait_probability,
};

/// M/M/c queue with unlimited waiting room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErlangCModel {
    /// Arrival rate `λ`.
    pub lambda: f64,
    /// Service rate per server `μ`.
    pub mu: f64,
    /// Number of servers `c`.
    pub servers: u32,
}

impl ErlangCModel {
    /// Create a model from rates and server count.
    #[must_use]
    pub const fn new(lambda: f64, mu: f64, servers: u32) -> Self {
        Self { lambda, mu, servers }
    }

    /// Probability of `n` customers in the system (0 sentinel if unstable).
    #[must_use]
    pub fn state_probability(&self, n: u32) -> f64 {
        if self.stability().is_stable() {
            mmc_state_p(self.traffic_intensity(), self.servers, n)
        } else {
            0.0
        }
    }

    /// `P(W ≤ t)`; 0 for unstable systems.
    #[must_use]
    pub fn wait_cdf(&self, t: f64) -> f64 {
        erlang_c_wait_cdf(self.lambda, self.mu, self.servers, t)
    }

    /// `E[W]`; 0 for unstable systems.
    #[must_use]
    pub fn expected_wait(&self) -> f64 {
        erlang_c_expected_wait(self.lambda, self.mu, self.servers)
    }

    /// `E[N_Q]`; 0 for unstable systems.
    #[must_use]
    pub fn expected_queue_length(&self) -> f64 {
        erlang_c_expected_queue_length(self.lambda, self.mu, self.servers)
    }

    fn ensure_stable(&self) -> ErlangResult<()> {
        if self.stability().is_stable() {
            Ok(())
        } else {
            Err(ErlangError::Unstable {
                traffic: self.traffic_intensity(),
                servers: self.servers,
            })
        }
    }
}

impl QueueModel for ErlangCModel {
    fn kind(&self) -> &'static str {
        "M/M/c"
    }

    fn servers(&self) -> u32 {
        self.servers
    }

    fn traffic_intensity(&self) -> f64 {
        self.lambda / self.mu
    }

    fn stability(&self) -> Stability {
        Stability::from_load(self.traffic_intensity(), self.servers)
    }

    fn indicators(&self) -> ErlangResult<PerformanceIndicators> {
        self.ensure_stable()?;
        let (lambda, mu, c) = (self.lambda, self.mu, self.servers);
        debug!(lambda, mu, servers = c, "computing M/M/c indicators");

        Ok(PerformanceIndicators {
            traffic_intensity: self.traffic_intensity(),
            utilization: self.utilization(),
            effective_arrival_rate: lambda,
            wait_probability: Some(mmc_wait_probability(self.traffic_intensity(), c)),
            blocking_probability: None,
            abandon_probability: None,
            expected_queue_length: erlang_c_expected_queue_length(lambda, mu, c),
            expected_system_length: erlang_c_expected_system_length(lambda, mu, c),
            expected_wait: erlang_c_expected_wait(lambda, mu, c),
            expected_sojourn: erlang_c_expected_sojourn(lambda, mu, c),
        })
    }

    fn service_level(&self, t: f64) -> ErlangResult<Option<f64>> {
        self.ensure_stable()?;
        Ok(Some(self.wait_cdf(t)))
    }
}
