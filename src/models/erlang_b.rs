//! M/M/c/c loss model.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{PerformanceIndicators, QueueModel, Stability};
use crate::error::ErlangResult;
use crate::formulas::erlang_b_blocking_probability;

/// M/M/c/c: blocked customers are lost, nobody waits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErlangBModel {
    /// Arrival rate `λ`.
    pub lambda: f64,
    /// Service rate per server `μ`.
    pub mu: f64,
    /// Number of servers `c`.
    pub servers: u32,
}

impl ErlangBModel {
    /// Create a model from rates and server count.
    #[must_use]
    pub const fn new(lambda: f64, mu: f64, servers: u32) -> Self {
        Self { lambda, mu, servers }
    }

    /// Create a model from offered load alone, with time measured in mean
    /// service times (`μ = 1`).
    #[must_use]
    pub const fn from_traffic(traffic: f64, servers: u32) -> Self {
        Self::new(traffic, 1.0, servers)
    }

    /// Erlang B blocking probability.
    #[must_use]
    pub fn blocking_probability(&self) -> f64 {
        erlang_b_blocking_probability(self.traffic_intensity(), self.servers)
    }
}

impl QueueModel for ErlangBModel {
    fn kind(&self) -> &'static str {
        "M/M/c/c"
    }

    fn servers(&self) -> u32 {
        self.servers
    }

    fn traffic_intensity(&self) -> f64 {
        self.lambda / self.mu
    }

    fn stability(&self) -> Stability {
        Stability::Stable
    }

    fn indicators(&self) -> ErlangResult<PerformanceIndicators> {
        let blocking = self.blocking_probability();
        debug!(
            traffic = self.traffic_intensity(),
            servers = self.servers,
            blocking,
            "computing M/M/c/c indicators"
        );

        let carried = self.traffic_intensity() * (1.0 - blocking);
        Ok(PerformanceIndicators {
            traffic_intensity: self.traffic_intensity(),
            utilization: self.utilization(),
            effective_arrival_rate: self.lambda * (1.0 - blocking),
            wait_probability: Some(0.0),
            blocking_probability: Some(blocking),
            abandon_probability: None,
            expected_queue_length: 0.0,
            expected_system_length: carried,
            expected_wait: 0.0,
            expected_sojourn: 1.0 / self.mu,
        })
    }

    /// Accepted customers never wait, so `P(W ≤ t) = 1 − B` for all `t`.
    fn service_level(&self, _t: f64) -> ErlangResult<Option<f64>> {
        Ok(Some(1.0 - self.blocking_probability()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_traffic() {
        let model = ErlangBModel::from_traffic(1.0, 1);
        assert!((model.blocking_probability() - 0.5).abs() < f64::EPSILON);
        assert_eq!(model.stability(), Stability::Stable);
    }

    #[test]
    fn test_indicators_carried_load() {
        let model = ErlangBModel::new(20.0, 2.0, 10);
        let ind = model.indicators().unwrap();
        let b = ind.blocking_probability.unwrap();
        assert!((b - 0.214_582_343_107_347_36).abs() < 1e-13);
        assert!((ind.expected_system_length - 10.0 * (1.0 - b)).abs() < 1e-12);
        assert!(ind.check_littles_law(ind.effective_arrival_rate, 1e-12).is_ok());
    }

    #[test]
    fn test_overload_is_still_defined() {
        let model = ErlangBModel::from_traffic(50.0, 2);
        assert!(model.indicators().is_ok());
        let sl = model.service_level(10.0).unwrap().unwrap();
        assert!(sl > 0.0 && sl < 0.1);
    }
}
