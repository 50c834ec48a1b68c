//! GI/G/c model evaluated with the Allen–Cunneen approximation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{PerformanceIndicators, QueueModel, Stability};
use crate::error::{ErlangError, ErlangResult};
use crate::formulas::{allen_cunneen, mmc_wait_probability, AllenCunneenInput, AllenCunneenMetrics};

/// GI/G/c queue with batch arrivals and batch service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllenCunneenModel {
    input: AllenCunneenInput,
}

impl AllenCunneenModel {
    /// Wrap approximation inputs.
    #[must_use]
    pub const fn new(input: AllenCunneenInput) -> Self {
        Self { input }
    }

    /// Approximation inputs.
    #[must_use]
    pub const fn input(&self) -> &AllenCunneenInput {
        &self.input
    }

    /// Raw approximation result; all zeros if unstable.
    #[must_use]
    pub fn metrics(&self) -> AllenCunneenMetrics {
        allen_cunneen(&self.input)
    }
}

impl From<AllenCunneenInput> for AllenCunneenModel {
    fn from(input: AllenCunneenInput) -> Self {
        Self::new(input)
    }
}

impl QueueModel for AllenCunneenModel {
    fn kind(&self) -> &'static str {
        "GI/G/c"
    }

    fn servers(&self) -> u32 {
        self.input.servers
    }

    /// `c·ρ`, the load the Erlang C term is evaluated at.
    fn traffic_intensity(&self) -> f64 {
        f64::from(self.input.servers) * self.input.utilization()
    }

    fn utilization(&self) -> f64 {
        self.input.utilization()
    }

    fn stability(&self) -> Stability {
        if self.input.utilization() < 1.0 {
            Stability::Stable
        } else {
            Stability::Unstable
        }
    }

    fn indicators(&self) -> ErlangResult<PerformanceIndicators> {
        if !self.stability().is_stable() {
            return Err(ErlangError::Unstable {
                traffic: self.traffic_intensity(),
                servers: self.input.servers,
            });
        }
        debug!(
            lambda = self.input.arrival_rate(),
            rho = self.input.utilization(),
            servers = self.input.servers,
            "computing Allen-Cunneen indicators"
        );

        let metrics = self.metrics();
        Ok(PerformanceIndicators {
            traffic_intensity: self.traffic_intensity(),
            utilization: metrics.utilization,
            effective_arrival_rate: self.input.arrival_rate(),
            wait_probability: Some(mmc_wait_probability(
                self.traffic_intensity(),
                self.input.servers,
            )),
            blocking_probability: None,
            abandon_probability: None,
            expected_queue_length: metrics.expected_queue_length,
            expected_system_length: metrics.expected_system_length,
            expected_wait: metrics.expected_wait,
            expected_sojourn: metrics.expected_sojourn,
        })
    }

    /// The approximation yields means only.
    fn service_level(&self, _t: f64) -> ErlangResult<Option<f64>> {
        self.indicators().map(|_| None)
    }
}
