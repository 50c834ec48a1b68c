//! Typed queueing models.
//!
//! Each model is a small `Copy` value holding its parameters. Besides
//! delegating to the raw functions in [`crate::formulas`], a model knows
//! whether it has a steady state ([`Stability`]) and offers a checked
//! [`QueueModel::indicators`] that turns the formula layer's `0.0` sentinel
//! into [`ErlangError::Unstable`](crate::error::ErlangError::Unstable).
//!
//! ```rust
//! use erlangc::models::{ErlangCModel, QueueModel, Stability};
//!
//! let model = ErlangCModel::new(8.0, 1.0, 10);
//! assert_eq!(model.stability(), Stability::Stable);
//!
//! let indicators = model.indicators().unwrap();
//! assert!(indicators.expected_wait > 0.0);
//!
//! let overloaded = ErlangCModel::new(20.0, 1.0, 5);
//! assert!(overloaded.indicators().is_err());
//! ```

mod allen_cunneen;
mod erlang_b;
mod erlang_c;
mod extended;

pub use allen_cunneen::AllenCunneenModel;
pub use erlang_b::ErlangBModel;
pub use erlang_c::ErlangCModel;
pub use extended::{Capacity, ExtendedModel};

use serde::{Deserialize, Serialize};

use crate::error::ErlangResult;
use crate::laws::LittlesLaw;

/// Whether a model admits a steady state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stability {
    /// Steady-state metrics exist.
    Stable,
    /// The queue grows without bound.
    Unstable,
}

impl Stability {
    /// Stable iff `traffic < servers`.
    #[must_use]
    pub fn from_load(traffic: f64, servers: u32) -> Self {
        if traffic < f64::from(servers) {
            Self::Stable
        } else {
            Self::Unstable
        }
    }

    /// Returns true for [`Stability::Stable`].
    #[must_use]
    pub const fn is_stable(self) -> bool {
        matches!(self, Self::Stable)
    }
}

/// Steady-state performance indicators of a queueing model.
///
/// Probabilities that a model does not define are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceIndicators {
    /// Offered load `a` in Erlangs.
    pub traffic_intensity: f64,
    /// Offered load per server.
    pub utilization: f64,
    /// Rate at which customers enter the system. Little's law holds for it.
    pub effective_arrival_rate: f64,
    /// Probability that an arriving customer has to wait.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_probability: Option<f64>,
    /// Probability that an arriving customer is rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocking_probability: Option<f64>,
    /// Probability that a customer abandons before service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abandon_probability: Option<f64>,
    /// `E[N_Q]`
    pub expected_queue_length: f64,
    /// `E[N]`
    pub expected_system_length: f64,
    /// `E[W]`
    pub expected_wait: f64,
    /// `E[V]`
    pub expected_sojourn: f64,
}

impl PerformanceIndicators {
    /// Check `E[N_Q] = λ·E[W]` and `E[N] = λ·E[V]`.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated relation.
    pub fn check_littles_law(&self, lambda: f64, tolerance: f64) -> Result<(), String> {
        LittlesLaw
            .validate(self.expected_queue_length, lambda, self.expected_wait, tolerance)
            .map_err(|e| format!("queue: {e}"))?;
        LittlesLaw
            .validate(self.expected_system_length, lambda, self.expected_sojourn, tolerance)
            .map_err(|e| format!("system: {e}"))
    }

    /// Named numeric fields, for uniform post-processing.
    #[must_use]
    pub fn named_values(&self) -> Vec<(&'static str, f64)> {
        let mut values = vec![
            ("traffic_intensity", self.traffic_intensity),
            ("utilization", self.utilization),
            ("effective_arrival_rate", self.effective_arrival_rate),
            ("expected_queue_length", self.expected_queue_length),
            ("expected_system_length", self.expected_system_length),
            ("expected_wait", self.expected_wait),
            ("expected_sojourn", self.expected_sojourn),
        ];
        let optional = [
            ("wait_probability", self.wait_probability),
            ("blocking_probability", self.blocking_probability),
            ("abandon_probability", self.abandon_probability),
        ];
        values.extend(optional.into_iter().filter_map(|(name, v)| v.map(|v| (name, v))));
        values
    }
}

/// Common interface of the typed models.
pub trait QueueModel {
    /// Kendall-style name of the system, e.g. `"M/M/c"`.
    fn kind(&self) -> &'static str;

    /// Number of servers `c`.
    fn servers(&self) -> u32;

    /// Offered load `a` in Erlangs.
    fn traffic_intensity(&self) -> f64;

    /// Offered load per server.
    fn utilization(&self) -> f64 {
        self.traffic_intensity() / f64::from(self.servers())
    }

    /// Whether steady-state metrics exist.
    fn stability(&self) -> Stability;

    /// Checked steady-state indicators.
    ///
    /// # Errors
    ///
    /// Returns [`ErlangError::Unstable`](crate::error::ErlangError::Unstable)
    /// when the model has no steady state.
    fn indicators(&self) -> ErlangResult<PerformanceIndicators>;

    /// Service level `P(W ≤ t)`, or `None` if the model does not provide a
    /// waiting-time distribution.
    ///
    /// # Errors
    ///
    /// Same conditions as [`QueueModel::indicators`].
    fn service_level(&self, t: f64) -> ErlangResult<Option<f64>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PerformanceIndicators {
        PerformanceIndicators {
            traffic_intensity: 8.0,
            utilization: 0.8,
            effective_arrival_rate: 8.0,
            wait_probability: Some(0.4),
            blocking_probability: None,
            abandon_probability: None,
            expected_queue_length: 1.6,
            expected_system_length: 9.6,
            expected_wait: 0.2,
            expected_sojourn: 1.2,
        }
    }

    #[test]
    fn test_stability_from_load() {
        assert_eq!(Stability::from_load(9.99, 10), Stability::Stable);
        assert_eq!(Stability::from_load(10.0, 10), Stability::Unstable);
        assert_eq!(Stability::from_load(0.0, 0), Stability::Unstable);
        assert!(Stability::Stable.is_stable());
        assert!(!Stability::Unstable.is_stable());
    }

    #[test]
    fn test_littles_law_check() {
        let indicators = sample();
        assert!(indicators.check_littles_law(8.0, 1e-12).is_ok());

        let err = indicators.check_littles_law(7.0, 1e-6).unwrap_err();
        assert!(err.starts_with("queue:"));

        let broken = PerformanceIndicators {
            expected_sojourn: 2.0,
            ..indicators
        };
        let err = broken.check_littles_law(8.0, 1e-6).unwrap_err();
        assert!(err.starts_with("system:"));
    }

    #[test]
    fn test_named_values_skip_undefined_probabilities() {
        let names: Vec<_> = sample().named_values().into_iter().map(|(n, _)| n).collect();
        assert!(names.contains(&"wait_probability"));
        assert!(!names.contains(&"blocking_probability"));
        assert_eq!(names.len(), 8);
    }

    #[test]
    fn test_serialization_omits_none() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.contains("\"wait_probability\""));
        assert!(!json.contains("blocking_probability"));
    }

    #[test]
    fn test_stability_serialization() {
        assert_eq!(serde_json::to_string(&Stability::Unstable).unwrap(), "\"unstable\"");
    }
}
