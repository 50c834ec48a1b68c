//! Evaluation reports.
//!
//! A [`Report`] is the full result of evaluating one scenario: the checked
//! indicators, one service level per configured threshold, and the outcome
//! of the Little's-law consistency check. Every number passes through
//! [`FiniteGuard`] before it is reported.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ScenarioConfig;
use crate::error::{ErlangError, ErlangResult};
use crate::models::{PerformanceIndicators, QueueModel, Stability};

/// Rejects NaN and infinite results.
///
/// Overflow in `xⁿ/n!` or a degenerate normaliser can leak non-finite
/// values out of the formula layer; the guard stops them at the boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct FiniteGuard;

impl FiniteGuard {
    /// Check a single named value.
    ///
    /// # Errors
    ///
    /// [`ErlangError::NonFiniteValue`] naming `location`.
    pub fn check_value(self, location: &str, value: f64) -> ErlangResult<()> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(ErlangError::NonFiniteValue {
                location: location.to_string(),
            })
        }
    }

    /// Check every field of an indicator bundle.
    ///
    /// # Errors
    ///
    /// [`ErlangError::NonFiniteValue`] naming the first offending field.
    pub fn check_indicators(self, indicators: &PerformanceIndicators) -> ErlangResult<()> {
        indicators
            .named_values()
            .into_iter()
            .try_for_each(|(name, value)| self.check_value(name, value))
    }
}

/// `P(W ≤ t)` at one threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServiceLevel {
    /// Waiting-time threshold `t`.
    pub threshold: f64,
    /// Fraction of customers served within `t`; absent when the model has
    /// no waiting-time distribution.
    pub probability: Option<f64>,
    /// Whether `probability` reaches the configured target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meets_target: Option<bool>,
}

/// Outcome of the Little's-law check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyCheck {
    /// Relative tolerance used.
    pub tolerance: f64,
    /// True if both `E[N_Q] = λE[W]` and `E[N] = λE[V]` held.
    pub consistent: bool,
    /// Description of the violation, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violation: Option<String>,
}

/// Evaluation settings independent of the model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportOptions {
    /// Scenario name.
    pub name: String,
    /// Service-level thresholds.
    pub thresholds: Vec<f64>,
    /// Service-level target.
    pub target: Option<f64>,
    /// Little's-law tolerance.
    pub littles_law_tolerance: f64,
}

impl From<&ScenarioConfig> for ReportOptions {
    fn from(config: &ScenarioConfig) -> Self {
        Self {
            name: config.scenario.name.clone(),
            thresholds: config.service_level.thresholds.clone(),
            target: config.service_level.target,
            littles_law_tolerance: config.checks.littles_law_tolerance,
        }
    }
}

/// Result of evaluating one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Scenario name.
    pub name: String,
    /// Queueing system, e.g. `"M/M/c"`.
    pub system: String,
    /// Number of servers.
    pub servers: u32,
    /// Always [`Stability::Stable`]: unstable scenarios are errors.
    pub stability: Stability,
    /// Steady-state indicators.
    pub indicators: PerformanceIndicators,
    /// One entry per configured threshold.
    pub service_levels: Vec<ServiceLevel>,
    /// Little's-law consistency.
    pub littles_law: ConsistencyCheck,
}

impl Report {
    /// Evaluate a validated scenario.
    ///
    /// # Errors
    ///
    /// - [`ErlangError::Unstable`] if the model has no steady state
    /// - [`ErlangError::NonFiniteValue`] if any result is NaN or infinite
    pub fn from_scenario(config: &ScenarioConfig) -> ErlangResult<Self> {
        debug!(
            name = %config.scenario.name,
            model = config.model.type_name(),
            "evaluating scenario"
        );
        let model = config.to_model();
        Self::from_model(model.as_ref(), &ReportOptions::from(config))
    }

    /// Evaluate any model.
    ///
    /// # Errors
    ///
    /// Same as [`Report::from_scenario`].
    pub fn from_model<M>(model: &M, options: &ReportOptions) -> ErlangResult<Self>
    where
        M: QueueModel + ?Sized,
    {
        let guard = FiniteGuard;
        let indicators = model.indicators()?;
        guard.check_indicators(&indicators)?;

        let service_levels = options
            .thresholds
            .iter()
            .map(|&threshold| -> ErlangResult<ServiceLevel> {
                let probability = model.service_level(threshold)?;
                if let Some(p) = probability {
                    guard.check_value("service_level", p)?;
                }
                Ok(ServiceLevel {
                    threshold,
                    probability,
                    meets_target: options
                        .target
                        .zip(probability)
                        .map(|(target, p)| p >= target),
                })
            })
            .collect::<ErlangResult<Vec<_>>>()?;

        let tolerance = options.littles_law_tolerance;
        let violation = indicators
            .check_littles_law(indicators.effective_arrival_rate, tolerance)
            .err();
        if let Some(message) = &violation {
            warn!(%message, "indicators violate Little's law");
        }

        Ok(Self {
            name: options.name.clone(),
            system: model.kind().to_string(),
            servers: model.servers(),
            stability: model.stability(),
            indicators,
            service_levels,
            littles_law: ConsistencyCheck {
                tolerance,
                consistent: violation.is_none(),
                violation,
            },
        })
    }

    /// True when every threshold with a distribution meets the target.
    ///
    /// Vacuously true without a target.
    #[must_use]
    pub fn meets_targets(&self) -> bool {
        self.service_levels
            .iter()
            .all(|level| level.meets_target.unwrap_or(true))
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_json(&self) -> ErlangResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> ErlangResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
