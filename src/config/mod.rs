//! Scenario files: YAML schema and validation.
//!
//! A scenario names one queueing model with its parameters, the waiting-time
//! thresholds to report service levels for, and the tolerance for the
//! Little's-law consistency check. Loading goes through three gates:
//! - serde parsing with unknown fields rejected
//! - field constraints via `validator`
//! - semantic validation of relations between fields
//!
//! ```yaml
//! scenario:
//!   name: support desk
//! model:
//!   type: extended
//!   arrival_rate: 8.0
//!   service_rate: 1.0
//!   abandonment_rate: 0.5
//!   servers: 10
//!   capacity: 30
//! service_level:
//!   thresholds: [0.25, 0.5]
//!   target: 0.8
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use validator::{Validate, ValidationErrors};

use crate::error::{ErlangError, ErlangResult};
use crate::formulas::AllenCunneenInput;
use crate::models::{
    AllenCunneenModel, Capacity, ErlangBModel, ErlangCModel, ExtendedModel, QueueModel,
};

/// Top-level scenario description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Descriptive metadata.
    #[validate(nested)]
    #[serde(default)]
    pub scenario: ScenarioMeta,

    /// The model to evaluate.
    pub model: ModelSpec,

    /// Service-level thresholds.
    #[validate(nested)]
    #[serde(default)]
    pub service_level: ServiceLevelConfig,

    /// Consistency checks applied to the results.
    #[validate(nested)]
    #[serde(default)]
    pub checks: CheckConfig,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

impl ScenarioConfig {
    /// Load a scenario from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> ErlangResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading scenario");
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a scenario from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> ErlangResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> ErlangResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Create a builder for programmatic construction.
    #[must_use]
    pub fn builder() -> ScenarioConfigBuilder {
        ScenarioConfigBuilder::default()
    }

    /// Run field and semantic validation.
    ///
    /// # Errors
    ///
    /// Returns the first failing constraint.
    pub fn check(&self) -> ErlangResult<()> {
        self.validate()?;
        self.model.validate()?;
        self.validate_semantic()
    }

    /// Validate relations between fields beyond the schema.
    fn validate_semantic(&self) -> ErlangResult<()> {
        self.model.validate_semantic()?;

        for &t in &self.service_level.thresholds {
            if !t.is_finite() || t < 0.0 {
                return Err(ErlangError::config(format!(
                    "service-level threshold must be finite and non-negative, got {t}"
                )));
            }
        }

        if let Some(target) = self.service_level.target {
            if !(0.0..=1.0).contains(&target) {
                return Err(ErlangError::config(format!(
                    "service-level target must lie in [0, 1], got {target}"
                )));
            }
        }

        Ok(())
    }

    /// Build the typed model this scenario describes.
    #[must_use]
    pub fn to_model(&self) -> Box<dyn QueueModel + Send + Sync> {
        self.model.to_model()
    }
}

/// Scenario metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ScenarioMeta {
    /// Scenario name.
    #[serde(default)]
    pub name: String,

    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

/// Model selection, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ModelSpec {
    /// M/M/c with unlimited waiting room.
    ErlangC(ErlangCSpec),
    /// M/M/c/c loss system.
    ErlangB(ErlangBSpec),
    /// M/M/c/K+M with abandonment.
    Extended(ExtendedSpec),
    /// GI/G/c Allen–Cunneen approximation.
    AllenCunneen(AllenCunneenSpec),
}

impl Validate for ModelSpec {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            Self::ErlangC(spec) => spec.validate(),
            Self::ErlangB(spec) => spec.validate(),
            Self::Extended(spec) => spec.validate(),
            Self::AllenCunneen(spec) => spec.validate(),
        }
    }
}

impl ModelSpec {
    /// Tag used in scenario files.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::ErlangC(_) => "erlang-c",
            Self::ErlangB(_) => "erlang-b",
            Self::Extended(_) => "extended",
            Self::AllenCunneen(_) => "allen-cunneen",
        }
    }

    /// Build the typed model.
    #[must_use]
    pub fn to_model(&self) -> Box<dyn QueueModel + Send + Sync> {
        match *self {
            Self::ErlangC(s) => {
                Box::new(ErlangCModel::new(s.arrival_rate, s.service_rate, s.servers))
            }
            Self::ErlangB(s) => {
                Box::new(ErlangBModel::new(s.arrival_rate, s.service_rate, s.servers))
            }
            Self::Extended(s) => Box::new(ExtendedModel::new(
                s.arrival_rate,
                s.service_rate,
                s.abandonment_rate,
                s.servers,
                Capacity::from(s.capacity),
            )
            .with_forwarding(s.forwarding_probability)),
            Self::AllenCunneen(s) => Box::new(AllenCunneenModel::new(s.into())),
        }
    }

    fn validate_semantic(&self) -> ErlangResult<()> {
        match self {
            Self::ErlangC(s) => {
                require_positive("arrival_rate", s.arrival_rate)?;
                require_positive("service_rate", s.service_rate)
            }
            Self::ErlangB(s) => {
                require_positive("arrival_rate", s.arrival_rate)?;
                require_positive("service_rate", s.service_rate)
            }
            Self::Extended(s) => {
                require_positive("arrival_rate", s.arrival_rate)?;
                require_positive("service_rate", s.service_rate)?;
                require_non_negative("abandonment_rate", s.abandonment_rate)?;
                if !(0.0..=1.0).contains(&s.forwarding_probability) {
                    return Err(ErlangError::config(format!(
                        "forwarding_probability must lie in [0, 1], got {}",
                        s.forwarding_probability
                    )));
                }
                match s.capacity {
                    Some(k) if k < s.servers => Err(ErlangError::config(format!(
                        "capacity ({k}) must be at least the number of servers ({})",
                        s.servers
                    ))),
                    _ => Ok(()),
                }
            }
            Self::AllenCunneen(s) => {
                require_positive("arrival_rate", s.arrival_rate)?;
                require_positive("mean_service_time", s.mean_service_time)?;
                require_non_negative("cv_interarrival", s.cv_interarrival)?;
                require_non_negative("cv_service", s.cv_service)
            }
        }
    }
}

fn require_positive(field: &str, value: f64) -> ErlangResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ErlangError::config(format!(
            "{field} must be positive and finite, got {value}"
        )))
    }
}

fn require_non_negative(field: &str, value: f64) -> ErlangResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ErlangError::config(format!(
            "{field} must be non-negative and finite, got {value}"
        )))
    }
}

/// Parameters of an M/M/c scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ErlangCSpec {
    /// Arrival rate `λ`.
    pub arrival_rate: f64,
    /// Service rate per server `μ`.
    pub service_rate: f64,
    /// Number of servers.
    #[validate(range(min = 1))]
    pub servers: u32,
}

/// Parameters of an M/M/c/c scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ErlangBSpec {
    /// Arrival rate `λ`; equals the offered load when `service_rate` is 1.
    pub arrival_rate: f64,
    /// Service rate per server `μ`.
    #[serde(default = "default_rate")]
    pub service_rate: f64,
    /// Number of servers.
    #[validate(range(min = 1))]
    pub servers: u32,
}

/// Parameters of an M/M/c/K+M scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ExtendedSpec {
    /// Arrival rate `λ`.
    pub arrival_rate: f64,
    /// Service rate per server `μ`.
    pub service_rate: f64,
    /// Abandonment rate per waiting customer `ν`.
    #[serde(default)]
    pub abandonment_rate: f64,
    /// Number of servers.
    #[validate(range(min = 1))]
    pub servers: u32,
    /// System capacity `K`; omitted means unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    /// Probability that a served customer re-enters the queue.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default)]
    pub forwarding_probability: f64,
}

/// Parameters of an Allen–Cunneen scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AllenCunneenSpec {
    /// Arrival rate of batches.
    pub arrival_rate: f64,
    /// Customers per arriving batch.
    #[validate(range(min = 1))]
    #[serde(default = "default_batch_size")]
    pub arrival_batch_size: u32,
    /// Mean service time of one service batch.
    pub mean_service_time: f64,
    /// Customers served together.
    #[validate(range(min = 1))]
    #[serde(default = "default_batch_size")]
    pub service_batch_size: u32,
    /// Number of servers.
    #[validate(range(min = 1))]
    pub servers: u32,
    /// Coefficient of variation of batch inter-arrival times.
    #[serde(default = "default_cv")]
    pub cv_interarrival: f64,
    /// Coefficient of variation of service times.
    #[serde(default = "default_cv")]
    pub cv_service: f64,
}

impl From<AllenCunneenSpec> for AllenCunneenInput {
    fn from(spec: AllenCunneenSpec) -> Self {
        Self {
            batch_arrival_rate: spec.arrival_rate,
            arrival_batch_size: spec.arrival_batch_size,
            mean_service_time: spec.mean_service_time,
            service_batch_size: spec.service_batch_size,
            servers: spec.servers,
            cv_interarrival: spec.cv_interarrival,
            cv_service: spec.cv_service,
        }
    }
}

impl From<AllenCunneenInput> for AllenCunneenSpec {
    fn from(input: AllenCunneenInput) -> Self {
        Self {
            arrival_rate: input.batch_arrival_rate,
            arrival_batch_size: input.arrival_batch_size,
            mean_service_time: input.mean_service_time,
            service_batch_size: input.service_batch_size,
            servers: input.servers,
            cv_interarrival: input.cv_interarrival,
            cv_service: input.cv_service,
        }
    }
}

const fn default_rate() -> f64 {
    1.0
}

const fn default_batch_size() -> u32 {
    1
}

const fn default_cv() -> f64 {
    1.0
}

/// Waiting-time thresholds to evaluate `P(W ≤ t)` at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ServiceLevelConfig {
    /// Thresholds `t`, in the time unit of the rates.
    #[validate(length(max = 256))]
    #[serde(default)]
    pub thresholds: Vec<f64>,

    /// Required fraction of customers served within each threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
}

/// Consistency checks on computed indicators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CheckConfig {
    /// Relative tolerance for `L = λW`.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_littles_law_tolerance")]
    pub littles_law_tolerance: f64,
}

const fn default_littles_law_tolerance() -> f64 {
    1e-9
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            littles_law_tolerance: default_littles_law_tolerance(),
        }
    }
}

/// Scenario builder for programmatic construction.
#[derive(Debug, Default)]
pub struct ScenarioConfigBuilder {
    name: Option<String>,
    model: Option<ModelSpec>,
    thresholds: Vec<f64>,
    target: Option<f64>,
    tolerance: Option<f64>,
    forwarding: Option<f64>,
}

impl ScenarioConfigBuilder {
    /// Set the scenario name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Use an M/M/c model.
    #[must_use]
    pub fn erlang_c(mut self, arrival_rate: f64, service_rate: f64, servers: u32) -> Self {
        self.model = Some(ModelSpec::ErlangC(ErlangCSpec {
            arrival_rate,
            service_rate,
            servers,
        }));
        self
    }

    /// Use an M/M/c/c model.
    #[must_use]
    pub fn erlang_b(mut self, arrival_rate: f64, service_rate: f64, servers: u32) -> Self {
        self.model = Some(ModelSpec::ErlangB(ErlangBSpec {
            arrival_rate,
            service_rate,
            servers,
        }));
        self
    }

    /// Use an M/M/c/K+M model; `capacity: None` means unlimited.
    #[must_use]
    pub fn extended(
        mut self,
        arrival_rate: f64,
        service_rate: f64,
        abandonment_rate: f64,
        servers: u32,
        capacity: Option<u32>,
    ) -> Self {
        self.model = Some(ModelSpec::Extended(ExtendedSpec {
            arrival_rate,
            service_rate,
            abandonment_rate,
            servers,
            capacity,
            forwarding_probability: 0.0,
        }));
        self
    }

    /// Forward served customers back into the queue; extended models only.
    #[must_use]
    pub const fn forwarding_probability(mut self, probability: f64) -> Self {
        self.forwarding = Some(probability);
        self
    }

    /// Use the Allen–Cunneen approximation.
    #[must_use]
    pub fn allen_cunneen(mut self, input: AllenCunneenInput) -> Self {
        self.model = Some(ModelSpec::AllenCunneen(input.into()));
        self
    }

    /// Add a service-level threshold.
    #[must_use]
    pub fn threshold(mut self, t: f64) -> Self {
        self.thresholds.push(t);
        self
    }

    /// Set the service-level target.
    #[must_use]
    pub const fn target(mut self, target: f64) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the Little's-law tolerance.
    #[must_use]
    pub const fn littles_law_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Build and validate the scenario.
    ///
    /// # Errors
    ///
    /// Returns error if no model was chosen or validation fails.
    pub fn build(self) -> ErlangResult<ScenarioConfig> {
        let mut model = self
            .model
            .ok_or_else(|| ErlangError::config("scenario needs a model"))?;

        if let Some(probability) = self.forwarding {
            match &mut model {
                ModelSpec::Extended(spec) => spec.forwarding_probability = probability,
                other => {
                    return Err(ErlangError::config(format!(
                        "forwarding applies to extended models, not {}",
                        other.type_name()
                    )))
                }
            }
        }

        let config = ScenarioConfig {
            schema_version: default_schema_version(),
            scenario: ScenarioMeta {
                name: self.name.unwrap_or_default(),
                description: String::new(),
            },
            model,
            service_level: ServiceLevelConfig {
                thresholds: self.thresholds,
                target: self.target,
            },
            checks: CheckConfig {
                littles_law_tolerance: self
                    .tolerance
                    .unwrap_or_else(default_littles_law_tolerance),
            },
        };

        config.check()?;
        Ok(config)
    }
}
