//! # erlangc
//!
//! Closed-form queueing formulas for staffing and capacity planning.
//!
//! - Erlang C: M/M/c with unlimited waiting room
//! - Erlang B: M/M/c/c loss system
//! - Extended Erlang C: M/M/c/K+M with finite capacity and abandonment
//! - Allen–Cunneen: GI/G/c approximation with batch arrivals and service
//!
//! Two layers sit on top of each other. [`formulas`] holds the raw
//! functions, which return `0.0` for systems without a steady state.
//! [`models`] wraps them in typed values with an explicit [`Stability`]
//! flag and checked methods. [`config`], [`report`] and [`cli`] add YAML
//! scenarios, serializable reports and the `erlangc` binary.
//!
//! ## Example
//!
//! ```rust
//! use erlangc::prelude::*;
//!
//! // 8 calls per minute, 1-minute calls, 10 agents
//! let model = ErlangCModel::new(8.0, 1.0, 10);
//! let indicators = model.indicators().unwrap();
//!
//! assert!((indicators.wait_probability.unwrap() - 0.409_18).abs() < 1e-5);
//! assert!((model.wait_cdf(0.5) - 0.849_47).abs() < 1e-5);
//! ```
//!
//! [`Stability`]: models::Stability

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops,  // Sums are written as in the textbook formulas
    clippy::imprecise_flops,
    clippy::many_single_char_names,
    clippy::float_cmp,         // Exact 0.0 sentinels are compared on purpose
    clippy::missing_const_for_fn,
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod formulas;
pub mod laws;
pub mod models;
pub mod report;
pub mod special;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{ModelSpec, ScenarioConfig, ScenarioConfigBuilder};
    pub use crate::error::{ErlangError, ErlangResult};
    pub use crate::formulas::*;
    pub use crate::models::{
        AllenCunneenModel, Capacity, ErlangBModel, ErlangCModel, ExtendedModel,
        PerformanceIndicators, QueueModel, Stability,
    };
    pub use crate::report::{FiniteGuard, Report};
    pub use crate::special::{LowerIncompleteGamma, NumericGamma};
}

/// Re-export for public API
pub use error::{ErlangError, ErlangResult};
