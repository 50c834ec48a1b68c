//! Allen–Cunneen approximation for GI/G/c queues with batch arrivals and
//! batch service.
//!
//! # Governing Equation
//!
//! ```text
//! λ      = batch arrival rate · b_I
//! CV_I²  = b_I · CV_IB² + b_I − 1
//! ρ      = λ · E[S] / (b · c)
//! P_C    = Erlang C wait probability with offered load c·ρ
//! E[N_Q] = ρ/(1−ρ) · P_C · (CV_I² + b · CV_S²)/2 + (b − 1)/2
//! E[N]   = E[N_Q] + b·c·ρ
//! E[W]   = E[N_Q] / λ
//! E[V]   = E[W] + E[S]
//! ```
//!
//! With exponential inter-arrival and service times (`CV = 1`) and no
//! batching this reduces exactly to the Erlang C metrics.
//!
//! # Unstable systems
//!
//! For `ρ ≥ 1` every metric returns the same `0.0` sentinel as
//! [`super::erlang_c`].

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::mmc::mmc_wait_probability;

/// Inputs of the Allen–Cunneen approximation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllenCunneenInput {
    /// Arrival rate of batches (batches per time unit).
    pub batch_arrival_rate: f64,
    /// Customers per arriving batch `b_I`.
    pub arrival_batch_size: u32,
    /// Mean service time `E[S]` of one service batch.
    pub mean_service_time: f64,
    /// Customers served together `b`.
    pub service_batch_size: u32,
    /// Number of servers `c`.
    pub servers: u32,
    /// Coefficient of variation of batch inter-arrival times `CV_IB`.
    pub cv_interarrival: f64,
    /// Coefficient of variation of service times `CV_S`.
    pub cv_service: f64,
}

impl AllenCunneenInput {
    /// M/M/c equivalent: single arrivals and services, exponential times.
    #[must_use]
    pub const fn markovian(arrival_rate: f64, mean_service_time: f64, servers: u32) -> Self {
        Self {
            batch_arrival_rate: arrival_rate,
            arrival_batch_size: 1,
            mean_service_time,
            service_batch_size: 1,
            servers,
            cv_interarrival: 1.0,
            cv_service: 1.0,
        }
    }

    /// Customer arrival rate `λ = rate · b_I`.
    #[must_use]
    pub fn arrival_rate(&self) -> f64 {
        self.batch_arrival_rate * f64::from(self.arrival_batch_size)
    }

    /// Server utilization `ρ = λ·E[S]/(b·c)`.
    #[must_use]
    pub fn utilization(&self) -> f64 {
        self.arrival_rate() * self.mean_service_time
            / (f64::from(self.service_batch_size) * f64::from(self.servers))
    }

    /// Squared coefficient of variation of individual inter-arrival times.
    #[must_use]
    pub fn individual_arrival_scv(&self) -> f64 {
        let b_i = f64::from(self.arrival_batch_size);
        b_i * self.cv_interarrival * self.cv_interarrival + b_i - 1.0
    }
}

/// Approximated performance indicators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllenCunneenMetrics {
    /// Utilization `ρ`.
    pub utilization: f64,
    /// Expected number waiting `E[N_Q]`.
    pub expected_queue_length: f64,
    /// Expected number in system `E[N]`.
    pub expected_system_length: f64,
    /// Expected number in service `E[B] = b·c·ρ`.
    pub expected_in_service: f64,
    /// Expected waiting time `E[W]`.
    pub expected_wait: f64,
    /// Expected time in system `E[V]`.
    pub expected_sojourn: f64,
}

impl AllenCunneenMetrics {
    const UNDEFINED: Self = Self {
        utilization: 0.0,
        expected_queue_length: 0.0,
        expected_system_length: 0.0,
        expected_in_service: 0.0,
        expected_wait: 0.0,
        expected_sojourn: 0.0,
    };
}

/// Evaluate the Allen–Cunneen approximation.
///
/// Returns all-zero metrics (including `utilization`) when `ρ ≥ 1`.
#[must_use]
pub fn allen_cunneen(input: &AllenCunneenInput) -> AllenCunneenMetrics {
    let rho = input.utilization();
    if rho >= 1.0 {
        trace!(rho, servers = input.servers, "unstable Allen-Cunneen parameters");
        return AllenCunneenMetrics::UNDEFINED;
    }

    let c = f64::from(input.servers);
    let b = f64::from(input.service_batch_size);
    let lambda = input.arrival_rate();

    let p_c = mmc_wait_probability(c * rho, input.servers);
    let variability = (input.individual_arrival_scv() + b * input.cv_service * input.cv_service) / 2.0;

    let expected_queue_length = rho / (1.0 - rho) * p_c * variability + (b - 1.0) / 2.0;
    let expected_in_service = b * c * rho;
    let expected_wait = expected_queue_length / lambda;

    AllenCunneenMetrics {
        utilization: rho,
        expected_queue_length,
        expected_system_length: expected_queue_length + expected_in_service,
        expected_in_service,
        expected_wait,
        expected_sojourn: expected_wait + input.mean_service_time,
    }
}
