//! Closed-form queueing formulas.
//!
//! Plain functions of `f64` rates and `u32` counts, evaluated directly
//! from their defining sums. Nothing here allocates state between calls and
//! nothing returns an error: the Erlang C family signals an unstable system
//! with the value `0.0`. The checked layer lives in [`crate::models`].
//!
//! | Family | System | Module |
//! |--------|--------|--------|
//! | Primitive | `xⁿ/n!` | [`primitive`] |
//! | M/M/c states | M/M/c | [`mmc`] |
//! | Erlang C | M/M/c | [`erlang_c`] |
//! | Erlang B | M/M/c/c | [`erlang_b`] |
//! | Extended Erlang C | M/M/c/K+M | [`extended`] |
//! | Allen–Cunneen | GI/G/c with batches | [`allen_cunneen`] |

pub mod allen_cunneen;
pub mod erlang_b;
pub mod erlang_c;
pub mod extended;
pub mod mmc;
pub mod primitive;

pub use allen_cunneen::{allen_cunneen, AllenCunneenInput, AllenCunneenMetrics};
pub use erlang_b::erlang_b_blocking_probability;
pub use erlang_c::{
    erlang_c_expected_queue_length, erlang_c_expected_sojourn, erlang_c_expected_system_length,
    erlang_c_expected_wait, erlang_c_wait_cdf,
};
pub use extended::{
    extended_abandon_probability, extended_cn, extended_delay_probability,
    extended_expected_queue_length, extended_expected_sojourn, extended_expected_system_length,
    extended_expected_wait, extended_state_p, extended_truncation_capacity, extended_wait_cdf,
    extended_wait_cdf_with, MAX_TRUNCATED_CAPACITY,
};
pub use mmc::{mmc_state_p, mmc_state_p0, mmc_wait_probability};
pub use primitive::{power_over_factorial, scaled_power_over_factorials};
