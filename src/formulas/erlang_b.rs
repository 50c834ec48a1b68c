//! Erlang B: blocking probability of the M/M/c/c loss system.

use super::primitive::scaled_power_over_factorials;

/// Blocking probability `B(c, a) = (aᶜ/c!) / Σ_{n=0}^{c} aⁿ/n!`.
///
/// A loss system never diverges, so there is no stability restriction on
/// `a`. The result increases monotonically with `a` for fixed `c`.
///
/// Numerator and sum are taken relative to their largest term, so the
/// result lies in `[0, 1]` for any finite `a` and `c`, including loads far
/// beyond the point where `aᶜ/c!` overflows.
///
/// # Example
///
/// ```rust
/// use erlangc::formulas::erlang_b_blocking_probability;
///
/// assert!((erlang_b_blocking_probability(1.0, 1) - 0.5).abs() < 1e-15);
/// ```
#[must_use]
pub fn erlang_b_blocking_probability(a: f64, c: u32) -> f64 {
    let terms = scaled_power_over_factorials(a, c);
    let partial_sum: f64 = terms.iter().sum();
    terms[c as usize] / partial_sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_server() {
        for &a in &[0.0, 0.1, 1.0, 3.0, 50.0] {
            let expected = a / (1.0 + a);
            assert!((erlang_b_blocking_probability(a, 1) - expected).abs() < 1e-14, "a={a}");
        }
    }

    #[test]
    fn test_reference_values() {
        assert!((erlang_b_blocking_probability(1.0, 1) - 0.5).abs() < f64::EPSILON);
        assert!((erlang_b_blocking_probability(2.0, 3) - 0.210_526_315_789_473_67).abs() < 1e-14);
        assert!((erlang_b_blocking_probability(10.0, 10) - 0.214_582_343_107_347_36).abs() < 1e-13);
    }

    #[test]
    fn test_matches_recursion() {
        // B(0) = 1, B(k) = a·B(k−1) / (k + a·B(k−1))
        let a = 37.5;
        let mut b = 1.0;
        for k in 1..=60u32 {
            b = a * b / (f64::from(k) + a * b);
            let direct = erlang_b_blocking_probability(a, k);
            assert!((direct - b).abs() < 1e-12, "k={k}: {direct} vs {b}");
        }
    }

    #[test]
    fn test_large_trunk_groups() {
        let b = erlang_b_blocking_probability(1_000.0, 1_000);
        assert!((b - 0.024_811_917_646_160_408).abs() < 1e-12, "B={b}");

        let b = erlang_b_blocking_probability(5_000.0, 4_800);
        assert!((b - 0.044_010_382_591_852_4).abs() < 1e-12, "B={b}");
    }

    #[test]
    fn test_recursion_holds_at_scale() {
        let a = 1_000.0;
        let mut b = 1.0;
        for k in 1..=2_000u32 {
            b = a * b / (f64::from(k) + a * b);
            if k % 250 == 0 {
                let direct = erlang_b_blocking_probability(a, k);
                assert!((direct - b).abs() <= 1e-10 * b, "k={k}: {direct} vs {b}");
            }
        }
    }

    #[test]
    fn test_overloaded_system_is_well_defined() {
        let b = erlang_b_blocking_probability(500.0, 5);
        assert!(b > 0.99 && b < 1.0);
    }

    #[test]
    fn test_zero_servers_blocks_everything() {
        assert!((erlang_b_blocking_probability(3.0, 0) - 1.0).abs() < f64::EPSILON);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Blocking increases with offered load.
        #[test]
        fn prop_monotone_in_load(c in 1u32..100, a in 0.01f64..200.0, da in 0.01f64..10.0) {
            let b1 = erlang_b_blocking_probability(a, c);
            let b2 = erlang_b_blocking_probability(a + da, c);
            prop_assert!(b2 >= b1, "B({c}, {a})={b1} > B({c}, {})={b2}", a + da);
        }

        /// Adding a server never increases blocking.
        #[test]
        fn prop_more_servers_less_blocking(c in 1u32..3_000, a in 0.01f64..4_000.0) {
            let b1 = erlang_b_blocking_probability(a, c);
            let b2 = erlang_b_blocking_probability(a, c + 1);
            prop_assert!(b2 <= b1);
            prop_assert!((0.0..=1.0).contains(&b2));
        }
    }
}
