//! Probability mass function (PMF) construction per exploration strategy.
//!
//! These are pure, stateless helpers. Indices here are **0-based** positions in the
//! action slice; explorers translate from and to 1-based actions.
//!
//! Arithmetic is single precision throughout: implementations of the scheme must agree
//! on which action a draw lands on.

use crate::{ExploreError, Result};

/// Epsilon-greedy PMF: `epsilon / n` everywhere, plus `1 - epsilon` on `top_index`.
///
/// - `num_actions == 0` returns an empty distribution.
/// - `top_index >= num_actions` is [`ExploreError::ActionOutOfRange`].
/// - `epsilon` must be finite and in `[0, 1]`.
///
/// ```rust
/// use mwt_explore::epsilon_greedy;
///
/// let p = epsilon_greedy(0.2, 1, 4).unwrap();
/// assert_eq!(p, vec![0.05, 0.85, 0.05, 0.05]);
/// ```
pub fn epsilon_greedy(epsilon: f32, top_index: usize, num_actions: usize) -> Result<Vec<f32>> {
    if num_actions == 0 {
        return Ok(Vec::new());
    }
    if top_index >= num_actions {
        return Err(ExploreError::out_of_range(top_index, num_actions));
    }
    check_unit_interval("epsilon", epsilon)?;

    let base = epsilon / num_actions as f32;
    let mut pmf = vec![base; num_actions];
    pmf[top_index] += 1.0 - epsilon;
    Ok(pmf)
}

/// Softmax PMF over `scores`: `exp(lambda * (s_i - pivot))`, normalized.
///
/// The pivot is the max score for `lambda >= 0` and the min score for `lambda < 0`,
/// so the exponent is never positive. If the normalizer is zero the unnormalized
/// weights are returned as-is; sampling such a PMF fails with
/// [`ExploreError::InvalidDistribution`].
pub fn softmax(lambda: f32, scores: &[f32]) -> Vec<f32> {
    if scores.is_empty() {
        return Vec::new();
    }
    let pivot = if lambda >= 0.0 {
        scores.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    } else {
        scores.iter().copied().fold(f32::INFINITY, f32::min)
    };

    let mut norm = 0.0f32;
    let mut pmf: Vec<f32> = scores
        .iter()
        .map(|&s| {
            let w = (lambda * (s - pivot)).exp();
            norm += w;
            w
        })
        .collect();

    if norm != 0.0 {
        for p in &mut pmf {
            *p /= norm;
        }
    }
    pmf
}

/// Bagging (vote) PMF: each of the `votes.len()` bags puts `1 / votes.len()` on the
/// index it voted for.
///
/// Errors: empty `votes`, or any vote `>= num_actions`.
///
/// ```rust
/// use mwt_explore::bagging;
///
/// let p = bagging(&[0, 2, 2, 2], 3).unwrap();
/// assert_eq!(p, vec![0.25, 0.0, 0.75]);
/// ```
pub fn bagging(votes: &[usize], num_actions: usize) -> Result<Vec<f32>> {
    if votes.is_empty() {
        return Err(ExploreError::invalid("bagging needs at least one vote"));
    }
    let weight = 1.0 / votes.len() as f32;
    let mut pmf = vec![0.0f32; num_actions];
    for &v in votes {
        let slot = pmf
            .get_mut(v)
            .ok_or_else(|| ExploreError::out_of_range(v, num_actions))?;
        *slot += weight;
    }
    Ok(pmf)
}

/// Raise probabilities to a floor of `minimum_uniform / n` and rescale the rest so the
/// PMF still sums to 1.
///
/// - `minimum_uniform > 0.999` is treated as exact uniform exploration over the active
///   support (every entry when `update_zero_elements`, else the non-zero entries).
/// - Otherwise entries at or below the floor are *touched* (set to the floor); the
///   untouched mass is scaled down by `(1 - touched) / untouched`. Entries that the
///   scaling would push to or below the floor are touched too, so the floor holds for
///   every active entry afterwards.
/// - If the touched mass exceeds `0.999` the floor is infeasible and touched entries
///   share `1 - untouched` equally instead. With `minimum_uniform <= 0.999` this only
///   happens through rounding when every entry is touched (e.g. `0.999` over 7 entries),
///   and then matches the case below.
/// - If nothing is left untouched, touched entries share the whole mass equally.
///
/// Zero entries take part only when `update_zero_elements` is set. Negative (or NaN)
/// entries are treated as zero.
pub fn enforce_minimum_probability(
    minimum_uniform: f32,
    update_zero_elements: bool,
    pmf: &mut [f32],
) -> Result<()> {
    check_unit_interval("minimum_uniform", minimum_uniform)?;
    if pmf.is_empty() {
        return Ok(());
    }
    for p in pmf.iter_mut() {
        if !(*p >= 0.0) {
            *p = 0.0;
        }
    }
    let active = |p: f32| p > 0.0 || update_zero_elements;

    if minimum_uniform > 0.999 {
        let support = pmf.iter().filter(|&&p| active(p)).count();
        if support == 0 {
            return Ok(());
        }
        let u = 1.0 / support as f32;
        for p in pmf.iter_mut() {
            *p = if active(*p) { u } else { 0.0 };
        }
        return Ok(());
    }

    let floor = minimum_uniform / pmf.len() as f32;
    let mut touched: Vec<bool> = pmf.iter().map(|&p| active(p) && p <= floor).collect();

    loop {
        let n_touched = touched.iter().filter(|&&t| t).count();
        if n_touched == 0 {
            return Ok(());
        }
        let touched_mass = floor * n_touched as f32;
        let untouched_mass: f32 = pmf
            .iter()
            .zip(&touched)
            .filter(|(_, &t)| !t)
            .map(|(&p, _)| p)
            .sum();

        if touched_mass > 0.999 {
            let share = ((1.0 - untouched_mass) / n_touched as f32).max(0.0);
            fill_touched(pmf, &touched, share);
            return Ok(());
        }
        if untouched_mass <= 0.0 {
            fill_touched(pmf, &touched, 1.0 / n_touched as f32);
            return Ok(());
        }

        let ratio = (1.0 - touched_mass) / untouched_mass;
        let mut grew = false;
        for (i, &p) in pmf.iter().enumerate() {
            if !touched[i] && p > 0.0 && p * ratio <= floor {
                touched[i] = true;
                grew = true;
            }
        }
        if grew {
            continue;
        }

        for (p, &t) in pmf.iter_mut().zip(&touched) {
            if t {
                *p = floor;
            } else {
                *p *= ratio;
            }
        }
        return Ok(());
    }
}

fn fill_touched(pmf: &mut [f32], touched: &[bool], value: f32) {
    for (p, &t) in pmf.iter_mut().zip(touched) {
        if t {
            *p = value;
        }
    }
}

fn check_unit_interval(name: &str, x: f32) -> Result<()> {
    if x.is_finite() && (0.0..=1.0).contains(&x) {
        Ok(())
    } else {
        Err(ExploreError::invalid(format!("{name} must be in [0, 1], got {x}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sum(p: &[f32]) -> f32 {
        p.iter().sum()
    }

    #[test]
    fn epsilon_greedy_edge_cases() {
        assert!(epsilon_greedy(0.1, 0, 0).unwrap().is_empty());
        assert_eq!(
            epsilon_greedy(0.1, 3, 3),
            Err(ExploreError::ActionOutOfRange {
                action: 3,
                num_actions: 3
            })
        );
        assert!(epsilon_greedy(1.5, 0, 3).unwrap_err().is_invalid_argument());
        assert_eq!(epsilon_greedy(0.0, 2, 3).unwrap(), vec![0.0, 0.0, 1.0]);
        assert_eq!(epsilon_greedy(1.0, 0, 4).unwrap(), vec![0.25; 4]);
    }

    #[test]
    fn softmax_prefers_higher_scores() {
        let p = softmax(1.0, &[1.0, 2.0, 3.0]);
        assert!(p[0] < p[1] && p[1] < p[2]);
        assert!((sum(&p) - 1.0).abs() < 1e-6);

        // Negative lambda flips the preference.
        let q = softmax(-1.0, &[1.0, 2.0, 3.0]);
        assert!(q[0] > q[1] && q[1] > q[2]);
        assert!((sum(&q) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn softmax_zero_lambda_is_uniform() {
        assert_eq!(softmax(0.0, &[5.0, -3.0, 100.0, 0.0]), vec![0.25; 4]);
        assert!(softmax(0.5, &[]).is_empty());
    }

    #[test]
    fn bagging_rejects_empty_and_out_of_range() {
        assert!(bagging(&[], 3).unwrap_err().is_invalid_argument());
        assert_eq!(
            bagging(&[0, 5], 3),
            Err(ExploreError::ActionOutOfRange {
                action: 5,
                num_actions: 3
            })
        );
        assert_eq!(bagging(&[1], 2).unwrap(), vec![0.0, 1.0]);
    }

    #[test]
    fn floor_uniform_branch_respects_support() {
        let mut p = vec![0.7, 0.0, 0.3, 0.0];
        enforce_minimum_probability(1.0, false, &mut p).unwrap();
        assert_eq!(p, vec![0.5, 0.0, 0.5, 0.0]);

        let mut p = vec![0.7, 0.0, 0.3, 0.0];
        enforce_minimum_probability(1.0, true, &mut p).unwrap();
        assert_eq!(p, vec![0.25; 4]);
    }

    #[test]
    fn floor_raises_small_entries_and_rescales_the_rest() {
        // floor = 0.4 / 4 = 0.1; touched = 2 * 0.1, ratio = 0.8.
        let mut p = vec![0.5, 0.5, 0.0, 0.0];
        enforce_minimum_probability(0.4, true, &mut p).unwrap();
        let expected = [0.4, 0.4, 0.1, 0.1];
        for (a, b) in p.iter().zip(expected) {
            assert!((a - b).abs() < 1e-6, "{p:?}");
        }

        // Zeros stay zero without update_zero_elements.
        let mut p = vec![0.5, 0.5, 0.0, 0.0];
        enforce_minimum_probability(0.4, false, &mut p).unwrap();
        assert_eq!(p, vec![0.5, 0.5, 0.0, 0.0]);
    }

    #[test]
    fn floor_touches_entries_pushed_below_by_rescaling() {
        // floor = 0.3: one pass would leave 0.31 * 0.7 = 0.217 below the floor.
        let mut p = vec![0.31, 0.69, 0.0];
        enforce_minimum_probability(0.9, true, &mut p).unwrap();
        assert!((sum(&p) - 1.0).abs() < 1e-6);
        for &x in &p {
            assert!(x >= 0.3 - 1e-6, "{p:?}");
        }
    }

    #[test]
    fn floor_with_nothing_untouched_shares_all_mass() {
        let mut p = vec![0.05, 0.05, 0.0, 0.0];
        enforce_minimum_probability(0.5, false, &mut p).unwrap();
        assert_eq!(p, vec![0.5, 0.5, 0.0, 0.0]);
    }

    #[test]
    fn floor_at_the_infeasibility_boundary() {
        // 0.999 / 7 rounds up: the touched mass lands just above 0.999.
        let floor7 = 0.999f32 / 7.0;
        assert!(floor7 * 7.0 > 0.999);
        let mut p = vec![0.1f32; 7];
        enforce_minimum_probability(0.999, false, &mut p).unwrap();
        assert_eq!(p, vec![1.0f32 / 7.0; 7]);
        let mut zeros = vec![0.0f32; 7];
        enforce_minimum_probability(0.999, true, &mut zeros).unwrap();
        assert_eq!(zeros, vec![1.0f32 / 7.0; 7]);

        // 0.999 / 3 is exact enough that the touched mass equals 0.999.
        let floor3 = 0.999f32 / 3.0;
        assert_eq!(floor3 * 3.0, 0.999);
        let mut p = vec![0.3f32, 0.3, 0.3];
        enforce_minimum_probability(0.999, false, &mut p).unwrap();
        assert_eq!(p, vec![1.0f32 / 3.0; 3]);

        // Below the boundary the untouched entry keeps the rest of the mass.
        let mut p = vec![0.0f32, 0.0, 1.0];
        enforce_minimum_probability(0.999, true, &mut p).unwrap();
        assert_eq!(p[0], floor3);
        assert_eq!(p[1], floor3);
        assert!((p[2] - (1.0 - 2.0 * floor3)).abs() < 1e-6);
    }

    #[test]
    fn floor_rejects_out_of_range_minimum() {
        let mut p = vec![1.0];
        assert!(enforce_minimum_probability(-0.1, true, &mut p).is_err());
        assert!(enforce_minimum_probability(f32::NAN, true, &mut p).is_err());
        assert!(enforce_minimum_probability(1.1, true, &mut p).is_err());
        let mut empty: Vec<f32> = Vec::new();
        assert!(enforce_minimum_probability(0.5, true, &mut empty).is_ok());
    }

    fn arb_pmf() -> impl Strategy<Value = Vec<f32>> {
        proptest::collection::vec(0.0f32..1.0, 1..16).prop_filter_map("positive mass", |w| {
            let s: f32 = w.iter().sum();
            (s > 1e-3).then(|| w.iter().map(|x| x / s).collect())
        })
    }

    proptest! {
        #[test]
        fn epsilon_greedy_is_a_distribution(
            epsilon in 0.0f32..=1.0,
            n in 1usize..64,
            top in 0usize..64,
        ) {
            let top = top % n;
            let p = epsilon_greedy(epsilon, top, n).unwrap();
            prop_assert_eq!(p.len(), n);
            prop_assert!((sum(&p) - 1.0).abs() < 1e-4);
            for (i, &x) in p.iter().enumerate() {
                prop_assert!(x >= 0.0);
                if i != top {
                    prop_assert!(x <= p[top]);
                }
            }
        }

        #[test]
        fn softmax_is_a_distribution(
            lambda in -10.0f32..10.0,
            scores in proptest::collection::vec(-100.0f32..100.0, 1..32),
        ) {
            let p = softmax(lambda, &scores);
            prop_assert_eq!(p.len(), scores.len());
            prop_assert!((sum(&p) - 1.0).abs() < 1e-4, "sum={}", sum(&p));
            for &x in &p {
                prop_assert!(x.is_finite() && x >= 0.0 && x <= 1.0);
            }
        }

        #[test]
        fn bagging_is_a_distribution(votes in proptest::collection::vec(0usize..8, 1..40)) {
            let p = bagging(&votes, 8).unwrap();
            prop_assert!((sum(&p) - 1.0).abs() < 1e-4);
        }

        #[test]
        fn floor_holds_and_mass_is_preserved(
            pmf in arb_pmf(),
            minimum_uniform in 0.001f32..=0.999,
        ) {
            let n = pmf.len();
            let mut p = pmf.clone();
            enforce_minimum_probability(minimum_uniform, true, &mut p).unwrap();
            let floor = minimum_uniform / n as f32;
            prop_assert!((sum(&p) - 1.0).abs() < 1e-4, "sum={} {:?}", sum(&p), p);
            for &x in &p {
                prop_assert!(x >= 0.0);
                prop_assert!(x >= floor - 1e-4, "x={} floor={} {:?}", x, floor, p);
            }
        }

        #[test]
        fn floor_without_zero_updates_keeps_zeros(
            pmf in arb_pmf(),
            minimum_uniform in 0.001f32..=1.0,
        ) {
            let mut p = pmf.clone();
            enforce_minimum_probability(minimum_uniform, false, &mut p).unwrap();
            prop_assert!((sum(&p) - 1.0).abs() < 1e-4);
            for (before, after) in pmf.iter().zip(&p) {
                if *before == 0.0 {
                    prop_assert_eq!(*after, 0.0);
                }
                prop_assert!(*after >= 0.0);
            }
        }
    }
}
