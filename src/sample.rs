//! Sampling an index from a PMF, and the ranking served around it.

use std::cmp::Ordering;

use crate::{ExploreError, Result};

/// Outcome of [`sample_after_normalizing`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampledIndex {
    /// 0-based index into the PMF.
    pub index: usize,
    /// Normalized probability of `index`.
    pub probability: f32,
    /// The cumulative walk never exceeded the draw and the last index was used.
    pub fell_through: bool,
}

/// Sample an index from `pmf` with a uniform `draw` in `[0, 1)`, normalizing in place.
///
/// Negative (and NaN) entries are clamped to zero first. The draw is scaled by the
/// total mass, so inputs that do not sum to exactly 1 still work. The first index whose
/// cumulative mass exceeds the scaled draw wins; if rounding prevents any match the last
/// index is returned.
///
/// Errors with [`ExploreError::InvalidDistribution`] if the total mass is zero (or not
/// finite); an empty `pmf` has zero mass.
///
/// ```rust
/// use mwt_explore::sample_after_normalizing;
///
/// let mut pmf = vec![2.0, 0.0, 6.0];
/// let s = sample_after_normalizing(0.5, &mut pmf).unwrap();
/// assert_eq!(s.index, 2);
/// assert_eq!(s.probability, 0.75);
/// assert_eq!(pmf, vec![0.25, 0.0, 0.75]);
/// ```
pub fn sample_after_normalizing(draw: f32, pmf: &mut [f32]) -> Result<SampledIndex> {
    let mut total = 0.0f32;
    for p in pmf.iter_mut() {
        if !(*p >= 0.0) {
            *p = 0.0;
        }
        total += *p;
    }
    if total.is_infinite() && pmf.iter().all(|p| p.is_finite()) {
        // Finite weights whose sum overflows: rescale by the largest one.
        total = rescale_by_max(pmf);
    }
    if total == 0.0 || !total.is_finite() {
        return Err(ExploreError::InvalidDistribution);
    }

    let scaled = (draw * total).min(total);
    let mut chosen = None;
    let mut cumulative = 0.0f32;
    for (i, &p) in pmf.iter().enumerate() {
        cumulative += p;
        if cumulative > scaled {
            chosen = Some(i);
            break;
        }
    }
    let fell_through = chosen.is_none();
    let index = chosen.unwrap_or(pmf.len() - 1);

    if total != 1.0 {
        for p in pmf.iter_mut() {
            *p /= total;
        }
    }

    Ok(SampledIndex {
        index,
        probability: pmf[index],
        fell_through,
    })
}

fn rescale_by_max(pmf: &mut [f32]) -> f32 {
    let max = pmf.iter().copied().fold(0.0f32, f32::max);
    let mut total = 0.0f32;
    for p in pmf.iter_mut() {
        *p /= max;
        total += *p;
    }
    total
}

/// Full ranking of indices by descending score, with `chosen` moved to the front.
///
/// Ties break by ascending index. The remaining indices keep their score order.
/// NaN scores sort last.
///
/// ```rust
/// use mwt_explore::swap_top_slot;
///
/// assert_eq!(swap_top_slot(&[0.1, 0.7, 0.2], 0).unwrap(), vec![0, 1, 2]);
/// assert_eq!(swap_top_slot(&[0.1, 0.7, 0.2], 1).unwrap(), vec![1, 2, 0]);
/// ```
pub fn swap_top_slot(scores: &[f32], chosen: usize) -> Result<Vec<usize>> {
    if chosen >= scores.len() {
        return Err(ExploreError::out_of_range(chosen, scores.len()));
    }
    let mut ranking = descending_order(scores);
    if let Some(pos) = ranking.iter().position(|&i| i == chosen) {
        ranking[..=pos].rotate_right(1);
    }
    Ok(ranking)
}

/// Index of the highest score, lowest index on ties. `None` for an empty slice.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    descending_order(scores).first().copied()
}

fn descending_order(scores: &[f32]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    // sort_by is stable, so equal scores keep ascending index order.
    order.sort_by(|&a, &b| cmp_desc(scores[a], scores[b]));
    order
}

fn cmp_desc(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
