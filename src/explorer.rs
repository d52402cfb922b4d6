//! The `Explorer` capability shared by the five strategies, and the helpers they share.
//!
//! Lifecycle: an explorer is created bound to its policy/scorer(s) and a config, then
//! answers any number of independent calls. The only cross-call state is the
//! explore switch (and TauFirst's budget).

use std::sync::atomic::{AtomicBool, Ordering};

use crate::{
    swap_top_slot, ActionCount, Context, Decision, DecisionNote, ExploreError, ExplorerKind,
    Policy, Result, SampledIndex,
};

/// A strategy that turns a seed and a context into a [`Decision`].
///
/// Implemented by [`EpsilonGreedyExplorer`](crate::EpsilonGreedyExplorer),
/// [`TauFirstExplorer`](crate::TauFirstExplorer),
/// [`BootstrapExplorer`](crate::BootstrapExplorer),
/// [`SoftmaxExplorer`](crate::SoftmaxExplorer) and
/// [`GenericExplorer`](crate::GenericExplorer).
///
/// `choose_action` takes `&self`: explorers are safe to share across threads when their
/// policy/scorer is.
pub trait Explorer<C: ?Sized> {
    fn kind(&self) -> ExplorerKind;

    /// Decide for one call. `seed` is normally derived from the unique key by
    /// [`MwtExplorer`](crate::MwtExplorer).
    fn choose_action(&self, seed: u64, context: &C) -> Result<Decision>;

    /// Switch exploration on or off. Off means the top-ranked action is always served
    /// with probability 1.
    fn enable_explore(&self, explore: bool);

    fn explore_enabled(&self) -> bool;
}

/// Runtime explore on/off flag, on by default.
#[derive(Debug)]
pub(crate) struct ExploreSwitch(AtomicBool);

impl Default for ExploreSwitch {
    fn default() -> Self {
        Self(AtomicBool::new(true))
    }
}

impl ExploreSwitch {
    pub(crate) fn set(&self, on: bool) {
        self.0.store(on, Ordering::Relaxed);
    }

    pub(crate) fn get(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

pub(crate) fn validate_action_count(count: ActionCount) -> Result<()> {
    match count {
        ActionCount::Fixed(0) => Err(ExploreError::invalid("num_actions must be at least 1")),
        _ => Ok(()),
    }
}

/// Number of actions for this call, enforcing the fixed/variable contract.
pub(crate) fn resolve_num_actions<C: Context + ?Sized>(
    count: ActionCount,
    context: &C,
) -> Result<u32> {
    match (count, context.number_of_actions()) {
        (ActionCount::Fixed(n), None) => Ok(n),
        (ActionCount::Fixed(_), Some(_)) => Err(ExploreError::MisconfiguredExplorer(
            "explorer has a fixed action count but the context carries its own",
        )),
        (ActionCount::Variable, Some(0)) => {
            Err(ExploreError::invalid("context reports zero actions"))
        }
        (ActionCount::Variable, Some(n)) => Ok(n),
        (ActionCount::Variable, None) => Err(ExploreError::MisconfiguredExplorer(
            "explorer expects a variable action count but the context does not provide one",
        )),
    }
}

pub(crate) fn check_action(action: u32, num_actions: u32) -> Result<()> {
    if action == 0 || action > num_actions {
        return Err(ExploreError::out_of_range(action as usize, num_actions as usize));
    }
    Ok(())
}

/// The policy's ranking, which must be a permutation of `1..=num_actions`.
pub(crate) fn policy_ranking<C: ?Sized, P: Policy<C>>(
    policy: &P,
    context: &C,
    num_actions: u32,
) -> Result<Vec<u32>> {
    let ranking = policy.choose_ranking(context, num_actions);
    let mut seen = vec![false; num_actions as usize];
    for &a in &ranking {
        check_action(a, num_actions)?;
        let slot = &mut seen[(a - 1) as usize];
        if *slot {
            return Err(ExploreError::invalid(format!(
                "policy ranked action {a} more than once"
            )));
        }
        *slot = true;
    }
    if ranking.len() != num_actions as usize {
        return Err(ExploreError::invalid(format!(
            "policy ranked {} of {} actions",
            ranking.len(),
            num_actions
        )));
    }
    Ok(ranking)
}

/// Move `action` to the front of `ranking` (inserting it if absent).
pub(crate) fn lead_with(mut ranking: Vec<u32>, action: u32) -> Vec<u32> {
    match ranking.iter().position(|&a| a == action) {
        Some(pos) => ranking[..=pos].rotate_right(1),
        None => ranking.insert(0, action),
    }
    ranking
}

/// Check a scorer's output length against the action count.
pub(crate) fn check_scores(scores: &[f32], num_actions: u32) -> Result<()> {
    if scores.len() != num_actions as usize {
        return Err(ExploreError::invalid(format!(
            "scorer returned {} scores for {} actions",
            scores.len(),
            num_actions
        )));
    }
    Ok(())
}

pub(crate) fn check_minimum_uniform(m: f32) -> Result<()> {
    if m.is_finite() && (0.0..=1.0).contains(&m) {
        Ok(())
    } else {
        Err(ExploreError::invalid(format!(
            "minimum_uniform must be in [0, 1], got {m}"
        )))
    }
}

/// Exploitation: top action, probability 1, no distribution.
pub(crate) fn exploit(kind: ExplorerKind, ranking: Vec<u32>, note: DecisionNote) -> Decision {
    Decision {
        explorer: kind,
        action: ranking[0],
        ranking,
        probability: 1.0,
        pmf: Vec::new(),
        notes: vec![note],
    }
}

/// Decision for a draw sampled from `pmf`; `ranking` is reordered to lead with it.
pub(crate) fn sampled(
    kind: ExplorerKind,
    pmf: Vec<f32>,
    sample: SampledIndex,
    ranking: Vec<u32>,
    mut notes: Vec<DecisionNote>,
) -> Decision {
    let action = sample.index as u32 + 1;
    notes.push(DecisionNote::SampledFromDistribution);
    if sample.fell_through {
        notes.push(DecisionNote::NumericalFallbackToLastAction);
    }
    Decision {
        explorer: kind,
        action,
        ranking: lead_with(ranking, action),
        probability: sample.probability,
        pmf,
        notes,
    }
}

/// Ranking of 1-based actions by descending `scores`, led by the 0-based `chosen`.
pub(crate) fn score_ranking(scores: &[f32], chosen: usize) -> Result<Vec<u32>> {
    Ok(swap_top_slot(scores, chosen)?
        .into_iter()
        .map(|i| i as u32 + 1)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VariableActionContext;

    #[test]
    fn fixed_and_variable_contracts() {
        assert_eq!(resolve_num_actions(ActionCount::Fixed(4), &()), Ok(4));
        let v = VariableActionContext::new((), 6);
        assert_eq!(resolve_num_actions(ActionCount::Variable, &v), Ok(6));
        assert!(matches!(
            resolve_num_actions(ActionCount::Fixed(4), &v),
            Err(ExploreError::MisconfiguredExplorer(_))
        ));
        assert!(matches!(
            resolve_num_actions(ActionCount::Variable, &()),
            Err(ExploreError::MisconfiguredExplorer(_))
        ));
        let empty = VariableActionContext::new((), 0);
        assert!(resolve_num_actions(ActionCount::Variable, &empty)
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn policy_actions_are_validated() {
        let zero = |_: &()| 0u32;
        assert!(policy_ranking(&zero, &(), 3).is_err());
        let high = |_: &()| 4u32;
        assert!(policy_ranking(&high, &(), 3).is_err());
        let ok = |_: &()| 3u32;
        assert_eq!(policy_ranking(&ok, &(), 3).unwrap(), vec![3, 1, 2]);
    }

    struct FixedRanking(Vec<u32>);

    impl Policy<()> for FixedRanking {
        fn choose_action(&self, _: &()) -> u32 {
            self.0[0]
        }

        fn choose_ranking(&self, _: &(), _: u32) -> Vec<u32> {
            self.0.clone()
        }
    }

    #[test]
    fn policy_rankings_must_be_permutations() {
        let dup = FixedRanking(vec![2, 2, 1]);
        assert!(policy_ranking(&dup, &(), 3).unwrap_err().is_invalid_argument());
        let short = FixedRanking(vec![2, 1]);
        assert!(policy_ranking(&short, &(), 3).unwrap_err().is_invalid_argument());
        let long = FixedRanking(vec![2, 1, 3, 1]);
        assert!(policy_ranking(&long, &(), 3).unwrap_err().is_invalid_argument());
        let full = FixedRanking(vec![2, 3, 1]);
        assert_eq!(policy_ranking(&full, &(), 3).unwrap(), vec![2, 3, 1]);
    }

    #[test]
    fn lead_with_moves_or_inserts() {
        assert_eq!(lead_with(vec![3, 1, 2], 2), vec![2, 3, 1]);
        assert_eq!(lead_with(vec![3, 1, 2], 3), vec![3, 1, 2]);
        assert_eq!(lead_with(vec![3], 2), vec![2, 3]);
    }

    #[test]
    fn switch_defaults_on() {
        let s = ExploreSwitch::default();
        assert!(s.get());
        s.set(false);
        assert!(!s.get());
    }
}
