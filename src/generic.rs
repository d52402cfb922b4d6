//! Generic exploration: the scorer's outputs are the (unnormalized) distribution.

use crate::explorer::{
    check_minimum_uniform, check_scores, exploit, resolve_num_actions, sampled, score_ranking,
    validate_action_count, ExploreSwitch,
};
use crate::{
    argmax, enforce_minimum_probability, sample_after_normalizing, uniform, ActionCount, Context,
    Decision, DecisionNote, ExploreError, Explorer, ExplorerKind, Result, Scorer,
};

/// Configuration for [`GenericExplorer`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenericConfig {
    pub num_actions: ActionCount,
    /// Minimum-probability floor; `0` disables it.
    pub minimum_uniform: f32,
}

/// Samples in proportion to the scorer's weights.
///
/// Negative weights count as zero. All-zero weights fail with
/// [`ExploreError::InvalidDistribution`].
#[derive(Debug)]
pub struct GenericExplorer<S> {
    scorer: S,
    cfg: GenericConfig,
    explore: ExploreSwitch,
}

impl<S> GenericExplorer<S> {
    pub fn new(scorer: S, cfg: GenericConfig) -> Result<Self> {
        check_minimum_uniform(cfg.minimum_uniform)?;
        validate_action_count(cfg.num_actions)?;
        Ok(Self {
            scorer,
            cfg,
            explore: ExploreSwitch::default(),
        })
    }

    pub fn config(&self) -> GenericConfig {
        self.cfg
    }

    /// See [`Explorer::enable_explore`].
    pub fn enable_explore(&self, explore: bool) {
        self.explore.set(explore);
    }

    pub fn explore_enabled(&self) -> bool {
        self.explore.get()
    }
}

impl<C, S> Explorer<C> for GenericExplorer<S>
where
    C: Context + ?Sized,
    S: Scorer<C>,
{
    fn kind(&self) -> ExplorerKind {
        ExplorerKind::Generic
    }

    fn choose_action(&self, seed: u64, context: &C) -> Result<Decision> {
        let n = resolve_num_actions(self.cfg.num_actions, context)?;
        let weights = self.scorer.score_actions(context);
        check_scores(&weights, n)?;

        if !self.explore.get() {
            let top = argmax(&weights).ok_or(ExploreError::InvalidDistribution)?;
            return Ok(exploit(
                ExplorerKind::Generic,
                score_ranking(&weights, top)?,
                DecisionNote::ExplorationDisabled,
            ));
        }

        let mut pmf = weights;
        let mut notes = Vec::new();
        if self.cfg.minimum_uniform > 0.0 {
            // The floor assumes a normalized input.
            let mut total: f32 = pmf.iter().filter(|p| **p > 0.0).sum();
            if total.is_infinite() && !pmf.iter().any(|p| p.is_infinite()) {
                let max = pmf.iter().copied().fold(0.0f32, f32::max);
                for p in pmf.iter_mut() {
                    *p /= max;
                }
                total = pmf.iter().filter(|p| **p > 0.0).sum();
            }
            if !(total > 0.0 && total.is_finite()) {
                return Err(ExploreError::InvalidDistribution);
            }
            for p in pmf.iter_mut() {
                *p = if *p > 0.0 { *p / total } else { 0.0 };
            }
            enforce_minimum_probability(self.cfg.minimum_uniform, true, &mut pmf)?;
            notes.push(DecisionNote::MinimumProbabilityEnforced {
                minimum_uniform: self.cfg.minimum_uniform,
            });
        }
        let sample = sample_after_normalizing(uniform(seed), &mut pmf)?;
        let ranking = score_ranking(&pmf, sample.index)?;
        Ok(sampled(ExplorerKind::Generic, pmf, sample, ranking, notes))
    }

    fn enable_explore(&self, explore: bool) {
        self.explore.set(explore);
    }

    fn explore_enabled(&self) -> bool {
        self.explore.get()
    }
}
