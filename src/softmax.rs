//! Softmax exploration over scorer outputs.

use crate::explorer::{
    check_minimum_uniform, check_scores, exploit, resolve_num_actions, sampled, score_ranking,
    validate_action_count, ExploreSwitch,
};
use crate::{
    argmax, enforce_minimum_probability, sample_after_normalizing, softmax, uniform, ActionCount,
    Context, Decision, DecisionNote, ExploreError, Explorer, ExplorerKind, Result, Scorer,
};

/// Configuration for [`SoftmaxExplorer`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SoftmaxConfig {
    /// Inverse temperature. `0` is uniform; larger is greedier; negative prefers low scores.
    pub lambda: f32,
    pub num_actions: ActionCount,
    /// Minimum-probability floor passed to [`enforce_minimum_probability`]; `0` disables it.
    pub minimum_uniform: f32,
}

impl Default for SoftmaxConfig {
    fn default() -> Self {
        Self {
            lambda: 1.0,
            num_actions: ActionCount::Variable,
            minimum_uniform: 0.0,
        }
    }
}

/// Samples from `softmax(lambda * scores)`; exploits the highest score when disabled.
///
/// The served ranking is all actions by descending score, led by the sampled one.
#[derive(Debug)]
pub struct SoftmaxExplorer<S> {
    scorer: S,
    cfg: SoftmaxConfig,
    explore: ExploreSwitch,
}

impl<S> SoftmaxExplorer<S> {
    pub fn new(scorer: S, cfg: SoftmaxConfig) -> Result<Self> {
        if !cfg.lambda.is_finite() {
            return Err(ExploreError::invalid("lambda must be finite"));
        }
        check_minimum_uniform(cfg.minimum_uniform)?;
        validate_action_count(cfg.num_actions)?;
        Ok(Self {
            scorer,
            cfg,
            explore: ExploreSwitch::default(),
        })
    }

    pub fn config(&self) -> SoftmaxConfig {
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

impl<C, S> Explorer<C> for SoftmaxExplorer<S>
where
    C: Context + ?Sized,
    S: Scorer<C>,
{
    fn kind(&self) -> ExplorerKind {
        ExplorerKind::Softmax
    }

    fn choose_action(&self, seed: u64, context: &C) -> Result<Decision> {
        let n = resolve_num_actions(self.cfg.num_actions, context)?;
        let scores = self.scorer.score_actions(context);
        check_scores(&scores, n)?;

        if !self.explore.get() {
            let top = argmax(&scores).ok_or(ExploreError::InvalidDistribution)?;
            return Ok(exploit(
                ExplorerKind::Softmax,
                score_ranking(&scores, top)?,
                DecisionNote::ExplorationDisabled,
            ));
        }

        let mut pmf = softmax(self.cfg.lambda, &scores);
        let mut notes = Vec::new();
        if self.cfg.minimum_uniform > 0.0 {
            enforce_minimum_probability(self.cfg.minimum_uniform, true, &mut pmf)?;
            notes.push(DecisionNote::MinimumProbabilityEnforced {
                minimum_uniform: self.cfg.minimum_uniform,
            });
        }
        let sample = sample_after_normalizing(uniform(seed), &mut pmf)?;
        let ranking = score_ranking(&scores, sample.index)?;
        Ok(sampled(ExplorerKind::Softmax, pmf, sample, ranking, notes))
    }

    fn enable_explore(&self, explore: bool) {
        self.explore.set(explore);
    }

    fn explore_enabled(&self) -> bool {
        self.explore.get()
    }
}
