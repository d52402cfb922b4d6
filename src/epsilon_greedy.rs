//! Epsilon-greedy exploration around a default policy.

use crate::explorer::{
    exploit, policy_ranking, resolve_num_actions, sampled, validate_action_count, ExploreSwitch,
};
use crate::{
    epsilon_greedy, sample_after_normalizing, uniform, ActionCount, Context, Decision,
    DecisionNote, ExploreError, Explorer, ExplorerKind, Policy, Result,
};

/// Configuration for [`EpsilonGreedyExplorer`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpsilonGreedyConfig {
    /// Exploration mass spread uniformly over all actions, in `[0, 1]`.
    pub epsilon: f32,
    pub num_actions: ActionCount,
}

impl Default for EpsilonGreedyConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.1,
            num_actions: ActionCount::Variable,
        }
    }
}

/// Samples from `epsilon / n` everywhere plus `1 - epsilon` on the policy's action.
#[derive(Debug)]
pub struct EpsilonGreedyExplorer<P> {
    policy: P,
    cfg: EpsilonGreedyConfig,
    explore: ExploreSwitch,
}

impl<P> EpsilonGreedyExplorer<P> {
    pub fn new(policy: P, cfg: EpsilonGreedyConfig) -> Result<Self> {
        if !(cfg.epsilon.is_finite() && (0.0..=1.0).contains(&cfg.epsilon)) {
            return Err(ExploreError::invalid(format!(
                "epsilon must be in [0, 1], got {}",
                cfg.epsilon
            )));
        }
        validate_action_count(cfg.num_actions)?;
        Ok(Self {
            policy,
            cfg,
            explore: ExploreSwitch::default(),
        })
    }

    pub fn config(&self) -> EpsilonGreedyConfig {
        self.cfg
    }

    /// See [`Explorer::enable_explore`].
    pub fn enable_explore(&self, explore: bool) {
        self.explore.set(explore);
    }

    pub fn explore_enabled(&self) -> bool {
        self.explore.get()
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }
}

impl<C, P> Explorer<C> for EpsilonGreedyExplorer<P>
where
    C: Context + ?Sized,
    P: Policy<C>,
{
    fn kind(&self) -> ExplorerKind {
        ExplorerKind::EpsilonGreedy
    }

    fn choose_action(&self, seed: u64, context: &C) -> Result<Decision> {
        let n = resolve_num_actions(self.cfg.num_actions, context)?;
        let ranking = policy_ranking(&self.policy, context, n)?;
        if !self.explore.get() {
            return Ok(exploit(
                ExplorerKind::EpsilonGreedy,
                ranking,
                DecisionNote::ExplorationDisabled,
            ));
        }

        let top_index = (ranking[0] - 1) as usize;
        let mut pmf = epsilon_greedy(self.cfg.epsilon, top_index, n as usize)?;
        let sample = sample_after_normalizing(uniform(seed), &mut pmf)?;
        Ok(sampled(
            ExplorerKind::EpsilonGreedy,
            pmf,
            sample,
            ranking,
            Vec::new(),
        ))
    }

    fn enable_explore(&self, explore: bool) {
        self.explore.set(explore);
    }

    fn explore_enabled(&self) -> bool {
        self.explore.get()
    }
}
