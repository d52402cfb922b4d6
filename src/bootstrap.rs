//! Bootstrap (bagging) exploration: several policies vote, the PMF follows the votes.

use crate::explorer::{
    check_action, exploit, policy_ranking, resolve_num_actions, sampled, validate_action_count,
    ExploreSwitch,
};
use crate::{
    bagging, sample_after_normalizing, uniform, ActionCount, Context, Decision, DecisionNote,
    ExploreError, Explorer, ExplorerKind, Policy, Result,
};

/// Configuration for [`BootstrapExplorer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BootstrapConfig {
    pub num_actions: ActionCount,
}

/// Each bag (policy) votes for its top action with weight `1 / bags`.
///
/// With exploration disabled the first policy's ranking is served.
///
/// Heterogeneous policies can be passed as `Box<dyn Fn(&C) -> u32>`.
#[derive(Debug)]
pub struct BootstrapExplorer<P> {
    policies: Vec<P>,
    cfg: BootstrapConfig,
    explore: ExploreSwitch,
}

impl<P> BootstrapExplorer<P> {
    pub fn new(policies: Vec<P>, cfg: BootstrapConfig) -> Result<Self> {
        if policies.is_empty() {
            return Err(ExploreError::invalid("bootstrap needs at least one policy"));
        }
        validate_action_count(cfg.num_actions)?;
        Ok(Self {
            policies,
            cfg,
            explore: ExploreSwitch::default(),
        })
    }

    pub fn bags(&self) -> usize {
        self.policies.len()
    }

    pub fn config(&self) -> BootstrapConfig {
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

impl<C, P> Explorer<C> for BootstrapExplorer<P>
where
    C: Context + ?Sized,
    P: Policy<C>,
{
    fn kind(&self) -> ExplorerKind {
        ExplorerKind::Bootstrap
    }

    fn choose_action(&self, seed: u64, context: &C) -> Result<Decision> {
        let n = resolve_num_actions(self.cfg.num_actions, context)?;
        let (first, rest) = self
            .policies
            .split_first()
            .ok_or_else(|| ExploreError::invalid("bootstrap needs at least one policy"))?;
        let ranking = policy_ranking(first, context, n)?;
        if !self.explore.get() {
            return Ok(exploit(
                ExplorerKind::Bootstrap,
                ranking,
                DecisionNote::ExplorationDisabled,
            ));
        }

        let mut votes = Vec::with_capacity(self.policies.len());
        votes.push((ranking[0] - 1) as usize);
        for policy in rest {
            let a = policy.choose_action(context);
            check_action(a, n)?;
            votes.push((a - 1) as usize);
        }

        let mut pmf = bagging(&votes, n as usize)?;
        let sample = sample_after_normalizing(uniform(seed), &mut pmf)?;
        Ok(sampled(ExplorerKind::Bootstrap, pmf, sample, ranking, Vec::new()))
    }

    fn enable_explore(&self, explore: bool) {
        self.explore.set(explore);
    }

    fn explore_enabled(&self) -> bool {
        self.explore.get()
    }
}
