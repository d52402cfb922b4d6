//! Tau-first exploration: uniform actions for the first `tau` calls, then the policy.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::explorer::{
    exploit, lead_with, policy_ranking, resolve_num_actions, validate_action_count,
    ExploreSwitch,
};
use crate::{
    ActionCount, Context, Decision, DecisionNote, Explorer, ExplorerKind, Policy, Prg, Result,
};

/// Configuration for [`TauFirstExplorer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TauFirstConfig {
    /// Number of calls that explore uniformly.
    pub tau: u64,
    pub num_actions: ActionCount,
}

impl Default for TauFirstConfig {
    fn default() -> Self {
        Self {
            tau: 0,
            num_actions: ActionCount::Variable,
        }
    }
}

/// Explores uniformly while its budget lasts.
///
/// The budget is an atomic counter: concurrent calls never spend more than `tau`
/// explorations in total. Calls made while exploration is disabled do not spend it.
#[derive(Debug)]
pub struct TauFirstExplorer<P> {
    policy: P,
    cfg: TauFirstConfig,
    remaining: AtomicU64,
    explore: ExploreSwitch,
}

impl<P> TauFirstExplorer<P> {
    pub fn new(policy: P, cfg: TauFirstConfig) -> Result<Self> {
        validate_action_count(cfg.num_actions)?;
        Ok(Self {
            policy,
            cfg,
            remaining: AtomicU64::new(cfg.tau),
            explore: ExploreSwitch::default(),
        })
    }

    /// Explorations left in the budget.
    pub fn remaining_tau(&self) -> u64 {
        self.remaining.load(Ordering::Acquire)
    }

    pub fn config(&self) -> TauFirstConfig {
        self.cfg
    }

    /// See [`Explorer::enable_explore`].
    pub fn enable_explore(&self, explore: bool) {
        self.explore.set(explore);
    }

    pub fn explore_enabled(&self) -> bool {
        self.explore.get()
    }

    /// Spend one exploration; returns what is left after it, or `None` if exhausted.
    fn take_one(&self) -> Option<u64> {
        self.remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |t| t.checked_sub(1))
            .ok()
            .map(|before| before - 1)
    }
}

impl<C, P> Explorer<C> for TauFirstExplorer<P>
where
    C: Context + ?Sized,
    P: Policy<C>,
{
    fn kind(&self) -> ExplorerKind {
        ExplorerKind::TauFirst
    }

    fn choose_action(&self, seed: u64, context: &C) -> Result<Decision> {
        let n = resolve_num_actions(self.cfg.num_actions, context)?;
        let ranking = policy_ranking(&self.policy, context, n)?;
        if !self.explore.get() {
            return Ok(exploit(
                ExplorerKind::TauFirst,
                ranking,
                DecisionNote::ExplorationDisabled,
            ));
        }
        let Some(remaining) = self.take_one() else {
            return Ok(exploit(
                ExplorerKind::TauFirst,
                ranking,
                DecisionNote::TauExhausted,
            ));
        };

        let action = Prg::new(seed).uniform_int(1, n);
        let p = 1.0 / n as f32;
        Ok(Decision {
            explorer: ExplorerKind::TauFirst,
            action,
            ranking: lead_with(ranking, action),
            probability: p,
            pmf: vec![p; n as usize],
            notes: vec![DecisionNote::UniformWithinTau { remaining }],
        })
    }

    fn enable_explore(&self, explore: bool) {
        self.explore.set(explore);
    }

    fn explore_enabled(&self) -> bool {
        self.explore.get()
    }
}
