//! Unified decision envelope for explorer outputs.
//!
//! Every explorer returns a [`Decision`] carrying what is needed to:
//! - serve (the chosen action, or the full ranking led by it)
//! - log for counterfactual evaluation (the probability of the chosen action)
//! - audit ("why this choice happened", via typed [`DecisionNote`]s)

/// Which explorer produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExplorerKind {
    EpsilonGreedy,
    TauFirst,
    Bootstrap,
    Softmax,
    Generic,
}

impl ExplorerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ExplorerKind::EpsilonGreedy => "epsilon_greedy",
            ExplorerKind::TauFirst => "tau_first",
            ExplorerKind::Bootstrap => "bootstrap",
            ExplorerKind::Softmax => "softmax",
            ExplorerKind::Generic => "generic",
        }
    }
}

impl std::fmt::Display for ExplorerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit notes attached to a decision.
///
/// Notes are small, typed, and stable. Prefer adding new variants over changing
/// existing semantics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecisionNote {
    /// The action was sampled from the explorer's PMF.
    SampledFromDistribution,

    /// The action was drawn uniformly while the tau budget lasted.
    UniformWithinTau { remaining: u64 },

    /// The tau budget is spent; the policy's action was served.
    TauExhausted,

    /// Exploration is switched off; the top-ranked action was served with probability 1.
    ExplorationDisabled,

    /// A minimum-probability floor was applied before sampling.
    MinimumProbabilityEnforced { minimum_uniform: f32 },

    /// The CDF walk never passed the draw and the last action was used.
    NumericalFallbackToLastAction,
}

/// A single explorer decision.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decision {
    /// The explorer that produced this decision.
    pub explorer: ExplorerKind,
    /// Chosen action (1-based).
    pub action: u32,
    /// All served actions, most-preferred first; `ranking[0] == action`.
    pub ranking: Vec<u32>,
    /// Probability with which `action` was chosen.
    pub probability: f32,
    /// Normalized per-action probabilities (index `i` is action `i + 1`).
    ///
    /// Empty when the explorer did not build a distribution (e.g. exploration disabled).
    pub pmf: Vec<f32>,
    /// Audit notes describing why this choice happened.
    pub notes: Vec<DecisionNote>,
}

impl Decision {
    /// True if the decision came from randomization rather than a deterministic exploit.
    pub fn explored(&self) -> bool {
        self.notes.iter().any(|n| {
            matches!(
                n,
                DecisionNote::SampledFromDistribution | DecisionNote::UniformWithinTau { .. }
            )
        })
    }
}
