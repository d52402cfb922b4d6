//! `mwt-explore`: reproducible exploration for multi-world testing.
//!
//! A live decision system (which article to show, which layout to serve) normally
//! follows a default policy. To evaluate *other* policies offline from the same logs,
//! each served decision must be randomized a little and logged with the probability it
//! had of being chosen. This crate does that part, and nothing else:
//!
//! - a unique key per decision is hashed to a seed ([`stable_id_hash`]),
//! - the seed drives a fixed pseudo-random generator ([`uniform`], [`Prg`]),
//! - an [`Explorer`] builds a PMF and samples from it ([`Decision`]),
//! - [`MwtExplorer`] hands `(context, action(s), probability, key)` to a [`Recorder`].
//!
//! Same key, same context, same configuration → same action and probability, across
//! processes and machines. The hash and generator constants are a conformance
//! contract with other implementations of the same scheme.
//!
//! **Explorers:**
//! - [`EpsilonGreedyExplorer`]: `epsilon / n` everywhere, the rest on the policy's action.
//! - [`TauFirstExplorer`]: uniform for the first `tau` calls, then the policy.
//! - [`BootstrapExplorer`]: several policies vote; probability is the vote share.
//! - [`SoftmaxExplorer`]: `softmax(lambda * scores)` over a [`Scorer`].
//! - [`GenericExplorer`]: the scorer's weights are the distribution.
//!
//! Every explorer can be switched to pure exploitation at runtime
//! ([`Explorer::enable_explore`]): the top action is then served with probability 1.
//!
//! **Pure layer:** the PMF builders ([`epsilon_greedy`], [`softmax`], [`bagging`],
//! [`enforce_minimum_probability`]) and the sampler ([`sample_after_normalizing`],
//! [`swap_top_slot`]) work on 0-based indices and are usable on their own. Actions at
//! the explorer boundary are 1-based.
//!
//! **Non-goals:**
//! - Learning. Policies and scorers are opaque capabilities supplied by the caller.
//! - Persistence or transport of logs. A [`Recorder`] is a sink; what it does with an
//!   [`Interaction`] is its own business.
//!
//! ```rust
//! use mwt_explore::{
//!     ActionCount, EpsilonGreedyConfig, EpsilonGreedyExplorer, InMemoryRecorder, MwtExplorer,
//! };
//!
//! let explorer = EpsilonGreedyExplorer::new(
//!     |_: &String| 1u32,
//!     EpsilonGreedyConfig { epsilon: 0.2, num_actions: ActionCount::Fixed(3) },
//! )
//! .unwrap();
//! let mwt = MwtExplorer::new("demo", InMemoryRecorder::new());
//!
//! let ctx = "user=42".to_string();
//! let a = mwt.choose_action(&explorer, "req-1", &ctx).unwrap();
//! assert_eq!(a, mwt.choose_action(&explorer, "req-1", &ctx).unwrap());
//!
//! let log = mwt.recorder().interactions();
//! assert_eq!(log.len(), 2);
//! assert!(log[0].probability > 0.0);
//! ```

#![forbid(unsafe_code)]

mod error;
pub use error::*;

mod stable_hash;
pub use stable_hash::*;

mod prg;
pub use prg::*;

mod distribution;
pub use distribution::*;

mod sample;
pub use sample::*;

mod decision;
pub use decision::*;

mod policy;
pub use policy::*;

mod explorer;
pub use explorer::Explorer;

mod epsilon_greedy;
pub use epsilon_greedy::*;

mod tau_first;
pub use tau_first::*;

mod bootstrap;
pub use bootstrap::*;

mod softmax;
pub use softmax::*;

mod generic;
pub use generic::*;

mod recorder;
pub use recorder::*;

mod mwt;
pub use mwt::*;
