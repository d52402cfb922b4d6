//! The entry point: key → seed → explorer → recorder.

use tracing::{debug, trace};

use crate::{stable_id_hash, Decision, Explorer, Interaction, Recorder, Result};

/// Binds an application id and a [`Recorder`]; drives any [`Explorer`].
///
/// Every successful call is recorded exactly once before it returns; a failed call
/// records nothing. Repeating a call with the same key and context gives the same
/// answer (for explorers without a call counter) and records again.
///
/// ```rust
/// use mwt_explore::{
///     ActionCount, EpsilonGreedyConfig, EpsilonGreedyExplorer, MwtExplorer, StringRecorder,
/// };
///
/// let explorer = EpsilonGreedyExplorer::new(
///     |_: &str| 3u32,
///     EpsilonGreedyConfig { epsilon: 0.0, num_actions: ActionCount::Fixed(5) },
/// )
/// .unwrap();
/// let mwt = MwtExplorer::new("my-app", StringRecorder::new());
/// assert_eq!(mwt.choose_action(&explorer, "request-1", "ctx").unwrap(), 3);
/// assert!(mwt.recorder().contents().starts_with("3 request-1 1.00000 | ctx"));
/// ```
#[derive(Debug)]
pub struct MwtExplorer<R> {
    app_id: String,
    app_id_hash: u64,
    recorder: R,
}

impl<R> MwtExplorer<R> {
    /// `app_id` salts every seed; an empty id leaves seeds equal to the key hash.
    pub fn new(app_id: impl Into<String>, recorder: R) -> Self {
        let app_id = app_id.into();
        let app_id_hash = stable_id_hash(&app_id);
        Self {
            app_id,
            app_id_hash,
            recorder,
        }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    pub fn into_recorder(self) -> R {
        self.recorder
    }

    /// The seed an explorer receives for `unique_key`.
    pub fn seed_for(&self, unique_key: &str) -> u64 {
        stable_id_hash(unique_key).wrapping_add(self.app_id_hash)
    }

    /// Choose one action (1-based) and record it.
    pub fn choose_action<C, E>(&self, explorer: &E, unique_key: &str, context: &C) -> Result<u32>
    where
        C: ?Sized,
        E: Explorer<C> + ?Sized,
        R: Recorder<C>,
    {
        self.decide(explorer, unique_key, context).map(|d| d.action)
    }

    /// Choose a full ranking (chosen action first) and record it.
    pub fn choose_ranking<C, E>(
        &self,
        explorer: &E,
        unique_key: &str,
        context: &C,
    ) -> Result<Vec<u32>>
    where
        C: ?Sized,
        E: Explorer<C> + ?Sized,
        R: Recorder<C>,
    {
        let d = self.run(explorer, unique_key, context)?;
        self.recorder.record(&Interaction {
            context,
            action: d.action,
            actions: &d.ranking,
            probability: d.probability,
            unique_key,
        });
        Ok(d.ranking)
    }

    /// Like [`MwtExplorer::choose_action`] but returns the whole [`Decision`].
    pub fn decide<C, E>(&self, explorer: &E, unique_key: &str, context: &C) -> Result<Decision>
    where
        C: ?Sized,
        E: Explorer<C> + ?Sized,
        R: Recorder<C>,
    {
        let d = self.run(explorer, unique_key, context)?;
        self.recorder.record(&Interaction {
            context,
            action: d.action,
            actions: std::slice::from_ref(&d.action),
            probability: d.probability,
            unique_key,
        });
        Ok(d)
    }

    fn run<C, E>(&self, explorer: &E, unique_key: &str, context: &C) -> Result<Decision>
    where
        C: ?Sized,
        E: Explorer<C> + ?Sized,
    {
        let seed = self.seed_for(unique_key);
        match explorer.choose_action(seed, context) {
            Ok(d) => {
                trace!(
                    unique_key,
                    action = d.action,
                    probability = d.probability,
                    explorer = d.explorer.as_str(),
                    "decision"
                );
                Ok(d)
            }
            Err(err) => {
                debug!(
                    unique_key,
                    explorer = explorer.kind().as_str(),
                    error = %err,
                    "explorer rejected call"
                );
                Err(err)
            }
        }
    }
}
