//! Recorder sinks: where every served decision is logged for offline evaluation.
//!
//! An [`Interaction`] is built exactly once per successful call and handed to the
//! recorder by reference; the library keeps nothing. Recorders must not fail on valid
//! input: persistence errors are theirs to handle.

use std::fmt::{self, Display, Write as _};
use std::sync::{Mutex, MutexGuard};

use tracing::info;

/// One served decision, borrowed for the duration of [`Recorder::record`].
#[derive(Debug, Clone, Copy)]
pub struct Interaction<'a, C: ?Sized> {
    pub context: &'a C,
    /// The chosen action (1-based). Equals `actions[0]`.
    pub action: u32,
    /// Every served action, chosen first; a single element for `choose_action`.
    pub actions: &'a [u32],
    /// Probability with which `action` was chosen.
    pub probability: f32,
    pub unique_key: &'a str,
}

impl<C: ?Sized> Interaction<'_, C> {
    /// True when the caller asked for a full ranking.
    pub fn is_ranking(&self) -> bool {
        self.actions.len() > 1
    }
}

/// Sink for served decisions.
///
/// Closures `Fn(&Interaction<C>)` are recorders.
pub trait Recorder<C: ?Sized> {
    fn record(&self, interaction: &Interaction<'_, C>);
}

impl<C: ?Sized, F> Recorder<C> for F
where
    F: Fn(&Interaction<'_, C>),
{
    fn record(&self, interaction: &Interaction<'_, C>) {
        self(interaction)
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct JoinedActions<'a>(&'a [u32]);

impl Display for JoinedActions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, a) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_char(',')?;
            }
            write!(f, "{a}")?;
        }
        Ok(())
    }
}

/// Appends one text line per interaction:
/// `"{actions} {unique_key} {probability:.5} | {context}"`, actions comma-joined.
///
/// ```rust
/// use mwt_explore::{Interaction, Recorder, StringRecorder};
///
/// let rec = StringRecorder::new();
/// rec.record(&Interaction {
///     context: "user=7",
///     action: 2,
///     actions: &[2, 1, 3],
///     probability: 0.25,
///     unique_key: "k1",
/// });
/// assert_eq!(rec.contents(), "2,1,3 k1 0.25000 | user=7\n");
/// ```
#[derive(Debug, Default)]
pub struct StringRecorder {
    buf: Mutex<String>,
}

impl StringRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        lock(&self.buf).clone()
    }

    /// Return the accumulated text and clear the buffer.
    pub fn take(&self) -> String {
        std::mem::take(&mut *lock(&self.buf))
    }
}

impl<C: Display + ?Sized> Recorder<C> for StringRecorder {
    fn record(&self, i: &Interaction<'_, C>) {
        let mut buf = lock(&self.buf);
        // Writing into a String cannot fail.
        let _ = writeln!(
            buf,
            "{} {} {:.5} | {}",
            JoinedActions(i.actions),
            i.unique_key,
            i.probability,
            i.context
        );
    }
}

/// Owned copy of an [`Interaction`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordedInteraction<C> {
    pub context: C,
    pub actions: Vec<u32>,
    pub probability: f32,
    pub unique_key: String,
}

impl<C> RecordedInteraction<C> {
    /// The chosen action (1-based).
    pub fn action(&self) -> Option<u32> {
        self.actions.first().copied()
    }
}

/// Keeps every interaction in memory, in call order.
#[derive(Debug)]
pub struct InMemoryRecorder<C> {
    log: Mutex<Vec<RecordedInteraction<C>>>,
}

impl<C> Default for InMemoryRecorder<C> {
    fn default() -> Self {
        Self {
            log: Mutex::new(Vec::new()),
        }
    }
}

impl<C> InMemoryRecorder<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        lock(&self.log).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain everything recorded so far.
    pub fn take(&self) -> Vec<RecordedInteraction<C>> {
        std::mem::take(&mut *lock(&self.log))
    }
}

impl<C: Clone> InMemoryRecorder<C> {
    pub fn interactions(&self) -> Vec<RecordedInteraction<C>> {
        lock(&self.log).clone()
    }
}

impl<C: Clone> Recorder<C> for InMemoryRecorder<C> {
    fn record(&self, i: &Interaction<'_, C>) {
        lock(&self.log).push(RecordedInteraction {
            context: i.context.clone(),
            actions: i.actions.to_vec(),
            probability: i.probability,
            unique_key: i.unique_key.to_owned(),
        });
    }
}

/// Emits each interaction as an `info` event on target `mwt_explore::interaction`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRecorder;

impl<C: fmt::Debug + ?Sized> Recorder<C> for TracingRecorder {
    fn record(&self, i: &Interaction<'_, C>) {
        info!(
            target: "mwt_explore::interaction",
            unique_key = i.unique_key,
            action = i.action,
            actions = %JoinedActions(i.actions),
            probability = i.probability,
            context = ?i.context,
            "interaction"
        );
    }
}
