//! Capabilities an explorer wraps: the caller's context, its default `Policy`, and
//! `Scorer`s.
//!
//! Actions at this boundary are **1-based** (`1..=num_actions`); 0 is never valid.

/// Caller-supplied decision context.
///
/// The library never inspects a context beyond [`Context::number_of_actions`]; it is
/// passed through to the policy/scorer and to the recorder.
///
/// A context that returns `Some(n)` carries a *variable* action count and can only be
/// used with explorers configured with [`ActionCount::Variable`]; a context returning
/// `None` needs an explorer with [`ActionCount::Fixed`].
pub trait Context {
    /// Number of actions for this decision, when the context decides it.
    fn number_of_actions(&self) -> Option<u32> {
        None
    }
}

impl Context for () {}
impl Context for str {}
impl Context for String {}
impl Context for [f32] {}
impl Context for Vec<f32> {}

impl<C: Context + ?Sized> Context for &C {
    fn number_of_actions(&self) -> Option<u32> {
        (**self).number_of_actions()
    }
}

/// Wraps any context with a per-call action count.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableActionContext<T> {
    pub inner: T,
    pub num_actions: u32,
}

impl<T> VariableActionContext<T> {
    pub fn new(inner: T, num_actions: u32) -> Self {
        Self { inner, num_actions }
    }
}

impl<T> Context for VariableActionContext<T> {
    fn number_of_actions(&self) -> Option<u32> {
        Some(self.num_actions)
    }
}

impl<T: std::fmt::Display> std::fmt::Display for VariableActionContext<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.inner, f)
    }
}

/// Where an explorer gets `num_actions` from on each call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionCount {
    /// Constant action count; contexts must not carry their own.
    Fixed(u32),
    /// Read from [`Context::number_of_actions`] on every call.
    #[default]
    Variable,
}

/// The default (business-logic) decision absent exploration.
///
/// Closures `Fn(&C) -> u32` are policies.
///
/// ```rust
/// use mwt_explore::Policy;
///
/// let always_two = |_: &()| 2u32;
/// assert_eq!(always_two.choose_action(&()), 2);
/// assert_eq!(always_two.choose_ranking(&(), 4), vec![2, 1, 3, 4]);
/// ```
pub trait Policy<C: ?Sized> {
    /// Most-preferred action (1-based).
    fn choose_action(&self, context: &C) -> u32;

    /// Full ranking, most-preferred first.
    ///
    /// The default puts [`Policy::choose_action`] first and the remaining actions in
    /// ascending order. Ranking policies override this; explorers serve this ranking with
    /// the chosen action moved to the front.
    fn choose_ranking(&self, context: &C, num_actions: u32) -> Vec<u32> {
        let top = self.choose_action(context);
        let mut ranking = Vec::with_capacity(num_actions as usize);
        ranking.push(top);
        ranking.extend((1..=num_actions).filter(|&a| a != top));
        ranking
    }
}

impl<C: ?Sized, F> Policy<C> for F
where
    F: Fn(&C) -> u32,
{
    fn choose_action(&self, context: &C) -> u32 {
        self(context)
    }
}

/// One real-valued score per action (index `i` scores action `i + 1`); higher is better.
///
/// Closures `Fn(&C) -> Vec<f32>` are scorers.
pub trait Scorer<C: ?Sized> {
    fn score_actions(&self, context: &C) -> Vec<f32>;
}

impl<C: ?Sized, F> Scorer<C> for F
where
    F: Fn(&C) -> Vec<f32>,
{
    fn score_actions(&self, context: &C) -> Vec<f32> {
        self(context)
    }
}
