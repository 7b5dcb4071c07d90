//! Pull-based activation conditions.
//!
//! A shortcut's condition is evaluated synchronously at match time; nothing
//! here pushes notifications. The dispatcher runs on a single thread, so
//! shared state uses `Rc`/`RefCell`.

use std::cell::RefCell;
use std::rc::Rc;

/// A boolean predicate gating whether a matched shortcut fires.
pub type Condition = Rc<dyn Fn() -> bool>;

/// Wrap a closure as a [`Condition`].
pub fn condition<F>(f: F) -> Condition
where
    F: Fn() -> bool + 'static,
{
    Rc::new(f)
}

/// Shared signal tracking which text input (if any) currently has focus.
///
/// Clones share the same underlying cell, so the UI layer and the dispatcher
/// always observe the same focus state.
#[derive(Clone, Debug, Default)]
pub struct FocusSignal {
    inner: Rc<RefCell<Option<String>>>,
}

impl FocusSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the input carrying `tag` as focused.
    pub fn focus(&self, tag: impl Into<String>) {
        *self.inner.borrow_mut() = Some(tag.into());
    }

    /// Clear input focus.
    pub fn blur(&self) {
        *self.inner.borrow_mut() = None;
    }

    /// Tag of the currently focused input, if any.
    pub fn current(&self) -> Option<String> {
        self.inner.borrow().clone()
    }

    pub fn is_focused(&self) -> bool {
        self.inner.borrow().is_some()
    }
}

/// Logical AND of a shortcut's conditions. The empty set is identity.
pub(crate) struct ConditionSet {
    terms: Vec<Condition>,
}

impl ConditionSet {
    pub(crate) fn new(terms: Vec<Condition>) -> Self {
        Self { terms }
    }

    pub(crate) fn eval(&self) -> bool {
        self.terms.iter().all(|term| term())
    }
}
