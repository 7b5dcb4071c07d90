//! Declarative keyboard shortcuts.
//!
//! Callers register a mapping from key specification strings to handlers and
//! feed live key-down events to the resulting [`ShortcutDispatcher`]. Two
//! specification syntaxes exist:
//!
//! - **Combined**: underscore-joined modifier tokens plus a key, e.g.
//!   `ctrl_k` or `shift_ctrl_p`. Shortcuts authored with `meta` work as
//!   Ctrl-based accelerators on platforms where Ctrl is the primary
//!   accelerator.
//! - **Chained**: a hyphen-joined two-keystroke sequence, e.g. `g-d` (press
//!   `g`, then `d` within the chain delay).
//!
//! Each shortcut carries an activation condition: by default it is inert
//! while a text input has focus (see [`FocusSignal`]); a [`Binding`] can
//! instead require a specific input tag or add arbitrary `whenever`
//! predicates. Malformed entries are skipped with a trace diagnostic rather
//! than failing registration of the rest.

mod condition;
mod debounce;
mod dispatch;
mod event;
mod parser;

pub use condition::{condition, Condition, FocusSignal};
pub use debounce::Debounce;
pub use dispatch::{Dispatch, ShortcutDispatcher};
pub use event::KeyPress;

use std::time::Duration;

/// Handler invoked when a shortcut fires.
pub type Handler = Box<dyn FnMut()>;

/// Modifier-key convention of the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Meta (Command) is the primary accelerator.
    MetaPrimary,
    /// Ctrl is the primary accelerator.
    CtrlPrimary,
}

impl Platform {
    /// Convention for the current target OS.
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MetaPrimary
        } else {
            Platform::CtrlPrimary
        }
    }
}

/// Options accepted at registration.
#[derive(Debug, Clone)]
pub struct ShortcutOptions {
    /// Quiet period before a dangling chain prefix is discarded.
    pub chain_delay: Duration,
    /// Convention used for Meta to Ctrl normalization.
    pub platform: Platform,
}

impl Default for ShortcutOptions {
    fn default() -> Self {
        Self {
            chain_delay: Duration::from_millis(800),
            platform: Platform::detect(),
        }
    }
}

/// A mapping value: handler plus optional activation rules.
pub struct Binding {
    pub(crate) handler: Option<Handler>,
    pub(crate) using_input: Option<String>,
    pub(crate) whenever: Vec<Condition>,
}

impl Binding {
    pub fn new(handler: impl FnMut() + 'static) -> Self {
        Self {
            handler: Some(Box::new(handler)),
            using_input: None,
            whenever: Vec::new(),
        }
    }

    /// A binding without a handler; dropped at registration with a
    /// diagnostic, leaving the other entries untouched.
    pub fn empty() -> Self {
        Self {
            handler: None,
            using_input: None,
            whenever: Vec::new(),
        }
    }

    /// Only fire while the input tagged `tag` has focus. Without this, the
    /// shortcut is inert whenever any text input has focus.
    pub fn using_input(mut self, tag: impl Into<String>) -> Self {
        self.using_input = Some(tag.into());
        self
    }

    /// Additional condition; the shortcut fires only when all are true.
    pub fn whenever(mut self, cond: Condition) -> Self {
        self.whenever.push(cond);
        self
    }
}

pub(crate) enum SpecEntry {
    Handler(Handler),
    Binding(Binding),
    Disabled,
}

/// Insertion-ordered mapping from key specification strings to handlers.
///
/// Registration order is load-bearing: when two entries resolve to the same
/// key and modifiers, the first registered wins.
#[derive(Default)]
pub struct ShortcutMap {
    pub(crate) entries: Vec<(String, SpecEntry)>,
}

impl ShortcutMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bare handler under `key`.
    pub fn on(mut self, key: impl Into<String>, handler: impl FnMut() + 'static) -> Self {
        self.entries
            .push((key.into(), SpecEntry::Handler(Box::new(handler))));
        self
    }

    /// Register a binding record under `key`.
    pub fn bind(mut self, key: impl Into<String>, binding: Binding) -> Self {
        self.entries.push((key.into(), SpecEntry::Binding(binding)));
        self
    }

    /// Keep `key` in the mapping but inert. Lets callers register a fixed
    /// shape of shortcuts and switch individual ones off.
    pub fn disabled(mut self, key: impl Into<String>) -> Self {
        self.entries.push((key.into(), SpecEntry::Disabled));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
