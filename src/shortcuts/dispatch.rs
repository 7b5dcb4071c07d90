//! Event matching against the resolved shortcut list.

use std::time::Instant;

use super::condition::FocusSignal;
use super::debounce::Debounce;
use super::event::KeyPress;
use super::parser::{resolve, Shortcut};
use super::{ShortcutMap, ShortcutOptions};

/// Outcome of feeding one key-down event to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A shortcut fired. The caller must swallow the key instead of applying
    /// its default action.
    Handled,
    /// A shortcut matched but its condition was false: no handler ran and
    /// the default action stays, but the event is consumed (the chain
    /// history is cleared and no further matching happens).
    Inactive,
    /// No shortcut matched.
    Unmatched,
}

/// Matches key-down events against a registered shortcut mapping.
///
/// All matching runs synchronously inside [`on_key`]; the only asynchronous
/// element is the debounced chain reset, driven by calling [`tick`] from the
/// owning event loop. Dropping the dispatcher releases the shortcut list,
/// the history buffer and any pending deadline together.
///
/// [`on_key`]: ShortcutDispatcher::on_key
/// [`tick`]: ShortcutDispatcher::tick
pub struct ShortcutDispatcher {
    shortcuts: Vec<Shortcut>,
    chained_inputs: Vec<String>,
    chain_clear: Debounce,
}

impl ShortcutDispatcher {
    /// Resolve `map` against `focus` and the platform in `options`.
    ///
    /// The resolved list is immutable for the dispatcher's lifetime;
    /// malformed entries have already been dropped with trace diagnostics.
    pub fn register(map: ShortcutMap, focus: &FocusSignal, options: ShortcutOptions) -> Self {
        let shortcuts = resolve(map, focus, options.platform);
        Self {
            shortcuts,
            chained_inputs: Vec::new(),
            chain_clear: Debounce::new(options.chain_delay),
        }
    }

    /// Number of active (successfully resolved) shortcuts.
    pub fn len(&self) -> usize {
        self.shortcuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shortcuts.is_empty()
    }

    /// Deadline of the pending chain reset, if armed. Event loops can use
    /// it to bound their poll timeout.
    pub fn chain_deadline(&self) -> Option<Instant> {
        self.chain_clear.deadline()
    }

    /// Discard the chain prefix if the quiet period has elapsed.
    pub fn tick(&mut self) {
        if self.chain_clear.fire() {
            self.chained_inputs.clear();
        }
    }

    /// Match one key-down event.
    pub fn on_key(&mut self, event: &KeyPress) -> Dispatch {
        // Synthetic events (e.g. input autocomplete) carry no key value.
        if event.key.is_empty() {
            return Dispatch::Unmatched;
        }

        self.chained_inputs.push(event.key.clone());

        // A chain match consumes the event even when its condition is
        // false: standard matching never sees it.
        if self.chained_inputs.len() >= 2 {
            let chain_key = self.chained_inputs[self.chained_inputs.len() - 2..].join("-");
            if let Some(idx) = self
                .shortcuts
                .iter()
                .position(|s| s.chained && s.key == chain_key)
            {
                return self.fire(idx);
            }
        }

        let lowered = event.key.to_lowercase();
        let alphabetic = is_alphabetic(&event.key);
        let standard = self.shortcuts.iter().position(|s| {
            !s.chained
                && s.key == lowered
                && s.meta == event.meta
                && s.ctrl == event.ctrl
                // Shift changes which character a non-alphabetic key
                // produces, so the key value already reflects it. Alt is
                // never compared for the same reason.
                && (!alphabetic || s.shift == event.shift)
        });
        if let Some(idx) = standard {
            return self.fire(idx);
        }

        // Bound how long a dangling keystroke stays eligible to start a
        // chain. Every unmatched key pushes the deadline out.
        self.chain_clear.arm();
        Dispatch::Unmatched
    }

    fn fire(&mut self, idx: usize) -> Dispatch {
        let active = self.shortcuts[idx].condition.eval();
        if active {
            (self.shortcuts[idx].handler)();
        }
        self.chained_inputs.clear();
        if active {
            Dispatch::Handled
        } else {
            Dispatch::Inactive
        }
    }
}

fn is_alphabetic(key: &str) -> bool {
    let mut chars = key.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortcuts::Platform;
    use std::time::Duration;

    fn dispatcher(map: ShortcutMap) -> ShortcutDispatcher {
        let options = ShortcutOptions {
            chain_delay: Duration::from_millis(800),
            platform: Platform::CtrlPrimary,
        };
        ShortcutDispatcher::register(map, &FocusSignal::new(), options)
    }

    #[test]
    fn test_is_alphabetic_single_letters_only() {
        assert!(is_alphabetic("k"));
        assert!(is_alphabetic("K"));
        assert!(!is_alphabetic("!"));
        assert!(!is_alphabetic("enter"));
        assert!(!is_alphabetic(""));
    }

    #[test]
    fn test_empty_key_is_ignored() {
        let mut dispatcher = dispatcher(ShortcutMap::new().on("g-d", || {}));
        assert_eq!(dispatcher.on_key(&KeyPress::new("")), Dispatch::Unmatched);
        // The empty event must not arm the reset timer or enter history.
        assert!(dispatcher.chain_deadline().is_none());
    }

    #[test]
    fn test_unmatched_key_arms_chain_reset() {
        let mut dispatcher = dispatcher(ShortcutMap::new().on("g-d", || {}));
        assert_eq!(dispatcher.on_key(&KeyPress::new("x")), Dispatch::Unmatched);
        assert!(dispatcher.chain_deadline().is_some());
    }

    #[test]
    fn test_match_does_not_arm_chain_reset() {
        let mut dispatcher = dispatcher(ShortcutMap::new().on("k", || {}));
        assert_eq!(dispatcher.on_key(&KeyPress::new("k")), Dispatch::Handled);
        assert!(dispatcher.chain_deadline().is_none());
    }
}
