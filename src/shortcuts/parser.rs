//! Resolution of key specification strings into matchable shortcuts.

use once_cell::sync::Lazy;
use regex::Regex;
use std::rc::Rc;
use tracing::trace;

use super::condition::{Condition, ConditionSet, FocusSignal};
use super::{Handler, Platform, ShortcutMap, SpecEntry};

// Grammar checks: one or more separator-delimited segments followed by a
// non-empty remainder. Empty segments (doubled separators, leading or
// trailing separator) are invalid.
static CHAINED_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^-]+(?:-[^-]+)+$").unwrap());
static COMBINED_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^_]+(?:_[^_]+)+$").unwrap());

const MODIFIERS: [&str; 4] = ["meta", "ctrl", "shift", "alt"];

/// A fully resolved shortcut, ready for matching.
pub(crate) struct Shortcut {
    /// Lowercase key token: the full hyphen-joined source for chained
    /// shortcuts, the residual key with modifier tokens stripped otherwise.
    pub(crate) key: String,
    pub(crate) ctrl: bool,
    pub(crate) meta: bool,
    pub(crate) shift: bool,
    // Alt is parsed for completeness but never compared: the produced key
    // value already differs when Alt is held.
    #[allow(dead_code)]
    pub(crate) alt: bool,
    pub(crate) chained: bool,
    pub(crate) condition: ConditionSet,
    pub(crate) handler: Handler,
}

/// Resolve the caller-supplied mapping into the ordered shortcut list.
///
/// Malformed specifications and entries without a usable handler are skipped
/// with a trace diagnostic; the remaining entries still register.
pub(crate) fn resolve(map: ShortcutMap, focus: &FocusSignal, platform: Platform) -> Vec<Shortcut> {
    map.entries
        .into_iter()
        .filter_map(|(key, entry)| resolve_entry(key, entry, focus, platform))
        .collect()
}

fn resolve_entry(
    key: String,
    entry: SpecEntry,
    focus: &FocusSignal,
    platform: Platform,
) -> Option<Shortcut> {
    let (handler, using_input, whenever) = match entry {
        SpecEntry::Handler(handler) => (handler, None, Vec::new()),
        SpecEntry::Binding(binding) => match binding.handler {
            Some(handler) => (handler, binding.using_input, binding.whenever),
            None => {
                trace!(%key, "shortcut binding has no handler, skipping");
                return None;
            }
        },
        SpecEntry::Disabled => {
            trace!(%key, "shortcut disabled, skipping");
            return None;
        }
    };

    // Both shape checks run independently; a failed check is diagnostic
    // only, the entry still registers.
    if key.contains('-') && key != "-" && !CHAINED_KEY.is_match(&key) {
        trace!(%key, "invalid chained shortcut key");
    }
    if key.contains('_') && key != "_" && !COMBINED_KEY.is_match(&key) {
        trace!(%key, "invalid combined shortcut key");
    }

    // A literal "-" or "_" is a single-character key, not a separator.
    let chained = key.contains('-') && key != "-";

    let (key, mut meta, mut ctrl, shift, alt) = if chained {
        (key.to_lowercase(), false, false, false, false)
    } else {
        let lowered = key.to_lowercase();
        let tokens: Vec<&str> = lowered.split('_').collect();
        // Rejoining with '_' keeps a literal "_" key intact.
        let residual = tokens
            .iter()
            .copied()
            .filter(|token| !MODIFIERS.contains(token))
            .collect::<Vec<_>>()
            .join("_");
        (
            residual,
            tokens.contains(&"meta"),
            tokens.contains(&"ctrl"),
            tokens.contains(&"shift"),
            tokens.contains(&"alt"),
        )
    };

    // Shortcuts authored with the Meta convention become Ctrl accelerators
    // where Ctrl is primary.
    if platform == Platform::CtrlPrimary && meta && !ctrl {
        meta = false;
        ctrl = true;
    }

    let mut terms: Vec<Condition> = Vec::new();
    match using_input {
        Some(tag) if !tag.is_empty() => {
            let focus = focus.clone();
            terms.push(Rc::new(move || {
                focus.current().as_deref() == Some(tag.as_str())
            }));
        }
        _ => {
            let focus = focus.clone();
            terms.push(Rc::new(move || !focus.is_focused()));
        }
    }
    terms.extend(whenever);

    Some(Shortcut {
        key,
        ctrl,
        meta,
        shift,
        alt,
        chained,
        condition: ConditionSet::new(terms),
        handler,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortcuts::ShortcutMap;
    use pretty_assertions::assert_eq;

    fn resolve_keys(keys: &[&str], platform: Platform) -> Vec<Shortcut> {
        let mut map = ShortcutMap::new();
        for key in keys {
            map = map.on(*key, || {});
        }
        resolve(map, &FocusSignal::new(), platform)
    }

    fn flags(shortcut: &Shortcut) -> (bool, bool, bool, bool) {
        (shortcut.meta, shortcut.ctrl, shortcut.shift, shortcut.alt)
    }

    #[test]
    fn test_modifier_tokens_are_order_insensitive() {
        let shortcuts = resolve_keys(&["shift_ctrl_k", "ctrl_shift_k"], Platform::MetaPrimary);
        assert_eq!(shortcuts.len(), 2);
        assert_eq!(shortcuts[0].key, "k");
        assert_eq!(shortcuts[1].key, "k");
        assert_eq!(flags(&shortcuts[0]), flags(&shortcuts[1]));
        assert_eq!(flags(&shortcuts[0]), (false, true, true, false));
    }

    #[test]
    fn test_all_modifier_tokens_set_their_flags() {
        let shortcuts = resolve_keys(&["meta_ctrl_shift_alt_p"], Platform::MetaPrimary);
        assert_eq!(shortcuts[0].key, "p");
        assert_eq!(flags(&shortcuts[0]), (true, true, true, true));
    }

    #[test]
    fn test_meta_becomes_ctrl_on_ctrl_primary_platform() {
        let shortcuts = resolve_keys(&["meta_k"], Platform::CtrlPrimary);
        assert_eq!(flags(&shortcuts[0]), (false, true, false, false));
    }

    #[test]
    fn test_meta_unchanged_on_meta_primary_platform() {
        let shortcuts = resolve_keys(&["meta_k"], Platform::MetaPrimary);
        assert_eq!(flags(&shortcuts[0]), (true, false, false, false));
    }

    #[test]
    fn test_meta_with_ctrl_is_not_remapped() {
        let shortcuts = resolve_keys(&["meta_ctrl_k"], Platform::CtrlPrimary);
        assert_eq!(flags(&shortcuts[0]), (true, true, false, false));
    }

    #[test]
    fn test_chained_key_keeps_full_source_lowercased() {
        let shortcuts = resolve_keys(&["G-D"], Platform::CtrlPrimary);
        assert!(shortcuts[0].chained);
        assert_eq!(shortcuts[0].key, "g-d");
        assert_eq!(flags(&shortcuts[0]), (false, false, false, false));
    }

    #[test]
    fn test_literal_hyphen_and_underscore_are_single_keys() {
        let shortcuts = resolve_keys(&["-", "_"], Platform::CtrlPrimary);
        assert!(!shortcuts[0].chained);
        assert_eq!(shortcuts[0].key, "-");
        assert!(!shortcuts[1].chained);
        assert_eq!(shortcuts[1].key, "_");
    }

    #[test]
    fn test_non_modifier_tokens_are_rejoined() {
        let shortcuts = resolve_keys(&["ctrl_page_down"], Platform::MetaPrimary);
        assert_eq!(shortcuts[0].key, "page_down");
        assert!(shortcuts[0].ctrl);
    }

    #[test]
    fn test_invalid_chained_grammar_still_registers() {
        let shortcuts = resolve_keys(&["g--d"], Platform::CtrlPrimary);
        assert_eq!(shortcuts.len(), 1);
        assert!(shortcuts[0].chained);
        assert_eq!(shortcuts[0].key, "g--d");
    }

    #[test]
    fn test_mixed_separators_take_the_chained_parse() {
        let shortcuts = resolve_keys(&["ctrl_k-d"], Platform::CtrlPrimary);
        assert!(shortcuts[0].chained);
        assert_eq!(shortcuts[0].key, "ctrl_k-d");
        assert_eq!(flags(&shortcuts[0]), (false, false, false, false));
    }

    #[test]
    fn test_disabled_and_handlerless_entries_are_dropped() {
        let map = ShortcutMap::new()
            .disabled("a")
            .bind("b", crate::shortcuts::Binding::empty())
            .on("c", || {});
        let shortcuts = resolve(map, &FocusSignal::new(), Platform::CtrlPrimary);
        assert_eq!(shortcuts.len(), 1);
        assert_eq!(shortcuts[0].key, "c");
    }

    #[test]
    fn test_default_condition_requires_no_input_focus() {
        let focus = FocusSignal::new();
        let map = ShortcutMap::new().on("k", || {});
        let shortcuts = resolve(map, &focus, Platform::CtrlPrimary);
        assert!(shortcuts[0].condition.eval());
        focus.focus("search");
        assert!(!shortcuts[0].condition.eval());
    }

    #[test]
    fn test_using_input_condition_requires_exact_tag() {
        let focus = FocusSignal::new();
        let map = ShortcutMap::new().bind(
            "escape",
            crate::shortcuts::Binding::new(|| {}).using_input("search"),
        );
        let shortcuts = resolve(map, &focus, Platform::CtrlPrimary);
        assert!(!shortcuts[0].condition.eval());
        focus.focus("filter");
        assert!(!shortcuts[0].condition.eval());
        focus.focus("search");
        assert!(shortcuts[0].condition.eval());
    }

    #[test]
    fn test_whenever_terms_are_anded_with_base_rule() {
        let focus = FocusSignal::new();
        let map = ShortcutMap::new().bind(
            "k",
            crate::shortcuts::Binding::new(|| {})
                .whenever(crate::shortcuts::condition(|| false)),
        );
        let shortcuts = resolve(map, &focus, Platform::CtrlPrimary);
        assert!(!shortcuts[0].condition.eval());
    }

    #[test]
    fn test_grammar_regexes() {
        assert!(CHAINED_KEY.is_match("g-d"));
        assert!(CHAINED_KEY.is_match("g-d-x"));
        assert!(!CHAINED_KEY.is_match("g--d"));
        assert!(!CHAINED_KEY.is_match("-d"));
        assert!(!CHAINED_KEY.is_match("g-"));
        assert!(COMBINED_KEY.is_match("ctrl_k"));
        assert!(!COMBINED_KEY.is_match("ctrl__k"));
        assert!(!COMBINED_KEY.is_match("_k"));
        assert!(!COMBINED_KEY.is_match("ctrl_"));
    }
}
