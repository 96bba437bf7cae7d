//! Picks which message a preview should scroll to after a re-render.
//!
//! The state carried between renders is an explicit [`FocusState`] value;
//! nothing here keeps data between calls.

use crate::batch::strip_enumeration;

/// First index where `current` differs from `previous`, ignoring each
/// side's ` (k/n)` suffix.  An index past the end of `previous` counts as a
/// difference.  `None` when `current` introduces no change.
///
/// ```
/// use chatpad_core::focus_index;
///
/// let before = ["a (1/2)", "b (2/2)"];
/// let after = ["a (1/3)", "b (2/3)", "c (3/3)"];
/// assert_eq!(focus_index(&before, &after), Some(2));
/// ```
pub fn focus_index<P, C>(previous: &[P], current: &[C]) -> Option<usize>
where
    P: AsRef<str>,
    C: AsRef<str>,
{
    current.iter().enumerate().position(|(i, cur)| match previous.get(i) {
        Some(prev) => strip_enumeration(prev.as_ref()) != strip_enumeration(cur.as_ref()),
        None => true,
    })
}

/// The last rendered batch and the index that had focus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusState {
    pub previous: Vec<String>,
    pub focus: Option<usize>,
}

impl FocusState {
    /// State after rendering `current`.  A changed message takes focus;
    /// otherwise the prior focus is kept while it still points into
    /// `current`.
    pub fn advance<C: AsRef<str>>(&self, current: &[C]) -> FocusState {
        let focus = focus_index(self.previous.as_slice(), current)
            .or(self.focus.filter(|&i| i < current.len()));
        FocusState {
            previous: current.iter().map(|s| s.as_ref().to_string()).collect(),
            focus,
        }
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
