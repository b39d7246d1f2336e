// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-session fallback position over the candidate model list.
//!
//! [`FallbackState`] is plain data owned by a session. [`FallbackCursor`]
//! borrows it together with the model list for the duration of one
//! completion, so a session can never have two completions moving its
//! position at once.

use tracing::debug;

/// Which candidate a session will try next, and which one last served it.
///
/// Starts at index 0 with nothing recorded. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallbackState {
    pub current_index: usize,
    pub last_successful_model: Option<String>,
}

/// Moves a [`FallbackState`] over a model list.
#[derive(Debug)]
pub struct FallbackCursor<'a> {
    models: &'a [String],
    state: &'a mut FallbackState,
}

impl<'a> FallbackCursor<'a> {
    pub fn new(models: &'a [String], state: &'a mut FallbackState) -> Self {
        Self { models, state }
    }

    /// The model at the current position.
    ///
    /// If the list shrank since the index was set, the index is reset to 0
    /// first. Returns `""` only for an empty list, which the registry never
    /// produces.
    pub fn current(&mut self) -> &'a str {
        if self.state.current_index >= self.models.len() {
            debug!(
                index = self.state.current_index,
                len = self.models.len(),
                "fallback index out of range, resetting to primary"
            );
            self.state.current_index = 0;
        }
        self.models
            .get(self.state.current_index)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Demotes to the next model, recording it as the one now in use.
    ///
    /// Returns `false` without moving when already on the last model.
    pub fn advance(&mut self) -> bool {
        let next = self.state.current_index + 1;
        match self.models.get(next) {
            Some(model) => {
                self.state.current_index = next;
                self.state.last_successful_model = Some(model.clone());
                debug!(model = %model, index = next, "advanced to next fallback model");
                true
            }
            None => false,
        }
    }

    /// Back to the primary model.
    pub fn reset(&mut self) {
        self.state.current_index = 0;
        self.state.last_successful_model = self.models.first().cloned();
    }

    pub fn index(&self) -> usize {
        self.state.current_index
    }

    /// Puts the index back to a previously observed value.
    pub fn restore(&mut self, index: usize) {
        self.state.current_index = index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn models(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn fresh_state_points_at_primary() {
        let list = models(&["a", "b", "c"]);
        let mut state = FallbackState::default();
        let mut cursor = FallbackCursor::new(&list, &mut state);
        assert_eq!(cursor.current(), "a");
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn advance_moves_and_records_model() {
        let list = models(&["a", "b", "c"]);
        let mut state = FallbackState::default();
        {
            let mut cursor = FallbackCursor::new(&list, &mut state);
            assert!(cursor.advance());
            assert_eq!(cursor.current(), "b");
        }
        assert_eq!(state.current_index, 1);
        assert_eq!(state.last_successful_model.as_deref(), Some("b"));
    }

    #[test]
    fn advance_stops_at_last_without_wrapping() {
        let list = models(&["a", "b"]);
        let mut state = FallbackState::default();
        let mut cursor = FallbackCursor::new(&list, &mut state);
        assert!(cursor.advance());
        assert!(!cursor.advance());
        assert_eq!(cursor.current(), "b");
        assert_eq!(cursor.index(), 1);
    }

    #[test]
    fn advance_on_single_model_is_false() {
        let list = models(&["only"]);
        let mut state = FallbackState::default();
        let mut cursor = FallbackCursor::new(&list, &mut state);
        assert!(!cursor.advance());
        assert_eq!(cursor.current(), "only");
    }

    #[test]
    fn reset_returns_to_primary() {
        let list = models(&["a", "b", "c"]);
        let mut state = FallbackState {
            current_index: 2,
            last_successful_model: Some("c".to_string()),
        };
        FallbackCursor::new(&list, &mut state).reset();
        assert_eq!(state.current_index, 0);
        assert_eq!(state.last_successful_model.as_deref(), Some("a"));
    }

    #[test]
    fn shrunk_list_resets_out_of_range_index() {
        let list = models(&["a", "b"]);
        let mut state = FallbackState {
            current_index: 5,
            last_successful_model: None,
        };
        let mut cursor = FallbackCursor::new(&list, &mut state);
        assert_eq!(cursor.current(), "a");
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn restore_sets_index() {
        let list = models(&["a", "b", "c"]);
        let mut state = FallbackState::default();
        let mut cursor = FallbackCursor::new(&list, &mut state);
        cursor.advance();
        cursor.advance();
        cursor.restore(1);
        assert_eq!(cursor.current(), "b");
    }

    proptest! {
        #[test]
        fn current_is_always_a_list_member(len in 1usize..8, start in 0usize..16, steps in 0usize..16) {
            let list: Vec<String> = (0..len).map(|i| format!("m{i}")).collect();
            let mut state = FallbackState { current_index: start, last_successful_model: None };
            let mut cursor = FallbackCursor::new(&list, &mut state);
            for _ in 0..steps {
                cursor.current();
                cursor.advance();
            }
            let current = cursor.current().to_string();
            prop_assert!(list.contains(&current));
            prop_assert!(cursor.index() < len);
        }
    }
}
