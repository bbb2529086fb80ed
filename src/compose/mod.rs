//! Message buffer that turns confirmed selections into text.

use serde::Serialize;

use crate::models::{Action, TargetId};

/// What a selection did to the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum Edit {
    /// A letter was appended; it also feeds the prediction sequence.
    Letter { letter: char },
    /// Anything else. The prediction sequence must be cleared.
    Text,
    /// The selection referred to something that no longer exists.
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct MessageComposer {
    message: String,
}

impl MessageComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Applies a confirmed selection. `predictions` is the candidate list the
    /// renderer showed when the selection fired.
    pub fn apply(&mut self, target: &TargetId, predictions: &[String]) -> Edit {
        match target {
            TargetId::Letter(c) => {
                self.message.push(*c);
                Edit::Letter { letter: *c }
            }
            TargetId::Phrase(phrase) => {
                self.add_phrase(phrase);
                Edit::Text
            }
            TargetId::Prediction(index) => match predictions.get(*index) {
                Some(word) => {
                    self.complete_word(word);
                    Edit::Text
                }
                None => Edit::Ignored,
            },
            TargetId::Action(action) => {
                match action {
                    Action::Space => self.message.push(' '),
                    Action::Backspace => {
                        self.message.pop();
                    }
                    Action::Clear => self.message.clear(),
                }
                Edit::Text
            }
        }
    }

    pub fn clear(&mut self) {
        self.message.clear();
    }

    fn add_phrase(&mut self, phrase: &str) {
        if !self.message.is_empty() && !self.message.ends_with(' ') {
            self.message.push(' ');
        }
        self.message.push_str(phrase);
    }

    /// Replaces the partial word after the last space with `word` and a space.
    fn complete_word(&mut self, word: &str) {
        let keep = self.message.rfind(' ').map(|i| i + 1).unwrap_or(0);
        self.message.truncate(keep);
        self.message.push_str(&word.to_uppercase());
        self.message.push(' ');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_append() {
        let mut composer = MessageComposer::new();
        assert_eq!(
            composer.apply(&TargetId::Letter('H'), &[]),
            Edit::Letter { letter: 'H' }
        );
        composer.apply(&TargetId::Letter('I'), &[]);
        assert_eq!(composer.message(), "HI");
    }

    #[test]
    fn test_phrase_is_space_separated() {
        let mut composer = MessageComposer::new();
        composer.apply(&TargetId::Phrase("CALL NURSE".into()), &[]);
        composer.apply(&TargetId::Phrase("PLEASE HELP".into()), &[]);
        assert_eq!(composer.message(), "CALL NURSE PLEASE HELP");
    }

    #[test]
    fn test_prediction_replaces_partial_word() {
        let mut composer = MessageComposer::new();
        composer.apply(&TargetId::Phrase("I NEED".into()), &[]);
        composer.apply(&TargetId::Action(Action::Space), &[]);
        composer.apply(&TargetId::Letter('W'), &[]);
        composer.apply(&TargetId::Letter('A'), &[]);

        let predictions = vec!["water".to_string(), "wait".to_string()];
        assert_eq!(
            composer.apply(&TargetId::Prediction(0), &predictions),
            Edit::Text
        );
        assert_eq!(composer.message(), "I NEED WATER ");
    }

    #[test]
    fn test_stale_prediction_index_is_ignored() {
        let mut composer = MessageComposer::new();
        composer.apply(&TargetId::Letter('W'), &[]);
        assert_eq!(
            composer.apply(&TargetId::Prediction(3), &["water".to_string()]),
            Edit::Ignored
        );
        assert_eq!(composer.message(), "W");
    }

    #[test]
    fn test_actions() {
        let mut composer = MessageComposer::new();
        for c in "YES".chars() {
            composer.apply(&TargetId::Letter(c), &[]);
        }
        composer.apply(&TargetId::Action(Action::Backspace), &[]);
        assert_eq!(composer.message(), "YE");
        composer.apply(&TargetId::Action(Action::Clear), &[]);
        assert_eq!(composer.message(), "");
        // Backspace on empty is a no-op.
        composer.apply(&TargetId::Action(Action::Backspace), &[]);
        assert_eq!(composer.message(), "");
    }
}
