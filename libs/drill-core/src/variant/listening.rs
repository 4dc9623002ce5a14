//! Dictation drill: the word is spoken, the learner types it.

use chrono::{DateTime, Utc};

use super::{remediation_updates, DrillVariant};
use crate::matching::answers_match;
use crate::types::{DrillKind, Outcome, WordRecord, WordUpdate};

#[derive(Debug, Clone, Copy, Default)]
pub struct Listening;

impl DrillVariant for Listening {
    type Word = WordRecord;
    type Answer = String;

    fn kind(&self) -> DrillKind {
        DrillKind::Listening
    }

    fn judge(&self, word: &WordRecord, answer: &String) -> Option<Outcome> {
        if answer.trim().is_empty() {
            return None;
        }
        if answers_match(answer, &word.word) {
            Some(Outcome::Correct)
        } else {
            Some(Outcome::Incorrect)
        }
    }

    fn updates(
        &self,
        correct: &[WordRecord],
        incorrect: &[WordRecord],
        now: DateTime<Utc>,
    ) -> Vec<WordUpdate> {
        remediation_updates(self.kind().flag(), correct, incorrect, now)
    }

    fn prompt<'a>(&self, word: &'a WordRecord) -> Option<&'a str> {
        Some(&word.word)
    }
}
