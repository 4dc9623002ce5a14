//! Multiple-choice drill: pick the right translation before the timer runs out.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{remediation_updates, DrillVariant, FeedbackTiming};
use crate::session::DrillWord;
use crate::types::{DrillKind, Outcome, WordRecord, WordUpdate};

/// One answer option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub translation: String,
    pub correct: bool,
}

/// A word together with its shuffled answer options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepetitionWord {
    pub record: WordRecord,
    pub choices: Vec<Choice>,
}

impl DrillWord for RepetitionWord {
    fn record(&self) -> &WordRecord {
        &self.record
    }
}

impl RepetitionWord {
    /// Attach options to every record. Distractors are translations of other
    /// words in the list; short lists simply get fewer options.
    pub fn with_choices<R: Rng + ?Sized>(
        records: Vec<WordRecord>,
        distractors: usize,
        rng: &mut R,
    ) -> Vec<Self> {
        let pool: Vec<String> = records.iter().map(WordRecord::translation).collect();

        records
            .into_iter()
            .map(|record| {
                let answer = record.translation();
                let mut others: Vec<&String> = pool.iter().filter(|t| **t != answer).collect();
                others.sort();
                others.dedup();

                let mut choices: Vec<Choice> = others
                    .choose_multiple(rng, distractors)
                    .map(|translation| Choice {
                        translation: (*translation).clone(),
                        correct: false,
                    })
                    .collect();
                choices.push(Choice {
                    translation: answer,
                    correct: true,
                });
                choices.shuffle(rng);

                Self { record, choices }
            })
            .collect()
    }
}

/// The option picked and how long the learner took.
///
/// `choice` is `None` when the answer window ran out with nothing picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepetitionAnswer {
    pub choice: Option<usize>,
    pub elapsed: Duration,
}

impl RepetitionAnswer {
    pub fn picked(choice: usize, elapsed: Duration) -> Self {
        Self {
            choice: Some(choice),
            elapsed,
        }
    }

    pub fn timed_out(elapsed: Duration) -> Self {
        Self {
            choice: None,
            elapsed,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Repetition {
    /// Answers slower than this count as incorrect.
    pub answer_window: Duration,
    pub timing: FeedbackTiming,
}

impl Default for Repetition {
    fn default() -> Self {
        Self {
            answer_window: Duration::from_millis(4000),
            timing: FeedbackTiming {
                correct: Duration::from_millis(1000),
                incorrect: Duration::from_millis(1000),
            },
        }
    }
}

impl DrillVariant for Repetition {
    type Word = RepetitionWord;
    type Answer = RepetitionAnswer;

    fn kind(&self) -> DrillKind {
        DrillKind::Repetition
    }

    fn judge(&self, word: &RepetitionWord, answer: &RepetitionAnswer) -> Option<Outcome> {
        let Some(index) = answer.choice else {
            return Some(Outcome::Incorrect);
        };
        let choice = word.choices.get(index)?;
        if choice.correct && answer.elapsed <= self.answer_window {
            Some(Outcome::Correct)
        } else {
            Some(Outcome::Incorrect)
        }
    }

    fn updates(
        &self,
        correct: &[RepetitionWord],
        incorrect: &[RepetitionWord],
        now: DateTime<Utc>,
    ) -> Vec<WordUpdate> {
        remediation_updates(self.kind().flag(), correct, incorrect, now)
    }

    fn feedback_timing(&self) -> FeedbackTiming {
        self.timing
    }
}
