//! Drill variants: answer judging and status updates per training mode.
//!
//! The session engine is the same for every drill. A variant only decides
//! whether an answer is right and which status changes a finished session
//! writes back.

pub mod listening;
pub mod repetition;
pub mod word_builder;

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::session::DrillWord;
use crate::status::StatusFlag;
use crate::types::{DrillKind, Outcome, WordUpdate};

pub use listening::Listening;
pub use repetition::{Choice, Repetition, RepetitionAnswer, RepetitionWord};
pub use word_builder::{LetterBuilder, LetterVerdict, WordBuilder, MAX_ATTEMPTS};

/// How long feedback stays up before the next word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackTiming {
    pub correct: Duration,
    pub incorrect: Duration,
}

impl Default for FeedbackTiming {
    fn default() -> Self {
        Self {
            correct: Duration::from_millis(1500),
            incorrect: Duration::from_millis(3000),
        }
    }
}

impl FeedbackTiming {
    pub fn delay_for(&self, outcome: Outcome) -> Duration {
        match outcome {
            Outcome::Correct | Outcome::Mistake => self.correct,
            Outcome::Incorrect => self.incorrect,
        }
    }
}

/// Strategy plugged into the session runner.
pub trait DrillVariant: Send + Sync + 'static {
    type Word: DrillWord;
    type Answer: Send + 'static;

    fn kind(&self) -> DrillKind;

    /// Judge an answer for `word`. `None` means the input is malformed and
    /// must not cause a transition.
    fn judge(&self, word: &Self::Word, answer: &Self::Answer) -> Option<Outcome>;

    /// Status changes to persist once the session is complete.
    fn updates(
        &self,
        correct: &[Self::Word],
        incorrect: &[Self::Word],
        now: DateTime<Utc>,
    ) -> Vec<WordUpdate>;

    fn feedback_timing(&self) -> FeedbackTiming {
        FeedbackTiming::default()
    }

    /// Text to speak when `word` is presented.
    fn prompt<'a>(&self, _word: &'a Self::Word) -> Option<&'a str> {
        None
    }
}

/// Updates for drills that only ever downgrade status: every word is
/// touched, failed words lose `flag`.
pub(crate) fn remediation_updates<W: DrillWord>(
    flag: StatusFlag,
    correct: &[W],
    incorrect: &[W],
    now: DateTime<Utc>,
) -> Vec<WordUpdate> {
    let touched = correct
        .iter()
        .map(|word| WordUpdate::touch(word.id().clone(), now));
    let reset = incorrect.iter().map(|word| {
        let record = word.record();
        WordUpdate::with_status(record.id.clone(), now, record.status.remove(flag))
    });
    touched.chain(reset).collect()
}
