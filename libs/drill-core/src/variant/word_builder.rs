//! Letter-assembly drill.
//!
//! The learner rebuilds the word from a shuffled pool, one letter at a time.
//! A letter is accepted only if the assembled prefix still matches the word.
//! Finishing without a wrong letter is correct. Any wrong letter makes the
//! word a mistake; the fourth one auto-completes it.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use super::DrillVariant;
use crate::matching::is_prefix_of;
use crate::session::DrillWord;
use crate::types::{DrillKind, Outcome, WordRecord, WordUpdate};

/// Wrong letters allowed per word.
pub const MAX_ATTEMPTS: u8 = 4;

/// Response to one offered letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterVerdict {
    Accepted,
    Rejected { attempts_left: u8 },
    /// The word is finished; the outcome goes to the session.
    Finished(Outcome),
    /// The word was already finished.
    Ignored,
}

/// Incremental judge for one word.
#[derive(Debug, Clone)]
pub struct LetterBuilder {
    target: String,
    assembled: String,
    pool: Vec<char>,
    attempts_left: u8,
    mistakes: u8,
    outcome: Option<Outcome>,
}

impl LetterBuilder {
    pub fn new(word: &str) -> Self {
        let target = word.trim().to_lowercase();
        let pool = target.chars().collect();
        Self {
            target,
            assembled: String::new(),
            pool,
            attempts_left: MAX_ATTEMPTS,
            mistakes: 0,
            outcome: None,
        }
    }

    /// Same as [`LetterBuilder::new`] with the letter pool shuffled.
    pub fn shuffled<R: Rng + ?Sized>(word: &str, rng: &mut R) -> Self {
        let mut builder = Self::new(word);
        builder.pool.shuffle(rng);
        builder
    }

    pub fn offer(&mut self, letter: char) -> LetterVerdict {
        if self.outcome.is_some() || self.assembled.chars().count() >= self.pool.len() {
            return LetterVerdict::Ignored;
        }

        let mut candidate = self.assembled.clone();
        candidate.extend(letter.to_lowercase());

        if is_prefix_of(&candidate, &self.target) {
            self.assembled = candidate;
            if self.assembled == self.target {
                let outcome = if self.mistakes == 0 {
                    Outcome::Correct
                } else {
                    Outcome::Mistake
                };
                self.outcome = Some(outcome);
                return LetterVerdict::Finished(outcome);
            }
            return LetterVerdict::Accepted;
        }

        self.mistakes += 1;
        self.attempts_left = self.attempts_left.saturating_sub(1);
        if self.attempts_left == 0 {
            self.assembled = self.target.clone();
            self.outcome = Some(Outcome::Mistake);
            return LetterVerdict::Finished(Outcome::Mistake);
        }
        LetterVerdict::Rejected {
            attempts_left: self.attempts_left,
        }
    }

    pub fn assembled(&self) -> &str {
        &self.assembled
    }

    /// Pool letters not yet placed, in pool order.
    pub fn remaining_letters(&self) -> Vec<char> {
        let mut placed: Vec<char> = self.assembled.chars().collect();
        self.pool
            .iter()
            .filter(|letter| match placed.iter().position(|p| p == *letter) {
                Some(index) => {
                    placed.swap_remove(index);
                    false
                }
                None => true,
            })
            .copied()
            .collect()
    }

    pub fn attempts_left(&self) -> u8 {
        self.attempts_left
    }

    pub fn mistakes(&self) -> u8 {
        self.mistakes
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }
}

/// The graduation drill: the only one that adds its status flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordBuilder;

impl DrillVariant for WordBuilder {
    type Word = WordRecord;
    /// Outcome reported by a finished [`LetterBuilder`]. The host drives the
    /// builder for the presented word, so the builder is the judge here.
    type Answer = Outcome;

    fn kind(&self) -> DrillKind {
        DrillKind::WordBuilder
    }

    /// Passes the builder's outcome through; the word was already checked
    /// letter by letter.
    fn judge(&self, _word: &WordRecord, answer: &Outcome) -> Option<Outcome> {
        Some(*answer)
    }

    fn updates(
        &self,
        correct: &[WordRecord],
        incorrect: &[WordRecord],
        now: DateTime<Utc>,
    ) -> Vec<WordUpdate> {
        let flag = self.kind().flag();
        let graduated = correct.iter().map(|word| {
            WordUpdate::with_status(word.id().clone(), now, word.status.add(flag))
        });
        let touched = incorrect
            .iter()
            .map(|word| WordUpdate::touch(word.id().clone(), now));
        graduated.chain(touched).collect()
    }
}
