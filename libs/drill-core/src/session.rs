//! Queue-based drill session state machine.
//!
//! A session walks a fixed word list front to back. Each answer moves the
//! session into `Feedback`; [`DrillSession::advance`] then pulls the next word
//! off the queue. Words answered incorrectly go to the back of the queue and
//! stay marked as incorrect for the rest of the session, even if a later
//! retry succeeds.
//!
//! Transitions never mutate the receiver. `submit` and `advance` return the
//! next snapshot, so every published state can be inspected on its own.

use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;

use serde::Serialize;

use crate::error::{DrillError, Result};
use crate::status::StatusClass;
use crate::types::{Outcome, Selected, WordId, WordRecord};

/// A word as seen by the session engine.
pub trait DrillWord: Clone + Send + Sync + 'static {
    fn record(&self) -> &WordRecord;

    fn id(&self) -> &WordId {
        &self.record().id
    }
}

impl DrillWord for WordRecord {
    fn record(&self) -> &WordRecord {
        self
    }
}

/// Session phase derived from `current` and `selected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Presenting,
    Feedback,
    Complete,
}

/// Per-word line of the result list.
#[derive(Debug, Clone)]
pub struct WordResult<W> {
    pub word: W,
    pub status: StatusClass,
}

/// Snapshot of one drill run.
#[derive(Debug, Clone)]
pub struct DrillSession<W> {
    words: Arc<[W]>,
    queue: VecDeque<W>,
    current: Option<W>,
    selected: Option<Selected>,
    /// Most recent feedback, kept after the session moves on.
    last_answer: Option<Selected>,
    incorrect_ids: BTreeSet<WordId>,
    presentations: usize,
}

impl<W: DrillWord> DrillSession<W> {
    /// Start a session presenting the first word.
    pub fn new(words: Vec<W>) -> Result<Self> {
        let mut queue: VecDeque<W> = words.iter().cloned().collect();
        let current = queue.pop_front().ok_or(DrillError::EmptySession)?;

        Ok(Self {
            words: words.into(),
            queue,
            current: Some(current),
            selected: None,
            last_answer: None,
            incorrect_ids: BTreeSet::new(),
            presentations: 1,
        })
    }

    pub fn phase(&self) -> Phase {
        match (&self.current, &self.selected) {
            (_, Some(_)) => Phase::Feedback,
            (Some(_), None) => Phase::Presenting,
            (None, None) => Phase::Complete,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase() == Phase::Complete
    }

    pub fn words(&self) -> &[W] {
        &self.words
    }

    pub fn queue(&self) -> &VecDeque<W> {
        &self.queue
    }

    pub fn current(&self) -> Option<&W> {
        self.current.as_ref()
    }

    pub fn selected(&self) -> Option<&Selected> {
        self.selected.as_ref()
    }

    /// Feedback for the latest answer, still set once the next word is up.
    pub fn last_answer(&self) -> Option<&Selected> {
        self.last_answer.as_ref()
    }

    pub fn incorrect_ids(&self) -> &BTreeSet<WordId> {
        &self.incorrect_ids
    }

    /// How many times a word has been made current, retries included.
    pub fn presentations(&self) -> usize {
        self.presentations
    }

    /// Answers still needed before the session completes.
    ///
    /// A word under feedback is already resolved; its retry copy, if any, is
    /// counted in the queue.
    pub fn remaining(&self) -> usize {
        let awaiting = usize::from(self.current.is_some() && self.selected.is_none());
        self.queue.len() + awaiting
    }

    /// Record an answer for the current word.
    ///
    /// Returns `None` when no answer is expected: during feedback, or once
    /// the session is complete.
    pub fn submit(&self, outcome: Outcome) -> Option<Self> {
        if self.selected.is_some() {
            return None;
        }
        let current = self.current.as_ref()?;

        let mut next = self.clone();
        if outcome.marks_incorrect() {
            next.incorrect_ids.insert(current.id().clone());
        }
        if outcome.requeues() {
            next.queue.push_back(current.clone());
        }

        let record = current.record();
        let selected = Selected {
            outcome,
            word: record.word.clone(),
            translation: record.translation(),
        };
        next.last_answer = Some(selected.clone());
        next.selected = Some(selected);
        Some(next)
    }

    /// Leave feedback and present the next queued word.
    ///
    /// Returns `None` outside of the feedback phase.
    pub fn advance(&self) -> Option<Self> {
        self.selected.as_ref()?;

        let mut next = self.clone();
        next.selected = None;
        next.current = next.queue.pop_front();
        if next.current.is_some() {
            next.presentations += 1;
        }
        Some(next)
    }

    /// Split the session's words into (correct, incorrect), keeping order.
    pub fn partition(&self) -> (Vec<W>, Vec<W>) {
        self.words
            .iter()
            .cloned()
            .partition(|word| !self.incorrect_ids.contains(word.id()))
    }

    /// Status of every session word for the result list.
    pub fn results(&self) -> Vec<WordResult<W>> {
        self.words
            .iter()
            .map(|word| {
                let failed = self.incorrect_ids.contains(word.id());
                WordResult {
                    word: word.clone(),
                    status: StatusClass {
                        new: false,
                        done: !failed,
                        in_progress: failed,
                    },
                }
            })
            .collect()
    }
}
