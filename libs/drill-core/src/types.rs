//! Core types for vocabulary drills.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::matching::normalize_term;
use crate::status::{Status, StatusFlag};

/// Opaque word identifier assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordId(String);

impl WordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One vocabulary entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordRecord {
    pub id: WordId,
    pub word: String,
    pub translations: Vec<String>,
    pub status: Status,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl WordRecord {
    /// Create a fresh record with a single translation.
    ///
    /// Both the word and the translation are trimmed and lower-cased. An empty
    /// translation leaves the list empty, which keeps the record out of drills.
    pub fn new(id: WordId, word: &str, translation: &str, now: DateTime<Utc>) -> Self {
        let mut record = Self {
            id,
            word: normalize_term(word),
            translations: Vec::new(),
            status: Status::NEW,
            created_at: now,
            updated_at: now,
        };
        record.add_translation(translation);
        record
    }

    /// Append a translation unless it is empty or already present.
    ///
    /// Returns whether the translation list changed.
    pub fn add_translation(&mut self, translation: &str) -> bool {
        let translation = normalize_term(translation);
        if translation.is_empty() || self.translations.contains(&translation) {
            return false;
        }
        self.translations.push(translation);
        true
    }

    /// All translations joined for display.
    pub fn translation(&self) -> String {
        self.translations.join("; ")
    }

    pub fn is_drillable(&self) -> bool {
        !self.translations.is_empty()
    }

    /// Apply a storage update to this copy.
    pub fn apply(&mut self, update: &WordUpdate) {
        self.updated_at = update.updated_at;
        if let Some(status) = update.status {
            self.status = status;
        }
    }
}

/// Batched change written back to storage when a session completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordUpdate {
    pub id: WordId,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl WordUpdate {
    /// Update that only records the drill time.
    pub fn touch(id: WordId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            updated_at: now,
            status: None,
        }
    }

    pub fn with_status(id: WordId, now: DateTime<Utc>, status: Status) -> Self {
        Self {
            id,
            updated_at: now,
            status: Some(status),
        }
    }
}

/// Training modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillKind {
    Repetition,
    Listening,
    WordBuilder,
}

impl DrillKind {
    /// The status bit this drill owns.
    pub fn flag(self) -> StatusFlag {
        match self {
            Self::Repetition => StatusFlag::Repetition,
            Self::Listening => StatusFlag::Listening,
            Self::WordBuilder => StatusFlag::WordBuilder,
        }
    }

    /// Default word selection for this drill.
    pub fn criteria(self) -> DrillCriteria {
        match self {
            Self::Repetition => DrillCriteria {
                exclude: self.flag(),
                limit: 60,
                min_words: 10,
            },
            Self::Listening => DrillCriteria {
                exclude: self.flag(),
                limit: 60,
                min_words: 1,
            },
            Self::WordBuilder => DrillCriteria {
                exclude: self.flag(),
                limit: 10,
                min_words: 1,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Repetition => "repetition",
            Self::Listening => "listening",
            Self::WordBuilder => "word_builder",
        }
    }

    /// Parse from string. Accepts both `word_builder` and `word-builder`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "repetition" => Some(Self::Repetition),
            "listening" => Some(Self::Listening),
            "word_builder" | "word-builder" => Some(Self::WordBuilder),
            _ => None,
        }
    }
}

/// Which words storage should hand to a drill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillCriteria {
    /// Words that already carry this flag are skipped.
    pub exclude: StatusFlag,
    /// Maximum words per session, least recently drilled first.
    pub limit: usize,
    /// Fewer eligible words than this and the drill should not start.
    pub min_words: usize,
}

/// Result of judging one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    Incorrect,
    /// Solved, but only after wrong attempts.
    Mistake,
}

impl Outcome {
    /// Whether the word counts as failed for this session's status update.
    pub fn marks_incorrect(self) -> bool {
        !matches!(self, Self::Correct)
    }

    /// Whether the word has to be asked again.
    pub fn requeues(self) -> bool {
        matches!(self, Self::Incorrect)
    }

    pub fn cue(self) -> Cue {
        match self {
            Self::Correct | Self::Mistake => Cue::Correct,
            Self::Incorrect => Cue::Incorrect,
        }
    }
}

/// Audio cue names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    Correct,
    Incorrect,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Incorrect => "incorrect",
        }
    }
}

/// Feedback shown between an answer and the next word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selected {
    pub outcome: Outcome,
    pub word: String,
    pub translation: String,
}
