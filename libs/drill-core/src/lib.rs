//! Core vocabulary drill library.
//!
//! Provides:
//! - Per-word learning status bitmask
//! - Word records and their lifecycle
//! - The queue-based drill session state machine
//! - Drill variants (repetition, listening, word builder)
//! - An async runner that sequences sessions in time

pub mod collab;
pub mod error;
pub mod matching;
pub mod runner;
pub mod session;
pub mod status;
pub mod storage;
pub mod types;
pub mod variant;

pub use collab::{Clock, Silent, SoundEffect, Speech, Storage, SystemClock};
pub use error::{DrillError, EffectError, Result, StorageError};
pub use matching::{answers_match, normalize_term};
pub use runner::{SessionReport, SessionRunner};
pub use session::{DrillSession, DrillWord, Phase, WordResult};
pub use status::{Status, StatusClass, StatusFlag};
pub use storage::MemoryStorage;
pub use types::{Cue, DrillCriteria, DrillKind, Outcome, Selected, WordId, WordRecord, WordUpdate};
pub use variant::{
    Choice, DrillVariant, FeedbackTiming, LetterBuilder, LetterVerdict, Listening, Repetition,
    RepetitionAnswer, RepetitionWord, WordBuilder, MAX_ATTEMPTS,
};
