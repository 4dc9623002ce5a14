//! Collaborators the drill engine talks to: storage, speech, sound cues and
//! the clock.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::{EffectError, StorageError};
use crate::types::{Cue, DrillCriteria, WordRecord, WordUpdate};

/// Word persistence.
pub trait Storage: Send + Sync + 'static {
    /// Words eligible for a drill, least recently drilled first.
    fn fetch_drill_words(
        &self,
        criteria: &DrillCriteria,
    ) -> impl Future<Output = Result<Vec<WordRecord>, StorageError>> + Send;

    /// Apply all updates or none of them.
    fn batch_update(
        &self,
        updates: Vec<WordUpdate>,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Text-to-speech. Fire and forget.
pub trait Speech: Send + Sync + 'static {
    fn speak(&self, text: &str);
}

/// Audio cue playback.
pub trait SoundEffect: Send + Sync + 'static {
    fn play_effect(&self, cue: Cue) -> impl Future<Output = Result<(), EffectError>> + Send;
}

/// Time source for timestamps and feedback delays.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Wall clock backed by tokio timers. Honors `tokio::time::pause`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

/// Speech and sound stand-in for hosts without audio.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Speech for Silent {
    fn speak(&self, _text: &str) {}
}

impl SoundEffect for Silent {
    async fn play_effect(&self, _cue: Cue) -> Result<(), EffectError> {
        Ok(())
    }
}
