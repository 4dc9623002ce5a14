//! Shared fixtures for runner integration tests.
//!
//! Tests run with `tokio::time::pause`, so feedback delays elapse as soon as
//! every task is idle.

pub mod fixtures;

use std::sync::Mutex;

use drill_core::{
    Cue, DrillCriteria, DrillSession, DrillWord, EffectError, Phase, SoundEffect, Speech, Storage,
    StorageError, WordId, WordRecord, WordUpdate,
};
use tokio::sync::watch;

/// Records every cue it is asked to play.
#[derive(Debug, Default)]
pub struct RecordingEffects {
    cues: Mutex<Vec<Cue>>,
}

impl RecordingEffects {
    pub fn cues(&self) -> Vec<Cue> {
        self.cues.lock().unwrap().clone()
    }
}

impl SoundEffect for RecordingEffects {
    async fn play_effect(&self, cue: Cue) -> Result<(), EffectError> {
        self.cues.lock().unwrap().push(cue);
        Ok(())
    }
}

/// Sound device that is always unavailable.
#[derive(Debug, Default)]
pub struct BrokenEffects;

impl SoundEffect for BrokenEffects {
    async fn play_effect(&self, _cue: Cue) -> Result<(), EffectError> {
        Err(EffectError("no audio device".to_string()))
    }
}

/// Records every text it is asked to speak.
#[derive(Debug, Default)]
pub struct RecordingSpeech {
    spoken: Mutex<Vec<String>>,
}

impl RecordingSpeech {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

impl Speech for RecordingSpeech {
    fn speak(&self, text: &str) {
        self.spoken.lock().unwrap().push(text.to_string());
    }
}

/// Storage whose writes always fail.
#[derive(Debug, Default)]
pub struct FailingStorage;

impl Storage for FailingStorage {
    async fn fetch_drill_words(
        &self,
        _criteria: &DrillCriteria,
    ) -> Result<Vec<WordRecord>, StorageError> {
        Ok(Vec::new())
    }

    async fn batch_update(&self, _updates: Vec<WordUpdate>) -> Result<(), StorageError> {
        Err(StorageError::Backend("connection reset".to_string()))
    }
}

/// Wait until the `n`th presentation and return the presented word's id.
pub async fn presented<W: DrillWord>(
    states: &mut watch::Receiver<DrillSession<W>>,
    n: usize,
) -> WordId {
    let state = states
        .wait_for(|s| s.phase() == Phase::Presenting && s.presentations() == n)
        .await
        .expect("runner dropped before presenting");
    state.current().expect("presenting a word").id().clone()
}

/// Wait until the session shows feedback.
pub async fn feedback<W: DrillWord>(states: &mut watch::Receiver<DrillSession<W>>) {
    states
        .wait_for(|s| s.phase() == Phase::Feedback)
        .await
        .expect("runner dropped before feedback");
}
