//! Async driver that sequences a drill session in time.
//!
//! The runner owns the session and serializes every transition. Answers
//! arrive on an mpsc channel; each new snapshot is published on a watch
//! channel. After an answer the feedback snapshot stays up for the variant's
//! delay, then the next word is presented. Answers received meanwhile are
//! dropped. Dropping the answer sender cancels the session without saving.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::collab::{Clock, Silent, SoundEffect, Speech, Storage, SystemClock};
use crate::error::{DrillError, Result, StorageError};
use crate::session::{DrillSession, DrillWord, Phase};
use crate::types::Cue;
use crate::variant::{DrillVariant, FeedbackTiming};

/// What a finished session produced.
#[derive(Debug)]
pub struct SessionReport<W> {
    pub correct: Vec<W>,
    pub incorrect: Vec<W>,
    pub presentations: usize,
    /// Set when the progress could not be written back. The results above
    /// are still valid.
    pub save_error: Option<StorageError>,
}

impl<W> SessionReport<W> {
    pub fn saved(&self) -> bool {
        self.save_error.is_none()
    }
}

/// One drill run bound to its collaborators.
pub struct SessionRunner<V: DrillVariant, S, E = Silent, P = Silent, C = SystemClock> {
    variant: V,
    storage: Arc<S>,
    effects: Arc<E>,
    speech: Arc<P>,
    clock: C,
    timing: FeedbackTiming,
    session: DrillSession<V::Word>,
    states: watch::Sender<DrillSession<V::Word>>,
}

impl<V: DrillVariant, S: Storage> SessionRunner<V, S> {
    /// Create a runner presenting the first of `words`.
    pub fn new(variant: V, words: Vec<V::Word>, storage: Arc<S>) -> Result<Self> {
        let session = DrillSession::new(words)?;
        let (states, _) = watch::channel(session.clone());
        let timing = variant.feedback_timing();

        Ok(Self {
            variant,
            storage,
            effects: Arc::new(Silent),
            speech: Arc::new(Silent),
            clock: SystemClock,
            timing,
            session,
            states,
        })
    }
}

impl<V, S, E, P, C> SessionRunner<V, S, E, P, C>
where
    V: DrillVariant,
    S: Storage,
    E: SoundEffect,
    P: Speech,
    C: Clock,
{
    pub fn with_effects<E2: SoundEffect>(self, effects: Arc<E2>) -> SessionRunner<V, S, E2, P, C> {
        SessionRunner {
            variant: self.variant,
            storage: self.storage,
            effects,
            speech: self.speech,
            clock: self.clock,
            timing: self.timing,
            session: self.session,
            states: self.states,
        }
    }

    pub fn with_speech<P2: Speech>(self, speech: Arc<P2>) -> SessionRunner<V, S, E, P2, C> {
        SessionRunner {
            variant: self.variant,
            storage: self.storage,
            effects: self.effects,
            speech,
            clock: self.clock,
            timing: self.timing,
            session: self.session,
            states: self.states,
        }
    }

    pub fn with_clock<C2: Clock>(self, clock: C2) -> SessionRunner<V, S, E, P, C2> {
        SessionRunner {
            variant: self.variant,
            storage: self.storage,
            effects: self.effects,
            speech: self.speech,
            clock,
            timing: self.timing,
            session: self.session,
            states: self.states,
        }
    }

    /// Override the variant's feedback delays.
    pub fn with_timing(mut self, timing: FeedbackTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Stream of session snapshots, starting with the current one.
    pub fn subscribe(&self) -> watch::Receiver<DrillSession<V::Word>> {
        self.states.subscribe()
    }

    /// Drive the session until it completes or the answer sender is dropped.
    pub async fn run(
        mut self,
        mut answers: mpsc::Receiver<V::Answer>,
    ) -> Result<SessionReport<V::Word>> {
        let drill = self.variant.kind().as_str();
        info!(drill, words = self.session.words().len(), "drill session started");
        self.speak_prompt();

        while !self.session.is_complete() {
            let Some(answer) = answers.recv().await else {
                info!(drill, "drill session cancelled");
                return Err(DrillError::Cancelled);
            };

            let Some(current) = self.session.current() else {
                break;
            };
            let Some(outcome) = self.variant.judge(current, &answer) else {
                debug!(drill, "ignoring malformed answer");
                continue;
            };
            debug!(drill, word = %current.id(), ?outcome, "answer judged");

            let Some(feedback) = self.session.submit(outcome) else {
                continue;
            };
            self.publish(feedback);
            self.play_cue(outcome.cue());

            self.hold_feedback(self.timing.delay_for(outcome), &mut answers)
                .await?;

            if let Some(next) = self.session.advance() {
                self.publish(next);
                self.speak_prompt();
            }
        }

        Ok(self.finish().await)
    }

    fn publish(&mut self, session: DrillSession<V::Word>) {
        self.session = session.clone();
        self.states.send_replace(session);
    }

    fn speak_prompt(&self) {
        if self.session.phase() != Phase::Presenting {
            return;
        }
        if let Some(text) = self.session.current().and_then(|w| self.variant.prompt(w)) {
            self.speech.speak(text);
        }
    }

    fn play_cue(&self, cue: Cue) {
        let effects = Arc::clone(&self.effects);
        tokio::spawn(async move {
            if let Err(err) = effects.play_effect(cue).await {
                debug!(cue = cue.as_str(), error = %err, "sound effect failed");
            }
        });
    }

    /// Wait out the feedback delay, discarding answers that arrive meanwhile.
    async fn hold_feedback(
        &self,
        delay: Duration,
        answers: &mut mpsc::Receiver<V::Answer>,
    ) -> Result<()> {
        let sleep = self.clock.sleep(delay);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                _ = &mut sleep => return Ok(()),
                answer = answers.recv() => match answer {
                    Some(_) => debug!("answer ignored during feedback"),
                    None => return Err(DrillError::Cancelled),
                },
            }
        }
    }

    async fn finish(self) -> SessionReport<V::Word> {
        let drill = self.variant.kind().as_str();
        let (correct, incorrect) = self.session.partition();
        let updates = self.variant.updates(&correct, &incorrect, self.clock.now());

        let save_error = match self.storage.batch_update(updates).await {
            Ok(()) => {
                info!(
                    drill,
                    correct = correct.len(),
                    incorrect = incorrect.len(),
                    "drill session saved"
                );
                None
            }
            Err(err) => {
                warn!(drill, error = %err, "failed to save drill progress");
                Some(err)
            }
        };

        SessionReport {
            correct,
            incorrect,
            presentations: self.session.presentations(),
            save_error,
        }
    }
}
