//! Interactive drill sessions on the terminal.
//!
//! The session runner owns all state transitions. This module only renders
//! the published snapshots and turns learner input into answers.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use drill_core::{
    DrillError, DrillKind, DrillVariant, DrillWord, LetterBuilder, LetterVerdict, Listening,
    Outcome, Phase, Repetition, RepetitionAnswer, RepetitionWord, Selected, SessionReport,
    SessionRunner, SoundEffect, Speech, Storage, WordBuilder, WordRecord, WordResult,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::AsyncBufRead;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::info;

use super::console::{Console, Input};
use crate::audio::CommandSpeech;
use crate::config::TrainerConfig;

/// Distractor translations offered next to the right one.
const DISTRACTORS: usize = 1;

/// Everything a drill needs besides the terminal.
pub struct Drill<S, E> {
    pub storage: Arc<S>,
    pub speech: Arc<CommandSpeech>,
    pub effects: Arc<E>,
    pub config: TrainerConfig,
}

impl<S: Storage, E: SoundEffect> Drill<S, E> {
    /// Fetch words for `kind` and run one session against the console.
    pub async fn run<R, W>(&self, kind: DrillKind, console: &mut Console<R, W>) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let criteria = kind.criteria();
        let records = self
            .storage
            .fetch_drill_words(&criteria)
            .await
            .context("failed to load words")?;

        if records.len() < criteria.min_words {
            writeln!(
                console.out,
                "{} needs at least {} words without this drill passed, found {}",
                kind.as_str(),
                criteria.min_words,
                records.len()
            )?;
            return Ok(());
        }
        info!(drill = kind.as_str(), words = records.len(), "starting drill");

        match kind {
            DrillKind::Repetition => {
                let words =
                    RepetitionWord::with_choices(records, DISTRACTORS, &mut rand::thread_rng());
                let variant = Repetition {
                    answer_window: self.config.answer_window,
                    ..Repetition::default()
                };
                let mut prompt = ChoicePrompt {
                    window: variant.answer_window,
                };
                self.session(variant, words, &mut prompt, console).await
            }
            DrillKind::Listening => {
                let mut prompt = DictationPrompt {
                    speech: Arc::clone(&self.speech),
                };
                self.session(Listening, records, &mut prompt, console).await
            }
            DrillKind::WordBuilder => {
                let mut prompt = LetterPrompt {
                    rng: StdRng::from_entropy(),
                };
                self.session(WordBuilder, records, &mut prompt, console).await
            }
        }
    }

    async fn session<V, A, R, W>(
        &self,
        variant: V,
        words: Vec<V::Word>,
        prompt: &mut A,
        console: &mut Console<R, W>,
    ) -> anyhow::Result<()>
    where
        V: DrillVariant,
        A: Prompt<V>,
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let timing = self.config.feedback_timing(variant.feedback_timing());
        let runner = SessionRunner::new(variant, words, Arc::clone(&self.storage))?
            .with_speech(Arc::clone(&self.speech))
            .with_effects(Arc::clone(&self.effects))
            .with_timing(timing);
        let mut states = runner.subscribe();
        let (answers, rx) = mpsc::channel(1);
        let task = tokio::spawn(runner.run(rx));
        let mut shown = 0;

        loop {
            let state = states
                .wait_for(|s| {
                    s.is_complete() || (s.phase() == Phase::Presenting && s.presentations() > shown)
                })
                .await?
                .clone();
            let Some(word) = state.current() else {
                break;
            };
            shown = state.presentations();

            writeln!(console.out, "\n[{} left]", state.remaining())?;
            let Some(answer) = prompt.ask(word, console).await? else {
                drop(answers);
                return match task.await? {
                    Err(DrillError::Cancelled) => {
                        writeln!(console.out, "drill stopped, nothing saved")?;
                        Ok(())
                    }
                    other => other.map(|_| ()).map_err(Into::into),
                };
            };
            if answers.send(answer).await.is_err() {
                break;
            }

            let state = states
                .wait_for(|s| s.phase() != Phase::Presenting || s.presentations() > shown)
                .await?
                .clone();
            if let Some(selected) = state.last_answer() {
                show_feedback(&mut console.out, selected)?;
            }
        }

        drop(answers);
        let report = task.await??;
        let results = states.borrow().results();
        show_report(&mut console.out, &report, &results)?;
        Ok(())
    }
}

/// Turns learner input into one answer for the presented word.
///
/// `None` means the learner quit.
trait Prompt<V: DrillVariant> {
    async fn ask<R, W>(
        &mut self,
        word: &V::Word,
        console: &mut Console<R, W>,
    ) -> io::Result<Option<V::Answer>>
    where
        R: AsyncBufRead + Unpin,
        W: Write;
}

struct DictationPrompt {
    speech: Arc<CommandSpeech>,
}

impl Prompt<Listening> for DictationPrompt {
    async fn ask<R, W>(
        &mut self,
        word: &WordRecord,
        console: &mut Console<R, W>,
    ) -> io::Result<Option<String>>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        if self.speech.is_enabled() {
            writeln!(console.out, "Listen and type the word (:r to replay)")?;
        } else {
            writeln!(console.out, "Type the word for: {}", word.translation())?;
        }

        loop {
            match console.read(None).await? {
                Input::Quit => return Ok(None),
                Input::Replay => self.speech.speak(&word.word),
                Input::Text(text) if !text.is_empty() => return Ok(Some(text)),
                Input::Text(_) | Input::TimedOut => {}
            }
        }
    }
}

struct ChoicePrompt {
    window: Duration,
}

impl Prompt<Repetition> for ChoicePrompt {
    async fn ask<R, W>(
        &mut self,
        word: &RepetitionWord,
        console: &mut Console<R, W>,
    ) -> io::Result<Option<RepetitionAnswer>>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(console.out, "{}", word.record.word)?;
        for (index, choice) in word.choices.iter().enumerate() {
            writeln!(console.out, "  {}) {}", index + 1, choice.translation)?;
        }

        let started = Instant::now();
        let deadline = started + self.window;
        loop {
            match console.read(Some(deadline)).await? {
                Input::Quit => return Ok(None),
                Input::TimedOut => {
                    writeln!(console.out, "time is up")?;
                    return Ok(Some(RepetitionAnswer::timed_out(started.elapsed())));
                }
                Input::Replay => {}
                Input::Text(text) => match parse_choice(&text, word.choices.len()) {
                    Some(index) => {
                        return Ok(Some(RepetitionAnswer::picked(index, started.elapsed())))
                    }
                    None => writeln!(console.out, "pick 1-{}", word.choices.len())?,
                },
            }
        }
    }
}

/// One-based option number to index.
fn parse_choice(text: &str, options: usize) -> Option<usize> {
    let number: usize = text.trim().parse().ok()?;
    (1..=options).contains(&number).then(|| number - 1)
}

struct LetterPrompt {
    rng: StdRng,
}

impl Prompt<WordBuilder> for LetterPrompt {
    async fn ask<R, W>(
        &mut self,
        word: &WordRecord,
        console: &mut Console<R, W>,
    ) -> io::Result<Option<Outcome>>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut builder = LetterBuilder::shuffled(&word.word, &mut self.rng);
        writeln!(console.out, "Build the word for: {}", word.translation())?;

        loop {
            let pool: String = builder.remaining_letters().into_iter().collect();
            writeln!(console.out, "{}_ [{}]", builder.assembled(), pool)?;

            let text = match console.read(None).await? {
                Input::Quit => return Ok(None),
                Input::Text(text) => text,
                Input::Replay | Input::TimedOut => continue,
            };
            for letter in text.chars() {
                match builder.offer(letter) {
                    LetterVerdict::Accepted => {}
                    LetterVerdict::Rejected { attempts_left } => {
                        writeln!(
                            console.out,
                            "'{letter}' does not fit, {attempts_left} attempts left"
                        )?;
                        break;
                    }
                    LetterVerdict::Finished(outcome) => return Ok(Some(outcome)),
                    LetterVerdict::Ignored => break,
                }
            }
        }
    }
}

fn show_feedback<W: Write>(out: &mut W, selected: &Selected) -> io::Result<()> {
    let verdict = match selected.outcome {
        Outcome::Correct => "correct",
        Outcome::Mistake => "correct, with mistakes",
        Outcome::Incorrect => "incorrect",
    };
    writeln!(out, "{verdict}: {} = {}", selected.word, selected.translation)
}

fn show_report<W, T>(
    out: &mut W,
    report: &SessionReport<T>,
    results: &[WordResult<T>],
) -> io::Result<()>
where
    W: Write,
    T: DrillWord,
{
    writeln!(
        out,
        "\n{} correct, {} to repeat, {} answers",
        report.correct.len(),
        report.incorrect.len(),
        report.presentations
    )?;
    for result in results {
        let mark = if result.status.done { "+" } else { "-" };
        let record = result.word.record();
        writeln!(out, "  {mark} {} = {}", record.word, record.translation())?;
    }
    if let Some(err) = &report.save_error {
        writeln!(out, "progress was not saved: {err}")?;
    }
    Ok(())
}
