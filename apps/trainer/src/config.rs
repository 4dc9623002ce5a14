//! Runtime configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use drill_core::FeedbackTiming;
use thiserror::Error;

const DEFAULT_ANSWER_WINDOW_MS: u64 = 4000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainerConfig {
    pub db_path: PathBuf,
    /// External text-to-speech program, called with the text as its argument.
    pub speech_command: Option<String>,
    pub answer_window: Duration,
    pub feedback_correct: Option<Duration>,
    pub feedback_incorrect: Option<Duration>,
}

impl TrainerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("TRAINER_DB_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);
        let speech_command = lookup("TRAINER_SPEECH_COMMAND").filter(|cmd| !cmd.trim().is_empty());
        let answer_window = millis(&lookup, "TRAINER_ANSWER_WINDOW_MS")?
            .unwrap_or(Duration::from_millis(DEFAULT_ANSWER_WINDOW_MS));

        Ok(Self {
            db_path,
            speech_command,
            answer_window,
            feedback_correct: millis(&lookup, "TRAINER_FEEDBACK_CORRECT_MS")?,
            feedback_incorrect: millis(&lookup, "TRAINER_FEEDBACK_INCORRECT_MS")?,
        })
    }

    /// Apply the configured feedback overrides on top of a drill's defaults.
    pub fn feedback_timing(&self, defaults: FeedbackTiming) -> FeedbackTiming {
        FeedbackTiming {
            correct: self.feedback_correct.unwrap_or(defaults.correct),
            incorrect: self.feedback_incorrect.unwrap_or(defaults.incorrect),
        }
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vocab-trainer")
        .join("words.db")
}

fn millis<F>(lookup: &F, var: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(var) else {
        return Ok(None);
    };
    value
        .trim()
        .parse::<u64>()
        .map(|ms| Some(Duration::from_millis(ms)))
        .map_err(|_| ConfigError::Invalid { var, value })
}
