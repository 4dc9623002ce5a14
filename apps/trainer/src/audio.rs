//! Terminal speech and sound collaborators.

use std::io::Write;
use std::process::Stdio;

use drill_core::{Cue, EffectError, SoundEffect, Speech};
use tracing::{debug, warn};

/// Speaks through an external program such as `espeak`, called with the text
/// as its only argument. Without a program nothing is spoken.
#[derive(Debug, Clone, Default)]
pub struct CommandSpeech {
    program: Option<String>,
}

impl CommandSpeech {
    pub fn new(program: Option<String>) -> Self {
        Self { program }
    }

    pub fn is_enabled(&self) -> bool {
        self.program.is_some()
    }
}

impl Speech for CommandSpeech {
    fn speak(&self, text: &str) {
        let Some(program) = &self.program else {
            return;
        };
        // The child is reaped by tokio once dropped.
        let spawned = tokio::process::Command::new(program)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(_) => debug!(program, "speech started"),
            Err(err) => warn!(program, error = %err, "failed to start speech program"),
        }
    }
}

/// Rings the terminal bell on incorrect answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl SoundEffect for TerminalBell {
    async fn play_effect(&self, cue: Cue) -> Result<(), EffectError> {
        if cue == Cue::Correct {
            return Ok(());
        }
        let mut stderr = std::io::stderr();
        stderr
            .write_all(b"\x07")
            .and_then(|()| stderr.flush())
            .map_err(|e| EffectError(e.to_string()))
    }
}
