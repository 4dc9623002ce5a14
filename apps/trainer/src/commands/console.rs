//! Line-based terminal input.

use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::time::Instant;

/// One line of learner input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Text(String),
    /// `:r` or its long form.
    Replay,
    /// `:q`, its long form, or end of input.
    Quit,
    /// The deadline passed before a line arrived.
    TimedOut,
}

impl Input {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            ":q" | ":quit" => Self::Quit,
            ":r" | ":replay" => Self::Replay,
            _ => Self::Text(line.trim().to_string()),
        }
    }
}

pub struct Console<R, W> {
    lines: Lines<R>,
    pub out: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(input: R, out: W) -> Self {
        Self {
            lines: input.lines(),
            out,
        }
    }

    /// Read the next line, giving up at `deadline` if one is set.
    pub async fn read(&mut self, deadline: Option<Instant>) -> io::Result<Input> {
        self.out.flush()?;
        let line = match deadline {
            Some(deadline) => {
                match tokio::time::timeout_at(deadline, self.lines.next_line()).await {
                    Ok(line) => line?,
                    Err(_) => return Ok(Input::TimedOut),
                }
            }
            None => self.lines.next_line().await?,
        };
        Ok(line.as_deref().map_or(Input::Quit, Input::parse))
    }
}
