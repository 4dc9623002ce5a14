//! Word list maintenance commands.

use std::io::Write;

use chrono::{DateTime, Utc};
use drill_core::WordRecord;

use crate::db::{AddedWord, WordRepository};

/// Add a word, or a new translation to an existing word.
pub fn add<D, W>(
    db: &D,
    out: &mut W,
    word: &str,
    translation: &str,
    now: DateTime<Utc>,
) -> anyhow::Result<()>
where
    D: WordRepository,
    W: Write,
{
    match db.add_word(word, translation, now)? {
        AddedWord::Created(record) => writeln!(out, "added {}", describe(&record))?,
        AddedWord::TranslationAdded(record) => {
            writeln!(out, "updated {}", describe(&record))?
        }
        AddedWord::AlreadyKnown(record) => {
            writeln!(out, "already known: {}", describe(&record))?
        }
    }
    Ok(())
}

/// Print the newest words with their drill progress.
pub fn list<D, W>(db: &D, out: &mut W, limit: Option<usize>) -> anyhow::Result<()>
where
    D: WordRepository,
    W: Write,
{
    let words = db.list_words(limit)?;
    for record in &words {
        writeln!(
            out,
            "{} {:<11} {}",
            record.status.binary(),
            progress(record),
            describe(record)
        )?;
    }
    writeln!(out, "{} of {} words", words.len(), db.count_words()?)?;
    Ok(())
}

fn describe(record: &WordRecord) -> String {
    format!("{} = {}", record.word, record.translation())
}

fn progress(record: &WordRecord) -> &'static str {
    let class = record.status.classify();
    if class.new {
        "new"
    } else if class.done {
        "done"
    } else {
        "in progress"
    }
}
