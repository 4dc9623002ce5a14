//! Word fixtures.

use chrono::{DateTime, TimeZone, Utc};
use drill_core::{Status, WordId, WordRecord};

pub fn created_at() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
}

/// Record whose id and word are both `word`.
pub fn word(word: &str) -> WordRecord {
    WordRecord::new(WordId::from(word), word, &format!("{word} (translation)"), created_at())
}

pub fn word_with_status(word_text: &str, status: Status) -> WordRecord {
    let mut record = word(word_text);
    record.status = status;
    record
}

pub fn words(list: &[&str]) -> Vec<WordRecord> {
    list.iter().map(|w| word(w)).collect()
}

pub fn ids(records: &[WordRecord]) -> Vec<String> {
    records.iter().map(|r| r.id.to_string()).collect()
}
