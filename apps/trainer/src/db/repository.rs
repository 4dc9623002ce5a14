//! Repository pattern for database access.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use drill_core::{
    normalize_term, DrillCriteria, Status, Storage, StorageError, WordId, WordRecord, WordUpdate,
};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::error::DbError;
use crate::db::schema::{SCHEMA, SCHEMA_VERSION};

type Result<T> = std::result::Result<T, DbError>;

const WORD_COLUMNS: &str = "id, word, translations, status, created_at, updated_at";

/// What `add_word` did with the submitted pair.
#[derive(Debug, Clone, PartialEq)]
pub enum AddedWord {
    Created(WordRecord),
    /// The word existed and gained a new translation.
    TranslationAdded(WordRecord),
    /// The word already had this translation.
    AlreadyKnown(WordRecord),
}

impl AddedWord {
    pub fn record(&self) -> &WordRecord {
        match self {
            Self::Created(r) | Self::TranslationAdded(r) | Self::AlreadyKnown(r) => r,
        }
    }
}

/// Repository for word list maintenance.
pub trait WordRepository {
    fn add_word(&self, word: &str, translation: &str, now: DateTime<Utc>) -> Result<AddedWord>;
    fn get_word(&self, id: &WordId) -> Result<Option<WordRecord>>;
    /// Newest words first.
    fn list_words(&self, limit: Option<usize>) -> Result<Vec<WordRecord>>;
    fn count_words(&self) -> Result<usize>;
}

/// SQLite-backed word store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

/// Raw column values of a `words` row.
struct WordRow {
    id: String,
    word: String,
    translations: String,
    status: u32,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<WordRow> for WordRecord {
    type Error = DbError;

    fn try_from(row: WordRow) -> Result<Self> {
        Ok(Self {
            translations: serde_json::from_str(&row.translations)?,
            status: Status::from_bits(row.status),
            created_at: timestamp(row.created_at)?,
            updated_at: timestamp(row.updated_at)?,
            id: WordId::new(row.id),
            word: row.word,
        })
    }
}

fn timestamp(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| DbError::InvalidData(format!("timestamp out of range: {millis}")))
}

impl SqliteStore {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::initialize(Connection::open(path)?)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        conn.execute(
            "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::LockPoisoned)
    }

    fn row_to_word(row: &rusqlite::Row) -> rusqlite::Result<WordRow> {
        Ok(WordRow {
            id: row.get(0)?,
            word: row.get(1)?,
            translations: row.get(2)?,
            status: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    fn query_words<P: rusqlite::Params>(
        conn: &Connection,
        sql: &str,
        params: P,
    ) -> Result<Vec<WordRecord>> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, Self::row_to_word)?;
        let words = rows.map(|row| WordRecord::try_from(row?)).collect();
        words
    }

    fn find_by_word(conn: &Connection, word: &str) -> Result<Option<WordRecord>> {
        conn.query_row(
            &format!("SELECT {WORD_COLUMNS} FROM words WHERE word = ?1"),
            params![word],
            Self::row_to_word,
        )
        .optional()?
        .map(WordRecord::try_from)
        .transpose()
    }

    fn insert(conn: &Connection, record: &WordRecord) -> Result<()> {
        conn.execute(
            &format!("INSERT INTO words ({WORD_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
            params![
                record.id.as_str(),
                record.word,
                serde_json::to_string(&record.translations)?,
                record.status.bits(),
                record.created_at.timestamp_millis(),
                record.updated_at.timestamp_millis(),
            ],
        )?;
        Ok(())
    }

    /// Words that do not carry the excluded flag, least recently drilled first.
    pub fn drill_words(&self, criteria: &DrillCriteria) -> Result<Vec<WordRecord>> {
        let conn = self.conn()?;
        Self::query_words(
            &conn,
            &format!(
                "SELECT {WORD_COLUMNS} FROM words
                 WHERE (status & ?1) = 0 AND translations != '[]'
                 ORDER BY updated_at ASC, created_at ASC
                 LIMIT ?2"
            ),
            params![criteria.exclude.bits(), criteria.limit as i64],
        )
    }

    /// Apply every update in one transaction. An unknown id rolls back all of them.
    pub fn apply_updates(&self, updates: &[WordUpdate]) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        for update in updates {
            let changed = tx.execute(
                "UPDATE words SET updated_at = ?1, status = COALESCE(?2, status) WHERE id = ?3",
                params![
                    update.updated_at.timestamp_millis(),
                    update.status.map(Status::bits),
                    update.id.as_str(),
                ],
            )?;
            if changed == 0 {
                return Err(DbError::WordNotFound(update.id.clone()));
            }
        }

        tx.commit()?;
        Ok(())
    }
}

impl WordRepository for SqliteStore {
    fn add_word(&self, word: &str, translation: &str, now: DateTime<Utc>) -> Result<AddedWord> {
        let word = normalize_term(word);
        if word.is_empty() {
            return Err(DbError::InvalidData("word is empty".to_string()));
        }
        if normalize_term(translation).is_empty() {
            return Err(DbError::InvalidData("translation is empty".to_string()));
        }

        let conn = self.conn()?;
        match Self::find_by_word(&conn, &word)? {
            Some(mut record) => {
                if !record.add_translation(translation) {
                    return Ok(AddedWord::AlreadyKnown(record));
                }
                conn.execute(
                    "UPDATE words SET translations = ?1 WHERE id = ?2",
                    params![serde_json::to_string(&record.translations)?, record.id.as_str()],
                )?;
                Ok(AddedWord::TranslationAdded(record))
            }
            None => {
                let id = WordId::new(Uuid::new_v4().to_string());
                let record = WordRecord::new(id, &word, translation, now);
                Self::insert(&conn, &record)?;
                Ok(AddedWord::Created(record))
            }
        }
    }

    fn get_word(&self, id: &WordId) -> Result<Option<WordRecord>> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {WORD_COLUMNS} FROM words WHERE id = ?1"),
            params![id.as_str()],
            Self::row_to_word,
        )
        .optional()?
        .map(WordRecord::try_from)
        .transpose()
    }

    fn list_words(&self, limit: Option<usize>) -> Result<Vec<WordRecord>> {
        let conn = self.conn()?;
        let limit = limit.map_or(-1, |n| n as i64);
        Self::query_words(
            &conn,
            &format!("SELECT {WORD_COLUMNS} FROM words ORDER BY created_at DESC, word ASC LIMIT ?1"),
            params![limit],
        )
    }

    fn count_words(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl Storage for SqliteStore {
    async fn fetch_drill_words(
        &self,
        criteria: &DrillCriteria,
    ) -> std::result::Result<Vec<WordRecord>, StorageError> {
        Ok(self.drill_words(criteria)?)
    }

    async fn batch_update(
        &self,
        updates: Vec<WordUpdate>,
    ) -> std::result::Result<(), StorageError> {
        Ok(self.apply_updates(&updates)?)
    }
}
