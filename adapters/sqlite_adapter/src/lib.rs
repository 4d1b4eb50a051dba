use chrono::{SecondsFormat, Utc};
use personas_core::domain::Persona;
use personas_core::ports::PersonasStorage;
use rusqlite::{params, Connection, OpenFlags, Row};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SqliteStorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid persona id in backup: {0}")]
    InvalidId(#[from] uuid::Error),

    #[error("Invalid persona age in backup: {0}")]
    InvalidAge(i64),
}

pub type Result<T> = std::result::Result<T, SqliteStorageError>;

/// One row of the `personas` table before it is turned back into a Persona
struct PersonaRow {
    id: String,
    name: String,
    age: i64,
    national_id: String,
}

impl PersonaRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            age: row.get(2)?,
            national_id: row.get(3)?,
        })
    }

    fn into_persona(self) -> Result<Persona> {
        let id = Uuid::parse_str(&self.id)?;
        let age = u32::try_from(self.age).map_err(|_| SqliteStorageError::InvalidAge(self.age))?;
        Ok(Persona::with_id(id, self.name, age, self.national_id))
    }
}

/// SQLite implementation of the PersonasStorage trait
///
/// Each backup replaces the whole `personas` table; `position` keeps the
/// repository's insertion order across a restore.
pub struct SqlitePersonasStorage {
    db_path: PathBuf,
}

impl SqlitePersonasStorage {
    /// Creates a new SqlitePersonasStorage with the given database path
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn ensure_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS personas (
                position     INTEGER PRIMARY KEY,
                id           TEXT NOT NULL,
                name         TEXT NOT NULL,
                age          INTEGER NOT NULL,
                national_id  TEXT NOT NULL,
                backed_up_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Writes the full set inside one transaction so a failure leaves the previous backup intact
    pub fn try_backup(&self, personas: &[Persona]) -> Result<()> {
        let mut conn = Connection::open(&self.db_path)?;
        Self::ensure_schema(&conn)?;

        let backed_up_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM personas", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO personas (position, id, name, age, national_id, backed_up_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for (position, persona) in personas.iter().enumerate() {
                stmt.execute(params![
                    position as i64,
                    persona.id().to_string(),
                    persona.name,
                    i64::from(persona.age),
                    persona.national_id,
                    backed_up_at,
                ])?;
            }
        }
        tx.commit()?;

        Ok(())
    }

    /// Reads the last backup without writing to the database.
    /// A missing database, or one without a `personas` table, holds no personas.
    pub fn try_restore(&self) -> Result<Vec<Persona>> {
        if !self.db_path.exists() {
            return Ok(Vec::new());
        }

        let conn = Connection::open_with_flags(&self.db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        let has_table: bool = conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'personas')",
            [],
            |row| row.get(0),
        )?;
        if !has_table {
            return Ok(Vec::new());
        }

        let mut stmt = conn.prepare(
            "SELECT id, name, age, national_id FROM personas ORDER BY position ASC",
        )?;
        let rows = stmt
            .query_map([], PersonaRow::from_row)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

        rows.into_iter().map(PersonaRow::into_persona).collect()
    }
}

impl PersonasStorage for SqlitePersonasStorage {
    fn restore(&self) -> Vec<Persona> {
        match self.try_restore() {
            Ok(personas) => {
                info!(path = %self.db_path.display(), count = personas.len(), "restored from sqlite");
                personas
            }
            Err(e) => {
                error!(path = %self.db_path.display(), error = %e, "sqlite restore failed");
                Vec::new()
            }
        }
    }

    fn backup(&self, personas: &[Persona]) -> bool {
        match self.try_backup(personas) {
            Ok(()) => {
                info!(path = %self.db_path.display(), count = personas.len(), "backed up to sqlite");
                true
            }
            Err(e) => {
                error!(path = %self.db_path.display(), error = %e, "sqlite backup failed");
                false
            }
        }
    }
}
