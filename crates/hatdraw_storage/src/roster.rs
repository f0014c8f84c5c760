#![forbid(unsafe_code)]

use std::fmt;
use std::path::Path;
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension};

use hatdraw_contracts::roster::{
    ClaimId, ClaimRecord, ClaimantLabel, NameId, NameRecord, NameStatusRow, NameText, RosterTotals,
};
use hatdraw_contracts::ContractViolation;

use crate::repo::RosterRepo;

const BUSY_TIMEOUT_MS: u64 = 5_000;

/// Fixed participant list inserted the first time a database is opened.
pub const DEFAULT_SEED_NAMES: [&str; 14] = [
    "Erblina",
    "A. Halilaj",
    "A.Zebergja",
    "Adonis",
    "Endrit",
    "Erijon",
    "Ermir",
    "Kastriot",
    "Miran",
    "Ndriqim",
    "Rigon",
    "Rita",
    "Sheraida",
    "Yllka",
];

#[derive(Debug)]
pub enum StorageError {
    ClaimConflict { name_id: NameId },
    UnknownName { name_id: NameId },
    ContractViolation(ContractViolation),
    Sqlite(rusqlite::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ClaimConflict { name_id } => {
                write!(f, "name {} already has a claim", name_id.0)
            }
            StorageError::UnknownName { name_id } => {
                write!(f, "name {} does not exist", name_id.0)
            }
            StorageError::ContractViolation(violation) => {
                write!(f, "stored row violates contract: {violation:?}")
            }
            StorageError::Sqlite(err) => write!(f, "sqlite error: {err}"),
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Sqlite(err)
    }
}

impl From<ContractViolation> for StorageError {
    fn from(violation: ContractViolation) -> Self {
        StorageError::ContractViolation(violation)
    }
}

/// SQLite-backed roster store. One connection per store; the
/// one-claim-per-name invariant lives in the `UNIQUE (name_id)`
/// constraint, not in this code.
pub struct RosterStore {
    conn: Connection,
}

impl RosterStore {
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        Self::bootstrap(conn)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Self::bootstrap(conn)
    }

    fn bootstrap(conn: Connection) -> Result<Self, StorageError> {
        apply_pragmas(&conn)?;
        initialize_schema(&conn)?;
        let store = Self { conn };
        store.seed_names_if_empty(&DEFAULT_SEED_NAMES)?;
        Ok(store)
    }

    /// Populates the names table from `names` when it is empty. Returns
    /// the number of rows inserted; 0 means the table was already
    /// seeded.
    pub fn seed_names_if_empty(&self, names: &[&str]) -> Result<u32, StorageError> {
        let existing: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM names", [], |row| row.get(0))?;
        if existing > 0 {
            return Ok(0);
        }
        let mut stmt = self.conn.prepare("INSERT INTO names (name) VALUES (?1)")?;
        let mut inserted = 0;
        for name in names {
            NameText::new(*name)?;
            stmt.execute(params![name])?;
            inserted += 1;
        }
        Ok(inserted)
    }
}

impl RosterRepo for RosterStore {
    fn list_names_with_status(&self) -> Result<Vec<NameStatusRow>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT n.id, n.name, s.selected_by
             FROM names n
             LEFT JOIN selections s ON n.id = s.name_id
             ORDER BY n.name ASC, n.id ASC",
        )?;
        let mut rows = stmt.query([])?;
        let mut listing: Vec<(NameId, String, Vec<String>)> = Vec::new();
        while let Some(row) = rows.next()? {
            let id: i64 = row.get(0)?;
            let text: String = row.get(1)?;
            let claimant: Option<String> = row.get(2)?;
            match listing.last_mut() {
                Some((last_id, _, labels)) if last_id.0 == id => {
                    if let Some(claimant) = claimant {
                        labels.push(claimant);
                    }
                }
                _ => {
                    let labels = match claimant {
                        Some(claimant) => vec![claimant],
                        None => Vec::new(),
                    };
                    listing.push((NameId(id), text, labels));
                }
            }
        }
        Ok(listing
            .into_iter()
            .map(|(name_id, text, labels)| NameStatusRow::v1(name_id, text, labels))
            .collect())
    }

    fn count_totals(&self) -> Result<RosterTotals, StorageError> {
        let totals = self.conn.query_row(
            "SELECT (SELECT COUNT(*) FROM names), (SELECT COUNT(*) FROM selections)",
            [],
            |row| {
                Ok(RosterTotals {
                    total: row.get::<_, i64>(0)? as u32,
                    claimed: row.get::<_, i64>(1)? as u32,
                })
            },
        )?;
        Ok(totals)
    }

    fn insert_claim(
        &mut self,
        name_id: NameId,
        claimant: &ClaimantLabel,
    ) -> Result<ClaimId, StorageError> {
        let inserted = self.conn.execute(
            "INSERT INTO selections (name_id, selected_by) VALUES (?1, ?2)",
            params![name_id.0, claimant.as_str()],
        );
        match inserted {
            Ok(_) => Ok(ClaimId(self.conn.last_insert_rowid())),
            Err(err) => Err(map_claim_insert_error(err, name_id)),
        }
    }

    fn delete_claim(&mut self, name_id: NameId) -> Result<u64, StorageError> {
        let removed = self.conn.execute(
            "DELETE FROM selections WHERE name_id = ?1",
            params![name_id.0],
        )?;
        Ok(removed as u64)
    }

    fn delete_all_claims(&mut self) -> Result<u64, StorageError> {
        let removed = self.conn.execute("DELETE FROM selections", [])?;
        Ok(removed as u64)
    }

    fn claim_for_name(&self, name_id: NameId) -> Result<Option<ClaimRecord>, StorageError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name_id, selected_by, selected_at
                 FROM selections WHERE name_id = ?1",
                params![name_id.0],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;
        match row {
            Some((claim_id, name_id, selected_by, selected_at)) => Ok(Some(ClaimRecord {
                claim_id: ClaimId(claim_id),
                name_id: NameId(name_id),
                selected_by: ClaimantLabel::new(selected_by)?,
                selected_at,
            })),
            None => Ok(None),
        }
    }

    fn name_by_text(&self, text: &str) -> Result<Option<NameRecord>, StorageError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name FROM names WHERE name = ?1",
                params![text],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        match row {
            Some((name_id, text)) => Ok(Some(NameRecord {
                name_id: NameId(name_id),
                text: NameText::new(text)?,
            })),
            None => Ok(None),
        }
    }
}

/// The unique constraint on `selections.name_id` is the atomic arbiter
/// for racing claims; the foreign key rejects claims against names that
/// were never seeded.
fn map_claim_insert_error(err: rusqlite::Error, name_id: NameId) -> StorageError {
    if let rusqlite::Error::SqliteFailure(code, _) = &err {
        match code.extended_code {
            rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE => {
                return StorageError::ClaimConflict { name_id };
            }
            rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                return StorageError::UnknownName { name_id };
            }
            _ => {}
        }
    }
    StorageError::Sqlite(err)
}

fn apply_pragmas(conn: &Connection) -> Result<(), StorageError> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS))?;
    Ok(())
}

fn initialize_schema(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS names (
           id INTEGER PRIMARY KEY AUTOINCREMENT,
           name TEXT UNIQUE NOT NULL
         );
         CREATE TABLE IF NOT EXISTS selections (
           id INTEGER PRIMARY KEY AUTOINCREMENT,
           name_id INTEGER NOT NULL REFERENCES names (id),
           selected_by TEXT NOT NULL,
           selected_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
           UNIQUE (name_id)
         );",
    )?;
    Ok(())
}
