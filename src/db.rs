use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;
use uuid::Uuid;

/// One accepted submission. Immutable once persisted; removed only through
/// the administrative path.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub id: String,
    pub name: String,
    pub class_code: String,
    pub registered_at: DateTime<Utc>,
}

/// Append-only registration log on SQLite. The mutex serializes writers;
/// each append is a single atomic insert, so concurrent submissions can
/// neither lose nor corrupt entries.
pub struct RegistrationStore {
    conn: Mutex<Connection>,
}

impl RegistrationStore {
    pub fn open(path: &Path) -> anyhow::Result<RegistrationStore> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)
            .with_context(|| format!("open registration store at {}", path.display()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS registrations(
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                class_code TEXT NOT NULL,
                registered_at TEXT NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_registrations_class ON registrations(class_code)",
            [],
        )?;

        Ok(RegistrationStore {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> anyhow::Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("registration store lock poisoned"))
    }

    /// Appends one row with a server-assigned timestamp.
    pub fn append(&self, name: &str, class_code: &str) -> anyhow::Result<Registration> {
        let registration = Registration {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            class_code: class_code.to_string(),
            registered_at: Utc::now(),
        };
        self.conn()?.execute(
            "INSERT INTO registrations(id, name, class_code, registered_at) VALUES(?, ?, ?, ?)",
            (
                &registration.id,
                &registration.name,
                &registration.class_code,
                &registration.registered_at.to_rfc3339(),
            ),
        )?;
        Ok(registration)
    }

    pub fn all(&self) -> anyhow::Result<Vec<Registration>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, class_code, registered_at
             FROM registrations
             ORDER BY registered_at, id",
        )?;
        let rows = stmt
            .query_map([], row_to_registration)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn by_class(&self, class_code: &str) -> anyhow::Result<Vec<Registration>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, class_code, registered_at
             FROM registrations
             WHERE class_code = ?
             ORDER BY registered_at, id",
        )?;
        let rows = stmt
            .query_map([class_code], row_to_registration)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Administrative deletion. Returns whether a row existed.
    pub fn remove(&self, id: &str) -> anyhow::Result<bool> {
        let removed = self
            .conn()?
            .execute("DELETE FROM registrations WHERE id = ?", [id])?;
        Ok(removed > 0)
    }

    pub fn count(&self) -> anyhow::Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM registrations", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn row_to_registration(row: &rusqlite::Row<'_>) -> rusqlite::Result<Registration> {
    let id: String = row.get(0)?;
    let name: String = row.get(1)?;
    let class_code: String = row.get(2)?;
    let raw: String = row.get(3)?;
    let registered_at = DateTime::parse_from_rfc3339(&raw)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?
        .with_timezone(&Utc);
    Ok(Registration {
        id,
        name,
        class_code,
        registered_at,
    })
}
