use crate::error::Error;
use rusqlite::{Connection, OpenFlags};
use std::time::Duration;
use tracing::debug;

/// Handle on a Plex library database. The auditor never writes to it.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &str) -> Result<Self, Error> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(Duration::from_secs(5))?;
        let db = Database { conn };
        db.configure_pragmas()?;
        debug!("Opened library database '{}' read-only", path);
        Ok(db)
    }

    /// Writable, empty in-memory database. Callers seed their own schema.
    pub fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()?;
        Ok(Database { conn })
    }

    fn configure_pragmas(&self) -> rusqlite::Result<()> {
        self.conn.execute_batch(
            "PRAGMA query_only = ON;
             PRAGMA cache_size = -64000;
             PRAGMA temp_store = MEMORY;",
        )?;
        debug!("SQLite pragmas configured (query_only, 64MB cache)");
        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
