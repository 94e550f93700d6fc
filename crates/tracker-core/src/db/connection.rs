//! Database connection management

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};
use std::time::Duration;

use rusqlite::{Connection, OpenFlags};

use super::migrations;
use crate::error::{Error, Result};

/// Read-only connections opened next to the writer for file-backed databases
const READ_POOL_SIZE: usize = 4;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared handle to the `SQLite` record store
///
/// Cloning is cheap; every clone talks to the same connections. Writes go
/// through a single connection. File-backed databases also keep a small pool
/// of read-only connections so searches can run in parallel with each other
/// and with writes. In-memory databases have no pool and read through the
/// writer.
#[derive(Clone)]
pub struct Database {
    inner: Arc<Inner>,
}

struct Inner {
    writer: Mutex<Connection>,
    readers: Vec<Mutex<Connection>>,
    next_reader: AtomicUsize,
}

impl Database {
    /// Open a database at the given path, creating it if it doesn't exist
    ///
    /// Runs migrations automatically.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let writer = Connection::open(path)?;
        configure(&writer)?;
        migrations::run(&writer)?;

        let readers = (0..READ_POOL_SIZE)
            .map(|_| open_reader(path).map(Mutex::new))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(path = %path.display(), readers = readers.len(), "Opened database");
        Ok(Self::from_parts(writer, readers))
    }

    /// Open an in-memory database (useful for testing)
    pub fn open_in_memory() -> Result<Self> {
        let writer = Connection::open_in_memory()?;
        configure(&writer)?;
        migrations::run(&writer)?;
        Ok(Self::from_parts(writer, Vec::new()))
    }

    fn from_parts(writer: Connection, readers: Vec<Mutex<Connection>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                writer: Mutex::new(writer),
                readers,
                next_reader: AtomicUsize::new(0),
            }),
        }
    }

    /// Run `f` with exclusive access to the writer connection
    pub fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.inner.writer.lock().map_err(|_| poisoned())?;
        f(&conn)
    }

    /// Run `f` on a read-only connection from the pool
    ///
    /// Falls back to the writer when the database has no pool.
    pub fn with_read_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        match self.acquire_reader()? {
            Some(conn) => f(&conn),
            None => self.with_conn(f),
        }
    }

    /// Number of pooled read-only connections
    pub fn reader_count(&self) -> usize {
        self.inner.readers.len()
    }

    /// Take the first idle reader, starting from a rotating position; wait on
    /// that starting reader when all of them are busy.
    fn acquire_reader(&self) -> Result<Option<MutexGuard<'_, Connection>>> {
        let readers = &self.inner.readers;
        if readers.is_empty() {
            return Ok(None);
        }

        let start = self.inner.next_reader.fetch_add(1, Ordering::Relaxed) % readers.len();
        for step in 0..readers.len() {
            match readers[(start + step) % readers.len()].try_lock() {
                Ok(conn) => return Ok(Some(conn)),
                Err(TryLockError::WouldBlock) => {}
                Err(TryLockError::Poisoned(_)) => return Err(poisoned()),
            }
        }

        readers[start].lock().map(Some).map_err(|_| poisoned())
    }
}

fn poisoned() -> Error {
    Error::StorageUnavailable("database connection lock poisoned".into())
}

fn open_reader(path: &Path) -> Result<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(conn)
}

/// Configure `SQLite` for this workload
fn configure(conn: &Connection) -> Result<()> {
    // In-memory databases report "memory" instead of switching to WAL
    conn.pragma_update(None, "journal_mode", "WAL").ok();
    conn.pragma_update(None, "synchronous", "NORMAL").ok();
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "cache_size", 10_000).ok();
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}
