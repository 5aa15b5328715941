use crate::{create_tables, Cancellation, IrError, Result, SqlContext};
use crossbeam_channel::{Receiver, Sender};
use parking_lot::{ArcMutexGuard, Mutex, RawMutex};
use rusqlite::{Connection, OpenFlags, Transaction, TransactionBehavior};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Prepared statements kept per connection
const STATEMENT_CACHE_CAPACITY: usize = 128;

/// How long a file-backed connection waits on a lock held by another process
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

static NEXT_MEMORY_DATABASE: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Clone)]
enum Backing {
    /// Shared-cache in-memory database, alive while any pooled connection is
    Memory(String),
    /// On-disk database in WAL mode
    File(PathBuf),
}

struct StoreInner {
    connections: Vec<Arc<Mutex<Connection>>>,
    /// Indices into `connections` that nobody holds
    idle: Receiver<usize>,
    returns: Sender<usize>,
    write_gate: Mutex<()>,
    pool_size: usize,
    backing: Backing,
}

/// Handle to the relational IR.
///
/// The store owns a fixed pool of SQLite connections. Reads may run on any
/// number of them in parallel; writes go through [`IrStore::write`], which
/// lets one transaction in at a time. Cloning the handle shares the pool.
#[derive(Clone)]
pub struct IrStore {
    inner: Arc<StoreInner>,
}

impl std::fmt::Debug for IrStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IrStore")
            .field("backing", &self.inner.backing)
            .field("pool_size", &self.inner.pool_size)
            .field("idle", &self.inner.idle.len())
            .finish()
    }
}

impl IrStore {
    /// Create a private in-memory store with `pool_size` connections
    #[tracing::instrument]
    pub fn in_memory(pool_size: usize) -> Result<Self> {
        let id = NEXT_MEMORY_DATABASE.fetch_add(1, Ordering::Relaxed);
        let uri = format!(
            "file:houdini-ir-{}-{id}?mode=memory&cache=shared",
            std::process::id()
        );
        Self::with_backing(Backing::Memory(uri), pool_size)
    }

    /// Open (or create) a store backed by a database file
    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>, pool_size: usize) -> Result<Self> {
        Self::with_backing(Backing::File(path.as_ref().to_path_buf()), pool_size)
    }

    fn with_backing(backing: Backing, pool_size: usize) -> Result<Self> {
        let pool_size = pool_size.max(1);
        let (returns, idle) = crossbeam_channel::bounded(pool_size);

        let mut connections = Vec::with_capacity(pool_size);
        for index in 0..pool_size {
            let conn = open_connection(&backing)?;
            if index == 0 {
                create_tables(&conn)?;
            }
            connections.push(Arc::new(Mutex::new(conn)));
            returns.send(index).map_err(|_| IrError::PoolClosed)?;
        }

        tracing::debug!(pool_size, backing = ?backing, "IR store ready");
        Ok(Self {
            inner: Arc::new(StoreInner {
                connections,
                idle,
                returns,
                write_gate: Mutex::new(()),
                pool_size,
                backing,
            }),
        })
    }

    #[must_use]
    pub fn pool_size(&self) -> usize {
        self.inner.pool_size
    }

    /// Take a connection from the pool, waiting until one is free
    pub fn get(&self) -> Result<PooledConnection> {
        let index = self.inner.idle.recv().map_err(|_| IrError::PoolClosed)?;
        self.pooled(index)
    }

    /// Take a connection from the pool unless `cancel` fires first
    pub fn get_cancellable(&self, cancel: &Cancellation) -> Result<PooledConnection> {
        if cancel.is_cancelled() {
            return Err(IrError::Cancelled);
        }
        crossbeam_channel::select! {
            recv(self.inner.idle) -> index => {
                index.map_err(|_| IrError::PoolClosed).and_then(|index| self.pooled(index))
            }
            recv(cancel.receiver()) -> _ => Err(IrError::Cancelled),
        }
    }

    fn pooled(&self, index: usize) -> Result<PooledConnection> {
        let conn = self
            .inner
            .connections
            .get(index)
            .ok_or(IrError::PoolClosed)?
            .lock_arc();
        Ok(PooledConnection {
            conn,
            index,
            returns: self.inner.returns.clone(),
        })
    }

    /// Run `f` inside a write transaction.
    ///
    /// Only one write transaction runs at a time. The transaction commits
    /// when `f` returns `Ok` and rolls back when it returns `Err` (or when the
    /// commit itself fails).
    pub fn write<T, E, F>(&self, conn: &mut Connection, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> std::result::Result<T, E>,
        E: From<IrError>,
    {
        let _gate = self.inner.write_gate.lock();
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .sql_context("could not begin transaction", "BEGIN IMMEDIATE")?;

        match f(&tx) {
            Ok(value) => {
                tx.commit()
                    .sql_context("could not commit transaction", "COMMIT")?;
                Ok(value)
            }
            Err(error) => {
                if let Err(rollback) = tx.rollback() {
                    tracing::warn!(error = %rollback, "Rollback failed");
                }
                Err(error)
            }
        }
    }
}

fn open_connection(backing: &Backing) -> Result<Connection> {
    let conn = match backing {
        Backing::Memory(uri) => Connection::open_with_flags(
            uri,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .sql_context("could not open in-memory IR", uri)?,
        Backing::File(path) => {
            let conn = Connection::open(path)
                .sql_context("could not open IR database", &path.display().to_string())?;
            let mode: String = conn
                .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
                .sql_context("could not enable WAL", "PRAGMA journal_mode = WAL")?;
            tracing::trace!(mode, "Journal mode set");
            conn.busy_timeout(BUSY_TIMEOUT)
                .sql_context("could not set busy timeout", "PRAGMA busy_timeout")?;
            conn
        }
    };

    conn.pragma_update(None, "foreign_keys", "ON")
        .sql_context("could not enable foreign keys", "PRAGMA foreign_keys = ON")?;
    conn.set_prepared_statement_cache_capacity(STATEMENT_CACHE_CAPACITY);
    Ok(conn)
}

/// A connection borrowed from an [`IrStore`]; returned to the pool on drop.
///
/// The guard is tied to the thread that took it, so take connections on the
/// thread that uses them.
pub struct PooledConnection {
    conn: ArcMutexGuard<RawMutex, Connection>,
    index: usize,
    returns: Sender<usize>,
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        // fails only once the store itself is gone
        let _ = self.returns.send(self.index);
    }
}
