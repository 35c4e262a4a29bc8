//! Write-transaction scoping and cooperative cancellation.
//!
//! # Responsibility
//! - Open `BEGIN IMMEDIATE` transactions for multi-statement writes.
//! - Let a caller abort an in-flight operation from another thread.
//!
//! # Invariants
//! - A `Transaction` that is dropped without `commit` rolls back.
//! - A cancelled token never lets a transaction reach `COMMIT`.

use super::{DbError, DbResult};
use rusqlite::{Connection, InterruptHandle, Transaction, TransactionBehavior};
use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cancellation handle shared between a running operation and its caller.
///
/// Clones observe the same state. Once cancelled a token stays cancelled, so
/// create a fresh token per logical request.
#[derive(Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    interrupt: Option<Arc<InterruptHandle>>,
}

impl CancelToken {
    /// Token that only stops work between statements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Token that additionally interrupts the statement running on `conn`.
    pub fn for_connection(conn: &Connection) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            interrupt: Some(Arc::new(conn.get_interrupt_handle())),
        }
    }

    /// Requests cancellation. Safe to call from any thread, any number of times.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(handle) = &self.interrupt {
            handle.interrupt();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fails with `DbError::Cancelled` once `cancel` has been called.
    pub fn check(&self) -> DbResult<()> {
        if self.is_cancelled() {
            return Err(DbError::Cancelled);
        }
        Ok(())
    }
}

impl Debug for CancelToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .field("interrupts_statements", &self.interrupt.is_some())
            .finish()
    }
}

/// Begins an immediate write transaction on a shared connection borrow.
pub(crate) fn begin_write<'conn>(
    conn: &'conn Connection,
    cancel: &CancelToken,
) -> DbResult<Transaction<'conn>> {
    cancel.check()?;
    Ok(Transaction::new_unchecked(
        conn,
        TransactionBehavior::Immediate,
    )?)
}

/// Commits `tx` unless cancellation was requested, in which case it rolls back.
pub(crate) fn commit(tx: Transaction<'_>, cancel: &CancelToken) -> DbResult<()> {
    cancel.check()?;
    tx.commit()?;
    Ok(())
}
