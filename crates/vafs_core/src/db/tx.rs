//! All-or-nothing transaction scope for command mutations.
//!
//! # Responsibility
//! - Begin an immediate transaction, commit on success, roll back otherwise.
//!
//! # Invariants
//! - A scope that is dropped without `commit` rolls back on every exit path,
//!   including early `?` returns and panics.
//! - Scopes never nest; one scope covers one command invocation.

use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::ops::Deref;

/// Scoped immediate transaction over a borrowed connection.
pub struct TransactionScope<'conn> {
    tx: Transaction<'conn>,
}

impl<'conn> TransactionScope<'conn> {
    /// Begins an immediate transaction on the connection.
    pub fn begin(conn: &'conn Connection) -> rusqlite::Result<Self> {
        let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
        Ok(Self { tx })
    }

    /// Commits all statements executed inside the scope.
    pub fn commit(self) -> rusqlite::Result<()> {
        self.tx.commit()
    }
}

impl Deref for TransactionScope<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.tx
    }
}

/// Runs `op` inside one transaction scope.
///
/// Commits when `op` returns `Ok`; any `Err` drops the scope and the
/// transaction rolls back before the error reaches the caller.
pub fn with_scope<T, E>(
    conn: &Connection,
    op: impl FnOnce(&Connection) -> Result<T, E>,
) -> Result<T, E>
where
    E: From<rusqlite::Error>,
{
    let scope = TransactionScope::begin(conn)?;
    let value = op(&scope)?;
    scope.commit()?;
    Ok(value)
}
