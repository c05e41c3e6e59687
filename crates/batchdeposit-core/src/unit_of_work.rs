//! Apply-all-or-rollback wrapper around a [`DepositLedger`].

use std::ops::{Deref, DerefMut};

use tracing::debug;

use crate::ledger::DepositLedger;

/// A scoped ledger transaction.
///
/// A checkpoint is taken on [`begin`](UnitOfWork::begin). Dropping the guard
/// without calling [`commit`](UnitOfWork::commit), whether by early return,
/// `?`, or an unwinding panic, rolls the ledger back to that checkpoint.
pub struct UnitOfWork<'a, L: DepositLedger> {
    ledger: &'a mut L,
    checkpoint: Option<L::Checkpoint>,
}

impl<'a, L: DepositLedger> UnitOfWork<'a, L> {
    pub fn begin(ledger: &'a mut L) -> Self {
        let checkpoint = ledger.checkpoint();
        debug!(deposit_count = ledger.deposit_count(), "unit of work started");
        Self {
            ledger,
            checkpoint: Some(checkpoint),
        }
    }

    /// Keep everything appended through this guard.
    pub fn commit(mut self) {
        self.checkpoint = None;
        debug!(deposit_count = self.ledger.deposit_count(), "unit of work committed");
    }
}

impl<L: DepositLedger> Deref for UnitOfWork<'_, L> {
    type Target = L;

    fn deref(&self) -> &L {
        self.ledger
    }
}

impl<L: DepositLedger> DerefMut for UnitOfWork<'_, L> {
    fn deref_mut(&mut self) -> &mut L {
        self.ledger
    }
}

impl<L: DepositLedger> Drop for UnitOfWork<'_, L> {
    fn drop(&mut self) {
        if let Some(checkpoint) = self.checkpoint.take() {
            self.ledger.rollback(checkpoint);
            debug!(deposit_count = self.ledger.deposit_count(), "unit of work rolled back");
        }
    }
}

/// Run `f` against `ledger`, keeping its effects only if it returns `Ok`.
pub fn atomically<L, T, E, F>(ledger: &mut L, f: F) -> Result<T, E>
where
    L: DepositLedger,
    F: FnOnce(&mut L) -> Result<T, E>,
{
    let mut uow = UnitOfWork::begin(ledger);
    let value = f(&mut *uow)?;
    uow.commit();
    Ok(value)
}
