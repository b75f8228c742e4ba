use crate::domain::account::AccountId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Exclusive access held on one account.
pub type AccountGuard = OwnedMutexGuard<()>;

/// Registry of per-account async mutexes.
///
/// Operations on distinct ids never wait on each other. A slot is created on
/// first use and kept while the account exists; callers drop the slot of an id
/// that turned out not to exist with [`AccountLocks::forget_if_idle`].
#[derive(Default)]
pub struct AccountLocks {
    slots: Mutex<HashMap<AccountId, Arc<AsyncMutex<()>>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, id: AccountId) -> Arc<AsyncMutex<()>> {
        // The map is only touched for lookups and inserts, so a poisoned lock
        // still holds a consistent map.
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(id).or_default())
    }

    pub async fn acquire(&self, id: AccountId) -> AccountGuard {
        self.slot(id).lock_owned().await
    }

    /// Removes the slot for `id` unless a guard or a waiter still refers to it.
    pub fn forget_if_idle(&self, id: AccountId) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if slots.get(&id).is_some_and(|slot| Arc::strong_count(slot) == 1) {
            slots.remove(&id);
        }
    }

    #[cfg(test)]
    pub(crate) fn tracked(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Locks both accounts in ascending id order, so two transfers running in
    /// opposite directions cannot deadlock. Equal ids are locked once.
    pub async fn acquire_pair(&self, a: AccountId, b: AccountId) -> Vec<AccountGuard> {
        if a == b {
            return vec![self.acquire(a).await];
        }
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        let first = self.acquire(first).await;
        let second = self.acquire(second).await;
        vec![first, second]
    }
}
