use crate::domain::account::{Account, AccountId, NewAccount};
use crate::domain::ports::AccountStore;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// First account number handed out by a fresh store.
pub const FIRST_ACCOUNT_ID: u64 = 1001;

/// A thread-safe in-memory store for accounts.
///
/// Uses `Arc<RwLock<HashMap<AccountId, Account>>>` to allow shared concurrent
/// access. Ids come from an atomic sequence and are never reused.
#[derive(Clone)]
pub struct InMemoryAccountStore {
    accounts: Arc<RwLock<HashMap<AccountId, Account>>>,
    next_id: Arc<AtomicU64>,
}

impl Default for InMemoryAccountStore {
    fn default() -> Self {
        Self {
            accounts: Arc::default(),
            next_id: Arc::new(AtomicU64::new(FIRST_ACCOUNT_ID)),
        }
    }
}

impl InMemoryAccountStore {
    /// Creates a new, empty in-memory account store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn create(&self, account: NewAccount) -> Result<AccountId> {
        let id = AccountId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let mut accounts = self.accounts.write().await;
        accounts.insert(id, account.into_account(id));
        Ok(id)
    }

    async fn get(&self, id: AccountId) -> Result<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id).cloned())
    }

    async fn save(&self, account: Account) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        accounts.insert(account.id, account);
        Ok(())
    }

    async fn save_all(&self, batch: Vec<Account>) -> Result<()> {
        // A single write guard makes the whole batch visible at once.
        let mut accounts = self.accounts.write().await;
        for account in batch {
            accounts.insert(account.id, account);
        }
        Ok(())
    }

    async fn all_accounts(&self) -> Result<Vec<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().cloned().collect())
    }
}
