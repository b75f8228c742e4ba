use super::account::{Account, AccountId, NewAccount};
use crate::error::Result;
use async_trait::async_trait;

/// Long-term owner of account records.
///
/// Implementations report their own failures as
/// [`LedgerError::StoreUnavailable`](crate::error::LedgerError::StoreUnavailable)
/// and are expected to bound their own latency.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Persists a new record and returns the freshly minted id.
    async fn create(&self, account: NewAccount) -> Result<AccountId>;
    async fn get(&self, id: AccountId) -> Result<Option<Account>>;
    /// Replaces the record with the same id.
    async fn save(&self, account: Account) -> Result<()>;
    /// Replaces several records as one all-or-nothing commit.
    async fn save_all(&self, accounts: Vec<Account>) -> Result<()>;
    async fn all_accounts(&self) -> Result<Vec<Account>>;
}

pub type AccountStoreBox = Box<dyn AccountStore>;
