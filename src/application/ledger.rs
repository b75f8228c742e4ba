use crate::application::locks::AccountLocks;
use crate::domain::account::{Account, AccountId, Balance, NewAccount};
use crate::domain::clock::{Clock, SystemClock};
use crate::domain::policy::LimitPolicy;
use crate::domain::ports::AccountStoreBox;
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of a committed transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferReceipt {
    pub source: AccountId,
    pub destination: AccountId,
    pub amount: Decimal,
    pub source_balance: Balance,
    pub destination_balance: Balance,
}

impl fmt::Display for TransferReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Success")
    }
}

/// The account ledger.
///
/// Owns the in-memory copy of an account for the duration of an operation:
/// it takes the account's lock, loads the record, applies the change, persists
/// it and only then releases the lock. Nothing is written when validation
/// fails, and no other operation can observe a record between load and commit.
pub struct Ledger {
    store: AccountStoreBox,
    policy: LimitPolicy,
    clock: Arc<dyn Clock>,
    locks: AccountLocks,
}

impl Ledger {
    /// Creates a ledger that reads dates from the local system clock.
    pub fn new(store: AccountStoreBox, policy: LimitPolicy) -> Self {
        Self::with_clock(store, policy, Arc::new(SystemClock))
    }

    pub fn with_clock(store: AccountStoreBox, policy: LimitPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            policy,
            clock,
            locks: AccountLocks::new(),
        }
    }

    pub fn policy(&self) -> &LimitPolicy {
        &self.policy
    }

    /// Opens an account with a zero balance and both counters at zero.
    pub async fn create_account(&self, owner_name: &str) -> Result<AccountId> {
        let account = NewAccount::open(owner_name, self.clock.today())?;
        let id = self.store.create(account).await.inspect_err(log_store_failure)?;
        info!(account = %id, "account created");
        Ok(id)
    }

    pub async fn deposit(&self, id: AccountId, amount: Decimal) -> Result<Balance> {
        let outcome = self.deposit_locked(id, amount).await;
        self.release_unknown(outcome)
    }

    pub async fn withdraw(&self, id: AccountId, amount: Decimal) -> Result<Balance> {
        let outcome = self.withdraw_locked(id, amount).await;
        self.release_unknown(outcome)
    }

    /// Moves `amount` from `source` to `destination` as one unit.
    ///
    /// Both accounts stay locked while the withdrawal leg and then the deposit
    /// leg are validated against private copies. The two records are committed
    /// together, so either both legs are visible or neither is.
    ///
    /// A rejected leg (unknown account or a failed limit check) is returned as
    /// [`LedgerError::Transfer`] tagged with the id of that leg's account.
    /// Store failures are returned as plain [`LedgerError::StoreUnavailable`]
    /// whether they happen while loading or while committing.
    pub async fn transfer_fund(
        &self,
        source: AccountId,
        destination: AccountId,
        amount: Decimal,
    ) -> Result<TransferReceipt> {
        let outcome = self.transfer_locked(source, destination, amount).await;
        self.release_unknown(outcome)
    }

    /// Reads the current balance without touching the record.
    pub async fn get_balance(&self, id: AccountId) -> Result<Balance> {
        let outcome = self.balance_locked(id).await;
        self.release_unknown(outcome)
    }

    /// Consumes the ledger and returns every stored account, ordered by id.
    pub async fn into_accounts(self) -> Result<Vec<Account>> {
        let mut accounts = self.store.all_accounts().await?;
        accounts.sort_by_key(|account| account.id);
        Ok(accounts)
    }

    async fn deposit_locked(&self, id: AccountId, amount: Decimal) -> Result<Balance> {
        let _guard = self.locks.acquire(id).await;
        let mut account = self.load(id).await?;

        let balance = account
            .credit(amount, &self.policy, self.clock.today())
            .inspect_err(|e| debug!(account = %id, %amount, error = %e, "deposit rejected"))?;

        self.store.save(account).await.inspect_err(log_store_failure)?;
        info!(account = %id, %amount, %balance, "deposit committed");
        Ok(balance)
    }

    async fn withdraw_locked(&self, id: AccountId, amount: Decimal) -> Result<Balance> {
        let _guard = self.locks.acquire(id).await;
        let mut account = self.load(id).await?;

        let balance = account
            .debit(amount, &self.policy, self.clock.today())
            .inspect_err(|e| debug!(account = %id, %amount, error = %e, "withdrawal rejected"))?;

        self.store.save(account).await.inspect_err(log_store_failure)?;
        info!(account = %id, %amount, %balance, "withdrawal committed");
        Ok(balance)
    }

    async fn transfer_locked(
        &self,
        source: AccountId,
        destination: AccountId,
        amount: Decimal,
    ) -> Result<TransferReceipt> {
        let _guards = self.locks.acquire_pair(source, destination).await;
        let today = self.clock.today();

        let mut debited = self
            .load(source)
            .await
            .map_err(|e| e.in_transfer(source))?;
        let source_balance = debited
            .debit(amount, &self.policy, today)
            .map_err(|e| e.in_transfer(source))
            .inspect_err(|e| debug!(%source, %destination, %amount, error = %e, "transfer rejected"))?;

        let receipt = if source == destination {
            let destination_balance = debited
                .credit(amount, &self.policy, today)
                .map_err(|e| e.in_transfer(destination))
                .inspect_err(|e| debug!(%source, %destination, %amount, error = %e, "transfer rejected"))?;
            self.store
                .save(debited)
                .await
                .inspect_err(log_store_failure)?;
            TransferReceipt {
                source,
                destination,
                amount,
                source_balance: destination_balance,
                destination_balance,
            }
        } else {
            let mut credited = self
                .load(destination)
                .await
                .map_err(|e| e.in_transfer(destination))?;
            let destination_balance = credited
                .credit(amount, &self.policy, today)
                .map_err(|e| e.in_transfer(destination))
                .inspect_err(|e| debug!(%source, %destination, %amount, error = %e, "transfer rejected"))?;
            self.store
                .save_all(vec![debited, credited])
                .await
                .inspect_err(log_store_failure)?;
            TransferReceipt {
                source,
                destination,
                amount,
                source_balance,
                destination_balance,
            }
        };

        info!(%source, %destination, %amount, "transfer committed");
        Ok(receipt)
    }

    async fn balance_locked(&self, id: AccountId) -> Result<Balance> {
        let _guard = self.locks.acquire(id).await;
        Ok(self.load(id).await?.balance)
    }

    async fn load(&self, id: AccountId) -> Result<Account> {
        self.store
            .get(id)
            .await
            .inspect_err(log_store_failure)?
            .ok_or(LedgerError::AccountNotFound { account: id })
    }

    /// Drops the lock slot taken for an id that does not exist. Must run after
    /// the operation's guards are released.
    fn release_unknown<T>(&self, outcome: Result<T>) -> Result<T> {
        if let Err(error) = &outcome {
            if let LedgerError::AccountNotFound { account } = error.root_cause() {
                self.locks.forget_if_idle(*account);
            }
        }
        outcome
    }
}

fn log_store_failure(error: &LedgerError) {
    warn!(error = %error, "account store call failed");
}
