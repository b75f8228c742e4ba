#![allow(dead_code)]

use async_trait::async_trait;
use banking_ledger::application::ledger::Ledger;
use banking_ledger::domain::account::{Account, AccountId, NewAccount};
use banking_ledger::domain::clock::ManualClock;
use banking_ledger::domain::policy::LimitPolicy;
use banking_ledger::domain::ports::AccountStore;
use banking_ledger::error::{LedgerError, Result};
use banking_ledger::infrastructure::in_memory::InMemoryAccountStore;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Balance in [0, 10000], deposits and withdrawals in [100, 5000] / [100, 2500],
/// three of each per day.
pub fn policy() -> LimitPolicy {
    LimitPolicy::new(
        dec!(0),
        dec!(10000),
        dec!(100),
        dec!(5000),
        dec!(100),
        dec!(2500),
        3,
        3,
    )
    .unwrap()
}

pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

pub fn ledger() -> (Ledger, Arc<ManualClock>) {
    ledger_with_store(InMemoryAccountStore::new())
}

pub fn ledger_with_store<S: AccountStore + 'static>(store: S) -> (Ledger, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start_date()));
    let ledger = Ledger::with_clock(Box::new(store), policy(), clock.clone());
    (ledger, clock)
}

pub fn ledger_with_policy(policy: LimitPolicy) -> (Ledger, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start_date()));
    let ledger = Ledger::with_clock(
        Box::new(InMemoryAccountStore::new()),
        policy,
        clock.clone(),
    );
    (ledger, clock)
}

/// An in-memory store whose reads and writes can be switched off.
#[derive(Clone, Default)]
pub struct FlakyStore {
    inner: InMemoryAccountStore,
    reads_down: Arc<AtomicBool>,
    writes_down: Arc<AtomicBool>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, down: bool) {
        self.writes_down.store(down, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, down: bool) {
        self.reads_down.store(down, Ordering::SeqCst);
    }

    fn check(flag: &AtomicBool) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            Err(LedgerError::store("connection refused"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AccountStore for FlakyStore {
    async fn create(&self, account: NewAccount) -> Result<AccountId> {
        Self::check(&self.writes_down)?;
        self.inner.create(account).await
    }

    async fn get(&self, id: AccountId) -> Result<Option<Account>> {
        Self::check(&self.reads_down)?;
        self.inner.get(id).await
    }

    async fn save(&self, account: Account) -> Result<()> {
        Self::check(&self.writes_down)?;
        self.inner.save(account).await
    }

    async fn save_all(&self, accounts: Vec<Account>) -> Result<()> {
        Self::check(&self.writes_down)?;
        self.inner.save_all(accounts).await
    }

    async fn all_accounts(&self) -> Result<Vec<Account>> {
        self.inner.all_accounts().await
    }
}

pub const LIMITS_JSON: &str = r#"{
    "balance":    { "minimum": "0",   "maximum": "10000" },
    "deposit":    { "minimum": "100", "maximum": "5000" },
    "withdrawal": { "minimum": "100", "maximum": "2500" },
    "daily":      { "credit": 3, "debit": 3 }
}"#;
