use crate::domain::policy::LimitPolicy;
use crate::error::{LedgerError, Movement, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique account number assigned by the store. Never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AccountId(pub u64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A signed monetary balance.
///
/// Wraps `rust_decimal::Decimal` so balances and raw transaction amounts are
/// not mixed up at API boundaries.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balance(pub Decimal);

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// `None` when the sum is not representable.
    pub fn checked_add(self, amount: Decimal) -> Option<Self> {
        self.0.checked_add(amount).map(Self)
    }

    /// `None` when the difference is not representable.
    pub fn checked_sub(self, amount: Decimal) -> Option<Self> {
        self.0.checked_sub(amount).map(Self)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.normalize(), f)
    }
}

/// An account that has not been persisted yet and therefore has no id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub owner_name: String,
    pub opened_on: NaiveDate,
}

impl NewAccount {
    /// Validates the owner name and captures the opening date.
    pub fn open(owner_name: &str, opened_on: NaiveDate) -> Result<Self> {
        let owner_name = owner_name.trim();
        if owner_name.is_empty() {
            return Err(LedgerError::InvalidInput);
        }
        Ok(Self {
            owner_name: owner_name.to_string(),
            opened_on,
        })
    }

    /// Materialises the record once the store has minted an id.
    pub fn into_account(self, id: AccountId) -> Account {
        Account {
            id,
            owner_name: self.owner_name,
            balance: Balance::ZERO,
            daily_debit_count: 0,
            last_debit_date: self.opened_on,
            daily_credit_count: 0,
            last_credit_date: self.opened_on,
        }
    }
}

/// The persisted state of a single account.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Account {
    pub id: AccountId,
    pub owner_name: String,
    pub balance: Balance,
    /// Withdrawals accepted on `last_debit_date`.
    pub daily_debit_count: u32,
    pub last_debit_date: NaiveDate,
    /// Deposits accepted on `last_credit_date`.
    pub daily_credit_count: u32,
    pub last_credit_date: NaiveDate,
}

impl Account {
    /// Applies a deposit if every limit allows it.
    ///
    /// Checks run in a fixed order: amount bounds, balance ceiling, then the
    /// daily credit count. The record is only touched once all of them pass.
    pub fn credit(
        &mut self,
        amount: Decimal,
        policy: &LimitPolicy,
        today: NaiveDate,
    ) -> Result<Balance> {
        if let Some((bound, limit)) = policy.deposit_violation(amount) {
            return Err(LedgerError::InvalidAmount {
                movement: Movement::Deposit,
                bound,
                limit,
                amount,
            });
        }

        // An unrepresentable sum is above any configurable ceiling.
        let candidate = match self.balance.checked_add(amount) {
            Some(candidate) if candidate.value() <= policy.maximum_balance() => candidate,
            overflowed => {
                return Err(LedgerError::BalanceLimitExceeded {
                    account: self.id,
                    limit: policy.maximum_balance(),
                    attempted: overflowed.map_or(Decimal::MAX, |b| b.value()),
                });
            }
        };

        let count = effective_count(self.daily_credit_count, self.last_credit_date, today);
        if count >= policy.daily_credit_limit() {
            return Err(LedgerError::DailyCreditLimitExceeded {
                account: self.id,
                limit: policy.daily_credit_limit(),
            });
        }

        self.balance = candidate;
        self.daily_credit_count = count + 1;
        self.last_credit_date = today;
        Ok(self.balance)
    }

    /// Applies a withdrawal if every limit allows it.
    ///
    /// The daily debit counter rolls over on `last_debit_date`.
    pub fn debit(
        &mut self,
        amount: Decimal,
        policy: &LimitPolicy,
        today: NaiveDate,
    ) -> Result<Balance> {
        if let Some((bound, limit)) = policy.withdrawal_violation(amount) {
            return Err(LedgerError::InvalidAmount {
                movement: Movement::Withdrawal,
                bound,
                limit,
                amount,
            });
        }

        let candidate = match self.balance.checked_sub(amount) {
            Some(candidate) if candidate.value() >= policy.minimum_balance() => candidate,
            underflowed => {
                return Err(LedgerError::InsufficientBalance {
                    account: self.id,
                    limit: policy.minimum_balance(),
                    attempted: underflowed.map_or(Decimal::MIN, |b| b.value()),
                });
            }
        };

        let count = effective_count(self.daily_debit_count, self.last_debit_date, today);
        if count >= policy.daily_debit_limit() {
            return Err(LedgerError::DailyDebitLimitExceeded {
                account: self.id,
                limit: policy.daily_debit_limit(),
            });
        }

        self.balance = candidate;
        self.daily_debit_count = count + 1;
        self.last_debit_date = today;
        Ok(self.balance)
    }
}

/// The counter value that applies today: zero once the calendar day has moved
/// past the last recorded operation.
fn effective_count(count: u32, last: NaiveDate, today: NaiveDate) -> u32 {
    if today > last { 0 } else { count }
}
