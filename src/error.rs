use crate::domain::account::AccountId;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// Which side of a configured range an amount fell outside of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Minimum,
    Maximum,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Minimum => f.write_str("Minimum"),
            Bound::Maximum => f.write_str("Maximum"),
        }
    }
}

/// The direction of a single-account balance mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Deposit,
    Withdrawal,
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Movement::Deposit => f.write_str("deposit"),
            Movement::Withdrawal => f.write_str("withdrawal"),
        }
    }
}

/// Failures reported by the ledger and its collaborators.
///
/// Every validation failure is detected before an account is mutated, so an
/// `Err` from a single-account operation never leaves partial state behind.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Name is blank or null")]
    InvalidInput,

    #[error("Account does not exist")]
    AccountNotFound { account: AccountId },

    #[error("{bound} {movement} amount is ${limit:.2}")]
    InvalidAmount {
        movement: Movement,
        bound: Bound,
        limit: Decimal,
        amount: Decimal,
    },

    #[error("Account balance of {account} cannot exceed ${limit:.2}")]
    BalanceLimitExceeded {
        account: AccountId,
        limit: Decimal,
        attempted: Decimal,
    },

    #[error("Insufficient Balance")]
    InsufficientBalance {
        account: AccountId,
        limit: Decimal,
        attempted: Decimal,
    },

    #[error("Only {limit} deposits are allowed in a day")]
    DailyCreditLimitExceeded { account: AccountId, limit: u32 },

    #[error("Only {limit} withdrawals are allowed in a day")]
    DailyDebitLimitExceeded { account: AccountId, limit: u32 },

    /// A failed transfer leg, tagged with the account whose leg failed.
    #[error("{source} for account {account}")]
    Transfer {
        account: AccountId,
        source: Box<LedgerError>,
    },

    #[error("Account store unavailable: {0}")]
    StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

impl LedgerError {
    /// Tags a rejected transfer leg with its account.
    ///
    /// Store failures are not attributable to either leg and pass through
    /// untagged.
    pub(crate) fn in_transfer(self, account: AccountId) -> Self {
        match self {
            LedgerError::StoreUnavailable(_) => self,
            rejected => LedgerError::Transfer {
                account,
                source: Box::new(rejected),
            },
        }
    }

    /// Wraps a collaborator failure.
    pub fn store<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        LedgerError::StoreUnavailable(error.into())
    }

    /// The underlying failure, with any transfer tagging stripped.
    pub fn root_cause(&self) -> &LedgerError {
        match self {
            LedgerError::Transfer { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// The account a transfer failure was attributed to.
    pub fn failed_account(&self) -> Option<AccountId> {
        match self {
            LedgerError::Transfer { account, .. } => Some(*account),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
