//! Configured bounds for balances, transaction sizes and daily counts.
//!
//! A [`LimitPolicy`] is loaded once at startup and handed to the ledger by
//! value. It never changes afterwards and there is no ambient global copy.

use crate::error::Bound;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Failed to read limit policy: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed limit policy: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Missing environment variable: {0}")]
    MissingVar(&'static str),
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
    #[error("Inconsistent limit policy: {0}")]
    Inconsistent(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
struct Range {
    minimum: Decimal,
    maximum: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
struct DailyLimits {
    credit: u32,
    debit: u32,
}

/// On-disk shape, mirroring the `banking.*` property tree.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PolicyDocument {
    balance: Range,
    deposit: Range,
    withdrawal: Range,
    daily: DailyLimits,
}

/// The eight numeric limits governing every ledger operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimitPolicy {
    balance: Range,
    deposit: Range,
    withdrawal: Range,
    daily: DailyLimits,
}

impl LimitPolicy {
    /// Builds a policy from raw values, rejecting inconsistent combinations.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        minimum_balance: Decimal,
        maximum_balance: Decimal,
        minimum_deposit: Decimal,
        maximum_deposit: Decimal,
        minimum_withdrawal: Decimal,
        maximum_withdrawal: Decimal,
        daily_credit_limit: u32,
        daily_debit_limit: u32,
    ) -> Result<Self, PolicyError> {
        Self::from_document(PolicyDocument {
            balance: Range {
                minimum: minimum_balance,
                maximum: maximum_balance,
            },
            deposit: Range {
                minimum: minimum_deposit,
                maximum: maximum_deposit,
            },
            withdrawal: Range {
                minimum: minimum_withdrawal,
                maximum: maximum_withdrawal,
            },
            daily: DailyLimits {
                credit: daily_credit_limit,
                debit: daily_debit_limit,
            },
        })
    }

    /// Parses a JSON policy document.
    ///
    /// ```json
    /// {
    ///   "balance":    { "minimum": "0",   "maximum": "100000" },
    ///   "deposit":    { "minimum": "500", "maximum": "50000" },
    ///   "withdrawal": { "minimum": "1000", "maximum": "25000" },
    ///   "daily":      { "credit": 3, "debit": 3 }
    /// }
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, PolicyError> {
        let document: PolicyDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, PolicyError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reads the policy from `BANKING_*` environment variables.
    ///
    /// Every variable is required; there are no built-in defaults.
    pub fn from_env() -> Result<Self, PolicyError> {
        Self::new(
            env_var("BANKING_BALANCE_LIMIT_MINIMUM")?,
            env_var("BANKING_BALANCE_LIMIT_MAXIMUM")?,
            env_var("BANKING_DEPOSIT_LIMIT_MINIMUM")?,
            env_var("BANKING_DEPOSIT_LIMIT_MAXIMUM")?,
            env_var("BANKING_WITHDRAWAL_LIMIT_MINIMUM")?,
            env_var("BANKING_WITHDRAWAL_LIMIT_MAXIMUM")?,
            env_var("BANKING_DAILY_LIMIT_CREDIT")?,
            env_var("BANKING_DAILY_LIMIT_DEBIT")?,
        )
    }

    fn from_document(document: PolicyDocument) -> Result<Self, PolicyError> {
        let PolicyDocument {
            balance,
            deposit,
            withdrawal,
            daily,
        } = document;

        for (name, range) in [
            ("balance", balance),
            ("deposit", deposit),
            ("withdrawal", withdrawal),
        ] {
            if range.minimum > range.maximum {
                return Err(PolicyError::Inconsistent(format!(
                    "{name} minimum {} exceeds maximum {}",
                    range.minimum, range.maximum
                )));
            }
        }
        if deposit.minimum <= Decimal::ZERO || withdrawal.minimum <= Decimal::ZERO {
            return Err(PolicyError::Inconsistent(
                "transaction minimums must be positive".to_string(),
            ));
        }
        // Accounts open with a zero balance.
        if balance.minimum > Decimal::ZERO || balance.maximum < Decimal::ZERO {
            return Err(PolicyError::Inconsistent(
                "balance range must contain zero".to_string(),
            ));
        }

        Ok(Self {
            balance,
            deposit,
            withdrawal,
            daily,
        })
    }

    pub fn minimum_balance(&self) -> Decimal {
        self.balance.minimum
    }

    pub fn maximum_balance(&self) -> Decimal {
        self.balance.maximum
    }

    pub fn minimum_deposit(&self) -> Decimal {
        self.deposit.minimum
    }

    pub fn maximum_deposit(&self) -> Decimal {
        self.deposit.maximum
    }

    pub fn minimum_withdrawal(&self) -> Decimal {
        self.withdrawal.minimum
    }

    pub fn maximum_withdrawal(&self) -> Decimal {
        self.withdrawal.maximum
    }

    pub fn daily_credit_limit(&self) -> u32 {
        self.daily.credit
    }

    pub fn daily_debit_limit(&self) -> u32 {
        self.daily.debit
    }

    /// The violated bound and its value, if `amount` is not an acceptable deposit.
    pub fn deposit_violation(&self, amount: Decimal) -> Option<(Bound, Decimal)> {
        self.deposit.violation(amount)
    }

    /// The violated bound and its value, if `amount` is not an acceptable withdrawal.
    pub fn withdrawal_violation(&self, amount: Decimal) -> Option<(Bound, Decimal)> {
        self.withdrawal.violation(amount)
    }

    pub fn is_balance_allowed(&self, balance: Decimal) -> bool {
        self.balance.violation(balance).is_none()
    }
}

impl Range {
    fn violation(&self, value: Decimal) -> Option<(Bound, Decimal)> {
        if value < self.minimum {
            Some((Bound::Minimum, self.minimum))
        } else if value > self.maximum {
            Some((Bound::Maximum, self.maximum))
        } else {
            None
        }
    }
}

fn env_var<T>(key: &'static str) -> Result<T, PolicyError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(key).map_err(|_| PolicyError::MissingVar(key))?;
    raw.trim()
        .parse()
        .map_err(|e: T::Err| PolicyError::InvalidValue {
            key,
            message: e.to_string(),
        })
}
