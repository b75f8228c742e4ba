use crate::domain::account::AccountId;
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    Create,
    Deposit,
    Withdraw,
    Transfer,
    Balance,
}

/// One raw CSV row: `type, account, destination, amount, owner`.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct CommandRecord {
    pub r#type: CommandType,
    pub account: Option<u64>,
    pub destination: Option<u64>,
    pub amount: Option<Decimal>,
    pub owner: Option<String>,
}

/// A row checked for the fields its command type needs.
#[derive(Debug, PartialEq, Clone)]
pub enum Command {
    Create {
        owner: String,
    },
    Deposit {
        account: AccountId,
        amount: Decimal,
    },
    Withdraw {
        account: AccountId,
        amount: Decimal,
    },
    Transfer {
        source: AccountId,
        destination: AccountId,
        amount: Decimal,
    },
    Balance {
        account: AccountId,
    },
}

fn required<T>(value: Option<T>, field: &str, kind: CommandType) -> Result<T> {
    value.ok_or_else(|| LedgerError::InvalidCommand(format!("{:?} requires `{}`", kind, field)))
}

impl TryFrom<CommandRecord> for Command {
    type Error = LedgerError;

    fn try_from(record: CommandRecord) -> Result<Self> {
        let kind = record.r#type;
        let account = |value: Option<u64>, field: &str| required(value, field, kind).map(AccountId);
        Ok(match kind {
            CommandType::Create => Command::Create {
                // Blank names are the ledger's call to reject.
                owner: record.owner.unwrap_or_default(),
            },
            CommandType::Deposit => Command::Deposit {
                account: account(record.account, "account")?,
                amount: required(record.amount, "amount", kind)?,
            },
            CommandType::Withdraw => Command::Withdraw {
                account: account(record.account, "account")?,
                amount: required(record.amount, "amount", kind)?,
            },
            CommandType::Transfer => Command::Transfer {
                source: account(record.account, "account")?,
                destination: account(record.destination, "destination")?,
                amount: required(record.amount, "amount", kind)?,
            },
            CommandType::Balance => Command::Balance {
                account: account(record.account, "account")?,
            },
        })
    }
}

/// Reads ledger commands from a CSV source.
///
/// Wraps `csv::Reader`, trimming whitespace and tolerating ragged rows.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily reads, deserializes and checks each row.
    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader
            .into_deserialize::<CommandRecord>()
            .map(|result| result.map_err(LedgerError::from).and_then(Command::try_from))
    }
}
