use crate::domain::account::Account;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct AccountRow<'a> {
    account: u64,
    owner: &'a str,
    balance: Decimal,
    daily_credit_count: u32,
    daily_debit_count: u32,
}

/// Writes account snapshots as CSV.
pub struct AccountWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> AccountWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    /// Writes the header followed by one row per account, then flushes.
    pub fn write_accounts<I>(&mut self, accounts: I) -> Result<()>
    where
        I: IntoIterator<Item = Account>,
    {
        let mut wrote_any = false;
        for account in accounts {
            self.writer.serialize(AccountRow {
                account: account.id.0,
                owner: &account.owner_name,
                balance: account.balance.value().normalize(),
                daily_credit_count: account.daily_credit_count,
                daily_debit_count: account.daily_debit_count,
            })?;
            wrote_any = true;
        }
        if !wrote_any {
            self.writer.write_record([
                "account",
                "owner",
                "balance",
                "daily_credit_count",
                "daily_debit_count",
            ])?;
        }
        self.writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::{AccountId, Balance, NewAccount};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn account(id: u64, balance: Decimal) -> Account {
        let mut account = NewAccount::open("Jane Doe", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .unwrap()
            .into_account(AccountId(id));
        account.balance = Balance::new(balance);
        account.daily_credit_count = 1;
        account
    }

    fn render(accounts: Vec<Account>) -> String {
        let mut out = Vec::new();
        AccountWriter::new(&mut out).write_accounts(accounts).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_writer_normalizes_balances() {
        let output = render(vec![account(1001, dec!(300.00)), account(1002, dec!(1.50))]);
        assert_eq!(
            output,
            "account,owner,balance,daily_credit_count,daily_debit_count\n\
             1001,Jane Doe,300,1,0\n\
             1002,Jane Doe,1.5,1,0\n"
        );
    }

    #[test]
    fn test_writer_header_only_when_empty() {
        assert_eq!(
            render(Vec::new()),
            "account,owner,balance,daily_credit_count,daily_debit_count\n"
        );
    }
}
