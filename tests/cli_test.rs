use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("banking-ledger"));
    cmd.arg("tests/fixtures/commands.csv")
        .arg("--limits")
        .arg("tests/fixtures/limits.json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "account,owner,balance,daily_credit_count,daily_debit_count",
        ))
        .stdout(predicate::str::contains("1001,Jane Doe,149.5,1,2"))
        .stdout(predicate::str::contains("1002,John Doe,150.5,1,0"));

    Ok(())
}

#[test]
fn test_cli_limits_from_environment() {
    let mut cmd = Command::new(cargo_bin!("banking-ledger"));
    cmd.arg("tests/fixtures/commands.csv")
        .env("BANKING_BALANCE_LIMIT_MINIMUM", "0")
        .env("BANKING_BALANCE_LIMIT_MAXIMUM", "10000")
        .env("BANKING_DEPOSIT_LIMIT_MINIMUM", "100")
        .env("BANKING_DEPOSIT_LIMIT_MAXIMUM", "5000")
        .env("BANKING_WITHDRAWAL_LIMIT_MINIMUM", "100")
        .env("BANKING_WITHDRAWAL_LIMIT_MAXIMUM", "2500")
        .env("BANKING_DAILY_LIMIT_CREDIT", "3")
        .env("BANKING_DAILY_LIMIT_DEBIT", "3");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1001,Jane Doe,149.5,1,2"));
}

#[test]
fn test_cli_without_limits_fails() {
    let mut cmd = Command::new(cargo_bin!("banking-ledger"));
    cmd.arg("tests/fixtures/commands.csv")
        .env_remove("BANKING_BALANCE_LIMIT_MINIMUM");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("BANKING_BALANCE_LIMIT_MINIMUM"));
}
