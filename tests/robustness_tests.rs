use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

mod common;

fn limits_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", common::LIMITS_JSON).unwrap();
    file
}

#[test]
fn test_malformed_csv_handling() {
    let limits = limits_file();
    let mut csv = NamedTempFile::new().unwrap();
    writeln!(csv, "type, account, destination, amount, owner").unwrap();
    writeln!(csv, "create, , , , Jane Doe").unwrap();
    writeln!(csv, "deposit, 1001, , 100,").unwrap();
    // Unknown command type
    writeln!(csv, "close, 1001, , ,").unwrap();
    // Missing amount
    writeln!(csv, "deposit, 1001, , ,").unwrap();
    // Non-numeric account
    writeln!(csv, "deposit, abc, , 100,").unwrap();
    writeln!(csv, "deposit, 1001, , 200,").unwrap();

    let mut cmd = Command::new(cargo_bin!("banking-ledger"));
    cmd.arg(csv.path()).arg("--limits").arg(limits.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error reading command"))
        .stdout(predicate::str::contains("1001,Jane Doe,300,2,0"));
}

#[test]
fn test_rejected_operations_are_reported() {
    let limits = limits_file();
    let mut csv = NamedTempFile::new().unwrap();
    writeln!(csv, "type, account, destination, amount, owner").unwrap();
    writeln!(csv, "create, , , ,").unwrap();
    writeln!(csv, "create, , , , John Doe").unwrap();
    writeln!(csv, "deposit, 1001, , 50,").unwrap();
    writeln!(csv, "withdraw, 1001, , 100,").unwrap();
    writeln!(csv, "transfer, 1001, 1002, 100,").unwrap();
    writeln!(csv, "balance, 4242, , ,").unwrap();

    let mut cmd = Command::new(cargo_bin!("banking-ledger"));
    cmd.arg(csv.path()).arg("--limits").arg(limits.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Name is blank or null"))
        .stderr(predicate::str::contains("Minimum deposit amount is $100.00"))
        .stderr(predicate::str::contains("Insufficient Balance\n"))
        .stderr(predicate::str::contains(
            "Insufficient Balance for account 1001",
        ))
        .stderr(predicate::str::contains("Account does not exist"))
        .stdout(predicate::str::contains("1001,John Doe,0,0,0"));
}
