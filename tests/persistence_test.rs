#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::io::Write;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_rocksdb_persistence_recovery() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    // 1. First run: open an account and deposit
    let mut csv1 = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv1, "type, account, destination, amount, owner").unwrap();
    writeln!(csv1, "create, , , , Jane Doe").unwrap();
    writeln!(csv1, "deposit, 1001, , 500,").unwrap();

    let output1 = Command::new(cargo_bin!("banking-ledger"))
        .arg(csv1.path())
        .arg("--limits")
        .arg("tests/fixtures/limits.json")
        .arg("--db-path")
        .arg(&db_path)
        .output()
        .expect("Failed to execute command");
    assert!(output1.status.success());
    let stdout1 = String::from_utf8_lossy(&output1.stdout);
    assert!(stdout1.contains("1001,Jane Doe,500,1,0"));

    // 2. Second run: the account survives and ids keep increasing
    let mut csv2 = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv2, "type, account, destination, amount, owner").unwrap();
    writeln!(csv2, "create, , , , John Doe").unwrap();
    writeln!(csv2, "transfer, 1001, 1002, 200,").unwrap();

    let output2 = Command::new(cargo_bin!("banking-ledger"))
        .arg(csv2.path())
        .arg("--limits")
        .arg("tests/fixtures/limits.json")
        .arg("--db-path")
        .arg(&db_path)
        .output()
        .expect("Failed to execute command");
    assert!(output2.status.success());
    let stdout2 = String::from_utf8_lossy(&output2.stdout);

    assert!(stdout2.contains("1001,Jane Doe,300,1,1"));
    assert!(stdout2.contains("1002,John Doe,200,1,0"));
}
