use banking_ledger::application::ledger::Ledger;
use banking_ledger::domain::policy::LimitPolicy;
use banking_ledger::domain::ports::AccountStoreBox;
use banking_ledger::error::Result as LedgerResult;
use banking_ledger::infrastructure::in_memory::InMemoryAccountStore;
use banking_ledger::interfaces::csv::account_writer::AccountWriter;
use banking_ledger::interfaces::csv::command_reader::{Command, CommandReader};
use banking_ledger::telemetry;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input commands CSV file (`type, account, destination, amount, owner`)
    input: PathBuf,

    /// JSON limit policy. Without it, limits are read from `BANKING_*` variables.
    #[arg(long)]
    limits: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

fn open_store(db_path: Option<PathBuf>) -> Result<AccountStoreBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            let store = banking_ledger::infrastructure::rocksdb::RocksDBStore::open(path)
                .into_diagnostic()?;
            Ok(Box::new(store))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            tracing::warn!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Box::new(InMemoryAccountStore::new()))
        }
        None => Ok(Box::new(InMemoryAccountStore::new())),
    }
}

async fn execute(ledger: &Ledger, command: Command) -> LedgerResult<()> {
    match command {
        Command::Create { owner } => {
            ledger.create_account(&owner).await?;
        }
        Command::Deposit { account, amount } => {
            ledger.deposit(account, amount).await?;
        }
        Command::Withdraw { account, amount } => {
            ledger.withdraw(account, amount).await?;
        }
        Command::Transfer {
            source,
            destination,
            amount,
        } => {
            ledger.transfer_fund(source, destination, amount).await?;
        }
        Command::Balance { account } => {
            let balance = ledger.get_balance(account).await?;
            info!(%account, %balance, "balance");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();
    let cli = Cli::parse();

    let policy = match cli.limits {
        Some(path) => LimitPolicy::from_json_path(path),
        None => LimitPolicy::from_env(),
    }
    .into_diagnostic()?;

    let ledger = Ledger::new(open_store(cli.db_path)?, policy);

    let file = File::open(cli.input).into_diagnostic()?;
    let reader = CommandReader::new(file);
    for command in reader.commands() {
        match command {
            Ok(command) => {
                if let Err(e) = execute(&ledger, command).await {
                    eprintln!("Error processing command: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading command: {}", e);
            }
        }
    }

    let accounts = ledger.into_accounts().await.into_diagnostic()?;

    let stdout = io::stdout();
    let mut writer = AccountWriter::new(stdout.lock());
    writer.write_accounts(accounts).into_diagnostic()?;

    Ok(())
}
