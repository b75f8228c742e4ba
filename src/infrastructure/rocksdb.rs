use crate::domain::account::{Account, AccountId, NewAccount};
use crate::domain::ports::AccountStore;
use crate::error::{LedgerError, Result};
use crate::infrastructure::in_memory::FIRST_ACCOUNT_ID;
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Options, WriteBatch};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing account records.
pub const CF_ACCOUNTS: &str = "accounts";
/// Column Family for bookkeeping such as the id sequence.
pub const CF_META: &str = "meta";

const NEXT_ID_KEY: &[u8] = b"next_account_id";

impl From<rocksdb::Error> for LedgerError {
    fn from(error: rocksdb::Error) -> Self {
        LedgerError::store(error)
    }
}

/// A persistent account store backed by RocksDB.
///
/// Accounts are kept as JSON under big-endian id keys. The id sequence lives
/// in its own column family and is advanced in the same write batch as the
/// account it was minted for.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    next_id: Arc<Mutex<u64>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_accounts = ColumnFamilyDescriptor::new(CF_ACCOUNTS, Options::default());
        let cf_meta = ColumnFamilyDescriptor::new(CF_META, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_accounts, cf_meta])?;

        let next_id = {
            let meta = column_family(&db, CF_META)?;
            match db.get_cf(meta, NEXT_ID_KEY)? {
                Some(bytes) => decode_id(&bytes)?,
                None => FIRST_ACCOUNT_ID,
            }
        };

        Ok(Self {
            db: Arc::new(db),
            next_id: Arc::new(Mutex::new(next_id)),
        })
    }

    fn put_account(&self, batch: &mut WriteBatch, account: &Account) -> Result<()> {
        let cf = column_family(&self.db, CF_ACCOUNTS)?;
        let value = serde_json::to_vec(account)
            .map_err(|e| LedgerError::store(format!("Serialization error: {}", e)))?;
        batch.put_cf(cf, account.id.0.to_be_bytes(), value);
        Ok(())
    }
}

fn column_family<'a>(db: &'a DB, name: &str) -> Result<&'a ColumnFamily> {
    db.cf_handle(name)
        .ok_or_else(|| LedgerError::store(format!("{} column family not found", name)))
}

fn decode_id(bytes: &[u8]) -> Result<u64> {
    let raw: [u8; 8] = bytes
        .try_into()
        .map_err(|_| LedgerError::store("Corrupt account id sequence"))?;
    Ok(u64::from_be_bytes(raw))
}

#[async_trait]
impl AccountStore for RocksDBStore {
    async fn create(&self, account: NewAccount) -> Result<AccountId> {
        let mut next_id = self.next_id.lock().await;
        let id = AccountId(*next_id);

        let mut batch = WriteBatch::default();
        self.put_account(&mut batch, &account.into_account(id))?;
        let meta = column_family(&self.db, CF_META)?;
        batch.put_cf(meta, NEXT_ID_KEY, (id.0 + 1).to_be_bytes());
        self.db.write(batch)?;

        *next_id = id.0 + 1;
        Ok(id)
    }

    async fn get(&self, id: AccountId) -> Result<Option<Account>> {
        let cf = column_family(&self.db, CF_ACCOUNTS)?;
        match self.db.get_cf(cf, id.0.to_be_bytes())? {
            Some(bytes) => {
                let account = serde_json::from_slice(&bytes)
                    .map_err(|e| LedgerError::store(format!("Deserialization error: {}", e)))?;
                Ok(Some(account))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, account: Account) -> Result<()> {
        self.save_all(vec![account]).await
    }

    async fn save_all(&self, accounts: Vec<Account>) -> Result<()> {
        let mut batch = WriteBatch::default();
        for account in &accounts {
            self.put_account(&mut batch, account)?;
        }
        self.db.write(batch)?;
        Ok(())
    }

    async fn all_accounts(&self) -> Result<Vec<Account>> {
        let cf = column_family(&self.db, CF_ACCOUNTS)?;

        let mut accounts = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            let account: Account = serde_json::from_slice(&value)
                .map_err(|e| LedgerError::store(format!("Failed to deserialize account: {}", e)))?;
            accounts.push(account);
        }

        Ok(accounts)
    }
}
