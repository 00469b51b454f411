use libmdbx::{Database, DatabaseOptions, WriteMap, WriteFlags, TableFlags};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::path::Path;

use crate::error::DbError;

#[derive(Clone)]
pub struct InnerDatabase {
    db: Arc<Mutex<Database<WriteMap>>>,
}

/// A single mutation inside a multi-table transaction.
#[derive(Debug, Clone)]
pub enum WriteOp {
    Put { table: String, key: String, value: String },
    Delete { table: String, key: String },
}

pub trait SafeDatabase: Clone + Send + Sync + 'static {

    fn new<P: AsRef<Path>>(path: P) -> Result<Self, DbError> where Self: Sized;

    fn write(&self, key: &str, value: &str, table: &str) -> Result<(), DbError>;

    fn read(&self, key: &str, table: &str) -> Result<Option<Vec<u8>>, DbError>;

    fn read_all(&self, table: &str) -> Result<HashMap<Vec<u8>, Vec<u8>>, DbError>;

    fn batch_write<K, V>(&self, items: &[(K, V)], table: &str) -> Result<(), DbError>
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>;

    /// Returns `false` when the key was not present.
    fn delete(&self, key: &str, table: &str) -> Result<bool, DbError>;

    /// Applies every op in one read-write transaction, across any number of tables.
    fn commit(&self, ops: &[WriteOp]) -> Result<(), DbError>;
}

impl InnerDatabase {
    fn lock(&self) -> Result<MutexGuard<'_, Database<WriteMap>>, DbError> {
        self.db.lock().map_err(|_| DbError::Poisoned)
    }
}


impl SafeDatabase for InnerDatabase {

    fn new<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        std::fs::create_dir_all(path.as_ref())?;
        let mut options = DatabaseOptions::default();
        options.max_tables = Some(100);
        let db = Database::<WriteMap>::open_with_options(path, options)?;

        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }


    fn write(&self, key: &str, value: &str, table: &str) -> Result<(), DbError> {
        let db = self.lock()?;
        let transaction = db.begin_rw_txn()?;
        let table = transaction.create_table(Some(table), TableFlags::default())?;

        transaction.put(&table, key, value, WriteFlags::default())?;
        transaction.commit()?;
        Ok(())
    }


    fn read(&self, key: &str, table: &str) -> Result<Option<Vec<u8>>, DbError> {
        let db = self.lock()?;
        let transaction = db.begin_ro_txn()?;

        if let Ok(table) = transaction.open_table(Some(table)) {
            let result = transaction.get(&table, key.as_bytes())?;
            return Ok(result);
        }

        Ok(None)
    }

    fn read_all(&self, table: &str) -> Result<HashMap<Vec<u8>, Vec<u8>>, DbError> {
        let mut map = HashMap::new();
        let db = self.lock()?;
        let transaction = db.begin_ro_txn()?;

        if let Ok(table) = transaction.open_table(Some(table)) {
            let cursor = transaction.cursor(&table)?;

            // cursor items borrow the transaction pages, copy them out
            for item in cursor {
                let (key, value) = item?;
                map.insert(key.to_vec(), value.to_vec());
            }
        }

        Ok(map)
    }


    fn batch_write<K, V>(&self, items: &[(K, V)], table: &str) -> Result<(), DbError>
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        let db = self.lock()?;
        let transaction = db.begin_rw_txn()?;
        let table = transaction.create_table(Some(table), TableFlags::default())?;

        for (key, value) in items {
            transaction.put(&table, key, value, WriteFlags::default())?;
        }

        transaction.commit()?;
        Ok(())
    }

    fn delete(&self, key: &str, table: &str) -> Result<bool, DbError> {
        let db = self.lock()?;
        let transaction = db.begin_rw_txn()?;
        let table = transaction.create_table(Some(table), TableFlags::default())?;

        let removed = transaction.del(&table, key, None)?;
        transaction.commit()?;
        Ok(removed)
    }

    fn commit(&self, ops: &[WriteOp]) -> Result<(), DbError> {
        let db = self.lock()?;
        let transaction = db.begin_rw_txn()?;

        for op in ops {
            match op {
                WriteOp::Put { table, key, value } => {
                    let handle = transaction.create_table(Some(table.as_str()), TableFlags::default())?;
                    transaction.put(&handle, key, value, WriteFlags::default())?;
                }
                WriteOp::Delete { table, key } => {
                    let handle = transaction.create_table(Some(table.as_str()), TableFlags::default())?;
                    transaction.del(&handle, key, None)?;
                }
            }
        }

        transaction.commit()?;
        Ok(())
    }
}
