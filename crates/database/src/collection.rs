//! Typed JSON records on top of [`SafeDatabase`] tables.
//!
//! Every collection is a table whose rows are one JSON document each,
//! keyed by the record id.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::basic_db::{SafeDatabase, WriteOp};
use crate::error::DbError;

pub const USERS: &str = "fanflux_users";
pub const POSTS: &str = "fanflux_posts";
pub const TOKEN_REWARDS: &str = "fanflux_token_rewards";
pub const COMMUNITIES: &str = "fanflux_communities";
pub const ARTICLES: &str = "fanflux_articles";

fn decode<T: DeserializeOwned>(bytes: Vec<u8>, table: &str) -> Result<T, DbError> {
    let text = String::from_utf8(bytes).map_err(|source| DbError::Utf8 {
        table: table.to_string(),
        source,
    })?;

    serde_json::from_str(&text).map_err(|source| DbError::Json {
        table: table.to_string(),
        source,
    })
}

fn encode<T: Serialize>(value: &T, table: &str) -> Result<String, DbError> {
    serde_json::to_string(value).map_err(|source| DbError::Json {
        table: table.to_string(),
        source,
    })
}

pub fn load<T, D>(db: &D, table: &str, key: &str) -> Result<Option<T>, DbError>
where
    T: DeserializeOwned,
    D: SafeDatabase,
{
    match db.read(key, table)? {
        Some(bytes) => decode(bytes, table).map(Some),
        None => Ok(None),
    }
}

/// Loads every row of `table`. Order is unspecified.
pub fn load_all<T, D>(db: &D, table: &str) -> Result<Vec<T>, DbError>
where
    T: DeserializeOwned,
    D: SafeDatabase,
{
    db.read_all(table)?
        .into_values()
        .map(|bytes| decode(bytes, table))
        .collect()
}

pub fn save<T, D>(db: &D, table: &str, key: &str, value: &T) -> Result<(), DbError>
where
    T: Serialize,
    D: SafeDatabase,
{
    let json = encode(value, table)?;
    db.write(key, &json, table)
}

pub fn remove<D: SafeDatabase>(db: &D, table: &str, key: &str) -> Result<bool, DbError> {
    db.delete(key, table)
}

pub fn put_op<T: Serialize>(table: &str, key: &str, value: &T) -> Result<WriteOp, DbError> {
    Ok(WriteOp::Put {
        table: table.to_string(),
        key: key.to_string(),
        value: encode(value, table)?,
    })
}

pub fn delete_op(table: &str, key: &str) -> WriteOp {
    WriteOp::Delete {
        table: table.to_string(),
        key: key.to_string(),
    }
}
