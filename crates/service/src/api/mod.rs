//! The FanFlux operations, grouped the way clients use them: users, posts,
//! tokens, communities and the marketplace.
//!
//! All groups are `impl` blocks on [`Fanflux`]. Reads go straight to the
//! database. Anything that reads a record, changes it and writes it back
//! holds the write lock for the whole cycle.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use fanflux_database::basic_db::SafeDatabase;
use fanflux_database::DbError;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};

pub mod communities;
pub mod marketplace;
pub mod posts;
pub mod tokens;
pub mod users;

pub const MAX_CONTENT_LEN: usize = 5000;

#[derive(Clone)]
pub struct Fanflux<D> {
    db: D,
    write_lock: Arc<Mutex<()>>,
}

impl<D: SafeDatabase> Fanflux<D> {
    pub fn new(db: D) -> Self {
        Self {
            db,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn database(&self) -> &D {
        &self.db
    }

    pub(crate) fn exclusive(&self) -> ServiceResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| ServiceError::Database(DbError::Poisoned))
    }
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub(crate) fn now() -> DateTime<Utc> {
    Utc::now()
}

pub(crate) fn require(value: &str, what: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::Validation(format!("{} cannot be empty", what)));
    }
    Ok(())
}

pub(crate) fn validate_content(content: &str) -> ServiceResult<()> {
    require(content, "Content")?;
    if content.len() > MAX_CONTENT_LEN {
        return Err(ServiceError::Validation(format!(
            "Content exceeds {} bytes",
            MAX_CONTENT_LEN
        )));
    }
    Ok(())
}
