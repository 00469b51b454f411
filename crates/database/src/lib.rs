pub mod basic_db;
pub mod collection;
pub mod error;

pub use error::DbError;
