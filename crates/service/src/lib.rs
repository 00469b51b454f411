pub mod api;
pub mod error;
pub mod parser;
pub mod seed;

pub use api::Fanflux;
pub use error::{ServiceError, ServiceResult};
