pub mod community;
pub mod config;
pub mod error;
pub mod marketplace;
pub mod posts;
pub mod router;
pub mod server;
pub mod tokens;
pub mod users;

pub use config::{LogFormat, ServerConfig};
pub use server::{build_app, build_server};
