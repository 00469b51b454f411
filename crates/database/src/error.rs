use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("libmdbx error: {0}")]
    Mdbx(#[from] libmdbx::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database mutex poisoned")]
    Poisoned,

    #[error("invalid UTF-8 in table {table}: {source}")]
    Utf8 {
        table: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("invalid JSON in table {table}: {source}")]
    Json {
        table: String,
        #[source]
        source: serde_json::Error,
    },
}
