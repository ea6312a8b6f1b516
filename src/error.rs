use crate::record::Todo;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("couldn't open db: {0}")]
    StoreOpen(#[source] sled::Error),

    #[error("couldn't create {name} bucket: {source}")]
    BucketCreate { name: String, source: sled::Error },

    #[error("could not encode todo: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("{0}")]
    Deserialization(#[source] serde_json::Error),

    #[error("store write failed: {0}")]
    StoreWrite(#[source] sled::Error),

    #[error("store read failed: {0}")]
    StoreRead(#[source] sled::Error),

    #[error("{0}")]
    HttpTransport(#[from] hyper::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(#[from] hyper::http::Error),

    #[error("couldn't bind server: {0}")]
    Bind(#[source] hyper::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("todo bucket is missing entry for {0}")]
    MissingEntry(String),

    #[error("could not decode entry for {route}: {source}")]
    CorruptEntry {
        route: String,
        source: serde_json::Error,
    },

    #[error("{route}: got {got}, want {want}")]
    Mismatch { route: String, got: Todo, want: Todo },
}
