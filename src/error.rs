//! Error type shared by the loader, the persistence layer and the CLI.
//!
//! Parsing never fails and the store degrades to defaults on corrupt state,
//! so most variants here come from I/O at the edges of the program.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Neither a configured source nor the embedded sample produced any text.
    #[error("failed to load articles")]
    NoArticleSource,

    #[error("No article with id {0}")]
    UnknownArticle(String),
}

pub type Result<T> = std::result::Result<T, Error>;
