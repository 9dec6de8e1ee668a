use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Title not found in catalog: {0}")]
    NotFound(String),

    #[error("Vectorizer produces {vectorizer} features but the count matrix has {matrix} columns")]
    ConfigurationMismatch { vectorizer: usize, matrix: usize },

    #[error("Count matrix has {rows} rows but the item table has {items} items")]
    RowCountMismatch { rows: usize, items: usize },

    #[error("Invalid count matrix: {0}")]
    InvalidMatrix(String),

    #[error("Invalid vectorizer: {0}")]
    InvalidVectorizer(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
