use thiserror::Error;

#[derive(Error, Debug)]
pub enum CultureMapError {
    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl From<serde_json::Error> for CultureMapError {
    fn from(err: serde_json::Error) -> Self {
        CultureMapError::Catalog(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CultureMapError>;
