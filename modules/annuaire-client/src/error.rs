use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnnuaireError>;

#[derive(Debug, Error)]
pub enum AnnuaireError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for AnnuaireError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AnnuaireError::Parse(err.to_string())
        } else {
            AnnuaireError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AnnuaireError {
    fn from(err: serde_json::Error) -> Self {
        AnnuaireError::Parse(err.to_string())
    }
}
