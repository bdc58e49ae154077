use shared::error::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("no section titled '{0}' in either the available or selected collection")]
    UnknownSection(String),
    #[error("no section editor registered for '{0}'")]
    UnknownEditor(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("portfolio api rejected request: {0}")]
    Api(#[from] ApiError),
    #[error("failed to decode {what} response: {source}")]
    Decode {
        what: &'static str,
        source: serde_json::Error,
    },
    #[error("invalid endpoint url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("base url '{0}' cannot carry path segments")]
    InvalidBaseUrl(String),
    #[error("token store error: {0}")]
    TokenStore(String),
    #[error("no auth token stored")]
    MissingToken,
    #[error("token verification returned no user identity")]
    MissingIdentity,
    #[error("portfolio session has been shut down")]
    SessionClosed,
    #[error("invalid input: {0}")]
    Validation(String),
}

pub type Result<T, E = PortfolioError> = std::result::Result<T, E>;
