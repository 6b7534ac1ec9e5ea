use reqwest::Url;
use thiserror::Error;

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request could not be completed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Response was not a valid result envelope: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Base URL cannot carry a path: {0}")]
    InvalidBaseUrl(Url),
}
