use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdError {
    #[error("Ad provider error: {0}")]
    ProviderError(String),

    #[error("Ad provider unavailable")]
    Unavailable,
}
