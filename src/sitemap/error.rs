use thiserror::Error;

#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("XML write error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Generated XML is not valid UTF-8: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
}
