use thiserror::Error;

#[derive(Debug, Error)]
pub enum CmsError {
    #[error("CMS API URL is not configured (set cms.api_url or WORDPRESS_API_URL)")]
    MissingApiUrl,

    #[error("Invalid CMS API URL: {0}")]
    InvalidApiUrl(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Upstream returned {status} for {url}")]
    BadStatus { status: u16, url: String },
}
