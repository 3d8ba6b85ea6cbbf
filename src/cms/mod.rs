// Upstream CMS access: HTTP client, response cache and raw wire types
mod cache;
mod client;
mod error;
mod types;

pub use cache::ResponseCache;
pub use client::{CmsClient, UpstreamReply};
pub use error::CmsError;
pub use types::*;
