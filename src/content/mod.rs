pub mod normalize;
pub mod sanitize;
pub mod source;
pub mod types;

pub use normalize::{decode_html, normalize_category, normalize_post};
pub use source::{ContentSource, DynContentSource, PostQuery, WordPressSource};
pub use types::*;
