use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

/// Display-ready post record. Every page composer works from this shape and
/// never from the upstream wire format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostData {
    pub id: u64,
    pub slug: String,
    /// Plain text, entity-decoded. Must be escaped when rendered.
    pub title: String,
    /// Plain text, tag-free, at most 160 characters plus "...".
    pub excerpt: String,
    /// Trusted upstream HTML, rendered verbatim.
    pub content: String,
    /// ISO-8601 timestamp as sent upstream.
    pub date: String,
    pub author: Author,
    pub image: FeaturedImage,
    pub categories: Vec<CategoryRef>,
    pub seo: Seo,
    pub sticky: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Author {
    pub name: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeaturedImage {
    pub url: String,
    pub alt: String,
    /// Decoded caption markup; sanitized to text at render time.
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRef {
    pub id: u64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Seo {
    pub title: String,
    pub description: String,
    pub full_head: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub count: Option<u64>,
    pub description: Option<String>,
}

impl PostData {
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        parse_post_date(&self.date)
    }

    pub fn primary_category(&self) -> Option<&CategoryRef> {
        self.categories.first()
    }

    pub fn in_any_category<S: AsRef<str>>(&self, slugs: &[S]) -> bool {
        self.categories
            .iter()
            .any(|c| slugs.iter().any(|s| s.as_ref() == c.slug))
    }
}

/// Parses upstream post dates. WordPress sends site-local timestamps without
/// an offset (`2024-01-15T10:30:00`); those are taken as UTC.
pub fn parse_post_date(date: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(date) {
        return Some(date.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(date.and_utc());
    }

    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}
