use serde::Deserialize;
use std::collections::HashMap;

/// A `{ "rendered": "..." }` wrapper as returned by the WordPress REST API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Rendered {
    #[serde(default)]
    pub rendered: String,
}

/// Post record exactly as the upstream API sends it. Every field is optional
/// so that a partial or error-shaped record still deserializes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPost {
    pub id: u64,
    pub date: Option<String>,
    pub slug: Option<String>,
    pub title: Option<Rendered>,
    pub excerpt: Option<Rendered>,
    pub content: Option<Rendered>,
    pub sticky: Option<bool>,
    pub categories: Vec<u64>,
    pub tags: Vec<u64>,
    #[serde(rename = "_embedded")]
    pub embedded: Option<Embedded>,
    pub rank_math_title: Option<String>,
    pub rank_math_description: Option<String>,
    pub yoast_head: Option<String>,
}

/// Side-channel of denormalized resources attached by `_embed=true`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Embedded {
    pub author: Vec<RawAuthor>,
    #[serde(rename = "wp:featuredmedia")]
    pub featured_media: Vec<RawMedia>,
    #[serde(rename = "wp:term")]
    pub terms: Vec<Vec<RawTerm>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawAuthor {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub avatar_urls: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawMedia {
    pub id: Option<u64>,
    pub source_url: Option<String>,
    pub alt_text: Option<String>,
    pub caption: Option<Rendered>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTerm {
    pub id: u64,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub taxonomy: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCategory {
    pub id: u64,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub count: Option<u64>,
    pub description: Option<String>,
}
