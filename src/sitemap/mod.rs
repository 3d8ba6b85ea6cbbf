mod error;
mod xml;

pub use error::SitemapError;
pub use xml::{NewsPublication, render_news_sitemap, render_sitemap};

use crate::content::{Category, ContentSource, PostData, PostQuery};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::warn;

/// Posts listed in the main sitemap.
pub const SITEMAP_POST_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub last_modified: Option<DateTime<Utc>>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

impl SitemapEntry {
    fn new(
        loc: String,
        last_modified: Option<DateTime<Utc>>,
        change_frequency: ChangeFrequency,
        priority: f32,
    ) -> Self {
        Self {
            loc,
            last_modified,
            change_frequency,
            priority,
        }
    }
}

/// Builds the main sitemap: static pages, then categories, then posts.
///
/// A post whose slug is also a category slug can never be reached at
/// `/{slug}`, so it is left out and reported.
pub fn build_sitemap_entries(
    base_url: &str,
    categories: &[Category],
    posts: &[PostData],
    now: DateTime<Utc>,
) -> Vec<SitemapEntry> {
    let base_url = base_url.trim_end_matches('/');

    let mut entries = vec![
        SitemapEntry::new(base_url.to_string(), Some(now), ChangeFrequency::Always, 1.0),
        SitemapEntry::new(
            format!("{}/about", base_url),
            Some(now),
            ChangeFrequency::Monthly,
            0.3,
        ),
        SitemapEntry::new(
            format!("{}/contact", base_url),
            Some(now),
            ChangeFrequency::Monthly,
            0.3,
        ),
    ];

    let category_slugs: HashSet<&str> = categories.iter().map(|c| c.slug.as_str()).collect();

    entries.extend(categories.iter().map(|category| {
        SitemapEntry::new(
            format!("{}/{}", base_url, category.slug),
            Some(now),
            ChangeFrequency::Daily,
            0.8,
        )
    }));

    for post in posts {
        if category_slugs.contains(post.slug.as_str()) {
            warn!(
                "Post {} is shadowed by category slug '{}', omitting from sitemap",
                post.id, post.slug
            );
            continue;
        }

        entries.push(SitemapEntry::new(
            format!("{}/{}", base_url, post.slug),
            post.published_at(),
            ChangeFrequency::Weekly,
            0.6,
        ));
    }

    entries
}

pub async fn generate_sitemap(
    source: &dyn ContentSource,
    base_url: &str,
    now: DateTime<Utc>,
) -> Result<String, SitemapError> {
    let (categories, posts) = tokio::join!(
        source.all_categories(),
        source.all_posts(PostQuery::recent(SITEMAP_POST_LIMIT))
    );

    render_sitemap(&build_sitemap_entries(base_url, &categories, &posts, now))
}

pub async fn generate_news_sitemap(
    source: &dyn ContentSource,
    base_url: &str,
    publication: NewsPublication<'_>,
    now: DateTime<Utc>,
) -> Result<String, SitemapError> {
    let posts = source.recent_posts_for_sitemap(now).await;
    render_news_sitemap(base_url, publication, &posts)
}
