use super::{
    normalize::{normalize_category, normalize_post},
    types::{Category, PostData},
};
use crate::cms::{CmsClient, RawCategory, RawPost};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tracing::warn;

pub const POSTS_ENDPOINT: &str = "/wp/v2/posts";
pub const CATEGORIES_ENDPOINT: &str = "/wp/v2/categories";

pub const DEFAULT_REVALIDATE: Duration = Duration::from_secs(60);
pub const CATEGORIES_REVALIDATE: Duration = Duration::from_secs(3600);
pub const SITEMAP_REVALIDATE: Duration = Duration::from_secs(600);

pub const NEWS_WINDOW_HOURS: i64 = 48;
const SITEMAP_BATCH: u32 = 100;
const CATEGORY_BATCH: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostQuery {
    pub page: u32,
    pub per_page: u32,
    pub category: Option<u64>,
}

impl PostQuery {
    pub fn recent(per_page: u32) -> Self {
        Self {
            page: 1,
            per_page,
            category: None,
        }
    }

    pub fn in_category(category: u64, per_page: u32) -> Self {
        Self {
            page: 1,
            per_page,
            category: Some(category),
        }
    }
}

/// Read access to normalized content. All methods are fail-soft: an
/// unavailable upstream reads as "nothing there".
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn all_posts(&self, query: PostQuery) -> Vec<PostData>;
    async fn post_by_slug(&self, slug: &str) -> Option<PostData>;
    async fn all_categories(&self) -> Vec<Category>;
    async fn category_by_slug(&self, slug: &str) -> Option<Category>;
    /// Posts published in the `NEWS_WINDOW_HOURS` before `now`.
    async fn recent_posts_for_sitemap(&self, now: DateTime<Utc>) -> Vec<PostData>;
}

pub type DynContentSource = Arc<dyn ContentSource>;

/// Keeps posts published at or after `cutoff`. Posts whose date does not
/// parse are dropped.
pub fn published_since(posts: Vec<PostData>, cutoff: DateTime<Utc>) -> Vec<PostData> {
    posts
        .into_iter()
        .filter(|post| post.published_at().is_some_and(|date| date >= cutoff))
        .collect()
}

pub fn news_window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - ChronoDuration::hours(NEWS_WINDOW_HOURS)
}

/// `ContentSource` backed by the WordPress REST API.
pub struct WordPressSource {
    client: CmsClient,
}

impl WordPressSource {
    pub fn new(client: CmsClient) -> Self {
        Self { client }
    }

    async fn fetch_posts(&self, params: &[(&str, String)], revalidate: Duration) -> Vec<PostData> {
        let value = self.client.fetch(POSTS_ENDPOINT, params, revalidate).await;
        parse_records::<RawPost>(value, "post")
            .iter()
            .map(normalize_post)
            .filter(|post| {
                if post.slug.is_empty() {
                    warn!("Skipping post {} without a slug", post.id);
                    false
                } else {
                    true
                }
            })
            .collect()
    }

    async fn fetch_categories(
        &self,
        params: &[(&str, String)],
        revalidate: Duration,
    ) -> Vec<Category> {
        let value = self
            .client
            .fetch(CATEGORIES_ENDPOINT, params, revalidate)
            .await;
        parse_records::<RawCategory>(value, "category")
            .iter()
            .map(normalize_category)
            .filter(|category| !category.slug.is_empty())
            .collect()
    }
}

/// Decodes a JSON array record by record, skipping malformed elements. Any
/// non-array payload yields an empty list.
fn parse_records<T: DeserializeOwned>(value: Option<Value>, kind: &str) -> Vec<T> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping malformed {} record: {}", kind, e);
                None
            }
        })
        .collect()
}

#[async_trait]
impl ContentSource for WordPressSource {
    async fn all_posts(&self, query: PostQuery) -> Vec<PostData> {
        let mut params = vec![
            ("_embed", "true".to_string()),
            ("per_page", query.per_page.to_string()),
            ("page", query.page.to_string()),
        ];
        if let Some(category) = query.category {
            params.push(("categories", category.to_string()));
        }

        self.fetch_posts(&params, DEFAULT_REVALIDATE).await
    }

    async fn post_by_slug(&self, slug: &str) -> Option<PostData> {
        let params = [("slug", slug.to_string()), ("_embed", "true".to_string())];
        self.fetch_posts(&params, DEFAULT_REVALIDATE)
            .await
            .into_iter()
            .next()
    }

    async fn all_categories(&self) -> Vec<Category> {
        let params = [
            ("per_page", CATEGORY_BATCH.to_string()),
            ("orderby", "count".to_string()),
            ("order", "desc".to_string()),
        ];
        self.fetch_categories(&params, CATEGORIES_REVALIDATE).await
    }

    async fn category_by_slug(&self, slug: &str) -> Option<Category> {
        let params = [("slug", slug.to_string())];
        self.fetch_categories(&params, DEFAULT_REVALIDATE)
            .await
            .into_iter()
            .next()
    }

    async fn recent_posts_for_sitemap(&self, now: DateTime<Utc>) -> Vec<PostData> {
        let cutoff = news_window_start(now);
        let params = [
            ("_embed", "true".to_string()),
            ("per_page", SITEMAP_BATCH.to_string()),
            (
                "after",
                cutoff.to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
        ];

        let posts = self.fetch_posts(&params, SITEMAP_REVALIDATE).await;
        published_since(posts, cutoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::Rendered;

    fn post_at(id: u64, date: DateTime<Utc>) -> PostData {
        normalize_post(&RawPost {
            id,
            slug: Some(format!("post-{}", id)),
            date: Some(date.format("%Y-%m-%dT%H:%M:%S").to_string()),
            title: Some(Rendered {
                rendered: format!("Post {}", id),
            }),
            ..RawPost::default()
        })
    }

    #[test]
    fn test_published_since_keeps_only_window() {
        let now = Utc::now();
        let posts = vec![
            post_at(1, now - ChronoDuration::hours(47)),
            post_at(2, now - ChronoDuration::hours(49)),
        ];

        let recent = published_since(posts, news_window_start(now));
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, 1);
    }

    #[test]
    fn test_published_since_drops_unparseable_dates() {
        let mut post = post_at(1, Utc::now());
        post.date = "yesterday".to_string();
        assert!(published_since(vec![post], news_window_start(Utc::now())).is_empty());
    }

    #[test]
    fn test_parse_records_skips_bad_elements() {
        let value = serde_json::json!([
            {"id": 1, "slug": "ok"},
            {"id": "not-a-number"},
            {"id": 2, "slug": "also-ok"}
        ]);
        let records: Vec<RawPost> = parse_records(Some(value), "post");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id, 2);
    }

    #[test]
    fn test_parse_records_non_array_is_empty() {
        let records: Vec<RawPost> =
            parse_records(Some(serde_json::json!({"code": "rest_error"})), "post");
        assert!(records.is_empty());

        let records: Vec<RawPost> = parse_records(None, "post");
        assert!(records.is_empty());
    }
}
