use crate::{
    HomeConfig,
    content::{Category, ContentSource, PostData, PostQuery},
};
use tracing::debug;

/// Outcome of resolving a root-level URL segment.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Category {
        category: Category,
        posts: Vec<PostData>,
    },
    Article {
        post: PostData,
        trending: Vec<PostData>,
    },
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    pub category_posts: u32,
    pub article_trending: u32,
}

impl From<&HomeConfig> for ResolveOptions {
    fn from(config: &HomeConfig) -> Self {
        Self {
            category_posts: config.category_posts,
            article_trending: config.article_trending,
        }
    }
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self::from(&HomeConfig::default())
    }
}

/// A single path segment that could name a post or category upstream.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug
            .chars()
            .any(|c| c == '/' || c.is_whitespace() || c.is_control())
}

/// Resolves `slug` against the shared category/post namespace. Categories
/// are probed first and win any collision; the post probe only runs when no
/// category matched.
pub async fn resolve(source: &dyn ContentSource, slug: &str, options: ResolveOptions) -> Resolution {
    if !is_valid_slug(slug) {
        debug!("Rejecting malformed slug {:?}", slug);
        return Resolution::NotFound;
    }

    if let Some(category) = source.category_by_slug(slug).await {
        debug!("Slug '{}' resolved to category {}", slug, category.id);
        let posts = source
            .all_posts(PostQuery::in_category(category.id, options.category_posts))
            .await;
        return Resolution::Category { category, posts };
    }

    if let Some(post) = source.post_by_slug(slug).await {
        debug!("Slug '{}' resolved to post {}", slug, post.id);
        let trending = source
            .all_posts(PostQuery::recent(options.article_trending))
            .await
            .into_iter()
            .filter(|p| p.id != post.id)
            .collect();
        return Resolution::Article { post, trending };
    }

    Resolution::NotFound
}
