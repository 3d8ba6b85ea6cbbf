use crate::{
    AppConfig,
    content::{Category, PostData},
};
use serde::Serialize;

/// Head metadata for a rendered page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub og_type: String,
    pub image: Option<String>,
    pub published_time: Option<String>,
    pub author: Option<String>,
    pub twitter_card: String,
    /// Upstream SEO plugin markup. When present it is emitted verbatim in
    /// place of the generated head tags.
    pub full_head: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub label: String,
    pub url: Option<String>,
}

impl PageMeta {
    fn website(title: String, description: String, canonical: String) -> Self {
        Self {
            title,
            description,
            canonical,
            og_type: "website".to_string(),
            image: None,
            published_time: None,
            author: None,
            twitter_card: "summary".to_string(),
            full_head: None,
        }
    }

    pub fn home(app: &AppConfig) -> Self {
        Self::website(
            format!("{} - {}", app.name, app.tagline),
            app.description.clone(),
            app.site_url().to_string(),
        )
    }

    pub fn category(app: &AppConfig, category: &Category) -> Self {
        Self::website(
            format!("{} News - {}", category.name, app.name),
            format!(
                "Latest {} news and updates from {}.",
                category.name, app.name
            ),
            format!("{}/{}", app.site_url(), category.slug),
        )
    }

    pub fn article(app: &AppConfig, post: &PostData) -> Self {
        let description = if post.seo.description.is_empty() {
            post.excerpt.clone()
        } else {
            post.seo.description.clone()
        };

        Self {
            title: format!("{} | {}", post.seo.title, app.name),
            description,
            canonical: format!("{}/{}", app.site_url(), post.slug),
            og_type: "article".to_string(),
            image: Some(post.image.url.clone()),
            published_time: post.published_at().map(|d| d.to_rfc3339()),
            author: Some(post.author.name.clone()),
            twitter_card: "summary_large_image".to_string(),
            full_head: post.seo.full_head.clone(),
        }
    }

    pub fn not_found(app: &AppConfig) -> Self {
        Self::website(
            format!("Not Found | {}", app.name),
            app.description.clone(),
            app.site_url().to_string(),
        )
    }
}

/// Home, then the post's first category when it has one, then the post.
pub fn article_breadcrumbs(post: &PostData) -> Vec<Breadcrumb> {
    let mut trail = vec![Breadcrumb {
        label: "Home".to_string(),
        url: Some("/".to_string()),
    }];

    if let Some(category) = post.primary_category() {
        trail.push(Breadcrumb {
            label: category.name.clone(),
            url: Some(format!("/{}", category.slug)),
        });
    }

    trail.push(Breadcrumb {
        label: post.title.clone(),
        url: None,
    });
    trail
}
