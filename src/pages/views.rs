use crate::{
    AppConfig,
    content::{Category, PostData, sanitize::sanitize_text},
    home::HomeSections,
};
use serde::Serialize;

/// Posts shown before the in-list ad on a category page.
pub const CATEGORY_LEAD_COUNT: usize = 6;

const FALLBACK_CATEGORY_NAME: &str = "News";
const FALLBACK_CATEGORY_SLUG: &str = "news";

/// A post plus the derived fields cards and article pages display.
#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    #[serde(flatten)]
    pub post: PostData,
    pub url: String,
    pub date_formatted: String,
    pub category_name: String,
    pub category_slug: String,
    /// Caption reduced to plain text.
    pub caption_text: Option<String>,
}

impl From<&PostData> for PostCard {
    fn from(post: &PostData) -> Self {
        let date_formatted = post
            .published_at()
            .map(|date| date.format("%B %-d, %Y").to_string())
            .unwrap_or_else(|| post.date.clone());

        let (category_name, category_slug) = post
            .primary_category()
            .map(|c| (c.name.clone(), c.slug.clone()))
            .unwrap_or_else(|| {
                (
                    FALLBACK_CATEGORY_NAME.to_string(),
                    FALLBACK_CATEGORY_SLUG.to_string(),
                )
            });

        let caption_text = post
            .image
            .caption
            .as_deref()
            .map(sanitize_text)
            .filter(|text| !text.is_empty());

        Self {
            post: post.clone(),
            url: format!("/{}", post.slug),
            date_formatted,
            category_name,
            category_slug,
            caption_text,
        }
    }
}

pub fn cards(posts: &[PostData]) -> Vec<PostCard> {
    posts.iter().map(PostCard::from).collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub title: String,
    pub url: String,
    pub posts: Vec<PostCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub main_featured: Option<PostCard>,
    pub side_featured: Vec<PostCard>,
    pub sections: Vec<SectionView>,
    pub trending: Vec<PostCard>,
    pub is_empty: bool,
}

impl From<&HomeSections> for HomeView {
    fn from(sections: &HomeSections) -> Self {
        Self {
            main_featured: sections.main_featured.as_ref().map(PostCard::from),
            side_featured: cards(&sections.side_featured),
            sections: sections
                .category_sections
                .iter()
                .map(|section| SectionView {
                    title: section.title.clone(),
                    url: section.url.clone(),
                    posts: cards(&section.posts),
                })
                .collect(),
            trending: cards(&sections.trending),
            is_empty: sections.main_featured.is_none(),
        }
    }
}

/// Category listing split around the in-list ad slot.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub lead: Vec<PostCard>,
    pub show_mid_ad: bool,
    pub rest: Vec<PostCard>,
    pub is_empty: bool,
    pub empty_message: String,
}

impl CategoryView {
    pub fn new(category: &Category, posts: &[PostData]) -> Self {
        let split = posts.len().min(CATEGORY_LEAD_COUNT);
        let (lead, rest) = posts.split_at(split);

        let description = category
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| {
                format!(
                    "Latest updates and breaking news in the world of {}.",
                    category.name
                )
            });

        Self {
            name: category.name.clone(),
            slug: category.slug.clone(),
            description,
            lead: cards(lead),
            show_mid_ad: posts.len() > CATEGORY_LEAD_COUNT,
            rest: cards(rest),
            is_empty: posts.is_empty(),
            empty_message: format!("No articles found in {}.", category.name),
        }
    }
}

/// Site-wide values every template can read as `site`.
#[derive(Debug, Clone, Serialize)]
pub struct SiteView {
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub language: String,
    pub url: String,
    pub stylesheet: String,
    pub year: i32,
}

impl SiteView {
    pub fn new(app: &AppConfig, stylesheet: String, year: i32) -> Self {
        Self {
            name: app.name.clone(),
            tagline: app.tagline.clone(),
            description: app.description.clone(),
            language: app.language.clone(),
            url: app.site_url().to_string(),
            stylesheet,
            year,
        }
    }
}
