use super::{
    sanitize::{sanitize_text, strip_tags},
    types::*,
};
use crate::cms::{RawCategory, RawPost, RawTerm};
use regex::{Captures, Regex};
use std::sync::LazyLock;

pub const DEFAULT_AUTHOR_NAME: &str = "Editorial Team";
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1529107386315-e1a2ed48a620";
pub const EXCERPT_MAX_CHARS: usize = 160;
pub const ELLIPSIS: &str = "...";
const AVATAR_SIZE: &str = "96";

static NUMERIC_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(\d+);").expect("valid reference regex"));

/// Decodes decimal character references and exactly four named entities
/// (`&amp;`, `&lt;`, `&gt;`, `&quot;`). Everything else passes through
/// literally. Replacements run in sequence, so `&amp;lt;` ends up as `<`.
pub fn decode_html(input: &str) -> String {
    let decoded = NUMERIC_REFERENCE.replace_all(input, |caps: &Captures| {
        caps[1]
            .parse::<u32>()
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    decoded
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
}

/// Strips tags, keeps the first 160 characters, appends "..." whether or not
/// anything was cut, then reduces the result to plain text.
///
/// A `<` left over after stripping never closes into a tag, so it is escaped
/// before the text pass and comes back as a literal `<`.
pub fn make_excerpt(raw: &str) -> String {
    let stripped = strip_tags(raw);
    let truncated: String = stripped.chars().take(EXCERPT_MAX_CHARS).collect();
    let mut excerpt = truncated.replace('<', "&lt;");
    excerpt.push_str(ELLIPSIS);
    sanitize_text(&excerpt)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn normalize_term(term: &RawTerm) -> CategoryRef {
    CategoryRef {
        id: term.id,
        name: decode_html(term.name.as_deref().unwrap_or_default()),
        slug: term.slug.clone().unwrap_or_default(),
    }
}

/// Maps an upstream post onto `PostData`. Pure and total: absent fields get
/// their fixed fallbacks and the input is never modified.
pub fn normalize_post(raw: &RawPost) -> PostData {
    let embedded = raw.embedded.as_ref();
    let media = embedded.and_then(|e| e.featured_media.first());
    let author = embedded.and_then(|e| e.author.first());
    let terms: &[RawTerm] = embedded
        .and_then(|e| e.terms.first())
        .map(Vec::as_slice)
        .unwrap_or_default();

    let raw_title = raw.title.as_ref().map(|t| t.rendered.as_str()).unwrap_or_default();
    let title = decode_html(raw_title);

    let image = FeaturedImage {
        url: media
            .and_then(|m| non_empty(m.source_url.as_deref()))
            .unwrap_or(PLACEHOLDER_IMAGE_URL)
            .to_string(),
        alt: media
            .and_then(|m| non_empty(m.alt_text.as_deref()))
            .unwrap_or(raw_title)
            .to_string(),
        caption: media
            .and_then(|m| m.caption.as_ref())
            .and_then(|c| non_empty(Some(c.rendered.as_str())))
            .map(decode_html),
    };

    let author = Author {
        name: author
            .and_then(|a| non_empty(a.name.as_deref()))
            .unwrap_or(DEFAULT_AUTHOR_NAME)
            .to_string(),
        avatar: author.and_then(|a| a.avatar_urls.get(AVATAR_SIZE).cloned()),
    };

    let seo = Seo {
        title: non_empty(raw.rank_math_title.as_deref())
            .map(decode_html)
            .unwrap_or_else(|| title.clone()),
        description: non_empty(raw.rank_math_description.as_deref())
            .map(decode_html)
            .unwrap_or_default(),
        full_head: non_empty(raw.yoast_head.as_deref()).map(str::to_string),
    };

    PostData {
        id: raw.id,
        slug: raw.slug.clone().unwrap_or_default(),
        excerpt: make_excerpt(
            raw.excerpt
                .as_ref()
                .map(|e| e.rendered.as_str())
                .unwrap_or_default(),
        ),
        content: raw
            .content
            .as_ref()
            .map(|c| c.rendered.clone())
            .unwrap_or_default(),
        date: raw.date.clone().unwrap_or_default(),
        title,
        author,
        image,
        categories: terms.iter().map(normalize_term).collect(),
        seo,
        sticky: raw.sticky.unwrap_or(false),
    }
}

pub fn normalize_category(raw: &RawCategory) -> Category {
    Category {
        id: raw.id,
        name: decode_html(raw.name.as_deref().unwrap_or_default()),
        slug: raw.slug.clone().unwrap_or_default(),
        count: raw.count,
        description: non_empty(raw.description.as_deref()).map(decode_html),
    }
}
