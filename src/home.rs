use crate::{HomeConfig, content::PostData};
use serde::Serialize;
use std::collections::HashSet;

/// Posts assigned to each block of the home page. No post id appears in
/// more than one block.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HomeSections {
    pub main_featured: Option<PostData>,
    pub side_featured: Vec<PostData>,
    pub category_sections: Vec<CategorySection>,
    pub trending: Vec<PostData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySection {
    pub title: String,
    pub url: String,
    pub posts: Vec<PostData>,
}

impl HomeSections {
    pub fn assigned_ids(&self) -> Vec<u64> {
        self.main_featured
            .iter()
            .chain(&self.side_featured)
            .chain(self.category_sections.iter().flat_map(|s| &s.posts))
            .chain(&self.trending)
            .map(|p| p.id)
            .collect()
    }
}

/// Takes up to `count` posts matching `predicate` that are not in `shown`,
/// in batch order, and records them in `shown`.
pub fn take_unique<F>(
    posts: &[PostData],
    shown: &mut HashSet<u64>,
    count: usize,
    predicate: F,
) -> Vec<PostData>
where
    F: Fn(&PostData) -> bool,
{
    let mut taken = Vec::with_capacity(count);
    for post in posts {
        if taken.len() == count {
            break;
        }
        if !shown.contains(&post.id) && predicate(post) {
            shown.insert(post.id);
            taken.push(post.clone());
        }
    }
    taken
}

fn section_url(title: &str) -> String {
    format!("/{}", title.to_lowercase().replace(' ', "-"))
}

/// Splits one batch of recent posts across the home page blocks in fixed
/// priority order: main feature (sticky first), side features, the
/// configured category sections, then trending.
pub fn allocate_home(posts: &[PostData], config: &HomeConfig) -> HomeSections {
    let mut shown = HashSet::new();

    let main_featured = take_unique(posts, &mut shown, 1, |p| p.sticky)
        .into_iter()
        .next()
        .or_else(|| take_unique(posts, &mut shown, 1, |_| true).into_iter().next());

    let side_featured = take_unique(posts, &mut shown, config.side_featured, |_| true);

    let category_sections = config
        .sections
        .iter()
        .filter_map(|section| {
            let section_posts = take_unique(posts, &mut shown, config.per_section, |p| {
                p.in_any_category(section.slugs.as_slice())
            });
            (!section_posts.is_empty()).then(|| CategorySection {
                title: section.title.clone(),
                url: section_url(&section.title),
                posts: section_posts,
            })
        })
        .collect();

    let trending = take_unique(posts, &mut shown, config.trending, |_| true);

    HomeSections {
        main_featured,
        side_featured,
        category_sections,
        trending,
    }
}
