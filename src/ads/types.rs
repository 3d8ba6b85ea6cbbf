use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};
use std::collections::HashMap;

/// Creative sizes an ad can be booked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdFormat {
    /// 728x90 banner
    Leaderboard,
    /// 300x250 rectangle
    Sidebar,
}

/// Named places on a page where an ad can be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdPosition {
    TopBanner,
    MidContent,
    FooterBanner,
    CategoryTop,
    Leaderboard,
    ArticleTop,
    ArticleBottom,
    Sidebar,
    SidebarMid,
    SidebarBottom,
}

impl AdPosition {
    pub const ALL: [AdPosition; 10] = [
        AdPosition::TopBanner,
        AdPosition::MidContent,
        AdPosition::FooterBanner,
        AdPosition::CategoryTop,
        AdPosition::Leaderboard,
        AdPosition::ArticleTop,
        AdPosition::ArticleBottom,
        AdPosition::Sidebar,
        AdPosition::SidebarMid,
        AdPosition::SidebarBottom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdPosition::TopBanner => "top-banner",
            AdPosition::MidContent => "mid-content",
            AdPosition::FooterBanner => "footer-banner",
            AdPosition::CategoryTop => "category-top",
            AdPosition::Leaderboard => "leaderboard",
            AdPosition::ArticleTop => "article-top",
            AdPosition::ArticleBottom => "article-bottom",
            AdPosition::Sidebar => "sidebar",
            AdPosition::SidebarMid => "sidebar-mid",
            AdPosition::SidebarBottom => "sidebar-bottom",
        }
    }

    /// Template key, e.g. `top_banner`.
    pub fn slot_key(&self) -> String {
        self.as_str().replace('-', "_")
    }

    pub fn format(&self) -> AdFormat {
        match self {
            AdPosition::TopBanner
            | AdPosition::MidContent
            | AdPosition::FooterBanner
            | AdPosition::CategoryTop
            | AdPosition::Leaderboard
            | AdPosition::ArticleTop
            | AdPosition::ArticleBottom => AdFormat::Leaderboard,
            AdPosition::Sidebar | AdPosition::SidebarMid | AdPosition::SidebarBottom => {
                AdFormat::Sidebar
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ad {
    pub id: u64,
    pub image_url: String,
    pub target_url: String,
    pub alt_text: String,
    pub format: AdFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdSettings {
    pub ads_enabled: bool,
}

/// One chosen ad per filled position, keyed by `AdPosition::slot_key`.
///
/// Serializes every known position, with `null` for empty slots, so
/// templates can test any slot without tripping on a missing key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdSlots(HashMap<String, Ad>);

impl Serialize for AdSlots {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(AdPosition::ALL.len()))?;
        for position in AdPosition::ALL {
            let key = position.slot_key();
            map.serialize_entry(&key, &self.0.get(&key))?;
        }
        map.end()
    }
}

impl AdSlots {
    pub fn insert(&mut self, position: AdPosition, ad: Ad) {
        self.0.insert(position.slot_key(), ad);
    }

    pub fn get(&self, position: AdPosition) -> Option<&Ad> {
        self.0.get(&position.slot_key())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
