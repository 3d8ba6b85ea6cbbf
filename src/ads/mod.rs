pub mod config;
pub mod error;
pub mod providers;
pub mod types;

pub use config::*;
pub use error::*;
pub use types::*;

use async_trait::async_trait;
use futures::future::join_all;
use rand::seq::IndexedRandom;
use std::sync::Arc;
use tracing::warn;

#[async_trait]
pub trait AdProvider: Send + Sync {
    async fn list_ads(&self, position: AdPosition) -> Result<Vec<Ad>, AdError>;
    async fn settings(&self) -> Result<AdSettings, AdError>;
    fn name(&self) -> &str;
}

pub type DynAdProvider = Arc<dyn AdProvider>;

pub const HOME_POSITIONS: &[AdPosition] = &[
    AdPosition::TopBanner,
    AdPosition::MidContent,
    AdPosition::Sidebar,
    AdPosition::FooterBanner,
];

pub const CATEGORY_POSITIONS: &[AdPosition] = &[AdPosition::CategoryTop, AdPosition::Leaderboard];

pub const ARTICLE_POSITIONS: &[AdPosition] = &[
    AdPosition::ArticleTop,
    AdPosition::ArticleBottom,
    AdPosition::SidebarMid,
    AdPosition::SidebarBottom,
];

pub fn create_provider(config: &AdsConfig) -> DynAdProvider {
    match config.provider {
        AdProviderConfig::Mock => Arc::new(providers::mock::MockAdProvider::new(config.enabled)),
        AdProviderConfig::None => Arc::new(providers::none::NoAdsProvider),
    }
}

/// Loads settings and every position's ads concurrently, then picks one ad
/// at random per position. Any provider failure only empties the affected
/// slot; it never fails the page.
pub async fn load_ad_slots(provider: &dyn AdProvider, positions: &[AdPosition]) -> AdSlots {
    let (settings, listings) = tokio::join!(
        provider.settings(),
        join_all(
            positions
                .iter()
                .map(|position| async move { (*position, provider.list_ads(*position).await) })
        )
    );

    let mut slots = AdSlots::default();

    match settings {
        Ok(settings) if settings.ads_enabled => {}
        Ok(_) => return slots,
        Err(e) => {
            warn!("Failed to load ad settings from {}: {}", provider.name(), e);
            return slots;
        }
    }

    for (position, result) in listings {
        match result {
            Ok(ads) => {
                if let Some(ad) = ads.choose(&mut rand::rng()) {
                    slots.insert(position, ad.clone());
                }
            }
            Err(e) => warn!(
                "Failed to load ads for position {}: {}",
                position.as_str(),
                e
            ),
        }
    }

    slots
}
