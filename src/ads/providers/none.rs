use crate::ads::{Ad, AdError, AdPosition, AdProvider, AdSettings};
use async_trait::async_trait;

pub struct NoAdsProvider;

#[async_trait]
impl AdProvider for NoAdsProvider {
    async fn list_ads(&self, _position: AdPosition) -> Result<Vec<Ad>, AdError> {
        Ok(Vec::new())
    }

    async fn settings(&self) -> Result<AdSettings, AdError> {
        Ok(AdSettings { ads_enabled: false })
    }

    fn name(&self) -> &str {
        "No Ads"
    }
}
