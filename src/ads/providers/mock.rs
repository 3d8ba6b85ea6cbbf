use crate::ads::{Ad, AdError, AdFormat, AdPosition, AdProvider, AdSettings};
use async_trait::async_trait;

const ADVERTISE_URL: &str = "https://thebharatmirror.com/advertise";

/// Serves the two house placeholder ads until a real ad backend exists.
pub struct MockAdProvider {
    enabled: bool,
    ads: Vec<Ad>,
}

impl MockAdProvider {
    pub fn new(enabled: bool) -> Self {
        let ads = vec![
            Ad {
                id: 1,
                image_url: "https://placehold.co/728x90/black/white?text=Ad+Space+Available"
                    .to_string(),
                target_url: ADVERTISE_URL.to_string(),
                alt_text: "Advertise with us".to_string(),
                format: AdFormat::Leaderboard,
            },
            Ad {
                id: 2,
                image_url: "https://placehold.co/300x250/black/white?text=Ad+Space".to_string(),
                target_url: ADVERTISE_URL.to_string(),
                alt_text: "Advertise with us".to_string(),
                format: AdFormat::Sidebar,
            },
        ];

        Self { enabled, ads }
    }
}

impl Default for MockAdProvider {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl AdProvider for MockAdProvider {
    async fn list_ads(&self, position: AdPosition) -> Result<Vec<Ad>, AdError> {
        let format = position.format();
        Ok(self
            .ads
            .iter()
            .filter(|ad| ad.format == format)
            .cloned()
            .collect())
    }

    async fn settings(&self) -> Result<AdSettings, AdError> {
        Ok(AdSettings {
            ads_enabled: self.enabled,
        })
    }

    fn name(&self) -> &str {
        "Mock Ad Provider"
    }
}
