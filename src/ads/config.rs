use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdsConfig {
    /// Feature flag; when false every page renders without ad slots.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(flatten)]
    pub provider: AdProviderConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum AdProviderConfig {
    Mock,
    None,
}

fn default_enabled() -> bool {
    true
}

impl Default for AdsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: AdProviderConfig::Mock,
        }
    }
}
