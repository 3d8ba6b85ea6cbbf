use super::{cache::ResponseCache, error::CmsError};
use crate::CmsConfig;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

/// Thin HTTP client for the headless CMS REST API.
///
/// `fetch` never fails: transport errors and non-success statuses are logged
/// and surface as `None`, so page composition can degrade instead of crash.
#[derive(Clone)]
pub struct CmsClient {
    http: Client,
    api_url: String,
    cache: ResponseCache,
}

/// Status and raw body of a forwarded write request.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

impl CmsClient {
    pub fn new(config: &CmsConfig) -> Result<Self, CmsError> {
        let api_url = config
            .api_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(CmsError::MissingApiUrl)?;

        Url::parse(api_url)?;

        let http = Client::builder()
            .user_agent(concat!("mirrorfront/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache: ResponseCache::new(config.cache_max_entries),
        })
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Appends `endpoint` to the configured origin and encodes `params` as
    /// query pairs, preserving their order.
    pub fn endpoint_url(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Url, CmsError> {
        let mut url = Url::parse(&format!("{}{}", self.api_url, endpoint))?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// GETs `endpoint` and returns the parsed JSON body, or `None` when
    /// anything goes wrong. Successful bodies are cached for `revalidate`.
    pub async fn fetch(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        revalidate: Duration,
    ) -> Option<Value> {
        let url = match self.endpoint_url(endpoint, params) {
            Ok(url) => url,
            Err(e) => {
                error!("Failed to build API URL for {}: {}", endpoint, e);
                return None;
            }
        };

        let key = url.to_string();
        if let Some(value) = self.cache.get(&key).await {
            return Some(value);
        }

        match self.get_json(url).await {
            Ok(value) => {
                debug!("Fetched {}", key);
                self.cache.insert(key, value.clone(), revalidate).await;
                Some(value)
            }
            Err(e) => {
                error!("Failed to fetch API: {} - {}", key, e);
                None
            }
        }
    }

    async fn get_json(&self, url: Url) -> Result<Value, CmsError> {
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CmsError::BadStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.json::<Value>().await?)
    }

    /// POSTs a JSON body and hands back whatever the upstream replied,
    /// including non-success statuses. Only transport failures are errors.
    pub async fn post_json(&self, endpoint: &str, body: &Value) -> Result<UpstreamReply, CmsError> {
        let url = self.endpoint_url(endpoint, &[])?;
        let response = self.http.post(url).json(body).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        Ok(UpstreamReply {
            status,
            body: body.to_vec(),
        })
    }
}
