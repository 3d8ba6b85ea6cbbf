use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod ads;
pub mod cms;
pub mod content;
pub mod home;
pub mod pages;
pub mod resolver;
pub mod robots;
pub mod seo;
pub mod sitemap;
pub mod startup_checks;
pub mod static_files;
pub mod subscribe;
pub mod templating;

pub use ads::AdsConfig;

pub const DEFAULT_SITE_URL: &str = "https://thebharatmirror.com";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub cms: CmsConfig,
    pub templates: TemplateConfig,
    pub static_files: StaticConfig,
    pub ads: AdsConfig,
    pub home: HomeConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Publication name, also used in the news sitemap.
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub language: String,
    pub log_level: String,
    pub base_url: Option<String>,
}

impl AppConfig {
    /// Absolute site origin without a trailing slash.
    pub fn site_url(&self) -> &str {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_SITE_URL)
            .trim_end_matches('/')
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CmsConfig {
    /// REST API origin, e.g. `https://cms.example.com/wp-json`.
    pub api_url: Option<String>,
    pub subscribe_path: String,
    pub timeout_seconds: u64,
    pub cache_max_entries: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticConfig {
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HomeConfig {
    /// Recent posts fetched once per home page render.
    pub batch_size: u32,
    pub side_featured: usize,
    pub per_section: usize,
    pub trending: usize,
    /// Posts listed on a category page.
    pub category_posts: u32,
    /// Recent posts fetched for the article page rail.
    pub article_trending: u32,
    pub sections: Vec<HomeSectionConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct HomeSectionConfig {
    pub title: String,
    /// Category slugs that feed this block.
    pub slugs: Vec<String>,
}

impl HomeSectionConfig {
    fn new(title: &str, slugs: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            slugs: slugs.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "The Bharat Mirror".to_string(),
            tagline: "India's Premier Digital News Platform".to_string(),
            description: "Breaking news, analysis and features from India and the world."
                .to_string(),
            language: "en".to_string(),
            log_level: "info".to_string(),
            base_url: None,
        }
    }
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            subscribe_path: "/bm/v1/subscribe".to_string(),
            timeout_seconds: 10,
            cache_max_entries: 512,
        }
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("templates"),
        }
    }
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("static"),
        }
    }
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            side_featured: 4,
            per_section: 4,
            trending: 5,
            category_posts: 20,
            article_trending: 5,
            sections: vec![
                HomeSectionConfig::new("India", &["india"]),
                HomeSectionConfig::new("Business", &["business"]),
                HomeSectionConfig::new("Sport", &["sport", "sports"]),
                HomeSectionConfig::new("World", &["world"]),
            ],
        }
    }
}

impl Config {
    /// Applies `WORDPRESS_API_URL` and `SITE_URL` from the environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_url) = lookup("WORDPRESS_API_URL").filter(|v| !v.trim().is_empty()) {
            self.cms.api_url = Some(api_url);
        }
        if let Some(site_url) = lookup("SITE_URL").filter(|v| !v.trim().is_empty()) {
            self.app.base_url = Some(site_url);
        }
    }
}

use axum::{
    Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
};
use std::sync::Arc;
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("CMS client error: {0}")]
    CmsError(#[from] cms::CmsError),
}

#[derive(Clone)]
pub struct AppState {
    pub template_engine: Arc<templating::TemplateEngine>,
    pub static_assets: static_files::StaticAssets,
    pub content: content::DynContentSource,
    pub cms: cms::CmsClient,
    pub ads: ads::DynAdProvider,
    pub config: Config,
}

#[derive(Debug, Deserialize)]
struct StaticQuery {
    v: Option<String>,
}

async fn static_file_handler(
    State(app_state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<StaticQuery>,
) -> impl IntoResponse {
    app_state
        .static_assets
        .serve(&path, query.v.is_some())
        .await
}

pub async fn create_app(config: Config) -> Result<Router, AppError> {
    let cms = cms::CmsClient::new(&config.cms)?;
    let content: content::DynContentSource =
        Arc::new(content::WordPressSource::new(cms.clone()));

    let template_engine = Arc::new(templating::TemplateEngine::new(
        config.templates.directory.clone(),
    ));

    let static_assets = static_files::StaticAssets::new(config.static_files.directory.clone());
    static_assets.scan_stylesheets().await;

    let ad_provider = ads::create_provider(&config.ads);
    tracing::info!("Using ad provider: {}", ad_provider.name());

    let app_state = AppState {
        template_engine,
        static_assets,
        content,
        cms,
        ads: ad_provider,
        config,
    };

    let router = Router::new()
        .route("/", get(pages::home_handler))
        .route("/sitemap.xml", get(pages::sitemap_handler))
        .route("/sitemap", get(pages::sitemap_handler))
        .route("/news-sitemap.xml", get(pages::news_sitemap_handler))
        .route("/news-sitemap", get(pages::news_sitemap_handler))
        .route("/api/subscribe", post(subscribe::subscribe_handler))
        .route("/subscribe", post(subscribe::subscribe_handler))
        .route("/robots.txt", get(robots::robots_txt_handler))
        .route("/static/{*path}", get(static_file_handler))
        .route("/{slug}", get(pages::slug_handler))
        .fallback(pages::not_found_handler)
        .layer(
            ServiceBuilder::new().layer(
                TraceLayer::new_for_http()
                    .make_span_with(|request: &axum::http::Request<_>| {
                        let method = request.method();
                        let uri = request.uri();
                        let matched_path = request
                            .extensions()
                            .get::<axum::extract::MatchedPath>()
                            .map(|matched_path| matched_path.as_str());

                        tracing::info_span!(
                            "http_request",
                            method = %method,
                            uri = %uri,
                            matched_path,
                        )
                    })
                    .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
                        let method = request.method();
                        let uri = request.uri();
                        let headers = request.headers();
                        let user_agent = headers
                            .get("user-agent")
                            .and_then(|h| h.to_str().ok())
                            .unwrap_or("-");
                        let referer = headers
                            .get("referer")
                            .and_then(|h| h.to_str().ok())
                            .unwrap_or("-");

                        tracing::info!(
                            target: "access_log",
                            method = %method,
                            path = %uri.path(),
                            query = ?uri.query(),
                            user_agent = %user_agent,
                            referer = %referer,
                            "request"
                        );
                    })
                    .on_response(
                        |response: &axum::http::Response<_>,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            let status = response.status();
                            let size = response
                                .headers()
                                .get("content-length")
                                .and_then(|h| h.to_str().ok())
                                .unwrap_or("-");

                            tracing::info!(
                                target: "access_log",
                                status = %status,
                                size = %size,
                                latency_ms = %latency.as_millis(),
                                "response"
                            );
                        },
                    ),
            ),
        )
        .with_state(app_state);

    Ok(router)
}
