use crate::Config;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum StartupCheckError {
    #[error("CMS API URL is not configured (set cms.api_url or WORDPRESS_API_URL)")]
    ApiUrlMissing,

    #[error("CMS API URL is invalid: {0}")]
    ApiUrlInvalid(String),

    #[error("Templates directory does not exist: {0}")]
    TemplateDirectoryMissing(String),

    #[error("Static files directory does not exist: {0}")]
    StaticDirectoryMissing(String),

    #[error("Site base URL is not configured, using {0}")]
    BaseUrlNotConfigured(String),
}

impl StartupCheckError {
    /// Critical failures stop the server from starting.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            StartupCheckError::ApiUrlMissing | StartupCheckError::ApiUrlInvalid(_)
        )
    }
}

pub async fn perform_startup_checks(config: &Config) -> Result<(), Vec<StartupCheckError>> {
    let mut errors = Vec::new();

    info!("Performing startup checks...");

    match config.cms.api_url.as_deref().map(str::trim) {
        None | Some("") => {
            error!("CMS API URL is not configured");
            errors.push(StartupCheckError::ApiUrlMissing);
        }
        Some(api_url) => match url::Url::parse(api_url) {
            Ok(_) => info!("CMS API URL: {}", api_url),
            Err(e) => {
                error!("CMS API URL {} is invalid: {}", api_url, e);
                errors.push(StartupCheckError::ApiUrlInvalid(format!("{}: {}", api_url, e)));
            }
        },
    }

    let templates_dir = Path::new(&config.templates.directory);
    if !templates_dir.exists() {
        warn!("Templates directory does not exist: {:?}", templates_dir);
        warn!("This may cause issues with page rendering");
        errors.push(StartupCheckError::TemplateDirectoryMissing(
            templates_dir.display().to_string(),
        ));
    } else {
        info!("Templates directory exists: {:?}", templates_dir);
    }

    let static_dir = Path::new(&config.static_files.directory);
    if !static_dir.exists() {
        warn!("Static files directory does not exist: {:?}", static_dir);
        errors.push(StartupCheckError::StaticDirectoryMissing(
            static_dir.display().to_string(),
        ));
    } else {
        info!("Static files directory exists: {:?}", static_dir);
    }

    if config.app.base_url.is_none() {
        warn!(
            "app.base_url is not set, canonical URLs will use {}",
            config.app.site_url()
        );
        errors.push(StartupCheckError::BaseUrlNotConfigured(
            config.app.site_url().to_string(),
        ));
    }

    if errors.is_empty() {
        info!("All startup checks passed");
        Ok(())
    } else {
        error!("Startup checks failed with {} errors", errors.len());
        Err(errors)
    }
}
