use axum::{
    body::Body,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::{
    collections::HashMap,
    fs::Metadata,
    path::{Component, Path, PathBuf},
    sync::Arc,
    time::UNIX_EPOCH,
};
use tokio::{fs::File, sync::RwLock};
use tokio_util::io::ReaderStream;
use tracing::{debug, error, info};

const IMMUTABLE: &str = "public, max-age=31536000, immutable";
const STYLESHEET: &str = "public, max-age=300, must-revalidate";
const DEFAULT: &str = "public, max-age=3600";

/// Site assets under the static directory: the stylesheet, the logo and a
/// `robots.txt` override.
#[derive(Clone)]
pub struct StaticAssets {
    root: PathBuf,
    stylesheet_versions: Arc<RwLock<HashMap<String, u64>>>,
}

impl StaticAssets {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            stylesheet_versions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Records the mtime of every top-level stylesheet, used as its cache
    /// busting version.
    pub async fn scan_stylesheets(&self) {
        let mut versions = HashMap::new();

        match tokio::fs::read_dir(&self.root).await {
            Ok(mut entries) => {
                while let Ok(Some(entry)) = entries.next_entry().await {
                    let path = entry.path();
                    if path.extension().is_none_or(|ext| ext != "css") {
                        continue;
                    }
                    let Ok(metadata) = entry.metadata().await else {
                        continue;
                    };
                    if let (Some(name), Some(version)) =
                        (path.file_name().and_then(|n| n.to_str()), mtime_secs(&metadata))
                    {
                        debug!("Stylesheet version: {} -> {}", name, version);
                        versions.insert(name.to_string(), version);
                    }
                }
            }
            Err(e) => debug!("Cannot scan static directory {:?}: {}", self.root, e),
        }

        info!("Found {} stylesheet(s) in {:?}", versions.len(), self.root);
        *self.stylesheet_versions.write().await = versions;
    }

    /// `url` with `?v={mtime}` appended when it names a scanned stylesheet.
    pub async fn versioned_url(&self, url: &str) -> String {
        let name = url.rsplit('/').next().unwrap_or(url);
        match self.stylesheet_versions.read().await.get(name) {
            Some(version) => format!("{}?v={}", url, version),
            None => url.to_string(),
        }
    }

    /// Resolves `path` inside the static root. Anything other than plain
    /// name components is refused.
    fn locate(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
            .then(|| self.root.join(relative))
    }

    pub async fn serve(&self, path: &str, versioned: bool) -> Response {
        let Some(file_path) = self.locate(path) else {
            error!("Rejected static path: {:?}", path);
            return (StatusCode::FORBIDDEN, "Forbidden").into_response();
        };

        let metadata = match tokio::fs::metadata(&file_path).await {
            Ok(m) if m.is_file() => m,
            _ => return (StatusCode::NOT_FOUND, "File not found").into_response(),
        };
        let file = match File::open(&file_path).await {
            Ok(file) => file,
            Err(e) => {
                debug!("Failed to open {:?}: {}", file_path, e);
                return (StatusCode::NOT_FOUND, "File not found").into_response();
            }
        };

        let mime = mime_guess::from_path(&file_path).first_or_octet_stream();
        let cache_control = if versioned {
            IMMUTABLE
        } else if mime == mime_guess::mime::TEXT_CSS {
            STYLESHEET
        } else {
            DEFAULT
        };

        let mut response = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, mime.as_ref())
            .header(header::CACHE_CONTROL, cache_control);

        if let (Ok(modified), Some(secs)) = (metadata.modified(), mtime_secs(&metadata)) {
            response = response
                .header(header::LAST_MODIFIED, httpdate::fmt_http_date(modified))
                .header(header::ETAG, format!("\"{}-{}\"", secs, metadata.len()));
        }

        response
            .body(Body::from_stream(ReaderStream::new(file)))
            .unwrap_or_else(|e| {
                error!("Failed to build static response: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            })
    }
}

fn mtime_secs(metadata: &Metadata) -> Option<u64> {
    metadata
        .modified()
        .ok()?
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs())
}
