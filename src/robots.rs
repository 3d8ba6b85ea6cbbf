use crate::AppState;
use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// Handler for /robots.txt
/// A `robots.txt` in the static directory wins over the generated default.
pub async fn robots_txt_handler(State(app_state): State<AppState>) -> Response {
    let custom_robots_path = app_state.static_assets.root().join("robots.txt");

    if custom_robots_path.exists() {
        match tokio::fs::read_to_string(&custom_robots_path).await {
            Ok(content) => {
                return (
                    StatusCode::OK,
                    [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                    content,
                )
                    .into_response();
            }
            Err(e) => {
                tracing::error!("Failed to read custom robots.txt: {}", e);
            }
        }
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        default_robots(app_state.config.app.site_url()),
    )
        .into_response()
}

pub fn default_robots(site_url: &str) -> String {
    format!(
        "User-agent: *\n\
         Allow: /\n\
         Disallow: /admin/\n\
         \n\
         Sitemap: {site_url}/sitemap.xml\n\
         Sitemap: {site_url}/news-sitemap.xml\n"
    )
}
