use super::views::{CategoryView, HomeView, PostCard, SiteView, cards};
use crate::{
    AppState,
    ads::{self, AdSlots},
    content::PostQuery,
    home::allocate_home,
    resolver::{Resolution, ResolveOptions, resolve},
    seo::{Breadcrumb, PageMeta, article_breadcrumbs},
    sitemap::{self, NewsPublication},
};
use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{Datelike, Utc};
use serde::Serialize;
use tracing::error;

const INDEX_TEMPLATE: &str = "pages/index.html.liquid";
const CATEGORY_TEMPLATE: &str = "pages/category.html.liquid";
const ARTICLE_TEMPLATE: &str = "pages/article.html.liquid";
const NOT_FOUND_TEMPLATE: &str = "pages/not_found.html.liquid";

const XML_CONTENT_TYPE: &str = "application/xml";
const NEWS_SITEMAP_CACHE_CONTROL: &str = "public, s-maxage=600, stale-while-revalidate=1200";

#[derive(Serialize)]
struct PageContext<T: Serialize> {
    site: SiteView,
    meta: PageMeta,
    ads: AdSlots,
    #[serde(flatten)]
    page: T,
}

#[derive(Serialize)]
struct HomePage {
    home: HomeView,
}

#[derive(Serialize)]
struct CategoryPage {
    category: CategoryView,
}

#[derive(Serialize)]
struct ArticlePage {
    post: PostCard,
    trending: Vec<PostCard>,
    breadcrumbs: Vec<Breadcrumb>,
}

#[derive(Serialize)]
struct NotFoundPage {
    path: String,
}

async fn render<T: Serialize>(
    app_state: &AppState,
    template: &str,
    meta: PageMeta,
    ads: AdSlots,
    page: T,
    status: StatusCode,
) -> Response {
    let stylesheet = app_state
        .static_assets
        .versioned_url("/static/style.css")
        .await;

    let context = PageContext {
        site: SiteView::new(&app_state.config.app, stylesheet, Utc::now().year()),
        meta,
        ads,
        page,
    };

    let globals = match liquid::to_object(&context) {
        Ok(globals) => globals,
        Err(e) => {
            error!("Failed to build template context for {}: {}", template, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
        }
    };

    app_state
        .template_engine
        .render_page(template, globals, status)
        .await
}

async fn render_not_found(app_state: &AppState, path: &str) -> Response {
    render(
        app_state,
        NOT_FOUND_TEMPLATE,
        PageMeta::not_found(&app_state.config.app),
        AdSlots::default(),
        NotFoundPage {
            path: path.to_string(),
        },
        StatusCode::NOT_FOUND,
    )
    .await
}

/// GET /
pub async fn home_handler(State(app_state): State<AppState>) -> Response {
    let home_config = &app_state.config.home;

    let (posts, ad_slots) = tokio::join!(
        app_state
            .content
            .all_posts(PostQuery::recent(home_config.batch_size)),
        ads::load_ad_slots(app_state.ads.as_ref(), ads::HOME_POSITIONS)
    );

    let sections = allocate_home(&posts, home_config);

    render(
        &app_state,
        INDEX_TEMPLATE,
        PageMeta::home(&app_state.config.app),
        ad_slots,
        HomePage {
            home: HomeView::from(&sections),
        },
        StatusCode::OK,
    )
    .await
}

/// GET /{slug}
pub async fn slug_handler(State(app_state): State<AppState>, Path(slug): Path<String>) -> Response {
    let options = ResolveOptions::from(&app_state.config.home);
    let app = &app_state.config.app;

    match resolve(app_state.content.as_ref(), &slug, options).await {
        Resolution::Category { category, posts } => {
            let ad_slots =
                ads::load_ad_slots(app_state.ads.as_ref(), ads::CATEGORY_POSITIONS).await;
            render(
                &app_state,
                CATEGORY_TEMPLATE,
                PageMeta::category(app, &category),
                ad_slots,
                CategoryPage {
                    category: CategoryView::new(&category, &posts),
                },
                StatusCode::OK,
            )
            .await
        }
        Resolution::Article { post, trending } => {
            let ad_slots =
                ads::load_ad_slots(app_state.ads.as_ref(), ads::ARTICLE_POSITIONS).await;
            render(
                &app_state,
                ARTICLE_TEMPLATE,
                PageMeta::article(app, &post),
                ad_slots,
                ArticlePage {
                    breadcrumbs: article_breadcrumbs(&post),
                    post: PostCard::from(&post),
                    trending: cards(&trending),
                },
                StatusCode::OK,
            )
            .await
        }
        Resolution::NotFound => render_not_found(&app_state, &format!("/{}", slug)).await,
    }
}

/// Fallback for every unmatched path.
pub async fn not_found_handler(State(app_state): State<AppState>, uri: axum::http::Uri) -> Response {
    render_not_found(&app_state, uri.path()).await
}

/// GET /sitemap.xml
pub async fn sitemap_handler(State(app_state): State<AppState>) -> Response {
    match sitemap::generate_sitemap(
        app_state.content.as_ref(),
        app_state.config.app.site_url(),
        Utc::now(),
    )
    .await
    {
        Ok(xml) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, XML_CONTENT_TYPE)],
            xml,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to generate sitemap: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

/// GET /news-sitemap.xml
pub async fn news_sitemap_handler(State(app_state): State<AppState>) -> Response {
    let app = &app_state.config.app;
    let publication = NewsPublication {
        name: &app.name,
        language: &app.language,
    };

    match sitemap::generate_news_sitemap(
        app_state.content.as_ref(),
        app.site_url(),
        publication,
        Utc::now(),
    )
    .await
    {
        Ok(xml) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, XML_CONTENT_TYPE),
                (header::CACHE_CONTROL, NEWS_SITEMAP_CACHE_CONTROL),
            ],
            xml,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to generate news sitemap: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
