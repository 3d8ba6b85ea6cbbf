#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_test::TestServer;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use mirrorfront::{Config, create_app};
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    fs,
    net::SocketAddr,
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};
use tempfile::TempDir;
use walkdir::WalkDir;

pub const INDIA: (u64, &str, &str) = (1, "india", "India");
pub const BUSINESS: (u64, &str, &str) = (2, "business", "Business");
pub const SPORTS: (u64, &str, &str) = (3, "sports", "Sports");
pub const WORLD: (u64, &str, &str) = (4, "world", "World");

/// In-process stand-in for the WordPress REST API.
pub struct FakeWordPress {
    pub api_url: String,
    pub requests: Arc<AtomicUsize>,
}

impl FakeWordPress {
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
struct FakeState {
    posts: Arc<Vec<Value>>,
    categories: Arc<Vec<Value>>,
    requests: Arc<AtomicUsize>,
}

fn post_date(post: &Value) -> Option<DateTime<Utc>> {
    let date = post["date"].as_str()?;
    NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|d| d.and_utc())
}

async fn posts_route(
    State(state): State<FakeState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<Value>> {
    state.requests.fetch_add(1, Ordering::SeqCst);

    let per_page = params
        .get("per_page")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(10);
    let category = params.get("categories").and_then(|v| v.parse::<u64>().ok());
    let after = params
        .get("after")
        .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
        .map(|d| d.with_timezone(&Utc));

    let posts = state
        .posts
        .iter()
        .filter(|p| params.get("slug").is_none_or(|slug| p["slug"] == slug.as_str()))
        .filter(|p| {
            category.is_none_or(|id| {
                p["categories"]
                    .as_array()
                    .is_some_and(|ids| ids.iter().any(|c| c.as_u64() == Some(id)))
            })
        })
        .filter(|p| after.is_none_or(|after| post_date(p).is_some_and(|d| d > after)))
        .take(per_page)
        .cloned()
        .collect();

    Json(posts)
}

async fn categories_route(
    State(state): State<FakeState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<Value>> {
    state.requests.fetch_add(1, Ordering::SeqCst);

    let categories = state
        .categories
        .iter()
        .filter(|c| params.get("slug").is_none_or(|slug| c["slug"] == slug.as_str()))
        .cloned()
        .collect();

    Json(categories)
}

async fn subscribe_route(Json(body): Json<Value>) -> Response {
    match body["email"].as_str() {
        Some("taken@example.com") => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "code": "already_subscribed", "message": "Already subscribed" })),
        )
            .into_response(),
        Some("plain@example.com") => (StatusCode::OK, "subscribed").into_response(),
        Some("new@example.com") => {
            (StatusCode::CREATED, Json(json!({ "success": true, "id": 7 }))).into_response()
        }
        _ => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
    }
}

async fn broken_route(State(state): State<FakeState>) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    (StatusCode::INTERNAL_SERVER_ERROR, "database down").into_response()
}

async fn counted_route(State(state): State<FakeState>) -> Json<Value> {
    let hits = state.requests.fetch_add(1, Ordering::SeqCst) + 1;
    Json(json!({ "hits": hits }))
}

pub async fn spawn_wordpress(posts: Vec<Value>, categories: Vec<Value>) -> FakeWordPress {
    let requests = Arc::new(AtomicUsize::new(0));
    let state = FakeState {
        posts: Arc::new(posts),
        categories: Arc::new(categories),
        requests: requests.clone(),
    };

    let router = Router::new()
        .route("/wp-json/wp/v2/posts", get(posts_route))
        .route("/wp-json/wp/v2/categories", get(categories_route))
        .route("/wp-json/bm/v1/subscribe", post(subscribe_route))
        .route("/wp-json/test/broken", get(broken_route))
        .route("/wp-json/test/counted", get(counted_route))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    FakeWordPress {
        api_url: format!("http://{}/wp-json", addr),
        requests,
    }
}

/// An API URL nothing is listening on.
pub async fn closed_api_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/wp-json", addr)
}

pub fn date_hours_ago(hours: i64) -> String {
    (Utc::now() - Duration::hours(hours))
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}

pub fn raw_category(category: (u64, &str, &str), count: u64) -> Value {
    let (id, slug, name) = category;
    json!({
        "id": id,
        "name": name,
        "slug": slug,
        "count": count,
        "description": "",
    })
}

pub fn raw_post(
    id: u64,
    slug: &str,
    title: &str,
    categories: &[(u64, &str, &str)],
    hours_ago: i64,
) -> Value {
    let terms: Vec<Value> = categories
        .iter()
        .map(|(id, slug, name)| {
            json!({ "id": id, "name": name, "slug": slug, "taxonomy": "category" })
        })
        .collect();

    json!({
        "id": id,
        "date": date_hours_ago(hours_ago),
        "slug": slug,
        "title": { "rendered": title },
        "excerpt": { "rendered": format!("<p>Summary of {}.</p>", title) },
        "content": { "rendered": format!("<p>Full story: {}</p>", title) },
        "sticky": false,
        "categories": categories.iter().map(|c| c.0).collect::<Vec<_>>(),
        "tags": [],
        "_embedded": { "wp:term": [terms] },
    })
}

/// A fully populated post with author, media and SEO plugin fields.
pub fn budget_post() -> Value {
    json!({
        "id": 400,
        "date": date_hours_ago(2),
        "slug": "budget-2025",
        "title": { "rendered": "Budget 2025: Tax &amp; Spend &#8211; What Changes" },
        "excerpt": { "rendered": "<p>The finance minister presented the budget.</p>" },
        "content": { "rendered": "<p>The <strong>budget</strong> raises capital spending.</p>" },
        "sticky": true,
        "categories": [1],
        "tags": [],
        "rank_math_title": "Budget 2025 explained",
        "rank_math_description": "Everything in this year's budget.",
        "_embedded": {
            "author": [{
                "id": 3,
                "name": "Asha Rao",
                "slug": "asha",
                "avatar_urls": { "24": "https://cdn.example.com/a24.jpg", "96": "https://cdn.example.com/a96.jpg" }
            }],
            "wp:featuredmedia": [{
                "id": 9,
                "source_url": "https://cdn.example.com/budget.jpg",
                "alt_text": "Parliament",
                "caption": { "rendered": "<p>Parliament on <em>budget day</em></p>" }
            }],
            "wp:term": [[
                { "id": 1, "name": "India", "slug": "india", "taxonomy": "category" }
            ]]
        }
    })
}

/// Site content: ten business stories, a budget article, a few India and
/// sport stories, one post whose slug collides with the India category and
/// an old world story outside the news window.
pub fn site_fixture() -> (Vec<Value>, Vec<Value>) {
    let mut posts = vec![budget_post()];
    for n in 1..=10 {
        posts.push(raw_post(
            100 + n,
            &format!("business-story-{}", n),
            &format!("Business story #{:02}", n),
            &[BUSINESS],
            n as i64 + 2,
        ));
    }
    for n in 1..=3 {
        posts.push(raw_post(
            200 + n,
            &format!("india-story-{}", n),
            &format!("India story #{:02}", n),
            &[INDIA],
            n as i64 + 20,
        ));
    }
    posts.push(raw_post(301, "cricket-final", "Cricket final", &[SPORTS], 30));
    posts.push(raw_post(300, "india", "Shadowed India post", &[WORLD], 40));
    posts.push(raw_post(500, "archive-piece", "Archive piece", &[WORLD], 72));

    posts.sort_by_key(|p| std::cmp::Reverse(p["date"].as_str().unwrap_or_default().to_string()));

    let categories = vec![
        raw_category(INDIA, 4),
        raw_category(BUSINESS, 10),
        raw_category(SPORTS, 1),
        raw_category(WORLD, 2),
    ];

    (posts, categories)
}

fn copy_dir(from: &Path, to: &Path) {
    for entry in WalkDir::new(from).into_iter().filter_map(|e| e.ok()) {
        let relative = entry.path().strip_prefix(from).unwrap();
        let target = to.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).unwrap();
        } else {
            fs::copy(entry.path(), &target).unwrap();
        }
    }
}

/// Config whose template and static directories are fresh copies of the
/// shipped ones inside `temp_dir`.
pub fn test_config(temp_dir: &TempDir, api_url: &str) -> Config {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    let templates_dir = temp_dir.path().join("templates");
    let static_dir = temp_dir.path().join("static");
    copy_dir(&manifest.join("templates"), &templates_dir);
    copy_dir(&manifest.join("static"), &static_dir);

    let mut config = Config::default();
    config.app.base_url = Some("https://news.example.com".to_string());
    config.cms.api_url = Some(api_url.to_string());
    config.templates.directory = templates_dir;
    config.static_files.directory = static_dir;
    config
}

pub async fn setup_site() -> (TempDir, FakeWordPress, TestServer) {
    let (posts, categories) = site_fixture();
    let wordpress = spawn_wordpress(posts, categories).await;

    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir, &wordpress.api_url);
    let app = create_app(config).await.unwrap();
    let server = TestServer::new(app).unwrap();

    (temp_dir, wordpress, server)
}
