mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::{
    budget_post, closed_api_url, raw_post, setup_site, site_fixture, spawn_wordpress, test_config,
};
use mirrorfront::create_app;
use serde_json::{Value, json};
use tempfile::TempDir;

#[tokio::test]
async fn test_home_page_sections() {
    let (_temp_dir, _wordpress, server) = setup_site().await;

    let response = server.get("/").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let html = response.text();
    assert!(html.contains(
        "<title>The Bharat Mirror - India&#39;s Premier Digital News Platform</title>"
    ) || html.contains(
        "<title>The Bharat Mirror - India&#x27;s Premier Digital News Platform</title>"
    ));

    // sticky budget post leads the page with its decoded title
    assert!(html.contains("Budget 2025: Tax &amp; Spend \u{2013} What Changes"));
    assert!(html.contains(r#"<a href="/india">India</a></h2>"#));
    assert!(html.contains(r#"<a href="/sport">Sport</a></h2>"#));
    assert!(html.contains("Cricket final"));
    assert!(html.contains("placehold.co/728x90"));
    assert!(html.contains("placehold.co/300x250"));

    // every story appears once as a card or feature
    assert_eq!(html.matches(r#"<h3><a href="/business-story-1">"#).count(), 1);
}

#[tokio::test]
async fn test_upstream_slugs_are_escaped_in_links() {
    let posts = vec![
        raw_post(1, "odd\"slug", "Odd one", &[], 1),
        raw_post(2, "second<story", "Second", &[], 2),
    ];
    let wordpress = spawn_wordpress(posts, vec![]).await;
    let temp_dir = TempDir::new().unwrap();
    let app = create_app(test_config(&temp_dir, &wordpress.api_url))
        .await
        .unwrap();
    let server = TestServer::new(app).unwrap();

    let html = server.get("/").await.text();
    assert!(html.contains(r#"href="/odd&quot;slug""#));
    assert!(!html.contains(r#"href="/odd"slug""#));
    assert!(html.contains(r#"href="/second&lt;story""#));
}

#[tokio::test]
async fn test_category_page_splits_around_ad() {
    let (_temp_dir, _wordpress, server) = setup_site().await;

    let response = server.get("/business").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let html = response.text();
    assert!(html.contains("<title>Business News - The Bharat Mirror</title>"));
    assert!(html.contains("Latest updates and breaking news in the world of Business."));
    assert_eq!(html.matches(r#"<article class="news-card">"#).count(), 10);

    let sixth = html.find("Business story #06").unwrap();
    let mid_ad = html.rfind("ad ad-leaderboard").unwrap();
    let seventh = html.find("Business story #07").unwrap();
    assert!(sixth < mid_ad && mid_ad < seventh);
}

#[tokio::test]
async fn test_category_wins_slug_collision() {
    let (_temp_dir, _wordpress, server) = setup_site().await;

    let response = server.get("/india").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let html = response.text();
    assert!(html.contains("<title>India News - The Bharat Mirror</title>"));
    assert!(!html.contains("Shadowed India post"));
}

#[tokio::test]
async fn test_article_page() {
    let (_temp_dir, _wordpress, server) = setup_site().await;

    let response = server.get("/budget-2025").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let html = response.text();
    assert!(html.contains("<title>Budget 2025 explained | The Bharat Mirror</title>"));
    assert!(html.contains(r#"<meta name="description" content="Everything in this year&#39;s budget.">"#)
        || html.contains(r#"<meta name="description" content="Everything in this year&#x27;s budget.">"#));
    assert!(html.contains(r#"<link rel="canonical" href="https://news.example.com/budget-2025">"#));
    assert!(html.contains(r#"<meta property="og:type" content="article">"#));
    assert!(html.contains(r#"<meta name="twitter:card" content="summary_large_image">"#));

    // content is trusted markup, caption is reduced to text
    assert!(html.contains("<p>The <strong>budget</strong> raises capital spending.</p>"));
    assert!(html.contains("<figcaption>Parliament on budget day</figcaption>"));
    assert!(html.contains("By Asha Rao"));
    assert!(html.contains("https://cdn.example.com/a96.jpg"));
    assert!(html.contains(r#"<a href="/india">India</a> / "#));

    // the article is never listed in its own trending rail
    let trending = &html[html.find(r#"<section class="trending">"#).unwrap()..];
    assert!(!trending.contains(r#"href="/budget-2025""#));
    assert!(trending.contains(r#"href="/business-story-1""#));
}

#[tokio::test]
async fn test_article_seo_plugin_head_replaces_generated_tags() {
    let (mut posts, categories) = site_fixture();
    let mut post = budget_post();
    post["yoast_head"] = json!(
        "<title>Budget 2025 | Plugin</title>\n<link rel=\"canonical\" href=\"https://cms.example.com/budget-2025/\">"
    );
    posts.retain(|p| p["slug"] != "budget-2025");
    posts.insert(0, post);

    let wordpress = spawn_wordpress(posts, categories).await;
    let temp_dir = TempDir::new().unwrap();
    let app = create_app(test_config(&temp_dir, &wordpress.api_url))
        .await
        .unwrap();
    let server = TestServer::new(app).unwrap();

    let response = server.get("/budget-2025").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let html = response.text();
    assert_eq!(html.matches("<title>").count(), 1);
    assert_eq!(html.matches(r#"rel="canonical""#).count(), 1);
    assert!(html.contains("<title>Budget 2025 | Plugin</title>"));
    assert!(!html.contains(r#"<meta name="twitter:card""#));
}

#[tokio::test]
async fn test_unknown_slug_is_404() {
    let (_temp_dir, _wordpress, server) = setup_site().await;

    let response = server.get("/no-such-story").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let html = response.text();
    assert!(html.contains("Page not found"));
    assert!(html.contains("<title>Not Found | The Bharat Mirror</title>"));

    let response = server.get("/a/b/c").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sitemap() {
    let (_temp_dir, _wordpress, server) = setup_site().await;

    for path in ["/sitemap.xml", "/sitemap"] {
        let response = server.get(path).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.header("content-type"), "application/xml");

        let xml = response.text();
        assert!(xml.contains("<loc>https://news.example.com</loc>"));
        assert!(xml.contains("<loc>https://news.example.com/about</loc>"));
        assert!(xml.contains("<loc>https://news.example.com/business</loc>"));
        assert!(xml.contains("<loc>https://news.example.com/archive-piece</loc>"));
        // the shadowed post is listed once, as the category
        assert_eq!(xml.matches("<loc>https://news.example.com/india</loc>").count(), 1);
    }
}

#[tokio::test]
async fn test_news_sitemap() {
    let (_temp_dir, _wordpress, server) = setup_site().await;

    for path in ["/news-sitemap.xml", "/news-sitemap"] {
        let response = server.get(path).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.header("content-type"), "application/xml");
        assert_eq!(
            response.header("cache-control"),
            "public, s-maxage=600, stale-while-revalidate=1200"
        );

        let xml = response.text();
        assert!(xml.contains("<news:name>The Bharat Mirror</news:name>"));
        assert!(xml.contains("<news:language>en</news:language>"));
        assert!(xml.contains("<loc>https://news.example.com/budget-2025</loc>"));
        assert!(xml.contains("<news:title>Budget 2025: Tax &amp; Spend \u{2013} What Changes</news:title>"));
        assert!(xml.contains("<loc>https://news.example.com/cricket-final</loc>"));
        assert!(!xml.contains("archive-piece"));
    }
}

#[tokio::test]
async fn test_subscribe_requires_email() {
    let (_temp_dir, _wordpress, server) = setup_site().await;

    let response = server.post("/api/subscribe").json(&json!({})).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Email is required" })
    );

    let response = server.post("/api/subscribe").text("not json").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_subscribe_proxies_upstream() {
    let (_temp_dir, _wordpress, server) = setup_site().await;

    let response = server
        .post("/api/subscribe")
        .json(&json!({ "email": "new@example.com" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.json::<Value>(), json!({ "success": true, "id": 7 }));

    let response = server
        .post("/subscribe")
        .json(&json!({ "email": "plain@example.com" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({ "success": true }));

    let response = server
        .post("/api/subscribe")
        .json(&json!({ "email": "taken@example.com" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "Already subscribed");
}

#[tokio::test]
async fn test_upstream_down_degrades() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir, &closed_api_url().await);
    let server = TestServer::new(create_app(config).await.unwrap()).unwrap();

    let response = server.get("/").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("No stories are available right now"));

    let response = server.get("/business").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = server
        .post("/api/subscribe")
        .json(&json!({ "email": "reader@example.com" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Internal Server Error" })
    );
}

#[tokio::test]
async fn test_robots_and_static() {
    let (temp_dir, _wordpress, server) = setup_site().await;

    let response = server.get("/robots.txt").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let robots = response.text();
    assert!(robots.contains("Disallow: /admin/"));
    assert!(robots.contains("Sitemap: https://news.example.com/news-sitemap.xml"));

    std::fs::write(
        temp_dir.path().join("static/robots.txt"),
        "User-agent: *\nDisallow: /\n",
    )
    .unwrap();
    assert_eq!(server.get("/robots.txt").await.text(), "User-agent: *\nDisallow: /\n");

    let home = server.get("/").await.text();
    assert!(home.contains(r#"<link rel="stylesheet" href="/static/style.css?v="#));

    let response = server.get("/static/style.css").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header("content-type"), "text/css");

    let response = server.get("/static/style.css?v=123").await;
    assert_eq!(
        response.header("cache-control"),
        "public, max-age=31536000, immutable"
    );
}
