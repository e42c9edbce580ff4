//! Integration tests for the fetch cycle: view state transitions driving the
//! HTTP client against a mock news server.
//!
//! Each test starts its own `MockServer`; requests are matched on the
//! `category` and `page` query parameters.

use headlines::news::{Article, Category, NewsClient};
use headlines::state::{FetchRequest, PageOutcome, ViewState};
use pretty_assertions::assert_eq;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> NewsClient {
    let endpoint = Url::parse(&server.uri()).unwrap();
    NewsClient::new(endpoint, Some(Duration::from_secs(5)), 50).unwrap()
}

async fn mock_page(server: &MockServer, category: &str, page: u32, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/news"))
        .and(query_param("category", category))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn titles_body(titles: &[&str]) -> serde_json::Value {
    let articles: Vec<_> = titles
        .iter()
        .map(|t| {
            serde_json::json!({
                "title": t,
                "description": format!("About {t}"),
                "url": format!("https://news.example.com/{}", t.to_lowercase()),
                "urlToImage": null
            })
        })
        .collect();
    serde_json::json!({ "status": "ok", "articles": articles })
}

/// Run `request` against the client and feed the result back into `view`.
async fn complete(view: &mut ViewState, client: &NewsClient, request: FetchRequest) -> PageOutcome {
    let result = client.fetch_page(request.category, request.page).await;
    view.apply_page(request.generation, request.page, result)
}

fn titles(articles: &[Article]) -> Vec<&str> {
    articles.iter().map(|a| a.title.as_str()).collect()
}

#[tokio::test]
async fn test_mount_then_scroll_appends_in_order() {
    let server = MockServer::start().await;
    mock_page(&server, "general", 1, titles_body(&["A", "B"])).await;
    mock_page(&server, "general", 2, titles_body(&["C"])).await;
    let client = client_for(&server);

    let mut view = ViewState::new();
    let mount = view.mount();
    assert!(view.is_loading());
    assert_eq!(
        complete(&mut view, &client, mount).await,
        PageOutcome::Replaced { count: 2 }
    );
    assert!(!view.is_loading());

    let next = view.advance_page().unwrap();
    assert_eq!(next.page, 2);
    assert_eq!(
        complete(&mut view, &client, next).await,
        PageOutcome::Appended { count: 1 }
    );

    assert_eq!(titles(view.articles()), vec!["A", "B", "C"]);
    assert_eq!(view.query().page, 2);
}

#[tokio::test]
async fn test_search_filters_accumulated_pages_without_fetching() {
    let server = MockServer::start().await;
    mock_page(&server, "general", 1, titles_body(&["Alpha", "beta"])).await;
    mock_page(&server, "general", 2, titles_body(&["Bravo", "Charlie"])).await;
    let client = client_for(&server);

    let mut view = ViewState::new();
    let mount = view.mount();
    complete(&mut view, &client, mount).await;
    let next = view.advance_page().unwrap();
    complete(&mut view, &client, next).await;

    view.set_search_term("b");
    let visible: Vec<&str> = view
        .visible_articles()
        .iter()
        .map(|a| a.title.as_str())
        .collect();
    assert_eq!(visible, vec!["beta", "Bravo"]);

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);
}

#[tokio::test]
async fn test_category_switch_from_page_three_restarts_at_one() {
    let server = MockServer::start().await;
    for page in 1..=3 {
        let name = format!("g{page}");
        mock_page(&server, "general", page, titles_body(&[name.as_str()])).await;
    }
    mock_page(&server, "sports", 1, titles_body(&["Match report"])).await;
    let client = client_for(&server);

    let mut view = ViewState::new();
    let mount = view.mount();
    complete(&mut view, &client, mount).await;
    for _ in 0..2 {
        let next = view.advance_page().unwrap();
        complete(&mut view, &client, next).await;
    }
    assert_eq!(view.query().page, 3);
    assert_eq!(titles(view.articles()), vec!["g1", "g2", "g3"]);

    let request = view.select_category(Category::Sports).unwrap();
    assert_eq!(request.page, 1);
    assert!(view.articles().is_empty());

    complete(&mut view, &client, request).await;
    assert_eq!(titles(view.articles()), vec!["Match report"]);
    assert_eq!(view.query().category, Category::Sports);
}

#[tokio::test]
async fn test_slow_response_for_old_category_is_dropped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/news"))
        .and(query_param("category", "general"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(titles_body(&["Old"]))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;
    mock_page(&server, "science", 1, titles_body(&["New"])).await;
    let client = client_for(&server);

    let mut view = ViewState::new();
    let old = view.mount();
    let current = view.select_category(Category::Science).unwrap();

    let (old_result, current_result) = tokio::join!(
        client.fetch_page(old.category, old.page),
        client.fetch_page(current.category, current.page),
    );

    // Newer response lands first, older one afterwards
    assert_eq!(
        view.apply_page(current.generation, current.page, current_result),
        PageOutcome::Replaced { count: 1 }
    );
    assert_eq!(
        view.apply_page(old.generation, old.page, old_result),
        PageOutcome::Stale
    );
    assert_eq!(titles(view.articles()), vec!["New"]);
    assert!(!view.is_loading());
}

#[tokio::test]
async fn test_server_error_behaves_like_empty_page() {
    let server = MockServer::start().await;
    mock_page(&server, "general", 1, titles_body(&["A"])).await;
    Mock::given(method("GET"))
        .and(path("/api/news"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    let client = client_for(&server);

    let mut view = ViewState::new();
    let mount = view.mount();
    complete(&mut view, &client, mount).await;

    let next = view.advance_page().unwrap();
    assert_eq!(complete(&mut view, &client, next).await, PageOutcome::Failed);
    assert!(!view.is_loading());
    assert_eq!(titles(view.articles()), vec!["A"]);

    // Pagination is not wedged by the failure
    assert_eq!(view.advance_page().map(|r| r.page), Some(3));
}

#[tokio::test]
async fn test_malformed_body_leaves_collection_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/news"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;
    let client = client_for(&server);

    let mut view = ViewState::new();
    let mount = view.mount();
    assert_eq!(complete(&mut view, &client, mount).await, PageOutcome::Failed);
    assert!(view.articles().is_empty());
    assert!(!view.is_loading());
}

#[tokio::test]
async fn test_reload_replaces_collection() {
    let server = MockServer::start().await;
    mock_page(&server, "general", 1, titles_body(&["Fresh"])).await;
    mock_page(&server, "general", 2, titles_body(&["Older"])).await;
    let client = client_for(&server);

    let mut view = ViewState::new();
    let mount = view.mount();
    complete(&mut view, &client, mount).await;
    let next = view.advance_page().unwrap();
    complete(&mut view, &client, next).await;
    assert_eq!(view.articles().len(), 2);

    let reload = view.reload();
    assert_eq!(reload.page, 1);
    complete(&mut view, &client, reload).await;
    assert_eq!(titles(view.articles()), vec!["Fresh"]);
    assert_eq!(view.query().page, 1);
}
