//! Integration tests for `CrawlOrchestrator`.
//!
//! Each reachable store is a `wiremock` server; unreachable stores point at a
//! local port nobody listens on, which fails at the transport level.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use storecrawl_core::{CrawlStatus, StoreUrl, UnreachablePolicy};
use storecrawl_scraper::{
    CrawlOrchestrator, CrawlSettings, ScraperError, StoreClient, StoreOutcome, StoreResolver,
};

fn orchestrator(settings: CrawlSettings) -> CrawlOrchestrator {
    let client =
        StoreClient::new(5, "storecrawl-test/0.1").expect("failed to build test StoreClient");
    CrawlOrchestrator::new(client, StoreResolver::default(), settings)
}

/// A store URL on a port that refuses connections.
fn unreachable_store() -> StoreUrl {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    StoreUrl::parse(&format!("http://{addr}")).unwrap()
}

async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// A small Shopify-like store: about-us and contact pages with contact
/// signals, a catalog with two products. `/about/` and `/contact-us/` 404.
async fn shop_server() -> MockServer {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/about-us/",
        r#"<p>Write to hello@shop.com</p><a href="https://www.facebook.com/shop">fb</a>"#,
    )
    .await;
    mount_page(
        &server,
        "/contact/",
        r#"<p>hello@shop.com or sales@shop.com</p>
           <a href="https://twitter.com/shop">tw</a>
           <a href="https://www.facebook.com/shop">fb</a>"#,
    )
    .await;
    mount_page(
        &server,
        "/collections/all/",
        r#"<a href="/products/pad?variant=3">pad</a><a href="/products/cap">cap</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/products/pad.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"product": {"title": "Pad", "image": {"src": "https://cdn/pad.png"}}}),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/cap.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"product": {"title": "Cap"}})))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn crawl_store_collects_links_and_products() {
    let server = shop_server().await;
    let store = StoreUrl::parse(&server.uri()).unwrap();

    let outcome = orchestrator(CrawlSettings::default())
        .crawl_store(&store)
        .await;

    let record = match outcome {
        StoreOutcome::Completed(record) => record,
        StoreOutcome::Unreachable(err) => panic!("expected Completed, got: {err:?}"),
    };
    assert_eq!(record.status, CrawlStatus::Completed);
    assert_eq!(
        record.links.emails.iter().collect::<Vec<_>>(),
        vec!["hello@shop.com", "sales@shop.com"]
    );
    assert_eq!(record.links.facebook.len(), 1);
    assert_eq!(record.links.twitter.len(), 1);

    assert_eq!(record.products.len(), 2);
    assert_eq!(record.products[0].title, "Pad");
    assert_eq!(record.products[0].image, "https://cdn/pad.png");
    assert_eq!(record.products[1].title, "Cap");
    assert_eq!(record.products[1].image, "-");
}

#[tokio::test]
async fn crawl_store_respects_sample_size() {
    let server = shop_server().await;
    let store = StoreUrl::parse(&server.uri()).unwrap();

    let settings = CrawlSettings {
        sample_size: 1,
        ..CrawlSettings::default()
    };
    let StoreOutcome::Completed(record) = orchestrator(settings).crawl_store(&store).await else {
        panic!("expected Completed");
    };

    assert_eq!(record.products.len(), 1);
    assert_eq!(record.products[0].title, "Pad");
}

#[tokio::test]
async fn crawl_store_uses_catalog_path_override() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/collections/frontpage/",
        r#"<a href="/products/tee">tee</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/products/tee.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"product": {"title": "Tee"}})))
        .mount(&server)
        .await;

    let settings = CrawlSettings {
        catalog_path: Some("/collections/frontpage/".to_owned()),
        ..CrawlSettings::default()
    };
    let store = StoreUrl::parse(&server.uri()).unwrap();
    let StoreOutcome::Completed(record) = orchestrator(settings).crawl_store(&store).await else {
        panic!("expected Completed");
    };

    assert_eq!(record.products.len(), 1);
    assert_eq!(record.products[0].title, "Tee");
}

#[tokio::test]
async fn crawl_store_with_only_error_pages_completes_empty() {
    // Every route 404s: pages are skipped, nothing is a failure.
    let server = MockServer::start().await;
    let store = StoreUrl::parse(&server.uri()).unwrap();

    let StoreOutcome::Completed(record) = orchestrator(CrawlSettings::default())
        .crawl_store(&store)
        .await
    else {
        panic!("expected Completed");
    };

    assert!(record.links.is_empty());
    assert!(record.products.is_empty());
    assert!(!record.is_failed());
}

#[tokio::test]
async fn crawl_store_reports_transport_failure_as_unreachable() {
    let outcome = orchestrator(CrawlSettings::default())
        .crawl_store(&unreachable_store())
        .await;

    match outcome {
        StoreOutcome::Unreachable(err) => assert!(err.is_transport(), "got: {err:?}"),
        StoreOutcome::Completed(record) => panic!("expected Unreachable, got: {record:?}"),
    }
}

/// A store whose informational pages answer normally but whose only product
/// detail stalls past the client timeout.
async fn stalling_product_server() -> MockServer {
    let server = MockServer::start().await;
    mount_page(&server, "/contact/", "<p>hello@slow.com</p>").await;
    mount_page(&server, "/collections/all/", r#"<a href="/products/slow">slow</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/products/slow.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"product": {"title": "Slow"}}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;
    server
}

fn short_timeout_orchestrator() -> CrawlOrchestrator {
    let client =
        StoreClient::new(1, "storecrawl-test/0.1").expect("failed to build test StoreClient");
    CrawlOrchestrator::new(client, StoreResolver::default(), CrawlSettings::default())
}

#[tokio::test]
async fn crawl_store_transport_failure_while_sampling_makes_store_unreachable() {
    let server = stalling_product_server().await;
    let store = StoreUrl::parse(&server.uri()).unwrap();

    let outcome = short_timeout_orchestrator().crawl_store(&store).await;

    match outcome {
        StoreOutcome::Unreachable(err) => assert!(err.is_transport(), "got: {err:?}"),
        StoreOutcome::Completed(record) => panic!("expected Unreachable, got: {record:?}"),
    }
}

#[tokio::test]
async fn run_discards_links_of_store_that_fails_while_sampling() {
    let server = stalling_product_server().await;
    let store = StoreUrl::parse(&server.uri()).unwrap();

    let result = short_timeout_orchestrator()
        .run(vec![store.clone()])
        .await
        .expect("skip-store policy never fails the run");

    let record = result.get(&store).unwrap();
    assert!(record.is_failed());
    assert!(record.links.is_empty(), "scanned links must not survive: {record:?}");
    assert!(record.products.is_empty());
}

#[tokio::test]
async fn run_marks_unreachable_store_and_continues() {
    let server = shop_server().await;
    let reachable = StoreUrl::parse(&server.uri()).unwrap();
    let dead = unreachable_store();

    let result = orchestrator(CrawlSettings::default())
        .run(vec![dead.clone(), reachable.clone()])
        .await
        .expect("skip-store policy never fails the run");

    assert_eq!(result.len(), 2, "every input store must be accounted for");
    assert_eq!(result.failed_count(), 1);

    let dead_record = result.get(&dead).unwrap();
    assert!(dead_record.is_failed());
    assert!(dead_record.links.is_empty());
    assert!(dead_record.products.is_empty());

    let live_record = result.get(&reachable).unwrap();
    assert!(!live_record.is_failed());
    assert_eq!(live_record.products.len(), 2);
}

#[tokio::test]
async fn run_fails_fast_under_fail_run_policy() {
    let dead = unreachable_store();
    let settings = CrawlSettings {
        unreachable_policy: UnreachablePolicy::FailRun,
        ..CrawlSettings::default()
    };

    let err = orchestrator(settings)
        .run(vec![dead.clone()])
        .await
        .unwrap_err();

    assert!(
        matches!(err, ScraperError::StoreUnreachable { ref store, .. } if *store == dead.to_string()),
        "expected StoreUnreachable, got: {err:?}"
    );
    assert!(err.is_transport());
}

#[tokio::test]
async fn run_concurrently_matches_sequential_run() {
    let first = shop_server().await;
    let second = shop_server().await;
    let stores = vec![
        StoreUrl::parse(&first.uri()).unwrap(),
        StoreUrl::parse(&second.uri()).unwrap(),
        unreachable_store(),
    ];

    let sequential = orchestrator(CrawlSettings::default())
        .run(stores.clone())
        .await
        .unwrap();
    let concurrent = orchestrator(CrawlSettings {
        max_concurrent_stores: 3,
        ..CrawlSettings::default()
    })
    .run(stores)
    .await
    .unwrap();

    assert_eq!(sequential.len(), 3);
    assert_eq!(sequential, concurrent);
}

#[tokio::test]
async fn run_with_no_stores_is_empty() {
    let result = orchestrator(CrawlSettings::default())
        .run(Vec::new())
        .await
        .unwrap();
    assert!(result.is_empty());
}
