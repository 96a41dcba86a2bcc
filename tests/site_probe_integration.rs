//! End-to-end runs against a local HTTP server.
//!
//! These go through the real reqwest transport: identity headers on the wire,
//! manual redirect tracking, robots.txt parsing and the summary fold.

use std::time::Duration;

use crawler_probe::identity::IDENTITIES;
use crawler_probe::{Engine, EngineConfig, IdentitySelection, TargetPlan};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ROBOTS: &str = "User-agent: *\nDisallow: /admin\nDisallow: /wp-admin/\nSitemap: https://example.com/sitemap.xml\n";

fn test_config() -> EngineConfig {
    EngineConfig {
        timeout: Duration::from_secs(5),
        delay: Duration::ZERO,
        ..EngineConfig::default()
    }
}

async fn litespeed_site() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ROBOTS))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/uk/"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/uk/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("server", "LiteSpeed")
                .insert_header("x-litespeed-cache", "hit")
                .insert_header("x-litespeed-vary", "value=uk")
                .insert_header("cache-control", "public, max-age=600")
                .set_body_string("<html>uk</html>"),
        )
        .mount(&server)
        .await;

    server
}

#[tokio::test]
async fn test_all_identities_against_local_site() {
    let server = litespeed_site().await;
    let engine = Engine::new(test_config()).unwrap();
    let target = format!("{}/", server.uri());

    let report = engine.run(&target, &IdentitySelection::All).await;

    assert_eq!(report.availability_tests.len(), IDENTITIES.len());
    assert_eq!(report.summary.total_probes, 7);
    assert_eq!(report.summary.successful_probes, 7);
    assert!(report.summary.any_cache_layer_detected);
    assert!(report.summary.any_geo_redirect_detected);
    assert!(report.summary.any_policy_accessible);

    let desktop = &report.availability_tests["desktop"];
    let observation = desktop.observation().unwrap();
    assert_eq!(observation.redirect_chain, vec![target.clone()]);
    assert_eq!(observation.cache_headers["x-litespeed-cache"], "hit");
    assert_eq!(observation.cache_headers["cache-control"], "public, max-age=600");

    let policy = report.policy_tests["ads"].policy.as_ref().unwrap();
    assert_eq!(policy.disallow_rules, vec!["/admin", "/wp-admin/"]);
    assert_eq!(policy.sitemap_urls, vec!["https://example.com/sitemap.xml"]);
}

#[tokio::test]
async fn test_identity_headers_reach_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", "Googlebot-Video/1.0"))
        .and(header("accept-language", "en-US,en;q=0.5"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    // Anything else is refused
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let engine = Engine::new(test_config()).unwrap();
    let target = format!("{}/", server.uri());
    let selection = IdentitySelection::Only(vec!["video".to_string(), "news".to_string()]);

    let report = engine.run(&target, &selection).await;

    assert!(report.availability_tests["video"].is_accessible());
    assert_eq!(report.availability_tests["news"].status_code(), Some(403));
    assert_eq!(report.summary.successful_probes, 1);
}

#[tokio::test]
async fn test_configured_credentials_stay_on_the_target_host() {
    let target = MockServer::start().await;
    let elsewhere = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", format!("{}/landing", elsewhere.uri()).as_str()),
        )
        .mount(&target)
        .await;
    Mock::given(method("GET"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&elsewhere)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&elsewhere)
        .await;

    let mut extra_headers = HeaderMap::new();
    extra_headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer secret"));
    let engine = Engine::new(EngineConfig {
        extra_headers,
        ..test_config()
    })
    .unwrap();

    let result = engine
        .probe_availability(&format!("{}/", target.uri()), "desktop")
        .await;

    // The first hop matched only because the configured header was sent
    assert_eq!(result.observation().unwrap().redirect_chain.len(), 1);
    assert_eq!(result.status_code(), Some(401));
    assert_eq!(result.final_url(), Some(format!("{}/landing", elsewhere.uri()).as_str()));
}

#[tokio::test]
async fn test_unreachable_site_still_produces_a_report() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let engine = Engine::new(test_config()).unwrap();

    let report = engine
        .run(&format!("http://127.0.0.1:{}/", port), &IdentitySelection::All)
        .await;

    assert_eq!(report.summary.total_probes, 7);
    assert_eq!(report.summary.successful_probes, 0);
    assert!(!report.summary.any_policy_accessible);
    assert!(report.availability_tests.values().all(|r| r.error().is_some()));
}

#[tokio::test]
async fn test_site_plan_against_local_site() {
    let server = litespeed_site().await;
    let engine = Engine::new(test_config()).unwrap();

    let plan = TargetPlan::named(&server.uri(), "/uk/").unwrap();
    let report = engine.run_plan(&plan).await;

    assert_eq!(report.per_url.len(), 5);
    // "/" redirects to "/uk/", and "/uk/" itself: both end on LiteSpeed
    assert_eq!(report.cache_layer_analysis.len(), 2);
    // No mocks for the sitemaps: wiremock answers 404
    let sitemap = format!("{}/sitemap.xml", server.uri());
    assert_eq!(report.per_url[&sitemap].status_code(), Some(404));

    assert!(report.regional_test.redirected_to_region);
    assert!(report.regional_test.geo_heuristic_triggered);
    assert_eq!(
        report.regional_test.final_destination,
        Some(format!("{}/uk/", server.uri()))
    );
}
