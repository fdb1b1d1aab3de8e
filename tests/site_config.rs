//! Route translation against a live (mock) site-config service.

use std::sync::Arc;

use edge_cache_policies::config::SiteConfigSettings;
use edge_cache_policies::policies::DistributionBehaviors;
use edge_cache_policies::routing::{RouteSource, RouteTranslationCache, SiteConfigClient};

mod common;

fn settings(addr: std::net::SocketAddr) -> SiteConfigSettings {
    SiteConfigSettings {
        base_url: format!("http://{}", addr),
        timeout_secs: 2,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_translate_fetches_once_per_domain_config() {
    let (addr, hits) = common::start_site_config(|_| {
        (200, common::routes_body(&[("/content", "/c")]))
    })
    .await;

    let client = SiteConfigClient::new(&settings(addr)).unwrap();
    let cache = RouteTranslationCache::new(Arc::new(client));

    assert_eq!(cache.translate("/content/foo", Some("odb")).await.unwrap(), "/c/foo");
    assert_eq!(cache.translate("/content/foo", Some("odb")).await.unwrap(), "/c/foo");

    assert_eq!(hits.count(), 1);
    assert_eq!(hits.targets(), vec!["/site-config?override=odb".to_string()]);
}

#[tokio::test]
async fn test_routes_apply_in_response_order() {
    let (addr, _hits) = common::start_site_config(|_| {
        (200, common::routes_body(&[("/content", "/articles"), ("/articles", "/a")]))
    })
    .await;

    let client = SiteConfigClient::new(&settings(addr)).unwrap();
    let table = client.fetch_routes("odb").await.unwrap();

    let keys: Vec<_> = table.iter().map(|(k, _)| k.to_string()).collect();
    assert_eq!(keys, ["/content", "/articles"]);
    assert_eq!(table.apply("/content/*"), "/a/*");
}

#[tokio::test]
async fn test_error_status_propagates() {
    let (addr, hits) = common::start_site_config(|target| {
        if target.ends_with("override=broken") {
            (503, r#"{"message":"unavailable"}"#.to_string())
        } else {
            (200, common::routes_body(&[]))
        }
    })
    .await;

    let client = SiteConfigClient::new(&settings(addr)).unwrap();
    let cache = RouteTranslationCache::new(Arc::new(client));

    let err = cache.translate("/content/*", Some("broken")).await.unwrap_err();
    assert_eq!(err.domain_config, "broken");
    assert!(err.reason.contains("503"), "{}", err.reason);

    assert_eq!(cache.translate("/content/*", Some("fine")).await.unwrap(), "/content/*");
    assert!(cache.translate("/content/*", Some("broken")).await.is_err());
    assert_eq!(hits.count(), 3);
}

#[tokio::test]
async fn test_malformed_body_is_unavailable() {
    let (addr, _hits) = common::start_site_config(|_| (200, r#"{"routes":[]}"#.to_string())).await;

    let client = SiteConfigClient::new(&settings(addr)).unwrap();
    let err = client.fetch_routes("odb").await.unwrap_err();
    assert!(err.reason.contains("invalid site config body"), "{}", err.reason);
}

#[tokio::test]
async fn test_connection_refused_is_unavailable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = SiteConfigClient::new(&settings(addr)).unwrap();
    let err = client.fetch_routes("odb").await.unwrap_err();
    assert_eq!(err.domain_config, "odb");
}

#[tokio::test]
async fn test_behaviors_translated_through_service() {
    let (addr, hits) = common::start_site_config(|_| {
        (200, common::routes_body(&[("/wp-json", "/api")]))
    })
    .await;

    let client = SiteConfigClient::new(&settings(addr)).unwrap();
    let cache = RouteTranslationCache::new(Arc::new(client));
    let behaviors = DistributionBehaviors::wordpress().translated(&cache, None).await.unwrap();

    assert!(behaviors.get("/api/*").is_some());
    assert!(behaviors.get("/wp-json/*").is_none());
    assert_eq!(hits.count(), 1);
}
