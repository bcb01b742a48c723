//! End-to-end version checks against a mock descriptor host

mod helper;

use std::sync::Arc;

use mockito::Server;
use tempfile::TempDir;

use helper::{create_http_updater, descriptor_path};
use version_updater::version::{CheckType, MapResolver, Source, UpdateError, VersionBuilder};

const DESCRIPTOR: &str = "\
# KarmaAPI release channel
VERSION=1.0.2
UPDATE=Download it from the plugin page
CHANGELOG=Fixed hologram offsets;Faster region lookups
";

#[tokio::test]
async fn reports_outdated_version_with_changelog() {
    let mut server = Server::new_async().await;
    let scratch = TempDir::new().unwrap();

    let mock = server
        .mock("GET", descriptor_path())
        .with_status(200)
        .with_body(DESCRIPTOR)
        .expect(1)
        .create_async()
        .await;

    let updater = create_http_updater(&server, &scratch, "1.0.1", CheckType::Numeric);
    let result = updater.get().await.unwrap();

    mock.assert_async().await;
    assert!(!result.is_up_to_date());
    assert_eq!(result.current_version(), "1.0.1");
    assert_eq!(result.remote_version(), "1.0.2");
    assert_eq!(result.update_note(), "Download it from the plugin page");
    assert_eq!(
        result.changelog(),
        &[
            "Fixed hologram offsets".to_string(),
            "Faster region lookups".to_string()
        ]
    );
    assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn descriptor_without_version_reports_up_to_date() {
    let mut server = Server::new_async().await;
    let scratch = TempDir::new().unwrap();

    let mock = server
        .mock("GET", descriptor_path())
        .with_status(200)
        .with_body("UPDATE=Nothing new\n")
        .create_async()
        .await;

    let updater = create_http_updater(&server, &scratch, "build-42", CheckType::ExactId);
    let result = updater.get().await.unwrap();

    mock.assert_async().await;
    assert!(result.is_up_to_date());
    assert_eq!(result.remote_version(), "build-42");
}

#[tokio::test]
async fn cached_result_is_served_without_new_request() {
    let mut server = Server::new_async().await;
    let scratch = TempDir::new().unwrap();

    let mock = server
        .mock("GET", descriptor_path())
        .with_status(200)
        .with_body(DESCRIPTOR)
        .expect(1)
        .create_async()
        .await;

    let updater = create_http_updater(&server, &scratch, "1.0.2", CheckType::Numeric);
    let first = updater.fetch(false).await.unwrap();
    let second = updater.fetch(false).await.unwrap();
    let third = updater.get().await.unwrap();

    mock.assert_async().await;
    assert!(first.is_up_to_date());
    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first, &third));
}

#[tokio::test]
async fn forced_fetch_requests_descriptor_every_time() {
    let mut server = Server::new_async().await;
    let scratch = TempDir::new().unwrap();

    let mock = server
        .mock("GET", descriptor_path())
        .with_status(200)
        .with_body(DESCRIPTOR)
        .expect(2)
        .create_async()
        .await;

    let updater = create_http_updater(&server, &scratch, "1.0.2", CheckType::Numeric);
    let first = updater.fetch(true).await.unwrap();
    let second = updater.fetch(true).await.unwrap();

    mock.assert_async().await;
    assert_eq!(first, second);
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&updater.cached().unwrap(), &second));
}

#[tokio::test]
async fn failed_refresh_keeps_previous_result() {
    let mut server = Server::new_async().await;
    let scratch = TempDir::new().unwrap();

    let healthy = server
        .mock("GET", descriptor_path())
        .with_status(200)
        .with_body(DESCRIPTOR)
        .expect(1)
        .create_async()
        .await;

    let updater = create_http_updater(&server, &scratch, "1.0.0", CheckType::Numeric);
    let previous = updater.get().await.unwrap();
    healthy.assert_async().await;
    healthy.remove_async().await;

    let failing = server
        .mock("GET", descriptor_path())
        .with_status(503)
        .with_body("Service Unavailable")
        .expect(1)
        .create_async()
        .await;

    let error = updater.fetch(true).await.unwrap_err();
    failing.assert_async().await;

    assert!(matches!(error, UpdateError::FetchFailed(_)));
    assert!(Arc::ptr_eq(&updater.get().await.unwrap(), &previous));
}

#[tokio::test]
async fn malformed_descriptor_is_reported_and_not_cached() {
    let mut server = Server::new_async().await;
    let scratch = TempDir::new().unwrap();

    let mock = server
        .mock("GET", descriptor_path())
        .with_status(200)
        .with_body("<!DOCTYPE html>\n<html><body>Moved</body></html>")
        .create_async()
        .await;

    let updater = create_http_updater(&server, &scratch, "1.0.0", CheckType::Numeric);
    let result = updater.get().await;

    mock.assert_async().await;
    assert!(matches!(result, Err(UpdateError::MalformedDescriptor(_))));
    assert!(updater.cached().is_none());
}

#[tokio::test]
async fn malformed_remote_version_is_not_up_to_date() {
    let mut server = Server::new_async().await;
    let scratch = TempDir::new().unwrap();

    let mock = server
        .mock("GET", descriptor_path())
        .with_status(200)
        .with_body("VERSION=1.0.0-SNAPSHOT\n")
        .create_async()
        .await;

    let updater = create_http_updater(&server, &scratch, "1.0.0", CheckType::Numeric);
    let result = updater.get().await.unwrap();

    mock.assert_async().await;
    assert!(!result.is_up_to_date());
}

#[tokio::test]
async fn resolvable_strategy_without_resolver_makes_no_request() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", descriptor_path())
        .with_status(200)
        .with_body(DESCRIPTOR)
        .expect(0)
        .create_async()
        .await;

    let url = format!("{}{}", server.url(), descriptor_path());
    let result = VersionBuilder::new(Source::new("karma", "alpha", url))
        .with_strategy(CheckType::ResolvableId)
        .build();

    assert!(matches!(result, Err(UpdateError::InvalidConfiguration(_))));
    mock.assert_async().await;
}

#[tokio::test]
async fn resolvable_strategy_resolves_named_releases() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", descriptor_path())
        .with_status(200)
        .with_body("VERSION=beta\nUPDATE=Beta channel\n")
        .create_async()
        .await;

    let url = format!("{}{}", server.url(), descriptor_path());
    let updater = VersionBuilder::new(Source::new("karma", "alpha", url))
        .with_strategy(CheckType::ResolvableId)
        .with_resolver(Arc::new(
            MapResolver::new().with("alpha", "1.0").with("beta", "1.1"),
        ))
        .unwrap()
        .with_cache(Arc::new(version_updater::version::ResultCache::new()))
        .build()
        .unwrap();

    let result = updater.get().await.unwrap();

    mock.assert_async().await;
    assert!(!result.is_up_to_date());
    assert_eq!(result.remote_version(), "beta");
    assert_eq!(result.resolved_remote_version(), "1.1");
}
