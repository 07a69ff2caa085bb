//! S3BlobStore against a fake S3 endpoint
#[path = "common/mod.rs"]
mod common;

use base64::Engine as _;
use maildrop_core::services::{BlobStore, S3BlobStore};
use md5::{Digest as _, Md5};
use wiremock::matchers::{header, method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn connect(server: &MockServer) -> S3BlobStore {
    let mut config = common::test_config(true);
    config.storage.endpoint_url = Some(server.uri());

    S3BlobStore::connect(&config)
        .await
        .expect("bucket should be reachable")
}

#[tokio::test]
async fn put_object_uses_path_style_key_and_headers() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path_regex(r"^/test-bucket/?$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let expected_md5 = base64::engine::general_purpose::STANDARD.encode(Md5::digest(b"<p>hi</p>"));
    Mock::given(method("PUT"))
        .and(path_regex(r"^/test-bucket/2026-10-18/\d+_abc/html$"))
        .and(header("content-type", "text/html; charset=utf-8"))
        .and(header("content-md5", expected_md5.as_str()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = connect(&server).await;
    assert_eq!(store.bucket(), "test-bucket");

    store
        .put_object(
            "2026-10-18/1792315800_abc/html",
            b"<p>hi</p>".to_vec(),
            "text/html; charset=utf-8",
        )
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let put = requests
        .iter()
        .find(|r| r.method.as_str() == "PUT")
        .expect("a PUT was sent");
    assert!(put.body.windows(9).any(|w| w == b"<p>hi</p>"));
}

#[tokio::test]
async fn missing_bucket_fails_acquisition() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut config = common::test_config(true);
    config.storage.endpoint_url = Some(server.uri());

    let err = S3BlobStore::connect(&config).await.err().unwrap();
    assert!(matches!(err, maildrop_core::MaildropError::Storage(_)));
}

#[tokio::test]
async fn server_errors_surface_as_storage_errors() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(403).set_body_string(
            "<Error><Code>AccessDenied</Code><Message>Access Denied</Message></Error>",
        ))
        .mount(&server)
        .await;

    let store = connect(&server).await;
    let err = store
        .put_object("k/plaintext", b"hi".to_vec(), "text/plain")
        .await
        .unwrap_err();

    assert!(matches!(err, maildrop_core::MaildropError::Storage(_)));
    assert!(err.to_string().contains("s3://test-bucket/k/plaintext"));
}
