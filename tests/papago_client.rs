//! Papago 客户端集成测试
//!
//! 使用本地假服务验证请求格式与重试行为

use std::sync::Arc;

use slide_translate::translation::{
    PapagoClient, RetryPolicy, TranslationClient, TranslationConfig, TranslationError,
};

mod common {
    include!("common/mod.rs");
}

use common::{dictionary, http_client, provider_router, spawn_server, FakeProvider};

async fn client_for(provider: Arc<FakeProvider>, max_retries: usize) -> PapagoClient {
    let base = spawn_server(provider_router(provider)).await;
    let config = TranslationConfig {
        api_url: format!("{}/papago", base),
        max_retry_attempts: max_retries,
        retry_backoff_ms: 1,
        ..TranslationConfig::default()
    };
    PapagoClient::with_http_client(http_client(), &config, "my-id", "my-secret").unwrap()
}

#[tokio::test]
async fn test_request_format() {
    let provider = Arc::new(FakeProvider::new(dictionary()));
    let client = client_for(provider.clone(), 0).await;

    let translated = client.translate("Hello", "en", "fr").await.unwrap();
    assert_eq!(translated, "Bonjour");

    let requests = provider.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].get("source").map(String::as_str), Some("en"));
    assert_eq!(requests[0].get("target").map(String::as_str), Some("fr"));
    assert_eq!(requests[0].get("text").map(String::as_str), Some("Hello"));

    let headers = provider.headers.lock().unwrap().clone();
    assert_eq!(headers, vec![("my-id".to_string(), "my-secret".to_string())]);
}

#[tokio::test]
async fn test_text_is_form_encoded() {
    let provider = Arc::new(FakeProvider::new(dictionary()));
    let client = client_for(provider.clone(), 0).await;

    let text = "A & B = 100% 안녕";
    assert_eq!(client.translate(text, "en", "ko").await.unwrap(), text);
    assert_eq!(provider.texts(), vec![text]);
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let provider = Arc::new(FakeProvider::new(dictionary()).failing(2, 503));
    let client = client_for(provider.clone(), 2).await;

    let translated = client.translate("World", "en", "fr").await.unwrap();
    assert_eq!(translated, "Monde");
    assert_eq!(provider.texts().len(), 3);
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let provider = Arc::new(FakeProvider::new(dictionary()).failing(10, 500));
    let client = client_for(provider.clone(), 1).await;

    let error = client.translate("World", "en", "fr").await.unwrap_err();
    assert!(matches!(error, TranslationError::Provider { status: 500, .. }));
    assert_eq!(provider.texts().len(), 2);
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let provider = Arc::new(FakeProvider::new(dictionary()).failing(1, 401));
    let client = client_for(provider.clone(), 3).await;

    match client.translate("Hello", "en", "fr").await {
        Err(TranslationError::Provider { status, body }) => {
            assert_eq!(status, 401);
            assert!(body.contains("fake"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(provider.texts().len(), 1);
}

#[tokio::test]
async fn test_retry_can_be_disabled() {
    let provider = Arc::new(FakeProvider::new(dictionary()).failing(1, 503));
    let client = client_for(provider.clone(), 3)
        .await
        .with_retry(RetryPolicy::disabled());

    assert!(client.translate("Hello", "en", "fr").await.is_err());
    assert_eq!(provider.texts().len(), 1);
}

#[tokio::test]
async fn test_unreachable_provider_is_a_network_error() {
    let config = TranslationConfig {
        api_url: "http://127.0.0.1:9/papago".to_string(),
        retry_enabled: false,
        ..TranslationConfig::default()
    };
    let client =
        PapagoClient::with_http_client(http_client(), &config, "id", "secret").unwrap();

    let error = client.translate("Hello", "en", "fr").await.unwrap_err();
    assert!(error.is_retryable());
}
