//! Image generation and model listing tests using wiremock.

mod common;

use common::*;
use promptline::config::ClientConfig;
use promptline::error::ChatError;
use promptline::images::ImageClient;
use promptline::models::{ImageModel, ImageSize};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_generate_image() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .and(header("Authorization", format!("Bearer {}", TEST_API_KEY)))
        .and(body_json(serde_json::json!({
            "model": "dall-e-3",
            "prompt": "a lighthouse at dusk",
            "n": 1,
            "size": "1024x1024",
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "created": 1700000000,
            "data": [{ "url": "https://cdn.test/lighthouse.png" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let images = ImageClient::from_config(chat_config(&server)).unwrap();
    let response = images.generate("a lighthouse at dusk", 1).await.unwrap();

    assert_eq!(
        response.urls().collect::<Vec<_>>(),
        vec!["https://cdn.test/lighthouse.png"]
    );
    assert!(response.created_at().is_some());
}

#[tokio::test]
async fn test_generate_uses_per_model_size() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .and(body_json(serde_json::json!({
            "model": "dall-e-2",
            "prompt": "tiny icon",
            "n": 3,
            "size": "256x256",
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "created": 1,
            "data": [{ "url": "a" }, { "url": "b" }, { "url": "c" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = chat_config(&server)
        .with_image_model(ImageModel::DallE2)
        .with_image_size(ImageModel::DallE2, ImageSize::Square256)
        .with_image_size(ImageModel::DallE3, ImageSize::Wide1792x1024);
    let images = ImageClient::from_config(config).unwrap();

    let response = images.generate("tiny icon", 3).await.unwrap();
    assert_eq!(response.data.len(), 3);
}

#[tokio::test]
async fn test_generate_tolerates_string_or_missing_timestamp() {
    for body in [
        serde_json::json!({
            "created_at": "2023-11-14T22:13:20Z",
            "data": [{ "url": "https://cdn.test/a.png" }]
        }),
        serde_json::json!({ "data": [{ "url": "https://cdn.test/a.png" }] }),
    ] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let images = ImageClient::from_config(chat_config(&server)).unwrap();
        let response = images.generate("x", 1).await.unwrap();
        assert_eq!(response.urls().collect::<Vec<_>>(), vec!["https://cdn.test/a.png"]);
    }
}

#[tokio::test]
async fn test_generate_with_size_override() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .and(body_json(serde_json::json!({
            "model": "dall-e-3",
            "prompt": "skyline",
            "n": 1,
            "size": "1920x1080",
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "created": 1,
            "data": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let images = ImageClient::from_config(chat_config(&server)).unwrap();
    images
        .generate_with_size("skyline", 1, ImageSize::Landscape1920x1080)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_generate_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({ "error": { "message": "bad key" } })),
        )
        .mount(&server)
        .await;

    let images = ImageClient::from_config(chat_config(&server)).unwrap();
    let err = images.generate("x", 1).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(
        err.user_message(),
        "Authentication failed. Please check your API key."
    );
}

#[tokio::test]
async fn test_missing_key_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = ClientConfig::default().with_openai_base_url(server.uri());
    let images = ImageClient::from_config(config).unwrap();
    let result = images.generate("x", 1).await;
    assert!(matches!(result, Err(ChatError::Config(_))));
}

#[tokio::test]
async fn test_list_models() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .and(header("Authorization", format!("Bearer {}", TEST_API_KEY)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "object": "list",
            "data": [
                { "id": "dall-e-2", "object": "model" },
                { "id": "dall-e-3", "object": "model" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let images = ImageClient::from_config(chat_config(&server)).unwrap();
    let models = images.list_models().await.unwrap();

    let ids: Vec<&str> = models["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|m| m["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["dall-e-2", "dall-e-3"]);
}

#[tokio::test]
async fn test_list_models_invalid_json() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let images = ImageClient::from_config(chat_config(&server)).unwrap();
    assert!(matches!(
        images.list_models().await,
        Err(ChatError::InvalidResponse(_))
    ));
}
