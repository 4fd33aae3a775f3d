//! OCR integration tests

use medassist::{error::AppError, tools::OcrOptions};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{
    constants::{TEST_IMAGE_URL, UNREACHABLE_URL},
    ocr_client, test_config, unconfigured_config,
};
use crate::mocks::MockOcrServer;

#[tokio::test]
async fn test_recognize_text_joins_lines() {
    let ocr = MockOcrServer::start().await;
    ocr.mock_token().await;
    ocr.mock_words(&["感康", "复方氨酚烷胺片", "每片含对乙酰氨基酚250mg"]).await;

    let client = ocr_client(&test_config(UNREACHABLE_URL, &ocr.uri()));
    let result = client
        .recognize_text(TEST_IMAGE_URL, OcrOptions::default())
        .await
        .unwrap();

    assert_eq!(result.text, "感康\n复方氨酚烷胺片\n每片含对乙酰氨基酚250mg");
    assert_eq!(result.error, "");
}

#[tokio::test]
async fn test_recognize_text_sends_form_with_flags() {
    let ocr = MockOcrServer::start().await;
    ocr.mock_token().await;
    ocr.mock_words(&["text"]).await;

    let client = ocr_client(&test_config(UNREACHABLE_URL, &ocr.uri()));
    let options = OcrOptions {
        detect_direction: true,
        ..OcrOptions::default()
    };
    client.recognize_text(TEST_IMAGE_URL, options).await.unwrap();

    let requests = ocr.received_requests().await;
    assert_eq!(requests.len(), 2);

    let form = String::from_utf8(requests[1].body.clone()).unwrap();
    assert!(form.contains("url=http%3A%2F%2Fimages.example.com%2Ftest.jpg"));
    assert!(form.contains("detect_direction=true"));
    assert!(form.contains("paragraph=false"));
    assert!(form.contains("probability=false"));
}

#[tokio::test]
async fn test_no_words_reports_service_message() {
    let ocr = MockOcrServer::start().await;
    ocr.mock_token().await;
    ocr.mock_recognize(json!({
        "error_code": 216201,
        "error_msg": "image format error"
    }))
    .await;

    let client = ocr_client(&test_config(UNREACHABLE_URL, &ocr.uri()));
    let result = client
        .recognize_text(TEST_IMAGE_URL, OcrOptions::default())
        .await
        .unwrap();

    assert_eq!(result.text, "");
    assert_eq!(result.error, "OCR recognition failed: image format error");
}

#[tokio::test]
async fn test_empty_image_reports_no_text() {
    let ocr = MockOcrServer::start().await;
    ocr.mock_token().await;
    ocr.mock_words(&[]).await;

    let client = ocr_client(&test_config(UNREACHABLE_URL, &ocr.uri()));
    let result = client
        .recognize_text(TEST_IMAGE_URL, OcrOptions::default())
        .await
        .unwrap();

    assert_eq!(result.error, "OCR recognition failed: no text detected");
}

#[tokio::test]
async fn test_rejected_token_becomes_exception() {
    let ocr = MockOcrServer::start().await;
    ocr.mock_token_rejected().await;

    let client = ocr_client(&test_config(UNREACHABLE_URL, &ocr.uri()));
    let result = client
        .recognize_text(TEST_IMAGE_URL, OcrOptions::default())
        .await
        .unwrap();

    assert_eq!(
        result.error,
        "OCR exception: access token request failed: unknown client id"
    );
    assert_eq!(ocr.received_requests().await.len(), 1);
}

#[tokio::test]
async fn test_unreachable_service_becomes_exception() {
    let client = ocr_client(&test_config(UNREACHABLE_URL, UNREACHABLE_URL));
    let result = client
        .recognize_text(TEST_IMAGE_URL, OcrOptions::default())
        .await
        .unwrap();

    assert!(result.error.starts_with("OCR exception: "), "got {}", result.error);
}

#[tokio::test]
async fn test_missing_credentials_is_configuration_error() {
    let ocr = MockOcrServer::start().await;
    ocr.mock_token().await;

    let client = ocr_client(&unconfigured_config(UNREACHABLE_URL, &ocr.uri()));
    let err = client
        .recognize_text(TEST_IMAGE_URL, OcrOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Configuration(_)));
    assert!(err.to_string().contains("API_KEY"));
    assert!(ocr.received_requests().await.is_empty());
}
