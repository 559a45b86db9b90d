use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mapato::api::{
    request_file_insight, request_stock_insight, GeminiClient, InsightProvider,
    FILE_INSIGHT_FALLBACK, STOCK_INSIGHT_FALLBACK,
};
use mapato::models::Sector;

use crate::common::{sample_pick, test_config};

const GENERATE_PATH: &str = "/v1beta/models/gemini-3-flash-preview:generateContent";

fn success_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ] } }
        ]
    })
}

#[test_log::test(tokio::test)]
async fn stock_insight_returns_generated_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body(
            "EQTY trades below book with a strong deposit franchise.",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new(&test_config(&server.uri())).unwrap();
    let pick = sample_pick("EQTY", Sector::Finance);
    let text = client.stock_insight(&pick).await.unwrap();
    assert_eq!(text, "EQTY trades below book with a strong deposit franchise.");
}

#[test_log::test(tokio::test)]
async fn stock_insight_prompt_carries_the_symbol() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new(&test_config(&server.uri())).unwrap();
    let pick = sample_pick("KPLC", Sector::Utilities);
    client.stock_insight(&pick).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("KPLC"));
    assert!(prompt.contains("Utilities"));
}

#[test_log::test(tokio::test)]
async fn server_error_falls_back_to_fixed_stock_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = GeminiClient::new(&test_config(&server.uri())).unwrap();
    let pick = sample_pick("EQTY", Sector::Finance);
    let text = request_stock_insight(&client, &pick).await;
    assert_eq!(text, STOCK_INSIGHT_FALLBACK);
}

#[test_log::test(tokio::test)]
async fn empty_candidate_list_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let client = GeminiClient::new(&test_config(&server.uri())).unwrap();
    let pick = sample_pick("EQTY", Sector::Finance);
    let text = request_stock_insight(&client, &pick).await;
    assert_eq!(text, STOCK_INSIGHT_FALLBACK);
}

#[test_log::test(tokio::test)]
async fn file_insight_sends_inline_data_part() {
    let server = MockServer::start().await;
    // "fake" base64-encodes to ZmFrZQ==
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({
            "contents": [
                { "parts": [ { "inlineData": { "mimeType": "image/png", "data": "ZmFrZQ==" } } ] }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body(
            "The chart shows a breakout above resistance.",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new(&test_config(&server.uri())).unwrap();
    let text = client.file_insight(b"fake", "image/png").await.unwrap();
    assert_eq!(text, "The chart shows a breakout above resistance.");
}

#[test_log::test(tokio::test)]
async fn file_analysis_failure_falls_back_to_fixed_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let client = GeminiClient::new(&test_config(&server.uri())).unwrap();
    let text = request_file_insight(&client, b"fake", "application/pdf").await;
    assert_eq!(text, FILE_INSIGHT_FALLBACK);
}
