//! Integration tests for `ChatClient` and `ProviderChain` using wiremock HTTP mocks.

use std::time::Duration;

use copylab_core::{
    AdContent, AnalysisClient, Angle, CollaboratorError, CreativeConfig, EmotionStance,
    GenerationClient, PlatformProfile, QualityScore, Tone, VariationType,
};
use copylab_llm::types::Prompt;
use copylab_llm::{ChatClient, LlmError, ProviderChain};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(name: &str, server: &MockServer) -> ChatClient {
    ChatClient::with_base_url(name, "test-key", "test-model", 5, &format!("{}/v1", server.uri()))
        .expect("client construction should not fail")
}

fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content }, "finish_reason": "stop" }
        ]
    })
}

fn sample_prompt() -> Prompt {
    Prompt {
        system: "system".to_owned(),
        user: "user".to_owned(),
        temperature: 0.2,
    }
}

fn sample_content() -> AdContent {
    AdContent::new(
        "Get 50% off today",
        "Limited time offer, buy now.",
        "Shop Now",
        "facebook",
    )
}

fn sample_config() -> CreativeConfig {
    CreativeConfig {
        variation_type: VariationType::Improved,
        creativity: 5,
        urgency: 5,
        emotion: EmotionStance::Inspiring,
        tone: Tone::Balanced,
        angle: Angle::Benefit,
        target_psychology: "bargain hunters".to_owned(),
        key_improvements: vec!["Add emotional pull".to_owned()],
        power_words: vec!["save".to_owned(), "now".to_owned()],
        platform: PlatformProfile::generic(),
    }
}

#[tokio::test]
async fn complete_sends_bearer_auth_and_returns_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({ "model": "test-model" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("hello")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for("primary", &server);
    let reply = client.complete(&sample_prompt()).await.expect("should complete");
    assert_eq!(reply, "hello");
}

#[tokio::test]
async fn complete_surfaces_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let client = client_for("primary", &server);
    let err = client.complete(&sample_prompt()).await.unwrap_err();
    match err {
        LlmError::ApiError {
            provider,
            status,
            message,
        } => {
            assert_eq!(provider, "primary");
            assert_eq!(status, 401);
            assert!(message.contains("invalid api key"));
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn complete_rejects_empty_choices() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
        )
        .mount(&server)
        .await;

    let client = client_for("primary", &server);
    let err = client.complete(&sample_prompt()).await.unwrap_err();
    assert!(matches!(err, LlmError::EmptyCompletion { .. }));
}

#[tokio::test]
async fn generate_parses_fenced_copy() {
    let server = MockServer::start().await;

    let reply = "```json\n{\"headline\": \"Save Big Today\", \"body\": \"Half off everything.\", \"cta\": \"Claim Deal\"}\n```";
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(reply)))
        .mount(&server)
        .await;

    let chain = ProviderChain::new(vec![client_for("primary", &server)], 0, 0);
    let copy = chain
        .generate(&sample_content(), &sample_config())
        .await
        .expect("should generate");

    assert_eq!(copy.headline, "Save Big Today");
    assert_eq!(copy.body, "Half off everything.");
    assert_eq!(copy.cta, "Claim Deal");
}

#[tokio::test]
async fn server_error_is_retried_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("{\"ok\": true}")))
        .expect(1)
        .mount(&server)
        .await;

    let chain = ProviderChain::new(vec![client_for("primary", &server)], 2, 0);
    let reply = chain
        .assess(&sample_content(), &PlatformProfile::generic())
        .await
        .expect("should succeed after one retry");
    assert_eq!(reply, "{\"ok\": true}");
}

#[tokio::test]
async fn unauthorized_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let chain = ProviderChain::new(vec![client_for("primary", &server)], 3, 0);
    let err = chain
        .assess(&sample_content(), &PlatformProfile::generic())
        .await
        .unwrap_err();
    assert!(matches!(err, CollaboratorError::Exhausted(_)));
}

#[tokio::test]
async fn failing_primary_falls_over_to_fallback() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&primary)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("advice")))
        .expect(1)
        .mount(&fallback)
        .await;

    let chain = ProviderChain::new(
        vec![
            client_for("primary", &primary),
            client_for("fallback", &fallback),
        ],
        1,
        0,
    );
    let baseline = copylab_core::QualityScore::new(70.0, 70.0, 40.0, 60.0, 80.0);
    let reply = chain
        .advise(&sample_content(), &baseline, &PlatformProfile::generic())
        .await
        .expect("fallback should answer");
    assert_eq!(reply, "advice");
}

#[tokio::test]
async fn malformed_copy_moves_to_next_provider() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion("Sure! Here's a headline.")),
        )
        .expect(1)
        .mount(&primary)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"headline": "Fresh Deals", "body": "New arrivals weekly.", "cta": "Browse"}"#,
        )))
        .expect(1)
        .mount(&fallback)
        .await;

    let chain = ProviderChain::new(
        vec![
            client_for("primary", &primary),
            client_for("fallback", &fallback),
        ],
        2,
        0,
    );
    let copy = chain
        .generate(&sample_content(), &sample_config())
        .await
        .expect("fallback should produce copy");
    assert_eq!(copy.headline, "Fresh Deals");
}

fn fallback_chain(primary: &MockServer, fallback: &MockServer) -> ProviderChain {
    ProviderChain::new(
        vec![
            client_for("primary", primary),
            client_for("fallback", fallback),
        ],
        2,
        0,
    )
}

const ADVICE_JSON: &str = r#"{"target_psychology": "deal seekers who fear missing out", "power_words": ["save", "free", "exclusive", "instant", "proven"]}"#;

#[tokio::test]
async fn prose_advice_moves_to_next_provider() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("Sure! Try words like save and free.")),
        )
        .expect(1)
        .mount(&primary)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(ADVICE_JSON)))
        .expect(1)
        .mount(&fallback)
        .await;

    let chain = fallback_chain(&primary, &fallback);
    let reply = chain
        .advise(
            &sample_content(),
            &QualityScore::new(70.0, 70.0, 40.0, 60.0, 90.0),
            &PlatformProfile::generic(),
        )
        .await
        .expect("fallback should answer");
    assert_eq!(reply, ADVICE_JSON);
}

#[tokio::test]
async fn prose_assessment_moves_to_next_provider() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;
    let assessment = r#"{"grammar": 90, "clarity": 80, "emotion": 55, "cta_strength": 70, "platform_fit": 95, "key_issues": ["Weak emotional hook"]}"#;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion("This ad looks solid overall.")),
        )
        .expect(1)
        .mount(&primary)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(assessment)))
        .expect(1)
        .mount(&fallback)
        .await;

    let chain = fallback_chain(&primary, &fallback);
    let reply = chain
        .assess(&sample_content(), &PlatformProfile::generic())
        .await
        .expect("fallback should answer");
    assert_eq!(reply, assessment);
}

#[tokio::test]
async fn prose_from_every_provider_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("No JSON here.")))
        .mount(&server)
        .await;

    let chain = ProviderChain::new(vec![client_for("only", &server)], 0, 0);
    let err = chain
        .assess(&sample_content(), &PlatformProfile::generic())
        .await
        .unwrap_err();
    match err {
        CollaboratorError::Exhausted(msg) => assert!(msg.contains("only assessment")),
        other => panic!("expected Exhausted, got {other:?}"),
    }
}

#[tokio::test]
async fn hanging_primary_leaves_time_for_fallback() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion(ADVICE_JSON))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&primary)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(ADVICE_JSON)))
        .expect(1)
        .mount(&fallback)
        .await;

    let chain = fallback_chain(&primary, &fallback)
        .with_provider_budget(Duration::from_millis(500));
    let reply = tokio::time::timeout(
        Duration::from_millis(1500),
        chain.advise(
            &sample_content(),
            &QualityScore::new(70.0, 70.0, 40.0, 60.0, 90.0),
            &PlatformProfile::generic(),
        ),
    )
    .await
    .expect("chain should finish inside the caller's timeout")
    .expect("fallback should answer");
    assert_eq!(reply, ADVICE_JSON);
}

#[tokio::test]
async fn all_providers_failing_reports_exhausted() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("not json")))
        .mount(&server)
        .await;

    let chain = ProviderChain::new(vec![client_for("only", &server)], 0, 0);
    let err = chain
        .complete_with(&sample_prompt(), copylab_llm::prompts::parse_generated_copy)
        .await
        .unwrap_err();
    match err {
        LlmError::Exhausted { attempted, last } => {
            assert_eq!(attempted, 1);
            assert!(last.contains("generated copy"), "last error was: {last}");
        }
        other => panic!("expected Exhausted, got {other:?}"),
    }
}
