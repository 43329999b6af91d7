mod common;

use book_companion::config::BackendSettings;
use book_companion::controllers::{ChapterActions, ChapterPage, ChapterState, ContentRegion};
use book_companion::services::BackendClient;
use common::{TestBackend, CHAPTER_HTML, TEST_CHAPTER, TEST_EXTERNAL_ID};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn status_path() -> String {
    format!(
        "/api/users/{}/award-status/{}",
        TEST_EXTERNAL_ID, TEST_CHAPTER
    )
}

async fn mock_status(backend: &TestBackend, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(status_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&backend.server)
        .await;
}

async fn mock_translation(backend: &TestBackend, urdu: &str, calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/translate/urdu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "urdu_content": urdu })))
        .expect(calls)
        .mount(&backend.server)
        .await;
}

async fn mock_award(backend: &TestBackend, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/users/award-bonus"))
        .respond_with(response)
        .mount(&backend.server)
        .await;
}

#[tokio::test]
async fn mount_disables_already_awarded_chapter() {
    let backend = TestBackend::signed_in().await;
    mock_status(&backend, json!({ "awarded": true, "remaining": 100 })).await;
    mock_translation(&backend, "ترجمہ", 0).await;

    let mut actions = backend
        .companion
        .chapter_actions(TEST_CHAPTER, &backend.chapter_page());
    actions.mount().await;

    assert_eq!(actions.state(), ChapterState::Disabled);
    assert!(actions.is_disabled());
    assert_eq!(actions.message(), Some("Already translated — bonus awarded"));

    actions.translate().await;
    assert_eq!(actions.state(), ChapterState::Disabled);
    assert_eq!(actions.rendered(), CHAPTER_HTML);
}

#[tokio::test]
async fn mount_disables_when_no_bonus_remains() {
    let backend = TestBackend::signed_in().await;
    mock_status(&backend, json!({ "awarded": false, "remaining": 0, "total_points": 500 })).await;

    let mut actions = backend
        .companion
        .chapter_actions(TEST_CHAPTER, &backend.chapter_page());
    actions.mount().await;

    assert_eq!(actions.state(), ChapterState::Disabled);
    assert_eq!(actions.message(), Some("Max bonus reached"));
}

#[tokio::test]
async fn mount_without_session_makes_no_call() {
    let backend = TestBackend::spawn().await;

    let mut actions = backend
        .companion
        .chapter_actions(TEST_CHAPTER, &backend.chapter_page());
    actions.mount().await;
    actions.translate().await;

    assert_eq!(actions.state(), ChapterState::Idle);
    assert!(actions.is_disabled());
    assert!(backend.request_bodies().await.is_empty());
}

#[tokio::test]
async fn failed_status_lookup_leaves_chapter_eligible() {
    let backend = TestBackend::signed_in().await;
    Mock::given(method("GET"))
        .and(path(status_path()))
        .respond_with(ResponseTemplate::new(500))
        .mount(&backend.server)
        .await;

    let mut actions = backend
        .companion
        .chapter_actions(TEST_CHAPTER, &backend.chapter_page());
    actions.mount().await;

    assert_eq!(actions.state(), ChapterState::Eligible);
    assert!(!actions.is_disabled());
    assert_eq!(actions.message(), None);
}

#[tokio::test]
async fn translation_awards_bonus_on_first_claim() {
    let backend = TestBackend::signed_in().await;
    mock_status(&backend, json!({ "awarded": false, "remaining": 1 })).await;
    mock_translation(&backend, "<h1>حرکیات</h1>", 1).await;
    mock_award(
        &backend,
        ResponseTemplate::new(200).set_body_json(json!({
            "awarded": true,
            "awarded_points": 50,
            "total_points": 50
        })),
    )
    .await;

    let mut actions = backend
        .companion
        .chapter_actions(TEST_CHAPTER, &backend.chapter_page());
    actions.mount().await;
    assert_eq!(actions.state(), ChapterState::Eligible);

    actions.translate().await;

    assert_eq!(actions.state(), ChapterState::Translated);
    assert_eq!(actions.rendered(), "<h1>حرکیات</h1>");
    assert_eq!(
        actions.message(),
        Some("Translation complete — you earned 50 bonus points (total 50)")
    );
    assert!(!actions.is_disabled());

    let bodies = backend.request_bodies().await;
    let translate = &bodies[1];
    assert_eq!(translate["content"], CHAPTER_HTML);
    assert_eq!(translate["preserve_code_blocks"], true);

    let award = &bodies[2];
    assert_eq!(award["external_id"], TEST_EXTERNAL_ID);
    assert_eq!(award["chapter"], TEST_CHAPTER);
    assert_eq!(award["points"], 50);
}

#[tokio::test]
async fn translation_reports_bonus_already_claimed() {
    let backend = TestBackend::signed_in().await;
    mock_translation(&backend, "ترجمہ", 1).await;
    mock_award(
        &backend,
        ResponseTemplate::new(200).set_body_json(json!({ "awarded": false, "total_points": 150 })),
    )
    .await;

    let mut actions = backend
        .companion
        .chapter_actions(TEST_CHAPTER, &backend.chapter_page());
    actions.translate().await;

    assert_eq!(
        actions.message(),
        Some("Translation complete — bonus already claimed (total 150)")
    );
}

#[tokio::test]
async fn award_failure_keeps_translation() {
    let backend = TestBackend::signed_in().await;
    mock_translation(&backend, "ترجمہ", 1).await;
    mock_award(
        &backend,
        ResponseTemplate::new(500).set_body_json(json!({ "detail": "ledger down" })),
    )
    .await;

    let mut actions = backend
        .companion
        .chapter_actions(TEST_CHAPTER, &backend.chapter_page());
    actions.translate().await;

    assert_eq!(actions.state(), ChapterState::Translated);
    assert_eq!(actions.message(), Some("Translation complete"));
    assert_eq!(actions.rendered(), "ترجمہ");
}

#[tokio::test]
async fn toggle_restores_identical_original_and_retranslates_from_it() {
    let backend = TestBackend::signed_in().await;
    mock_translation(&backend, "ترجمہ", 2).await;
    mock_award(
        &backend,
        ResponseTemplate::new(200).set_body_json(json!({ "awarded": false, "total_points": 50 })),
    )
    .await;

    let mut actions = backend
        .companion
        .chapter_actions(TEST_CHAPTER, &backend.chapter_page());
    actions.translate().await;
    assert_eq!(actions.rendered(), "ترجمہ");

    actions.toggle().await;
    assert_eq!(actions.state(), ChapterState::Original);
    assert_eq!(actions.rendered(), CHAPTER_HTML);
    assert_eq!(actions.message(), Some("Restored original English content"));

    actions.toggle().await;
    assert_eq!(actions.state(), ChapterState::Translated);
    assert_eq!(actions.content().original(), CHAPTER_HTML);

    let translate_bodies: Vec<_> = backend
        .request_bodies()
        .await
        .into_iter()
        .filter(|body| body.get("preserve_code_blocks").is_some())
        .collect();
    assert_eq!(translate_bodies.len(), 2);
    assert!(translate_bodies
        .iter()
        .all(|body| body["content"] == CHAPTER_HTML));
}

#[tokio::test]
async fn translation_error_uses_backend_detail() {
    let backend = TestBackend::signed_in().await;
    Mock::given(method("POST"))
        .and(path("/api/translate/urdu"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "detail": "Translation service unavailable" })),
        )
        .mount(&backend.server)
        .await;

    let mut actions = backend
        .companion
        .chapter_actions(TEST_CHAPTER, &backend.chapter_page());
    actions.translate().await;

    assert_eq!(actions.state(), ChapterState::Error);
    assert_eq!(actions.message(), Some("Translation service unavailable"));
    assert!(!actions.is_disabled());
    assert!(!actions.has_translation());
    assert_eq!(actions.rendered(), CHAPTER_HTML);
}

#[tokio::test]
async fn translation_error_without_detail_uses_fallback() {
    let backend = TestBackend::signed_in().await;
    Mock::given(method("POST"))
        .and(path("/api/translate/urdu"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&backend.server)
        .await;

    let mut actions = backend
        .companion
        .chapter_actions(TEST_CHAPTER, &backend.chapter_page());
    actions.translate().await;

    assert_eq!(actions.message(), Some("Translation failed"));
}

#[tokio::test]
async fn missing_urdu_content_is_a_failure() {
    let backend = TestBackend::signed_in().await;
    Mock::given(method("POST"))
        .and(path("/api/translate/urdu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&backend.server)
        .await;

    let mut actions = backend
        .companion
        .chapter_actions(TEST_CHAPTER, &backend.chapter_page());
    actions.translate().await;

    assert_eq!(actions.state(), ChapterState::Error);
    assert_eq!(actions.message(), Some("Translation failed"));
}

#[tokio::test]
async fn blank_chapter_fails_without_network_call() {
    let backend = TestBackend::signed_in().await;
    mock_translation(&backend, "ترجمہ", 0).await;

    let page = ChapterPage::new("<body></body>").with_region(ContentRegion::Article, "  \n\t ");
    let mut actions = backend.companion.chapter_actions(TEST_CHAPTER, &page);
    actions.translate().await;

    assert_eq!(actions.state(), ChapterState::Error);
    assert_eq!(actions.message(), Some("No content found to translate"));
}

#[tokio::test]
async fn unreachable_backend_reports_network_error() {
    let backend = TestBackend::signed_in().await;

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = BackendClient::new(&BackendSettings { url }).unwrap();
    let mut actions = ChapterActions::new(
        TEST_CHAPTER,
        &backend.chapter_page(),
        Arc::new(client),
        backend.session().clone(),
    );
    actions.translate().await;

    assert_eq!(actions.state(), ChapterState::Error);
    assert_eq!(actions.message(), Some("Network error while translating"));
    assert!(!actions.is_disabled());
}

#[tokio::test]
async fn control_is_released_after_slow_award_settles() {
    let backend = TestBackend::signed_in().await;
    mock_translation(&backend, "ترجمہ", 1).await;
    mock_award(
        &backend,
        ResponseTemplate::new(200)
            .set_delay(std::time::Duration::from_millis(200))
            .set_body_json(json!({ "awarded": true, "awarded_points": 50, "total_points": 100 })),
    )
    .await;

    let mut actions = backend
        .companion
        .chapter_actions(TEST_CHAPTER, &backend.chapter_page());
    actions.translate().await;

    assert_eq!(
        actions.message(),
        Some("Translation complete — you earned 50 bonus points (total 100)")
    );
    assert!(!actions.is_disabled());

    actions.toggle().await;
    assert_eq!(actions.state(), ChapterState::Original);
}
