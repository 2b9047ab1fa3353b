//! Quote repository client against a mocked quote API.

mod common;

use common::{quote_json, settings_for, TestApp, TEST_QUOTE_ID};
use quote_desk::models::{ExportFormat, QuoteDraft, QuoteId};
use quote_desk::services::QuoteEditor;
use quote_desk::{AppError, AppState};
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header_exists, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn list_decodes_quotes() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/api/quotes"))
        .and(header_exists("x-request-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            quote_json("a", "1"),
            quote_json("b", "2")
        ])))
        .expect(1)
        .mount(&app.server)
        .await;

    let quotes = app.state.quotes.list().await.expect("list succeeds");
    assert_eq!(quotes.len(), 2);
    assert_eq!(quotes[1].quote_number, "2");
    assert_eq!(quotes[0].total_amount, Decimal::new(2875, 1));
}

#[tokio::test]
async fn get_missing_quote_is_not_found() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/api/quotes/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Quote not found"})))
        .mount(&app.server)
        .await;

    let err = app.state.quotes.get(&QuoteId::new("nope")).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref what) if what == "Quote nope"));
}

#[tokio::test]
async fn server_error_keeps_status_and_body() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/api/quotes"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .mount(&app.server)
        .await;

    match app.state.quotes.list().await {
        Err(AppError::Server { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "database unavailable");
        }
        other => panic!("expected server error, got {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let state = AppState::new(settings_for("http://127.0.0.1:1"));
    let err = state.quotes.list().await.unwrap_err();
    assert!(matches!(err, AppError::Transport(_)));
    assert!(err.user_message().contains("Could not reach"));
}

#[tokio::test]
async fn malformed_body_is_an_invalid_response() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/quotes/{}", TEST_QUOTE_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&app.server)
        .await;

    let err = app.state.quotes.get(&QuoteId::new(TEST_QUOTE_ID)).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidResponse(_)));
}

#[tokio::test]
async fn create_sends_recomputed_totals() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/api/quotes"))
        .and(body_partial_json(json!({
            "subtotal": 250.0,
            "tax_amount": 37.5,
            "total_amount": 287.5
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(quote_json(TEST_QUOTE_ID, "12")))
        .expect(1)
        .mount(&app.server)
        .await;

    let mut editor = QuoteEditor::new();
    for edit in [
        "customer.name=Red Sea Events",
        "project=Tension awning",
        "item.1.description=Awning",
        "item.1.quantity=2",
        "item.1.unit_price=100",
        "item.2.description=Installation",
        "item.2.unit_price=50",
    ] {
        editor.apply(edit.parse().unwrap()).unwrap();
    }

    let saved = editor.save(app.state.quotes.as_ref()).await.expect("create succeeds");
    assert_eq!(saved.quote_number, "12");
}

#[tokio::test]
async fn update_and_delete_hit_the_quote_route() {
    let app = TestApp::spawn().await;
    let route = format!("/api/quotes/{}", TEST_QUOTE_ID);
    Mock::given(method("PUT"))
        .and(path(route.as_str()))
        .and(body_partial_json(json!({"project_description": "Updated"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(quote_json(TEST_QUOTE_ID, "12")))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(route.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Quote deleted successfully"})))
        .expect(1)
        .mount(&app.server)
        .await;

    let id = QuoteId::new(TEST_QUOTE_ID);
    let draft = QuoteDraft {
        project_description: "Updated".into(),
        ..QuoteDraft::default()
    };
    app.state.quotes.update(&id, &draft).await.expect("update succeeds");
    app.state.quotes.delete(&id).await.expect("delete succeeds");
}

#[tokio::test]
async fn export_downloads_raw_bytes() {
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/quotes/{}/export/excel", TEST_QUOTE_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04sheet".to_vec()))
        .expect(1)
        .mount(&app.server)
        .await;

    let bytes = app
        .state
        .quotes
        .export_document(&QuoteId::new(TEST_QUOTE_ID), ExportFormat::Excel)
        .await
        .expect("export succeeds");
    assert!(bytes.starts_with(b"PK"));
}
