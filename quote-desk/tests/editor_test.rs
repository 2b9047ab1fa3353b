//! Quote editor save flow.

mod common;

use common::{quote, InMemoryQuoteStore, TestApp, TEST_QUOTE_ID};
use quote_desk::models::QuoteId;
use quote_desk::services::validation::ValidationIssue;
use quote_desk::services::{DraftEdit, EditorMode, QuoteEditor, QuoteStore};
use quote_desk::AppError;
use rust_decimal::Decimal;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn filled_editor() -> QuoteEditor {
    let mut editor = QuoteEditor::new();
    for edit in [
        "customer.name=Red Sea Events",
        "project=Car park shades",
        "item.1.description=Shade sail",
        "item.1.quantity=3",
        "item.1.unit_price=1.000,5",
    ] {
        editor.apply(edit.parse().unwrap()).unwrap();
    }
    editor
}

#[tokio::test]
async fn whitespace_customer_name_never_reaches_the_server() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/api/quotes"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.server)
        .await;

    let mut editor = filled_editor();
    editor.apply("customer.name=   ".parse().unwrap()).unwrap();

    let err = editor.save(app.state.quotes.as_ref()).await.unwrap_err();
    match err {
        AppError::Validation(errors) => {
            assert_eq!(errors.issues(), &[ValidationIssue::MissingCustomerName]);
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(editor.mode(), &EditorMode::New);
}

#[tokio::test]
async fn create_then_update_switches_mode() {
    let store = InMemoryQuoteStore::default();
    let mut editor = filled_editor();

    let created = editor.save(&store).await.expect("create succeeds");
    assert_eq!(created.quote_number, "1");
    assert_eq!(editor.mode(), &EditorMode::Edit(created.id.clone()));

    editor
        .apply(DraftEdit::ProjectDescription("Car park shades, phase 2".into()))
        .unwrap();
    let updated = editor.save(&store).await.expect("update succeeds");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.quote_number, "1");
    assert_eq!(updated.project_description, "Car park shades, phase 2");
}

#[tokio::test]
async fn saved_quote_reads_back_unchanged() {
    let store = InMemoryQuoteStore::default();
    let mut editor = filled_editor();
    editor.apply("notes=Valid for 30 days".parse().unwrap()).unwrap();
    let before = editor.draft().clone();

    let created = editor.save(&store).await.unwrap();
    let fetched = store.get(&created.id).await.unwrap();
    assert_eq!(fetched.to_draft(), before);
}

#[tokio::test]
async fn lenient_numbers_flow_into_saved_totals() {
    let store = InMemoryQuoteStore::default();
    let mut editor = filled_editor();
    // "1.000,5" does not parse and was read as 0; a comma decimal does.
    editor.apply("item.1.unit_price=12,5".parse().unwrap()).unwrap();

    let saved = editor.save(&store).await.unwrap();
    assert_eq!(saved.items[0].total_price, Decimal::new(375, 1));
    assert_eq!(saved.subtotal, Decimal::new(375, 1));
    assert_eq!(saved.tax_amount, Decimal::new(563, 2));
    assert_eq!(saved.total_amount, Decimal::new(4313, 2));
}

#[tokio::test]
async fn opening_recomputes_stale_totals() {
    let mut stored = quote(TEST_QUOTE_ID, "12");
    stored.total_amount = Decimal::new(1, 0);
    let store = InMemoryQuoteStore::with_quotes(vec![stored]);

    let editor = QuoteEditor::open(&store, &QuoteId::new(TEST_QUOTE_ID)).await.unwrap();
    assert_eq!(editor.mode(), &EditorMode::Edit(QuoteId::new(TEST_QUOTE_ID)));
    assert_eq!(editor.draft().total_amount, Decimal::new(28750, 2));
}

#[tokio::test]
async fn failed_save_keeps_the_draft() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/api/quotes"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&app.server)
        .await;

    let mut editor = filled_editor();
    let before = editor.draft().clone();

    let err = editor.save(app.state.quotes.as_ref()).await.unwrap_err();
    assert!(matches!(err, AppError::Server { status: 503, .. }));
    assert_eq!(editor.draft(), &before);
    assert_eq!(editor.mode(), &EditorMode::New);
}

#[tokio::test]
async fn opening_unknown_quote_fails() {
    let store = InMemoryQuoteStore::default();
    let result = QuoteEditor::open(&store, &QuoteId::new("missing")).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}
