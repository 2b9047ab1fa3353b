use crate::config::PdfSource;
use crate::error::AppError;
use crate::format::{currency_label, format_amount, format_date, format_quantity, Locale};
use crate::models::{ExportFormat, Quote, QuoteDraft, QuoteId};
use crate::services::{DraftEdit, QuoteEditor, Session};
use crate::AppState;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;

async fn start_session(state: &AppState) -> Result<Session, AppError> {
    Session::start(Arc::clone(&state.quotes), Arc::clone(&state.company)).await
}

pub async fn list(state: &AppState) -> Result<(), AppError> {
    let session = start_session(state).await?;
    let locale = state.settings.export.locale;
    let currency = currency_label(locale);

    for quote in session.quotes() {
        println!(
            "{:>6}  {:<36}  {:<28}  {:>14} {}  {}",
            quote.quote_number,
            quote.id,
            quote.customer.name,
            format_amount(quote.total_amount, locale),
            currency,
            format_date(quote.created_date, locale),
        );
    }

    let summary = session.summary(Utc::now());
    println!();
    println!("Quotes:      {}", summary.count);
    println!(
        "Total value: {} {}",
        format_amount(summary.total_value, locale),
        currency
    );
    println!("This month:  {}", summary.this_month);
    Ok(())
}

pub async fn show(state: &AppState, id: &QuoteId) -> Result<(), AppError> {
    let quote = state.quotes.get(id).await?;
    print_quote(&quote, state.settings.export.locale);
    Ok(())
}

pub async fn create(
    state: &AppState,
    from: Option<PathBuf>,
    set: &[String],
) -> Result<(), AppError> {
    let mut editor = match from {
        Some(path) => {
            let raw = tokio::fs::read(&path).await?;
            let draft: QuoteDraft = serde_json::from_slice(&raw).map_err(|e| {
                AppError::BadInput(format!("{} is not a valid quote draft: {}", path.display(), e))
            })?;
            QuoteEditor::from_draft(draft)
        }
        None => QuoteEditor::new(),
    };

    editor.apply_all(parse_edits(set)?)?;
    let mut session = start_session(state).await?;
    let saved = session.save_quote(&mut editor).await?;
    println!(
        "Created quote #{} ({}), {} quote(s) on file",
        saved.quote_number,
        saved.id,
        session.quotes().len()
    );
    print_totals(&saved, state.settings.export.locale);
    Ok(())
}

pub async fn edit(
    state: &AppState,
    id: &QuoteId,
    set: &[String],
    add_item: u8,
    remove_item: &[usize],
) -> Result<(), AppError> {
    let mut session = start_session(state).await?;
    let mut editor = session.edit_quote(id).await?;

    let mut edits = parse_edits(set)?;
    edits.extend((0..add_item).map(|_| DraftEdit::AddItem));

    // Highest index first so earlier removals do not shift later ones.
    let mut removals = remove_item.to_vec();
    removals.sort_unstable_by(|a, b| b.cmp(a));
    removals.dedup();
    for number in removals {
        if number == 0 {
            return Err(AppError::BadInput("Item numbers start at 1".to_string()));
        }
        edits.push(DraftEdit::RemoveItem(number - 1));
    }

    editor.apply_all(edits)?;
    let saved = session.save_quote(&mut editor).await?;
    println!("Updated quote #{} ({})", saved.quote_number, saved.id);
    print_totals(&saved, state.settings.export.locale);
    Ok(())
}

pub async fn delete(state: &AppState, id: &QuoteId) -> Result<(), AppError> {
    let mut session = start_session(state).await?;
    session.delete_quote(id).await?;
    println!("Deleted quote {} ({} remaining)", id, session.quotes().len());
    Ok(())
}

pub async fn export(
    state: &AppState,
    id: &QuoteId,
    format: ExportFormat,
    out: Option<PathBuf>,
    server: bool,
) -> Result<(), AppError> {
    let mut exporter = state.exporter();
    if server {
        exporter = exporter.with_pdf_source(PdfSource::Server);
    }

    let document = exporter.export(id, format).await?;
    for warning in &document.warnings {
        eprintln!("Warning: {}", warning);
    }

    let dir = out.unwrap_or_else(|| state.settings.export.output_dir.clone());
    let path = document.save(&dir).await?;
    match document.page_count {
        Some(pages) => println!("Saved {} ({} page(s))", path.display(), pages),
        None => println!("Saved {}", path.display()),
    }
    Ok(())
}

fn parse_edits(raw: &[String]) -> Result<Vec<DraftEdit>, AppError> {
    raw.iter()
        .map(|r| r.parse::<DraftEdit>().map_err(AppError::BadInput))
        .collect()
}

fn print_quote(quote: &Quote, locale: Locale) {
    println!("Quote #{}  ({})", quote.quote_number, quote.id);
    println!("Date:     {}", format_date(quote.created_date, locale));
    println!("Customer: {}", quote.customer.name);
    let address = quote.customer.address_parts().join(", ");
    if !address.is_empty() {
        println!("          {}", address);
    }
    println!("Project:  {}", quote.project_description);
    if !quote.location.trim().is_empty() {
        println!("Location: {}", quote.location);
    }
    println!();

    for (i, item) in quote.items.iter().enumerate() {
        println!(
            "{:>3}. {:<40} {:>8} {:<8} x {:>12} = {:>14}",
            i + 1,
            item.description,
            format_quantity(item.quantity, locale),
            item.unit,
            format_amount(item.unit_price, locale),
            format_amount(item.total_price, locale),
        );
    }
    println!();
    print_totals(quote, locale);

    if let Some(notes) = quote.notes_text() {
        println!();
        println!("Notes:");
        println!("{}", notes);
    }
}

fn print_totals(quote: &Quote, locale: Locale) {
    let currency = currency_label(locale);
    println!("Subtotal: {} {}", format_amount(quote.subtotal, locale), currency);
    println!("VAT 15%:  {} {}", format_amount(quote.tax_amount, locale), currency);
    println!("Total:    {} {}", format_amount(quote.total_amount, locale), currency);
}
