//! Quote editing session: owns one draft and saves it through a [`QuoteStore`].

use super::quote_client::QuoteStore;
use super::totals::{self, EditError};
use super::validation::validate;
use crate::error::AppError;
use crate::models::{CustomerField, ItemField, Quote, QuoteDraft, QuoteId};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    /// Saving creates a quote.
    New,
    /// Saving updates the quote with this id.
    Edit(QuoteId),
}

/// One edit to a draft. Item indexes are zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftEdit {
    Customer(CustomerField),
    ProjectDescription(String),
    Location(String),
    Notes(String),
    Item { index: usize, field: ItemField },
    AddItem,
    RemoveItem(usize),
}

impl FromStr for DraftEdit {
    type Err = String;

    /// Parse `key=value`, where key is `customer.<field>`, `project`,
    /// `location`, `notes` or `item.<n>.<field>` with a one-based `n`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
        let key = key.trim();

        match key {
            "project" | "project_description" => {
                return Ok(DraftEdit::ProjectDescription(value.to_string()))
            }
            "location" => return Ok(DraftEdit::Location(value.to_string())),
            "notes" => return Ok(DraftEdit::Notes(value.to_string())),
            _ => {}
        }

        if let Some(field) = key.strip_prefix("customer.") {
            return CustomerField::from_key(field, value)
                .map(DraftEdit::Customer)
                .ok_or_else(|| format!("unknown customer field '{}'", field));
        }

        if let Some(rest) = key.strip_prefix("item.") {
            let (number, field) = rest
                .split_once('.')
                .ok_or_else(|| format!("expected item.<n>.<field>, got '{}'", key))?;
            let number: usize = number
                .parse()
                .map_err(|_| format!("item number '{}' is not a positive integer", number))?;
            if number == 0 {
                return Err("item numbers start at 1".to_string());
            }
            let field = ItemField::from_key(field, value)
                .ok_or_else(|| format!("unknown item field '{}'", field))?;
            return Ok(DraftEdit::Item {
                index: number - 1,
                field,
            });
        }

        Err(format!("unknown key '{}'", key))
    }
}

#[derive(Debug, Clone)]
pub struct QuoteEditor {
    mode: EditorMode,
    draft: QuoteDraft,
}

impl Default for QuoteEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteEditor {
    /// Blank quote with one empty line item.
    pub fn new() -> Self {
        Self::from_draft(QuoteDraft::default())
    }

    /// New quote pre-filled from `draft`; totals are re-derived from its items.
    pub fn from_draft(mut draft: QuoteDraft) -> Self {
        for item in &mut draft.items {
            item.reprice();
        }
        draft.refresh_totals();
        Self {
            mode: EditorMode::New,
            draft,
        }
    }

    /// Edit an existing quote. Stored totals are not trusted and recomputed.
    pub fn edit(quote: &Quote) -> Self {
        let mut editor = Self::from_draft(quote.to_draft());
        editor.mode = EditorMode::Edit(quote.id.clone());
        editor
    }

    pub async fn open(store: &dyn QuoteStore, id: &QuoteId) -> Result<Self, AppError> {
        let quote = store.get(id).await?;
        Ok(Self::edit(&quote))
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn draft(&self) -> &QuoteDraft {
        &self.draft
    }

    /// Apply one edit and recompute totals. On error the draft is unchanged.
    ///
    /// An item edit addressed one past the last item appends a blank item
    /// first.
    pub fn apply(&mut self, edit: DraftEdit) -> Result<(), EditError> {
        match edit {
            DraftEdit::Customer(field) => self.draft.customer.apply(field),
            DraftEdit::ProjectDescription(value) => self.draft.project_description = value,
            DraftEdit::Location(value) => self.draft.location = value,
            DraftEdit::Notes(value) => {
                self.draft.notes = Some(value).filter(|n| !n.trim().is_empty())
            }
            DraftEdit::Item { index, field } => {
                let mut items = self.draft.items.clone();
                if index == items.len() {
                    items = totals::add_item(items);
                }
                let items = totals::update_item_field(items, index, field)?;
                totals::checked_recompute(&items).ok_or(EditError::TotalTooLarge)?;
                self.draft.items = items;
            }
            DraftEdit::AddItem => {
                self.draft.items = totals::add_item(std::mem::take(&mut self.draft.items))
            }
            DraftEdit::RemoveItem(index) => {
                self.draft.items = totals::remove_item(self.draft.items.clone(), index)?
            }
        }
        self.draft.refresh_totals();
        Ok(())
    }

    pub fn apply_all(&mut self, edits: impl IntoIterator<Item = DraftEdit>) -> Result<(), EditError> {
        let snapshot = self.draft.clone();
        for edit in edits {
            if let Err(e) = self.apply(edit) {
                self.draft = snapshot;
                return Err(e);
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), AppError> {
        validate(&self.draft)?;
        Ok(())
    }

    /// Validate, then create or update. Nothing is sent when validation
    /// fails, and a failed request leaves the draft as it was.
    pub async fn save(&mut self, store: &dyn QuoteStore) -> Result<Quote, AppError> {
        self.draft.refresh_totals();
        if let Err(errors) = validate(&self.draft) {
            tracing::info!(issues = errors.issues().len(), "Quote draft rejected by validation");
            return Err(errors.into());
        }

        let saved = match &self.mode {
            EditorMode::New => store.create(&self.draft).await?,
            EditorMode::Edit(id) => store.update(id, &self.draft).await?,
        };

        self.mode = EditorMode::Edit(saved.id.clone());
        self.draft = saved.to_draft();
        self.draft.refresh_totals();
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn set(editor: &mut QuoteEditor, edit: &str) {
        editor.apply(edit.parse().unwrap()).unwrap();
    }

    #[test]
    fn parses_edit_keys() {
        assert_eq!(
            "customer.city=Jeddah".parse::<DraftEdit>().unwrap(),
            DraftEdit::Customer(CustomerField::City("Jeddah".into()))
        );
        assert_eq!(
            "item.2.qty=3".parse::<DraftEdit>().unwrap(),
            DraftEdit::Item {
                index: 1,
                field: ItemField::Quantity(Decimal::new(3, 0))
            }
        );
        assert_eq!(
            "notes=a=b".parse::<DraftEdit>().unwrap(),
            DraftEdit::Notes("a=b".into())
        );
    }

    #[test]
    fn rejects_bad_keys() {
        assert!("project".parse::<DraftEdit>().is_err());
        assert!("item.0.unit=m".parse::<DraftEdit>().is_err());
        assert!("item.x.unit=m".parse::<DraftEdit>().is_err());
        assert!("item.1.colour=red".parse::<DraftEdit>().is_err());
        assert!("customer.age=3".parse::<DraftEdit>().is_err());
        assert!("price=3".parse::<DraftEdit>().is_err());
    }

    #[test]
    fn edits_keep_totals_current() {
        let mut editor = QuoteEditor::new();
        set(&mut editor, "item.1.quantity=2");
        set(&mut editor, "item.1.unit_price=100");
        set(&mut editor, "item.2.description=Install");
        set(&mut editor, "item.2.unit_price=50");

        let draft = editor.draft();
        assert_eq!(draft.items.len(), 2);
        assert_eq!(draft.subtotal, Decimal::new(250, 0));
        assert_eq!(draft.tax_amount, Decimal::new(3750, 2));
        assert_eq!(draft.total_amount, Decimal::new(28750, 2));
    }

    #[test]
    fn failed_edit_leaves_draft_unchanged() {
        let mut editor = QuoteEditor::new();
        set(&mut editor, "item.1.unit_price=10");
        let before = editor.draft().clone();

        let err = editor
            .apply(DraftEdit::Item {
                index: 5,
                field: ItemField::Unit("m".into()),
            })
            .unwrap_err();
        assert_eq!(err, EditError::IndexOutOfBounds { index: 5, len: 1 });
        assert_eq!(editor.draft(), &before);
    }

    #[test]
    fn oversized_amounts_are_refused() {
        let mut editor = QuoteEditor::new();
        set(&mut editor, "item.1.unit_price=2");
        let before = editor.draft().clone();

        let err = editor
            .apply("item.1.quantity=79228162514264337593543950335".parse().unwrap())
            .unwrap_err();
        assert_eq!(err, EditError::AmountTooLarge { index: 0 });
        assert_eq!(editor.draft(), &before);

        // The line itself fits, but adding VAT does not.
        let err = editor
            .apply("item.1.unit_price=79228162514264337593543950335".parse().unwrap())
            .unwrap_err();
        assert_eq!(err, EditError::TotalTooLarge);
        assert_eq!(editor.draft(), &before);
    }

    #[test]
    fn apply_all_rolls_back_on_error() {
        let mut editor = QuoteEditor::new();
        let before = editor.draft().clone();
        let result = editor.apply_all([
            DraftEdit::ProjectDescription("Shade".into()),
            DraftEdit::RemoveItem(3),
        ]);
        assert!(result.is_err());
        assert_eq!(editor.draft(), &before);
    }

    #[test]
    fn last_item_cannot_be_removed() {
        let mut editor = QuoteEditor::new();
        editor.apply(DraftEdit::RemoveItem(0)).unwrap();
        assert_eq!(editor.draft().items.len(), 1);
    }

    #[test]
    fn blank_notes_clear_the_field() {
        let mut editor = QuoteEditor::new();
        set(&mut editor, "notes=Valid for 30 days");
        assert_eq!(editor.draft().notes.as_deref(), Some("Valid for 30 days"));
        set(&mut editor, "notes=  ");
        assert_eq!(editor.draft().notes, None);
    }

    #[test]
    fn from_draft_repairs_stale_totals() {
        let mut draft = QuoteDraft::default();
        draft.items[0].quantity = Decimal::new(4, 0);
        draft.items[0].unit_price = Decimal::new(25, 0);
        draft.total_amount = Decimal::new(1, 0);

        let editor = QuoteEditor::from_draft(draft);
        assert_eq!(editor.mode(), &EditorMode::New);
        assert_eq!(editor.draft().items[0].total_price, Decimal::new(100, 0));
        assert_eq!(editor.draft().total_amount, Decimal::new(11500, 2));
    }

    #[test]
    fn validate_reports_missing_fields() {
        let editor = QuoteEditor::new();
        match editor.validate() {
            Err(AppError::Validation(errors)) => assert_eq!(errors.issues().len(), 3),
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
