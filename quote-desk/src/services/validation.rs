//! Save-time checks.
//!
//! Draft rules are declared on the models with `validator`; the report is
//! translated into [`ValidationIssue`]s here. Every rule is evaluated so
//! one pass reports all problems.

use crate::models::QuoteDraft;
use std::fmt;
use thiserror::Error;
use validator::{Validate, ValidationErrorsKind};

/// Largest accepted logo upload.
pub const MAX_LOGO_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("customer name is required")]
    MissingCustomerName,
    #[error("project description is required")]
    MissingProjectDescription,
    /// `index` is zero-based; the message shows it one-based.
    #[error("line item {} needs a description", .index + 1)]
    MissingLineItemDescription { index: usize },
    #[error("a quote needs at least one line item")]
    NoLineItems,
    #[error("logo must be an image file")]
    LogoNotImage,
    #[error("logo is {size} bytes, the limit is 5 MB")]
    LogoTooLarge { size: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(Vec<ValidationIssue>);

impl ValidationErrors {
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, issue: &ValidationIssue) -> bool {
        self.0.contains(issue)
    }

    fn push(&mut self, issue: ValidationIssue) {
        self.0.push(issue);
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationIssue> for ValidationErrors {
    fn from(issue: ValidationIssue) -> Self {
        Self(vec![issue])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

pub fn validate(draft: &QuoteDraft) -> Result<(), ValidationErrors> {
    match draft.validate() {
        Ok(()) => Ok(()),
        Err(report) => issues_from(&report).into_result(),
    }
}

fn issues_from(report: &validator::ValidationErrors) -> ValidationErrors {
    let fields = report.errors();
    let mut errors = ValidationErrors::default();

    if let Some(ValidationErrorsKind::Struct(customer)) = fields.get("customer") {
        if has_code(customer.errors().get("name"), "blank") {
            errors.push(ValidationIssue::MissingCustomerName);
        }
    }
    if has_code(fields.get("project_description"), "blank") {
        errors.push(ValidationIssue::MissingProjectDescription);
    }
    let items = fields.get("items");
    if has_code(items, "no_line_items") {
        errors.push(ValidationIssue::NoLineItems);
    }
    if let Some(ValidationErrorsKind::List(items)) = items {
        // Keyed by position, so the issues come out in item order.
        for (&index, item) in items {
            if has_code(item.errors().get("description"), "blank") {
                errors.push(ValidationIssue::MissingLineItemDescription { index });
            }
        }
    }

    if errors.is_empty() {
        tracing::warn!(report = %report, "Unmapped validation failure");
    }
    errors
}

fn has_code(kind: Option<&ValidationErrorsKind>, code: &str) -> bool {
    matches!(kind, Some(ValidationErrorsKind::Field(list)) if list.iter().any(|e| e.code == code))
}

/// `content_type` is the sniffed MIME type, `None` when the bytes are not a
/// recognised image.
pub fn validate_logo(content_type: Option<&str>, size: usize) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if !content_type.is_some_and(|mime| mime.starts_with("image/")) {
        errors.push(ValidationIssue::LogoNotImage);
    }
    if size > MAX_LOGO_BYTES {
        errors.push(ValidationIssue::LogoTooLarge { size });
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CustomerField, LineItem};

    fn valid_draft() -> QuoteDraft {
        let mut draft = QuoteDraft::default();
        draft.customer.apply(CustomerField::Name("Red Sea Events".into()));
        draft.project_description = "Car park shades".into();
        draft.items[0].description = "Shade sail".into();
        draft
    }

    #[test]
    fn valid_draft_passes() {
        assert!(validate(&valid_draft()).is_ok());
    }

    #[test]
    fn whitespace_customer_name_fails_even_when_rest_is_valid() {
        for name in ["", "   ", "\t\n"] {
            let mut draft = valid_draft();
            draft.customer.name = name.into();
            let errors = validate(&draft).unwrap_err();
            assert_eq!(errors.issues(), &[ValidationIssue::MissingCustomerName]);
        }
    }

    #[test]
    fn reports_every_problem() {
        let mut draft = QuoteDraft::default();
        draft.items.push(LineItem::blank());
        draft.items[1].description = "ok".into();
        draft.items.push(LineItem::blank());

        let errors = validate(&draft).unwrap_err();
        assert_eq!(
            errors.issues(),
            &[
                ValidationIssue::MissingCustomerName,
                ValidationIssue::MissingProjectDescription,
                ValidationIssue::MissingLineItemDescription { index: 0 },
                ValidationIssue::MissingLineItemDescription { index: 2 },
            ]
        );
        assert_eq!(
            errors.to_string(),
            "customer name is required; project description is required; \
             line item 1 needs a description; line item 3 needs a description"
        );
    }

    #[test]
    fn blank_item_description_is_reported_by_position() {
        let mut draft = valid_draft();
        draft.items.push(LineItem::blank());
        draft.items.push(LineItem::blank());
        draft.items[2].description = " Delivery ".into();

        let errors = validate(&draft).unwrap_err();
        assert_eq!(
            errors.issues(),
            &[ValidationIssue::MissingLineItemDescription { index: 1 }]
        );
    }

    #[test]
    fn empty_item_list_is_rejected() {
        let mut draft = valid_draft();
        draft.items.clear();
        assert!(validate(&draft)
            .unwrap_err()
            .contains(&ValidationIssue::NoLineItems));
    }

    #[test]
    fn logo_rules() {
        assert!(validate_logo(Some("image/png"), 1024).is_ok());
        assert!(validate_logo(Some("application/pdf"), 10)
            .unwrap_err()
            .contains(&ValidationIssue::LogoNotImage));

        let errors = validate_logo(None, MAX_LOGO_BYTES + 1).unwrap_err();
        assert_eq!(errors.issues().len(), 2);
    }
}
