//! Quote model.

use super::{not_blank, Customer, LineItem};
use crate::services::totals::{self, Totals};
use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Server-assigned quote identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(String);

impl QuoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for QuoteId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Persisted quote as returned by the quote API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    /// Sequential number shown to customers and used in export file names.
    pub quote_number: String,
    pub customer: Customer,
    pub project_description: String,
    #[serde(default)]
    pub location: String,
    pub items: Vec<LineItem>,
    #[serde(with = "super::amount", default)]
    pub subtotal: Decimal,
    #[serde(with = "super::amount", default)]
    pub tax_amount: Decimal,
    #[serde(with = "super::amount", default)]
    pub total_amount: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_date: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_date: DateTime<Utc>,
}

impl Quote {
    pub fn totals(&self) -> Totals {
        Totals {
            subtotal: self.subtotal,
            tax_amount: self.tax_amount,
            total_amount: self.total_amount,
        }
    }

    /// Editable part of the quote, used as the PUT body.
    pub fn to_draft(&self) -> QuoteDraft {
        QuoteDraft {
            customer: self.customer.clone(),
            project_description: self.project_description.clone(),
            location: self.location.clone(),
            items: self.items.clone(),
            subtotal: self.subtotal,
            tax_amount: self.tax_amount,
            total_amount: self.total_amount,
            notes: self.notes.clone(),
        }
    }

    pub fn notes_text(&self) -> Option<&str> {
        self.notes.as_deref().filter(|n| !n.trim().is_empty())
    }
}

/// Quote body sent on create/update; everything but server-assigned fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct QuoteDraft {
    #[serde(default)]
    #[validate(nested)]
    pub customer: Customer,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub project_description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_items")]
    #[validate(length(min = 1, code = "no_line_items"), nested)]
    pub items: Vec<LineItem>,
    #[serde(with = "super::amount", default)]
    pub subtotal: Decimal,
    #[serde(with = "super::amount", default)]
    pub tax_amount: Decimal,
    #[serde(with = "super::amount", default)]
    pub total_amount: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_items() -> Vec<LineItem> {
    vec![LineItem::blank()]
}

impl Default for QuoteDraft {
    fn default() -> Self {
        Self {
            customer: Customer::default(),
            project_description: String::new(),
            location: String::new(),
            items: default_items(),
            subtotal: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            notes: None,
        }
    }
}

impl QuoteDraft {
    pub fn totals(&self) -> Totals {
        Totals {
            subtotal: self.subtotal,
            tax_amount: self.tax_amount,
            total_amount: self.total_amount,
        }
    }

    /// Re-derive the three totals from the current items.
    pub fn refresh_totals(&mut self) {
        let totals = totals::recompute(&self.items);
        self.subtotal = totals.subtotal;
        self.tax_amount = totals.tax_amount;
        self.total_amount = totals.total_amount;
    }
}

/// Dashboard figures of the quote list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuoteSummary {
    pub count: usize,
    pub total_value: Decimal,
    pub this_month: usize,
}

impl QuoteSummary {
    pub fn from_quotes(quotes: &[Quote], now: DateTime<Utc>) -> Self {
        let this_month = quotes
            .iter()
            .filter(|q| {
                q.created_date.year() == now.year() && q.created_date.month() == now.month()
            })
            .count();

        Self {
            count: quotes.len(),
            total_value: quotes.iter().map(|q| q.total_amount).sum(),
            this_month,
        }
    }
}
