//! Line item model.

use super::not_blank;
use crate::format::normalize_digits;
use crate::services::totals::round_money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use validator::Validate;

/// Unit label for new items ("piece").
pub const DEFAULT_UNIT: &str = "قطعة";

/// One priced entry of a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct LineItem {
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[serde(with = "super::amount", default)]
    pub quantity: Decimal,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(with = "super::amount", default)]
    pub unit_price: Decimal,
    /// Always `round(quantity * unit_price, 2)` once the item has been edited.
    #[serde(with = "super::amount", default)]
    pub total_price: Decimal,
}

fn default_unit() -> String {
    DEFAULT_UNIT.to_string()
}

impl Default for LineItem {
    fn default() -> Self {
        Self::blank()
    }
}

impl LineItem {
    /// Empty row as added by "add item": one unit at zero price.
    pub fn blank() -> Self {
        Self {
            description: String::new(),
            quantity: Decimal::ONE,
            unit: default_unit(),
            unit_price: Decimal::ZERO,
            total_price: Decimal::ZERO,
        }
    }

    pub fn new(
        description: impl Into<String>,
        quantity: Decimal,
        unit: impl Into<String>,
        unit_price: Decimal,
    ) -> Self {
        let mut item = Self {
            description: description.into(),
            quantity: quantity.max(Decimal::ZERO),
            unit: unit.into(),
            unit_price: unit_price.max(Decimal::ZERO),
            total_price: Decimal::ZERO,
        };
        item.reprice();
        item
    }

    /// `quantity * unit_price`, clamped to [`Decimal::MAX`] for items that
    /// were never priced through [`LineItem::apply`].
    pub fn extended_price(&self) -> Decimal {
        round_money(self.quantity.saturating_mul(self.unit_price))
    }

    pub(crate) fn reprice(&mut self) {
        self.total_price = self.extended_price();
    }

    /// Apply one edit; price-affecting edits re-derive `total_price`.
    ///
    /// An edit whose product does not fit a [`Decimal`] is refused and the
    /// item keeps its previous values.
    pub fn apply(&mut self, field: ItemField) -> Result<(), AmountOverflow> {
        match field {
            ItemField::Description(v) => self.description = v,
            ItemField::Unit(v) => self.unit = v,
            ItemField::Quantity(v) => {
                let quantity = v.max(Decimal::ZERO);
                self.total_price = price(quantity, self.unit_price)?;
                self.quantity = quantity;
            }
            ItemField::UnitPrice(v) => {
                let unit_price = v.max(Decimal::ZERO);
                self.total_price = price(self.quantity, unit_price)?;
                self.unit_price = unit_price;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("quantity times unit price exceeds the largest supported amount")]
pub struct AmountOverflow;

fn price(quantity: Decimal, unit_price: Decimal) -> Result<Decimal, AmountOverflow> {
    quantity
        .checked_mul(unit_price)
        .map(round_money)
        .ok_or(AmountOverflow)
}

/// Single-field edit of a [`LineItem`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemField {
    Description(String),
    Quantity(Decimal),
    Unit(String),
    UnitPrice(Decimal),
}

impl ItemField {
    /// Quantity typed by a user, see [`parse_amount`].
    pub fn quantity_input(raw: &str) -> Self {
        ItemField::Quantity(parse_amount(raw))
    }

    /// Unit price typed by a user, see [`parse_amount`].
    pub fn unit_price_input(raw: &str) -> Self {
        ItemField::UnitPrice(parse_amount(raw))
    }

    pub fn from_key(key: &str, value: &str) -> Option<Self> {
        let field = match key {
            "description" => ItemField::Description(value.to_string()),
            "quantity" | "qty" => ItemField::quantity_input(value),
            "unit" => ItemField::Unit(value.to_string()),
            "unit_price" | "price" => ItemField::unit_price_input(value),
            _ => return None,
        };
        Some(field)
    }
}

/// Lenient numeric input: `,` or `.` as decimal separator, Arabic-Indic
/// digits accepted. Empty, unparsable and negative input all read as 0.
pub fn parse_amount(raw: &str) -> Decimal {
    let normalized = normalize_digits(raw.trim()).replacen(',', ".", 1);
    if normalized.is_empty() {
        return Decimal::ZERO;
    }

    match Decimal::from_str(&normalized) {
        Ok(value) if value > Decimal::ZERO => value,
        Ok(_) => Decimal::ZERO,
        Err(_) => {
            tracing::debug!(input = %raw, "Unparsable amount treated as zero");
            Decimal::ZERO
        }
    }
}
