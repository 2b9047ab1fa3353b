//! Quote totals engine.
//!
//! Every monetary figure goes through [`round_money`]: two decimal places,
//! midpoint rounded away from zero (plain "round half up" for the
//! non-negative amounts quotes carry). Operations take the item list by
//! value and hand back the updated list; nothing else is touched.

use crate::models::{ItemField, LineItem};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use thiserror::Error;

pub const MONEY_SCALE: u32 = 2;

/// Flat VAT applied to every quote (15%).
pub fn tax_rate() -> Decimal {
    Decimal::new(15, 2)
}

pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("line item {index} does not exist (quote has {len} items)")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("line item {index}: quantity times unit price is too large")]
    AmountTooLarge { index: usize },
    #[error("quote total is too large")]
    TotalTooLarge,
}

/// Totals of `items`. Sums that would overflow are clamped to
/// [`Decimal::MAX`]; editing goes through [`checked_recompute`] instead so
/// such lists are never produced locally.
pub fn recompute(items: &[LineItem]) -> Totals {
    checked_recompute(items).unwrap_or_else(|| {
        let subtotal = round_money(
            items
                .iter()
                .fold(Decimal::ZERO, |sum, item| sum.saturating_add(item.total_price)),
        );
        let tax_amount = round_money(subtotal.saturating_mul(tax_rate()));
        Totals {
            subtotal,
            tax_amount,
            total_amount: subtotal.saturating_add(tax_amount),
        }
    })
}

/// Totals of `items`, or `None` when any figure exceeds [`Decimal::MAX`].
pub fn checked_recompute(items: &[LineItem]) -> Option<Totals> {
    let sum = items
        .iter()
        .try_fold(Decimal::ZERO, |sum, item| sum.checked_add(item.total_price))?;
    let subtotal = round_money(sum);
    let tax_amount = round_money(subtotal.checked_mul(tax_rate())?);

    Some(Totals {
        subtotal,
        tax_amount,
        total_amount: subtotal.checked_add(tax_amount)?,
    })
}

/// Apply `field` to the item at `index`. Only that item changes; an edit
/// that cannot be priced fails with [`EditError::AmountTooLarge`].
pub fn update_item_field(
    mut items: Vec<LineItem>,
    index: usize,
    field: ItemField,
) -> Result<Vec<LineItem>, EditError> {
    let len = items.len();
    let item = items
        .get_mut(index)
        .ok_or(EditError::IndexOutOfBounds { index, len })?;
    item.apply(field).map_err(|_| EditError::AmountTooLarge { index })?;
    Ok(items)
}

pub fn add_item(mut items: Vec<LineItem>) -> Vec<LineItem> {
    items.push(LineItem::blank());
    items
}

/// Remove the item at `index`. A quote keeps at least one line item, so
/// removing from a single-item list returns it untouched.
pub fn remove_item(mut items: Vec<LineItem>, index: usize) -> Result<Vec<LineItem>, EditError> {
    if items.len() == 1 {
        return Ok(items);
    }
    if index >= items.len() {
        return Err(EditError::IndexOutOfBounds {
            index,
            len: items.len(),
        });
    }
    items.remove(index);
    Ok(items)
}
