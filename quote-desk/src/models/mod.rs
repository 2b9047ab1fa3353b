//! Domain models for quote-desk.

mod company;
mod customer;
mod export;
mod line_item;
mod quote;

pub use company::{CompanyField, CompanyProfile, LogoUpload};
pub use customer::{Customer, CustomerField, DEFAULT_COUNTRY};
pub use export::ExportFormat;
pub use line_item::{parse_amount, AmountOverflow, ItemField, LineItem, DEFAULT_UNIT};
pub use quote::{Quote, QuoteDraft, QuoteId, QuoteSummary};

/// Money and quantities travel as JSON numbers; the server stores floats.
/// Reading is lenient: strings are parsed, `null` and garbage become 0.
pub(crate) mod amount {
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.to_f64().unwrap_or_default())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().map(from_json).unwrap_or_default())
    }

    fn from_json(value: &Value) -> Decimal {
        match value {
            Value::Number(number) => {
                let text = number.to_string();
                Decimal::from_str(&text)
                    .or_else(|_| Decimal::from_scientific(&text))
                    .unwrap_or_default()
            }
            Value::String(text) => super::parse_amount(text),
            _ => Decimal::ZERO,
        }
    }
}

/// Required text fields must contain something other than whitespace.
fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}
