//! Customer embedded in a quote.

use super::not_blank;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Country pre-filled for new customers.
pub const DEFAULT_COUNTRY: &str = "السعودية";

/// Buyer side of a quote. Only `name` is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Customer {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[serde(default)]
    pub tax_number: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub commercial_registration: Option<String>,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub additional_number: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Default for Customer {
    fn default() -> Self {
        Self {
            name: String::new(),
            tax_number: None,
            street: None,
            neighborhood: None,
            country: Some(DEFAULT_COUNTRY.to_string()),
            city: None,
            commercial_registration: None,
            building: None,
            postal_code: None,
            additional_number: None,
            phone: None,
        }
    }
}

/// Single-field edit of a [`Customer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerField {
    Name(String),
    TaxNumber(String),
    Street(String),
    Neighborhood(String),
    Country(String),
    City(String),
    CommercialRegistration(String),
    Building(String),
    PostalCode(String),
    AdditionalNumber(String),
    Phone(String),
}

impl CustomerField {
    /// Build an edit from a form key such as `tax_number`.
    pub fn from_key(key: &str, value: &str) -> Option<Self> {
        let value = value.to_string();
        let field = match key {
            "name" => CustomerField::Name(value),
            "tax_number" => CustomerField::TaxNumber(value),
            "street" => CustomerField::Street(value),
            "neighborhood" => CustomerField::Neighborhood(value),
            "country" => CustomerField::Country(value),
            "city" => CustomerField::City(value),
            "commercial_registration" => CustomerField::CommercialRegistration(value),
            "building" => CustomerField::Building(value),
            "postal_code" => CustomerField::PostalCode(value),
            "additional_number" => CustomerField::AdditionalNumber(value),
            "phone" => CustomerField::Phone(value),
            _ => return None,
        };
        Some(field)
    }
}

impl Customer {
    pub fn apply(&mut self, field: CustomerField) {
        match field {
            CustomerField::Name(v) => self.name = v,
            CustomerField::TaxNumber(v) => self.tax_number = optional(v),
            CustomerField::Street(v) => self.street = optional(v),
            CustomerField::Neighborhood(v) => self.neighborhood = optional(v),
            CustomerField::Country(v) => self.country = optional(v),
            CustomerField::City(v) => self.city = optional(v),
            CustomerField::CommercialRegistration(v) => self.commercial_registration = optional(v),
            CustomerField::Building(v) => self.building = optional(v),
            CustomerField::PostalCode(v) => self.postal_code = optional(v),
            CustomerField::AdditionalNumber(v) => self.additional_number = optional(v),
            CustomerField::Phone(v) => self.phone = optional(v),
        }
    }

    /// Address parts in display order, blanks skipped.
    pub fn address_parts(&self) -> Vec<&str> {
        [
            &self.building,
            &self.street,
            &self.neighborhood,
            &self.city,
            &self.postal_code,
            &self.country,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .filter(|part| !part.trim().is_empty())
        .collect()
    }
}

fn optional(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
