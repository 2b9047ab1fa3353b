//! Company profile model: the seller shown on every quote.

use serde::{Deserialize, Serialize};

/// Singleton seller record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyProfile {
    pub name_ar: String,
    pub name_en: String,
    pub description_ar: String,
    pub description_en: String,
    pub tax_number: String,
    pub street: String,
    pub neighborhood: String,
    pub country: String,
    pub city: String,
    pub commercial_registration: String,
    pub building: String,
    pub postal_code: String,
    pub additional_number: String,
    pub email: String,
    pub phone1: String,
    pub phone2: String,
    pub phone3: String,
    /// Server-relative asset path, e.g. `/api/uploads/logo_<uuid>.png`.
    pub logo_path: Option<String>,
}

impl Default for CompanyProfile {
    /// Values the settings form is pre-filled with.
    fn default() -> Self {
        Self {
            name_ar: "شركة مثلث الأنظمة المميزة للمقاولات".to_string(),
            name_en: "MUTHALLATH AL-ANZIMAH AL-MUMAYYIZAH CONTRACTING CO.".to_string(),
            description_ar: "تصميم وتصنيع وتوريد وتركيب مظلات الشد الإنشائي والخيام والسواتر"
                .to_string(),
            description_en: "Design, Manufacture, Supply & Installation of Structure Tension Awnings, Tents & Canopies".to_string(),
            tax_number: "311104439400003".to_string(),
            street: "شارع حائل".to_string(),
            neighborhood: "حي البغدادية الغربية".to_string(),
            country: "السعودية".to_string(),
            city: "جدة".to_string(),
            commercial_registration: "4030255240".to_string(),
            building: "8376".to_string(),
            postal_code: "22231".to_string(),
            additional_number: "3842".to_string(),
            email: "info@tsscoksa.com".to_string(),
            phone1: "+966 50 061 2006".to_string(),
            phone2: "055 538 9792".to_string(),
            phone3: "+966 50 336 5527".to_string(),
            logo_path: None,
        }
    }
}

/// Single-field edit of the settings form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanyField {
    NameAr(String),
    NameEn(String),
    DescriptionAr(String),
    DescriptionEn(String),
    TaxNumber(String),
    Street(String),
    Neighborhood(String),
    Country(String),
    City(String),
    CommercialRegistration(String),
    Building(String),
    PostalCode(String),
    AdditionalNumber(String),
    Email(String),
    Phone1(String),
    Phone2(String),
    Phone3(String),
    LogoPath(Option<String>),
}

impl CompanyField {
    pub fn from_key(key: &str, value: &str) -> Option<Self> {
        let v = value.to_string();
        let field = match key {
            "name_ar" => CompanyField::NameAr(v),
            "name_en" => CompanyField::NameEn(v),
            "description_ar" => CompanyField::DescriptionAr(v),
            "description_en" => CompanyField::DescriptionEn(v),
            "tax_number" => CompanyField::TaxNumber(v),
            "street" => CompanyField::Street(v),
            "neighborhood" => CompanyField::Neighborhood(v),
            "country" => CompanyField::Country(v),
            "city" => CompanyField::City(v),
            "commercial_registration" => CompanyField::CommercialRegistration(v),
            "building" => CompanyField::Building(v),
            "postal_code" => CompanyField::PostalCode(v),
            "additional_number" => CompanyField::AdditionalNumber(v),
            "email" => CompanyField::Email(v),
            "phone1" => CompanyField::Phone1(v),
            "phone2" => CompanyField::Phone2(v),
            "phone3" => CompanyField::Phone3(v),
            "logo_path" if value.trim().is_empty() => CompanyField::LogoPath(None),
            "logo_path" => CompanyField::LogoPath(Some(v)),
            _ => return None,
        };
        Some(field)
    }
}

impl CompanyProfile {
    pub fn apply(&mut self, field: CompanyField) {
        match field {
            CompanyField::NameAr(v) => self.name_ar = v,
            CompanyField::NameEn(v) => self.name_en = v,
            CompanyField::DescriptionAr(v) => self.description_ar = v,
            CompanyField::DescriptionEn(v) => self.description_en = v,
            CompanyField::TaxNumber(v) => self.tax_number = v,
            CompanyField::Street(v) => self.street = v,
            CompanyField::Neighborhood(v) => self.neighborhood = v,
            CompanyField::Country(v) => self.country = v,
            CompanyField::City(v) => self.city = v,
            CompanyField::CommercialRegistration(v) => self.commercial_registration = v,
            CompanyField::Building(v) => self.building = v,
            CompanyField::PostalCode(v) => self.postal_code = v,
            CompanyField::AdditionalNumber(v) => self.additional_number = v,
            CompanyField::Email(v) => self.email = v,
            CompanyField::Phone1(v) => self.phone1 = v,
            CompanyField::Phone2(v) => self.phone2 = v,
            CompanyField::Phone3(v) => self.phone3 = v,
            CompanyField::LogoPath(v) => self.logo_path = v,
        }
    }

    /// Non-blank phone numbers, in order.
    pub fn phones(&self) -> Vec<&str> {
        [&self.phone1, &self.phone2, &self.phone3]
            .into_iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect()
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
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect()
    }
}

/// Response of `POST /company/logo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoUpload {
    pub logo_path: String,
}
