use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Downloadable representation of a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Excel,
}

impl ExportFormat {
    /// Segment of `GET /quotes/{id}/export/{format}`.
    pub fn as_path(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Excel => "excel",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Excel => "xlsx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    /// `quote_{number}.{ext}`
    pub fn file_name(&self, quote_number: &str) -> String {
        let number: String = quote_number
            .trim()
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        format!("quote_{}.{}", number, self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            other => Err(format!("unsupported export format '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_follow_sequence_number() {
        assert_eq!(ExportFormat::Pdf.file_name("42"), "quote_42.pdf");
        assert_eq!(ExportFormat::Excel.file_name("42"), "quote_42.xlsx");
        assert_eq!(ExportFormat::Pdf.file_name("../7"), "quote____7.pdf");
    }

    #[test]
    fn parses_aliases() {
        assert_eq!("XLSX".parse::<ExportFormat>(), Ok(ExportFormat::Excel));
        assert!("csv".parse::<ExportFormat>().is_err());
    }
}
