//! Spreadsheet export of meal records.
//!
//! The output is the dialect spreadsheet tools expect in locales where the
//! comma is the decimal separator: a UTF-8 byte-order mark, semicolon
//! delimited fields, every field quoted, CRLF line endings.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::meal::MealRecord;

/// Byte-order mark written at the start of every export.
pub const BOM: char = '\u{FEFF}';

/// Field delimiter.
pub const DELIMITER: char = ';';

/// Line terminator.
pub const LINE_ENDING: &str = "\r\n";

/// Separator used to flatten the food list into one field.
pub const FOOD_SEPARATOR: &str = ",";

/// Conventional name for the exported file.
pub const EXPORT_FILE_NAME: &str = "meals_export.csv";

/// MIME type of the exported file.
pub const EXPORT_MIME_TYPE: &str = "text/csv;charset=utf-8";

const HEADERS_EN: [&str; 9] = [
    "Date",
    "Type",
    "Foods",
    "AlcoholConsumed",
    "AlcoholType",
    "GlassCount",
    "Exercise",
    "Feelings",
    "SensationScore",
];

const HEADERS_FR: [&str; 9] = [
    "Date",
    "Type",
    "Aliments",
    "Alcool consommé",
    "Type d'alcool",
    "Nombre de verres",
    "Activité sportive",
    "Sensations",
    "Score de sensation",
];

/// Language of headers, yes/no tokens and meal type labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportLocale {
    /// English headers, `Yes`/`No`.
    #[default]
    #[serde(alias = "en")]
    English,
    /// French headers, `Oui`/`Non`.
    #[serde(alias = "fr")]
    French,
}

impl ExportLocale {
    /// Column headers in output order.
    #[must_use]
    pub fn headers(self) -> [&'static str; 9] {
        match self {
            Self::English => HEADERS_EN,
            Self::French => HEADERS_FR,
        }
    }

    /// Token written for the alcohol-consumed column.
    #[must_use]
    pub fn yes_no(self, value: bool) -> &'static str {
        match (self, value) {
            (Self::English, true) => "Yes",
            (Self::English, false) => "No",
            (Self::French, true) => "Oui",
            (Self::French, false) => "Non",
        }
    }
}

/// Serializes meal records to CSV text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvExporter {
    /// Header and token language.
    pub locale: ExportLocale,
    /// Double embedded quotes. When off, quotes inside a field are written
    /// verbatim, which breaks column alignment for such records.
    pub escape_quotes: bool,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self {
            locale: ExportLocale::English,
            escape_quotes: true,
        }
    }
}

impl CsvExporter {
    /// Create an exporter with the given locale and RFC 4180 quote escaping.
    #[must_use]
    pub fn new(locale: ExportLocale) -> Self {
        Self {
            locale,
            ..Self::default()
        }
    }

    /// Write embedded quotes unescaped, matching older exports byte for byte.
    #[must_use]
    pub fn raw_quotes(mut self) -> Self {
        self.escape_quotes = false;
        self
    }

    /// Serialize `records` in the given order.
    ///
    /// The result starts with [`BOM`] and has one header line plus one line
    /// per record, joined by CRLF with no trailing terminator.
    #[must_use]
    pub fn to_csv(&self, records: &[MealRecord]) -> String {
        let mut out = String::new();
        out.push(BOM);
        out.push_str(&self.locale.headers().join(&DELIMITER.to_string()));

        for record in records {
            out.push_str(LINE_ENDING);
            self.push_row(&mut out, record);
        }

        debug!(
            records = records.len(),
            bytes = out.len(),
            "Serialized meals to CSV"
        );
        out
    }

    fn push_row(&self, out: &mut String, record: &MealRecord) {
        let meal_type = match self.locale {
            ExportLocale::English => record.meal_type.label(),
            ExportLocale::French => record.meal_type.label_fr(),
        };
        let fields = [
            record.date.format("%Y-%m-%d").to_string(),
            meal_type.to_string(),
            record.foods.join(FOOD_SEPARATOR),
            self.locale.yes_no(record.alcohol.consumed).to_string(),
            record.alcohol.kind.clone(),
            record.alcohol.glasses.to_string(),
            record.exercise.clone(),
            record.feelings.clone(),
            record.sensation_score.to_string(),
        ];

        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.push(DELIMITER);
            }
            self.push_quoted(out, field);
        }
    }

    fn push_quoted(&self, out: &mut String, field: &str) {
        out.push('"');
        if self.escape_quotes {
            out.push_str(&field.replace('"', "\"\""));
        } else {
            out.push_str(field);
        }
        out.push('"');
    }
}

/// Serialize `records` with the default exporter.
#[must_use]
pub fn to_csv(records: &[MealRecord]) -> String {
    CsvExporter::default().to_csv(records)
}

/// Save an export to disk, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot be written.
pub fn write_export(path: impl AsRef<Path>, csv: &str) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    std::fs::write(path, csv.as_bytes())?;
    info!("Exported {} bytes to {}", csv.len(), path.display());
    Ok(())
}
