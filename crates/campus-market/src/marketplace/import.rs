use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use tracing::debug;

use super::clock::IdSequence;
use super::domain::{Listing, User};
use super::fixtures::UserDirectory;
use super::validation::{FieldErrors, ListingDraft};

#[derive(Debug)]
pub enum ListingImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    UnknownSeller { row: u64, email: String },
    InvalidTimestamp { row: u64, value: String },
    InvalidRow { row: u64, errors: FieldErrors },
}

impl std::fmt::Display for ListingImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingImportError::Io(err) => write!(f, "failed to read listings export: {}", err),
            ListingImportError::Csv(err) => write!(f, "invalid listings CSV data: {}", err),
            ListingImportError::UnknownSeller { row, email } => {
                write!(f, "row {}: no member registered as '{}'", row, email)
            }
            ListingImportError::InvalidTimestamp { row, value } => {
                write!(f, "row {}: '{}' is not a valid timestamp", row, value)
            }
            ListingImportError::InvalidRow { row, errors } => {
                write!(f, "row {}: {}", row, errors)
            }
        }
    }
}

impl std::error::Error for ListingImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ListingImportError::Io(err) => Some(err),
            ListingImportError::Csv(err) => Some(err),
            ListingImportError::UnknownSeller { .. }
            | ListingImportError::InvalidTimestamp { .. }
            | ListingImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for ListingImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ListingImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

static IMPORT_IDS: IdSequence = IdSequence::new("csv");

/// Bulk-loads marketplace listings from a spreadsheet export.
///
/// Rows keep file order and are validated like the create-listing form; the first bad row
/// aborts the import.
pub struct ListingCsvImporter;

impl ListingCsvImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        members: &UserDirectory,
    ) -> Result<Vec<Listing>, ListingImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, members)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        members: &UserDirectory,
    ) -> Result<Vec<Listing>, ListingImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let mut listings = Vec::new();

        for record in csv_reader.records() {
            let record = record?;
            // line where the record starts; quoted cells may span several
            let row_number = record
                .position()
                .map(csv::Position::line)
                .unwrap_or_default();
            let row: ListingRow = record.deserialize(Some(&headers))?;
            let seller = row.seller(members, row_number)?.clone();
            listings.push(row.into_listing(seller, row_number)?);
        }

        debug!(imported = listings.len(), "listings CSV parsed");
        Ok(listings)
    }
}

#[derive(Debug, Deserialize)]
struct ListingRow {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Price")]
    price: f64,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Condition")]
    condition: String,
    #[serde(rename = "Images", default, deserialize_with = "empty_string_as_none")]
    images: Option<String>,
    #[serde(rename = "Seller Email")]
    seller_email: String,
    #[serde(rename = "Created At")]
    created_at: String,
    #[serde(
        rename = "Expires At",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    expires_at: Option<String>,
}

impl ListingRow {
    fn seller<'a>(
        &self,
        members: &'a UserDirectory,
        row: u64,
    ) -> Result<&'a User, ListingImportError> {
        members
            .find_by_email(&self.seller_email)
            .ok_or_else(|| ListingImportError::UnknownSeller {
                row,
                email: self.seller_email.clone(),
            })
    }

    fn into_listing(self, seller: User, row: u64) -> Result<Listing, ListingImportError> {
        let created_at = timestamp(&self.created_at, row)?;
        let expires_at = self
            .expires_at
            .as_deref()
            .map(|value| timestamp(value, row))
            .transpose()?;
        let images = self
            .images
            .as_deref()
            .map(|value| {
                value
                    .split(';')
                    .map(str::trim)
                    .filter(|url| !url.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let draft = ListingDraft {
            title: self.title,
            description: self.description,
            price: self.price,
            category: self.category,
            condition: self.condition,
            images,
            expires_at,
        };
        draft
            .into_listing(IMPORT_IDS.next_id(), seller, created_at)
            .map_err(|rejected| ListingImportError::InvalidRow {
                row,
                errors: rejected.errors,
            })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn timestamp(value: &str, row: u64) -> Result<DateTime<Utc>, ListingImportError> {
    parse_timestamp(value).ok_or_else(|| ListingImportError::InvalidTimestamp {
        row,
        value: value.to_string(),
    })
}

/// RFC 3339 instants or bare `YYYY-MM-DD` dates taken as midnight UTC.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marketplace::fixtures;

    const HEADER: &str =
        "Title,Description,Price,Category,Condition,Images,Seller Email,Created At,Expires At\n";

    #[test]
    fn parses_dates_and_instants() {
        let instant = parse_timestamp("2024-03-10T12:00:00Z").expect("rfc3339");
        assert_eq!(instant.to_rfc3339(), "2024-03-10T12:00:00+00:00");
        let midnight = parse_timestamp("2024-03-10").expect("date");
        assert_eq!(midnight.to_rfc3339(), "2024-03-10T00:00:00+00:00");
        assert!(parse_timestamp("last tuesday").is_none());
    }

    #[test]
    fn splits_images_and_resolves_seller() {
        let csv = format!(
            "{HEADER}Graphing Calculator,TI-84 Plus,60,Electronics,Good,https://img/a.jpg; https://img/b.jpg,emma@university.edu,2024-03-11T08:00:00Z,\n"
        );
        let listings = ListingCsvImporter::from_reader(csv.as_bytes(), &fixtures::directory())
            .expect("import succeeds");

        assert_eq!(listings.len(), 1);
        let listing = &listings[0];
        assert!(listing.id.as_str().starts_with("csv-"));
        assert_eq!(listing.images.len(), 2);
        assert_eq!(listing.seller.name, "Emma Smith");
        assert!(listing.expires_at.is_none());
    }

    #[test]
    fn rejects_rows_failing_form_rules() {
        let csv = format!(
            "{HEADER}Lamp,Desk lamp,15,Furniture,Good,,emma@university.edu,2024-03-11,\n"
        );
        let err = ListingCsvImporter::from_reader(csv.as_bytes(), &fixtures::directory())
            .expect_err("row without images is rejected");
        match err {
            ListingImportError::InvalidRow { row, errors } => {
                assert_eq!(row, 2);
                assert!(errors.contains("images"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn keeps_cents_in_prices() {
        let csv = format!(
            "{HEADER}Lab Goggles,Barely used,12.50,Other,Like New,https://img/g.jpg,mike@university.edu,2024-03-12,\n"
        );
        let listings = ListingCsvImporter::from_reader(csv.as_bytes(), &fixtures::directory())
            .expect("import succeeds");

        assert_eq!(listings[0].price, 12.5);
    }

    #[test]
    fn reports_the_file_line_after_multiline_cells() {
        let csv = format!(
            "{HEADER}Bookshelf,\"Five shelves.\nPickup only.\nNo delivery.\",40,Furniture,Good,https://img/s.jpg,emma@university.edu,2024-03-11,\n\
             Lamp,Desk lamp,15,Furniture,Good,,emma@university.edu,2024-03-11,\n"
        );
        let err = ListingCsvImporter::from_reader(csv.as_bytes(), &fixtures::directory())
            .expect_err("second record has no images");
        match err {
            ListingImportError::InvalidRow { row, .. } => assert_eq!(row, 5),
            other => panic!("unexpected error: {other}"),
        }
    }
}
