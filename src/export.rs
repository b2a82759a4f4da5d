//! CSV export of ranked listings

use chrono::{Local, NaiveDateTime};
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::info;

use crate::config::{ExportConfig, LISTING_ID_PLACEHOLDER};
use crate::models::Listing;
use crate::{Result, StayScoutError};

/// Column labels, in output order
pub const HEADERS: [&str; 10] = [
    "Title",
    "Price per Night",
    "Location",
    "Bedrooms",
    "Bathrooms",
    "Relevance Score",
    "Summary",
    "Pros",
    "Cons",
    "Link",
];

/// Placeholder for any field a listing does not carry
pub const NOT_AVAILABLE: &str = "N/A";

const FILE_PREFIX: &str = "airbnb_results_";
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Writes evaluated listings to timestamped CSV files
pub struct ResultsExporter {
    output_dir: PathBuf,
    listing_url_template: String,
}

impl ResultsExporter {
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            listing_url_template: config.listing_url_template.clone(),
        }
    }

    /// Export `listings` in the given order; returns the written path
    pub fn export(&self, listings: &[Listing]) -> Result<PathBuf> {
        self.export_at(listings, Local::now().naive_local())
    }

    /// Export with an explicit timestamp for the file name
    pub fn export_at(&self, listings: &[Listing], timestamp: NaiveDateTime) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir).map_err(|e| {
            StayScoutError::export(format!(
                "Failed to create output directory {}: {e}",
                self.output_dir.display()
            ))
        })?;

        let (path, file) = self.create_output_file(timestamp)?;

        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(HEADERS)?;
        for listing in listings {
            writer.write_record(self.row(listing))?;
        }
        writer.flush()?;

        info!("Wrote {} listings to {}", listings.len(), path.display());
        Ok(path)
    }

    /// Open a new file named after `timestamp`, adding a counter when a file
    /// from the same second already exists.
    fn create_output_file(&self, timestamp: NaiveDateTime) -> Result<(PathBuf, File)> {
        let stamp = timestamp.format("%Y%m%d_%H%M%S").to_string();

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                format!("{FILE_PREFIX}{stamp}.csv")
            } else {
                format!("{FILE_PREFIX}{stamp}_{attempt}.csv")
            };
            let path = self.output_dir.join(name);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(StayScoutError::export(format!(
                        "Failed to create {}: {e}",
                        path.display()
                    )));
                }
            }
        }

        Err(StayScoutError::export(format!(
            "No free file name for {stamp} in {}",
            self.output_dir.display()
        )))
    }

    fn row(&self, listing: &Listing) -> [String; 10] {
        let or_na = |v: Option<String>| v.unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let evaluation = listing.evaluation.as_ref();

        [
            or_na(listing.name()),
            format_price(listing.price()),
            or_na(listing.address()),
            or_na(listing.bedrooms()),
            or_na(listing.bathrooms()),
            or_na(evaluation.map(|e| e.relevance_score.to_string())),
            or_na(evaluation.map(|e| e.summary.clone())),
            evaluation.map(|e| e.pros.join("\n")).unwrap_or_default(),
            evaluation.map(|e| e.cons.join("\n")).unwrap_or_default(),
            self.listing_url(listing),
        ]
    }

    fn listing_url(&self, listing: &Listing) -> String {
        self.listing_url_template
            .replace(LISTING_ID_PLACEHOLDER, &listing.id().unwrap_or_default())
    }
}

/// `$<price>` when present, otherwise `N/A`
fn format_price(price: Option<String>) -> String {
    match price {
        Some(p) if p.starts_with('$') => p,
        Some(p) => format!("${p}"),
        None => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Evaluation;
    use chrono::NaiveDate;
    use serde_json::{Value, json};
    use std::path::Path;

    fn listing(value: Value) -> Listing {
        match value {
            Value::Object(map) => Listing::from(map),
            _ => panic!("listing fixture must be an object"),
        }
    }

    fn exporter(dir: &Path) -> ResultsExporter {
        ResultsExporter::new(&ExportConfig {
            output_dir: dir.join("data"),
            ..ExportConfig::default()
        })
    }

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(9, 26, 53)
            .unwrap()
    }

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .unwrap();
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Some("120".into())), "$120");
        assert_eq!(format_price(Some("$95".into())), "$95");
        assert_eq!(format_price(None), "N/A");
    }

    #[test]
    fn test_export_creates_directory_and_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = exporter(dir.path()).export_at(&[], timestamp()).unwrap();

        assert_eq!(
            path,
            dir.path().join("data").join("airbnb_results_20250314_092653.csv")
        );
        let rows = read_rows(&path);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], HEADERS);
    }

    #[test]
    fn test_export_renders_full_row() {
        let dir = tempfile::tempdir().unwrap();
        let mut l = listing(json!({
            "id": "4242",
            "name": "Lakeside Cabin",
            "price": 180,
            "location": {"address": "Lake Rd, Tahoe"},
            "bedrooms": 3,
            "bathrooms": 2.5
        }));
        l.evaluation = Some(Evaluation {
            relevance_score: 88,
            summary: "Great for groups.".into(),
            pros: vec!["Lake view".into(), "Hot tub".into()],
            cons: vec!["Steep driveway".into()],
        });

        let path = exporter(dir.path()).export_at(&[l], timestamp()).unwrap();
        let rows = read_rows(&path);

        assert_eq!(
            rows[1],
            vec![
                "Lakeside Cabin",
                "$180",
                "Lake Rd, Tahoe",
                "3",
                "2.5",
                "88",
                "Great for groups.",
                "Lake view\nHot tub",
                "Steep driveway",
                "https://airbnb.com/rooms/4242",
            ]
        );
    }

    #[test]
    fn test_missing_fields_render_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let mut l = listing(json!({"id": "7", "price": null}));
        l.evaluation = Some(Evaluation::failed("timeout"));

        let path = exporter(dir.path()).export_at(&[l], timestamp()).unwrap();
        let row = &read_rows(&path)[1];

        assert_eq!(row[0], "N/A");
        assert_eq!(row[1], "N/A");
        assert_eq!(row[2], "N/A");
        assert_eq!(row[3], "N/A");
        assert_eq!(row[4], "N/A");
        assert_eq!(row[5], "0");
        assert_eq!(row[7], "");
        assert_eq!(row[8], "Failed to evaluate");
    }

    #[test]
    fn test_unevaluated_listing_has_placeholder_score() {
        let dir = tempfile::tempdir().unwrap();
        let path = exporter(dir.path())
            .export_at(&[listing(json!({}))], timestamp())
            .unwrap();
        let row = &read_rows(&path)[1];

        assert_eq!(row[5], "N/A");
        assert_eq!(row[6], "N/A");
        assert_eq!(row[9], "https://airbnb.com/rooms/");
    }

    #[test]
    fn test_rows_follow_input_order_not_score() {
        let dir = tempfile::tempdir().unwrap();
        let listings: Vec<Listing> = [(10, "low"), (95, "high"), (50, "mid")]
            .into_iter()
            .map(|(score, name)| {
                let mut l = listing(json!({"id": name, "name": name}));
                l.evaluation = Some(Evaluation {
                    relevance_score: score,
                    summary: String::new(),
                    pros: vec![],
                    cons: vec![],
                });
                l
            })
            .collect();

        let path = exporter(dir.path()).export_at(&listings, timestamp()).unwrap();
        let rows = read_rows(&path);

        assert_eq!(rows.len(), 4);
        let names: Vec<&str> = rows[1..].iter().map(|r| r[0].as_str()).collect();
        assert_eq!(names, vec!["low", "high", "mid"]);
    }

    #[test]
    fn test_same_second_exports_do_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = exporter(dir.path());

        let first = exporter.export_at(&[], timestamp()).unwrap();
        let second = exporter.export_at(&[], timestamp()).unwrap();

        assert_ne!(first, second);
        assert!(second.ends_with("airbnb_results_20250314_092653_1.csv"));
        assert!(first.exists() && second.exists());
    }

    #[test]
    fn test_unwritable_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("data");
        fs::write(&blocker, "not a directory").unwrap();

        let result = exporter(dir.path()).export_at(&[], timestamp());
        assert!(matches!(result, Err(StayScoutError::Export { .. })));
    }
}
