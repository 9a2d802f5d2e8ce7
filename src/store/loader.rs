use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ByteRecord, ReaderBuilder, Trim};
use log::info;

use super::table::RatingStore;
use crate::config::settings::DataSettings;
use crate::domain::{ItemNameRow, RatingRow};
use crate::errors::{load_context, LoadError};
use crate::filtering::types::EntityId;

const MIN_RATING_FIELDS: usize = 3;
const MIN_ITEM_NAME_FIELDS: usize = 2;

/// Reads all three input tables and builds the store.
/// Any unreadable file or malformed row aborts the load.
pub fn load_store(settings: &DataSettings) -> Result<RatingStore> {
    let training = read_rating_rows(&settings.training_path, settings.rating_delimiter)
        .with_context(|| load_context("training ratings", &settings.training_path))?;
    info!("  → Read {} training rows", training.len());

    let test = read_rating_rows(&settings.test_path, settings.rating_delimiter)
        .with_context(|| load_context("test ratings", &settings.test_path))?;
    info!("  → Read {} test rows", test.len());

    let names = read_item_name_rows(&settings.item_names_path, settings.item_name_delimiter)
        .with_context(|| load_context("item names", &settings.item_names_path))?;
    info!("  → Read {} item names", names.len());

    Ok(RatingStore::load(&training, &test, &names))
}

pub fn read_rating_rows(path: &Path, delimiter: u8) -> Result<Vec<RatingRow>, LoadError> {
    let source_name = path.display().to_string();
    let file = std::fs::File::open(path).map_err(|e| LoadError::Csv {
        source_name: source_name.clone(),
        source: e.into(),
    })?;
    parse_rating_rows(file, delimiter, &source_name)
}

pub fn read_item_name_rows(path: &Path, delimiter: u8) -> Result<Vec<ItemNameRow>, LoadError> {
    let source_name = path.display().to_string();
    let file = std::fs::File::open(path).map_err(|e| LoadError::Csv {
        source_name: source_name.clone(),
        source: e.into(),
    })?;
    parse_item_name_rows(file, delimiter, &source_name)
}

/// Parses `user item rating [ignored...]` rows.
pub fn parse_rating_rows<R: Read>(
    reader: R,
    delimiter: u8,
    source_name: &str,
) -> Result<Vec<RatingRow>, LoadError> {
    let mut rows = Vec::new();
    for_each_record(reader, delimiter, source_name, |record, line| {
        if record.len() < MIN_RATING_FIELDS {
            return Err(malformed(
                source_name,
                line,
                format!("expected at least {} fields, found {}", MIN_RATING_FIELDS, record.len()),
            ));
        }

        let user_id = parse_id(&record[0], source_name, line, "user id")?;
        let item_id = parse_id(&record[1], source_name, line, "item id")?;
        let rating = parse_rating(&record[2], source_name, line)?;

        rows.push(RatingRow::new(user_id, item_id, rating));
        Ok(())
    })?;
    Ok(rows)
}

/// Parses `item|name|...` rows. Names are decoded lossily since item
/// listings are often not UTF-8.
pub fn parse_item_name_rows<R: Read>(
    reader: R,
    delimiter: u8,
    source_name: &str,
) -> Result<Vec<ItemNameRow>, LoadError> {
    let mut rows = Vec::new();
    for_each_record(reader, delimiter, source_name, |record, line| {
        if record.len() < MIN_ITEM_NAME_FIELDS {
            return Err(malformed(
                source_name,
                line,
                format!("expected at least {} fields, found {}", MIN_ITEM_NAME_FIELDS, record.len()),
            ));
        }

        let item_id = parse_id(&record[0], source_name, line, "item id")?;
        let name = String::from_utf8_lossy(&record[1]).into_owned();

        rows.push(ItemNameRow { item_id, name });
        Ok(())
    })?;
    Ok(rows)
}

fn for_each_record<R, F>(
    reader: R,
    delimiter: u8,
    source_name: &str,
    mut handle: F,
) -> Result<(), LoadError>
where
    R: Read,
    F: FnMut(&ByteRecord, u64) -> Result<(), LoadError>,
{
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(reader);

    let mut record = ByteRecord::new();
    loop {
        let more = csv_reader
            .read_byte_record(&mut record)
            .map_err(|source| LoadError::Csv {
                source_name: source_name.to_string(),
                source,
            })?;
        if !more {
            break;
        }

        let line = record.position().map(|p| p.line()).unwrap_or(0);
        handle(&record, line)?;
    }
    Ok(())
}

fn parse_id(field: &[u8], source_name: &str, line: u64, what: &str) -> Result<EntityId, LoadError> {
    std::str::from_utf8(field)
        .ok()
        .and_then(|s| s.parse::<EntityId>().ok())
        .ok_or_else(|| {
            malformed(
                source_name,
                line,
                format!("{} '{}' is not a valid id", what, String::from_utf8_lossy(field)),
            )
        })
}

fn parse_rating(field: &[u8], source_name: &str, line: u64) -> Result<f64, LoadError> {
    std::str::from_utf8(field)
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .ok_or_else(|| {
            malformed(
                source_name,
                line,
                format!("rating '{}' is not a number", String::from_utf8_lossy(field)),
            )
        })
}

fn malformed(source_name: &str, line: u64, reason: String) -> LoadError {
    LoadError::MalformedRow {
        source_name: source_name.to_string(),
        line,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tab_separated_ratings_ignores_timestamp() {
        let data = "1\t10\t5\t874965758\n2\t10\t3\t876893171\n";
        let rows = parse_rating_rows(data.as_bytes(), b'\t', "ua.base").unwrap();

        assert_eq!(rows, vec![RatingRow::new(1, 10, 5.0), RatingRow::new(2, 10, 3.0)]);
    }

    #[test]
    fn test_parse_ratings_accepts_fractional_values() {
        let rows = parse_rating_rows("4,7,3.5\n".as_bytes(), b',', "ratings.csv").unwrap();
        assert_eq!(rows[0].rating, 3.5);
    }

    #[test]
    fn test_non_numeric_rating_is_fatal() {
        let data = "1\t10\t5\n1\t11\tfive\n";
        let err = parse_rating_rows(data.as_bytes(), b'\t', "ua.base").unwrap_err();

        match err {
            LoadError::MalformedRow { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("five"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_short_row_is_fatal() {
        let err = parse_rating_rows("1\t10\n".as_bytes(), b'\t', "ua.test").unwrap_err();
        assert!(matches!(err, LoadError::MalformedRow { line: 1, .. }));
    }

    #[test]
    fn test_negative_id_is_fatal() {
        let err = parse_rating_rows("-1\t10\t4\n".as_bytes(), b'\t', "ua.test").unwrap_err();
        assert!(err.to_string().contains("user id"));
    }

    #[test]
    fn test_nan_rating_is_fatal() {
        assert!(parse_rating_rows("1\t10\tNaN\n".as_bytes(), b'\t', "ua.test").is_err());
    }

    #[test]
    fn test_parse_item_names_with_extra_fields() {
        let data = "1|Toy Story (1995)|01-Jan-1995||http://example.com|0|0\n2|GoldenEye (1995)|01-Jan-1995\n";
        let rows = parse_item_name_rows(data.as_bytes(), b'|', "u.item").unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].item_id, 1);
        assert_eq!(rows[0].name, "Toy Story (1995)");
        assert_eq!(rows[1].name, "GoldenEye (1995)");
    }

    #[test]
    fn test_item_names_decode_latin1_lossily() {
        let data: &[u8] = b"3|Caf\xe9 au lait (1993)|x\n";
        let rows = parse_item_name_rows(data, b'|', "u.item").unwrap();

        assert!(rows[0].name.starts_with("Caf"));
        assert!(rows[0].name.ends_with("au lait (1993)"));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let path = std::env::temp_dir().join("neighbor_ratings_missing_input.tsv");
        let _ = std::fs::remove_file(&path);

        assert!(matches!(
            read_rating_rows(&path, b'\t'),
            Err(LoadError::Csv { .. })
        ));
    }
}
