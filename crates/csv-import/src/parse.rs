//! CSV reading and per-row normalization that needs no network.

use csv::{ReaderBuilder, Trim};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use crate::error::{Result, RowFailureReason};

pub(crate) const CATEGORY_COLUMN: &str = "selectedCategoryIds";
pub(crate) const LATITUDE_COLUMN: &str = "latitude";
pub(crate) const LONGITUDE_COLUMN: &str = "longitude";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub(crate) const LATITUDE_RANGE: RangeInclusive<f64> = -90.0..=90.0;
pub(crate) const LONGITUDE_RANGE: RangeInclusive<f64> = -180.0..=180.0;

/// One data row as read from the upload.
#[derive(Debug, Clone)]
pub(crate) struct RawRow {
    pub index: usize,
    pub line: u64,
    pub fields: BTreeMap<String, String>,
}

/// Read every data row, keyed by the trimmed header names.
pub(crate) fn read_rows(buffer: &[u8]) -> Result<Vec<RawRow>> {
    let buffer = buffer.strip_prefix(UTF8_BOM).unwrap_or(buffer);

    let mut reader = ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(buffer);

    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let fields = headers
            .iter()
            .zip(record.iter())
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        rows.push(RawRow {
            index,
            line,
            fields,
        });
    }

    Ok(rows)
}

/// Split the comma-joined category field, dropping empty entries.
pub(crate) fn split_categories(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Coordinates supplied in the row itself.
///
/// `Ok(None)` when either field is absent or empty, so the row must be
/// geocoded. An unparseable or out-of-range value is a row failure, never
/// NaN.
pub(crate) fn provided_coordinates(
    fields: &BTreeMap<String, String>,
) -> std::result::Result<Option<(f64, f64)>, RowFailureReason> {
    let present = |name: &str| fields.get(name).filter(|v| !v.is_empty());

    let (Some(lat), Some(lon)) = (present(LATITUDE_COLUMN), present(LONGITUDE_COLUMN)) else {
        return Ok(None);
    };

    let parse = |field: &str, value: &str, range: RangeInclusive<f64>| {
        value
            .parse::<f64>()
            .ok()
            .filter(|v| range.contains(v))
            .ok_or_else(|| RowFailureReason::InvalidCoordinate {
                field: field.to_string(),
                value: value.to_string(),
            })
    };

    Ok(Some((
        parse(LATITUDE_COLUMN, lat.as_str(), LATITUDE_RANGE)?,
        parse(LONGITUDE_COLUMN, lon.as_str(), LONGITUDE_RANGE)?,
    )))
}
