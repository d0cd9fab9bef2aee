use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::foundation::error::{QuakeError, QuakeResult};

/// One catalogue row. Immutable once parsed.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Event {
    /// Origin time.
    pub timestamp: DateTime<Utc>,
    /// Decimal degrees, east positive.
    pub longitude: f64,
    /// Decimal degrees, north positive.
    pub latitude: f64,
    /// Depth in kilometres.
    pub depth: f64,
    /// Catalogue magnitude.
    pub magnitude: f64,
}

/// Parse one data row: `time,latitude,longitude,depth,mag[,...]`.
///
/// Columns past the fifth are ignored. `line` is only used for error reporting.
pub fn parse_row(row: &str, line: u64) -> QuakeResult<Event> {
    let mut cols = row.split(',').map(str::trim);

    let time = next_col(&mut cols, "time", line)?;
    let timestamp = parse_timestamp(time)
        .ok_or_else(|| QuakeError::parse(line, format!("invalid timestamp '{time}'")))?;
    let latitude = parse_number(next_col(&mut cols, "latitude", line)?, "latitude", line)?;
    let longitude = parse_number(next_col(&mut cols, "longitude", line)?, "longitude", line)?;
    let depth = parse_number(next_col(&mut cols, "depth", line)?, "depth", line)?;
    let magnitude = parse_number(next_col(&mut cols, "mag", line)?, "mag", line)?;

    Ok(Event {
        timestamp,
        longitude,
        latitude,
        depth,
        magnitude,
    })
}

fn next_col<'a>(
    cols: &mut impl Iterator<Item = &'a str>,
    name: &str,
    line: u64,
) -> QuakeResult<&'a str> {
    match cols.next() {
        Some("") => Err(QuakeError::parse(line, format!("empty {name} column"))),
        Some(v) => Ok(v),
        None => Err(QuakeError::parse(line, format!("missing {name} column"))),
    }
}

fn parse_number(raw: &str, name: &str, line: u64) -> QuakeResult<f64> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(QuakeError::parse(line, format!("invalid {name} '{raw}'"))),
    }
}

/// Parse an ISO-8601 timestamp. Values without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[path = "../../tests/unit/ingest/event.rs"]
mod tests;
