use std::io::Write;

use anyhow::Context as _;
use chrono::{DateTime, Months, SecondsFormat, Utc};

use crate::foundation::error::{QuakeError, QuakeResult};

/// Anything that can return catalogue CSV (header included) for a time range.
pub trait EventSource {
    /// CSV text for events in `[start, end)`, header line first.
    fn fetch(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> QuakeResult<String>;
}

/// FDSN event web service client (USGS by default).
pub struct UsgsSource {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl UsgsSource {
    /// Client for the given query endpoint.
    pub fn new(endpoint: impl Into<String>) -> QuakeResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("quakelapse/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build HTTP client")?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    /// Full query URL for one range.
    pub fn query_url(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> String {
        format!(
            "{}?format=csv&orderby=time-asc&starttime={}&endtime={}",
            self.endpoint,
            start.to_rfc3339_opts(SecondsFormat::Millis, true),
            end.to_rfc3339_opts(SecondsFormat::Millis, true),
        )
    }
}

impl EventSource for UsgsSource {
    fn fetch(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> QuakeResult<String> {
        let url = self.query_url(start, end);
        tracing::info!(%url, "fetching events");
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| QuakeError::source(format!("request '{url}' failed: {e}")))?;
        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| QuakeError::source(format!("read body of '{url}': {e}")))?;
        if status != reqwest::StatusCode::OK {
            return Err(QuakeError::source(format!(
                "'{url}' returned {status}: {}",
                body.trim()
            )));
        }
        Ok(body)
    }
}

/// Consecutive `[s, s + step_months)` ranges from `start`, continuing while the next range start
/// is `<= end`. The first range is always produced.
pub fn month_ranges(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step_months: u32,
) -> QuakeResult<Vec<(DateTime<Utc>, DateTime<Utc>)>> {
    if step_months == 0 {
        return Err(QuakeError::validation("step_months must be non-zero"));
    }
    let offset = |k: u32| {
        k.checked_mul(step_months)
            .and_then(|m| start.checked_add_months(Months::new(m)))
            .ok_or_else(|| QuakeError::validation("month range exceeds the representable dates"))
    };

    let mut out = Vec::new();
    let mut k = 0u32;
    loop {
        let s = offset(k)?;
        let e = offset(k + 1)?;
        out.push((s, e));
        if e > end {
            break;
        }
        k += 1;
    }
    Ok(out)
}

/// Totals for one [`fetch_all`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FetchStats {
    /// Ranges requested.
    pub ranges: u64,
    /// Non-empty data rows written (header excluded).
    pub rows: u64,
    /// Bytes written.
    pub bytes: u64,
}

/// Fetch every month range and concatenate them into `out` with a single header line.
#[tracing::instrument(skip(source, out))]
pub fn fetch_all<S: EventSource + ?Sized, W: Write>(
    source: &mut S,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step_months: u32,
    out: &mut W,
) -> QuakeResult<FetchStats> {
    let mut stats = FetchStats::default();
    let mut ends_with_newline = true;

    for (i, (s, e)) in month_ranges(start, end, step_months)?.into_iter().enumerate() {
        let body = source.fetch(s, e)?;
        let chunk = if i == 0 {
            body.as_str()
        } else {
            body.split_once('\n').map_or("", |(_, rest)| rest)
        };
        stats.ranges += 1;
        if chunk.is_empty() {
            continue;
        }

        if !ends_with_newline {
            out.write_all(b"\n").context("write event data")?;
            stats.bytes += 1;
        }
        out.write_all(chunk.as_bytes()).context("write event data")?;
        stats.bytes += chunk.len() as u64;
        ends_with_newline = chunk.ends_with('\n');

        let rows = chunk.lines().filter(|l| !l.trim().is_empty()).count() as u64;
        stats.rows += if i == 0 { rows.saturating_sub(1) } else { rows };
        tracing::debug!(range_start = %s, rows, "range written");
    }

    out.flush().context("flush event data")?;
    Ok(stats)
}

#[cfg(test)]
#[path = "../../tests/unit/source/usgs.rs"]
mod tests;
