use std::{
    fs::File,
    io::{BufRead, BufReader, Lines},
    path::Path,
};

use anyhow::Context as _;
use chrono::{DateTime, Utc};

use crate::{
    foundation::error::{QuakeError, QuakeResult},
    ingest::event::{Event, parse_row},
};

/// Lazy, single-pass iterator over catalogue rows.
///
/// The first line is a header and is dropped; blank lines are skipped. With `strict_order`
/// enabled a timestamp earlier than its predecessor is reported as a parse error. The iterator
/// is fused after the first error: a fresh pass needs a fresh reader.
pub struct EventReader<R> {
    lines: Lines<R>,
    line_no: u64,
    strict_order: bool,
    last: Option<DateTime<Utc>>,
    finished: bool,
}

impl<R: BufRead> EventReader<R> {
    /// Wrap any buffered reader.
    pub fn new(reader: R, strict_order: bool) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            strict_order,
            last: None,
            finished: false,
        }
    }

    /// Number of lines consumed so far, header included.
    pub fn lines_read(&self) -> u64 {
        self.line_no
    }

    fn fail(&mut self, err: QuakeError) -> Option<QuakeResult<Event>> {
        self.finished = true;
        Some(Err(err))
    }
}

impl<R: BufRead> Iterator for EventReader<R> {
    type Item = QuakeResult<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            let Some(next) = self.lines.next() else {
                self.finished = true;
                return None;
            };
            let line = match next {
                Ok(line) => line,
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    self.line_no += 1;
                    return self.fail(QuakeError::parse(self.line_no, format!("unreadable row: {e}")));
                }
                Err(e) => {
                    let line_no = self.line_no + 1;
                    let err = anyhow::Error::new(e).context(format!("read catalogue line {line_no}"));
                    return self.fail(err.into());
                }
            };
            self.line_no += 1;
            if self.line_no == 1 || line.trim().is_empty() {
                continue;
            }

            let event = match parse_row(&line, self.line_no) {
                Ok(event) => event,
                Err(e) => return self.fail(e),
            };
            if self.strict_order
                && let Some(prev) = self.last
                && event.timestamp < prev
            {
                let msg = format!(
                    "timestamp {} is earlier than previous row ({}); input must be sorted ascending",
                    event.timestamp.to_rfc3339(),
                    prev.to_rfc3339()
                );
                return self.fail(QuakeError::parse(self.line_no, msg));
            }
            self.last = Some(event.timestamp);
            return Some(Ok(event));
        }
    }
}

impl<R: BufRead> std::iter::FusedIterator for EventReader<R> {}

/// Open a catalogue file for a single pass.
pub fn open_events(path: &Path, strict_order: bool) -> QuakeResult<EventReader<BufReader<File>>> {
    let file = File::open(path).with_context(|| format!("open catalogue '{}'", path.display()))?;
    Ok(EventReader::new(BufReader::new(file), strict_order))
}

#[cfg(test)]
#[path = "../../tests/unit/ingest/reader.rs"]
mod tests;
