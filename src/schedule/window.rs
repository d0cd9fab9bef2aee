use chrono::{DateTime, TimeDelta, Utc};

use crate::foundation::error::{QuakeError, QuakeResult};

/// Half-open time slice `[start, end)` bucketing the events of one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Window {
    /// Inclusive start.
    pub start: DateTime<Utc>,
    /// Exclusive end.
    pub end: DateTime<Utc>,
}

impl Window {
    /// `true` when an event at `ts` closes this window.
    ///
    /// The comparison is strict: an event stamped exactly at `end` is still accumulated into
    /// this window.
    pub fn is_closed_by(&self, ts: DateTime<Utc>) -> bool {
        ts > self.end
    }
}

/// How a coordinator reacts to an event that is more than one window ahead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvancePolicy {
    /// Close exactly one window per late event. Quiet periods stall the clock, which then lags
    /// behind real time until enough events arrive.
    #[default]
    Single,
    /// Close every window the event has passed, one full emit/decay/advance cycle each.
    CatchUp,
}

/// Produces contiguous, fixed-width windows one at a time.
///
/// The n-th [`WindowScheduler::advance`] yields
/// `[origin + n·width, origin + (n+1)·width)`.
#[derive(Clone, Debug)]
pub struct WindowScheduler {
    origin: DateTime<Utc>,
    width: TimeDelta,
    current: Window,
    advances: u64,
}

impl WindowScheduler {
    /// Scheduler whose first window starts at `origin`.
    pub fn new(origin: DateTime<Utc>, width: TimeDelta) -> QuakeResult<Self> {
        if width <= TimeDelta::zero() {
            return Err(QuakeError::validation("window width must be positive"));
        }
        let end = origin
            .checked_add_signed(width)
            .ok_or_else(|| QuakeError::validation("first window end is out of range"))?;
        Ok(Self {
            origin,
            width,
            current: Window { start: origin, end },
            advances: 0,
        })
    }

    /// Split `[start, end)` into `count` windows of whole-millisecond width (remainder dropped).
    pub fn from_range(start: DateTime<Utc>, end: DateTime<Utc>, count: u64) -> QuakeResult<Self> {
        Self::new(start, window_width(start, end, count)?)
    }

    /// The window currently accumulating events.
    pub fn current(&self) -> Window {
        self.current
    }

    /// Fixed window width.
    pub fn width(&self) -> TimeDelta {
        self.width
    }

    /// Start of window 0.
    pub fn origin(&self) -> DateTime<Utc> {
        self.origin
    }

    /// Number of advances performed so far.
    pub fn advances(&self) -> u64 {
        self.advances
    }

    /// Shift the current window forward by exactly one width.
    pub fn advance(&mut self) -> QuakeResult<Window> {
        let shift = |ts: DateTime<Utc>| {
            ts.checked_add_signed(self.width)
                .ok_or_else(|| QuakeError::validation("window advanced past the representable range"))
        };
        self.current = Window {
            start: shift(self.current.start)?,
            end: shift(self.current.end)?,
        };
        self.advances += 1;
        Ok(self.current)
    }
}

/// `(end - start) / count`, truncated to whole milliseconds.
pub fn window_width(start: DateTime<Utc>, end: DateTime<Utc>, count: u64) -> QuakeResult<TimeDelta> {
    if count == 0 {
        return Err(QuakeError::validation("window count must be non-zero"));
    }
    if end <= start {
        return Err(QuakeError::validation("range end must be after range start"));
    }
    let span_ms = (end - start).num_milliseconds();
    let count = i64::try_from(count)
        .map_err(|_| QuakeError::validation("window count is too large"))?;
    let width_ms = span_ms / count;
    if width_ms == 0 {
        return Err(QuakeError::validation(format!(
            "range of {span_ms} ms is too short for {count} windows"
        )));
    }
    TimeDelta::try_milliseconds(width_ms)
        .ok_or_else(|| QuakeError::validation("window width is out of range"))
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/window.rs"]
mod tests;
