//! Time window selection for archive requests.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{WxError, WxResult};

/// A bounded, stepped time window.
///
/// Enumerates the discrete timestamps to request from the archive:
/// `start, start+step, ...` inclusive of `start`, bounded by `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub step: Duration,
}

impl TimeWindow {
    /// Create a window, validating the range.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, step: Duration) -> WxResult<Self> {
        if end < start {
            return Err(WxError::InvalidRange(format!(
                "end {} is before start {}",
                end.format("%Y-%m-%dT%H:%M:%SZ"),
                start.format("%Y-%m-%dT%H:%M:%SZ")
            )));
        }
        if step <= Duration::zero() {
            return Err(WxError::InvalidRange(format!(
                "step must be positive, got {} seconds",
                step.num_seconds()
            )));
        }
        Ok(Self { start, end, step })
    }

    /// A single-timestamp window, for static one-frame runs.
    pub fn single(at: DateTime<Utc>) -> Self {
        Self {
            start: at,
            end: at,
            step: Duration::seconds(1),
        }
    }

    /// Number of timestamps the window enumerates. Always agrees with
    /// [`iter`](Self::iter), including for sub-second steps.
    pub fn frame_count(&self) -> usize {
        self.iter().count()
    }

    /// Lazy iterator over the window's timestamps, in increasing order.
    pub fn iter(&self) -> TimeSteps {
        TimeSteps {
            next: Some(self.start),
            end: self.end,
            step: self.step,
        }
    }
}

impl IntoIterator for &TimeWindow {
    type Item = DateTime<Utc>;
    type IntoIter = TimeSteps;

    fn into_iter(self) -> TimeSteps {
        self.iter()
    }
}

/// Iterator over the timestamps of a [`TimeWindow`].
#[derive(Debug, Clone)]
pub struct TimeSteps {
    next: Option<DateTime<Utc>>,
    end: DateTime<Utc>,
    step: Duration,
}

impl Iterator for TimeSteps {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<DateTime<Utc>> {
        let current = self.next?;
        let following = current + self.step;
        self.next = if following <= self.end {
            Some(following)
        } else {
            None
        };
        Some(current)
    }
}

/// Parse a UTC timestamp from ISO 8601.
///
/// Accepts a full RFC 3339 datetime, a datetime without zone (assumed UTC),
/// or a bare date (midnight UTC).
pub fn parse_utc(s: &str) -> WxResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    if let Ok(ndt) = NaiveDateTime::parse_from_str(&format!("{s}T00:00:00"), "%Y-%m-%dT%H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    Err(WxError::InvalidRange(format!("unparseable timestamp: {s}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_window_enumerates_inclusive_hourly() {
        let w = TimeWindow::new(
            utc(2019, 9, 1, 0, 0),
            utc(2019, 9, 1, 6, 0),
            Duration::hours(1),
        )
        .unwrap();

        let times: Vec<_> = w.iter().collect();
        assert_eq!(times.len(), 7);
        assert_eq!(w.frame_count(), 7);
        assert_eq!(times[0], utc(2019, 9, 1, 0, 0));
        assert_eq!(times[6], utc(2019, 9, 1, 6, 0));
    }

    #[test]
    fn test_window_is_strictly_increasing() {
        let w = TimeWindow::new(
            utc(2025, 6, 19, 22, 0),
            utc(2025, 6, 20, 1, 30),
            Duration::minutes(25),
        )
        .unwrap();

        let times: Vec<_> = w.iter().collect();
        assert!(!times.is_empty());
        for pair in times.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        // Last element within one step of the end bound.
        let last = *times.last().unwrap();
        assert!(last <= w.end);
        assert!(last > w.end - w.step);
    }

    #[test]
    fn test_window_step_larger_than_span() {
        let w = TimeWindow::new(
            utc(2024, 1, 1, 0, 0),
            utc(2024, 1, 1, 0, 10),
            Duration::hours(6),
        )
        .unwrap();

        let times: Vec<_> = w.iter().collect();
        assert_eq!(times, vec![utc(2024, 1, 1, 0, 0)]);
    }

    #[test]
    fn test_window_counts_subsecond_and_fractional_steps() {
        let start = utc(2024, 1, 1, 0, 0);

        // 2 s span at 500 ms: 0.0, 0.5, 1.0, 1.5, 2.0.
        let w = TimeWindow::new(
            start,
            start + Duration::seconds(2),
            Duration::milliseconds(500),
        )
        .unwrap();
        assert_eq!(w.frame_count(), 5);
        assert_eq!(w.frame_count(), w.iter().count());

        // Non-integral seconds: 6 s span at 1.5 s steps.
        let w = TimeWindow::new(
            start,
            start + Duration::seconds(6),
            Duration::milliseconds(1500),
        )
        .unwrap();
        assert_eq!(w.frame_count(), 5);
        assert_eq!(w.frame_count(), w.iter().count());
    }

    #[test]
    fn test_window_rejects_reversed_range() {
        let err = TimeWindow::new(
            utc(2024, 1, 2, 0, 0),
            utc(2024, 1, 1, 0, 0),
            Duration::hours(1),
        )
        .unwrap_err();
        assert!(matches!(err, WxError::InvalidRange(_)));
    }

    #[test]
    fn test_window_rejects_nonpositive_step() {
        for step in [Duration::zero(), Duration::minutes(-5)] {
            let err =
                TimeWindow::new(utc(2024, 1, 1, 0, 0), utc(2024, 1, 2, 0, 0), step).unwrap_err();
            assert!(matches!(err, WxError::InvalidRange(_)));
        }
    }

    #[test]
    fn test_single_window_yields_one_timestamp() {
        let at = utc(2019, 9, 1, 12, 0);
        let w = TimeWindow::single(at);
        assert_eq!(w.iter().collect::<Vec<_>>(), vec![at]);
        assert_eq!(w.frame_count(), 1);
    }

    #[test]
    fn test_parse_utc_formats() {
        assert_eq!(
            parse_utc("2019-09-01T06:00:00Z").unwrap(),
            utc(2019, 9, 1, 6, 0)
        );
        assert_eq!(
            parse_utc("2019-09-01T06:00").unwrap(),
            utc(2019, 9, 1, 6, 0)
        );
        assert_eq!(parse_utc("2019-09-01").unwrap(), utc(2019, 9, 1, 0, 0));
        assert!(parse_utc("not-a-time").is_err());
    }
}
