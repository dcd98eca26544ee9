//! ISO-8601 timestamps as stored in the ledger table.
//!
//! Every timestamp is UTC with exactly six fractional digits, so the stored
//! strings sort in chronological order. The `created_at` sort keys of the
//! project and status indexes rely on that.

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::errors::LedgerError;

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z");

/// Formats an instant in the ledger's timestamp format.
pub fn format_timestamp(at: OffsetDateTime) -> String {
    // The format only holds numeric components of a valid date, which cannot fail.
    at.to_offset(UtcOffset::UTC)
        .format(TIMESTAMP_FORMAT)
        .unwrap_or_default()
}

pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, LedgerError> {
    PrimitiveDateTime::parse(value, TIMESTAMP_FORMAT)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|_| LedgerError::InvalidTimestamp(value.to_string()))
}

/// Current time as a ledger timestamp.
pub fn timestamp_now() -> String {
    format_timestamp(OffsetDateTime::now_utc())
}

/// The ledger timestamp `days` days before now.
pub fn timestamp_past(days: u32) -> Result<String, LedgerError> {
    Clock::now().days_ago(days).map(format_timestamp)
}

/// A fixed "now" shared by every record built in one run.
///
/// Relative timestamps taken from the same clock keep their order even when
/// building the records takes longer than a microsecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    anchor: OffsetDateTime,
}

impl Clock {
    /// Creates a clock anchored at the current instant.
    pub fn now() -> Self {
        Self::fixed(OffsetDateTime::now_utc())
    }

    /// Creates a clock anchored at `anchor`, truncated to microseconds.
    pub fn fixed(anchor: OffsetDateTime) -> Self {
        let anchor = anchor.to_offset(UtcOffset::UTC);
        let anchor = anchor
            .replace_microsecond(anchor.microsecond())
            .unwrap_or(anchor);
        Self { anchor }
    }

    pub fn anchor(&self) -> OffsetDateTime {
        self.anchor
    }

    /// The anchor moved back by `days` whole days.
    ///
    /// Fails if the result falls before year 0, where the fixed-width format
    /// no longer sorts chronologically.
    pub fn days_ago(&self, days: u32) -> Result<OffsetDateTime, LedgerError> {
        self.anchor
            .checked_sub(Duration::days(i64::from(days)))
            .filter(|at| at.year() >= 0)
            .ok_or(LedgerError::TimestampOutOfRange(days))
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::now()
    }
}
