//! T-SQL literal encoding for exported row values.

use chrono::{NaiveDateTime, NaiveTime};

use crate::core::SqlValue;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Locale-independent formatting rules for literals.
///
/// Passed explicitly to the exporter so output never depends on the host's
/// locale or any process-wide setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatContext {
    datetime_format: &'static str,
    time_format: &'static str,
}

impl Default for FormatContext {
    fn default() -> Self {
        Self::invariant()
    }
}

impl FormatContext {
    /// `yyyy-MM-dd HH:mm:ss` for date/time values, `HH:mm:ss` for time-of-day.
    pub fn invariant() -> Self {
        Self {
            datetime_format: DATETIME_FORMAT,
            time_format: TIME_FORMAT,
        }
    }

    /// Encode one value as a T-SQL literal.
    ///
    /// Fractional seconds and time-zone offsets are dropped.
    pub fn literal(&self, value: &SqlValue<'_>) -> String {
        match value {
            SqlValue::Null => "null".to_string(),
            SqlValue::Bool(b) => String::from(if *b { "1" } else { "0" }),
            SqlValue::U8(v) => v.to_string(),
            SqlValue::I16(v) => v.to_string(),
            SqlValue::I32(v) => v.to_string(),
            SqlValue::I64(v) => v.to_string(),
            SqlValue::F32(v) => v.to_string(),
            SqlValue::F64(v) => v.to_string(),
            SqlValue::Decimal(v) => v.to_string(),
            SqlValue::Text(s) => quote_string(s),
            SqlValue::Uuid(u) => format!("'{}'", u.hyphenated()),
            SqlValue::Bytes(b) => hex_literal(b),
            SqlValue::DateTime(dt) => self.quote_datetime(dt),
            SqlValue::DateTimeOffset(dt) => self.quote_datetime(&dt.naive_local()),
            SqlValue::Date(d) => self.quote_datetime(&NaiveDateTime::new(*d, NaiveTime::default())),
            SqlValue::Time(t) => format!("'{}'", t.format(self.time_format)),
        }
    }

    fn quote_datetime(&self, dt: &NaiveDateTime) -> String {
        format!("'{}'", dt.format(self.datetime_format))
    }
}

/// Single-quote a string, doubling embedded quotes.
pub fn quote_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// `0x` followed by uppercase hex pairs, byte order preserved.
pub fn hex_literal(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode_upper(bytes))
}
