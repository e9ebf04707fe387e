//! Field parsing policies shared by validation and by the serde glue used
//! when records are read back from the remote table or the cache blob.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serializer};
use std::fmt;

use crate::error::ValidationError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Returns `x` when it is a finite number, otherwise `default`.
///
/// This is the journal's lossy-but-available policy for P/L input: a NaN or
/// infinite value never blocks an entry, it is recorded as `default`.
pub fn coerce_finite(x: f64, default: f64) -> f64 {
    if x.is_finite() {
        x
    } else {
        default
    }
}

/// Parses a P/L form value.
///
/// Blank input is an untouched form field and reads as 0. Anything that
/// parses as a float goes through [`coerce_finite`]; other text is rejected.
pub fn parse_pl(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed
        .parse::<f64>()
        .map(|x| coerce_finite(x, 0.0))
        .map_err(|_| ValidationError::InvalidNumericField {
            field,
            value: raw.to_string(),
        })
}

/// Strict calendar date, `YYYY-MM-DD`.
pub fn parse_trade_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Time of day, `HH:MM` or `HH:MM:SS[.fff]`.
pub fn parse_entry_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

// Stored dates may come back from a timestamp column.
fn parse_stored_date(raw: &str) -> Option<NaiveDate> {
    parse_trade_date(raw)
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

fn lenient_number(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .map(|x| coerce_finite(x, 0.0))
        .unwrap_or(0.0)
}

pub(crate) mod trade_date {
    use super::*;

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&date.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        parse_stored_date(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid trade date {:?}", raw)))
    }
}

pub(crate) mod entry_time {
    use super::*;

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        if time.second() == 0 && time.nanosecond() == 0 {
            s.collect_str(&time.format("%H:%M"))
        } else {
            s.collect_str(&time.format("%H:%M:%S"))
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse_entry_time(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid entry time {:?}", raw)))
    }
}

/// Remote ids may be bigint keys or uuids; both are held as strings.
pub(crate) fn trade_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string or integer trade id")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    d.deserialize_any(IdVisitor)
}

/// P/L values read back from a store: numbers, numeric strings or null.
/// Everything that is not a finite number reads as 0.
pub(crate) fn pl_value<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    struct PlVisitor;

    impl<'de> Visitor<'de> for PlVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number, a numeric string or null")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(coerce_finite(v, 0.0))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            Ok(lenient_number(v))
        }

        fn visit_unit<E: de::Error>(self) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_none<E: de::Error>(self) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<f64, D::Error> {
            d.deserialize_any(PlVisitor)
        }
    }

    d.deserialize_any(PlVisitor)
}

pub(crate) fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

pub(crate) fn is_false(b: &bool) -> bool {
    !*b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_finite_replaces_nan_and_infinity() {
        assert_eq!(coerce_finite(12.5, 0.0), 12.5);
        assert_eq!(coerce_finite(-3.0, 0.0), -3.0);
        assert_eq!(coerce_finite(f64::NAN, 0.0), 0.0);
        assert_eq!(coerce_finite(f64::INFINITY, 0.0), 0.0);
        assert_eq!(coerce_finite(f64::NEG_INFINITY, 7.0), 7.0);
    }

    #[test]
    fn parse_pl_policy() {
        assert_eq!(parse_pl("dollar_pl", "150.25").unwrap(), 150.25);
        assert_eq!(parse_pl("dollar_pl", " -75 ").unwrap(), -75.0);
        assert_eq!(parse_pl("dollar_pl", "").unwrap(), 0.0);
        assert_eq!(parse_pl("dollar_pl", "NaN").unwrap(), 0.0);
        assert_eq!(parse_pl("dollar_pl", "inf").unwrap(), 0.0);
        assert_eq!(parse_pl("dollar_pl", "1e999").unwrap(), 0.0);

        let err = parse_pl("points_pl", "twelve").unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidNumericField {
                field: "points_pl",
                value: "twelve".to_string()
            }
        );
    }

    #[test]
    fn entry_time_accepts_minutes_and_seconds() {
        assert_eq!(
            parse_entry_time("09:30"),
            NaiveTime::from_hms_opt(9, 30, 0)
        );
        assert_eq!(
            parse_entry_time("14:05:30"),
            NaiveTime::from_hms_opt(14, 5, 30)
        );
        assert_eq!(parse_entry_time("25:00"), None);
        assert_eq!(parse_entry_time("9.30am"), None);
    }

    #[test]
    fn trade_date_is_strict_but_stored_dates_are_not() {
        assert_eq!(
            parse_trade_date("2024-01-15"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(parse_trade_date("2024-02-30"), None);
        assert_eq!(parse_trade_date("2024-01-15T00:00:00Z"), None);
        assert_eq!(
            parse_stored_date("2024-01-15T00:00:00+00:00"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(
            parse_stored_date("2024-01-15T13:45:00"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
    }
}
