/// PostgreSQL timestamp text
///
/// Accepts what `timestamp` and `timestamptz` columns render as text:
///
/// ```text
/// 2024-01-01 00:00:00
/// 2024-01-01 00:00:00.123456
/// 2024-01-01 00:00:00+00
/// 2024-01-01 12:30:00-05:30
/// 2024-01-01T00:00:00Z
/// 2024-01-01
/// 0044-03-15 00:00:00+00 BC
/// ```
///
/// A value without an offset is taken as UTC; a value with one is normalised
/// to UTC. A trailing ` BC` maps year `n` to the proleptic year `1 - n`.
///
/// Only the ISO `DateStyle` is understood; `db::pool` pins it on every
/// connection.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

/// Parses a PostgreSQL timestamp, returning `None` if the text is malformed
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    let (value, before_christ) = match value.strip_suffix(" BC") {
        Some(rest) => (rest.trim_end(), true),
        None => (value, false),
    };
    let (date_part, time_part) = match value.find(|c: char| c == ' ' || c == 'T') {
        Some(i) => (&value[..i], Some(&value[i + 1..])),
        None => (value, None),
    };

    let date = parse_date(date_part, before_christ)?;
    let Some(time_part) = time_part else {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    };

    let (clock, offset) = match time_part.find(|c: char| c == '+' || c == '-' || c == 'Z') {
        Some(i) => (&time_part[..i], Some(&time_part[i..])),
        None => (time_part, None),
    };

    let time = NaiveTime::parse_from_str(clock, "%H:%M:%S%.f").ok()?;
    let offset_seconds = match offset {
        None | Some("Z") => 0,
        Some(offset) => parse_offset(offset)?,
    };

    let local = FixedOffset::east_opt(offset_seconds)?
        .from_local_datetime(&date.and_time(time))
        .single()?;
    Some(local.with_timezone(&Utc))
}

/// Parses `YYYY-MM-DD`; the year is taken before the calendar check so that
/// BC leap days (`0005-02-29 BC` is proleptic year -4) are accepted
fn parse_date(date: &str, before_christ: bool) -> Option<NaiveDate> {
    let mut parts = date.split('-');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some()
        || year.len() < 4
        || month.len() != 2
        || day.len() != 2
        || ![year, month, day]
            .iter()
            .all(|part| part.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    let year: i32 = year.parse().ok()?;
    let year = match (before_christ, year) {
        (true, 0) => return None,
        (true, year) => 1 - year,
        (false, year) => year,
    };
    NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
}

/// Parses `+HH`, `+HH:MM` or `+HH:MM:SS` (or `-`) into seconds east of UTC
fn parse_offset(offset: &str) -> Option<i32> {
    let (sign, rest) = match offset.split_at(1) {
        ("+", rest) => (1, rest),
        ("-", rest) => (-1, rest),
        _ => return None,
    };

    let mut seconds = 0i32;
    let mut parts = 0;
    for (part, unit) in rest.split(':').zip([3600, 60, 1]) {
        if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        seconds += part.parse::<i32>().ok()? * unit;
        parts += 1;
    }

    if parts == 0 || rest.split(':').count() != parts {
        return None;
    }
    Some(sign * seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_naive_timestamp_is_utc() {
        assert_eq!(
            parse_timestamp("2024-01-01 00:00:00"),
            Some(utc(2024, 1, 1, 0, 0, 0))
        );
    }

    #[test]
    fn test_fractional_seconds() {
        let ts = parse_timestamp("2024-03-05 10:11:12.123456").unwrap();
        assert_eq!(ts.timestamp_subsec_micros(), 123456);
    }

    #[test]
    fn test_offsets_are_normalised() {
        assert_eq!(
            parse_timestamp("2024-01-01 00:00:00+00"),
            Some(utc(2024, 1, 1, 0, 0, 0))
        );
        assert_eq!(
            parse_timestamp("2024-01-01 12:30:00-05:30"),
            Some(utc(2024, 1, 1, 18, 0, 0))
        );
        assert_eq!(
            parse_timestamp("2024-01-01 02:00:00+02"),
            Some(utc(2024, 1, 1, 0, 0, 0))
        );
        assert_eq!(
            parse_timestamp("2024-01-01T00:00:00Z"),
            Some(utc(2024, 1, 1, 0, 0, 0))
        );
    }

    #[test]
    fn test_date_only() {
        assert_eq!(parse_timestamp("2024-02-29"), Some(utc(2024, 2, 29, 0, 0, 0)));
    }

    #[test]
    fn test_before_christ_suffix() {
        assert_eq!(
            parse_timestamp("0044-03-15 00:00:00+00 BC"),
            Some(utc(-43, 3, 15, 0, 0, 0))
        );
        assert_eq!(
            parse_timestamp("0001-01-01 00:00:00 BC"),
            Some(utc(0, 1, 1, 0, 0, 0))
        );
        assert_eq!(parse_timestamp("0005-02-29 BC"), Some(utc(-4, 2, 29, 0, 0, 0)));
    }

    #[test]
    fn test_non_iso_date_styles_are_rejected() {
        for input in [
            "01/01/2024 00:00:00 UTC",
            "Mon Jan 01 00:00:00 2024 UTC",
            "01.01.2024 00:00:00 UTC",
        ] {
            assert!(parse_timestamp(input).is_none(), "{input:?}");
        }
    }

    #[test]
    fn test_malformed() {
        for input in [
            "",
            "not a date",
            "2024-13-01 00:00:00",
            "2024-01-01 25:00:00",
            "2024-01-01 00:00:00+5",
            "2024-01-01 00:00:00+05:3",
            "2024-01-01 00:00:00 extra",
            "BC",
            "0000-01-01 00:00:00 BC",
            "24-01-01",
            "2024-01-01 00:00:00 AD",
        ] {
            assert!(parse_timestamp(input).is_none(), "{input:?}");
        }
    }
}
