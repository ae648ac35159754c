//! Shared formatting utilities used by both CLI and TUI
//!
//! Walltimes and dates follow the OAR conventions used by Grid'5000:
//! walltimes are `h:mm:ss` (or plain seconds) and dates `YYYY-MM-DD HH:MM:SS`.

use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeZone};

/// OAR date format
pub const OAR_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default reservation walltime
pub const DEFAULT_WALLTIME: &str = "1:00:00";

/// Truncate a string to a maximum length (in characters), adding "..." at the end if truncated.
///
/// This function is Unicode-safe and counts characters, not bytes.
#[must_use]
pub fn truncate_string(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        // Edge case: if max_len is very small, just truncate without ellipsis
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Parse a walltime given either in OAR format (`h:mm:ss`, `h:mm`) or as a
/// plain number of seconds.
///
/// Returns `None` for malformed input and for a zero walltime.
#[must_use]
pub fn parse_walltime(walltime: &str) -> Option<u64> {
    let walltime = walltime.trim();
    if walltime.is_empty() {
        return None;
    }

    let parts: Vec<&str> = walltime.split(':').collect();
    let (hours, minutes, secs) = match parts.as_slice() {
        [secs] => return secs.parse::<u64>().ok().filter(|s| *s > 0),
        [hours, minutes] => (hours, parse_sexagesimal(minutes)?, 0),
        [hours, minutes, secs] => (hours, parse_sexagesimal(minutes)?, parse_sexagesimal(secs)?),
        _ => return None,
    };
    // huge hour counts must not wrap around
    let seconds = hours
        .parse::<u64>()
        .ok()?
        .checked_mul(3600)?
        .checked_add(minutes * 60 + secs)?;

    (seconds > 0).then_some(seconds)
}

/// Minutes or seconds field: must be below 60
fn parse_sexagesimal(field: &str) -> Option<u64> {
    field.parse::<u64>().ok().filter(|v| *v < 60)
}

/// Format seconds as an OAR walltime (`h:mm:ss`, hours not padded)
///
/// # Examples
/// ```ignore
/// assert_eq!(format_walltime(3600), "1:00:00");
/// assert_eq!(format_walltime(93784), "26:03:04");
/// ```
#[must_use]
pub fn format_walltime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{}:{:02}:{:02}", hours, minutes, secs)
}

/// Normalize a walltime string to OAR format
#[must_use]
pub fn normalize_walltime(walltime: &str) -> Option<String> {
    parse_walltime(walltime).map(format_walltime)
}

/// Format a local datetime as an OAR date
#[must_use]
pub fn format_oar_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format(OAR_DATE_FORMAT).to_string()
}

/// Parse an OAR date in local time
#[must_use]
pub fn parse_oar_date(date: &str) -> Option<DateTime<Local>> {
    let naive = NaiveDateTime::parse_from_str(date.trim(), OAR_DATE_FORMAT).ok()?;
    Local.from_local_datetime(&naive).earliest()
}

/// Default start date: one minute from `now`
#[must_use]
pub fn default_start_date(now: DateTime<Local>) -> String {
    format_oar_date(&(now + Duration::minutes(1)))
}

/// Default end date: three weeks and one minute from `now`
#[must_use]
pub fn default_end_date(now: DateTime<Local>) -> String {
    format_oar_date(&(now + Duration::weeks(3) + Duration::minutes(1)))
}

/// Quote a command line argument for a POSIX shell when needed
#[must_use]
pub fn shell_quote(arg: &str) -> String {
    let is_plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ',' | ':' | '.' | '-' | '_' | '/' | '='));
    if is_plain {
        arg.to_string()
    } else {
        format!("\"{}\"", arg.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("abcdef", 3), "abc");
    }

    #[test]
    fn test_parse_walltime_oar_format() {
        assert_eq!(parse_walltime("1:00:00"), Some(3600));
        assert_eq!(parse_walltime("10:00:00"), Some(36000));
        assert_eq!(parse_walltime("2:30"), Some(9000));
        assert_eq!(parse_walltime("0:00:45"), Some(45));
    }

    #[test]
    fn test_parse_walltime_seconds() {
        assert_eq!(parse_walltime("7200"), Some(7200));
        assert_eq!(parse_walltime(" 60 "), Some(60));
    }

    #[test]
    fn test_parse_walltime_invalid() {
        assert_eq!(parse_walltime(""), None);
        assert_eq!(parse_walltime("0"), None);
        assert_eq!(parse_walltime("0:00:00"), None);
        assert_eq!(parse_walltime("1:60:00"), None);
        assert_eq!(parse_walltime("1:00:00:00"), None);
        assert_eq!(parse_walltime("one hour"), None);
    }

    #[test]
    fn test_parse_walltime_overflow() {
        assert_eq!(parse_walltime("99999999999999999:00:00"), None);
        assert_eq!(parse_walltime("5124095576030431:59:59"), None);
        assert_eq!(normalize_walltime("99999999999999999:00:00"), None);
        assert_eq!(parse_walltime("18446744073709551615"), Some(u64::MAX));
    }

    #[test]
    fn test_format_walltime() {
        assert_eq!(format_walltime(3600), "1:00:00");
        assert_eq!(format_walltime(93784), "26:03:04");
        assert_eq!(normalize_walltime("7200").as_deref(), Some("2:00:00"));
    }

    #[test]
    fn test_oar_date_round_trip_and_defaults() {
        let now = parse_oar_date("2013-05-14 10:00:00").unwrap();
        assert_eq!(format_oar_date(&now), "2013-05-14 10:00:00");
        assert_eq!(default_start_date(now), "2013-05-14 10:01:00");
        assert_eq!(default_end_date(now), "2013-06-04 10:01:00");
        assert!(parse_oar_date("14/05/2013").is_none());
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("grid5000:100,taurus:4"), "grid5000:100,taurus:4");
        assert_eq!(shell_quote("2013-05-14 10:00:00"), "\"2013-05-14 10:00:00\"");
        assert_eq!(shell_quote("-t \"deploy\""), "\"-t \\\"deploy\\\"\"");
        assert_eq!(shell_quote(""), "\"\"");
    }
}
