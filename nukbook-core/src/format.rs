//! Small display helpers shared by every view

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Keep the first `max_words` words, appending `...` when something was cut
pub fn trim_words(value: &str, max_words: usize) -> String {
    let words: Vec<&str> = value.split_whitespace().collect();
    if words.len() <= max_words {
        return value.trim().to_string();
    }
    format!("{}...", words[..max_words].join(" "))
}

/// Parse the timestamp shapes the API emits
///
/// RFC 3339 with offset, naive ISO datetimes (taken as UTC) and plain dates.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    None
}

/// "just now", "5 minutes ago", "in 2 hours", "yesterday", "3 days ago"
pub fn relative_time(value: &str, now: DateTime<Utc>) -> Option<String> {
    let then = parse_timestamp(value)?;
    let diff_sec = (then - now).num_milliseconds() as f64 / 1000.0;
    let diff_sec = diff_sec.round() as i64;
    let abs = diff_sec.abs();

    if abs < 60 {
        return Some("just now".to_string());
    }
    if abs < 3600 {
        return Some(phrase(round_div(diff_sec, 60), "minute"));
    }
    if abs < 86400 {
        return Some(phrase(round_div(diff_sec, 3600), "hour"));
    }

    let days = round_div(diff_sec, 86400);
    Some(match days {
        -1 => "yesterday".to_string(),
        1 => "tomorrow".to_string(),
        _ => phrase(days, "day"),
    })
}

/// Same as [`relative_time`] against the current clock
pub fn relative_time_now(value: &str) -> Option<String> {
    relative_time(value, Utc::now())
}

fn round_div(value: i64, unit: i64) -> i64 {
    (value as f64 / unit as f64).round() as i64
}

fn phrase(amount: i64, unit: &str) -> String {
    let n = amount.abs();
    let unit = if n == 1 {
        unit.to_string()
    } else {
        format!("{}s", unit)
    };
    if amount < 0 {
        format!("{} {} ago", n, unit)
    } else {
        format!("in {} {}", n, unit)
    }
}

/// Resolve a media path against the public API base
///
/// Absolute `http(s)` URLs pass through untouched.
pub fn media_url(base: &str, path: Option<&str>) -> Option<String> {
    let path = path.filter(|p| !p.is_empty())?;
    let lower = path.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Some(path.to_string());
    }
    if base.is_empty() {
        Some(path.to_string())
    } else {
        Some(format!("{}{}", base, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_trim_words() {
        assert_eq!(trim_words("  a short line ", 5), "a short line");
        assert_eq!(
            trim_words("one two three four five six", 3),
            "one two three..."
        );
    }

    #[test]
    fn test_relative_time_units() {
        let now = now();
        let ago = |d: Duration| (now - d).to_rfc3339();

        assert_eq!(relative_time(&ago(Duration::seconds(20)), now).as_deref(), Some("just now"));
        assert_eq!(
            relative_time(&ago(Duration::minutes(5)), now).as_deref(),
            Some("5 minutes ago")
        );
        assert_eq!(
            relative_time(&ago(Duration::hours(1)), now).as_deref(),
            Some("1 hour ago")
        );
        assert_eq!(
            relative_time(&ago(Duration::days(1)), now).as_deref(),
            Some("yesterday")
        );
        assert_eq!(
            relative_time(&ago(Duration::days(4)), now).as_deref(),
            Some("4 days ago")
        );
        assert_eq!(
            relative_time(&(now + Duration::hours(2)).to_rfc3339(), now).as_deref(),
            Some("in 2 hours")
        );
    }

    #[test]
    fn test_relative_time_naive_and_invalid() {
        assert_eq!(
            relative_time("2024-05-10T11:30:00", now()).as_deref(),
            Some("30 minutes ago")
        );
        assert_eq!(relative_time("not a date", now()), None);
    }

    #[test]
    fn test_media_url() {
        assert_eq!(media_url("https://api.example", None), None);
        assert_eq!(media_url("https://api.example", Some("")), None);
        assert_eq!(
            media_url("https://api.example", Some("/media/a.jpg")).as_deref(),
            Some("https://api.example/media/a.jpg")
        );
        assert_eq!(
            media_url("https://api.example", Some("HTTPS://cdn/x.png")).as_deref(),
            Some("HTTPS://cdn/x.png")
        );
        assert_eq!(media_url("", Some("/media/a.jpg")).as_deref(), Some("/media/a.jpg"));
    }
}
