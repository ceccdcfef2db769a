//! Natural-language date/time resolution.
//!
//! User requests arrive as unconstrained text ("Is 10 July 2025 at 3 PM
//! available?") so resolution is layered, strict to lenient: a cheap
//! format-driven pass over a cleaned copy of the input, the same pass
//! over the raw input, then a fuzzy token-extraction pass. Bare times
//! are future-biased, resolving to their next occurrence in the
//! service's fixed timezone.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use regex::Regex;

/// Filler words commonly wrapped around the date/time in a request.
static STOP_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(is|a|slot|available|free|at|on|the|for|check|if)\b").unwrap()
});

/// Ordinal day suffixes ("10th" -> "10").
static ORDINAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})(?:st|nd|rd|th)\b").unwrap());

/// Anything that isn't useful to a date format string.
static PUNCT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9:/\s-]").unwrap());

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// A 12-hour clock time, minutes optional ("3pm", "3:30 PM").
static AMPM_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?::([0-5]\d))?\s*(am|pm)\b").unwrap()
});

/// A 24-hour clock time ("15:30").
static H24_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([01]?\d|2[0-3]):([0-5]\d)\b").unwrap());

static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(20\d{2})\b").unwrap());

static MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun(?:e)?|jul(?:y)?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\b",
    )
    .unwrap()
});

static DAY_OF_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([0-3]?\d)(?:st|nd|rd|th)?\b").unwrap());

/// The input could not be resolved to a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveError {
    input: String,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Couldn't understand the time in \"{}\". Try something like 'Is 10 July 2025 at 3 PM available?'",
            self.input
        )
    }
}

impl std::error::Error for ResolveError {}

/// Resolve free text to a concrete point in time in the timezone of
/// `now`. Resolution of a fully specified absolute string is
/// idempotent; underspecified input is biased toward the future.
pub fn resolve(text: &str, now: DateTime<Tz>) -> Result<DateTime<Tz>, ResolveError> {
    let cleaned = clean(text);
    for candidate in [cleaned.as_str(), text] {
        if let Some(resolved) = parse_strict(candidate, now) {
            return Ok(resolved);
        }
    }
    parse_fuzzy(text, now).ok_or_else(|| ResolveError {
        input: text.to_string(),
    })
}

/// Lowercase, drop filler words and punctuation, strip ordinal
/// suffixes, collapse whitespace.
fn clean(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = STOP_WORDS.replace_all(&lowered, " ");
    let stripped = ORDINAL.replace_all(&stripped, "$1");
    let stripped = PUNCT.replace_all(&stripped, " ");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

fn parse_strict(text: &str, now: DateTime<Tz>) -> Option<DateTime<Tz>> {
    let tz = now.timezone();
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&tz));
    }

    const DATETIME_FORMATS: &[&str] = &[
        "%d %B %Y %I:%M %p",
        "%d %B %Y %I %p",
        "%B %d %Y %I:%M %p",
        "%B %d %Y %I %p",
        "%d %B %Y %H:%M",
        "%Y-%m-%d %H:%M",
        "%d/%m/%Y %I:%M %p",
        "%d/%m/%Y %I %p",
        "%d/%m/%Y %H:%M",
    ];
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return from_local(naive, tz);
        }
    }

    const DATE_FORMATS: &[&str] = &["%d %B %Y", "%B %d %Y", "%Y-%m-%d", "%d/%m/%Y"];
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return from_local(date.and_time(NaiveTime::MIN), tz);
        }
    }

    // A bare time resolves to its next occurrence.
    const TIME_FORMATS: &[&str] = &["%I:%M %p", "%I %p", "%H:%M"];
    for format in TIME_FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(text, format) {
            return next_occurrence(time, now, 0);
        }
    }

    None
}

/// Last-resort pass: pull whatever time, day, month and year tokens
/// appear anywhere in the raw input and fill the gaps from `now`.
fn parse_fuzzy(text: &str, now: DateTime<Tz>) -> Option<DateTime<Tz>> {
    let tz = now.timezone();
    let mut remainder = text.to_lowercase();

    // Extract the time of day first so its digits are not mistaken
    // for a day of the month.
    let mut time = None;
    let mut time_range = None;
    if let Some(caps) = AMPM_TIME.captures(&remainder) {
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps.get(2).map_or(0, |m| m.as_str().parse().unwrap_or(0));
        if (1..=12).contains(&hour) {
            let pm = caps[3].starts_with('p');
            let hour = match (hour, pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, true) => h + 12,
                (h, false) => h,
            };
            time = NaiveTime::from_hms_opt(hour, minute, 0);
            time_range = caps.get(0).map(|m| m.range());
        }
    } else if let Some(caps) = H24_TIME.captures(&remainder) {
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        time = NaiveTime::from_hms_opt(hour, minute, 0);
        time_range = caps.get(0).map(|m| m.range());
    }
    if let Some(range) = time_range {
        remainder.replace_range(range, " ");
    }

    let year_range = YEAR.find(&remainder).map(|m| m.range());
    let year = year_range
        .clone()
        .and_then(|r| remainder[r].parse::<i32>().ok());
    if let Some(range) = year_range {
        remainder.replace_range(range, " ");
    }

    let month = MONTH
        .captures(&remainder)
        .map(|c| month_number(&c[1]));

    let day = DAY_OF_MONTH
        .captures(&remainder)
        .and_then(|c| c[1].parse::<u32>().ok())
        .filter(|d| (1..=31).contains(d));

    let day_offset = i64::from(remainder.contains("tomorrow"));
    let day_word = day_offset > 0 || remainder.contains("today");

    // A lone day number is too ambiguous to act on, but a day word on
    // its own names a date: it resolves to midnight of that day.
    if month.is_none() {
        return match time {
            Some(time) => next_occurrence(time, now, day_offset),
            None if day_word => {
                let date = now.date_naive() + Duration::days(day_offset);
                from_local(date.and_time(NaiveTime::MIN), tz)
            }
            None => None,
        };
    }

    let year_given = year.is_some();
    let year = year.unwrap_or_else(|| now.year());
    let month = month?;
    let day = day.unwrap_or_else(|| now.day());
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let naive = date.and_time(time.unwrap_or(NaiveTime::MIN));
    let resolved = from_local(naive, tz)?;

    // Future bias applies only when the year was left out.
    if !year_given && resolved <= now {
        let next_year = NaiveDate::from_ymd_opt(year + 1, month, day)?;
        return from_local(next_year.and_time(time.unwrap_or(NaiveTime::MIN)), tz);
    }

    Some(resolved)
}

fn from_local(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&naive).earliest()
}

fn next_occurrence(time: NaiveTime, now: DateTime<Tz>, day_offset: i64) -> Option<DateTime<Tz>> {
    let tz = now.timezone();
    let date = now.date_naive() + Duration::days(day_offset);
    let candidate = from_local(date.and_time(time), tz)?;
    if day_offset > 0 || candidate > now {
        Some(candidate)
    } else {
        from_local((date + Duration::days(1)).and_time(time), tz)
    }
}

fn month_number(name: &str) -> u32 {
    match &name[..3] {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        _ => 12,
    }
}
