//! Permissive date header parsing.
//!
//! Legacy mail carries dates in many shapes: RFC 2822 with trailing zone
//! comments, obsolete zone names instead of numeric offsets, missing
//! seconds, weekdays that disagree with the date, two-digit years, and
//! month-first dates on a 12-hour clock. All of them are normalized to an absolute UTC timestamp. A date without any zone
//! information is rejected since it cannot be placed on the timeline.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};

use crate::error::{Error, Result};

/// Obsolete zone names and their UTC offsets.
const ZONE_NAMES: &[(&str, &str)] = &[
    ("UT", "+0000"),
    ("UTC", "+0000"),
    ("GMT", "+0000"),
    ("Z", "+0000"),
    ("EST", "-0500"),
    ("EDT", "-0400"),
    ("CST", "-0600"),
    ("CDT", "-0500"),
    ("MST", "-0700"),
    ("MDT", "-0600"),
    ("PST", "-0800"),
    ("PDT", "-0700"),
    ("AST", "-0400"),
    ("ADT", "-0300"),
    ("HST", "-1000"),
    ("AKST", "-0900"),
    ("AKDT", "-0800"),
    ("BST", "+0100"),
    ("CET", "+0100"),
    ("CEST", "+0200"),
];

/// Layouts tried once the weekday is dropped and the zone is numeric.
const LAYOUTS: &[&str] = &[
    "%d %b %Y %H:%M:%S %z",
    "%d %b %Y %H:%M %z",
    "%d %b %y %H:%M:%S %z",
    "%d %b %y %H:%M %z",
    "%d %B %Y %H:%M:%S %z",
    "%d-%b-%Y %H:%M:%S %z",
    "%b %d %Y %H:%M:%S %z",
    "%b %d %H:%M:%S %Y %z",
    "%B %d, %Y %H:%M:%S %z",
    "%B %d, %Y %H:%M %z",
    "%B %d, %Y %I:%M:%S %p %z",
    "%B %d, %Y %I:%M %p %z",
    "%d %b %Y %I:%M:%S %p %z",
    "%d %b %Y %I:%M %p %z",
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%d %H:%M %z",
    "%m/%d/%Y %H:%M:%S %z",
    "%m/%d/%Y %H:%M %z",
    "%m/%d/%Y %I:%M:%S %p %z",
    "%m/%d/%Y %I:%M %p %z",
    "%m/%d/%y %H:%M:%S %z",
];

const WEEKDAYS: &[&str] = &["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

/// Parses a date header into a UTC timestamp.
///
/// # Errors
///
/// Returns [`Error::InvalidDate`] if no known layout matches or the value
/// carries no zone information.
pub fn normalize_date(raw: &str) -> Result<DateTime<Utc>> {
    parse_with_offset(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| Error::InvalidDate {
            raw: raw.to_string(),
        })
}

/// Renders a UTC timestamp as ISO-8601 with an explicit `+00:00` offset.
#[must_use]
pub fn to_iso8601(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

fn parse_with_offset(raw: &str) -> Option<DateTime<FixedOffset>> {
    let cleaned = strip_comments(raw);
    if cleaned.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(&cleaned) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(&cleaned) {
        return Some(dt);
    }

    let canonical = canonicalize(&cleaned)?;
    LAYOUTS
        .iter()
        .find_map(|layout| DateTime::parse_from_str(&canonical, layout).ok())
}

/// Removes parenthesized comments (nesting allowed) and collapses whitespace.
fn strip_comments(raw: &str) -> String {
    let mut depth = 0usize;
    let mut out = String::with_capacity(raw.len());

    for c in raw.chars() {
        match c {
            '(' => depth += 1,
            ')' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drops a leading weekday and rewrites the trailing zone as `+hhmm`.
///
/// Returns `None` when the value has no zone at all.
fn canonicalize(cleaned: &str) -> Option<String> {
    let mut tokens: Vec<String> = cleaned.split_whitespace().map(str::to_string).collect();

    if tokens.first().is_some_and(|t| is_weekday(t)) {
        tokens.remove(0);
    }

    let last = tokens.pop()?;
    let offset = match zone_offset(&last) {
        Some(offset) => {
            // "-0700 PDT": the numeric offset already present wins
            match tokens.last().and_then(|t| numeric_offset(t)) {
                Some(numeric) => {
                    tokens.pop();
                    numeric
                }
                None => offset.to_string(),
            }
        }
        None => numeric_offset(&last)?,
    };

    tokens.push(offset);
    Some(tokens.join(" "))
}

fn is_weekday(token: &str) -> bool {
    let word = token.trim_end_matches(',').to_ascii_lowercase();
    word.len() >= 3
        && word.chars().all(|c| c.is_ascii_alphabetic())
        && WEEKDAYS.iter().any(|day| word.starts_with(day))
}

fn zone_offset(token: &str) -> Option<&'static str> {
    ZONE_NAMES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(token))
        .map(|(_, offset)| *offset)
}

/// Accepts `+hhmm`, `-hhmm` and `+hh:mm`, returning the colon-free form.
fn numeric_offset(token: &str) -> Option<String> {
    let sign = token.chars().next().filter(|c| *c == '+' || *c == '-')?;
    let digits: String = token[1..].chars().filter(|c| *c != ':').collect();
    (digits.len() == 4 && digits.chars().all(|c| c.is_ascii_digit()))
        .then(|| format!("{sign}{digits}"))
}
