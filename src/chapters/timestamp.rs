/// Timestamp token recognition for chapter lines
use regex::Regex;
use std::sync::OnceLock;

/// A timestamp found in one line of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampToken {
    /// The exact substring that matched, including any parentheses
    pub matched: String,
    /// Decoded offset in seconds
    pub seconds: u64,
}

fn timestamp_regex() -> &'static Regex {
    static TIMESTAMP: OnceLock<Regex> = OnceLock::new();
    TIMESTAMP.get_or_init(|| {
        Regex::new(r"\(?([0-9]{1,2}):([0-9]{2})(?::([0-9]{2}))?\)?")
            .expect("timestamp pattern is valid")
    })
}

/// Find the leftmost timestamp in `line` and decode it.
///
/// `H:MM:SS` decodes as hours, minutes, seconds. The two-group form `X:YY` is
/// always minutes and seconds, so `5:30` is 330 seconds and never five and a
/// half hours.
pub fn parse_timestamp(line: &str) -> Option<TimestampToken> {
    let captures = timestamp_regex().captures(line)?;

    let group = |index: usize| -> Option<u64> {
        captures.get(index).and_then(|m| m.as_str().parse::<u64>().ok())
    };

    let first = group(1)?;
    let second = group(2)?;

    let seconds = match group(3) {
        Some(third) => first * 3600 + second * 60 + third,
        None => first * 60 + second,
    };

    Some(TimestampToken {
        matched: captures.get(0)?.as_str().to_string(),
        seconds,
    })
}

/// Render seconds as `M:SS`, or `H:MM:SS` once past the hour.
pub fn format_duration(seconds: i64) -> String {
    if seconds <= 0 {
        return "0:00".to_string();
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
