/// Truncate `text` to `max_chars` characters, appending "..." if anything was cut
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

/// Format an RFC 3339 timestamp or a YYYY-MM-DD date as "January 5, 2025".
/// Anything else is returned unchanged.
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%B %-d, %Y").to_string()
    } else if let Ok(d) = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        d.format("%B %-d, %Y").to_string()
    } else {
        date.to_string()
    }
}
