use unicode_width::UnicodeWidthStr;

pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Terminal column occupied by the cursor after `cursor` characters of `text`.
pub fn display_column(text: &str, cursor: usize) -> usize {
    let end = text
        .char_indices()
        .nth(cursor)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    text[..end].width()
}

pub fn format_timestamp(timestamp: u64) -> String {
    use std::time::{Duration, UNIX_EPOCH};

    let time = UNIX_EPOCH + Duration::from_secs(timestamp);
    let datetime: chrono::DateTime<chrono::Local> = time.into();

    let today = chrono::Local::now().date_naive();
    let date = datetime.date_naive();

    if date == today {
        datetime.format("Today %H:%M").to_string()
    } else if date == today - chrono::Duration::days(1) {
        datetime.format("Yesterday %H:%M").to_string()
    } else {
        date.format("%Y-%m-%d").to_string()
    }
}
