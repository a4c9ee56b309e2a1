use chrono::{Duration, Local, NaiveDate};

/// Parses human-entered dates from the add form into `YYYY-MM-DD`.
///
/// Supported formats:
/// - Keywords: "today", "yesterday"
/// - ISO dates: "2024-11-25", "2024/11/25"
/// - US formats: "11/25/2024", "11-25-2024"
pub fn parse_event_date(input: &str) -> Option<String> {
    parse_date(input).map(|d| d.format("%Y-%m-%d").to_string())
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return None;
    }

    match input.as_str() {
        "today" => return Some(Local::now().date_naive()),
        "yesterday" => return Some(Local::now().date_naive() - Duration::days(1)),
        _ => {}
    }

    NaiveDate::parse_from_str(&input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&input, "%Y/%m/%d"))
        .or_else(|_| NaiveDate::parse_from_str(&input, "%m/%d/%Y"))
        .or_else(|_| NaiveDate::parse_from_str(&input, "%m-%d-%Y"))
        .ok()
}
