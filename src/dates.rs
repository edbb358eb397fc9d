use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone};

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| "Invalid date format. Use YYYY-MM-DD.".to_string())
}

/// Parses an operator-entered slot boundary, `YYYY-MM-DD HH:MM` in local time.
pub fn parse_slot(value: &str) -> Result<DateTime<Local>, String> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), "%Y-%m-%d %H:%M")
        .map_err(|_| "Invalid time format. Use YYYY-MM-DD HH:MM.".to_string())?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| "Time does not exist in the local timezone.".to_string())
}

/// Start of the given day as RFC 3339, for the appointments from-date filter.
pub fn day_start_rfc3339(date: NaiveDate) -> String {
    local_datetime(date, 0, 0, 0).to_rfc3339()
}

pub fn format_timestamp(value: &str) -> String {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Local).format("%b %e, %Y %H:%M").to_string())
        .unwrap_or_else(|_| value.to_string())
}

fn local_datetime(date: NaiveDate, hour: u32, minute: u32, second: u32) -> DateTime<Local> {
    let result = Local.with_ymd_and_hms(date.year(), date.month(), date.day(), hour, minute, second);
    result
        .earliest()
        .or_else(|| result.latest())
        .unwrap_or_else(Local::now)
}
