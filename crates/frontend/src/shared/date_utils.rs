/// Utilities for date and time formatting
///
/// Сервер отдаёт моменты в UTC, на экране показываем DD.MM.YYYY HH:MM
use chrono::{DateTime, Utc};

/// 2024-03-15T14:02:26Z -> "15.03.2024 14:02"
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%d.%m.%Y %H:%M").to_string()
}

pub fn format_datetime_opt(dt: Option<&DateTime<Utc>>) -> String {
    dt.map(format_datetime).unwrap_or_else(|| "—".to_string())
}

/// ISO date "2024-03-15" -> "15.03.2024"; anything else is returned as is
pub fn format_date(date_str: &str) -> String {
    let date_part = date_str.split('T').next().unwrap_or(date_str);
    if let Some((year, rest)) = date_part.split_once('-') {
        if let Some((month, day)) = rest.split_once('-') {
            return format!("{}.{}.{}", day, month, year);
        }
    }
    date_str.to_string()
}

/// Длительность в часах для отчётов: "—", "45 мин", "3.5 ч"
pub fn format_hours(hours: Option<f64>) -> String {
    match hours {
        None => "—".to_string(),
        Some(h) if h < 1.0 => format!("{} мин", (h * 60.0).round() as i64),
        Some(h) => format!("{:.1} ч", h),
    }
}

/// Сегодняшняя дата браузера в формате YYYY-MM-DD
pub fn today_iso() -> String {
    let now = js_sys::Date::new_0();
    format!(
        "{:04}-{:02}-{:02}",
        now.get_full_year(),
        now.get_month() + 1,
        now.get_date()
    )
}

/// Первое число месяца для даты YYYY-MM-DD
pub fn month_start(date_iso: &str) -> String {
    match date_iso.get(..8) {
        Some(prefix) if date_iso.len() == 10 => format!("{}01", prefix),
        _ => date_iso.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_datetime() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 15, 14, 2, 26).unwrap();
        assert_eq!(format_datetime(&dt), "15.03.2024 14:02");
        assert_eq!(format_datetime_opt(None), "—");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-15"), "15.03.2024");
        assert_eq!(format_date("2024-03-15T14:02:26.123Z"), "15.03.2024");
        assert_eq!(format_date("invalid"), "invalid");
    }

    #[test]
    fn test_format_hours() {
        assert_eq!(format_hours(None), "—");
        assert_eq!(format_hours(Some(0.75)), "45 мин");
        assert_eq!(format_hours(Some(3.46)), "3.5 ч");
    }

    #[test]
    fn test_month_start() {
        assert_eq!(month_start("2025-03-17"), "2025-03-01");
        assert_eq!(month_start(""), "");
    }
}
