use crate::domain::a003_inquiry::status::InquiryStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Общий фильтр отчётов. Даты в формате "YYYY-MM-DD", обе границы включительно.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportFilter {
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub trainer_id: Option<String>,
    #[serde(default)]
    pub section_id: Option<String>,
    #[serde(default)]
    pub status: Option<InquiryStatus>,
}

fn parse_date(value: &Option<String>) -> Result<Option<NaiveDate>, String> {
    match value.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| format!("Некорректная дата '{}': {}", s, e)),
    }
}

impl ReportFilter {
    pub fn date_range(&self) -> Result<(Option<NaiveDate>, Option<NaiveDate>), String> {
        let from = parse_date(&self.date_from)?;
        let to = parse_date(&self.date_to)?;
        if let (Some(f), Some(t)) = (from, to) {
            if f > t {
                return Err("Дата начала позже даты окончания".into());
            }
        }
        Ok((from, to))
    }

    /// Попадает ли момент в период фильтра (по дате UTC)
    pub fn contains(&self, at: DateTime<Utc>) -> Result<bool, String> {
        let (from, to) = self.date_range()?;
        let day = at.date_naive();
        Ok(from.map_or(true, |f| day >= f) && to.map_or(true, |t| day <= t))
    }
}

/// Количество в разрезе группы (категория, тренер и т.п.)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCount {
    pub key: String,
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCount {
    /// "YYYY-MM-DD"
    pub day: String,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_inclusive_range() {
        let filter = ReportFilter {
            date_from: Some("2025-02-01".into()),
            date_to: Some("2025-02-28".into()),
            ..Default::default()
        };
        let last_evening = Utc.with_ymd_and_hms(2025, 2, 28, 23, 59, 0).unwrap();
        let next_day = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        assert!(filter.contains(last_evening).unwrap());
        assert!(!filter.contains(next_day).unwrap());
    }

    #[test]
    fn test_open_range_and_blank_dates() {
        let filter = ReportFilter {
            date_from: Some(" ".into()),
            ..Default::default()
        };
        assert_eq!(filter.date_range().unwrap(), (None, None));
        assert!(filter.contains(Utc::now()).unwrap());
    }

    #[test]
    fn test_bad_dates() {
        let filter = ReportFilter {
            date_from: Some("2025-13-01".into()),
            ..Default::default()
        };
        assert!(filter.date_range().is_err());

        let reversed = ReportFilter {
            date_from: Some("2025-03-01".into()),
            date_to: Some("2025-02-01".into()),
            ..Default::default()
        };
        assert!(reversed.date_range().is_err());
    }
}
