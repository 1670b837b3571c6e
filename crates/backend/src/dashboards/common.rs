//! Данные для отчётов: выборка один раз, фильтрация и агрегация в памяти.

use contracts::dashboards::common::ReportFilter;
use contracts::domain::a003_inquiry::aggregate::Inquiry;
use contracts::domain::a004_follow_up::aggregate::FollowUp;
use contracts::domain::a005_rating::aggregate::Rating;
use std::collections::HashMap;

use crate::domain::a003_inquiry::repository::{self as inquiry_repository, InquiryFilter};
use crate::domain::{a001_section, a002_category, a004_follow_up, a005_rating};
use crate::shared::error::{ServiceError, ServiceResult};
use crate::system::users::service as users_service;

pub struct ReportData {
    pub inquiries: Vec<Inquiry>,
    pub follow_ups: Vec<FollowUp>,
    /// inquiry_id -> оценка
    pub ratings: HashMap<String, Rating>,
    pub users: HashMap<String, String>,
    pub categories: HashMap<String, String>,
    pub sections: HashMap<String, String>,
}

impl ReportData {
    pub async fn load(filter: &ReportFilter) -> ServiceResult<Self> {
        filter.date_range().map_err(ServiceError::Validation)?;

        let inquiries = inquiry_repository::list_filtered(&storage_filter(filter)).await?;
        let ratings = a005_rating::repository::list_all()
            .await?
            .into_iter()
            .map(|r| (r.inquiry_id.value().to_string(), r))
            .collect();

        Ok(Self {
            inquiries,
            follow_ups: a004_follow_up::repository::list_all().await?,
            ratings,
            users: users_service::display_names().await?,
            categories: a002_category::service::names().await?,
            sections: a001_section::service::names().await?,
        })
    }

    pub fn user_name(&self, id: &str) -> String {
        self.users.get(id).cloned().unwrap_or_else(|| id.to_string())
    }

    pub fn inquiry(&self, id: &str) -> Option<&Inquiry> {
        self.inquiries.iter().find(|i| i.to_string_id() == id)
    }

    /// Обращения под фильтр (период по дате создания)
    pub fn filtered_inquiries(&self, filter: &ReportFilter) -> ServiceResult<Vec<&Inquiry>> {
        let mut result = Vec::new();
        for inquiry in &self.inquiries {
            if inquiry_matches(inquiry, &self.follow_ups, filter).map_err(ServiceError::Validation)? {
                result.push(inquiry);
            }
        }
        Ok(result)
    }
}

fn blank_to_none(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Часть фильтра отчёта, которую выполняет SQLite
fn storage_filter(filter: &ReportFilter) -> InquiryFilter {
    InquiryFilter {
        category_id: blank_to_none(&filter.category_id).map(str::to_string),
        ..Default::default()
    }
}

pub fn inquiry_matches(
    inquiry: &Inquiry,
    follow_ups: &[FollowUp],
    filter: &ReportFilter,
) -> Result<bool, String> {
    if !filter.contains(inquiry.base.metadata.created_at)? {
        return Ok(false);
    }
    if let Some(category_id) = blank_to_none(&filter.category_id) {
        if inquiry.category_id.value().to_string() != category_id {
            return Ok(false);
        }
    }
    if let Some(trainer_id) = blank_to_none(&filter.trainer_id) {
        if inquiry.trainer_id.as_deref() != Some(trainer_id) {
            return Ok(false);
        }
    }
    if let Some(status) = filter.status {
        if inquiry.status != status {
            return Ok(false);
        }
    }
    if let Some(section_id) = blank_to_none(&filter.section_id) {
        let routed = follow_ups.iter().any(|f| {
            f.inquiry_id == inquiry.base.id && f.section_id.value().to_string() == section_id
        });
        if !routed {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Запрос в отдел под фильтр: период по дате запроса, отдел напрямую,
/// категория и тренер через обращение
pub fn follow_up_matches(
    follow_up: &FollowUp,
    inquiry: Option<&Inquiry>,
    filter: &ReportFilter,
) -> Result<bool, String> {
    if !filter.contains(follow_up.created_at)? {
        return Ok(false);
    }
    if let Some(section_id) = blank_to_none(&filter.section_id) {
        if follow_up.section_id.value().to_string() != section_id {
            return Ok(false);
        }
    }
    let needs_inquiry = blank_to_none(&filter.category_id).is_some()
        || blank_to_none(&filter.trainer_id).is_some()
        || filter.status.is_some();
    if !needs_inquiry {
        return Ok(true);
    }
    let Some(inquiry) = inquiry else {
        return Ok(false);
    };
    if let Some(category_id) = blank_to_none(&filter.category_id) {
        if inquiry.category_id.value().to_string() != category_id {
            return Ok(false);
        }
    }
    if let Some(trainer_id) = blank_to_none(&filter.trainer_id) {
        if inquiry.trainer_id.as_deref() != Some(trainer_id) {
            return Ok(false);
        }
    }
    if let Some(status) = filter.status {
        if inquiry.status != status {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{TimeZone, Utc};
    use contracts::domain::a002_category::aggregate::CategoryId;
    use contracts::domain::a003_inquiry::aggregate::Inquiry;
    use contracts::domain::a003_inquiry::status::InquiryStatus;

    /// Обращение, созданное `day` марта 2025 в 10:00 UTC
    pub fn inquiry(
        category: CategoryId,
        trainer: Option<&str>,
        status: InquiryStatus,
        day: u32,
    ) -> Inquiry {
        let created = Utc.with_ymd_and_hms(2025, 3, day, 10, 0, 0).unwrap();
        let mut i = Inquiry::new_for_insert("u1".into(), category, "Тема".into(), "Текст".into());
        i.base.metadata.created_at = created;
        i.last_activity_at = created;
        i.trainer_id = trainer.map(str::to_string);
        i.status = status;
        if status == InquiryStatus::Closed {
            i.closed_at = Some(created + chrono::Duration::hours(5));
        }
        i
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::inquiry;
    use super::*;
    use contracts::domain::a001_section::aggregate::SectionId;
    use contracts::domain::a002_category::aggregate::CategoryId;
    use contracts::domain::a003_inquiry::status::InquiryStatus;

    #[test]
    fn test_storage_filter_ignores_blank_category() {
        let blank = ReportFilter {
            category_id: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(storage_filter(&blank).category_id, None);

        let set = ReportFilter {
            category_id: Some(" c1 ".into()),
            ..Default::default()
        };
        assert_eq!(storage_filter(&set).category_id.as_deref(), Some("c1"));
    }

    #[test]
    fn test_inquiry_filter() {
        let cat = CategoryId::new_v4();
        let item = inquiry(cat, Some("t1"), InquiryStatus::Opened, 10);

        let by_period = ReportFilter {
            date_from: Some("2025-03-10".into()),
            date_to: Some("2025-03-10".into()),
            ..Default::default()
        };
        assert!(inquiry_matches(&item, &[], &by_period).unwrap());

        let other_trainer = ReportFilter {
            trainer_id: Some("t2".into()),
            ..Default::default()
        };
        assert!(!inquiry_matches(&item, &[], &other_trainer).unwrap());

        let closed_only = ReportFilter {
            status: Some(InquiryStatus::Closed),
            ..Default::default()
        };
        assert!(!inquiry_matches(&item, &[], &closed_only).unwrap());

        let bad_date = ReportFilter {
            date_from: Some("10.03.2025".into()),
            ..Default::default()
        };
        assert!(inquiry_matches(&item, &[], &bad_date).is_err());
    }

    #[test]
    fn test_section_filter_uses_follow_ups() {
        let item = inquiry(CategoryId::new_v4(), None, InquiryStatus::Pending, 3);
        let section = SectionId::new_v4();
        let follow_up = FollowUp::new(item.base.id, section, "t1".into(), "?".into()).unwrap();
        let filter = ReportFilter {
            section_id: Some(section.value().to_string()),
            ..Default::default()
        };
        assert!(inquiry_matches(&item, &[follow_up.clone()], &filter).unwrap());
        assert!(!inquiry_matches(&item, &[], &filter).unwrap());

        let by_category = ReportFilter {
            category_id: Some(CategoryId::new_v4().value().to_string()),
            ..Default::default()
        };
        assert!(follow_up_matches(&follow_up, Some(&item), &ReportFilter::default()).unwrap());
        assert!(!follow_up_matches(&follow_up, Some(&item), &by_category).unwrap());
        assert!(!follow_up_matches(&follow_up, None, &by_category).unwrap());
    }
}
