//! Строки списка обращений: имена, поиск, сортировка, счётчики вкладок.

use contracts::domain::a003_inquiry::aggregate::Inquiry;
use contracts::domain::a003_inquiry::list::{
    InquiryListItem, InquiryListQuery, InquiryListResponse, InquirySortField, StatusCounts,
};
use contracts::shared::pagination::PageResponse;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Справочники id -> имя для подстановки в строки
#[derive(Debug, Default)]
pub struct NameLookup {
    pub users: HashMap<String, String>,
    pub categories: HashMap<String, String>,
}

impl NameLookup {
    pub fn user(&self, id: &str) -> String {
        self.users.get(id).cloned().unwrap_or_else(|| id.to_string())
    }

    pub fn category(&self, id: &str) -> String {
        self.categories
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }
}

pub fn to_list_item(inquiry: &Inquiry, names: &NameLookup) -> InquiryListItem {
    let category_id = inquiry.category_id.value().to_string();
    InquiryListItem {
        id: inquiry.to_string_id(),
        code: inquiry.base.code.clone(),
        title: inquiry.title().to_string(),
        status: inquiry.status,
        category_name: names.category(&category_id),
        category_id,
        author_id: inquiry.author_id.clone(),
        author_name: names.user(&inquiry.author_id),
        trainer_id: inquiry.trainer_id.clone(),
        trainer_name: inquiry.trainer_id.as_deref().map(|t| names.user(t)),
        reopen_count: inquiry.reopen_count,
        created_at: inquiry.base.metadata.created_at,
        last_activity_at: inquiry.last_activity_at,
        closed_at: inquiry.closed_at,
    }
}

fn matches_search(item: &InquiryListItem, term: &str) -> bool {
    [
        item.code.as_str(),
        item.title.as_str(),
        item.author_name.as_str(),
        item.category_name.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(term))
}

fn compare(a: &InquiryListItem, b: &InquiryListItem, field: InquirySortField) -> Ordering {
    match field {
        InquirySortField::Code => a.code.cmp(&b.code),
        InquirySortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        InquirySortField::Status => a.status.as_str().cmp(b.status.as_str()),
        InquirySortField::CreatedAt => a.created_at.cmp(&b.created_at),
        InquirySortField::LastActivityAt => a.last_activity_at.cmp(&b.last_activity_at),
    }
}

/// Поиск -> счётчики (без фильтра по статусу) -> статус -> сортировка -> страница
pub fn build_list_response(
    items: Vec<InquiryListItem>,
    query: &InquiryListQuery,
) -> InquiryListResponse {
    let mut items: Vec<InquiryListItem> = match query.search_term() {
        Some(term) => items
            .into_iter()
            .filter(|i| matches_search(i, &term))
            .collect(),
        None => items,
    };

    let status_counts = StatusCounts::from_statuses(items.iter().map(|i| i.status));

    if let Some(status) = query.status {
        items.retain(|i| i.status == status);
    }

    items.sort_by(|a, b| {
        let ord = compare(a, b, query.sort_field).then_with(|| a.code.cmp(&b.code));
        if query.sort_ascending {
            ord
        } else {
            ord.reverse()
        }
    });

    InquiryListResponse {
        page: PageResponse::paginate(items, query.page, query.page_size),
        status_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use contracts::domain::a003_inquiry::status::InquiryStatus;

    fn item(code: &str, title: &str, status: InquiryStatus, day: u32) -> InquiryListItem {
        let at = Utc.with_ymd_and_hms(2024, 3, day, 10, 0, 0).unwrap();
        InquiryListItem {
            id: code.to_lowercase(),
            code: code.into(),
            title: title.into(),
            status,
            category_id: "c1".into(),
            category_name: "Питание".into(),
            author_id: "u1".into(),
            author_name: "Иван".into(),
            trainer_id: None,
            trainer_name: None,
            reopen_count: 0,
            created_at: at,
            last_activity_at: at,
            closed_at: None,
        }
    }

    fn sample() -> Vec<InquiryListItem> {
        vec![
            item("INQ-1", "Растяжка", InquiryStatus::Opened, 1),
            item("INQ-2", "Боль в колене", InquiryStatus::Closed, 3),
            item("INQ-3", "План на неделю", InquiryStatus::Opened, 2),
            item("INQ-4", "Колено снова", InquiryStatus::Reopened, 4),
        ]
    }

    #[test]
    fn test_counts_ignore_status_filter() {
        let query = InquiryListQuery {
            status: Some(InquiryStatus::Opened),
            ..Default::default()
        };
        let response = build_list_response(sample(), &query);
        assert_eq!(response.page.total_count, 2);
        assert_eq!(response.status_counts.total(), 4);
        assert_eq!(response.status_counts.closed, 1);
    }

    #[test]
    fn test_search_narrows_counts() {
        let query = InquiryListQuery {
            search: Some("  КОЛЕН ".into()),
            ..Default::default()
        };
        let response = build_list_response(sample(), &query);
        assert_eq!(response.page.total_count, 2);
        assert_eq!(response.status_counts.opened, 0);
        assert_eq!(response.status_counts.reopened, 1);
    }

    #[test]
    fn test_default_sort_newest_activity_first() {
        let response = build_list_response(sample(), &InquiryListQuery::default());
        let codes: Vec<_> = response.page.items.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, vec!["INQ-4", "INQ-2", "INQ-3", "INQ-1"]);
    }

    #[test]
    fn test_sort_by_title_ascending() {
        let query = InquiryListQuery {
            sort_field: InquirySortField::Title,
            sort_ascending: true,
            ..Default::default()
        };
        let response = build_list_response(sample(), &query);
        assert_eq!(response.page.items[0].code, "INQ-2");
        assert_eq!(response.page.items[3].code, "INQ-1");
    }

    #[test]
    fn test_pagination() {
        let query = InquiryListQuery {
            page: 1,
            page_size: 3,
            ..Default::default()
        };
        let response = build_list_response(sample(), &query);
        assert_eq!(response.page.total_pages, 2);
        assert_eq!(response.page.items.len(), 1);
        assert_eq!(response.page.items[0].code, "INQ-1");
    }

    #[test]
    fn test_name_lookup_falls_back_to_id() {
        let mut names = NameLookup::default();
        names.users.insert("u1".into(), "Иван".into());
        assert_eq!(names.user("u1"), "Иван");
        assert_eq!(names.user("u2"), "u2");
    }
}
