use contracts::dashboards::common::{DayCount, GroupCount, ReportFilter};
use contracts::dashboards::d400_inquiry_summary::dto::InquirySummaryReport;
use contracts::domain::a003_inquiry::aggregate::Inquiry;
use contracts::domain::a003_inquiry::list::StatusCounts;
use contracts::domain::a007_trainer_task::board::UNASSIGNED_TITLE;
use std::collections::{BTreeMap, HashMap};

use crate::dashboards::common::ReportData;
use crate::shared::error::ServiceResult;

pub async fn get_inquiry_summary(filter: &ReportFilter) -> ServiceResult<InquirySummaryReport> {
    let data = ReportData::load(filter).await?;
    let inquiries = data.filtered_inquiries(filter)?;
    Ok(summarize(&inquiries, &data.categories, &data.users))
}

/// Группы по убыванию количества, при равенстве по наименованию
fn sorted_groups(counts: HashMap<String, usize>, name: impl Fn(&str) -> String) -> Vec<GroupCount> {
    let mut groups: Vec<GroupCount> = counts
        .into_iter()
        .map(|(key, count)| GroupCount {
            name: name(&key),
            key,
            count,
        })
        .collect();
    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    groups
}

pub fn summarize(
    inquiries: &[&Inquiry],
    categories: &HashMap<String, String>,
    users: &HashMap<String, String>,
) -> InquirySummaryReport {
    let mut by_category: HashMap<String, usize> = HashMap::new();
    let mut by_trainer: HashMap<String, usize> = HashMap::new();
    let mut by_day: BTreeMap<String, usize> = BTreeMap::new();

    for inquiry in inquiries {
        *by_category
            .entry(inquiry.category_id.value().to_string())
            .or_default() += 1;
        *by_trainer
            .entry(inquiry.trainer_id.clone().unwrap_or_default())
            .or_default() += 1;
        *by_day
            .entry(inquiry.base.metadata.created_at.format("%Y-%m-%d").to_string())
            .or_default() += 1;
    }

    let lookup = |map: &HashMap<String, String>, key: &str| {
        map.get(key).cloned().unwrap_or_else(|| key.to_string())
    };

    InquirySummaryReport {
        total: inquiries.len(),
        by_status: StatusCounts::from_statuses(inquiries.iter().map(|i| i.status)),
        by_category: sorted_groups(by_category, |k| lookup(categories, k)),
        by_trainer: sorted_groups(by_trainer, |k| {
            if k.is_empty() {
                UNASSIGNED_TITLE.to_string()
            } else {
                lookup(users, k)
            }
        }),
        by_day: by_day
            .into_iter()
            .map(|(day, count)| DayCount { day, count })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::common::test_support::inquiry;
    use contracts::domain::a002_category::aggregate::CategoryId;
    use contracts::domain::a003_inquiry::status::InquiryStatus;

    #[test]
    fn test_summary_groups() {
        let gym = CategoryId::new_v4();
        let food = CategoryId::new_v4();
        let items = vec![
            inquiry(gym, Some("t1"), InquiryStatus::Opened, 2),
            inquiry(gym, Some("t1"), InquiryStatus::Closed, 2),
            inquiry(food, None, InquiryStatus::Pending, 1),
        ];
        let refs: Vec<&Inquiry> = items.iter().collect();

        let categories: HashMap<String, String> = [
            (gym.value().to_string(), "Зал".to_string()),
            (food.value().to_string(), "Питание".to_string()),
        ]
        .into_iter()
        .collect();
        let users: HashMap<String, String> =
            [("t1".to_string(), "Пётр".to_string())].into_iter().collect();

        let report = summarize(&refs, &categories, &users);
        assert_eq!(report.total, 3);
        assert_eq!(report.by_status.closed, 1);
        assert_eq!(report.by_category[0].name, "Зал");
        assert_eq!(report.by_category[0].count, 2);
        assert_eq!(report.by_trainer[1].key, "");
        assert_eq!(report.by_trainer[1].name, UNASSIGNED_TITLE);
        assert_eq!(
            report.by_day,
            vec![
                DayCount { day: "2025-03-01".into(), count: 1 },
                DayCount { day: "2025-03-02".into(), count: 2 },
            ]
        );
    }

    #[test]
    fn test_empty_summary() {
        let report = summarize(&[], &HashMap::new(), &HashMap::new());
        assert_eq!(report, InquirySummaryReport::default());
    }
}
