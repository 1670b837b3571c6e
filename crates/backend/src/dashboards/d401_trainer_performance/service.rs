use contracts::dashboards::common::ReportFilter;
use contracts::dashboards::d401_trainer_performance::dto::{
    TrainerPerformanceReport, TrainerPerformanceRow,
};
use contracts::domain::a003_inquiry::aggregate::Inquiry;
use contracts::domain::a003_inquiry::status::InquiryStatus;
use contracts::domain::a005_rating::aggregate::{average_score, Rating};
use std::collections::{BTreeMap, HashMap};

use crate::dashboards::common::ReportData;
use crate::shared::error::ServiceResult;
use crate::shared::format::mean;

pub async fn get_trainer_performance(
    filter: &ReportFilter,
) -> ServiceResult<TrainerPerformanceReport> {
    let data = ReportData::load(filter).await?;
    let inquiries = data.filtered_inquiries(filter)?;
    Ok(TrainerPerformanceReport {
        rows: trainer_performance(&inquiries, &data.ratings, &data.users),
    })
}

/// Строки по тренерам, у которых есть обращения в выборке.
/// Обращения без тренера в отчёт не попадают.
pub fn trainer_performance(
    inquiries: &[&Inquiry],
    ratings: &HashMap<String, Rating>,
    users: &HashMap<String, String>,
) -> Vec<TrainerPerformanceRow> {
    let mut by_trainer: BTreeMap<&str, Vec<&Inquiry>> = BTreeMap::new();
    for inquiry in inquiries.iter().copied() {
        if let Some(trainer_id) = inquiry.trainer_id.as_deref() {
            by_trainer.entry(trainer_id).or_default().push(inquiry);
        }
    }

    let mut rows: Vec<TrainerPerformanceRow> = by_trainer
        .into_iter()
        .map(|(trainer_id, items)| {
            let scores: Vec<i32> = items
                .iter()
                .filter_map(|i| ratings.get(&i.to_string_id()).map(|r| r.score))
                .collect();
            let close_hours: Vec<f64> = items
                .iter()
                .filter(|i| i.status == InquiryStatus::Closed)
                .filter_map(|i| {
                    i.closed_at.map(|at| {
                        (at - i.base.metadata.created_at).num_seconds() as f64 / 3600.0
                    })
                })
                .collect();

            TrainerPerformanceRow {
                trainer_id: trainer_id.to_string(),
                trainer_name: users
                    .get(trainer_id)
                    .cloned()
                    .unwrap_or_else(|| trainer_id.to_string()),
                assigned: items.len(),
                closed: items
                    .iter()
                    .filter(|i| i.status == InquiryStatus::Closed)
                    .count(),
                reopened: items.iter().filter(|i| i.reopen_count > 0).count(),
                avg_rating: average_score(&scores),
                ratings_count: scores.len(),
                avg_close_hours: mean(&close_hours),
            }
        })
        .collect();

    rows.sort_by(|a, b| a.trainer_name.cmp(&b.trainer_name));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::common::test_support::inquiry;
    use contracts::domain::a002_category::aggregate::CategoryId;
    use contracts::domain::a005_rating::aggregate::RateInquiryDto;

    fn rating(inquiry: &Inquiry, score: i32) -> (String, Rating) {
        let dto = RateInquiryDto {
            score,
            comment: None,
        };
        (
            inquiry.to_string_id(),
            Rating::new(inquiry.base.id, "u1".into(), &dto).unwrap(),
        )
    }

    #[test]
    fn test_trainer_rows() {
        let cat = CategoryId::new_v4();
        let mut reopened = inquiry(cat, Some("t1"), InquiryStatus::Pending, 4);
        reopened.reopen_count = 1;
        let items = vec![
            inquiry(cat, Some("t1"), InquiryStatus::Closed, 1),
            inquiry(cat, Some("t1"), InquiryStatus::Closed, 2),
            reopened,
            inquiry(cat, Some("t2"), InquiryStatus::Opened, 3),
            inquiry(cat, None, InquiryStatus::Opened, 3),
        ];
        let refs: Vec<&Inquiry> = items.iter().collect();
        let ratings: HashMap<String, Rating> =
            [rating(&items[0], 5), rating(&items[1], 4)].into_iter().collect();
        let users: HashMap<String, String> = [
            ("t1".to_string(), "Анна".to_string()),
            ("t2".to_string(), "Борис".to_string()),
        ]
        .into_iter()
        .collect();

        let rows = trainer_performance(&refs, &ratings, &users);
        assert_eq!(rows.len(), 2);

        let anna = &rows[0];
        assert_eq!(anna.trainer_name, "Анна");
        assert_eq!(anna.assigned, 3);
        assert_eq!(anna.closed, 2);
        assert_eq!(anna.reopened, 1);
        assert_eq!(anna.ratings_count, 2);
        assert_eq!(anna.avg_rating, Some(4.5));
        assert_eq!(anna.avg_close_hours, Some(5.0));

        let boris = &rows[1];
        assert_eq!(boris.assigned, 1);
        assert_eq!(boris.avg_rating, None);
        assert_eq!(boris.avg_close_hours, None);
    }
}
