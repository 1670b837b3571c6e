use contracts::dashboards::common::ReportFilter;
use contracts::dashboards::d402_section_follow_ups::dto::{SectionFollowUpReport, SectionFollowUpRow};
use contracts::domain::a004_follow_up::aggregate::FollowUp;
use std::collections::{BTreeMap, HashMap};

use crate::dashboards::common::{follow_up_matches, ReportData};
use crate::shared::error::{ServiceError, ServiceResult};
use crate::shared::format::mean;

pub async fn get_section_follow_ups(filter: &ReportFilter) -> ServiceResult<SectionFollowUpReport> {
    let data = ReportData::load(filter).await?;

    let mut selected = Vec::new();
    for follow_up in &data.follow_ups {
        let inquiry = data.inquiry(&follow_up.inquiry_id.value().to_string());
        if follow_up_matches(follow_up, inquiry, filter).map_err(ServiceError::Validation)? {
            selected.push(follow_up);
        }
    }

    Ok(SectionFollowUpReport {
        rows: section_follow_ups(&selected, &data.sections),
    })
}

pub fn section_follow_ups(
    follow_ups: &[&FollowUp],
    sections: &HashMap<String, String>,
) -> Vec<SectionFollowUpRow> {
    let mut by_section: BTreeMap<String, Vec<&FollowUp>> = BTreeMap::new();
    for follow_up in follow_ups.iter().copied() {
        by_section
            .entry(follow_up.section_id.value().to_string())
            .or_default()
            .push(follow_up);
    }

    let mut rows: Vec<SectionFollowUpRow> = by_section
        .into_iter()
        .map(|(section_id, items)| {
            let answer_hours: Vec<f64> = items.iter().filter_map(|f| f.answer_hours()).collect();
            let pending = items.iter().filter(|f| f.is_pending()).count();
            SectionFollowUpRow {
                section_name: sections
                    .get(&section_id)
                    .cloned()
                    .unwrap_or_else(|| section_id.clone()),
                section_id,
                requested: items.len(),
                answered: items.len() - pending,
                pending,
                avg_answer_hours: mean(&answer_hours),
            }
        })
        .collect();

    rows.sort_by(|a, b| a.section_name.cmp(&b.section_name));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_section::aggregate::SectionId;
    use contracts::domain::a003_inquiry::aggregate::InquiryId;

    fn follow_up(section: SectionId, answered_after_hours: Option<i64>) -> FollowUp {
        let mut f = FollowUp::new(InquiryId::new_v4(), section, "t1".into(), "?".into()).unwrap();
        if let Some(hours) = answered_after_hours {
            let at = f.created_at + chrono::Duration::hours(hours);
            f.answer("a1", "ok", at).unwrap();
        }
        f
    }

    #[test]
    fn test_rows_per_section() {
        let med = SectionId::new_v4();
        let law = SectionId::new_v4();
        let items = vec![
            follow_up(med, Some(2)),
            follow_up(med, Some(4)),
            follow_up(med, None),
            follow_up(law, None),
        ];
        let refs: Vec<&FollowUp> = items.iter().collect();
        let sections: HashMap<String, String> = [
            (med.value().to_string(), "Медицина".to_string()),
            (law.value().to_string(), "Юристы".to_string()),
        ]
        .into_iter()
        .collect();

        let rows = section_follow_ups(&refs, &sections);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].section_name, "Медицина");
        assert_eq!(rows[0].requested, 3);
        assert_eq!(rows[0].answered, 2);
        assert_eq!(rows[0].pending, 1);
        assert_eq!(rows[0].avg_answer_hours, Some(3.0));
        assert_eq!(rows[1].avg_answer_hours, None);
    }
}
