//! CSV-выгрузка списка обращений. Разделитель `;` и BOM, чтобы Excel
//! правильно открывал кириллицу.

use contracts::dashboards::common::ReportFilter;
use contracts::domain::a003_inquiry::aggregate::Inquiry;
use contracts::domain::a005_rating::aggregate::Rating;
use std::collections::HashMap;

use crate::dashboards::common::ReportData;
use crate::shared::error::ServiceResult;

pub const HEADERS: [&str; 9] = [
    "code",
    "title",
    "status",
    "category",
    "author",
    "trainer",
    "created_at",
    "closed_at",
    "rating",
];

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

pub async fn export_inquiries(filter: &ReportFilter) -> ServiceResult<String> {
    let data = ReportData::load(filter).await?;
    let mut inquiries = data.filtered_inquiries(filter)?;
    inquiries.sort_by(|a, b| a.base.metadata.created_at.cmp(&b.base.metadata.created_at));
    Ok(inquiries_to_csv(
        &inquiries,
        &data.categories,
        &data.users,
        &data.ratings,
    )?)
}

pub fn inquiries_to_csv(
    inquiries: &[&Inquiry],
    categories: &HashMap<String, String>,
    users: &HashMap<String, String>,
    ratings: &HashMap<String, Rating>,
) -> anyhow::Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new());
    writer.write_record(HEADERS)?;

    let name = |map: &HashMap<String, String>, key: &str| {
        map.get(key).cloned().unwrap_or_else(|| key.to_string())
    };

    for inquiry in inquiries {
        let id = inquiry.to_string_id();
        writer.write_record([
            inquiry.base.code.clone(),
            inquiry.title().to_string(),
            inquiry.status.as_str().to_string(),
            name(categories, &inquiry.category_id.value().to_string()),
            name(users, &inquiry.author_id),
            inquiry
                .trainer_id
                .as_deref()
                .map(|t| name(users, t))
                .unwrap_or_default(),
            inquiry.base.metadata.created_at.format(DATE_FORMAT).to_string(),
            inquiry
                .closed_at
                .map(|at| at.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            ratings
                .get(&id)
                .map(|r| r.score.to_string())
                .unwrap_or_default(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!("{}", e))?;
    let mut content = String::from('\u{FEFF}');
    content.push_str(&String::from_utf8(bytes)?);
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::common::test_support::inquiry;
    use contracts::domain::a002_category::aggregate::CategoryId;
    use contracts::domain::a003_inquiry::status::InquiryStatus;

    #[test]
    fn test_csv_layout() {
        let cat = CategoryId::new_v4();
        let mut closed = inquiry(cat, Some("t1"), InquiryStatus::Closed, 5);
        closed.base.description = "Колено; снова".into();
        let open = inquiry(cat, None, InquiryStatus::Opened, 6);

        let categories: HashMap<String, String> =
            [(cat.value().to_string(), "Зал".to_string())].into_iter().collect();
        let users: HashMap<String, String> = [
            ("u1".to_string(), "Иван".to_string()),
            ("t1".to_string(), "Пётр".to_string()),
        ]
        .into_iter()
        .collect();
        let dto = contracts::domain::a005_rating::aggregate::RateInquiryDto {
            score: 5,
            comment: None,
        };
        let ratings: HashMap<String, Rating> = [(
            closed.to_string_id(),
            Rating::new(closed.base.id, "u1".into(), &dto).unwrap(),
        )]
        .into_iter()
        .collect();

        let csv = inquiries_to_csv(&[&closed, &open], &categories, &users, &ratings).unwrap();
        let lines: Vec<&str> = csv.trim_start_matches('\u{FEFF}').lines().collect();

        assert!(csv.starts_with('\u{FEFF}'));
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADERS.join(";"));
        assert_eq!(
            lines[1],
            format!(
                "{};\"Колено; снова\";closed;Зал;Иван;Пётр;2025-03-05 10:00;2025-03-05 15:00;5",
                closed.base.code
            )
        );
        assert_eq!(
            lines[2],
            format!("{};Тема;opened;Зал;Иван;;2025-03-06 10:00;;", open.base.code)
        );
    }
}
