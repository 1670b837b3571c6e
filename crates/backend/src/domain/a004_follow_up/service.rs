use super::repository;
use chrono::Utc;
use contracts::domain::a001_section::aggregate::SectionId;
use contracts::domain::a003_inquiry::aggregate::Inquiry;
use contracts::domain::a003_inquiry::status::{is_permitted, InquiryAction};
use contracts::domain::a004_follow_up::aggregate::{
    AnswerFollowUpDto, CreateFollowUpDto, FollowUp, FollowUpListQuery, FollowUpView,
};
use contracts::domain::a006_notification::aggregate::NotificationKind;
use contracts::system::auth::TokenClaims;
use contracts::system::users::Role;
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::a003_inquiry::repository::{self as inquiry_repository, InquiryFilter};
use crate::domain::{a001_section, a003_inquiry, a006_notification};
use crate::shared::error::{parse_uuid, ServiceError, ServiceResult};
use crate::system::auth::extractor::ensure_role;
use crate::system::users::{repository as users_repository, service as users_service};

/// Подстановка имён. Обращения, которых нет в `inquiries`, дают пустые код и тему.
pub fn to_views(
    follow_ups: Vec<FollowUp>,
    users: &HashMap<String, String>,
    sections: &HashMap<String, String>,
    inquiries: &[&Inquiry],
) -> Vec<FollowUpView> {
    let user_name = |id: &str| users.get(id).cloned().unwrap_or_else(|| id.to_string());
    follow_ups
        .into_iter()
        .map(|follow_up| {
            let section_id = follow_up.section_id.value().to_string();
            let inquiry = inquiries
                .iter()
                .find(|i| i.base.id == follow_up.inquiry_id);
            FollowUpView {
                section_name: sections.get(&section_id).cloned().unwrap_or(section_id),
                author_name: user_name(&follow_up.author_id),
                answered_by_name: follow_up.answered_by.as_deref().map(user_name),
                inquiry_code: inquiry.map(|i| i.base.code.clone()).unwrap_or_default(),
                inquiry_title: inquiry.map(|i| i.title().to_string()).unwrap_or_default(),
                follow_up,
            }
        })
        .collect()
}

pub async fn build_views(
    follow_ups: Vec<FollowUp>,
    inquiries: &[&Inquiry],
) -> anyhow::Result<Vec<FollowUpView>> {
    let users = users_service::display_names().await?;
    let sections = a001_section::service::names().await?;
    Ok(to_views(follow_ups, &users, &sections, inquiries))
}

/// Маршрутизация обращения в отдел (действие Route)
pub async fn create(
    inquiry_id: Uuid,
    dto: CreateFollowUpDto,
    claims: &TokenClaims,
) -> ServiceResult<FollowUpView> {
    ensure_role(claims, &[Role::Trainer, Role::Admin])?;

    let (mut inquiry, _, actor) = a003_inquiry::service::get_visible(inquiry_id, claims).await?;
    if !is_permitted(InquiryAction::Route, &actor) {
        return Err(ServiceError::forbidden());
    }

    let section_uuid = parse_uuid(&dto.section_id)
        .map_err(|_| ServiceError::Validation("Не выбран отдел".into()))?;
    let section = a001_section::service::get_existing(section_uuid).await?;
    if !section.is_active {
        return Err(ServiceError::Validation(format!(
            "Отдел «{}» неактивен",
            section.base.description
        )));
    }

    let follow_up = FollowUp::new(
        inquiry.base.id,
        SectionId(section_uuid),
        claims.sub.clone(),
        dto.body,
    )
    .map_err(ServiceError::Validation)?;

    if claims.role == Role::Trainer && inquiry.trainer_id.is_none() {
        inquiry.assign_trainer(Some(claims.sub.clone()));
    }
    inquiry.apply_action(InquiryAction::Route, follow_up.created_at)?;
    inquiry.before_write();
    inquiry_repository::update(&inquiry).await?;
    repository::insert(&follow_up).await?;

    tracing::info!(
        "Inquiry {} routed to section {} by {}",
        inquiry.base.code,
        section.base.description,
        claims.username
    );

    let assistants: Vec<String> =
        users_repository::list_assistants_of_section(&section_uuid.to_string())
            .await?
            .into_iter()
            .filter(|u| u.is_active)
            .map(|u| u.id)
            .collect();
    let recipients =
        a006_notification::service::recipients(assistants.iter().map(String::as_str), &claims.sub);
    a006_notification::service::notify(
        &recipients,
        NotificationKind::FollowUpRequested,
        &a003_inquiry::service::notification_body(&inquiry),
        Some(&inquiry.to_string_id()),
    )
    .await;

    let mut views = build_views(vec![follow_up], &[&inquiry]).await?;
    views
        .pop()
        .ok_or_else(|| ServiceError::not_found("Запрос в отдел"))
}

/// Ответ отдела. Статус обращения не меняется, решение за тренером.
pub async fn answer(
    id: Uuid,
    dto: AnswerFollowUpDto,
    claims: &TokenClaims,
) -> ServiceResult<FollowUpView> {
    ensure_role(claims, &[Role::Assistant, Role::Admin])?;

    let mut follow_up = repository::get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Запрос в отдел"))?;

    if claims.role == Role::Assistant {
        let section_id = a003_inquiry::service::assistant_section(claims).await?;
        if follow_up.section_id.value().to_string() != section_id {
            return Err(ServiceError::forbidden());
        }
    }

    let now = Utc::now();
    follow_up
        .answer(&claims.sub, &dto.answer, now)
        .map_err(ServiceError::Validation)?;
    repository::update(&follow_up).await?;

    let mut inquiry = a003_inquiry::service::get_existing(follow_up.inquiry_id.value()).await?;
    a003_inquiry::service::touch_activity(&mut inquiry).await?;

    tracing::info!(
        "Follow-up for inquiry {} answered by {}",
        inquiry.base.code,
        claims.username
    );

    let recipients = a006_notification::service::recipients(
        [
            inquiry.trainer_id.as_deref().unwrap_or(follow_up.author_id.as_str()),
        ],
        &claims.sub,
    );
    a006_notification::service::notify(
        &recipients,
        NotificationKind::FollowUpAnswered,
        &a003_inquiry::service::notification_body(&inquiry),
        Some(&inquiry.to_string_id()),
    )
    .await;

    let mut views = build_views(vec![follow_up], &[&inquiry]).await?;
    views
        .pop()
        .ok_or_else(|| ServiceError::not_found("Запрос в отдел"))
}

pub async fn list_by_inquiry(
    inquiry_id: Uuid,
    claims: &TokenClaims,
) -> ServiceResult<Vec<FollowUpView>> {
    let (inquiry, follow_ups, _) = a003_inquiry::service::get_visible(inquiry_id, claims).await?;
    Ok(build_views(follow_ups, &[&inquiry]).await?)
}

/// Входящие отдела. Ассистент видит только свой отдел.
pub async fn list_for_section(
    query: &FollowUpListQuery,
    claims: &TokenClaims,
) -> ServiceResult<Vec<FollowUpView>> {
    ensure_role(claims, &[Role::Assistant, Role::Admin])?;

    let section_id = match claims.role {
        Role::Assistant => Some(a003_inquiry::service::assistant_section(claims).await?),
        _ => query
            .section_id
            .clone()
            .filter(|s| !s.trim().is_empty()),
    };

    let follow_ups = repository::list_filtered(section_id.as_deref(), query.status).await?;

    let mut ids: Vec<String> = follow_ups
        .iter()
        .map(|f| f.inquiry_id.value().to_string())
        .collect();
    ids.sort();
    ids.dedup();
    let inquiries = inquiry_repository::list_filtered(&InquiryFilter {
        ids: Some(ids),
        ..Default::default()
    })
    .await?;
    let refs: Vec<&Inquiry> = inquiries.iter().collect();

    Ok(build_views(follow_ups, &refs).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a002_category::aggregate::CategoryId;

    #[test]
    fn test_views_substitute_names() {
        let inquiry = Inquiry::new_for_insert(
            "u1".into(),
            CategoryId::new_v4(),
            "Тема".into(),
            "Текст".into(),
        );
        let section_id = SectionId::new_v4();
        let mut follow_up =
            FollowUp::new(inquiry.base.id, section_id, "t1".into(), "Вопрос".into()).unwrap();
        follow_up.answer("a1", "Ответ", Utc::now()).unwrap();

        let users: HashMap<String, String> = [
            ("t1".to_string(), "Тренер".to_string()),
            ("a1".to_string(), "Ассистент".to_string()),
        ]
        .into_iter()
        .collect();
        let sections: HashMap<String, String> =
            [(section_id.value().to_string(), "Медицина".to_string())]
                .into_iter()
                .collect();

        let views = to_views(vec![follow_up], &users, &sections, &[&inquiry]);
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].section_name, "Медицина");
        assert_eq!(views[0].author_name, "Тренер");
        assert_eq!(views[0].answered_by_name.as_deref(), Some("Ассистент"));
        assert_eq!(views[0].inquiry_code, inquiry.base.code);
        assert_eq!(views[0].inquiry_title, "Тема");
    }

    #[test]
    fn test_views_unknown_inquiry_and_section() {
        let section_id = SectionId::new_v4();
        let follow_up = FollowUp::new(
            contracts::domain::a003_inquiry::aggregate::InquiryId::new_v4(),
            section_id,
            "t1".into(),
            "Вопрос".into(),
        )
        .unwrap();
        let views = to_views(vec![follow_up], &HashMap::new(), &HashMap::new(), &[]);
        assert_eq!(views[0].section_name, section_id.value().to_string());
        assert_eq!(views[0].author_name, "t1");
        assert!(views[0].inquiry_code.is_empty());
    }
}
