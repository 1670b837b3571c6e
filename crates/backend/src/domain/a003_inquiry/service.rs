use super::list::{build_list_response, to_list_item, NameLookup};
use super::message_repository;
use super::repository::{self, InquiryFilter};
use chrono::Utc;
use contracts::domain::a002_category::aggregate::CategoryId;
use contracts::domain::a003_inquiry::aggregate::{CreateInquiryDto, Inquiry, InquiryActionRequest};
use contracts::domain::a003_inquiry::list::{
    InquiryDetail, InquiryListQuery, InquiryListResponse, InquiryListScope,
};
use contracts::domain::a003_inquiry::message::{InquiryMessage, PostMessageDto};
use contracts::domain::a003_inquiry::status::{
    allowed_actions, is_permitted, next_status, ActorContext, InquiryAction, InquiryStatus,
};
use contracts::domain::a004_follow_up::aggregate::FollowUp;
use contracts::domain::a006_notification::aggregate::NotificationKind;
use contracts::system::auth::TokenClaims;
use contracts::system::users::Role;
use uuid::Uuid;

use crate::domain::{a002_category, a004_follow_up, a005_rating, a006_notification, a007_trainer_task};
use crate::shared::config;
use crate::shared::error::{parse_uuid, ServiceError, ServiceResult};
use crate::system::auth::extractor::ensure_role;
use crate::system::users::{repository as users_repository, service as users_service};

// ============================================================================
// Права доступа
// ============================================================================

/// Видит ли пользователь обращение
pub fn can_view(actor: &ActorContext) -> bool {
    actor.role == Role::Admin
        || actor.is_author
        || actor.is_assigned_trainer
        || (actor.role == Role::Trainer && actor.is_unassigned)
        || actor.has_section_follow_up
}

/// Писать в переписку могут автор, назначенный тренер и администратор.
/// Автор закрытого обращения должен сначала его переоткрыть.
pub fn can_post_message(actor: &ActorContext, status: InquiryStatus) -> bool {
    if actor.is_author {
        return status != InquiryStatus::Closed;
    }
    actor.role == Role::Admin || actor.is_assigned_trainer
}

pub fn can_rate(actor: &ActorContext, status: InquiryStatus) -> bool {
    actor.is_author && status == InquiryStatus::Closed
}

/// Отношение пользователя к обращению. `follow_ups` нужны для ассистентов.
pub async fn actor_context(
    inquiry: &Inquiry,
    claims: &TokenClaims,
    follow_ups: &[FollowUp],
) -> ServiceResult<ActorContext> {
    let has_section_follow_up = if claims.role == Role::Assistant {
        let section_id = assistant_section(claims).await?;
        follow_ups
            .iter()
            .any(|f| f.section_id.value().to_string() == section_id)
    } else {
        false
    };

    Ok(ActorContext {
        role: claims.role,
        is_author: inquiry.author_id == claims.sub,
        is_assigned_trainer: inquiry.trainer_id.as_deref() == Some(claims.sub.as_str()),
        is_unassigned: inquiry.trainer_id.is_none(),
        has_section_follow_up,
    })
}

/// Отдел ассистента из его профиля
pub async fn assistant_section(claims: &TokenClaims) -> ServiceResult<String> {
    users_repository::get_by_id(&claims.sub)
        .await?
        .and_then(|u| u.section_id)
        .ok_or_else(|| ServiceError::Validation("Ассистенту не назначен отдел".into()))
}

pub async fn get_existing(id: Uuid) -> ServiceResult<Inquiry> {
    repository::get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Обращение"))
}

/// Обращение, его запросы в отделы и контекст пользователя.
/// Недоступное обращение выглядит как отсутствующее.
pub async fn get_visible(
    id: Uuid,
    claims: &TokenClaims,
) -> ServiceResult<(Inquiry, Vec<FollowUp>, ActorContext)> {
    let inquiry = get_existing(id).await?;
    let follow_ups = a004_follow_up::repository::list_by_inquiry(&inquiry.to_string_id()).await?;
    let actor = actor_context(&inquiry, claims, &follow_ups).await?;
    if !can_view(&actor) {
        return Err(ServiceError::not_found("Обращение"));
    }
    Ok((inquiry, follow_ups, actor))
}

pub fn notification_body(inquiry: &Inquiry) -> String {
    format!("{}: {}", inquiry.base.code, inquiry.title())
}

async fn name_lookup() -> anyhow::Result<NameLookup> {
    Ok(NameLookup {
        users: users_service::display_names().await?,
        categories: a002_category::service::names().await?,
    })
}

// ============================================================================
// Операции
// ============================================================================

pub async fn create(dto: CreateInquiryDto, claims: &TokenClaims) -> ServiceResult<Inquiry> {
    let category_id = parse_uuid(&dto.category_id)
        .map_err(|_| ServiceError::Validation("Не выбрана категория".into()))?;
    let category = a002_category::service::get_existing(category_id).await?;
    if !category.is_active {
        return Err(ServiceError::Validation(format!(
            "Категория «{}» неактивна",
            category.base.description
        )));
    }

    let mut inquiry = Inquiry::new_for_insert(
        claims.sub.clone(),
        CategoryId(category_id),
        dto.title,
        dto.body,
    );
    inquiry.validate().map_err(ServiceError::Validation)?;

    let trainer_id =
        a007_trainer_task::service::pick_trainer_for_category(&category_id.to_string()).await?;
    inquiry.assign_trainer(trainer_id);

    inquiry.before_write();
    repository::insert(&inquiry).await?;

    tracing::info!(
        "Inquiry {} created by {} (trainer: {:?})",
        inquiry.base.code,
        claims.username,
        inquiry.trainer_id
    );

    if let Some(trainer_id) = &inquiry.trainer_id {
        a006_notification::service::notify(
            &[trainer_id.clone()],
            NotificationKind::InquiryAssigned,
            &notification_body(&inquiry),
            Some(&inquiry.to_string_id()),
        )
        .await;
    }

    Ok(inquiry)
}

fn scope_filter(query: &InquiryListQuery, claims: &TokenClaims) -> ServiceResult<InquiryFilter> {
    let mut filter = InquiryFilter {
        category_id: query.category_id.clone(),
        ..Default::default()
    };
    match query.scope {
        InquiryListScope::Mine => {
            filter.author_id = Some(claims.sub.clone());
        }
        InquiryListScope::Assigned => {
            ensure_role(claims, &[Role::Trainer, Role::Admin])?;
            filter.trainer_id = match claims.role {
                Role::Admin => query.trainer_id.clone(),
                _ => Some(claims.sub.clone()),
            };
            filter.include_unassigned = query.include_unassigned;
        }
        InquiryListScope::Section => {
            ensure_role(claims, &[Role::Assistant, Role::Admin])?;
        }
        InquiryListScope::All => {
            ensure_role(claims, &[Role::Admin])?;
            filter.trainer_id = query.trainer_id.clone();
            filter.include_unassigned = query.include_unassigned;
        }
    }
    Ok(filter)
}

pub async fn list(
    query: &InquiryListQuery,
    claims: &TokenClaims,
) -> ServiceResult<InquiryListResponse> {
    let mut filter = scope_filter(query, claims)?;

    if query.scope == InquiryListScope::Section {
        let ids = if claims.role == Role::Admin {
            let mut ids: Vec<String> = a004_follow_up::repository::list_all()
                .await?
                .into_iter()
                .map(|f| f.inquiry_id.value().to_string())
                .collect();
            ids.sort();
            ids.dedup();
            ids
        } else {
            let section_id = assistant_section(claims).await?;
            a004_follow_up::repository::inquiry_ids_for_section(&section_id).await?
        };
        filter.ids = Some(ids);
    }

    let inquiries = repository::list_filtered(&filter).await?;
    let names = name_lookup().await?;
    let items = inquiries.iter().map(|i| to_list_item(i, &names)).collect();
    Ok(build_list_response(items, query))
}

pub async fn get_detail(id: Uuid, claims: &TokenClaims) -> ServiceResult<InquiryDetail> {
    let (inquiry, follow_ups, actor) = get_visible(id, claims).await?;
    let names = name_lookup().await?;
    let inquiry_id = inquiry.to_string_id();

    let messages = message_repository::list_by_inquiry(&inquiry_id, &names.users).await?;
    let rating = a005_rating::repository::get_by_inquiry(&inquiry_id).await?;
    let follow_ups = a004_follow_up::service::build_views(follow_ups, &[&inquiry]).await?;

    let category_name = names.category(&inquiry.category_id.value().to_string());
    let author_name = names.user(&inquiry.author_id);
    let trainer_name = inquiry.trainer_id.as_deref().map(|t| names.user(t));

    Ok(InquiryDetail {
        allowed_actions: allowed_actions(inquiry.status, &actor),
        can_post_message: can_post_message(&actor, inquiry.status),
        can_rate: can_rate(&actor, inquiry.status),
        inquiry,
        category_name,
        author_name,
        trainer_name,
        follow_ups,
        messages,
        rating,
    })
}

/// Выполняет действие над обращением. Сначала проверяются права,
/// затем допустимость перехода.
pub async fn apply_action(
    id: Uuid,
    request: InquiryActionRequest,
    claims: &TokenClaims,
) -> ServiceResult<InquiryDetail> {
    let (mut inquiry, _, actor) = get_visible(id, claims).await?;
    let action = request.action;

    if action == InquiryAction::Route {
        return Err(ServiceError::Validation(
            "Маршрутизация выполняется созданием запроса в отдел".into(),
        ));
    }
    if !is_permitted(action, &actor) {
        return Err(ServiceError::forbidden());
    }
    next_status(inquiry.status, action)?;

    let now = Utc::now();
    let answer_text = match action {
        InquiryAction::Answer => {
            let text = request.answer.as_deref().unwrap_or_default();
            inquiry.set_answer(text).map_err(ServiceError::Validation)?;
            inquiry.answer.clone()
        }
        InquiryAction::Reopen => {
            let limits = &config::get().inquiries;
            inquiry
                .check_reopen_limits(now, limits.max_reopens, limits.reopen_window_days)
                .map_err(ServiceError::Validation)?;
            None
        }
        _ => None,
    };

    if matches!(action, InquiryAction::Take | InquiryAction::Answer)
        && actor.role == Role::Trainer
        && inquiry.trainer_id.is_none()
    {
        inquiry.assign_trainer(Some(claims.sub.clone()));
    }

    let from = inquiry.status;
    let to = inquiry.apply_action(action, now)?;
    inquiry.before_write();
    repository::update(&inquiry).await?;

    let inquiry_id = inquiry.to_string_id();
    if let Some(text) = answer_text {
        message_repository::insert(&inquiry_id, &claims.sub, &text).await?;
    }
    if let Some(comment) = request.comment.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        message_repository::insert(&inquiry_id, &claims.sub, comment).await?;
    }

    tracing::info!(
        "Inquiry {}: {} -> {} ({} by {})",
        inquiry.base.code,
        from,
        to,
        action,
        claims.username
    );

    notify_action(&inquiry, action, &claims.sub).await;
    get_detail(id, claims).await
}

async fn notify_action(inquiry: &Inquiry, action: InquiryAction, actor_id: &str) {
    let trainer = inquiry.trainer_id.as_deref().unwrap_or_default();
    let (kind, candidates) = match action {
        InquiryAction::Answer => (NotificationKind::InquiryAnswered, vec![inquiry.author_id.as_str()]),
        InquiryAction::Close => (
            NotificationKind::InquiryClosed,
            vec![inquiry.author_id.as_str(), trainer],
        ),
        InquiryAction::Reopen => (NotificationKind::InquiryReopened, vec![trainer]),
        InquiryAction::Take | InquiryAction::Route => return,
    };
    let recipients = a006_notification::service::recipients(candidates, actor_id);
    a006_notification::service::notify(
        &recipients,
        kind,
        &notification_body(inquiry),
        Some(&inquiry.to_string_id()),
    )
    .await;
}

/// Отмечает активность по обращению без смены статуса
pub async fn touch_activity(inquiry: &mut Inquiry) -> ServiceResult<()> {
    inquiry.last_activity_at = Utc::now();
    inquiry.before_write();
    repository::update(inquiry).await?;
    Ok(())
}

pub async fn list_messages(id: Uuid, claims: &TokenClaims) -> ServiceResult<Vec<InquiryMessage>> {
    let (inquiry, _, _) = get_visible(id, claims).await?;
    let names = users_service::display_names().await?;
    Ok(message_repository::list_by_inquiry(&inquiry.to_string_id(), &names).await?)
}

pub async fn post_message(
    id: Uuid,
    dto: PostMessageDto,
    claims: &TokenClaims,
) -> ServiceResult<InquiryMessage> {
    let (mut inquiry, _, actor) = get_visible(id, claims).await?;
    let body = dto.validate().map_err(ServiceError::Validation)?;

    if actor.is_author && inquiry.status == InquiryStatus::Closed {
        return Err(ServiceError::Validation(
            "Обращение закрыто. Переоткройте его, чтобы продолжить переписку".into(),
        ));
    }
    if !can_post_message(&actor, inquiry.status) {
        return Err(ServiceError::forbidden());
    }

    let inquiry_id = inquiry.to_string_id();
    let model = message_repository::insert(&inquiry_id, &claims.sub, &body).await?;
    touch_activity(&mut inquiry).await?;

    let recipients = a006_notification::service::recipients(
        [
            inquiry.author_id.as_str(),
            inquiry.trainer_id.as_deref().unwrap_or_default(),
        ],
        &claims.sub,
    );
    a006_notification::service::notify(
        &recipients,
        NotificationKind::MessagePosted,
        &notification_body(&inquiry),
        Some(&inquiry_id),
    )
    .await;

    let names = users_service::display_names().await?;
    Ok(message_repository::to_message(model, &names))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> ActorContext {
        ActorContext {
            role,
            ..Default::default()
        }
    }

    #[test]
    fn test_visibility() {
        assert!(can_view(&actor(Role::Admin)));
        assert!(!can_view(&actor(Role::User)));
        assert!(!can_view(&actor(Role::Trainer)));

        let unassigned = ActorContext {
            is_unassigned: true,
            ..actor(Role::Trainer)
        };
        assert!(can_view(&unassigned));

        let foreign_queue = ActorContext {
            is_unassigned: true,
            ..actor(Role::User)
        };
        assert!(!can_view(&foreign_queue));

        let assistant = ActorContext {
            has_section_follow_up: true,
            ..actor(Role::Assistant)
        };
        assert!(can_view(&assistant));
    }

    #[test]
    fn test_author_cannot_post_to_closed() {
        let author = ActorContext {
            is_author: true,
            ..actor(Role::User)
        };
        assert!(can_post_message(&author, InquiryStatus::Opened));
        assert!(can_post_message(&author, InquiryStatus::Reopened));
        assert!(!can_post_message(&author, InquiryStatus::Closed));
    }

    #[test]
    fn test_trainer_and_admin_may_post() {
        let trainer = ActorContext {
            is_assigned_trainer: true,
            ..actor(Role::Trainer)
        };
        assert!(can_post_message(&trainer, InquiryStatus::Closed));
        assert!(can_post_message(&actor(Role::Admin), InquiryStatus::Pending));
        assert!(!can_post_message(&actor(Role::Trainer), InquiryStatus::Pending));
    }

    #[test]
    fn test_only_author_rates_closed() {
        let author = ActorContext {
            is_author: true,
            ..actor(Role::User)
        };
        assert!(can_rate(&author, InquiryStatus::Closed));
        assert!(!can_rate(&author, InquiryStatus::Pending));
        assert!(!can_rate(&actor(Role::Admin), InquiryStatus::Closed));
    }
}
