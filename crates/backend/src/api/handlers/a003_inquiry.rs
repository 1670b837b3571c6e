use axum::extract::{Json, Path, Query};
use contracts::domain::a003_inquiry::aggregate::{CreateInquiryDto, Inquiry, InquiryActionRequest};
use contracts::domain::a003_inquiry::list::{InquiryDetail, InquiryListQuery, InquiryListResponse};
use contracts::domain::a003_inquiry::message::{InquiryMessage, PostMessageDto};

use crate::domain::a003_inquiry::service;
use crate::shared::error::{parse_uuid, ServiceResult};
use crate::system::auth::extractor::CurrentUser;

/// GET /api/inquiries?scope=mine&status=opened&page=0
pub async fn list(
    CurrentUser(claims): CurrentUser,
    Query(query): Query<InquiryListQuery>,
) -> ServiceResult<Json<InquiryListResponse>> {
    Ok(Json(service::list(&query, &claims).await?))
}

/// POST /api/inquiries
pub async fn create(
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<CreateInquiryDto>,
) -> ServiceResult<Json<Inquiry>> {
    let inquiry = service::create(dto, &claims).await.map_err(|e| {
        tracing::error!("Failed to create inquiry: {}", e);
        e
    })?;
    Ok(Json(inquiry))
}

/// GET /api/inquiries/:id
pub async fn get_detail(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> ServiceResult<Json<InquiryDetail>> {
    let uuid = parse_uuid(&id)?;
    Ok(Json(service::get_detail(uuid, &claims).await?))
}

/// POST /api/inquiries/:id/actions
pub async fn apply_action(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<InquiryActionRequest>,
) -> ServiceResult<Json<InquiryDetail>> {
    let uuid = parse_uuid(&id)?;
    let action = request.action;
    let detail = service::apply_action(uuid, request, &claims)
        .await
        .map_err(|e| {
            tracing::error!("Action {} on inquiry {} failed: {}", action, id, e);
            e
        })?;
    Ok(Json(detail))
}

/// GET /api/inquiries/:id/messages
pub async fn list_messages(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> ServiceResult<Json<Vec<InquiryMessage>>> {
    let uuid = parse_uuid(&id)?;
    Ok(Json(service::list_messages(uuid, &claims).await?))
}

/// POST /api/inquiries/:id/messages
pub async fn post_message(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<PostMessageDto>,
) -> ServiceResult<Json<InquiryMessage>> {
    let uuid = parse_uuid(&id)?;
    Ok(Json(service::post_message(uuid, dto, &claims).await?))
}
