use contracts::domain::a003_inquiry::aggregate::{CreateInquiryDto, Inquiry, InquiryActionRequest};
use contracts::domain::a003_inquiry::list::{InquiryDetail, InquiryListQuery, InquiryListResponse};
use contracts::domain::a003_inquiry::message::{InquiryMessage, PostMessageDto};

use crate::shared::api_utils::{get_json, post_json, with_query, ApiResult};

pub async fn fetch_inquiries(query: &InquiryListQuery) -> ApiResult<InquiryListResponse> {
    get_json(&with_query("/api/inquiries", query)?).await
}

pub async fn create_inquiry(dto: &CreateInquiryDto) -> ApiResult<Inquiry> {
    post_json("/api/inquiries", dto).await
}

/// Карточка со всем, что нужно экрану: переписка, запросы в отделы,
/// оценка и доступные текущему пользователю действия
pub async fn fetch_detail(id: &str) -> ApiResult<InquiryDetail> {
    get_json(&format!("/api/inquiries/{}", id)).await
}

pub async fn apply_action(id: &str, request: &InquiryActionRequest) -> ApiResult<InquiryDetail> {
    post_json(&format!("/api/inquiries/{}/actions", id), request).await
}

pub async fn fetch_messages(id: &str) -> ApiResult<Vec<InquiryMessage>> {
    get_json(&format!("/api/inquiries/{}/messages", id)).await
}

pub async fn post_message(id: &str, dto: &PostMessageDto) -> ApiResult<InquiryMessage> {
    post_json(&format!("/api/inquiries/{}/messages", id), dto).await
}
