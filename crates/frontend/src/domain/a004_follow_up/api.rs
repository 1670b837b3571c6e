use contracts::domain::a004_follow_up::aggregate::{
    AnswerFollowUpDto, CreateFollowUpDto, FollowUpListQuery, FollowUpView,
};

use crate::shared::api_utils::{get_json, post_json, with_query, ApiResult};

/// Маршрутизация обращения: запрос в отдел, обращение уходит в «Ожидает»
pub async fn create_follow_up(inquiry_id: &str, dto: &CreateFollowUpDto) -> ApiResult<FollowUpView> {
    post_json(&format!("/api/inquiries/{}/follow-ups", inquiry_id), dto).await
}

/// Входящие запросы отдела текущего ассистента (админ может выбрать отдел)
pub async fn fetch_section_inbox(query: &FollowUpListQuery) -> ApiResult<Vec<FollowUpView>> {
    get_json(&with_query("/api/follow-ups/section", query)?).await
}

pub async fn answer_follow_up(id: &str, dto: &AnswerFollowUpDto) -> ApiResult<FollowUpView> {
    post_json(&format!("/api/follow-ups/{}/answer", id), dto).await
}
