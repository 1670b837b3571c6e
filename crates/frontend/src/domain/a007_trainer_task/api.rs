use contracts::domain::a007_trainer_task::aggregate::{
    MoveCardRequest, SaveBoardRequest, SetWeightRequest,
};
use contracts::domain::a007_trainer_task::board::TrainerBoard;

use crate::shared::api_utils::{get_json, post_json, put_json, ApiResult};

pub async fn get_board() -> ApiResult<TrainerBoard> {
    get_json("/api/trainer-tasks/board").await
}

/// Сервер возвращает доску целиком после каждого изменения
pub async fn move_card(request: &MoveCardRequest) -> ApiResult<TrainerBoard> {
    post_json("/api/trainer-tasks/move", request).await
}

pub async fn set_weight(request: &SetWeightRequest) -> ApiResult<TrainerBoard> {
    post_json("/api/trainer-tasks/weight", request).await
}

/// Полная замена всех назначений
pub async fn save_board(request: &SaveBoardRequest) -> ApiResult<TrainerBoard> {
    put_json("/api/trainer-tasks/board", request).await
}
