use axum::extract::Json;
use contracts::domain::a007_trainer_task::aggregate::{
    MoveCardRequest, SaveBoardRequest, SetWeightRequest,
};
use contracts::domain::a007_trainer_task::board::TrainerBoard;

use crate::domain::a007_trainer_task::service;
use crate::shared::error::ServiceResult;

/// GET /api/trainer-tasks/board
pub async fn get_board() -> ServiceResult<Json<TrainerBoard>> {
    Ok(Json(service::get_board().await?))
}

/// PUT /api/trainer-tasks/board
pub async fn save_board(Json(request): Json<SaveBoardRequest>) -> ServiceResult<Json<TrainerBoard>> {
    let board = service::save_board(request).await.map_err(|e| {
        tracing::error!("Failed to save trainer board: {}", e);
        e
    })?;
    Ok(Json(board))
}

/// POST /api/trainer-tasks/move
pub async fn move_card(Json(request): Json<MoveCardRequest>) -> ServiceResult<Json<TrainerBoard>> {
    let board = service::move_card(request).await.map_err(|e| {
        tracing::error!("Failed to move card: {}", e);
        e
    })?;
    Ok(Json(board))
}

/// POST /api/trainer-tasks/weight
pub async fn set_weight(Json(request): Json<SetWeightRequest>) -> ServiceResult<Json<TrainerBoard>> {
    Ok(Json(service::set_weight(request).await?))
}
