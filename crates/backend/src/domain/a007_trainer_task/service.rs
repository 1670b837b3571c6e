use super::repository;
use super::routing::{self, Candidate};
use contracts::domain::a007_trainer_task::aggregate::{
    diff_assignments, AssignmentDto, MoveCardRequest, SaveBoardRequest, SetWeightRequest, TrainerTask,
};
use contracts::domain::a007_trainer_task::board::TrainerBoard;
use contracts::system::users::Role;
use std::collections::HashSet;

use crate::domain::{a002_category, a003_inquiry};
use crate::shared::error::{ServiceError, ServiceResult};
use crate::system::users::repository as users_repository;

pub async fn get_board() -> ServiceResult<TrainerBoard> {
    let trainers: Vec<(String, String)> = users_repository::list_by_role(Role::Trainer)
        .await?
        .into_iter()
        .filter(|u| u.is_active)
        .map(|u| {
            let name = u.display_name();
            (u.id, name)
        })
        .collect();

    let query = a002_category::service::CategoryListQuery { active_only: true };
    let categories: Vec<(String, String)> = a002_category::service::list(&query)
        .await?
        .into_iter()
        .map(|c| (c.base.id.value().to_string(), c.base.description))
        .collect();

    let assignments: Vec<_> = repository::list_all()
        .await?
        .iter()
        .map(TrainerTask::to_assignment)
        .collect();

    Ok(TrainerBoard::build(&trainers, &categories, &assignments))
}

pub async fn move_card(request: MoveCardRequest) -> ServiceResult<TrainerBoard> {
    let mut board = get_board().await?;
    let before = board.to_assignments();
    board
        .move_card(
            &request.category_id,
            request.from_trainer_id.as_deref(),
            request.to_trainer_id.as_deref(),
        )
        .map_err(ServiceError::Validation)?;
    persist(&before, &board).await?;
    tracing::info!(
        "Category {} moved from {:?} to {:?}",
        request.category_id,
        request.from_trainer_id,
        request.to_trainer_id
    );
    Ok(board)
}

pub async fn set_weight(request: SetWeightRequest) -> ServiceResult<TrainerBoard> {
    let mut board = get_board().await?;
    let before = board.to_assignments();
    board
        .set_weight(&request.trainer_id, &request.category_id, request.weight)
        .map_err(ServiceError::Validation)?;
    persist(&before, &board).await?;
    Ok(board)
}

/// Сохранение всей видимой доски. Неизвестные тренеры и категории отклоняются;
/// назначения, которых на доске нет, остаются как есть.
pub async fn save_board(request: SaveBoardRequest) -> ServiceResult<TrainerBoard> {
    request.validate().map_err(ServiceError::Validation)?;

    let current = get_board().await?;
    let trainer_ids: HashSet<&str> = current
        .columns
        .iter()
        .filter_map(|c| c.trainer_id.as_deref())
        .collect();
    let category_ids: HashSet<&str> = current
        .columns
        .iter()
        .flat_map(|c| c.cards.iter().map(|card| card.category_id.as_str()))
        .collect();

    for a in &request.assignments {
        if !trainer_ids.contains(a.trainer_id.as_str()) {
            return Err(ServiceError::Validation(format!(
                "Тренер {} не найден или неактивен",
                a.trainer_id
            )));
        }
        if !category_ids.contains(a.category_id.as_str()) {
            return Err(ServiceError::Validation(format!(
                "Категория {} не найдена или неактивна",
                a.category_id
            )));
        }
    }

    let changes = diff_assignments(&current.to_assignments(), &request.assignments);
    repository::apply_changes(&changes).await?;
    tracing::info!(
        "Trainer board saved: {} assignments, {} changes",
        request.assignments.len(),
        changes.len()
    );
    get_board().await
}

/// Пишет только строки, которые поменялись на видимой доске
async fn persist(before: &[AssignmentDto], board: &TrainerBoard) -> ServiceResult<()> {
    let changes = diff_assignments(before, &board.to_assignments());
    repository::apply_changes(&changes).await?;
    Ok(())
}

/// Тренер для нового обращения категории или `None`
pub async fn pick_trainer_for_category(category_id: &str) -> anyhow::Result<Option<String>> {
    let tasks = repository::list_by_category(category_id).await?;
    if tasks.is_empty() {
        return Ok(None);
    }

    let trainer_ids: Vec<String> = tasks.iter().map(|t| t.trainer_id.clone()).collect();
    let loads = a003_inquiry::repository::count_open_by_trainers(&trainer_ids).await?;

    let mut candidates = Vec::with_capacity(tasks.len());
    for task in tasks {
        let is_active = users_repository::get_by_id(&task.trainer_id)
            .await?
            .map(|u| u.is_active && u.role == Role::Trainer)
            .unwrap_or(false);
        candidates.push(Candidate {
            open_load: loads.get(&task.trainer_id).copied().unwrap_or(0),
            trainer_id: task.trainer_id,
            weight: task.weight,
            is_active,
        });
    }

    Ok(routing::pick_trainer(&candidates).map(|c| c.trainer_id.clone()))
}
