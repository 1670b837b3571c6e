use crate::domain::a002_category::aggregate::CategoryId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_WEIGHT: i32 = 1;
pub const MAX_WEIGHT: i32 = 10;
pub const DEFAULT_WEIGHT: i32 = 1;

pub fn clamp_weight(weight: i32) -> i32 {
    weight.clamp(MIN_WEIGHT, MAX_WEIGHT)
}

/// Категория, которую обрабатывает тренер, и его доля новых обращений
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerTask {
    pub id: Uuid,
    pub trainer_id: String,
    pub category_id: CategoryId,
    pub weight: i32,
}

impl TrainerTask {
    pub fn new(trainer_id: String, category_id: CategoryId, weight: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            trainer_id,
            category_id,
            weight: clamp_weight(weight),
        }
    }

    pub fn to_assignment(&self) -> AssignmentDto {
        AssignmentDto {
            trainer_id: self.trainer_id.clone(),
            category_id: self.category_id.value().to_string(),
            weight: self.weight,
        }
    }
}

/// Одна строка сохранения доски
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignmentDto {
    pub trainer_id: String,
    pub category_id: String,
    pub weight: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoveCardRequest {
    pub category_id: String,
    /// `None` = колонка «без тренера»
    pub from_trainer_id: Option<String>,
    pub to_trainer_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetWeightRequest {
    pub trainer_id: String,
    pub category_id: String,
    pub weight: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveBoardRequest {
    pub assignments: Vec<AssignmentDto>,
}

impl SaveBoardRequest {
    /// Дубликаты пары тренер/категория и вес вне диапазона недопустимы
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = std::collections::HashSet::new();
        for a in &self.assignments {
            if !(MIN_WEIGHT..=MAX_WEIGHT).contains(&a.weight) {
                return Err(format!(
                    "Вес должен быть от {} до {} (категория {})",
                    MIN_WEIGHT, MAX_WEIGHT, a.category_id
                ));
            }
            if !seen.insert((a.trainer_id.as_str(), a.category_id.as_str())) {
                return Err(format!(
                    "Категория {} назначена тренеру {} дважды",
                    a.category_id, a.trainer_id
                ));
            }
        }
        Ok(())
    }
}

/// Изменение одной строки назначений
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentChange {
    Removed {
        trainer_id: String,
        category_id: String,
    },
    /// Новое назначение или новый вес существующего
    Upserted(AssignmentDto),
}

/// Построчная разница между видимыми назначениями до и после правки.
/// Строки, которых нет ни в `before`, ни в `after`, не затрагиваются.
pub fn diff_assignments(before: &[AssignmentDto], after: &[AssignmentDto]) -> Vec<AssignmentChange> {
    let find = |list: &[AssignmentDto], a: &AssignmentDto| {
        list.iter()
            .find(|b| b.trainer_id == a.trainer_id && b.category_id == a.category_id)
            .map(|b| b.weight)
    };

    let removed = before
        .iter()
        .filter(|a| find(after, a).is_none())
        .map(|a| AssignmentChange::Removed {
            trainer_id: a.trainer_id.clone(),
            category_id: a.category_id.clone(),
        });
    let upserted = after
        .iter()
        .filter(|a| find(before, a) != Some(a.weight))
        .cloned()
        .map(AssignmentChange::Upserted);

    removed.chain(upserted).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_weight() {
        assert_eq!(clamp_weight(0), MIN_WEIGHT);
        assert_eq!(clamp_weight(42), MAX_WEIGHT);
        assert_eq!(clamp_weight(7), 7);
    }

    #[test]
    fn test_save_board_rejects_duplicates() {
        let a = AssignmentDto {
            trainer_id: "t1".into(),
            category_id: "c1".into(),
            weight: 2,
        };
        let request = SaveBoardRequest {
            assignments: vec![a.clone(), a],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_save_board_rejects_bad_weight() {
        let request = SaveBoardRequest {
            assignments: vec![AssignmentDto {
                trainer_id: "t1".into(),
                category_id: "c1".into(),
                weight: 11,
            }],
        };
        assert!(request.validate().is_err());
    }

    fn dto(trainer_id: &str, category_id: &str, weight: i32) -> AssignmentDto {
        AssignmentDto {
            trainer_id: trainer_id.into(),
            category_id: category_id.into(),
            weight,
        }
    }

    #[test]
    fn test_diff_assignments_touches_only_changed_rows() {
        let before = vec![dto("t1", "c1", 2), dto("t1", "c2", 3), dto("t2", "c3", 1)];
        let after = vec![dto("t1", "c2", 5), dto("t2", "c3", 1), dto("t2", "c1", 2)];
        assert_eq!(
            diff_assignments(&before, &after),
            vec![
                AssignmentChange::Removed {
                    trainer_id: "t1".into(),
                    category_id: "c1".into(),
                },
                AssignmentChange::Upserted(dto("t1", "c2", 5)),
                AssignmentChange::Upserted(dto("t2", "c1", 2)),
            ]
        );
        assert!(diff_assignments(&after, &after).is_empty());
    }
}
