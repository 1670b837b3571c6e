//! Доска распределения категорий между тренерами.
//!
//! Колонка 0 всегда «Без тренера»: категории, которые не обрабатывает
//! ни один тренер. Одна категория может стоять у нескольких тренеров.

use super::aggregate::{clamp_weight, AssignmentDto, DEFAULT_WEIGHT, MAX_WEIGHT, MIN_WEIGHT};
use serde::{Deserialize, Serialize};

pub const UNASSIGNED_TITLE: &str = "Без тренера";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardCard {
    pub category_id: String,
    pub category_name: String,
    pub weight: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardColumn {
    /// `None` для колонки «Без тренера»
    pub trainer_id: Option<String>,
    pub title: String,
    pub cards: Vec<BoardCard>,
}

impl BoardColumn {
    fn position(&self, category_id: &str) -> Option<usize> {
        self.cards.iter().position(|c| c.category_id == category_id)
    }

    pub fn contains(&self, category_id: &str) -> bool {
        self.position(category_id).is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrainerBoard {
    pub columns: Vec<BoardColumn>,
}

impl TrainerBoard {
    /// Собирает доску. `trainers` и `categories` передаются парами (id, name)
    /// в нужном порядке отображения; назначения на неизвестных тренеров
    /// или категории пропускаются.
    pub fn build(
        trainers: &[(String, String)],
        categories: &[(String, String)],
        assignments: &[AssignmentDto],
    ) -> Self {
        let category_name = |id: &str| {
            categories
                .iter()
                .find(|(cid, _)| cid == id)
                .map(|(_, name)| name.clone())
        };

        let mut columns = Vec::with_capacity(trainers.len() + 1);
        columns.push(BoardColumn {
            trainer_id: None,
            title: UNASSIGNED_TITLE.to_string(),
            cards: Vec::new(),
        });

        for (trainer_id, trainer_name) in trainers {
            let cards = assignments
                .iter()
                .filter(|a| &a.trainer_id == trainer_id)
                .filter_map(|a| {
                    category_name(&a.category_id).map(|name| BoardCard {
                        category_id: a.category_id.clone(),
                        category_name: name,
                        weight: clamp_weight(a.weight),
                    })
                })
                .collect();
            columns.push(BoardColumn {
                trainer_id: Some(trainer_id.clone()),
                title: trainer_name.clone(),
                cards,
            });
        }

        let mut board = Self { columns };
        for (category_id, name) in categories {
            if !board.is_assigned_anywhere(category_id) {
                board.columns[0].cards.push(BoardCard {
                    category_id: category_id.clone(),
                    category_name: name.clone(),
                    weight: DEFAULT_WEIGHT,
                });
            }
        }
        board
    }

    fn column_index(&self, trainer_id: Option<&str>) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.trainer_id.as_deref() == trainer_id)
    }

    pub fn column(&self, trainer_id: Option<&str>) -> Option<&BoardColumn> {
        self.column_index(trainer_id).map(|i| &self.columns[i])
    }

    fn is_assigned_anywhere(&self, category_id: &str) -> bool {
        self.columns
            .iter()
            .skip(1)
            .any(|c| c.contains(category_id))
    }

    /// Перенос карточки между колонками.
    ///
    /// Из «Без тренера» к тренеру: вес по умолчанию. Между тренерами вес
    /// сохраняется. К «Без тренера»: карточка снимается с тренера и
    /// появляется в первой колонке, только если её больше никто не ведёт.
    pub fn move_card(
        &mut self,
        category_id: &str,
        from_trainer: Option<&str>,
        to_trainer: Option<&str>,
    ) -> Result<(), String> {
        if from_trainer == to_trainer {
            return Ok(());
        }
        let from = self
            .column_index(from_trainer)
            .ok_or_else(|| format!("Колонка {:?} не найдена", from_trainer))?;
        let to = self
            .column_index(to_trainer)
            .ok_or_else(|| format!("Колонка {:?} не найдена", to_trainer))?;
        let pos = self.columns[from]
            .position(category_id)
            .ok_or_else(|| format!("Категория {} отсутствует в колонке", category_id))?;

        if to != 0 && self.columns[to].contains(category_id) {
            return Err("Тренер уже обрабатывает эту категорию".into());
        }

        let mut card = self.columns[from].cards.remove(pos);
        if from == 0 {
            card.weight = DEFAULT_WEIGHT;
        }

        if to == 0 {
            if !self.is_assigned_anywhere(category_id) && !self.columns[0].contains(category_id) {
                card.weight = DEFAULT_WEIGHT;
                self.columns[0].cards.push(card);
            }
        } else {
            self.columns[to].cards.push(card);
        }
        Ok(())
    }

    pub fn set_weight(
        &mut self,
        trainer_id: &str,
        category_id: &str,
        weight: i32,
    ) -> Result<(), String> {
        if !(MIN_WEIGHT..=MAX_WEIGHT).contains(&weight) {
            return Err(format!(
                "Вес должен быть от {} до {}",
                MIN_WEIGHT, MAX_WEIGHT
            ));
        }
        let column = self
            .column_index(Some(trainer_id))
            .ok_or_else(|| format!("Тренер {} не найден", trainer_id))?;
        let card = self.columns[column]
            .cards
            .iter_mut()
            .find(|c| c.category_id == category_id)
            .ok_or_else(|| format!("Категория {} не назначена тренеру", category_id))?;
        card.weight = weight;
        Ok(())
    }

    /// Назначения для сохранения (первая колонка не сохраняется)
    pub fn to_assignments(&self) -> Vec<AssignmentDto> {
        self.columns
            .iter()
            .filter_map(|c| c.trainer_id.as_ref().map(|t| (t, &c.cards)))
            .flat_map(|(trainer_id, cards)| {
                cards.iter().map(move |card| AssignmentDto {
                    trainer_id: trainer_id.clone(),
                    category_id: card.category_id.clone(),
                    weight: card.weight,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    }

    fn board() -> TrainerBoard {
        TrainerBoard::build(
            &pairs(&[("t1", "Anna"), ("t2", "Boris")]),
            &pairs(&[("c1", "Billing"), ("c2", "Access"), ("c3", "Hardware")]),
            &[AssignmentDto {
                trainer_id: "t1".into(),
                category_id: "c1".into(),
                weight: 4,
            }],
        )
    }

    fn ids(column: &BoardColumn) -> Vec<&str> {
        column.cards.iter().map(|c| c.category_id.as_str()).collect()
    }

    #[test]
    fn test_build_puts_free_categories_first() {
        let board = board();
        assert_eq!(board.columns.len(), 3);
        assert_eq!(board.columns[0].title, UNASSIGNED_TITLE);
        assert_eq!(ids(&board.columns[0]), vec!["c2", "c3"]);
        assert_eq!(ids(&board.columns[1]), vec!["c1"]);
        assert_eq!(board.columns[1].cards[0].weight, 4);
    }

    #[test]
    fn test_move_from_unassigned_uses_default_weight() {
        let mut board = board();
        board.move_card("c2", None, Some("t2")).unwrap();
        assert_eq!(ids(&board.columns[0]), vec!["c3"]);
        assert_eq!(board.columns[2].cards[0].weight, DEFAULT_WEIGHT);
    }

    #[test]
    fn test_move_between_trainers_keeps_weight() {
        let mut board = board();
        board.move_card("c1", Some("t1"), Some("t2")).unwrap();
        assert!(board.columns[1].cards.is_empty());
        assert_eq!(board.columns[2].cards[0].weight, 4);
    }

    #[test]
    fn test_move_back_to_unassigned() {
        let mut board = board();
        board.move_card("c1", Some("t1"), None).unwrap();
        assert_eq!(ids(&board.columns[0]), vec!["c2", "c3", "c1"]);
        assert_eq!(board.columns[0].cards[2].weight, DEFAULT_WEIGHT);
    }

    #[test]
    fn test_remove_shared_category_does_not_duplicate_in_unassigned() {
        let mut board = board();
        board.move_card("c2", None, Some("t1")).unwrap();
        board.columns[2].cards.push(BoardCard {
            category_id: "c2".into(),
            category_name: "Access".into(),
            weight: 1,
        });
        board.move_card("c2", Some("t1"), None).unwrap();
        assert!(!board.columns[0].contains("c2"));
    }

    #[test]
    fn test_move_to_trainer_that_already_has_card_fails() {
        let mut board = board();
        board.move_card("c2", None, Some("t1")).unwrap();
        board.columns[2].cards.push(BoardCard {
            category_id: "c1".into(),
            category_name: "Billing".into(),
            weight: 2,
        });
        assert!(board.move_card("c1", Some("t2"), Some("t1")).is_err());
        assert!(board.columns[2].contains("c1"));
    }

    #[test]
    fn test_move_unknown_card_fails() {
        let mut board = board();
        assert!(board.move_card("c1", None, Some("t2")).is_err());
        assert!(board.move_card("c9", Some("t1"), Some("t2")).is_err());
    }

    #[test]
    fn test_set_weight_and_assignments() {
        let mut board = board();
        board.set_weight("t1", "c1", 9).unwrap();
        assert!(board.set_weight("t1", "c1", 0).is_err());
        assert!(board.set_weight("t2", "c1", 3).is_err());

        board.move_card("c3", None, Some("t2")).unwrap();
        let assignments = board.to_assignments();
        assert_eq!(
            assignments,
            vec![
                AssignmentDto {
                    trainer_id: "t1".into(),
                    category_id: "c1".into(),
                    weight: 9,
                },
                AssignmentDto {
                    trainer_id: "t2".into(),
                    category_id: "c3".into(),
                    weight: DEFAULT_WEIGHT,
                },
            ]
        );
    }

    #[test]
    fn test_hidden_trainer_assignment_survives_unrelated_move() {
        use crate::domain::a007_trainer_task::aggregate::{diff_assignments, AssignmentChange};

        // t_off неактивен и на доску не попадает
        let stored = vec![
            AssignmentDto {
                trainer_id: "t1".into(),
                category_id: "c1".into(),
                weight: 2,
            },
            AssignmentDto {
                trainer_id: "t_off".into(),
                category_id: "c2".into(),
                weight: 7,
            },
        ];
        let mut board = TrainerBoard::build(
            &pairs(&[("t1", "Anna")]),
            &pairs(&[("c1", "Billing"), ("c2", "Access")]),
            &stored,
        );
        let before = board.to_assignments();
        board.move_card("c1", Some("t1"), None).unwrap();

        let changes = diff_assignments(&before, &board.to_assignments());
        assert_eq!(
            changes,
            vec![AssignmentChange::Removed {
                trainer_id: "t1".into(),
                category_id: "c1".into(),
            }]
        );
    }
}
