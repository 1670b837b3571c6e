//! Жизненный цикл обращения: статусы, действия и таблица переходов.
//!
//! Сервер применяет переходы, клиент по той же таблице решает,
//! какие кнопки действий показывать.

use crate::system::users::Role;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    Opened,
    Pending,
    Closed,
    Reopened,
}

impl InquiryStatus {
    pub const ALL: [InquiryStatus; 4] = [
        InquiryStatus::Opened,
        InquiryStatus::Pending,
        InquiryStatus::Closed,
        InquiryStatus::Reopened,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryStatus::Opened => "opened",
            InquiryStatus::Pending => "pending",
            InquiryStatus::Closed => "closed",
            InquiryStatus::Reopened => "reopened",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InquiryStatus::Opened => "Открыто",
            InquiryStatus::Pending => "В работе",
            InquiryStatus::Closed => "Закрыто",
            InquiryStatus::Reopened => "Переоткрыто",
        }
    }

    /// CSS-модификатор бейджа статуса
    pub fn badge_class(&self) -> &'static str {
        match self {
            InquiryStatus::Opened => "badge badge--info",
            InquiryStatus::Pending => "badge badge--warning",
            InquiryStatus::Closed => "badge badge--success",
            InquiryStatus::Reopened => "badge badge--error",
        }
    }

    /// Counts towards a trainer's workload.
    pub fn is_active(&self) -> bool {
        !matches!(self, InquiryStatus::Closed)
    }
}

impl fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InquiryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "opened" => Ok(InquiryStatus::Opened),
            "pending" => Ok(InquiryStatus::Pending),
            "closed" => Ok(InquiryStatus::Closed),
            "reopened" => Ok(InquiryStatus::Reopened),
            other => Err(format!("Unknown inquiry status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryAction {
    /// Тренер берёт обращение в работу
    Take,
    /// Ответ по существу, закрывает обращение
    Answer,
    /// Запрос в отдел (follow-up)
    Route,
    Close,
    Reopen,
}

impl InquiryAction {
    pub const ALL: [InquiryAction; 5] = [
        InquiryAction::Take,
        InquiryAction::Answer,
        InquiryAction::Route,
        InquiryAction::Close,
        InquiryAction::Reopen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryAction::Take => "take",
            InquiryAction::Answer => "answer",
            InquiryAction::Route => "route",
            InquiryAction::Close => "close",
            InquiryAction::Reopen => "reopen",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InquiryAction::Take => "Взять в работу",
            InquiryAction::Answer => "Ответить",
            InquiryAction::Route => "Запрос в отдел",
            InquiryAction::Close => "Закрыть",
            InquiryAction::Reopen => "Переоткрыть",
        }
    }
}

impl fmt::Display for InquiryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionError {
    pub from: InquiryStatus,
    pub action: InquiryAction,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Action '{}' is not allowed for an inquiry in status '{}'",
            self.action, self.from
        )
    }
}

impl std::error::Error for TransitionError {}

use InquiryAction as A;
use InquiryStatus as S;

/// (from, action) -> to
const TRANSITIONS: &[(InquiryStatus, InquiryAction, InquiryStatus)] = &[
    (S::Opened, A::Take, S::Pending),
    (S::Opened, A::Answer, S::Closed),
    (S::Opened, A::Route, S::Pending),
    (S::Opened, A::Close, S::Closed),
    (S::Pending, A::Answer, S::Closed),
    (S::Pending, A::Route, S::Pending),
    (S::Pending, A::Close, S::Closed),
    (S::Closed, A::Reopen, S::Reopened),
    (S::Reopened, A::Take, S::Pending),
    (S::Reopened, A::Answer, S::Closed),
    (S::Reopened, A::Route, S::Pending),
    (S::Reopened, A::Close, S::Closed),
];

pub fn next_status(
    from: InquiryStatus,
    action: InquiryAction,
) -> Result<InquiryStatus, TransitionError> {
    TRANSITIONS
        .iter()
        .find(|(f, a, _)| *f == from && *a == action)
        .map(|(_, _, to)| *to)
        .ok_or(TransitionError { from, action })
}

/// Все действия, допустимые из статуса, без учёта роли
pub fn available_actions(from: InquiryStatus) -> Vec<InquiryAction> {
    TRANSITIONS
        .iter()
        .filter(|(f, _, _)| *f == from)
        .map(|(_, a, _)| *a)
        .collect()
}

/// Отношение текущего пользователя к конкретному обращению
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActorContext {
    pub role: Role,
    pub is_author: bool,
    pub is_assigned_trainer: bool,
    pub is_unassigned: bool,
    /// Assistant whose section has a follow-up on this inquiry
    pub has_section_follow_up: bool,
}

pub fn is_permitted(action: InquiryAction, actor: &ActorContext) -> bool {
    if actor.role == Role::Admin {
        return true;
    }
    let trainer_may_work =
        actor.role == Role::Trainer && (actor.is_assigned_trainer || actor.is_unassigned);
    match action {
        InquiryAction::Take | InquiryAction::Route => trainer_may_work,
        InquiryAction::Answer => {
            trainer_may_work || (actor.role == Role::Assistant && actor.has_section_follow_up)
        }
        InquiryAction::Close => actor.is_author || (actor.role == Role::Trainer && actor.is_assigned_trainer),
        InquiryAction::Reopen => actor.is_author,
    }
}

/// Действия для кнопок: переход существует и роль его разрешает
pub fn allowed_actions(from: InquiryStatus, actor: &ActorContext) -> Vec<InquiryAction> {
    available_actions(from)
        .into_iter()
        .filter(|a| is_permitted(*a, actor))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trainer(assigned: bool) -> ActorContext {
        ActorContext {
            role: Role::Trainer,
            is_assigned_trainer: assigned,
            ..ActorContext::default()
        }
    }

    #[test]
    fn test_happy_path() {
        let s = next_status(S::Opened, A::Take).unwrap();
        assert_eq!(s, S::Pending);
        let s = next_status(s, A::Answer).unwrap();
        assert_eq!(s, S::Closed);
        let s = next_status(s, A::Reopen).unwrap();
        assert_eq!(s, S::Reopened);
        let s = next_status(s, A::Close).unwrap();
        assert_eq!(s, S::Closed);
    }

    #[test]
    fn test_closed_only_reopens() {
        assert_eq!(available_actions(S::Closed), vec![A::Reopen]);
        let err = next_status(S::Closed, A::Take).unwrap_err();
        assert_eq!(err, TransitionError { from: S::Closed, action: A::Take });
    }

    #[test]
    fn test_pending_cannot_be_taken_again() {
        assert!(next_status(S::Pending, A::Take).is_err());
        assert!(next_status(S::Pending, A::Reopen).is_err());
    }

    #[test]
    fn test_every_status_has_an_exit() {
        for status in InquiryStatus::ALL {
            assert!(!available_actions(status).is_empty(), "{status} is a dead end");
        }
    }

    #[test]
    fn test_author_can_close_and_reopen_but_not_take() {
        let author = ActorContext {
            role: Role::User,
            is_author: true,
            ..ActorContext::default()
        };
        assert_eq!(allowed_actions(S::Opened, &author), vec![A::Close]);
        assert_eq!(allowed_actions(S::Closed, &author), vec![A::Reopen]);
    }

    #[test]
    fn test_foreign_trainer_is_locked_out_of_assigned_inquiry() {
        assert!(allowed_actions(S::Opened, &trainer(false)).is_empty());
        assert_eq!(
            allowed_actions(S::Opened, &trainer(true)),
            vec![A::Take, A::Answer, A::Route, A::Close]
        );
    }

    #[test]
    fn test_any_trainer_may_take_unassigned() {
        let actor = ActorContext {
            is_unassigned: true,
            ..trainer(false)
        };
        assert!(is_permitted(A::Take, &actor));
        // closing stays with the assigned trainer or the author
        assert!(!is_permitted(A::Close, &actor));
    }

    #[test]
    fn test_assistant_answers_only_through_follow_up() {
        let mut actor = ActorContext {
            role: Role::Assistant,
            ..ActorContext::default()
        };
        assert!(allowed_actions(S::Pending, &actor).is_empty());
        actor.has_section_follow_up = true;
        assert_eq!(allowed_actions(S::Pending, &actor), vec![A::Answer]);
    }

    #[test]
    fn test_admin_gets_everything_the_table_allows() {
        let admin = ActorContext {
            role: Role::Admin,
            ..ActorContext::default()
        };
        for status in InquiryStatus::ALL {
            assert_eq!(allowed_actions(status, &admin), available_actions(status));
        }
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(serde_json::to_string(&S::Reopened).unwrap(), "\"reopened\"");
        assert_eq!("pending".parse::<InquiryStatus>().unwrap(), S::Pending);
    }
}
