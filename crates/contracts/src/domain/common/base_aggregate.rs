use super::EntityMetadata;
use serde::{Deserialize, Serialize};

/// Поля, общие для справочников и обращений
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseAggregate<Id> {
    pub id: Id,
    /// Бизнес-код: "SEC-001", "INQ-20250101-1A2B"
    pub code: String,
    /// Наименование (у обращения это тема)
    pub description: String,
    pub comment: Option<String>,
    pub metadata: EntityMetadata,
}

fn clean_comment(comment: Option<String>) -> Option<String> {
    comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

impl<Id> BaseAggregate<Id> {
    pub fn new(id: Id, code: String, description: String) -> Self {
        Self::restore(id, code, description, None, EntityMetadata::new())
    }

    /// Сборка из сохранённых полей, метаданные берутся как есть
    pub fn restore(
        id: Id,
        code: String,
        description: String,
        comment: Option<String>,
        metadata: EntityMetadata,
    ) -> Self {
        Self {
            id,
            code,
            description,
            comment,
            metadata,
        }
    }

    /// Вызывается перед каждой записью в БД
    pub fn mark_changed(&mut self) {
        self.metadata.record_change();
    }

    pub fn set_comment(&mut self, comment: Option<String>) {
        self.comment = clean_comment(comment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_comment_is_dropped() {
        let mut base = BaseAggregate::new(1u8, "C-1".into(), "Name".into());
        base.set_comment(Some("   ".into()));
        assert_eq!(base.comment, None);
        base.set_comment(Some(" note ".into()));
        assert_eq!(base.comment.as_deref(), Some("note"));
    }
}
