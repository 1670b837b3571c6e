use crate::domain::common::{AggregateRoot, BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};

crate::aggregate_id!(
    /// Уникальный идентификатор отдела
    SectionId
);

/// Отдел (section): организационная единица, куда маршрутизируются
/// обращения и дополнительные запросы (follow-ups)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(flatten)]
    pub base: BaseAggregate<SectionId>,

    pub is_active: bool,
}

impl Section {
    pub fn new_for_insert(
        code: String,
        description: String,
        comment: Option<String>,
        is_active: bool,
    ) -> Self {
        let mut base = BaseAggregate::new(SectionId::new_v4(), code, description);
        base.set_comment(comment);
        Self { base, is_active }
    }

    pub fn update(&mut self, dto: &SectionDto) {
        if let Some(code) = dto.code.as_ref().filter(|c| !c.trim().is_empty()) {
            self.base.code = code.trim().to_string();
        }
        self.base.description = dto.description.trim().to_string();
        self.base.set_comment(dto.comment.clone());
        self.is_active = dto.is_active;
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Наименование отдела не может быть пустым".into());
        }
        if self.base.code.trim().is_empty() {
            return Err("Код не может быть пустым".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.mark_changed();
    }
}

impl AggregateRoot for Section {
    type Id = SectionId;

    fn id(&self) -> Self::Id {
        self.base.id
    }

    fn code(&self) -> &str {
        &self.base.code
    }

    fn description(&self) -> &str {
        &self.base.description
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn aggregate_index() -> &'static str {
        "a001"
    }

    fn collection_name() -> &'static str {
        "section"
    }

    fn element_name() -> &'static str {
        "Отдел"
    }

    fn list_name() -> &'static str {
        "Отделы"
    }
}

/// DTO для создания/обновления отдела
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,
    pub comment: Option<String>,
    pub is_active: bool,
}

impl Default for SectionDto {
    fn default() -> Self {
        Self {
            id: None,
            code: None,
            description: String::new(),
            comment: None,
            is_active: true,
        }
    }
}

impl From<&Section> for SectionDto {
    fn from(s: &Section) -> Self {
        use crate::domain::common::AggregateId;
        Self {
            id: Some(s.base.id.as_string()),
            code: Some(s.base.code.clone()),
            description: s.base.description.clone(),
            comment: s.base.comment.clone(),
            is_active: s.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_description() {
        let section = Section::new_for_insert("SEC-1".into(), "  ".into(), None, true);
        assert!(section.validate().is_err());
    }

    #[test]
    fn test_update_keeps_code_when_dto_has_none() {
        let mut section = Section::new_for_insert("SEC-1".into(), "Billing".into(), None, true);
        let dto = SectionDto {
            description: " Finance ".into(),
            comment: Some("".into()),
            is_active: false,
            ..SectionDto::default()
        };
        section.update(&dto);
        assert_eq!(section.base.code, "SEC-1");
        assert_eq!(section.base.description, "Finance");
        assert_eq!(section.base.comment, None);
        assert!(!section.is_active);
        assert!(section.validate().is_ok());
    }

    #[test]
    fn test_full_name_matches_table() {
        assert_eq!(Section::full_name(), "a001_section");
    }
}
