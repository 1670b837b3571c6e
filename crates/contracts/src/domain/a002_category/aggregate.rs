use crate::domain::a001_section::aggregate::SectionId;
use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};

crate::aggregate_id!(
    /// Уникальный идентификатор категории обращений
    CategoryId
);

/// Категория обращения. Может принадлежать отделу.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(flatten)]
    pub base: BaseAggregate<CategoryId>,

    pub section_id: Option<SectionId>,
    pub is_active: bool,
}

impl Category {
    pub fn new_for_insert(
        code: String,
        description: String,
        section_id: Option<SectionId>,
        comment: Option<String>,
        is_active: bool,
    ) -> Self {
        let mut base = BaseAggregate::new(CategoryId::new_v4(), code, description);
        base.set_comment(comment);
        Self {
            base,
            section_id,
            is_active,
        }
    }

    pub fn update(&mut self, dto: &CategoryDto) -> Result<(), String> {
        if let Some(code) = dto.code.as_ref().filter(|c| !c.trim().is_empty()) {
            self.base.code = code.trim().to_string();
        }
        self.base.description = dto.description.trim().to_string();
        self.base.set_comment(dto.comment.clone());
        self.section_id = dto.parse_section_id()?;
        self.is_active = dto.is_active;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Наименование категории не может быть пустым".into());
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

impl AggregateRoot for Category {
    type Id = CategoryId;

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
        "a002"
    }

    fn collection_name() -> &'static str {
        "category"
    }

    fn element_name() -> &'static str {
        "Категория"
    }

    fn list_name() -> &'static str {
        "Категории"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,
    pub section_id: Option<String>,
    pub comment: Option<String>,
    pub is_active: bool,
}

impl CategoryDto {
    /// Empty string from a cleared picker means "no section".
    pub fn parse_section_id(&self) -> Result<Option<SectionId>, String> {
        match self.section_id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => SectionId::from_string(raw).map(Some),
        }
    }
}

impl Default for CategoryDto {
    fn default() -> Self {
        Self {
            id: None,
            code: None,
            description: String::new(),
            section_id: None,
            comment: None,
            is_active: true,
        }
    }
}

impl From<&Category> for CategoryDto {
    fn from(c: &Category) -> Self {
        Self {
            id: Some(c.base.id.as_string()),
            code: Some(c.base.code.clone()),
            description: c.base.description.clone(),
            section_id: c.section_id.map(|s| s.as_string()),
            comment: c.base.comment.clone(),
            is_active: c.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_section_id_means_none() {
        let dto = CategoryDto {
            section_id: Some("".into()),
            ..CategoryDto::default()
        };
        assert_eq!(dto.parse_section_id().unwrap(), None);
    }

    #[test]
    fn test_bad_section_id_is_rejected() {
        let mut category =
            Category::new_for_insert("CAT-1".into(), "Access".into(), None, None, true);
        let dto = CategoryDto {
            description: "Access".into(),
            section_id: Some("garbage".into()),
            ..CategoryDto::default()
        };
        assert!(category.update(&dto).is_err());
    }

    #[test]
    fn test_update_sets_section() {
        let mut category =
            Category::new_for_insert("CAT-1".into(), "Access".into(), None, None, true);
        let section = SectionId::new_v4();
        let dto = CategoryDto {
            description: "Access rights".into(),
            section_id: Some(section.as_string()),
            ..CategoryDto::default()
        };
        category.update(&dto).unwrap();
        assert_eq!(category.section_id, Some(section));
        assert_eq!(category.base.description, "Access rights");
    }
}
