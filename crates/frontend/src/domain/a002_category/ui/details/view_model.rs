use contracts::domain::a002_category::aggregate::CategoryDto;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a002_category::api;

#[derive(Clone, Copy)]
pub struct CategoryDetailsViewModel {
    pub form: RwSignal<CategoryDto>,
    pub error: RwSignal<Option<String>>,
    pub saving: RwSignal<bool>,
}

impl CategoryDetailsViewModel {
    pub fn new() -> Self {
        Self {
            form: RwSignal::new(CategoryDto::default()),
            error: RwSignal::new(None),
            saving: RwSignal::new(false),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.form.with(|f| f.id.is_some())
    }

    pub fn validate_form(dto: &CategoryDto) -> Result<(), &'static str> {
        if dto.description.trim().is_empty() {
            return Err("Наименование обязательно для заполнения");
        }
        Ok(())
    }

    pub fn load_if_needed(&self, id: Option<String>) {
        let Some(existing_id) = id else {
            return;
        };
        let form = self.form;
        let error = self.error;
        spawn_local(async move {
            match api::fetch_by_id(&existing_id).await {
                Ok(category) => form.set(CategoryDto::from(&category)),
                Err(e) => error.set(Some(format!("Ошибка загрузки: {}", e))),
            }
        });
    }

    pub fn save_command(&self, on_saved: Callback<()>) {
        let mut current = self.form.get_untracked();
        if let Err(msg) = Self::validate_form(&current) {
            self.error.set(Some(msg.to_string()));
            return;
        }
        // пустой выбор в списке отделов = категория без отдела
        if current.section_id.as_deref().is_some_and(|s| s.trim().is_empty()) {
            current.section_id = None;
        }

        let error = self.error;
        let saving = self.saving;
        saving.set(true);
        spawn_local(async move {
            match api::save_category(&current).await {
                Ok(id) => {
                    log::debug!("category {} saved", id);
                    on_saved.run(());
                }
                Err(e) => error.set(Some(e.to_string())),
            }
            saving.set(false);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_is_required() {
        let dto = CategoryDto {
            description: "   ".into(),
            ..CategoryDto::default()
        };
        assert!(CategoryDetailsViewModel::validate_form(&dto).is_err());
    }
}
