use contracts::domain::a001_section::aggregate::SectionDto;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a001_section::api;

/// ViewModel формы отдела
#[derive(Clone, Copy)]
pub struct SectionDetailsViewModel {
    pub form: RwSignal<SectionDto>,
    pub error: RwSignal<Option<String>>,
    pub saving: RwSignal<bool>,
}

impl SectionDetailsViewModel {
    pub fn new() -> Self {
        Self {
            form: RwSignal::new(SectionDto::default()),
            error: RwSignal::new(None),
            saving: RwSignal::new(false),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.form.with(|f| f.id.is_some())
    }

    pub fn validate_form(dto: &SectionDto) -> Result<(), &'static str> {
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
                Ok(section) => form.set(SectionDto::from(&section)),
                Err(e) => error.set(Some(format!("Ошибка загрузки: {}", e))),
            }
        });
    }

    pub fn save_command(&self, on_saved: Callback<()>) {
        let current = self.form.get_untracked();
        if let Err(msg) = Self::validate_form(&current) {
            self.error.set(Some(msg.to_string()));
            return;
        }

        let error = self.error;
        let saving = self.saving;
        saving.set(true);
        spawn_local(async move {
            match api::save_section(&current).await {
                Ok(id) => {
                    log::debug!("section {} saved", id);
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
        let mut dto = SectionDto::default();
        assert!(SectionDetailsViewModel::validate_form(&dto).is_err());
        dto.description = "Бухгалтерия".into();
        assert!(SectionDetailsViewModel::validate_form(&dto).is_ok());
    }
}
