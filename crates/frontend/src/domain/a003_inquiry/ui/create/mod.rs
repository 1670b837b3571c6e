use contracts::domain::a003_inquiry::aggregate::{CreateInquiryDto, Inquiry, TITLE_MAX_LEN};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a002_category::ui::picker::CategorySelect;
use crate::domain::a003_inquiry::api;
use crate::shared::modal_frame::ModalFrame;

/// Проверка новой заявки до отправки на сервер
pub fn validate_new_inquiry(dto: &CreateInquiryDto) -> Result<(), String> {
    let title = dto.title.trim();
    if title.is_empty() {
        return Err("Укажите тему обращения".into());
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(format!("Тема длиннее {} символов", TITLE_MAX_LEN));
    }
    if dto.category_id.trim().is_empty() {
        return Err("Выберите категорию".into());
    }
    if dto.body.trim().is_empty() {
        return Err("Опишите вопрос".into());
    }
    Ok(())
}

/// Модальная форма «Новое обращение»
#[component]
pub fn CreateInquiryForm(on_close: Callback<()>, on_created: Callback<Inquiry>) -> impl IntoView {
    let title = RwSignal::new(String::new());
    let category_id = RwSignal::new(String::new());
    let body = RwSignal::new(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    let on_submit = move |_| {
        let dto = CreateInquiryDto {
            title: title.get().trim().to_string(),
            body: body.get().trim().to_string(),
            category_id: category_id.get(),
        };
        if let Err(msg) = validate_new_inquiry(&dto) {
            set_error.set(Some(msg));
            return;
        }
        set_saving.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::create_inquiry(&dto).await {
                Ok(inquiry) => on_created.run(inquiry),
                Err(e) => {
                    set_error.set(Some(e.to_string()));
                    set_saving.set(false);
                }
            }
        });
    };

    view! {
        <ModalFrame title="Новое обращение" on_close=on_close modal_class="modal--wide">
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            <div class="form__group">
                <Label>"Тема"</Label>
                <Input value=title placeholder="Кратко о проблеме" />
            </div>
            <div class="form__group">
                <Label>"Категория"</Label>
                <CategorySelect value=category_id />
            </div>
            <div class="form__group">
                <Label>"Описание"</Label>
                <Textarea value=body attr:rows=8 placeholder="Что произошло, что уже пробовали" />
            </div>

            <div class="modal-footer">
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                    "Отмена"
                </Button>
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=on_submit
                    disabled=Signal::derive(move || saving.get())
                >
                    {move || if saving.get() { "Отправка..." } else { "Отправить" }}
                </Button>
            </div>
        </ModalFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(title: &str, category: &str, body: &str) -> CreateInquiryDto {
        CreateInquiryDto {
            title: title.into(),
            body: body.into(),
            category_id: category.into(),
        }
    }

    #[test]
    fn test_validate_new_inquiry() {
        assert!(validate_new_inquiry(&dto("Нет доступа", "c1", "Не пускает в CRM")).is_ok());
        assert_eq!(
            validate_new_inquiry(&dto("  ", "c1", "x")),
            Err("Укажите тему обращения".to_string())
        );
        assert_eq!(
            validate_new_inquiry(&dto("Тема", "", "x")),
            Err("Выберите категорию".to_string())
        );
        assert!(validate_new_inquiry(&dto("Тема", "c1", " ")).is_err());
    }

    #[test]
    fn test_title_length_limit() {
        let long = "я".repeat(TITLE_MAX_LEN + 1);
        assert!(validate_new_inquiry(&dto(&long, "c1", "x")).is_err());
        let max = "я".repeat(TITLE_MAX_LEN);
        assert!(validate_new_inquiry(&dto(&max, "c1", "x")).is_ok());
    }
}
