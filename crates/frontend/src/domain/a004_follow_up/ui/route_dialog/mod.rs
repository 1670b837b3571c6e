use contracts::domain::a004_follow_up::aggregate::{CreateFollowUpDto, FollowUpView};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a001_section::ui::picker::SectionSelect;
use crate::domain::a004_follow_up::api;
use crate::shared::modal_frame::ModalFrame;

pub fn validate_route(dto: &CreateFollowUpDto) -> Result<(), &'static str> {
    if dto.section_id.trim().is_empty() {
        return Err("Выберите отдел");
    }
    if dto.body.trim().is_empty() {
        return Err("Опишите, что нужно от отдела");
    }
    Ok(())
}

/// Запрос в отдел: создаёт follow-up, обращение переходит в «Ожидает»
#[component]
pub fn RouteDialog(
    inquiry_id: String,
    on_close: Callback<()>,
    on_routed: Callback<FollowUpView>,
) -> impl IntoView {
    let section_id = RwSignal::new(String::new());
    let body = RwSignal::new(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    let on_submit = move |_| {
        let dto = CreateFollowUpDto {
            section_id: section_id.get(),
            body: body.get().trim().to_string(),
        };
        if let Err(msg) = validate_route(&dto) {
            set_error.set(Some(msg.to_string()));
            return;
        }
        set_saving.set(true);
        set_error.set(None);
        let inquiry_id = inquiry_id.clone();
        spawn_local(async move {
            match api::create_follow_up(&inquiry_id, &dto).await {
                Ok(view) => on_routed.run(view),
                Err(e) => {
                    set_error.set(Some(e.to_string()));
                    set_saving.set(false);
                }
            }
        });
    };

    view! {
        <ModalFrame title="Запрос в отдел" on_close=on_close>
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            <div class="form__group">
                <Label>"Отдел"</Label>
                <SectionSelect value=section_id />
            </div>
            <div class="form__group">
                <Label>"Вопрос отделу"</Label>
                <Textarea value=body attr:rows=5 />
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

    #[test]
    fn test_validate_route() {
        let mut dto = CreateFollowUpDto::default();
        assert_eq!(validate_route(&dto), Err("Выберите отдел"));
        dto.section_id = "s1".into();
        dto.body = "   ".into();
        assert_eq!(validate_route(&dto), Err("Опишите, что нужно от отдела"));
        dto.body = "Проверьте счёт".into();
        assert!(validate_route(&dto).is_ok());
    }
}
