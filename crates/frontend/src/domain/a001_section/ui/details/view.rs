use leptos::prelude::*;
use thaw::*;

use super::view_model::SectionDetailsViewModel;
use crate::shared::modal_frame::ModalFrame;

fn to_option(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[component]
pub fn SectionDetails(
    id: Option<String>,
    on_saved: Callback<()>,
    on_close: Callback<()>,
) -> impl IntoView {
    let vm = SectionDetailsViewModel::new();
    let title = if id.is_some() {
        "Редактирование отдела"
    } else {
        "Новый отдел"
    };
    vm.load_if_needed(id);

    // thaw Input работает с RwSignal<String>, синхронизируем с DTO
    let code = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let comment = RwSignal::new(String::new());
    let is_active = RwSignal::new(true);

    Effect::new(move |_| {
        let form = vm.form.get();
        code.set(form.code.unwrap_or_default());
        description.set(form.description);
        comment.set(form.comment.unwrap_or_default());
        is_active.set(form.is_active);
    });

    let on_save = move |_| {
        vm.form.update_untracked(|f| {
            f.code = to_option(code.get_untracked());
            f.description = description.get_untracked();
            f.comment = to_option(comment.get_untracked());
            f.is_active = is_active.get_untracked();
        });
        vm.save_command(on_saved);
    };

    view! {
        <ModalFrame title=title on_close=on_close>
            {move || vm.error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            <div class="form__group">
                <Label>"Код"</Label>
                <Input value=code placeholder="Сгенерируется автоматически" />
            </div>
            <div class="form__group">
                <Label>"Наименование"</Label>
                <Input value=description placeholder="Например, Бухгалтерия" />
            </div>
            <div class="form__group">
                <Label>"Комментарий"</Label>
                <Textarea value=comment attr:rows=3 />
            </div>
            <div class="form__group">
                <Checkbox checked=is_active label="Активен" />
            </div>

            <div class="modal-footer">
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                    "Отмена"
                </Button>
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=on_save
                    disabled=Signal::derive(move || vm.saving.get())
                >
                    {move || if vm.is_edit_mode() { "Сохранить" } else { "Создать" }}
                </Button>
            </div>
        </ModalFrame>
    }
}
