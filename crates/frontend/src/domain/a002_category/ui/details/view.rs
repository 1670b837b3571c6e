use leptos::prelude::*;
use thaw::*;

use super::view_model::CategoryDetailsViewModel;
use crate::domain::a001_section::ui::picker::SectionSelect;
use crate::shared::modal_frame::ModalFrame;

fn to_option(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[component]
pub fn CategoryDetails(
    id: Option<String>,
    on_saved: Callback<()>,
    on_close: Callback<()>,
) -> impl IntoView {
    let vm = CategoryDetailsViewModel::new();
    let title = if id.is_some() {
        "Редактирование категории"
    } else {
        "Новая категория"
    };
    vm.load_if_needed(id);

    let code = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let section_id = RwSignal::new(String::new());
    let comment = RwSignal::new(String::new());
    let is_active = RwSignal::new(true);

    Effect::new(move |_| {
        let form = vm.form.get();
        code.set(form.code.unwrap_or_default());
        description.set(form.description);
        section_id.set(form.section_id.unwrap_or_default());
        comment.set(form.comment.unwrap_or_default());
        is_active.set(form.is_active);
    });

    let on_save = move |_| {
        vm.form.update_untracked(|f| {
            f.code = to_option(code.get_untracked());
            f.description = description.get_untracked();
            f.section_id = to_option(section_id.get_untracked());
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
                <Input value=description />
            </div>
            <div class="form__group">
                <Label>"Отдел"</Label>
                <SectionSelect value=section_id empty_label="Без отдела" />
            </div>
            <div class="form__group">
                <Label>"Комментарий"</Label>
                <Textarea value=comment attr:rows=3 />
            </div>
            <div class="form__group">
                <Checkbox checked=is_active label="Активна" />
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
