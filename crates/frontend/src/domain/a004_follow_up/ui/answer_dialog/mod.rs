use contracts::domain::a004_follow_up::aggregate::{AnswerFollowUpDto, FollowUpView};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a004_follow_up::api;
use crate::shared::modal_frame::ModalFrame;

/// Ответ отдела на запрос. Ответить можно один раз.
#[component]
pub fn AnswerFollowUpDialog(
    follow_up: FollowUpView,
    on_close: Callback<()>,
    on_answered: Callback<FollowUpView>,
) -> impl IntoView {
    let answer = RwSignal::new(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);
    let follow_up_id = follow_up.follow_up.id.to_string();

    let on_submit = move |_| {
        let text = answer.get().trim().to_string();
        if text.is_empty() {
            set_error.set(Some("Текст ответа не может быть пустым".to_string()));
            return;
        }
        set_saving.set(true);
        set_error.set(None);
        let id = follow_up_id.clone();
        spawn_local(async move {
            match api::answer_follow_up(&id, &AnswerFollowUpDto { answer: text }).await {
                Ok(view) => on_answered.run(view),
                Err(e) => {
                    set_error.set(Some(e.to_string()));
                    set_saving.set(false);
                }
            }
        });
    };

    view! {
        <ModalFrame
            title=format!("Ответ на запрос · {}", follow_up.inquiry_code)
            on_close=on_close
            modal_class="modal--wide"
        >
            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            <div class="form__group">
                <Label>{format!("Вопрос от {}", follow_up.author_name)}</Label>
                <div class="follow-up__body">{follow_up.follow_up.body.clone()}</div>
            </div>
            <div class="form__group">
                <Label>"Ответ"</Label>
                <Textarea value=answer attr:rows=6 />
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
                    {move || if saving.get() { "Отправка..." } else { "Ответить" }}
                </Button>
            </div>
        </ModalFrame>
    }
}
