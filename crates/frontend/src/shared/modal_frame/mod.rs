use gloo_timers::future::TimeoutFuture;
use leptos::ev;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::shared::icons::icon;

/// Клик пришёл в сам элемент-обработчик, а не всплыл из потомка
fn hits_self(e: &ev::MouseEvent) -> bool {
    matches!((e.target(), e.current_target()), (Some(t), Some(ct)) if t == ct)
}

/// Модальное окно: затемнение, заголовок с крестиком, тело.
/// Кнопки формы рисуются внутри `children` в блоке `div.modal-footer`.
/// Закрывается крестиком, Escape и кликом по затемнению.
#[component]
pub fn ModalFrame(
    #[prop(into)] title: String,
    on_close: Callback<()>,
    /// Дополнительный класс для `div.modal` (ширина формы)
    #[prop(optional, into)]
    modal_class: Option<String>,
    children: Children,
) -> impl IntoView {
    // нажатие и отпускание оба должны быть на затемнении,
    // иначе выделение текста мышью закрывало бы форму
    let pressed_on_overlay = RwSignal::new(false);

    let escape = window_event_listener(ev::keydown, move |e| {
        if e.key() == "Escape" {
            on_close.run(());
        }
    });
    on_cleanup(move || escape.remove());

    let on_overlay_click = move |e: ev::MouseEvent| {
        let close = pressed_on_overlay.get_untracked() && hits_self(&e);
        pressed_on_overlay.set(false);
        if close {
            // окно нельзя удалять из DOM посреди обработки его же клика
            spawn_local(async move {
                TimeoutFuture::new(0).await;
                on_close.run(());
            });
        }
    };

    let class = modal_class.map_or_else(|| "modal".to_string(), |c| format!("modal {c}"));

    view! {
        <div
            class="modal-overlay"
            on:mousedown=move |e| pressed_on_overlay.set(hits_self(&e))
            on:click=on_overlay_click
        >
            <div class=class on:click=|e: ev::MouseEvent| e.stop_propagation()>
                <div class="modal-header">
                    <h3 class="modal-title">{title}</h3>
                    <button class="modal-close" title="Закрыть" on:click=move |_| on_close.run(())>
                        {icon("x")}
                    </button>
                </div>
                <div class="modal-body">{children()}</div>
            </div>
        </div>
    }
}
