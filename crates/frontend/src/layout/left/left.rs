use crate::layout::global_context::use_app_context;
use leptos::prelude::*;

#[component]
pub fn Left(children: Children) -> impl IntoView {
    let ctx = use_app_context();
    let is_open = move || ctx.left_open.get();

    view! {
        <div data-zone="left" class="app-sidebar" class:app-sidebar--hidden=move || !is_open()>
            {children()}
        </div>
    }
}
