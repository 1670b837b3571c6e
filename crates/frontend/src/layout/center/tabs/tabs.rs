use leptos::ev;
use leptos::prelude::*;

use crate::layout::global_context::{use_app_context, Tab};
use crate::layout::tabs::TabPage;

/// Заголовок таба в полосе: клик активирует, крестик закрывает
#[component]
fn TabHeader(tab: Tab) -> impl IntoView {
    let ctx = use_app_context();
    let key = StoredValue::new(tab.key);
    let is_active = Memo::new(move |_| {
        ctx.active
            .with(|active| key.with_value(|k| active.as_deref() == Some(k.as_str())))
    });

    let close = move |e: ev::MouseEvent| {
        e.stop_propagation();
        key.with_value(|k| ctx.close_tab(k));
    };

    view! {
        <div
            class="tabs__tab"
            class:tabs__tab--active=is_active
            title=tab.title.clone()
            on:click=move |_| key.with_value(|k| ctx.activate_tab(k))
        >
            <span class="tabs__tab-title">{tab.title.clone()}</span>
            <button class="tabs__tab-close" title="Закрыть" on:click=close>"×"</button>
        </div>
    }
}

/// Полоса табов и их содержимое. Страницы всех открытых табов живут
/// одновременно, неактивные только скрыты.
#[component]
pub fn Tabs() -> impl IntoView {
    let ctx = use_app_context();
    let has_tabs = move || ctx.opened.with(|tabs| !tabs.is_empty());

    view! {
        <div class="tabs">
            <div class="tabs__bar">
                <For
                    each=move || ctx.opened.get()
                    key=|tab| tab.key.clone()
                    children=|tab| view! { <TabHeader tab=tab /> }
                />
            </div>
            <div class="tabs__content">
                <Show
                    when=has_tabs
                    fallback=|| view! { <div class="tabs__empty">"Выберите раздел в меню слева"</div> }
                >
                    <For
                        each=move || ctx.opened.get()
                        key=|tab| tab.key.clone()
                        children=move |tab| view! { <TabPage tab=tab tabs_store=ctx /> }
                    />
                </Show>
            </div>
        </div>
    }
}
