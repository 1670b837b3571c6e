use leptos::prelude::*;

use super::registry::render_tab_content;
use crate::layout::global_context::{AppGlobalContext, Tab};

/// Содержимое одного таба. Страница строится один раз при открытии,
/// переключение табов только меняет `tabs__item--hidden`, так что
/// фильтры и прокрутка списка сохраняются.
#[component]
pub fn TabPage(tab: Tab, tabs_store: AppGlobalContext) -> impl IntoView {
    let key = StoredValue::new(tab.key.clone());
    let hidden = move || {
        tabs_store
            .active
            .with(|active| key.with_value(|k| active.as_deref() != Some(k.as_str())))
    };
    on_cleanup(move || log::debug!("tab '{}' closed", key.get_value()));

    view! {
        <div class="tabs__item" class:tabs__item--hidden=hidden data-tab-key=tab.key.clone()>
            {render_tab_content(&tab.key, tabs_store)}
        </div>
    }
}
