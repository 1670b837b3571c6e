use crate::shared::icons::icon;
use leptos::prelude::*;

/// Сворачиваемая панель фильтров списка. В заголовке счётчик активных
/// фильтров и (необязательно) пагинация, под панелью чипы фильтров.
#[component]
pub fn FilterPanel(
    is_expanded: RwSignal<bool>,
    #[prop(into)] active_filters_count: Signal<usize>,
    #[prop(optional, into)] pagination_controls: Option<ViewFn>,
    /// Чипы `FilterTag` активных фильтров
    #[prop(optional, into)]
    filter_tags: Option<ViewFn>,
    children: ChildrenFn,
) -> impl IntoView {
    let toggle = move |_| is_expanded.update(|open| *open = !*open);
    let count_badge = move || {
        let count = active_filters_count.get();
        (count > 0).then(|| view! { <span class="badge badge--primary">{count}</span> })
    };

    view! {
        <div class="filter-panel">
            <div class="filter-panel-header">
                <div class="filter-panel-header__left" on:click=toggle>
                    <span
                        class="filter-panel__chevron"
                        class:filter-panel__chevron--expanded=move || is_expanded.get()
                    >
                        {icon("chevron-down")}
                    </span>
                    {icon("filter")}
                    <span class="filter-panel__title">"Фильтры"</span>
                    {count_badge}
                </div>
                <div class="filter-panel-header__center">
                    {pagination_controls.map(|controls| controls.run())}
                </div>
            </div>
            <div
                class="filter-panel__collapsible"
                class:filter-panel__collapsible--expanded=move || is_expanded.get()
                class:filter-panel__collapsible--collapsed=move || !is_expanded.get()
            >
                <div class="filter-panel-content">{children()}</div>
            </div>
            {filter_tags.map(|tags| view! { <div class="filter-panel__tags">{move || tags.run()}</div> })}
        </div>
    }
}

/// Чип активного фильтра с крестиком сброса
#[component]
pub fn FilterTag(#[prop(into)] label: String, on_remove: Callback<()>) -> impl IntoView {
    let remove = move |e: leptos::ev::MouseEvent| {
        e.stop_propagation();
        on_remove.run(());
    };
    view! {
        <div class="filter-tag">
            <span>{label}</span>
            <span class="filter-tag__remove" title="Сбросить" on:click=remove>{icon("x")}</span>
        </div>
    }
}
