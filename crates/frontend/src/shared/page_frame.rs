use leptos::prelude::*;

use super::page_standard::{category_class, split_page_id};

/// Корень страницы в табе: `id`, `data-page-category` и класс по категории
#[component]
pub fn PageFrame(
    /// `{сущность}--{категория}`
    page_id: &'static str,
    /// Одна из констант `PAGE_CAT_*`
    category: &'static str,
    #[prop(optional)] class: &'static str,
    children: Children,
) -> impl IntoView {
    debug_assert!(split_page_id(page_id).is_some(), "bad page id: {}", page_id);
    let base = category_class(category).unwrap_or_else(|| {
        log::warn!("page {} has unknown category '{}'", page_id, category);
        "page"
    });
    let class = [base, class]
        .into_iter()
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    view! {
        <div id=page_id class=class data-page-category=category>
            {children()}
        </div>
    }
}
