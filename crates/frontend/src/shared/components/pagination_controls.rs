use crate::shared::icons::icon;
use contracts::shared::pagination::{normalize_page_size, DEFAULT_PAGE_SIZE};
use leptos::prelude::*;

const PAGE_SIZE_OPTIONS: [usize; 4] = [10, DEFAULT_PAGE_SIZE, 50, 100];

/// Куда ведут кнопки навигации; `None` — кнопка неактивна
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNav {
    pub first: Option<usize>,
    pub prev: Option<usize>,
    pub next: Option<usize>,
    pub last: Option<usize>,
}

impl PageNav {
    /// `page` с нуля; сервер всегда отдаёт хотя бы одну страницу
    pub fn new(page: usize, total_pages: usize) -> Self {
        let last = total_pages.max(1) - 1;
        let page = page.min(last);
        Self {
            first: (page > 0).then_some(0),
            prev: page.checked_sub(1),
            next: (page < last).then_some(page + 1),
            last: (page < last).then_some(last),
        }
    }
}

pub fn page_summary(page: usize, total_pages: usize, total_count: usize) -> String {
    format!(
        "Стр. {} из {} · всего {}",
        page + 1,
        total_pages.max(1),
        total_count
    )
}

/// Навигация по страницам серверного списка
#[component]
pub fn PaginationControls(
    #[prop(into)] current_page: Signal<usize>,
    #[prop(into)] total_pages: Signal<usize>,
    #[prop(into)] total_count: Signal<usize>,
    #[prop(into)] page_size: Signal<usize>,
    on_page_change: Callback<usize>,
    on_page_size_change: Callback<usize>,
) -> impl IntoView {
    let nav = Memo::new(move |_| PageNav::new(current_page.get(), total_pages.get()));

    let nav_button = move |icon_name: &'static str,
                           title: &'static str,
                           target: fn(&PageNav) -> Option<usize>| {
        view! {
            <button
                class="pagination-btn"
                title=title
                disabled=move || nav.with(|n| target(n).is_none())
                on:click=move |_| {
                    if let Some(page) = nav.with_untracked(|n| target(n)) {
                        on_page_change.run(page);
                    }
                }
            >
                {icon(icon_name)}
            </button>
        }
    };

    view! {
        <div class="pagination-controls">
            {nav_button("chevrons-left", "Первая страница", |n| n.first)}
            {nav_button("chevron-left", "Предыдущая страница", |n| n.prev)}
            <span class="pagination-info">
                {move || page_summary(current_page.get(), total_pages.get(), total_count.get())}
            </span>
            {nav_button("chevron-right", "Следующая страница", |n| n.next)}
            {nav_button("chevrons-right", "Последняя страница", |n| n.last)}
            <select
                class="page-size-select"
                prop:value=move || page_size.get().to_string()
                on:change=move |ev| {
                    let size = event_target_value(&ev).parse().unwrap_or(DEFAULT_PAGE_SIZE);
                    on_page_size_change.run(normalize_page_size(size));
                }
            >
                {PAGE_SIZE_OPTIONS
                    .iter()
                    .map(|&size| view! {
                        <option value=size.to_string() selected=move || page_size.get() == size>
                            {size}
                        </option>
                    })
                    .collect_view()}
            </select>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_on_middle_page() {
        let nav = PageNav::new(2, 5);
        assert_eq!(nav.first, Some(0));
        assert_eq!(nav.prev, Some(1));
        assert_eq!(nav.next, Some(3));
        assert_eq!(nav.last, Some(4));
    }

    #[test]
    fn test_nav_on_single_page() {
        let nav = PageNav::new(0, 0);
        assert_eq!(
            nav,
            PageNav {
                first: None,
                prev: None,
                next: None,
                last: None
            }
        );
        assert_eq!(page_summary(0, 0, 0), "Стр. 1 из 1 · всего 0");
    }
}
