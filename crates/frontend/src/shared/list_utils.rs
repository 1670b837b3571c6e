/// Универсальные утилиты для работы со списками (поиск, сортировка, UI компоненты)
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use std::cmp::Ordering;

/// Минимальная длина строки, с которой включается поиск
pub const MIN_SEARCH_LEN: usize = 3;

const SEARCH_DEBOUNCE_MS: u32 = 300;

/// Trait для типов данных, поддерживающих поиск
pub trait Searchable {
    /// Проверяет, соответствует ли объект поисковому запросу (уже в нижнем регистре)
    fn matches_filter(&self, filter: &str) -> bool;
}

/// Trait для типов данных, поддерживающих сортировку
pub trait Sortable {
    /// Сравнивает два объекта по указанному полю
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering;
}

fn is_search_active(filter: &str) -> bool {
    filter.trim().chars().count() >= MIN_SEARCH_LEN
}

/// Подсветка совпадений в тексте (case-insensitive)
pub fn highlight_matches(text: &str, filter: &str) -> AnyView {
    let filter_lower = filter.trim().to_lowercase();
    let text_lower = text.to_lowercase();
    // байтовые позиции совпадают, только если регистр не меняет длину строки
    if !is_search_active(filter)
        || text_lower.len() != text.len()
        || !text_lower.contains(&filter_lower)
    {
        return view! { <span>{text.to_string()}</span> }.into_any();
    }

    let mut parts: Vec<AnyView> = Vec::new();
    let mut last_pos = 0;

    while let Some(pos) = text_lower[last_pos..].find(&filter_lower) {
        let actual_pos = last_pos + pos;
        if actual_pos > last_pos {
            parts.push(view! { <span>{text[last_pos..actual_pos].to_string()}</span> }.into_any());
        }
        let match_end = actual_pos + filter_lower.len();
        parts.push(
            view! { <mark class="search-highlight">{text[actual_pos..match_end].to_string()}</mark> }
                .into_any(),
        );
        last_pos = match_end;
    }

    if last_pos < text.len() {
        parts.push(view! { <span>{text[last_pos..].to_string()}</span> }.into_any());
    }

    view! { <>{parts}</> }.into_any()
}

/// Сортирует список по указанному полю
pub fn sort_list<T: Sortable>(items: &mut [T], field: &str, ascending: bool) {
    items.sort_by(|a, b| {
        let cmp = a.compare_by_field(b, field);
        if ascending {
            cmp
        } else {
            cmp.reverse()
        }
    });
}

/// Фильтрует список по поисковому запросу
pub fn filter_list<T: Searchable>(items: Vec<T>, filter: &str) -> Vec<T> {
    if !is_search_active(filter) {
        return items;
    }
    let filter = filter.trim().to_lowercase();
    items
        .into_iter()
        .filter(|item| item.matches_filter(&filter))
        .collect()
}

/// Сравнение строк без учёта регистра
pub fn cmp_ci(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Компонент поиска с debounce и кнопкой очистки
#[component]
pub fn SearchInput(
    /// Текущее значение фильтра (для отображения)
    #[prop(into)]
    value: Signal<String>,
    /// Callback для обновления значения фильтра
    #[prop(into)]
    on_change: Callback<String>,
    /// Placeholder текст
    #[prop(optional, into)]
    placeholder: String,
) -> impl IntoView {
    let placeholder = if placeholder.is_empty() {
        format!("Поиск (мин. {} символа)...", MIN_SEARCH_LEN)
    } else {
        placeholder
    };

    // Локальное состояние для input (до debounce)
    let input_value = RwSignal::new(value.get_untracked());
    let pending = StoredValue::new_local(None::<Timeout>);

    let handle_input_change = move |new_value: String| {
        input_value.set(new_value.clone());
        // предыдущий таймер отменяется при drop
        let timeout = Timeout::new(SEARCH_DEBOUNCE_MS, move || on_change.run(new_value));
        pending.set_value(Some(timeout));
    };

    let clear_filter = move |_| {
        pending.set_value(None);
        input_value.set(String::new());
        on_change.run(String::new());
    };

    view! {
        <div class="search-input">
            <input
                type="text"
                placeholder=placeholder
                class="search-input__field"
                class:search-input__field--active=move || is_search_active(&value.get())
                prop:value=move || input_value.get()
                on:input=move |ev| handle_input_change(event_target_value(&ev))
            />
            <Show when=move || !input_value.get().is_empty()>
                <button class="search-input__clear" on:click=clear_filter title="Очистить">
                    {crate::shared::icons::icon("x")}
                </button>
            </Show>
        </div>
    }
}

/// Получить индикатор сортировки для заголовка
pub fn get_sort_indicator(current_field: &str, field: &str, ascending: bool) -> &'static str {
    if current_field == field {
        if ascending {
            " ▲"
        } else {
            " ▼"
        }
    } else {
        " ⇅"
    }
}

/// CSS-класс заголовка сортируемой колонки
pub fn get_sort_class(current_field: &str, field: &str) -> &'static str {
    if current_field == field {
        "table__sortable-header table__sortable-header--active"
    } else {
        "table__sortable-header"
    }
}

/// Новое состояние сортировки после клика по колонке:
/// повторный клик меняет направление, новая колонка сортируется по возрастанию
pub fn toggle_sort(current_field: &str, ascending: bool, clicked: &str) -> (String, bool) {
    if current_field == clicked {
        (clicked.to_string(), !ascending)
    } else {
        (clicked.to_string(), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Row {
        name: &'static str,
        n: i32,
    }

    impl Searchable for Row {
        fn matches_filter(&self, filter: &str) -> bool {
            self.name.to_lowercase().contains(filter)
        }
    }

    impl Sortable for Row {
        fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
            match field {
                "name" => cmp_ci(self.name, other.name),
                _ => self.n.cmp(&other.n),
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "Бухгалтерия", n: 2 },
            Row { name: "access", n: 3 },
            Row { name: "Billing", n: 1 },
        ]
    }

    #[test]
    fn test_filter_requires_min_length() {
        assert_eq!(filter_list(rows(), "bi").len(), 3);
        let found = filter_list(rows(), " BILL ");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Billing");
    }

    #[test]
    fn test_sort_both_directions() {
        let mut items = rows();
        sort_list(&mut items, "n", true);
        assert_eq!(items.iter().map(|r| r.n).collect::<Vec<_>>(), vec![1, 2, 3]);
        sort_list(&mut items, "name", false);
        assert_eq!(items[0].name, "Бухгалтерия");
        assert_eq!(items[2].name, "access");
    }

    #[test]
    fn test_sort_indicator_and_class() {
        assert_eq!(get_sort_indicator("code", "code", true), " ▲");
        assert_eq!(get_sort_indicator("code", "code", false), " ▼");
        assert_eq!(get_sort_indicator("code", "title", true), " ⇅");
        assert!(get_sort_class("code", "code").ends_with("--active"));
        assert_eq!(get_sort_class("code", "title"), "table__sortable-header");
    }

    #[test]
    fn test_toggle_sort() {
        assert_eq!(toggle_sort("code", true, "code"), ("code".to_string(), false));
        assert_eq!(toggle_sort("code", false, "title"), ("title".to_string(), true));
    }
}
