use contracts::domain::a002_category::aggregate::Category;
use contracts::domain::common::{AggregateId, AggregateRoot};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::cmp::Ordering;
use std::collections::HashMap;
use thaw::*;

use super::details::CategoryDetails;
use crate::domain::a001_section::api as section_api;
use crate::domain::a002_category::api;
use crate::shared::confirm::confirm;
use crate::shared::icons::icon;
use crate::shared::list_utils::{
    cmp_ci, filter_list, get_sort_class, get_sort_indicator, sort_list, toggle_sort, SearchInput,
    Searchable, Sortable,
};
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::shared::toast::use_toasts;

#[derive(Clone, Debug, PartialEq)]
struct CategoryRow {
    category: Category,
    section_name: String,
}

impl Searchable for CategoryRow {
    fn matches_filter(&self, filter: &str) -> bool {
        self.category.base.code.to_lowercase().contains(filter)
            || self.category.base.description.to_lowercase().contains(filter)
            || self.section_name.to_lowercase().contains(filter)
    }
}

impl Sortable for CategoryRow {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "code" => cmp_ci(&self.category.base.code, &other.category.base.code),
            "section" => cmp_ci(&self.section_name, &other.section_name),
            "is_active" => self.category.is_active.cmp(&other.category.is_active),
            _ => cmp_ci(&self.category.base.description, &other.category.base.description),
        }
    }
}

fn build_rows(categories: Vec<Category>, sections: &HashMap<String, String>) -> Vec<CategoryRow> {
    categories
        .into_iter()
        .map(|category| {
            let section_name = category
                .section_id
                .and_then(|id| sections.get(&id.as_string()).cloned())
                .unwrap_or_default();
            CategoryRow {
                category,
                section_name,
            }
        })
        .collect()
}

/// Справочник категорий обращений (только администратор)
#[component]
pub fn CategoryList() -> impl IntoView {
    let toasts = use_toasts();
    let rows: RwSignal<Vec<CategoryRow>> = RwSignal::new(Vec::new());
    let search = RwSignal::new(String::new());
    let sort_field = RwSignal::new("description".to_string());
    let sort_ascending = RwSignal::new(true);
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    let editing: RwSignal<Option<Option<String>>> = RwSignal::new(None);

    let load_data = move || {
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            let sections: HashMap<String, String> = match section_api::fetch_sections().await {
                Ok(list) => list
                    .into_iter()
                    .map(|s| (s.base.id.as_string(), s.base.description))
                    .collect(),
                Err(e) => {
                    log::warn!("sections not loaded: {}", e);
                    HashMap::new()
                }
            };
            match api::fetch_categories(false).await {
                Ok(items) => rows.set(build_rows(items, &sections)),
                Err(e) => set_error.set(Some(format!("Не удалось загрузить категории: {}", e))),
            }
            set_loading.set(false);
        });
    };
    load_data();

    let visible = Memo::new(move |_| {
        let mut items = filter_list(rows.get(), &search.get());
        sort_list(&mut items, &sort_field.get(), sort_ascending.get());
        items
    });

    let sort_by = move |field: &'static str| {
        move |_| {
            let (f, asc) = toggle_sort(&sort_field.get_untracked(), sort_ascending.get_untracked(), field);
            sort_field.set(f);
            sort_ascending.set(asc);
        }
    };

    let delete_category = move |category: Category| {
        if !confirm(&format!("Удалить категорию «{}»?", category.base.description)) {
            return;
        }
        spawn_local(async move {
            match api::delete_category(&category.base.id.as_string()).await {
                Ok(()) => {
                    toasts.success("Категория удалена");
                    load_data();
                }
                Err(e) => toasts.api_error(&e),
            }
        });
    };

    let header = move |field: &'static str, title: &'static str| {
        view! {
            <TableHeaderCell>
                <div class="table__sortable-header" on:click=sort_by(field)>
                    {title}
                    <span class=move || get_sort_class(&sort_field.get(), field)>
                        {move || get_sort_indicator(&sort_field.get(), field, sort_ascending.get())}
                    </span>
                </div>
            </TableHeaderCell>
        }
    };

    view! {
        <PageFrame page_id="a002_category--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">{Category::list_name()}</h1>
                    <Badge>{move || visible.get().len().to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| editing.set(Some(None))>
                        {icon("plus")}
                        " Новая"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load_data()
                        disabled=Signal::derive(move || loading.get())
                    >
                        {icon("refresh")}
                        " Обновить"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <div class="filter-panel">
                    <div class="filter-panel-content">
                        <div style="max-width: 320px;">
                            <SearchInput
                                value=Signal::derive(move || search.get())
                                on_change=Callback::new(move |v: String| search.set(v))
                                placeholder="Код, наименование или отдел..."
                            />
                        </div>
                    </div>
                </div>

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                {header("code", "Код")}
                                {header("description", "Наименование")}
                                {header("section", "Отдел")}
                                {header("is_active", "Статус")}
                                <TableHeaderCell></TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || visible.get()
                                key=|r| (r.category.base.id.as_string(), r.category.base.metadata.version)
                                children=move |row: CategoryRow| {
                                    let category = row.category.clone();
                                    let id = category.base.id.as_string();
                                    let for_delete = category.clone();
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout>{category.base.code.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    <a href="#" class="table__link" on:click=move |ev| {
                                                        ev.prevent_default();
                                                        editing.set(Some(Some(id.clone())));
                                                    }>
                                                        {category.base.description.clone()}
                                                    </a>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{row.section_name.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    {if category.is_active {
                                                        view! { <span class="badge badge--success">"Активна"</span> }.into_any()
                                                    } else {
                                                        view! { <span class="badge badge--neutral">"Отключена"</span> }.into_any()
                                                    }}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <Button
                                                    appearance=ButtonAppearance::Subtle
                                                    on_click=move |_| delete_category(for_delete.clone())
                                                    attr:title="Удалить"
                                                >
                                                    {icon("trash")}
                                                </Button>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                </div>

                {move || editing.get().map(|id| view! {
                    <CategoryDetails
                        id=id
                        on_saved=Callback::new(move |_| {
                            editing.set(None);
                            load_data();
                        })
                        on_close=Callback::new(move |_| editing.set(None))
                    />
                })}
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_section::aggregate::SectionId;

    #[test]
    fn test_rows_resolve_section_name() {
        let section = SectionId::new_v4();
        let with_section = Category::new_for_insert(
            "CAT-1".into(),
            "Доступы".into(),
            Some(section),
            None,
            true,
        );
        let orphan = Category::new_for_insert("CAT-2".into(), "Прочее".into(), None, None, true);
        let names = HashMap::from([(section.as_string(), "ИТ-отдел".to_string())]);

        let rows = build_rows(vec![with_section, orphan], &names);
        assert_eq!(rows[0].section_name, "ИТ-отдел");
        assert_eq!(rows[1].section_name, "");
        assert_eq!(filter_list(rows, "ит-о").len(), 1);
    }
}
