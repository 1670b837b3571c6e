use contracts::domain::a001_section::aggregate::Section;
use contracts::domain::common::{AggregateId, AggregateRoot};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::cmp::Ordering;
use thaw::*;

use super::details::SectionDetails;
use crate::domain::a001_section::api;
use crate::shared::confirm::confirm;
use crate::shared::icons::icon;
use crate::shared::list_utils::{
    cmp_ci, filter_list, get_sort_class, get_sort_indicator, sort_list, toggle_sort, SearchInput,
    Searchable, Sortable,
};
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::shared::toast::use_toasts;

impl Searchable for Section {
    fn matches_filter(&self, filter: &str) -> bool {
        self.base.code.to_lowercase().contains(filter)
            || self.base.description.to_lowercase().contains(filter)
    }
}

impl Sortable for Section {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "code" => cmp_ci(&self.base.code, &other.base.code),
            "is_active" => self.is_active.cmp(&other.is_active),
            _ => cmp_ci(&self.base.description, &other.base.description),
        }
    }
}

/// Справочник отделов (только администратор)
#[component]
pub fn SectionList() -> impl IntoView {
    let toasts = use_toasts();
    let all_items: RwSignal<Vec<Section>> = RwSignal::new(Vec::new());
    let search = RwSignal::new(String::new());
    let sort_field = RwSignal::new("description".to_string());
    let sort_ascending = RwSignal::new(true);
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    // None — форма закрыта, Some(None) — новый отдел, Some(Some(id)) — редактирование
    let editing: RwSignal<Option<Option<String>>> = RwSignal::new(None);

    let load_data = move || {
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::fetch_sections().await {
                Ok(items) => all_items.set(items),
                Err(e) => set_error.set(Some(format!("Не удалось загрузить отделы: {}", e))),
            }
            set_loading.set(false);
        });
    };
    load_data();

    let visible = Memo::new(move |_| {
        let mut items = filter_list(all_items.get(), &search.get());
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

    let delete_section = move |section: Section| {
        if !confirm(&format!("Удалить отдел «{}»?", section.base.description)) {
            return;
        }
        spawn_local(async move {
            match api::delete_section(&section.base.id.as_string()).await {
                Ok(()) => {
                    toasts.success("Отдел удалён");
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
        <PageFrame page_id="a001_section--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">{Section::list_name()}</h1>
                    <Badge>{move || visible.get().len().to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Primary on_click=move |_| editing.set(Some(None))>
                        {icon("plus")}
                        " Новый"
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
                                placeholder="Код или наименование..."
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
                                {header("is_active", "Статус")}
                                <TableHeaderCell>"Комментарий"</TableHeaderCell>
                                <TableHeaderCell></TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || visible.get()
                                key=|s| (s.base.id.as_string(), s.base.metadata.version)
                                children=move |section: Section| {
                                    let id = section.base.id.as_string();
                                    let for_delete = section.clone();
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout>{section.base.code.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    <a href="#" class="table__link" on:click=move |ev| {
                                                        ev.prevent_default();
                                                        editing.set(Some(Some(id.clone())));
                                                    }>
                                                        {section.base.description.clone()}
                                                    </a>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    {if section.is_active {
                                                        view! { <span class="badge badge--success">"Активен"</span> }.into_any()
                                                    } else {
                                                        view! { <span class="badge badge--neutral">"Отключён"</span> }.into_any()
                                                    }}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    {section.base.comment.clone().unwrap_or_default()}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <Button
                                                    appearance=ButtonAppearance::Subtle
                                                    on_click=move |_| delete_section(for_delete.clone())
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
                    <SectionDetails
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
