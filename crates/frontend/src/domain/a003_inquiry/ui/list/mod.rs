mod state;

use contracts::domain::a003_inquiry::aggregate::Inquiry;
use contracts::domain::a003_inquiry::list::{
    InquiryListItem, InquiryListScope, InquirySortField,
};
use contracts::domain::a003_inquiry::status::InquiryStatus;
use contracts::system::users::{Role, UserShort};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::create::CreateInquiryForm;
use crate::domain::a002_category::ui::picker::CategorySelect;
use crate::domain::a003_inquiry::api;
use crate::layout::global_context::use_app_context;
use crate::shared::components::filter_panel::{FilterPanel, FilterTag};
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::status_tabs::StatusTabs;
use crate::shared::date_utils::format_datetime;
use crate::shared::icons::icon;
use crate::shared::list_utils::{
    get_sort_class, get_sort_indicator, highlight_matches, SearchInput, MIN_SEARCH_LEN,
};
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::shared::toast::use_toasts;
use crate::system::auth::context::use_auth;
use crate::system::users::api as users_api;
use state::{create_state, InquiryListState};

fn page_title(scope: InquiryListScope) -> &'static str {
    match scope {
        InquiryListScope::Mine => "Мои обращения",
        InquiryListScope::Assigned => "Назначенные обращения",
        InquiryListScope::Section => "Обращения отдела",
        InquiryListScope::All => "Все обращения",
    }
}

/// Фильтр по тренеру имеет смысл только там, где сервер его принимает
fn trainer_filter_visible(scope: InquiryListScope, role: Option<Role>) -> bool {
    match scope {
        InquiryListScope::All => true,
        InquiryListScope::Assigned => role == Some(Role::Admin),
        _ => false,
    }
}

fn unassigned_filter_visible(scope: InquiryListScope) -> bool {
    matches!(scope, InquiryListScope::Assigned | InquiryListScope::All)
}

fn non_empty(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

/// Поиск уходит на сервер только с минимальной длины
fn search_param(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (trimmed.chars().count() >= MIN_SEARCH_LEN).then(|| trimmed.to_string())
}

/// Список обращений. Фильтрация, сортировка и пагинация на сервере.
#[component]
pub fn InquiryList(scope: InquiryListScope) -> impl IntoView {
    let ctx = use_app_context();
    let toasts = use_toasts();
    let (auth_state, _) = use_auth();
    let role = auth_state.get_untracked().role();

    let state = create_state(scope);
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);
    let show_create = RwSignal::new(false);
    let filters_expanded = RwSignal::new(false);
    let trainers: RwSignal<Vec<UserShort>> = RwSignal::new(Vec::new());

    // поля панели фильтров, применяются кнопкой
    let category_filter = RwSignal::new(String::new());
    let trainer_filter = RwSignal::new(String::new());
    let unassigned_filter = RwSignal::new(false);
    let status_tab: RwSignal<Option<InquiryStatus>> = RwSignal::new(None);
    let search_text = RwSignal::new(String::new());

    let load_data = move || {
        let query = state.with_untracked(|s| s.query.clone());
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::fetch_inquiries(&query).await {
                Ok(response) => state.update(|s| s.apply_response(response)),
                Err(e) => set_error.set(Some(format!("Не удалось загрузить обращения: {}", e))),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        if !state.with_untracked(|s| s.is_loaded) {
            load_data();
        }
    });

    if trainer_filter_visible(scope, role) {
        spawn_local(async move {
            match users_api::fetch_trainers().await {
                Ok(list) => trainers.set(list),
                Err(e) => log::warn!("trainers not loaded: {}", e),
            }
        });
    }

    let apply_filters = move || {
        state.update(|s| {
            s.query.category_id = non_empty(category_filter.get_untracked());
            s.query.trainer_id = non_empty(trainer_filter.get_untracked());
            s.query.include_unassigned = unassigned_filter.get_untracked();
            s.query.page = 0;
        });
        load_data();
    };

    let reset_filters = move || {
        category_filter.set(String::new());
        trainer_filter.set(String::new());
        unassigned_filter.set(false);
        apply_filters();
    };

    let on_status_change = Callback::new(move |status: Option<InquiryStatus>| {
        state.update(|s| {
            s.query.status = status;
            s.query.page = 0;
        });
        load_data();
    });

    let on_search = Callback::new(move |value: String| {
        search_text.set(value.clone());
        let search = search_param(&value);
        if state.with_untracked(|s| s.query.search == search) {
            return;
        }
        state.update(|s| {
            s.query.search = search;
            s.query.page = 0;
        });
        load_data();
    });

    let sort_by = move |field: InquirySortField| {
        move |_| {
            state.update(|s| {
                if s.query.sort_field == field {
                    s.query.sort_ascending = !s.query.sort_ascending;
                } else {
                    s.query.sort_field = field;
                    // даты по умолчанию от новых к старым
                    s.query.sort_ascending = !matches!(
                        field,
                        InquirySortField::CreatedAt | InquirySortField::LastActivityAt
                    );
                }
                s.query.page = 0;
            });
            load_data();
        }
    };

    let go_to_page = move |page: usize| {
        state.update(|s| s.query.page = page);
        load_data();
    };

    let change_page_size = move |size: usize| {
        state.update(|s| {
            s.query.page_size = size;
            s.query.page = 0;
        });
        load_data();
    };

    let header = move |field: InquirySortField, title: &'static str| {
        let key = field.as_str();
        view! {
            <TableHeaderCell>
                <div class="table__sortable-header" on:click=sort_by(field)>
                    {title}
                    <span class=move || state.with(|s| get_sort_class(s.query.sort_field.as_str(), key))>
                        {move || state.with(|s| get_sort_indicator(s.query.sort_field.as_str(), key, s.query.sort_ascending))}
                    </span>
                </div>
            </TableHeaderCell>
        }
    };

    let category_name_of = move |id: &str| {
        state.with_untracked(|s| {
            s.items
                .iter()
                .find(|i| i.category_id == id)
                .map(|i| i.category_name.clone())
        })
    };
    let trainer_name_of = move |id: &str| {
        trainers.with_untracked(|list| {
            list.iter()
                .find(|t| t.id == id)
                .map(|t| t.display_name.clone())
        })
    };

    let filter_content = move || {
        view! {
            <Flex gap=FlexGap::Small align=FlexAlign::End>
                <div style="width: 240px;">
                    <Label>"Категория"</Label>
                    <CategorySelect value=category_filter include_inactive=true empty_label="Все категории" />
                </div>
                <Show when=move || trainer_filter_visible(scope, role)>
                    <div style="width: 240px;">
                        <Label>"Тренер"</Label>
                        <Select value=trainer_filter>
                            <option value="">"Все тренеры"</option>
                            <For
                                each=move || trainers.get()
                                key=|t| t.id.clone()
                                children=move |t: UserShort| {
                                    view! { <option value=t.id.clone()>{t.display_name.clone()}</option> }
                                }
                            />
                        </Select>
                    </div>
                </Show>
                <Show when=move || unassigned_filter_visible(scope)>
                    <Checkbox checked=unassigned_filter label="Включая без тренера" />
                </Show>
                <Button appearance=ButtonAppearance::Primary on_click=move |_| apply_filters()>
                    "Применить"
                </Button>
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| reset_filters()>
                    "Сбросить"
                </Button>
            </Flex>
        }
    };

    let filter_tags = move || {
        let q = state.with(|s| s.query.clone());
        view! {
            {q.category_id.clone().map(|id| {
                let label = category_name_of(&id).unwrap_or_else(|| "выбрана".to_string());
                view! {
                    <FilterTag
                        label=format!("Категория: {}", label)
                        on_remove=Callback::new(move |_| {
                            category_filter.set(String::new());
                            apply_filters();
                        })
                    />
                }
            })}
            {q.trainer_id.clone().map(|id| {
                let label = trainer_name_of(&id).unwrap_or(id);
                view! {
                    <FilterTag
                        label=format!("Тренер: {}", label)
                        on_remove=Callback::new(move |_| {
                            trainer_filter.set(String::new());
                            apply_filters();
                        })
                    />
                }
            })}
            {q.include_unassigned.then(|| view! {
                <FilterTag
                    label="Без тренера"
                    on_remove=Callback::new(move |_| {
                        unassigned_filter.set(false);
                        apply_filters();
                    })
                />
            })}
        }
    };

    let pagination = move || {
        view! {
            <PaginationControls
                current_page=Signal::derive(move || state.with(|s| s.query.page))
                total_pages=Signal::derive(move || state.with(|s| s.total_pages))
                total_count=Signal::derive(move || state.with(|s| s.total_count))
                page_size=Signal::derive(move || state.with(|s| s.query.page_size))
                on_page_change=Callback::new(go_to_page)
                on_page_size_change=Callback::new(change_page_size)
            />
        }
    };

    let open_inquiry = move |item: &InquiryListItem| ctx.open_inquiry(&item.id, &item.code);

    view! {
        <PageFrame page_id=format_page_id(scope) category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">{page_title(scope)}</h1>
                    <Badge>{move || state.with(|s| s.total_count.to_string())}</Badge>
                </div>
                <div class="page__header-right">
                    <Show when=move || scope == InquiryListScope::Mine>
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=move |_| show_create.set(true)
                        >
                            {icon("plus")}
                            " Новое обращение"
                        </Button>
                    </Show>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load_data()
                        disabled=Signal::derive(move || loading.get())
                    >
                        {icon("refresh")}
                        {move || if loading.get() { " Загрузка..." } else { " Обновить" }}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <StatusTabs
                    selected=status_tab
                    counts=Signal::derive(move || state.with(|s| s.status_counts))
                    on_change=on_status_change
                />

                <div class="list-toolbar">
                    <SearchInput
                        value=Signal::derive(move || search_text.get())
                        on_change=on_search
                        placeholder="Код, тема или текст обращения..."
                    />
                </div>

                <FilterPanel
                    is_expanded=filters_expanded
                    active_filters_count=Signal::derive(move || state.with(|s| s.active_filters_count()))
                    pagination_controls=pagination
                    filter_tags=filter_tags
                >
                    {filter_content()}
                </FilterPanel>

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                {header(InquirySortField::Code, "Код")}
                                {header(InquirySortField::Title, "Тема")}
                                {header(InquirySortField::Status, "Статус")}
                                <TableHeaderCell>"Категория"</TableHeaderCell>
                                <TableHeaderCell>"Автор"</TableHeaderCell>
                                <TableHeaderCell>"Тренер"</TableHeaderCell>
                                {header(InquirySortField::CreatedAt, "Создано")}
                                {header(InquirySortField::LastActivityAt, "Активность")}
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || state.with(|s| s.items.clone())
                                key=|i| (i.id.clone(), i.last_activity_at, i.status)
                                children=move |item: InquiryListItem| {
                                    let query = search_text.get_untracked();
                                    let for_open = item.clone();
                                    let title_query = query.clone();
                                    view! {
                                        <TableRow
                                            on:click=move |_| open_inquiry(&for_open)
                                            attr:style="cursor: pointer;"
                                        >
                                            <TableCell>
                                                <TableCellLayout>
                                                    <span style="font-family: monospace;">{highlight_matches(&item.code, &query)}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    {highlight_matches(&item.title, &title_query)}
                                                    {(item.reopen_count > 0).then(|| view! {
                                                        <span class="badge badge--warning" title="Сколько раз открывалось повторно">
                                                            {format!("↻{}", item.reopen_count)}
                                                        </span>
                                                    })}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <span class=item.status.badge_class()>{item.status.label()}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{item.category_name.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{item.author_name.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    {item.trainer_name.clone().unwrap_or_else(|| "—".to_string())}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{format_datetime(&item.created_at)}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{format_datetime(&item.last_activity_at)}</TableCellLayout>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                    <Show when=move || state.with(|s| s.is_loaded && s.items.is_empty())>
                        <div class="table__empty">"Обращений не найдено"</div>
                    </Show>
                </div>

                {move || show_create.get().then(|| view! {
                    <CreateInquiryForm
                        on_close=Callback::new(move |_| show_create.set(false))
                        on_created=Callback::new(move |inquiry: Inquiry| {
                            show_create.set(false);
                            toasts.success(format!("Обращение {} создано", inquiry.base.code));
                            load_data();
                            ctx.open_inquiry(&inquiry.to_string_id(), &inquiry.base.code);
                        })
                    />
                })}
            </div>
        </PageFrame>
    }
}

fn format_page_id(scope: InquiryListScope) -> &'static str {
    match scope {
        InquiryListScope::Mine => "a003_inquiry--list_mine",
        InquiryListScope::Assigned => "a003_inquiry--list_assigned",
        InquiryListScope::Section => "a003_inquiry--list_section",
        InquiryListScope::All => "a003_inquiry--list_all",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::page_standard::split_page_id;

    #[test]
    fn test_trainer_filter_visibility() {
        assert!(trainer_filter_visible(InquiryListScope::All, Some(Role::Admin)));
        assert!(trainer_filter_visible(InquiryListScope::Assigned, Some(Role::Admin)));
        assert!(!trainer_filter_visible(InquiryListScope::Assigned, Some(Role::Trainer)));
        assert!(!trainer_filter_visible(InquiryListScope::Mine, Some(Role::Admin)));
    }

    #[test]
    fn test_search_param_requires_min_length() {
        assert_eq!(search_param(" ab "), None);
        assert_eq!(search_param(" vpn ").as_deref(), Some("vpn"));
    }

    #[test]
    fn test_active_filters_count() {
        let mut state = InquiryListState::new(InquiryListScope::All);
        assert_eq!(state.active_filters_count(), 0);
        state.query.category_id = Some("c1".into());
        state.query.include_unassigned = true;
        assert_eq!(state.active_filters_count(), 2);
    }

    #[test]
    fn test_page_ids_follow_standard() {
        for scope in [
            InquiryListScope::Mine,
            InquiryListScope::Assigned,
            InquiryListScope::Section,
            InquiryListScope::All,
        ] {
            assert!(split_page_id(format_page_id(scope)).is_some(), "{}", format_page_id(scope));
        }
    }
}
