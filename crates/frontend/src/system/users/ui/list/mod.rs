mod state;

use contracts::domain::a001_section::aggregate::Section;
use contracts::domain::common::AggregateId;
use contracts::system::users::{Role, User};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::cmp::Ordering;
use std::collections::HashMap;
use thaw::*;

use crate::domain::a001_section::api as section_api;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::confirm::confirm;
use crate::shared::date_utils::format_date;
use crate::shared::icons::icon;
use crate::shared::list_utils::{
    cmp_ci, get_sort_class, get_sort_indicator, highlight_matches,
    toggle_sort, SearchInput, Searchable, Sortable,
};
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_SYSTEM;
use crate::shared::toast::use_toasts;
use crate::system::auth::context::use_auth;
use crate::system::auth::guard::RequireAdmin;
use crate::system::users::api;
use state::{create_state, UsersListState};

const TABLE_ID: &str = "sys-users-table";

/// Пользователь вместе с наименованием отдела для таблицы
#[derive(Clone, Debug)]
pub struct UserRow {
    pub user: User,
    pub section_name: String,
}

impl Searchable for UserRow {
    fn matches_filter(&self, filter: &str) -> bool {
        self.user.username.to_lowercase().contains(filter)
            || self
                .user
                .full_name
                .as_deref()
                .unwrap_or("")
                .to_lowercase()
                .contains(filter)
            || self
                .user
                .email
                .as_deref()
                .unwrap_or("")
                .to_lowercase()
                .contains(filter)
            || self.section_name.to_lowercase().contains(filter)
    }
}

impl Sortable for UserRow {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        let (a, b) = (&self.user, &other.user);
        match field {
            "username" => cmp_ci(&a.username, &b.username),
            "full_name" => cmp_ci(
                a.full_name.as_deref().unwrap_or(""),
                b.full_name.as_deref().unwrap_or(""),
            ),
            "email" => cmp_ci(a.email.as_deref().unwrap_or(""), b.email.as_deref().unwrap_or("")),
            "role" => a.role.as_str().cmp(b.role.as_str()),
            "section" => cmp_ci(&self.section_name, &other.section_name),
            "is_active" => a.is_active.cmp(&b.is_active),
            "created_at" => a.created_at.cmp(&b.created_at),
            "last_login_at" => a
                .last_login_at
                .as_deref()
                .unwrap_or("")
                .cmp(b.last_login_at.as_deref().unwrap_or("")),
            _ => a.username.cmp(&b.username),
        }
    }
}

pub fn role_badge_class(role: Role) -> &'static str {
    match role {
        Role::Admin => "badge badge--warning",
        Role::Trainer => "badge badge--primary",
        Role::Assistant => "badge badge--secondary",
        Role::User => "badge badge--neutral",
    }
}

fn build_rows(users: Vec<User>, sections: &HashMap<String, String>) -> Vec<UserRow> {
    users
        .into_iter()
        .map(|user| {
            let section_name = user
                .section_id
                .as_ref()
                .and_then(|id| sections.get(id).cloned())
                .unwrap_or_default();
            UserRow { user, section_name }
        })
        .collect()
}

#[component]
pub fn UsersListPage() -> impl IntoView {
    view! {
        <RequireAdmin>
            <UsersList />
        </RequireAdmin>
    }
}

#[component]
fn UsersList() -> impl IntoView {
    let toasts = use_toasts();
    let (auth_state, _) = use_auth();
    let state = create_state();
    let all_rows: RwSignal<Vec<UserRow>> = RwSignal::new(Vec::new());
    let sections: RwSignal<Vec<Section>> = RwSignal::new(Vec::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    let (show_create_form, set_show_create_form) = signal(false);
    let editing_user: RwSignal<Option<User>> = RwSignal::new(None);
    let password_user: RwSignal<Option<User>> = RwSignal::new(None);

    let refresh_view = move || {
        let rows = all_rows.get_untracked();
        state.update(|s| s.show(rows));
    };

    let load_data = move || {
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            let users = api::fetch_users().await;
            // отделы нужны только для подписи, без них таблица всё равно строится
            let section_list = section_api::fetch_sections().await.unwrap_or_else(|e| {
                log::warn!("sections not loaded: {}", e);
                Vec::new()
            });
            match users {
                Ok(users) => {
                    let names: HashMap<String, String> = section_list
                        .iter()
                        .map(|s| (s.base.id.as_string(), s.base.description.clone()))
                        .collect();
                    all_rows.set(build_rows(users, &names));
                    sections.set(section_list);
                    state.update(|s| s.is_loaded = true);
                    refresh_view();
                }
                Err(e) => set_error.set(Some(format!("Не удалось загрузить пользователей: {}", e))),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        if !state.with_untracked(|s| s.is_loaded) {
            load_data();
        }
    });

    let search_value = Signal::derive(move || state.with(|s| s.search_query.clone()));
    let on_search = Callback::new(move |value: String| {
        state.update(|s| {
            s.search_query = value;
            s.page = 0;
        });
        refresh_view();
    });

    let role_select = RwSignal::new(String::new());
    Effect::new(move |_| {
        let role = role_select.get();
        if state.with_untracked(|s| s.role_filter != role) {
            state.update(|s| {
                s.role_filter = role;
                s.page = 0;
            });
            refresh_view();
        }
    });

    let sort_by = move |field: &'static str| {
        move |_| {
            state.update(|s| {
                let (f, asc) = toggle_sort(&s.sort_field, s.sort_ascending, field);
                s.sort_field = f;
                s.sort_ascending = asc;
            });
            refresh_view();
        }
    };

    let go_to_page = move |page: usize| {
        state.update(|s| s.page = page);
        refresh_view();
    };

    let change_page_size = move |size: usize| {
        state.update(|s| {
            s.page_size = size;
            s.page = 0;
        });
        refresh_view();
    };

    let delete_user = move |user: User| {
        if auth_state.get_untracked().user_id().as_deref() == Some(user.id.as_str()) {
            toasts.error("Нельзя удалить собственную учётную запись");
            return;
        }
        if !confirm(&format!("Удалить пользователя {}?", user.username)) {
            return;
        }
        spawn_local(async move {
            match api::delete_user(&user.id).await {
                Ok(()) => {
                    toasts.success(format!("Пользователь {} удалён", user.username));
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
                    <span class=move || state.with(|s| get_sort_class(&s.sort_field, field))>
                        {move || state.with(|s| get_sort_indicator(&s.sort_field, field, s.sort_ascending))}
                    </span>
                </div>
            </TableHeaderCell>
        }
    };

    view! {
        <PageFrame page_id="sys_users--list" category=PAGE_CAT_SYSTEM>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Пользователи"</h1>
                    <Badge>{move || state.get().total_count.to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| set_show_create_form.set(true)
                    >
                        {icon("plus")}
                        " Новый"
                    </Button>
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

                <div class="filter-panel">
                    <div class="filter-panel-header">
                        <div class="filter-panel-header__left">
                            {icon("filter")}
                            <span class="filter-panel__title">"Поиск"</span>
                        </div>
                        <div class="filter-panel-header__center">
                            <PaginationControls
                                current_page=Signal::derive(move || state.get().page)
                                total_pages=Signal::derive(move || state.get().total_pages)
                                total_count=Signal::derive(move || state.get().total_count)
                                page_size=Signal::derive(move || state.get().page_size)
                                on_page_change=Callback::new(go_to_page)
                                on_page_size_change=Callback::new(change_page_size)
                            />
                        </div>
                    </div>

                    <div class="filter-panel-content">
                        <Flex gap=FlexGap::Small align=FlexAlign::End>
                            <div style="flex: 1; max-width: 320px;">
                                <SearchInput
                                    value=search_value
                                    on_change=on_search
                                    placeholder="Логин, ФИО, Email или отдел..."
                                />
                            </div>
                            <div style="width: 200px;">
                                <Label>"Роль"</Label>
                                <Select value=role_select>
                                    <option value="">"Все роли"</option>
                                    {Role::ALL
                                        .iter()
                                        .map(|r| view! { <option value=r.as_str()>{r.label()}</option> })
                                        .collect_view()}
                                </Select>
                            </div>
                        </Flex>
                    </div>
                </div>

                <div class="table-wrapper">
                    <Table attr:id=TABLE_ID attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                {header("username", "Логин")}
                                {header("full_name", "ФИО")}
                                {header("email", "Email")}
                                {header("role", "Роль")}
                                {header("section", "Отдел")}
                                {header("is_active", "Статус")}
                                {header("created_at", "Создан")}
                                {header("last_login_at", "Последний вход")}
                                <TableHeaderCell></TableHeaderCell>
                            </TableRow>
                        </TableHeader>

                        <TableBody>
                            <For
                                each=move || state.get().items
                                key=|r| (r.user.id.clone(), r.user.updated_at.clone())
                                children=move |row: UserRow| {
                                    let user = row.user.clone();
                                    let for_edit = user.clone();
                                    let for_password = user.clone();
                                    let for_delete = user.clone();
                                    let query = state.with_untracked(|s| s.search_query.clone());
                                    let full_name_query = query.clone();
                                    let last_login = user
                                        .last_login_at
                                        .as_deref()
                                        .map(format_date)
                                        .unwrap_or_else(|| "—".to_string());
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    <span style="font-weight: 500;">
                                                        {highlight_matches(&user.username, &query)}
                                                    </span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    {highlight_matches(user.full_name.as_deref().unwrap_or(""), &full_name_query)}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>
                                                    {user.email.clone().unwrap_or_default()}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <span class=role_badge_class(user.role)>{user.role.label()}</span>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout truncate=true>{row.section_name.clone()}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    {if user.is_active {
                                                        view! { <span class="badge badge--success">"Активен"</span> }.into_any()
                                                    } else {
                                                        view! { <span class="badge badge--error">"Заблок."</span> }.into_any()
                                                    }}
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{format_date(&user.created_at)}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <TableCellLayout>{last_login}</TableCellLayout>
                                            </TableCell>
                                            <TableCell>
                                                <Flex gap=FlexGap::Small>
                                                    <Button
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click=move |_| editing_user.set(Some(for_edit.clone()))
                                                        attr:title="Редактировать"
                                                    >
                                                        {icon("edit")}
                                                    </Button>
                                                    <Button
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click=move |_| password_user.set(Some(for_password.clone()))
                                                        attr:title="Сменить пароль"
                                                    >
                                                        {icon("key")}
                                                    </Button>
                                                    <Button
                                                        appearance=ButtonAppearance::Subtle
                                                        on_click=move |_| delete_user(for_delete.clone())
                                                        attr:title="Удалить"
                                                    >
                                                        {icon("trash")}
                                                    </Button>
                                                </Flex>
                                            </TableCell>
                                        </TableRow>
                                    }
                                }
                            />
                        </TableBody>
                    </Table>
                </div>

                {move || show_create_form.get().then(|| view! {
                    <super::details::UserForm
                        user=None
                        sections=sections.get_untracked()
                        on_close=move || set_show_create_form.set(false)
                        on_saved=move || {
                            set_show_create_form.set(false);
                            load_data();
                        }
                    />
                })}

                {move || editing_user.get().map(|user| view! {
                    <super::details::UserForm
                        user=Some(user)
                        sections=sections.get_untracked()
                        on_close=move || editing_user.set(None)
                        on_saved=move || {
                            editing_user.set(None);
                            load_data();
                        }
                    />
                })}

                {move || password_user.get().map(|user| view! {
                    <super::change_password::ResetPasswordForm
                        user=user
                        on_close=move || password_user.set(None)
                    />
                })}
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::list_utils::filter_list;

    fn user(username: &str, role: Role, section_id: Option<&str>) -> User {
        User {
            id: format!("id-{}", username),
            username: username.to_string(),
            email: None,
            full_name: None,
            role,
            section_id: section_id.map(str::to_string),
            is_active: true,
            created_at: "2024-03-01T10:00:00Z".to_string(),
            updated_at: "2024-03-01T10:00:00Z".to_string(),
            last_login_at: None,
            created_by: None,
        }
    }

    #[test]
    fn test_rows_resolve_section_names() {
        let sections = HashMap::from([("s1".to_string(), "Бухгалтерия".to_string())]);
        let rows = build_rows(
            vec![
                user("anna", Role::Assistant, Some("s1")),
                user("boris", Role::User, None),
                user("clara", Role::Assistant, Some("gone")),
            ],
            &sections,
        );
        assert_eq!(rows[0].section_name, "Бухгалтерия");
        assert_eq!(rows[1].section_name, "");
        assert_eq!(rows[2].section_name, "");
    }

    #[test]
    fn test_search_matches_section_name() {
        let sections = HashMap::from([("s1".to_string(), "Бухгалтерия".to_string())]);
        let rows = build_rows(
            vec![user("anna", Role::Assistant, Some("s1")), user("boris", Role::User, None)],
            &sections,
        );
        let found = filter_list(rows, "бухг");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].user.username, "anna");
    }

    #[test]
    fn test_show_filters_by_role_and_clamps_page() {
        let users = (0..30)
            .map(|i| {
                let role = if i % 3 == 0 { Role::Trainer } else { Role::User };
                user(&format!("u{:02}", i), role, None)
            })
            .collect();
        let rows = build_rows(users, &HashMap::new());
        let mut state = UsersListState {
            page: 7,
            page_size: 25,
            role_filter: "user".to_string(),
            ..UsersListState::default()
        };
        state.show(rows);
        assert_eq!(state.total_count, 20);
        assert_eq!(state.total_pages, 1);
        assert_eq!(state.page, 0);
        assert_eq!(state.items.len(), 20);
        assert_eq!(state.items[0].user.username, "u01");
    }
}
