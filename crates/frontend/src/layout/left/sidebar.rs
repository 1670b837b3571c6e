//! Sidebar component with collapsible menu groups.
//! Группы и пункты фильтруются по роли пользователя.

use crate::layout::global_context::use_app_context;
use crate::layout::tabs::tab_label_for_key;
use crate::shared::icons::icon;
use crate::system::auth::context::use_auth;
use contracts::system::users::Role;
use leptos::prelude::*;

const ALL_ROLES: &[Role] = &Role::ALL;
const STAFF: &[Role] = &[Role::Admin, Role::Trainer];
const SECTION_STAFF: &[Role] = &[Role::Admin, Role::Assistant];
const ADMIN: &[Role] = &[Role::Admin];

#[derive(Clone, Debug, PartialEq)]
struct MenuItem {
    id: &'static str,
    icon: &'static str,
    roles: &'static [Role],
}

#[derive(Clone, Debug, PartialEq)]
struct MenuGroup {
    id: &'static str,
    label: &'static str,
    icon: &'static str,
    items: Vec<MenuItem>,
}

const fn item(id: &'static str, icon: &'static str, roles: &'static [Role]) -> MenuItem {
    MenuItem { id, icon, roles }
}

fn get_menu_groups() -> Vec<MenuGroup> {
    vec![
        MenuGroup {
            id: "inquiries",
            label: "Обращения",
            icon: "inbox",
            items: vec![
                item("a003_inquiry_mine", "message-square", ALL_ROLES),
                item("a003_inquiry_assigned", "inbox", STAFF),
                item("a004_follow_up_inbox", "layers", SECTION_STAFF),
                item("a003_inquiry_all", "file-text", ADMIN),
                item("a006_notification", "bell", ALL_ROLES),
            ],
        },
        MenuGroup {
            id: "references",
            label: "Справочники",
            icon: "folder",
            items: vec![
                item("a001_section", "layers", ADMIN),
                item("a002_category", "folder", ADMIN),
                item("a007_trainer_board", "columns", ADMIN),
            ],
        },
        MenuGroup {
            id: "dashboards",
            label: "Отчёты",
            icon: "bar-chart",
            items: vec![
                item("d400_inquiry_summary", "bar-chart", ADMIN),
                item("d401_trainer_performance", "star", ADMIN),
                item("d402_section_follow_ups", "layers", ADMIN),
            ],
        },
        MenuGroup {
            id: "settings",
            label: "Настройки",
            icon: "settings",
            items: vec![
                item("sys_users", "users", ADMIN),
                item("sys_change_password", "key", ALL_ROLES),
            ],
        },
    ]
}

/// Меню, видимое роли. Пустые группы не показываются.
fn menu_for_role(role: Role) -> Vec<MenuGroup> {
    get_menu_groups()
        .into_iter()
        .filter_map(|mut group| {
            group.items.retain(|i| i.roles.contains(&role));
            (!group.items.is_empty()).then_some(group)
        })
        .collect()
}

/// Таб, который открывается после входа
pub fn home_tab_for_role(role: Role) -> &'static str {
    match role {
        Role::Admin => "a003_inquiry_all",
        Role::Trainer => "a003_inquiry_assigned",
        Role::Assistant => "a004_follow_up_inbox",
        Role::User => "a003_inquiry_mine",
    }
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_app_context();
    let (auth_state, _) = use_auth();

    let expanded_groups = RwSignal::new(vec!["inquiries".to_string()]);

    view! {
        <div class="app-sidebar__content">
            {move || {
                let Some(role) = auth_state.get().role() else {
                    return ().into_any();
                };
                menu_for_role(role)
                    .into_iter()
                    .map(|group| {
                        let group_id = group.id.to_string();
                        let gid_click = group_id.clone();
                        let gid_chevron = group_id.clone();
                        let gid_show = group_id;
                        let items = StoredValue::new(group.items);

                        view! {
                            <div>
                                <div
                                    class="app-sidebar__item"
                                    style:padding-left="12px"
                                    on:click=move |_| {
                                        let gid = gid_click.clone();
                                        expanded_groups.update(move |open| {
                                            if let Some(pos) = open.iter().position(|x| x == &gid) {
                                                open.remove(pos);
                                            } else {
                                                open.push(gid);
                                            }
                                        });
                                    }
                                >
                                    <div class="app-sidebar__item-content">
                                        {icon(group.icon)}
                                        <span>{group.label}</span>
                                    </div>
                                    <div
                                        class="app-sidebar__chevron"
                                        class:app-sidebar__chevron--expanded=move || {
                                            expanded_groups.get().contains(&gid_chevron)
                                        }
                                    >
                                        {icon("chevron-right")}
                                    </div>
                                </div>

                                <Show when=move || expanded_groups.get().contains(&gid_show)>
                                    <div class="app-sidebar__children">
                                        {items
                                            .get_value()
                                            .into_iter()
                                            .map(|menu_item| {
                                                let id = menu_item.id;
                                                let label = tab_label_for_key(id);
                                                view! {
                                                    <div
                                                        class="app-sidebar__item"
                                                        class:app-sidebar__item--active=move || {
                                                            ctx.active.get().as_deref() == Some(id)
                                                        }
                                                        style:padding-left="10px"
                                                        on:click=move |_| ctx.open_tab(id, label)
                                                    >
                                                        <div class="app-sidebar__item-content">
                                                            {icon(menu_item.icon)}
                                                            <span>{label}</span>
                                                        </div>
                                                    </div>
                                                }
                                            })
                                            .collect_view()}
                                    </div>
                                </Show>
                            </div>
                        }
                    })
                    .collect_view()
                    .into_any()
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_ids(role: Role) -> Vec<&'static str> {
        menu_for_role(role)
            .into_iter()
            .flat_map(|g| g.items.into_iter().map(|i| i.id))
            .collect()
    }

    #[test]
    fn test_plain_user_sees_only_own_screens() {
        let ids = item_ids(Role::User);
        assert!(ids.contains(&"a003_inquiry_mine"));
        assert!(ids.contains(&"a006_notification"));
        assert!(!ids.contains(&"a003_inquiry_all"));
        assert!(!ids.contains(&"sys_users"));
        assert!(menu_for_role(Role::User).iter().all(|g| g.id != "dashboards"));
    }

    #[test]
    fn test_admin_sees_everything() {
        let total: usize = get_menu_groups().iter().map(|g| g.items.len()).sum();
        assert_eq!(item_ids(Role::Admin).len(), total);
    }

    #[test]
    fn test_home_tab_is_visible_for_role() {
        for role in Role::ALL {
            assert!(item_ids(role).contains(&home_tab_for_role(role)), "{:?}", role);
        }
    }

    #[test]
    fn test_every_item_has_label() {
        for group in get_menu_groups() {
            for i in group.items {
                assert!(!tab_label_for_key(i.id).is_empty(), "{}", i.id);
            }
        }
    }
}
