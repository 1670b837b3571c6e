use contracts::domain::a006_notification::aggregate::{Notification, NotificationListQuery};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a006_notification::api;
use crate::layout::global_context::use_app_context;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::date_utils::format_datetime;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::shared::toast::use_toasts;

/// Тело уведомления по обращению имеет вид "INQ-000042: Тема",
/// код нужен для заголовка таба
pub fn inquiry_code_from_body(body: &str) -> &str {
    body.split_once(':').map(|(code, _)| code.trim()).unwrap_or("")
}

/// Уведомления текущего пользователя
#[component]
pub fn NotificationList() -> impl IntoView {
    let ctx = use_app_context();
    let toasts = use_toasts();

    let query = RwSignal::new(NotificationListQuery::default());
    let unread_only = RwSignal::new(false);
    let items: RwSignal<Vec<Notification>> = RwSignal::new(Vec::new());
    let total_count = RwSignal::new(0usize);
    let total_pages = RwSignal::new(1usize);
    let (loading, set_loading) = signal(false);

    let refresh_counter = move || {
        spawn_local(async move {
            if let Ok(unread) = api::fetch_unread_count().await {
                ctx.unread_notifications.set(unread.count);
            }
        });
    };

    let load_data = move || {
        let q = query.get_untracked();
        set_loading.set(true);
        spawn_local(async move {
            match api::fetch_notifications(&q).await {
                Ok(page) => {
                    total_count.set(page.total_count);
                    total_pages.set(page.total_pages);
                    query.update_untracked(|q| q.page = page.page);
                    items.set(page.items);
                }
                Err(e) => toasts.api_error(&e),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        query.track();
        load_data();
    });

    Effect::new(move |prev: Option<bool>| {
        let value = unread_only.get();
        if prev.is_some() {
            query.update(|q| {
                q.unread_only = value;
                q.page = 0;
            });
        }
        value
    });

    let open = move |n: Notification| {
        if !n.is_read {
            let id = n.id.to_string();
            spawn_local(async move {
                match api::mark_read(&id).await {
                    Ok(()) => {
                        items.update(|list| {
                            if let Some(item) = list.iter_mut().find(|i| i.id.to_string() == id) {
                                item.is_read = true;
                            }
                        });
                        refresh_counter();
                    }
                    Err(e) => log::warn!("mark_read failed: {}", e),
                }
            });
        }
        if let Some(inquiry_id) = n.inquiry_id.as_deref() {
            ctx.open_inquiry(inquiry_id, inquiry_code_from_body(&n.body));
        }
    };

    let read_all = move |_| {
        spawn_local(async move {
            match api::mark_all_read().await {
                Ok(()) => {
                    ctx.unread_notifications.set(0);
                    load_data();
                }
                Err(e) => toasts.api_error(&e),
            }
        });
    };

    view! {
        <PageFrame page_id="a006_notification--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Уведомления"</h1>
                    <Badge>{move || total_count.get().to_string()}</Badge>
                </div>
                <div class="page__header-right">
                    <Checkbox checked=unread_only label="Только непрочитанные" />
                    <Button appearance=ButtonAppearance::Secondary on_click=read_all>
                        {icon("check")}
                        " Прочитать все"
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
                <Show
                    when=move || !items.get().is_empty()
                    fallback=|| view! { <div class="text-muted">"Уведомлений нет"</div> }
                >
                    <div class="notification-list">
                        <For
                            each=move || items.get()
                            key=|n| (n.id, n.is_read)
                            children=move |n: Notification| {
                                let class = if n.is_read {
                                    "notification"
                                } else {
                                    "notification notification--unread"
                                };
                                let for_open = n.clone();
                                view! {
                                    <div class=class on:click=move |_| open(for_open.clone()) style="cursor: pointer;">
                                        <div class="notification__header">
                                            <strong>{n.title.clone()}</strong>
                                            <span class="text-muted">{format_datetime(&n.created_at)}</span>
                                        </div>
                                        <div class="notification__body">{n.body.clone()}</div>
                                    </div>
                                }
                            }
                        />
                    </div>
                </Show>

                <PaginationControls
                    current_page=Signal::derive(move || query.get().page)
                    total_pages=Signal::derive(move || total_pages.get())
                    total_count=Signal::derive(move || total_count.get())
                    page_size=Signal::derive(move || query.get().page_size)
                    on_page_change=Callback::new(move |page| query.update(|q| q.page = page))
                    on_page_size_change=Callback::new(move |size| query.update(|q| {
                        q.page_size = size;
                        q.page = 0;
                    }))
                />
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inquiry_code_from_body() {
        assert_eq!(inquiry_code_from_body("INQ-000042: Не работает принтер"), "INQ-000042");
        assert_eq!(inquiry_code_from_body("без кода"), "");
    }
}
