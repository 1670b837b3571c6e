use contracts::domain::a006_notification::aggregate::UnreadCount;

use crate::domain::a006_notification::api as notification_api;
use crate::layout::global_context::use_app_context;
use crate::layout::tabs::tab_label_for_key;
use crate::shared::icons::icon;
use crate::system::auth::context::{do_logout, use_auth};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn badge_text(unread: u64) -> String {
    if unread > 99 {
        "99+".to_string()
    } else {
        unread.to_string()
    }
}

/// Колокольчик: опрашивает счётчик непрочитанных, пока смонтирован
#[component]
fn NotificationBell() -> impl IntoView {
    let ctx = use_app_context();

    let alive = Arc::new(AtomicBool::new(true));
    let alive_for_cleanup = alive.clone();
    on_cleanup(move || alive_for_cleanup.store(false, Ordering::Relaxed));

    spawn_local(async move {
        while alive.load(Ordering::Relaxed) {
            let delay_ms = match notification_api::fetch_unread_count().await {
                Ok(unread) => {
                    ctx.unread_notifications.set(unread.count);
                    unread.poll_delay_ms()
                }
                Err(e) => {
                    log::debug!("Unread count poll failed: {}", e);
                    UnreadCount::default().poll_delay_ms()
                }
            };
            TimeoutFuture::new(delay_ms).await;
        }
    });

    let unread = move || ctx.unread_notifications.get();

    view! {
        <button
            class="top-header__icon-btn top-header__bell"
            title="Уведомления"
            on:click=move |_| ctx.open_tab("a006_notification", tab_label_for_key("a006_notification"))
        >
            {icon("bell")}
            <Show when=move || { unread() > 0 }>
                <span class="top-header__badge">
                    {move || badge_text(unread())}
                </span>
            </Show>
        </button>
    }
}

/// Шапка: меню, колокольчик, текущий пользователь, выход
#[component]
pub fn TopHeader() -> impl IntoView {
    let ctx = use_app_context();
    let (auth_state, set_auth_state) = use_auth();

    let logout = move |_| {
        spawn_local(async move {
            do_logout(set_auth_state).await;
            ctx.reset();
        });
    };

    let is_sidebar_visible = move || ctx.left_open.get();

    view! {
        <div class="top-header">
            <div class="top-header__brand">
                <button
                    class="top-header__icon-btn"
                    on:click=move |_| ctx.toggle_left()
                    title=move || if is_sidebar_visible() { "Скрыть навигацию" } else { "Показать навигацию" }
                >
                    {move || if is_sidebar_visible() {
                        icon("panel-left-close")
                    } else {
                        icon("panel-left-open")
                    }}
                </button>
                <span class="top-header__title">"Helpdesk"</span>
            </div>

            <div class="top-header__actions">
                <NotificationBell />

                <div class="top-header__user">
                    {icon("user")}
                    <span>
                        {move || auth_state.get().user_info
                            .map(|u| format!("{} ({})", u.display_name(), u.role.label()))
                            .unwrap_or_else(|| "Гость".to_string())}
                    </span>
                </div>

                <button class="top-header__icon-btn" on:click=logout title="Выход">
                    {icon("log-out")}
                </button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_text_caps_at_99() {
        assert_eq!(badge_text(7), "7");
        assert_eq!(badge_text(99), "99");
        assert_eq!(badge_text(100), "99+");
    }
}
