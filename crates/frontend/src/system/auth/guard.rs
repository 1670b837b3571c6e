use contracts::system::users::Role;
use leptos::prelude::*;

use super::context::use_auth;

/// Component that requires admin privileges
/// Shows fallback if not admin
#[component]
pub fn RequireAdmin(children: ChildrenFn) -> impl IntoView {
    view! {
        <RequireRole roles=vec![Role::Admin]>
            {children()}
        </RequireRole>
    }
}

/// Показывает содержимое только пользователям с одной из ролей.
/// Сервер всё равно проверяет роль сам, это только скрытие экрана.
#[component]
pub fn RequireRole(roles: Vec<Role>, children: ChildrenFn) -> impl IntoView {
    let (auth_state, _) = use_auth();
    let roles = StoredValue::new(roles);

    view! {
        <Show
            when=move || {
                auth_state
                    .get()
                    .role()
                    .map(|r| roles.with_value(|allowed| allowed.contains(&r)))
                    .unwrap_or(false)
            }
            fallback=|| view! { <div class="alert alert--error">"Доступ запрещён"</div> }
        >
            {children()}
        </Show>
    }
}
