use crate::layout::center::tabs::Tabs;
use crate::layout::global_context::use_app_context;
use crate::layout::left::sidebar::{home_tab_for_role, Sidebar};
use crate::layout::tabs::tab_label_for_key;
use crate::layout::Shell;
use crate::system::auth::context::use_auth;
use crate::system::pages::login::LoginPage;
use crate::system::pages::register::RegisterPage;
use leptos::prelude::*;

#[component]
fn MainLayout() -> impl IntoView {
    let tabs_store = use_app_context();
    let (auth_state, _) = use_auth();

    // сначала ?active= из адреса, иначе стартовый экран роли
    tabs_store.init_router_integration();
    if tabs_store.active.get_untracked().is_none() {
        if let Some(role) = auth_state.get_untracked().role() {
            let key = home_tab_for_role(role);
            tabs_store.open_tab(key, tab_label_for_key(key));
        }
    }

    view! {
        <Shell
            left=|| view! { <Sidebar /> }.into_any()
            center=|| view! { <Tabs /> }.into_any()
        />
    }
}

/// Экран входа или регистрации для анонимного пользователя
#[component]
fn PublicPages() -> impl IntoView {
    let show_register = RwSignal::new(false);

    view! {
        <Show
            when=move || show_register.get()
            fallback=move || view! { <LoginPage on_register=Callback::new(move |_| show_register.set(true)) /> }
        >
            <RegisterPage on_back=Callback::new(move |_| show_register.set(false)) />
        </Show>
    }
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    let (auth_state, _) = use_auth();

    view! {
        <Show
            when=move || auth_state.get().is_logged_in()
            fallback=|| view! { <PublicPages /> }
        >
            <MainLayout />
        </Show>
    }
}
