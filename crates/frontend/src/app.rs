use crate::layout::global_context::AppGlobalContext;
use crate::routes::routes::AppRoutes;
use crate::shared::toast::{ToastBridge, ToastService};
use crate::system::auth::context::AuthProvider;
use leptos::prelude::*;
use thaw::{ConfigProvider, ToasterProvider};

/// Корень: контексты оболочки и тостов, тема thaw, авторизация
#[component]
pub fn App() -> impl IntoView {
    provide_context(AppGlobalContext::new());
    provide_context(ToastService::new());

    view! {
        <ConfigProvider>
            <ToasterProvider>
                <ToastBridge />
                <AuthProvider>
                    <AppRoutes />
                </AuthProvider>
            </ToasterProvider>
        </ConfigProvider>
    }
}
