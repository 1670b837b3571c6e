//! Всплывающие уведомления об ошибках и успешных операциях.
//!
//! `ToastService` копируемый и живёт в контексте, поэтому его можно
//! вызывать из `spawn_local` после await. Показ делает `ToastBridge`
//! через thaw-тостер.

use leptos::prelude::*;
use thaw::*;

use super::api_utils::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToastMessage {
    pub kind: ToastKind,
    pub text: String,
}

#[derive(Clone, Copy)]
pub struct ToastService {
    pending: RwSignal<Vec<ToastMessage>>,
}

impl ToastService {
    pub fn new() -> Self {
        Self {
            pending: RwSignal::new(Vec::new()),
        }
    }

    fn push(&self, kind: ToastKind, text: String) {
        self.pending.update(|q| q.push(ToastMessage { kind, text }));
    }

    pub fn success(&self, text: impl Into<String>) {
        self.push(ToastKind::Success, text.into());
    }

    pub fn info(&self, text: impl Into<String>) {
        self.push(ToastKind::Info, text.into());
    }

    pub fn error(&self, text: impl Into<String>) {
        self.push(ToastKind::Error, text.into());
    }

    /// 401 не показываем: пользователь уже на странице входа
    pub fn api_error(&self, err: &ApiError) {
        log::warn!("API error: {:?}", err);
        if *err != ApiError::Unauthorized {
            self.error(err.to_string());
        }
    }
}

impl Default for ToastService {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_toasts() -> ToastService {
    use_context::<ToastService>().expect("ToastService not provided in context")
}

/// Must be mounted inside thaw's `ToasterProvider`.
#[component]
pub fn ToastBridge() -> impl IntoView {
    let toaster = ToasterInjection::expect_context();
    let service = use_toasts();

    Effect::new(move |_| {
        let batch = service.pending.get();
        if batch.is_empty() {
            return;
        }
        service.pending.set(Vec::new());

        for message in batch {
            let intent = match message.kind {
                ToastKind::Success => ToastIntent::Success,
                ToastKind::Info => ToastIntent::Info,
                ToastKind::Error => ToastIntent::Error,
            };
            let text = message.text;
            toaster.dispatch_toast(
                move || {
                    view! {
                        <Toast>
                            <ToastBody>{text}</ToastBody>
                        </Toast>
                    }
                },
                ToastOptions::default().with_intent(intent),
            );
        }
    });
}
