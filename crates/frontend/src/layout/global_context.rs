use leptos::prelude::*;
use std::collections::HashMap;
use web_sys::window;

use crate::layout::tabs::tab_labels::{detail_tab_label, inquiry_tab_key, tab_label_for_key};

/// Открытый таб рабочей области
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub key: String,
    pub title: String,
}

/// Общее состояние оболочки: табы, левая панель, счётчик уведомлений
#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    pub opened: RwSignal<Vec<Tab>>,
    pub active: RwSignal<Option<String>>,
    pub left_open: RwSignal<bool>,
    /// Колокольчик в шапке
    pub unread_notifications: RwSignal<u64>,
}

pub fn use_app_context() -> AppGlobalContext {
    use_context::<AppGlobalContext>().expect("AppGlobalContext not provided")
}

/// `?active=<key>` для адресной строки
pub fn active_query(key: &str) -> String {
    let params = HashMap::from([("active", key)]);
    format!("?{}", serde_qs::to_string(&params).unwrap_or_default())
}

fn active_from_query(search: &str) -> Option<String> {
    let mut params: HashMap<String, String> =
        serde_qs::from_str(search.trim_start_matches('?')).unwrap_or_default();
    params.remove("active").filter(|k| !k.is_empty())
}

fn location_search() -> String {
    window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

impl AppGlobalContext {
    pub fn new() -> Self {
        Self {
            opened: RwSignal::new(Vec::new()),
            active: RwSignal::new(None),
            left_open: RwSignal::new(true),
            unread_notifications: RwSignal::new(0),
        }
    }

    /// Активный таб переживает перезагрузку через `?active=`.
    /// Карточки (ключ с id) не восстанавливаются: у них нет заголовка без загрузки.
    pub fn init_router_integration(&self) {
        if let Some(key) = active_from_query(&location_search()) {
            let title = tab_label_for_key(&key);
            if !title.is_empty() {
                self.open_tab(&key, title);
            }
        }

        let active = self.active;
        Effect::new(move |_| {
            let Some(key) = active.get() else {
                return;
            };
            let url = active_query(&key);
            if location_search() == url {
                return;
            }
            if let Some(history) = window().and_then(|w| w.history().ok()) {
                let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&url));
            }
        });
    }

    /// Повторное открытие только активирует уже открытый таб
    pub fn open_tab(&self, key: &str, title: &str) {
        let already_open = self
            .opened
            .with_untracked(|tabs| tabs.iter().any(|t| t.key == key));
        if !already_open {
            log::debug!("open tab '{}'", key);
            self.opened.update(|tabs| {
                tabs.push(Tab {
                    key: key.to_string(),
                    title: title.to_string(),
                })
            });
        }
        self.activate_tab(key);
    }

    /// Карточка обращения: таб «Обращение · CODE»
    pub fn open_inquiry(&self, id: &str, code: &str) {
        let title = detail_tab_label(tab_label_for_key("a003_inquiry_detail"), code);
        self.open_tab(&inquiry_tab_key(id), &title);
    }

    pub fn activate_tab(&self, key: &str) {
        self.active.set(Some(key.to_string()));
    }

    /// После закрытия активного таба активным становится последний открытый
    pub fn close_tab(&self, key: &str) {
        self.opened.update(|tabs| tabs.retain(|t| t.key != key));
        let was_active = self.active.with_untracked(|a| a.as_deref() == Some(key));
        if was_active {
            let fallback = self
                .opened
                .with_untracked(|tabs| tabs.last().map(|t| t.key.clone()));
            self.active.set(fallback);
        }
    }

    /// Выход из системы: следующий пользователь не должен увидеть чужие табы
    pub fn reset(&self) {
        self.opened.set(Vec::new());
        self.active.set(None);
        self.unread_notifications.set(0);
    }

    pub fn toggle_left(&self) {
        self.left_open.update(|open| *open = !*open);
    }
}

impl Default for AppGlobalContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_query_survives_parse() {
        let url = active_query("a003_inquiry");
        assert_eq!(url, "?active=a003_inquiry");
        assert_eq!(active_from_query(&url).as_deref(), Some("a003_inquiry"));
        assert_eq!(active_from_query(""), None);
        assert_eq!(active_from_query("?active="), None);
    }
}
