use contracts::shared::pagination::DEFAULT_PAGE_SIZE;
use leptos::prelude::*;

use super::UserRow;
use crate::shared::list_utils::{filter_list, sort_list};

/// Состояние таблицы пользователей. Список целиком приходит с сервера,
/// поиск, фильтр по роли, сортировка и страницы считаются на клиенте.
#[derive(Clone, Debug)]
pub struct UsersListState {
    /// Строки текущей страницы
    pub items: Vec<UserRow>,
    pub search_query: String,
    /// `Role::as_str()` или пустая строка
    pub role_filter: String,
    pub sort_field: String,
    pub sort_ascending: bool,
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub total_pages: usize,
    pub is_loaded: bool,
}

impl Default for UsersListState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            search_query: String::new(),
            role_filter: String::new(),
            sort_field: "username".to_string(),
            sort_ascending: true,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            total_count: 0,
            total_pages: 1,
            is_loaded: false,
        }
    }
}

impl UsersListState {
    /// Пересобирает видимую страницу из полного набора строк
    pub fn show(&mut self, rows: Vec<UserRow>) {
        let mut rows = filter_list(rows, &self.search_query);
        if !self.role_filter.is_empty() {
            rows.retain(|r| r.user.role.as_str() == self.role_filter);
        }
        sort_list(&mut rows, &self.sort_field, self.sort_ascending);

        self.total_count = rows.len();
        self.clamp_page();
        self.items = rows
            .into_iter()
            .skip(self.page * self.page_size)
            .take(self.page_size)
            .collect();
    }

    fn clamp_page(&mut self) {
        self.total_pages = self.total_count.div_ceil(self.page_size.max(1)).max(1);
        self.page = self.page.min(self.total_pages - 1);
    }
}

pub fn create_state() -> RwSignal<UsersListState> {
    RwSignal::new(UsersListState::default())
}
