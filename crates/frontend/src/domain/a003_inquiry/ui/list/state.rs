use contracts::domain::a003_inquiry::list::{
    InquiryListItem, InquiryListQuery, InquiryListResponse, InquiryListScope, StatusCounts,
};
use leptos::prelude::*;

/// Состояние списка: запрос к серверу и последняя полученная страница
#[derive(Clone, Debug)]
pub struct InquiryListState {
    pub query: InquiryListQuery,
    pub items: Vec<InquiryListItem>,
    pub status_counts: StatusCounts,
    pub total_count: usize,
    pub total_pages: usize,
    pub is_loaded: bool,
}

impl InquiryListState {
    pub fn new(scope: InquiryListScope) -> Self {
        Self {
            query: InquiryListQuery::with_scope(scope),
            items: Vec::new(),
            status_counts: StatusCounts::default(),
            total_count: 0,
            total_pages: 1,
            is_loaded: false,
        }
    }

    pub fn apply_response(&mut self, response: InquiryListResponse) {
        self.items = response.page.items;
        self.total_count = response.page.total_count;
        self.total_pages = response.page.total_pages.max(1);
        self.query.page = response.page.page;
        self.status_counts = response.status_counts;
        self.is_loaded = true;
    }

    /// Сколько фильтров панели задано (статус и поиск считаются отдельно)
    pub fn active_filters_count(&self) -> usize {
        let q = &self.query;
        [
            q.category_id.is_some(),
            q.trainer_id.is_some(),
            q.include_unassigned,
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }
}

pub fn create_state(scope: InquiryListScope) -> RwSignal<InquiryListState> {
    RwSignal::new(InquiryListState::new(scope))
}
