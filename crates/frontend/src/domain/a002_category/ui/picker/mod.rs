use contracts::domain::a002_category::aggregate::Category;
use contracts::domain::common::AggregateId;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a002_category::api;

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryPickerItem {
    pub id: String,
    pub description: String,
}

impl From<Category> for CategoryPickerItem {
    fn from(c: Category) -> Self {
        Self {
            id: c.base.id.as_string(),
            description: c.base.description,
        }
    }
}

/// Выбор категории. По умолчанию только активные (форма обращения),
/// в фильтрах отчётов нужны все.
#[component]
pub fn CategorySelect(
    value: RwSignal<String>,
    #[prop(optional)] include_inactive: bool,
    #[prop(optional, into)] empty_label: Option<String>,
) -> impl IntoView {
    let items: RwSignal<Vec<CategoryPickerItem>> = RwSignal::new(Vec::new());
    let empty_label = empty_label.unwrap_or_else(|| "-- Выберите категорию --".to_string());

    spawn_local(async move {
        match api::fetch_categories(!include_inactive).await {
            Ok(list) => items.set(list.into_iter().map(CategoryPickerItem::from).collect()),
            Err(e) => log::warn!("categories not loaded: {}", e),
        }
    });

    view! {
        <Select value=value>
            <option value="">{empty_label}</option>
            <For
                each=move || items.get()
                key=|item| item.id.clone()
                children=move |item: CategoryPickerItem| {
                    view! { <option value=item.id.clone()>{item.description.clone()}</option> }
                }
            />
        </Select>
    }
}
