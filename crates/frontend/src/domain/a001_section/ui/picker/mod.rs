use contracts::domain::a001_section::aggregate::Section;
use contracts::domain::common::AggregateId;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a001_section::api;

#[derive(Clone, Debug, PartialEq)]
pub struct SectionPickerItem {
    pub id: String,
    pub description: String,
}

impl From<Section> for SectionPickerItem {
    fn from(s: Section) -> Self {
        Self {
            id: s.base.id.as_string(),
            description: s.base.description,
        }
    }
}

/// Выпадающий список активных отделов. Пустое значение означает «не выбран».
#[component]
pub fn SectionSelect(
    value: RwSignal<String>,
    #[prop(optional, into)] empty_label: Option<String>,
) -> impl IntoView {
    let items: RwSignal<Vec<SectionPickerItem>> = RwSignal::new(Vec::new());
    let empty_label = empty_label.unwrap_or_else(|| "-- Выберите отдел --".to_string());

    spawn_local(async move {
        match api::fetch_sections().await {
            Ok(list) => items.set(
                list.into_iter()
                    .filter(|s| s.is_active)
                    .map(SectionPickerItem::from)
                    .collect(),
            ),
            Err(e) => log::warn!("sections not loaded: {}", e),
        }
    });

    view! {
        <Select value=value>
            <option value="">{empty_label}</option>
            <For
                each=move || items.get()
                key=|item| item.id.clone()
                children=move |item: SectionPickerItem| {
                    view! { <option value=item.id.clone()>{item.description.clone()}</option> }
                }
            />
        </Select>
    }
}
