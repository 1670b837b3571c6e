//! Общая панель фильтров отчётов: период, категория, тренер, отдел, статус

use contracts::dashboards::common::ReportFilter;
use contracts::domain::a003_inquiry::status::InquiryStatus;
use contracts::system::users::UserShort;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a001_section::ui::picker::SectionSelect;
use crate::domain::a002_category::ui::picker::CategorySelect;
use crate::shared::api_utils::{with_query, ApiResult};
use crate::shared::components::date_input::DateInput;
use crate::shared::date_utils::{month_start, today_iso};
use crate::shared::icons::icon;
use crate::system::users::api as users_api;

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Значения полей панели в фильтр запроса; пустые поля не передаются
pub fn build_report_filter(
    date_from: &str,
    date_to: &str,
    category_id: &str,
    trainer_id: &str,
    section_id: &str,
    status: &str,
) -> ReportFilter {
    ReportFilter {
        date_from: non_empty(date_from),
        date_to: non_empty(date_to),
        category_id: non_empty(category_id),
        trainer_id: non_empty(trainer_id),
        section_id: non_empty(section_id),
        status: status.parse::<InquiryStatus>().ok(),
    }
}

/// Фильтр по умолчанию: текущий месяц
pub fn current_month_filter() -> ReportFilter {
    let today = today_iso();
    ReportFilter {
        date_from: Some(month_start(&today)),
        date_to: Some(today),
        ..ReportFilter::default()
    }
}

pub fn report_url(path: &str, filter: &ReportFilter) -> ApiResult<String> {
    with_query(path, filter)
}

/// Какие поля показывать, зависит от отчёта
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterFields {
    pub category: bool,
    pub trainer: bool,
    pub section: bool,
    pub status: bool,
}

#[component]
pub fn ReportFilterBar(filter: RwSignal<ReportFilter>, fields: FilterFields) -> impl IntoView {
    let initial = filter.get_untracked();
    let date_from = RwSignal::new(initial.date_from.unwrap_or_default());
    let date_to = RwSignal::new(initial.date_to.unwrap_or_default());
    let category_id = RwSignal::new(initial.category_id.unwrap_or_default());
    let trainer_id = RwSignal::new(initial.trainer_id.unwrap_or_default());
    let section_id = RwSignal::new(initial.section_id.unwrap_or_default());
    let status = RwSignal::new(
        initial
            .status
            .map(|s| s.as_str().to_string())
            .unwrap_or_default(),
    );
    let trainers: RwSignal<Vec<UserShort>> = RwSignal::new(Vec::new());

    if fields.trainer {
        spawn_local(async move {
            match users_api::fetch_trainers().await {
                Ok(list) => trainers.set(list),
                Err(e) => log::warn!("trainers not loaded: {}", e),
            }
        });
    }

    let apply = move |_| {
        filter.set(build_report_filter(
            &date_from.get_untracked(),
            &date_to.get_untracked(),
            &category_id.get_untracked(),
            &trainer_id.get_untracked(),
            &section_id.get_untracked(),
            &status.get_untracked(),
        ));
    };

    view! {
        <div class="filter-panel">
            <div class="filter-panel-content">
                <Flex gap=FlexGap::Small align=FlexAlign::End>
                    <DateInput label="С" value=date_from />
                    <DateInput label="По" value=date_to />
                    {fields.category.then(|| view! {
                        <div style="min-width: 200px;">
                            <Label>"Категория"</Label>
                            <CategorySelect value=category_id include_inactive=true empty_label="Все категории" />
                        </div>
                    })}
                    {fields.trainer.then(|| view! {
                        <div style="min-width: 200px;">
                            <Label>"Тренер"</Label>
                            <Select value=trainer_id>
                                <option value="">"Все тренеры"</option>
                                <For
                                    each=move || trainers.get()
                                    key=|t| t.id.clone()
                                    children=move |t: UserShort| {
                                        view! { <option value=t.id.clone()>{t.display_name.clone()}</option> }
                                    }
                                />
                            </Select>
                        </div>
                    })}
                    {fields.section.then(|| view! {
                        <div style="min-width: 200px;">
                            <Label>"Отдел"</Label>
                            <SectionSelect value=section_id empty_label="Все отделы" />
                        </div>
                    })}
                    {fields.status.then(|| view! {
                        <div style="min-width: 160px;">
                            <Label>"Статус"</Label>
                            <Select value=status>
                                <option value="">"Все статусы"</option>
                                {InquiryStatus::ALL
                                    .iter()
                                    .map(|s| view! { <option value=s.as_str()>{s.label()}</option> })
                                    .collect_view()}
                            </Select>
                        </div>
                    })}
                    <Button appearance=ButtonAppearance::Primary on_click=apply>
                        {icon("filter")}
                        " Применить"
                    </Button>
                </Flex>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_report_filter_skips_blank_fields() {
        let filter = build_report_filter("2024-03-01", "", " ", "t1", "", "closed");
        assert_eq!(filter.date_from.as_deref(), Some("2024-03-01"));
        assert_eq!(filter.date_to, None);
        assert_eq!(filter.category_id, None);
        assert_eq!(filter.trainer_id.as_deref(), Some("t1"));
        assert_eq!(filter.status, Some(InquiryStatus::Closed));

        assert_eq!(build_report_filter("", "", "", "", "", "").status, None);
    }
}
