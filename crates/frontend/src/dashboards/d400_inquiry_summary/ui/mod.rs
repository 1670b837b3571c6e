use contracts::dashboards::common::{DayCount, GroupCount, ReportFilter};
use contracts::dashboards::d400_inquiry_summary::dto::InquirySummaryReport;
use contracts::domain::a003_inquiry::status::InquiryStatus;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::dashboards::common::{current_month_filter, FilterFields, ReportFilterBar};
use crate::dashboards::d400_inquiry_summary::api;
use crate::shared::date_utils::format_date;
use crate::shared::export::download_csv;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DASHBOARD;
use crate::shared::toast::use_toasts;

/// Доля от общего числа в процентах для ширины полосы
pub fn share_percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}

fn render_groups(title: &'static str, groups: Vec<GroupCount>, total: usize) -> impl IntoView {
    view! {
        <div class="report-card">
            <h3 class="report-card__title">{title}</h3>
            {if groups.is_empty() {
                view! { <div class="text-muted">"Нет данных"</div> }.into_any()
            } else {
                groups
                    .into_iter()
                    .map(|g| {
                        let width = format!("width: {:.1}%;", share_percent(g.count, total));
                        view! {
                            <div class="report-bar">
                                <span class="report-bar__label">{g.name}</span>
                                <div class="report-bar__track">
                                    <div class="report-bar__fill" style=width></div>
                                </div>
                                <span class="report-bar__value">{g.count}</span>
                            </div>
                        }
                    })
                    .collect_view()
                    .into_any()
            }}
        </div>
    }
}

fn render_days(days: Vec<DayCount>) -> impl IntoView {
    view! {
        <div class="report-card">
            <h3 class="report-card__title">"По дням"</h3>
            <Table attr:style="width: 100%;">
                <TableHeader>
                    <TableRow>
                        <TableHeaderCell>"Дата"</TableHeaderCell>
                        <TableHeaderCell>"Создано"</TableHeaderCell>
                    </TableRow>
                </TableHeader>
                <TableBody>
                    {days
                        .into_iter()
                        .map(|d| view! {
                            <TableRow>
                                <TableCell>{format_date(&d.day)}</TableCell>
                                <TableCell>{d.count}</TableCell>
                            </TableRow>
                        })
                        .collect_view()}
                </TableBody>
            </Table>
        </div>
    }
}

/// Сводка по обращениям за период с выгрузкой списка в CSV
#[component]
pub fn InquirySummaryDashboard() -> impl IntoView {
    let toasts = use_toasts();
    let filter: RwSignal<ReportFilter> = RwSignal::new(current_month_filter());
    let (data, set_data) = signal(None::<InquirySummaryReport>);
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal(None::<String>);

    Effect::new(move |_| {
        let current = filter.get();
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match api::get_summary(&current).await {
                Ok(report) => set_data.set(Some(report)),
                Err(e) => set_error.set(Some(e.to_string())),
            }
            set_loading.set(false);
        });
    });

    let export = move |_| {
        let current = filter.get_untracked();
        spawn_local(async move {
            match api::export_inquiries_csv(&current).await {
                Ok(csv) => {
                    if let Err(e) = download_csv(&csv, "inquiries.csv") {
                        toasts.error(e);
                    }
                }
                Err(e) => toasts.api_error(&e),
            }
        });
    };

    view! {
        <PageFrame page_id="d400_inquiry_summary--dashboard" category=PAGE_CAT_DASHBOARD>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Сводка по обращениям"</h1>
                </div>
                <div class="page__header-right">
                    <Button appearance=ButtonAppearance::Secondary on_click=export>
                        {icon("download")}
                        " Выгрузить CSV"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                <ReportFilterBar
                    filter=filter
                    fields=FilterFields { category: true, trainer: true, section: false, status: true }
                />

                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}
                {move || loading.get().then(|| view! { <div class="text-muted">"Загрузка..."</div> })}

                {move || data.get().map(|report| {
                    let total = report.total;
                    view! {
                        <div class="report-kpis">
                            <div class="report-kpi">
                                <span class="report-kpi__value">{total}</span>
                                <span class="report-kpi__label">"Всего"</span>
                            </div>
                            {InquiryStatus::ALL
                                .iter()
                                .map(|s| view! {
                                    <div class="report-kpi">
                                        <span class="report-kpi__value">{report.by_status.get(*s)}</span>
                                        <span class=format!("report-kpi__label {}", s.badge_class())>{s.label()}</span>
                                    </div>
                                })
                                .collect_view()}
                        </div>
                        <div class="report-grid">
                            {render_groups("По категориям", report.by_category, total)}
                            {render_groups("По тренерам", report.by_trainer, total)}
                            {render_days(report.by_day)}
                        </div>
                    }
                })}
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_percent() {
        assert_eq!(share_percent(0, 0), 0.0);
        assert_eq!(share_percent(1, 4), 25.0);
    }
}
