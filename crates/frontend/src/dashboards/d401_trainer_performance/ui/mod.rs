use contracts::dashboards::common::ReportFilter;
use contracts::dashboards::d401_trainer_performance::dto::TrainerPerformanceRow;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::dashboards::common::{current_month_filter, FilterFields, ReportFilterBar};
use crate::dashboards::d401_trainer_performance::api;
use crate::shared::date_utils::format_hours;
use crate::shared::export::{export_to_csv, CsvExportable};
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DASHBOARD;
use crate::shared::toast::use_toasts;

pub fn format_rating(avg: Option<f64>) -> String {
    avg.map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "—".to_string())
}

impl CsvExportable for TrainerPerformanceRow {
    fn headers() -> Vec<&'static str> {
        vec![
            "Тренер",
            "Назначено",
            "Закрыто",
            "Переоткрыто",
            "Средняя оценка",
            "Оценок",
            "Среднее время закрытия, ч",
        ]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.trainer_name.clone(),
            self.assigned.to_string(),
            self.closed.to_string(),
            self.reopened.to_string(),
            self.avg_rating.map(|v| format!("{:.2}", v)).unwrap_or_default(),
            self.ratings_count.to_string(),
            self.avg_close_hours
                .map(|v| format!("{:.1}", v))
                .unwrap_or_default(),
        ]
    }
}

#[component]
pub fn TrainerPerformanceDashboard() -> impl IntoView {
    let toasts = use_toasts();
    let filter: RwSignal<ReportFilter> = RwSignal::new(current_month_filter());
    let rows: RwSignal<Vec<TrainerPerformanceRow>> = RwSignal::new(Vec::new());
    let (error, set_error) = signal(None::<String>);

    Effect::new(move |_| {
        let current = filter.get();
        set_error.set(None);
        spawn_local(async move {
            match api::get_report(&current).await {
                Ok(report) => rows.set(report.rows),
                Err(e) => set_error.set(Some(e.to_string())),
            }
        });
    });

    let export = move |_| {
        if let Err(e) = rows.with_untracked(|r| export_to_csv(r, "trainer_performance.csv")) {
            toasts.error(e);
        }
    };

    view! {
        <PageFrame page_id="d401_trainer_performance--dashboard" category=PAGE_CAT_DASHBOARD>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Работа тренеров"</h1>
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
                    fields=FilterFields { category: true, ..FilterFields::default() }
                />

                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell>"Тренер"</TableHeaderCell>
                                <TableHeaderCell>"Назначено"</TableHeaderCell>
                                <TableHeaderCell>"Закрыто"</TableHeaderCell>
                                <TableHeaderCell>"Переоткрыто"</TableHeaderCell>
                                <TableHeaderCell>"Средняя оценка"</TableHeaderCell>
                                <TableHeaderCell>"Время закрытия"</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || rows.get()
                                key=|r| r.trainer_id.clone()
                                children=move |r: TrainerPerformanceRow| view! {
                                    <TableRow>
                                        <TableCell>
                                            <TableCellLayout truncate=true>{r.trainer_name.clone()}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>{r.assigned}</TableCell>
                                        <TableCell>{r.closed}</TableCell>
                                        <TableCell>{r.reopened}</TableCell>
                                        <TableCell>
                                            {format!("{} ({})", format_rating(r.avg_rating), r.ratings_count)}
                                        </TableCell>
                                        <TableCell>{format_hours(r.avg_close_hours)}</TableCell>
                                    </TableRow>
                                }
                            />
                        </TableBody>
                    </Table>
                </div>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_row_leaves_missing_metrics_blank() {
        let row = TrainerPerformanceRow {
            trainer_id: "t1".into(),
            trainer_name: "Иванов".into(),
            assigned: 4,
            closed: 3,
            reopened: 1,
            avg_rating: None,
            ratings_count: 0,
            avg_close_hours: Some(2.5),
        };
        assert_eq!(
            row.to_csv_row(),
            vec!["Иванов", "4", "3", "1", "", "0", "2.5"]
        );
        assert_eq!(TrainerPerformanceRow::headers().len(), row.to_csv_row().len());
        assert_eq!(format_rating(Some(4.5)), "4.50");
    }
}
