use contracts::dashboards::common::ReportFilter;
use contracts::dashboards::d402_section_follow_ups::dto::SectionFollowUpRow;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::dashboards::common::{current_month_filter, FilterFields, ReportFilterBar};
use crate::dashboards::d402_section_follow_ups::api;
use crate::shared::date_utils::format_hours;
use crate::shared::export::{export_to_csv, CsvExportable};
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DASHBOARD;
use crate::shared::toast::use_toasts;

impl CsvExportable for SectionFollowUpRow {
    fn headers() -> Vec<&'static str> {
        vec!["Отдел", "Запросов", "Отвечено", "Ожидает", "Среднее время ответа, ч"]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.section_name.clone(),
            self.requested.to_string(),
            self.answered.to_string(),
            self.pending.to_string(),
            self.avg_answer_hours
                .map(|v| format!("{:.1}", v))
                .unwrap_or_default(),
        ]
    }
}

/// Итоговая строка по всем отделам
pub fn totals(rows: &[SectionFollowUpRow]) -> (usize, usize, usize) {
    rows.iter().fold((0, 0, 0), |(r, a, p), row| {
        (r + row.requested, a + row.answered, p + row.pending)
    })
}

#[component]
pub fn SectionFollowUpsDashboard() -> impl IntoView {
    let toasts = use_toasts();
    let filter: RwSignal<ReportFilter> = RwSignal::new(current_month_filter());
    let rows: RwSignal<Vec<SectionFollowUpRow>> = RwSignal::new(Vec::new());
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
        if let Err(e) = rows.with_untracked(|r| export_to_csv(r, "section_follow_ups.csv")) {
            toasts.error(e);
        }
    };

    view! {
        <PageFrame page_id="d402_section_follow_ups--dashboard" category=PAGE_CAT_DASHBOARD>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Запросы в отделы"</h1>
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
                    fields=FilterFields { section: true, ..FilterFields::default() }
                />

                {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

                <div class="table-wrapper">
                    <Table attr:style="width: 100%;">
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell>"Отдел"</TableHeaderCell>
                                <TableHeaderCell>"Запросов"</TableHeaderCell>
                                <TableHeaderCell>"Отвечено"</TableHeaderCell>
                                <TableHeaderCell>"Ожидает"</TableHeaderCell>
                                <TableHeaderCell>"Среднее время ответа"</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || rows.get()
                                key=|r| r.section_id.clone()
                                children=move |r: SectionFollowUpRow| view! {
                                    <TableRow>
                                        <TableCell>
                                            <TableCellLayout truncate=true>{r.section_name.clone()}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>{r.requested}</TableCell>
                                        <TableCell>{r.answered}</TableCell>
                                        <TableCell>{r.pending}</TableCell>
                                        <TableCell>{format_hours(r.avg_answer_hours)}</TableCell>
                                    </TableRow>
                                }
                            />
                            {move || {
                                let (requested, answered, pending) = rows.with(|r| totals(r));
                                view! {
                                    <TableRow attr:style="font-weight: 600;">
                                        <TableCell>"Итого"</TableCell>
                                        <TableCell>{requested}</TableCell>
                                        <TableCell>{answered}</TableCell>
                                        <TableCell>{pending}</TableCell>
                                        <TableCell></TableCell>
                                    </TableRow>
                                }
                            }}
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

    fn row(id: &str, requested: usize, answered: usize) -> SectionFollowUpRow {
        SectionFollowUpRow {
            section_id: id.into(),
            section_name: id.into(),
            requested,
            answered,
            pending: requested - answered,
            avg_answer_hours: None,
        }
    }

    #[test]
    fn test_totals() {
        assert_eq!(totals(&[]), (0, 0, 0));
        assert_eq!(totals(&[row("a", 3, 1), row("b", 2, 2)]), (5, 3, 2));
    }
}
