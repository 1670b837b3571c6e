use contracts::dashboards::common::ReportFilter;
use contracts::dashboards::d401_trainer_performance::dto::TrainerPerformanceReport;

use crate::dashboards::common::report_url;
use crate::shared::api_utils::{get_json, ApiResult};

pub async fn get_report(filter: &ReportFilter) -> ApiResult<TrainerPerformanceReport> {
    get_json(&report_url("/api/reports/trainers", filter)?).await
}
