use contracts::dashboards::common::ReportFilter;
use contracts::dashboards::d400_inquiry_summary::dto::InquirySummaryReport;

use crate::dashboards::common::report_url;
use crate::shared::api_utils::{get_json, get_text, ApiResult};

pub async fn get_summary(filter: &ReportFilter) -> ApiResult<InquirySummaryReport> {
    get_json(&report_url("/api/reports/inquiries", filter)?).await
}

/// Готовый CSV (`;`, UTF-8 BOM) со списком обращений под фильтром
pub async fn export_inquiries_csv(filter: &ReportFilter) -> ApiResult<String> {
    get_text(&report_url("/api/reports/inquiries/export", filter)?).await
}
