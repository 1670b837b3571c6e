use contracts::dashboards::common::ReportFilter;
use contracts::dashboards::d402_section_follow_ups::dto::SectionFollowUpReport;

use crate::dashboards::common::report_url;
use crate::shared::api_utils::{get_json, ApiResult};

pub async fn get_report(filter: &ReportFilter) -> ApiResult<SectionFollowUpReport> {
    get_json(&report_url("/api/reports/sections", filter)?).await
}
