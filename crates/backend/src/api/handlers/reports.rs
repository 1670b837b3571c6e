use axum::extract::{Json, Query};
use axum::http::header;
use axum::response::IntoResponse;
use contracts::dashboards::common::ReportFilter;
use contracts::dashboards::d400_inquiry_summary::dto::InquirySummaryReport;
use contracts::dashboards::d401_trainer_performance::dto::TrainerPerformanceReport;
use contracts::dashboards::d402_section_follow_ups::dto::SectionFollowUpReport;

use crate::dashboards::{d400_inquiry_summary, d401_trainer_performance, d402_section_follow_ups, export};
use crate::shared::error::ServiceResult;

/// GET /api/reports/inquiries
pub async fn inquiry_summary(
    Query(filter): Query<ReportFilter>,
) -> ServiceResult<Json<InquirySummaryReport>> {
    Ok(Json(
        d400_inquiry_summary::service::get_inquiry_summary(&filter).await?,
    ))
}

/// GET /api/reports/trainers
pub async fn trainer_performance(
    Query(filter): Query<ReportFilter>,
) -> ServiceResult<Json<TrainerPerformanceReport>> {
    Ok(Json(
        d401_trainer_performance::service::get_trainer_performance(&filter).await?,
    ))
}

/// GET /api/reports/sections
pub async fn section_follow_ups(
    Query(filter): Query<ReportFilter>,
) -> ServiceResult<Json<SectionFollowUpReport>> {
    Ok(Json(
        d402_section_follow_ups::service::get_section_follow_ups(&filter).await?,
    ))
}

/// GET /api/reports/inquiries/export (text/csv)
pub async fn export_inquiries(
    Query(filter): Query<ReportFilter>,
) -> ServiceResult<impl IntoResponse> {
    let content = export::export_inquiries(&filter).await.map_err(|e| {
        tracing::error!("CSV export failed: {}", e);
        e
    })?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"inquiries.csv\"",
            ),
        ],
        content,
    ))
}
