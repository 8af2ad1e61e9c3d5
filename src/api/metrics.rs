use crate::{
    auth::auth::AuthUser,
    engine::{
        AttendanceService, DateRange,
        metrics::{MetricSort, SortField, SortOrder},
        service::MetricsReport,
    },
    error::AppError,
};
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MetricsQuery {
    /// First business day, inclusive.
    pub start: Option<NaiveDate>,
    /// Last business day, inclusive.
    pub end: Option<NaiveDate>,
    /// entradas, salidas or total (default).
    #[param(inline)]
    pub sort: Option<SortField>,
    /// asc or desc (default).
    #[param(inline)]
    pub order: Option<SortOrder>,
}

impl MetricsQuery {
    fn range(&self) -> DateRange {
        DateRange {
            start: self.start,
            end: self.end,
        }
    }

    fn sort(&self) -> MetricSort {
        MetricSort::new(self.sort.unwrap_or_default(), self.order.unwrap_or_default())
    }
}

/// Per-employee movement counts plus summary statistics
#[utoipa::path(
    get,
    path = "/api/metrics",
    params(MetricsQuery),
    responses(
        (status = 200, description = "Metrics for the range", body = MetricsReport),
        (status = 400, description = "Inverted range"),
        (status = 403, description = "Admin only"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Records",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn metrics(
    auth: AuthUser,
    service: web::Data<AttendanceService>,
    query: web::Query<MetricsQuery>,
) -> Result<HttpResponse, AppError> {
    auth.require_admin()?;

    let report = service.metrics(&query.range(), query.sort()).await?;
    Ok(HttpResponse::Ok().json(report))
}
