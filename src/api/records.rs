use crate::{
    auth::auth::AuthUser,
    engine::{AttendanceService, DateRange},
    error::AppError,
    model::time_record::RecordWithEmployee,
};
use actix_web::{HttpResponse, web};
use serde_json::json;
use tracing::instrument;

/// List time records, most recent first, with their employee
#[utoipa::path(
    get,
    path = "/api/records",
    params(DateRange),
    responses(
        (status = 200, description = "Records in range", body = [RecordWithEmployee]),
        (status = 400, description = "Inverted range", body = Object, example = json!({
            "message": "start date must not be after end date"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Records",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_records(
    _auth: AuthUser,
    service: web::Data<AttendanceService>,
    query: web::Query<DateRange>,
) -> Result<HttpResponse, AppError> {
    let records = service.list_records(&query).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// Delete every time record. Employees are kept
#[utoipa::path(
    delete,
    path = "/api/records",
    responses(
        (status = 200, description = "Records deleted", body = Object, example = json!({
            "message": "All time records deleted",
            "deleted": 42
        })),
        (status = 403, description = "Admin only"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Records",
    security(
        ("bearer_auth" = [])
    )
)]
#[instrument(name = "clear_records", skip(service, auth), fields(user = %auth.username))]
pub async fn clear_records(
    auth: AuthUser,
    service: web::Data<AttendanceService>,
) -> Result<HttpResponse, AppError> {
    auth.require_admin()?;

    let deleted = service.clear_records().await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "All time records deleted",
        "deleted": deleted
    })))
}
