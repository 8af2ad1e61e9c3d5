use crate::{
    auth::auth::AuthUser,
    engine::{AttendanceService, DateRange},
    error::AppError,
    export::CONTENT_TYPE,
};
use actix_web::{
    HttpResponse,
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::instrument;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExportQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// Delete every time record once the workbook is built. Only allowed
    /// without `start`/`end`.
    pub clear: Option<bool>,
}

/// Download the records of a range as an xlsx workbook
#[utoipa::path(
    post,
    path = "/api/export",
    params(ExportQuery),
    responses(
        (status = 200, description = "xlsx workbook, sent as an attachment"),
        (status = 400, description = "Nothing to export, inverted range, or clear with a range", body = Object, example = json!({
            "message": "There are no records to export"
        })),
        (status = 403, description = "Admin only"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Records",
    security(
        ("bearer_auth" = [])
    )
)]
#[instrument(name = "export_records", skip(service, auth), fields(user = %auth.username))]
pub async fn export_records(
    auth: AuthUser,
    service: web::Data<AttendanceService>,
    query: web::Query<ExportQuery>,
) -> Result<HttpResponse, AppError> {
    auth.require_admin()?;

    let range = DateRange {
        start: query.start,
        end: query.end,
    };
    let file = service
        .export(&range, query.clear.unwrap_or(false))
        .await?;

    Ok(HttpResponse::Ok()
        .content_type(CONTENT_TYPE)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file.file_name)],
        })
        .body(file.bytes))
}
