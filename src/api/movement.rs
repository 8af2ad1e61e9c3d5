use crate::{
    auth::auth::AuthUser,
    engine::{AttendanceService, state::BoardEntry},
    error::AppError,
    model::time_record::{MovementType, TimeRecord},
};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, ToSchema)]
pub struct MovementRequest {
    #[schema(example = "12345")]
    pub cedula: String,
    pub movement: MovementType,
    /// Required for ENTRADA; ignored for SALIDA, which copies the open ENTRADA.
    #[serde(default)]
    #[schema(example = json!(["CELULAR-CORPORATIVO"]))]
    pub personal_items: Vec<String>,
    /// Required for ENTRADA; ignored for SALIDA.
    #[schema(example = "INVENTARIO")]
    pub task: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BoardQuery {
    /// Show every record instead of today's only.
    pub all: Option<bool>,
}

/// Register an ENTRADA or SALIDA
#[utoipa::path(
    post,
    path = "/api/movements",
    request_body = MovementRequest,
    responses(
        (status = 201, description = "Movement registered", body = TimeRecord),
        (status = 400, description = "Missing personal items or task", body = Object, example = json!({
            "message": "Select at least one personal item"
        })),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Open ENTRADA already exists, or no ENTRADA to close", body = Object, example = json!({
            "message": "ANA (12345) already has an ENTRADA without SALIDA"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance",
    security(
        ("bearer_auth" = [])
    )
)]
#[instrument(name = "register_movement", skip(service, payload, auth), fields(cedula = %payload.cedula, movement = %payload.movement, user = %auth.username))]
pub async fn register_movement(
    auth: AuthUser,
    service: web::Data<AttendanceService>,
    payload: web::Json<MovementRequest>,
) -> Result<HttpResponse, AppError> {
    let record = service
        .register_movement_by_cedula(
            &payload.cedula,
            payload.movement,
            &payload.personal_items,
            payload.task.as_deref(),
        )
        .await?;

    Ok(HttpResponse::Created().json(record))
}

/// Today's board: employees with records, their day state and latest records
#[utoipa::path(
    get,
    path = "/api/movements/today",
    params(BoardQuery),
    responses(
        (status = 200, description = "Day board", body = [BoardEntry]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn day_board(
    _auth: AuthUser,
    service: web::Data<AttendanceService>,
    query: web::Query<BoardQuery>,
) -> Result<HttpResponse, AppError> {
    let board = service.day_board(query.all.unwrap_or(false)).await?;
    Ok(HttpResponse::Ok().json(board))
}
