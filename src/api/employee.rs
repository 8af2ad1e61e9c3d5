use crate::{
    auth::auth::AuthUser, engine::AttendanceService, error::AppError, model::employee::Employee,
};
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "12345")]
    pub cedula: String,
    #[schema(example = "Ana")]
    pub nombre: String,
    /// ADMINISTRACION, PUNTO_DE_VENTA or EXTERNO.
    #[schema(example = "PUNTO_DE_VENTA")]
    pub area: String,
}

/// Register Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee registered", body = Employee),
        (status = 400, description = "Missing or malformed field", body = Object, example = json!({
            "message": "cedula, nombre and area are required"
        })),
        (status = 409, description = "Duplicate cedula", body = Object, example = json!({
            "message": "An employee with cedula 12345 already exists"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_employee(
    auth: AuthUser,
    service: web::Data<AttendanceService>,
    payload: web::Json<CreateEmployee>,
) -> Result<HttpResponse, AppError> {
    auth.require_admin()?;

    let employee = service
        .register_employee(&payload.cedula, &payload.nombre, &payload.area)
        .await?;

    Ok(HttpResponse::Created().json(employee))
}

/// List Employees, ordered by name
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "Roster", body = [Employee]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_employees(
    _auth: AuthUser,
    service: web::Data<AttendanceService>,
) -> Result<HttpResponse, AppError> {
    let employees = service.list_employees().await?;
    Ok(HttpResponse::Ok().json(employees))
}

/// Get Employee by cedula
#[utoipa::path(
    get,
    path = "/api/employees/{cedula}",
    params(
        ("cedula", Path, description = "Employee cedula, case-insensitive")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found. Register the employee first"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_employee(
    _auth: AuthUser,
    service: web::Data<AttendanceService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let employee = service.find_employee(&path).await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Delete Employee by cedula
#[utoipa::path(
    delete,
    path = "/api/employees/{cedula}",
    params(
        ("cedula", Path, description = "Employee cedula, case-insensitive")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Successfully deleted"
        })),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_employee(
    auth: AuthUser,
    service: web::Data<AttendanceService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    auth.require_admin()?;

    let employee = service.delete_employee(&path).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted",
        "cedula": employee.cedula
    })))
}
