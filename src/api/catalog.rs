use crate::{auth::auth::AuthUser, engine::AttendanceService, model::employee::Area};
use actix_web::{HttpResponse, web};
use serde::Serialize;
use strum::IntoEnumIterator;
use utoipa::ToSchema;

/// Choices offered by the registration and movement forms.
#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogResponse {
    pub areas: Vec<Area>,
    #[schema(example = json!(["CELULAR-CORPORATIVO", "NO-INGRESA-NADA"]))]
    pub personal_items: Vec<String>,
    #[schema(example = json!(["INVENTARIO", "CAJEROS"]))]
    pub tasks: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/api/catalog",
    responses(
        (status = 200, description = "Areas, personal items and tasks", body = CatalogResponse)
    ),
    tag = "Attendance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn catalog(_auth: AuthUser, service: web::Data<AttendanceService>) -> HttpResponse {
    let catalog = service.catalog();
    HttpResponse::Ok().json(CatalogResponse {
        areas: Area::iter().collect(),
        personal_items: catalog.personal_items.clone(),
        tasks: catalog.tasks.clone(),
    })
}
