use crate::api::catalog::CatalogResponse;
use crate::api::employee::CreateEmployee;
use crate::api::movement::MovementRequest;
use crate::engine::metrics::{EmployeeMetric, MetricsSummary};
use crate::engine::service::MetricsReport;
use crate::engine::state::{BoardEntry, DayState};
use crate::model::employee::{Area, Employee};
use crate::model::role::Role;
use crate::model::time_record::{EmployeeSnapshot, MovementType, RecordWithEmployee, TimeRecord};
use crate::models::{LoginReqDto, LoginResponse};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bodega Attendance API",
        version = "1.0.0",
        description = r#"
## Warehouse Attendance

Records when each employee enters (**ENTRADA**) and leaves (**SALIDA**) the
warehouse, together with the personal items they carry in and the task they
are assigned for the shift.

### Key Features
- **Employees**: register, look up and remove employees by cedula
- **Movements**: ENTRADA and SALIDA must alternate per employee per business day
- **Records**: list by date range, per-employee metrics, xlsx export

### Security
Every endpoint except `/auth/login` needs a **JWT Bearer** token.
Roster changes, metrics, export and clearing records are **ADMIN** only.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::login,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::delete_employee,

        crate::api::movement::register_movement,
        crate::api::movement::day_board,
        crate::api::catalog::catalog,

        crate::api::records::list_records,
        crate::api::records::clear_records,
        crate::api::metrics::metrics,
        crate::api::export::export_records
    ),
    components(
        schemas(
            LoginReqDto,
            LoginResponse,
            Role,
            CreateEmployee,
            Employee,
            Area,
            MovementRequest,
            MovementType,
            TimeRecord,
            EmployeeSnapshot,
            RecordWithEmployee,
            DayState,
            BoardEntry,
            CatalogResponse,
            EmployeeMetric,
            MetricsSummary,
            MetricsReport
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Session APIs"),
        (name = "Employee", description = "Employee roster APIs"),
        (name = "Attendance", description = "ENTRADA / SALIDA APIs"),
        (name = "Records", description = "Record listing, metrics and export APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
