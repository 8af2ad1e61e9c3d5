use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// Work area an employee belongs to. Stored and sent as the upper-case name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
    ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Area {
    Administracion,
    PuntoDeVenta,
    Externo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "cedula": "12345",
        "nombre": "ANA",
        "area": "PUNTO_DE_VENTA",
        "created_at": "2026-10-16T13:00:00Z"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    /// Unique natural key, always upper-case.
    #[schema(example = "12345")]
    pub cedula: String,

    #[schema(example = "ANA")]
    pub nombre: String,

    pub area: Area,

    pub created_at: DateTime<Utc>,
}

impl Employee {
    /// Case-insensitive cedula match.
    pub fn has_cedula(&self, cedula: &str) -> bool {
        self.cedula.eq_ignore_ascii_case(cedula.trim())
    }
}

/// Roster row as stored in the `employees` table.
#[derive(Debug, sqlx::FromRow)]
pub struct EmployeeRow {
    pub id: u64,
    pub cedula: String,
    pub nombre: String,
    pub area: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = strum::ParseError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        Ok(Employee {
            id: row.id,
            cedula: row.cedula,
            nombre: row.nombre,
            area: row.area.parse()?,
            created_at: row.created_at,
        })
    }
}
