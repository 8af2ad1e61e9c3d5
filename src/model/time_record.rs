use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Placeholder shown when a record's employee is no longer in the roster.
pub const MISSING: &str = "N/A";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum MovementType {
    /// Arrival / clock-in.
    Entrada,
    /// Departure / clock-out.
    Salida,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TimeRecord {
    pub id: u64,
    pub employee_id: u64,
    pub movement: MovementType,
    /// Assigned by the store at insert time.
    pub registered_at: DateTime<Utc>,
    pub personal_items: Vec<String>,
    pub task: Option<String>,
}

/// Employee columns carried along with a joined record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EmployeeSnapshot {
    pub cedula: String,
    pub nombre: String,
    pub area: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecordWithEmployee {
    #[serde(flatten)]
    pub record: TimeRecord,
    pub employee: Option<EmployeeSnapshot>,
}

impl RecordWithEmployee {
    pub fn cedula(&self) -> &str {
        self.employee.as_ref().map_or(MISSING, |e| e.cedula.as_str())
    }

    pub fn nombre(&self) -> &str {
        self.employee.as_ref().map_or(MISSING, |e| e.nombre.as_str())
    }

    pub fn area(&self) -> &str {
        self.employee.as_ref().map_or(MISSING, |e| e.area.as_str())
    }
}

/// Anything positioned in time by its registration timestamp.
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

impl Timestamped for TimeRecord {
    fn timestamp(&self) -> DateTime<Utc> {
        self.registered_at
    }
}

impl Timestamped for RecordWithEmployee {
    fn timestamp(&self) -> DateTime<Utc> {
        self.record.registered_at
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct TimeRecordRow {
    pub id: u64,
    pub employee_id: u64,
    pub movement: String,
    pub registered_at: DateTime<Utc>,
    pub personal_items: Json<Vec<String>>,
    pub task: Option<String>,
}

impl TryFrom<TimeRecordRow> for TimeRecord {
    type Error = strum::ParseError;

    fn try_from(row: TimeRecordRow) -> Result<Self, Self::Error> {
        Ok(TimeRecord {
            id: row.id,
            employee_id: row.employee_id,
            movement: row.movement.parse()?,
            registered_at: row.registered_at,
            personal_items: row.personal_items.0,
            task: row.task,
        })
    }
}

/// `time_records LEFT JOIN employees` row.
#[derive(Debug, sqlx::FromRow)]
pub struct JoinedRecordRow {
    #[sqlx(flatten)]
    pub record: TimeRecordRow,
    pub cedula: Option<String>,
    pub nombre: Option<String>,
    pub area: Option<String>,
}

impl TryFrom<JoinedRecordRow> for RecordWithEmployee {
    type Error = strum::ParseError;

    fn try_from(row: JoinedRecordRow) -> Result<Self, Self::Error> {
        let employee = match (row.cedula, row.nombre, row.area) {
            (Some(cedula), Some(nombre), Some(area)) => Some(EmployeeSnapshot {
                cedula,
                nombre,
                area,
            }),
            _ => None,
        };

        Ok(RecordWithEmployee {
            record: row.record.try_into()?,
            employee,
        })
    }
}
