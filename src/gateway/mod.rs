//! Persistence gateway consumed by the attendance service.
//!
//! The store is authoritative for employees and time records; the service only
//! reads them and proposes inserts. Adapters map their failures into
//! [`GatewayError`] so the service never sees driver errors.

use async_trait::async_trait;
use derive_more::Display;

use crate::model::{
    employee::{Area, Employee},
    time_record::{MovementType, RecordWithEmployee, TimeRecord},
};

#[cfg(test)]
pub mod memory;
pub mod mysql;

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// A uniqueness constraint rejected the write.
    #[display(fmt = "{}", _0)]
    Conflict(String),
    /// Connection, query or decoding failure.
    #[display(fmt = "persistence failure: {}", _0)]
    Failure(String),
}

impl std::error::Error for GatewayError {}

#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub cedula: String,
    pub nombre: String,
    pub area: Area,
}

#[derive(Debug, Clone)]
pub struct NewTimeRecord {
    pub employee_id: u64,
    pub movement: MovementType,
    pub personal_items: Vec<String>,
    pub task: Option<String>,
}

#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Fails with [`GatewayError::Conflict`] when the cedula already exists.
    async fn insert_employee(&self, new: &NewEmployee) -> Result<Employee, GatewayError>;

    /// Returns `false` when no row had that id.
    async fn delete_employee(&self, id: u64) -> Result<bool, GatewayError>;

    async fn find_employee_by_id(&self, id: u64) -> Result<Option<Employee>, GatewayError>;

    /// Case-insensitive lookup on the natural key.
    async fn find_employee_by_cedula(&self, cedula: &str)
    -> Result<Option<Employee>, GatewayError>;

    /// Ordered by name.
    async fn list_employees(&self) -> Result<Vec<Employee>, GatewayError>;

    /// Every record joined with its employee, newest first.
    async fn list_time_records(&self) -> Result<Vec<RecordWithEmployee>, GatewayError>;

    /// One employee's records, newest first.
    async fn list_employee_records(
        &self,
        employee_id: u64,
    ) -> Result<Vec<TimeRecord>, GatewayError>;

    /// Timestamp is assigned by the store.
    async fn insert_time_record(&self, new: &NewTimeRecord) -> Result<TimeRecord, GatewayError>;

    /// Irreversible; returns the number of deleted rows.
    async fn delete_all_time_records(&self) -> Result<u64, GatewayError>;
}
