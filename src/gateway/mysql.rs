use async_trait::async_trait;
use sqlx::{MySqlPool, types::Json};
use tracing::debug;

use super::{GatewayError, NewEmployee, NewTimeRecord, PersistenceGateway};
use crate::model::{
    employee::{Employee, EmployeeRow},
    time_record::{JoinedRecordRow, RecordWithEmployee, TimeRecord, TimeRecordRow},
};

const EMPLOYEE_COLUMNS: &str = "id, cedula, nombre, area, created_at";
const RECORD_COLUMNS: &str = "id, employee_id, movement, registered_at, personal_items, task";

/// MySQL `23000`: integrity constraint violation (duplicate key, FK).
const INTEGRITY_VIOLATION: &str = "23000";

#[derive(Clone)]
pub struct MySqlGateway {
    pool: MySqlPool,
}

impl MySqlGateway {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn record_by_id(&self, id: u64) -> Result<TimeRecord, GatewayError> {
        let row = sqlx::query_as::<_, TimeRecordRow>(&format!(
            "SELECT {RECORD_COLUMNS} FROM time_records WHERE id = ?"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(failure)?;

        TimeRecord::try_from(row).map_err(decode)
    }
}

fn failure(e: sqlx::Error) -> GatewayError {
    GatewayError::Failure(e.to_string())
}

fn decode(e: strum::ParseError) -> GatewayError {
    GatewayError::Failure(format!("unexpected stored value: {e}"))
}

fn is_integrity_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(INTEGRITY_VIOLATION),
        _ => false,
    }
}

fn into_employees(rows: Vec<EmployeeRow>) -> Result<Vec<Employee>, GatewayError> {
    rows.into_iter()
        .map(|row| Employee::try_from(row).map_err(decode))
        .collect()
}

#[async_trait]
impl PersistenceGateway for MySqlGateway {
    async fn insert_employee(&self, new: &NewEmployee) -> Result<Employee, GatewayError> {
        let result = sqlx::query("INSERT INTO employees (cedula, nombre, area) VALUES (?, ?, ?)")
            .bind(&new.cedula)
            .bind(&new.nombre)
            .bind(new.area.as_ref())
            .execute(&self.pool)
            .await;

        let id = match result {
            Ok(done) => done.last_insert_id(),
            Err(e) if is_integrity_violation(&e) => {
                return Err(GatewayError::Conflict(format!(
                    "duplicate cedula {}",
                    new.cedula
                )));
            }
            Err(e) => return Err(failure(e)),
        };

        self.find_employee_by_id(id).await?.ok_or_else(|| {
            GatewayError::Failure(format!("employee {id} vanished after insert"))
        })
    }

    async fn delete_employee(&self, id: u64) -> Result<bool, GatewayError> {
        let done = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(failure)?;

        Ok(done.rows_affected() > 0)
    }

    async fn find_employee_by_id(&self, id: u64) -> Result<Option<Employee>, GatewayError> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(failure)?;

        row.map(Employee::try_from).transpose().map_err(decode)
    }

    async fn find_employee_by_cedula(
        &self,
        cedula: &str,
    ) -> Result<Option<Employee>, GatewayError> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE cedula = ?"
        ))
        .bind(cedula.trim().to_uppercase())
        .fetch_optional(&self.pool)
        .await
        .map_err(failure)?;

        row.map(Employee::try_from).transpose().map_err(decode)
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, GatewayError> {
        let rows = sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY nombre"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(failure)?;

        into_employees(rows)
    }

    async fn list_time_records(&self) -> Result<Vec<RecordWithEmployee>, GatewayError> {
        let sql = r#"
            SELECT tr.id, tr.employee_id, tr.movement, tr.registered_at,
                   tr.personal_items, tr.task,
                   e.cedula, e.nombre, e.area
            FROM time_records tr
            LEFT JOIN employees e ON e.id = tr.employee_id
            ORDER BY tr.registered_at DESC, tr.id DESC
        "#;

        let rows = sqlx::query_as::<_, JoinedRecordRow>(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(failure)?;

        debug!(rows = rows.len(), "Fetched joined time records");

        rows.into_iter()
            .map(|row| RecordWithEmployee::try_from(row).map_err(decode))
            .collect()
    }

    async fn list_employee_records(
        &self,
        employee_id: u64,
    ) -> Result<Vec<TimeRecord>, GatewayError> {
        let rows = sqlx::query_as::<_, TimeRecordRow>(&format!(
            "SELECT {RECORD_COLUMNS} FROM time_records WHERE employee_id = ? \
             ORDER BY registered_at DESC, id DESC"
        ))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await
        .map_err(failure)?;

        rows.into_iter()
            .map(|row| TimeRecord::try_from(row).map_err(decode))
            .collect()
    }

    async fn insert_time_record(&self, new: &NewTimeRecord) -> Result<TimeRecord, GatewayError> {
        let done = sqlx::query(
            r#"
            INSERT INTO time_records (employee_id, movement, personal_items, task)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(new.employee_id)
        .bind(new.movement.as_ref())
        .bind(Json(&new.personal_items))
        .bind(new.task.as_deref())
        .execute(&self.pool)
        .await
        .map_err(failure)?;

        self.record_by_id(done.last_insert_id()).await
    }

    async fn delete_all_time_records(&self) -> Result<u64, GatewayError> {
        let done = sqlx::query("DELETE FROM time_records")
            .execute(&self.pool)
            .await
            .map_err(failure)?;

        Ok(done.rows_affected())
    }
}
