use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use super::day::{Clock, DateRange, DayBoundary, SystemClock, filter_by_date_range};
use super::metrics::{EmployeeMetric, MetricSort, MetricsSummary, aggregate, summarize};
use super::state::{BoardEntry, can_register_entrada, can_register_salida, day_board};
use crate::error::{AppError, AppResult};
use crate::export::{self, ExportFile};
use crate::gateway::{GatewayError, NewEmployee, NewTimeRecord, PersistenceGateway};
use crate::model::{
    catalog::Catalog,
    employee::{Area, Employee},
    time_record::{MovementType, RecordWithEmployee, TimeRecord},
};

const CEDULA_MAX_LEN: usize = 20;
const NOMBRE_MAX_LEN: usize = 120;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MetricsReport {
    pub metrics: Vec<EmployeeMetric>,
    pub summary: MetricsSummary,
}

/// Attendance rules on top of the persistence gateway.
///
/// Holds no mutable state: every decision re-reads what it needs from the
/// gateway, so two devices racing on the same employee both see the store as
/// the source of truth (and the later insert wins).
pub struct AttendanceService {
    gateway: Arc<dyn PersistenceGateway>,
    boundary: DayBoundary,
    catalog: Catalog,
    clock: Arc<dyn Clock>,
}

impl AttendanceService {
    pub fn new(gateway: Arc<dyn PersistenceGateway>, boundary: DayBoundary, catalog: Catalog) -> Self {
        Self {
            gateway,
            boundary,
            catalog,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    // ---------- roster ----------

    pub async fn register_employee(&self, cedula: &str, nombre: &str, area: &str) -> AppResult<Employee> {
        let cedula = cedula.trim().to_uppercase();
        let nombre = nombre.trim().to_uppercase();
        let area = area.trim();

        if cedula.is_empty() || nombre.is_empty() || area.is_empty() {
            return Err(AppError::Validation(
                "cedula, nombre and area are required".into(),
            ));
        }
        validate_cedula(&cedula)?;
        if nombre.chars().count() > NOMBRE_MAX_LEN {
            return Err(AppError::Validation(format!(
                "Nombre must be at most {NOMBRE_MAX_LEN} characters"
            )));
        }
        let area: Area = area
            .parse()
            .map_err(|_| AppError::Validation(format!("Unknown area: {area}")))?;

        if self
            .gateway
            .find_employee_by_cedula(&cedula)
            .await
            .map_err(persistence("Failed to look up cedula"))?
            .is_some()
        {
            return Err(duplicate_cedula(&cedula));
        }

        let employee = self
            .gateway
            .insert_employee(&NewEmployee {
                cedula: cedula.clone(),
                nombre,
                area,
            })
            .await
            .map_err(|e| match e {
                // lost a race against another registration
                GatewayError::Conflict(_) => duplicate_cedula(&cedula),
                other => persistence("Failed to create employee")(other),
            })?;

        info!(cedula = %employee.cedula, employee_id = employee.id, "Employee registered");
        Ok(employee)
    }

    pub async fn find_employee(&self, cedula: &str) -> AppResult<Employee> {
        self.gateway
            .find_employee_by_cedula(cedula)
            .await
            .map_err(persistence("Failed to fetch employee"))?
            .ok_or_else(employee_not_found)
    }

    pub async fn delete_employee(&self, cedula: &str) -> AppResult<Employee> {
        let employee = self.find_employee(cedula).await?;

        let deleted = self
            .gateway
            .delete_employee(employee.id)
            .await
            .map_err(persistence("Failed to delete employee"))?;
        if !deleted {
            return Err(employee_not_found());
        }

        info!(cedula = %employee.cedula, employee_id = employee.id, "Employee deleted");
        Ok(employee)
    }

    pub async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        self.gateway
            .list_employees()
            .await
            .map_err(persistence("Failed to list employees"))
    }

    // ---------- movements ----------

    /// Registers an ENTRADA or SALIDA for today.
    ///
    /// ENTRADA needs at least one personal item and a task, both from the
    /// catalog. SALIDA ignores `personal_items`/`task` and copies them from
    /// the open ENTRADA it closes.
    pub async fn register_movement(
        &self,
        employee_id: u64,
        movement: MovementType,
        personal_items: &[String],
        task: Option<&str>,
    ) -> AppResult<TimeRecord> {
        let employee = self
            .gateway
            .find_employee_by_id(employee_id)
            .await
            .map_err(persistence("Failed to fetch employee"))?
            .ok_or_else(employee_not_found)?;

        self.register_for(&employee, movement, personal_items, task)
            .await
    }

    /// Same as [`Self::register_movement`], resolving the employee by cedula.
    pub async fn register_movement_by_cedula(
        &self,
        cedula: &str,
        movement: MovementType,
        personal_items: &[String],
        task: Option<&str>,
    ) -> AppResult<TimeRecord> {
        let employee = self.find_employee(cedula).await?;
        self.register_for(&employee, movement, personal_items, task)
            .await
    }

    async fn register_for(
        &self,
        employee: &Employee,
        movement: MovementType,
        personal_items: &[String],
        task: Option<&str>,
    ) -> AppResult<TimeRecord> {
        // Validate input before touching the store.
        let entrada_fields = match movement {
            MovementType::Entrada => Some((
                self.validate_items(personal_items)?,
                self.validate_task(task)?,
            )),
            MovementType::Salida => None,
        };

        let history = self
            .gateway
            .list_employee_records(employee.id)
            .await
            .map_err(persistence("Failed to fetch time records"))?;
        let today = self
            .boundary
            .records_on(&history, self.boundary.business_day(self.clock.now()));

        let new = match entrada_fields {
            Some((personal_items, task)) => {
                can_register_entrada(employee, &today)?;
                NewTimeRecord {
                    employee_id: employee.id,
                    movement,
                    personal_items,
                    task: Some(task),
                }
            }
            None => {
                let open = can_register_salida(employee, &today)?;
                NewTimeRecord {
                    employee_id: employee.id,
                    movement,
                    personal_items: open.personal_items.clone(),
                    task: open.task.clone(),
                }
            }
        };

        let record = self
            .gateway
            .insert_time_record(&new)
            .await
            .map_err(persistence("Failed to register movement"))?;

        info!(
            cedula = %employee.cedula,
            employee_id = employee.id,
            movement = %record.movement,
            "Movement registered"
        );
        Ok(record)
    }

    fn validate_items(&self, raw: &[String]) -> AppResult<Vec<String>> {
        let mut items: Vec<String> = Vec::with_capacity(raw.len());
        for item in raw.iter().filter(|i| !i.trim().is_empty()) {
            let canonical = self
                .catalog
                .personal_item(item)
                .ok_or_else(|| AppError::Validation(format!("Unknown personal item: {}", item.trim())))?;
            if !items.iter().any(|i| i == canonical) {
                items.push(canonical.to_string());
            }
        }

        if items.is_empty() {
            return Err(AppError::Validation(
                "Select at least one personal item".into(),
            ));
        }
        Ok(items)
    }

    fn validate_task(&self, raw: Option<&str>) -> AppResult<String> {
        let raw = raw.map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Err(AppError::Validation("Select a task to perform".into()));
        }
        self.catalog
            .task(raw)
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation(format!("Unknown task: {raw}")))
    }

    // ---------- views ----------

    pub async fn day_board(&self, show_all: bool) -> AppResult<Vec<BoardEntry>> {
        let roster = self.list_employees().await?;
        let records: Vec<TimeRecord> = self
            .all_records()
            .await?
            .into_iter()
            .map(|r| r.record)
            .collect();
        let today = self.boundary.business_day(self.clock.now());

        Ok(day_board(&roster, &records, &self.boundary, today, show_all))
    }

    async fn all_records(&self) -> AppResult<Vec<RecordWithEmployee>> {
        self.gateway
            .list_time_records()
            .await
            .map_err(persistence("Failed to fetch time records"))
    }

    pub async fn list_records(&self, range: &DateRange) -> AppResult<Vec<RecordWithEmployee>> {
        check_range(range)?;
        let records = self.all_records().await?;
        Ok(filter_by_date_range(records, &self.boundary, range))
    }

    pub async fn metrics(&self, range: &DateRange, sort: MetricSort) -> AppResult<MetricsReport> {
        let records = self.list_records(range).await?;
        let mut metrics = aggregate(&records);
        let summary = summarize(&metrics);
        sort.apply(&mut metrics);

        Ok(MetricsReport { metrics, summary })
    }

    /// Irreversible. Returns the number of deleted records.
    pub async fn clear_records(&self) -> AppResult<u64> {
        let deleted = self
            .gateway
            .delete_all_time_records()
            .await
            .map_err(persistence("Failed to clear time records"))?;

        warn!(deleted, "All time records cleared");
        Ok(deleted)
    }

    /// Builds the workbook; with `clear_after`, the records are deleted once
    /// the workbook exists. Clearing only follows a full export, so a bounded
    /// range with `clear_after` is rejected before anything is read.
    pub async fn export(&self, range: &DateRange, clear_after: bool) -> AppResult<ExportFile> {
        if clear_after && !range.is_unbounded() {
            return Err(AppError::Validation(
                "Records can only be cleared after exporting all of them".into(),
            ));
        }
        let records = self.list_records(range).await?;
        if records.is_empty() {
            return Err(AppError::Validation("There are no records to export".into()));
        }

        let today = self.boundary.business_day(self.clock.now());
        let file = export::render(&records, &self.boundary, range, today).map_err(|e| {
            error!(error = %e, "Failed to build export workbook");
            AppError::Internal(e.to_string())
        })?;

        info!(file = %file.file_name, rows = records.len(), "Export generated");

        if clear_after {
            self.clear_records().await?;
        }
        Ok(file)
    }
}

fn validate_cedula(cedula: &str) -> AppResult<()> {
    let well_formed = cedula.len() <= CEDULA_MAX_LEN
        && cedula.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if well_formed {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Cedula must contain only letters, digits or '-' (max {CEDULA_MAX_LEN} characters)"
        )))
    }
}

fn check_range(range: &DateRange) -> AppResult<()> {
    if range.is_inverted() {
        return Err(AppError::Validation(
            "start date must not be after end date".into(),
        ));
    }
    Ok(())
}

fn employee_not_found() -> AppError {
    AppError::NotFound("Employee not found. Register the employee first".into())
}

fn duplicate_cedula(cedula: &str) -> AppError {
    AppError::Conflict(format!("An employee with cedula {cedula} already exists"))
}

/// Logs a gateway failure and converts it for the caller.
fn persistence(context: &'static str) -> impl Fn(GatewayError) -> AppError {
    move |e| {
        error!(error = %e, "{}", context);
        AppError::from(e)
    }
}
