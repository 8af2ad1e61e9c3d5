//! In-memory gateway for tests. Also acts as the clock, so "server-assigned"
//! timestamps and "today" move together when a test advances time.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use super::{GatewayError, NewEmployee, NewTimeRecord, PersistenceGateway};
use crate::engine::day::Clock;
use crate::model::{
    employee::Employee,
    time_record::{EmployeeSnapshot, RecordWithEmployee, TimeRecord},
};

#[derive(Default)]
struct State {
    employees: Vec<Employee>,
    records: Vec<TimeRecord>,
    next_id: u64,
    fail_next_write: bool,
}

pub struct MemoryGateway {
    state: Mutex<State>,
    now: Mutex<DateTime<Utc>>,
}

impl MemoryGateway {
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }

    pub fn record_count(&self) -> usize {
        self.state.lock().unwrap().records.len()
    }

    /// The next insert or delete fails with [`GatewayError::Failure`].
    pub fn fail_next_write(&self) {
        self.state.lock().unwrap().fail_next_write = true;
    }

    fn write(&self) -> Result<std::sync::MutexGuard<'_, State>, GatewayError> {
        let mut state = self.state.lock().unwrap();
        if std::mem::take(&mut state.fail_next_write) {
            return Err(GatewayError::Failure("simulated outage".into()));
        }
        state.next_id += 1;
        Ok(state)
    }
}

impl Clock for MemoryGateway {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

fn newest_first(records: &mut [TimeRecord]) {
    records.sort_by(|a, b| (b.registered_at, b.id).cmp(&(a.registered_at, a.id)));
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn insert_employee(&self, new: &NewEmployee) -> Result<Employee, GatewayError> {
        let now = self.now();
        let mut state = self.write()?;
        if state.employees.iter().any(|e| e.cedula == new.cedula) {
            return Err(GatewayError::Conflict(format!("duplicate cedula {}", new.cedula)));
        }
        let employee = Employee {
            id: state.next_id,
            cedula: new.cedula.clone(),
            nombre: new.nombre.clone(),
            area: new.area,
            created_at: now,
        };
        state.employees.push(employee.clone());
        Ok(employee)
    }

    async fn delete_employee(&self, id: u64) -> Result<bool, GatewayError> {
        let mut state = self.write()?;
        let before = state.employees.len();
        state.employees.retain(|e| e.id != id);
        // ON DELETE CASCADE
        state.records.retain(|r| r.employee_id != id);
        Ok(state.employees.len() < before)
    }

    async fn find_employee_by_id(&self, id: u64) -> Result<Option<Employee>, GatewayError> {
        let state = self.state.lock().unwrap();
        Ok(state.employees.iter().find(|e| e.id == id).cloned())
    }

    async fn find_employee_by_cedula(
        &self,
        cedula: &str,
    ) -> Result<Option<Employee>, GatewayError> {
        let state = self.state.lock().unwrap();
        Ok(state.employees.iter().find(|e| e.has_cedula(cedula)).cloned())
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, GatewayError> {
        let mut employees = self.state.lock().unwrap().employees.clone();
        employees.sort_by(|a, b| a.nombre.cmp(&b.nombre));
        Ok(employees)
    }

    async fn list_time_records(&self) -> Result<Vec<RecordWithEmployee>, GatewayError> {
        let state = self.state.lock().unwrap();
        let mut records = state.records.clone();
        newest_first(&mut records);

        Ok(records
            .into_iter()
            .map(|record| {
                let employee = state
                    .employees
                    .iter()
                    .find(|e| e.id == record.employee_id)
                    .map(|e| EmployeeSnapshot {
                        cedula: e.cedula.clone(),
                        nombre: e.nombre.clone(),
                        area: e.area.to_string(),
                    });
                RecordWithEmployee { record, employee }
            })
            .collect())
    }

    async fn list_employee_records(
        &self,
        employee_id: u64,
    ) -> Result<Vec<TimeRecord>, GatewayError> {
        let state = self.state.lock().unwrap();
        let mut records: Vec<TimeRecord> = state
            .records
            .iter()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect();
        newest_first(&mut records);
        Ok(records)
    }

    async fn insert_time_record(&self, new: &NewTimeRecord) -> Result<TimeRecord, GatewayError> {
        let now = self.now();
        let mut state = self.write()?;
        if !state.employees.iter().any(|e| e.id == new.employee_id) {
            return Err(GatewayError::Failure("foreign key violation".into()));
        }
        let record = TimeRecord {
            id: state.next_id,
            employee_id: new.employee_id,
            movement: new.movement,
            registered_at: now,
            personal_items: new.personal_items.clone(),
            task: new.task.clone(),
        };
        state.records.push(record.clone());
        Ok(record)
    }

    async fn delete_all_time_records(&self) -> Result<u64, GatewayError> {
        let mut state = self.write()?;
        let deleted = state.records.len() as u64;
        state.records.clear();
        Ok(deleted)
    }
}
