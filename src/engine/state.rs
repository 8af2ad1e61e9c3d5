//! Per-employee, per-day ENTRADA/SALIDA alternation.
//!
//! ```text
//! NO_RECORD --ENTRADA--> OPEN --SALIDA--> CLOSED --ENTRADA--> OPEN
//! ```
//!
//! `NO_RECORD --SALIDA-->` and `OPEN --ENTRADA-->` are rejected. Every business
//! day starts over in `NO_RECORD`, whatever the previous day ended in. The
//! state is never stored: it is derived from the day's records, which callers
//! pass in explicitly.

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use super::day::DayBoundary;
use crate::error::{AppError, AppResult};
use crate::model::employee::Employee;
use crate::model::time_record::{MovementType, TimeRecord};

/// Records shown per employee on the day board.
pub const BOARD_RECORDS_PER_EMPLOYEE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayState {
    NoRecord,
    /// Last event of the day is an ENTRADA.
    Open,
    /// Last event of the day is a SALIDA.
    Closed,
}

fn latest(today: &[TimeRecord]) -> Option<&TimeRecord> {
    today.iter().max_by_key(|r| (r.registered_at, r.id))
}

pub fn day_state(today: &[TimeRecord]) -> DayState {
    match latest(today).map(|r| r.movement) {
        None => DayState::NoRecord,
        Some(MovementType::Entrada) => DayState::Open,
        Some(MovementType::Salida) => DayState::Closed,
    }
}

/// An ENTRADA is refused while the day is open.
pub fn can_register_entrada(employee: &Employee, today: &[TimeRecord]) -> AppResult<()> {
    match day_state(today) {
        DayState::Open => Err(AppError::Conflict(format!(
            "{} ({}) already has an ENTRADA without SALIDA",
            employee.nombre, employee.cedula
        ))),
        DayState::NoRecord | DayState::Closed => Ok(()),
    }
}

/// A SALIDA needs an open ENTRADA today; that ENTRADA is returned so the
/// SALIDA can carry its items and task.
pub fn can_register_salida<'a>(
    employee: &Employee,
    today: &'a [TimeRecord],
) -> AppResult<&'a TimeRecord> {
    match latest(today) {
        Some(open) if open.movement == MovementType::Entrada => Ok(open),
        _ => Err(AppError::Conflict(format!(
            "{} ({}) has no previous ENTRADA today",
            employee.nombre, employee.cedula
        ))),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BoardEntry {
    pub employee: Employee,
    pub state: DayState,
    pub can_check_out: bool,
    /// Most recent first.
    pub records: Vec<TimeRecord>,
}

/// One row per employee with something to show: today's records, or every
/// record when `show_all` is set. The state always reflects `day` only.
pub fn day_board(
    roster: &[Employee],
    records: &[TimeRecord],
    boundary: &DayBoundary,
    day: NaiveDate,
    show_all: bool,
) -> Vec<BoardEntry> {
    roster
        .iter()
        .filter_map(|employee| {
            let mut own: Vec<TimeRecord> = records
                .iter()
                .filter(|r| r.employee_id == employee.id)
                .cloned()
                .collect();
            own.sort_by(|a, b| (b.registered_at, b.id).cmp(&(a.registered_at, a.id)));

            let today = boundary.records_on(&own, day);
            let state = day_state(&today);
            let mut shown = if show_all { own } else { today };
            if shown.is_empty() {
                return None;
            }
            shown.truncate(BOARD_RECORDS_PER_EMPLOYEE);

            Some(BoardEntry {
                employee: employee.clone(),
                state,
                can_check_out: state == DayState::Open,
                records: shown,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::employee::Area;
    use chrono::{DateTime, Duration, Utc};

    fn ana() -> Employee {
        Employee {
            id: 1,
            cedula: "12345".into(),
            nombre: "ANA".into(),
            area: Area::PuntoDeVenta,
            created_at: base(),
        }
    }

    fn base() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-16T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn rec(id: u64, employee_id: u64, movement: MovementType, minutes: i64) -> TimeRecord {
        TimeRecord {
            id,
            employee_id,
            movement,
            registered_at: base() + Duration::minutes(minutes),
            personal_items: vec!["CELULAR-CORPORATIVO".into()],
            task: Some("INVENTARIO".into()),
        }
    }

    #[test]
    fn state_follows_last_event() {
        assert_eq!(day_state(&[]), DayState::NoRecord);
        let open = vec![rec(1, 1, MovementType::Entrada, 0)];
        assert_eq!(day_state(&open), DayState::Open);
        let closed = vec![
            rec(2, 1, MovementType::Salida, 60),
            rec(1, 1, MovementType::Entrada, 0),
        ];
        assert_eq!(day_state(&closed), DayState::Closed);
    }

    #[test]
    fn state_does_not_depend_on_input_order() {
        let oldest_first = vec![
            rec(1, 1, MovementType::Entrada, 0),
            rec(2, 1, MovementType::Salida, 60),
            rec(3, 1, MovementType::Entrada, 120),
        ];
        assert_eq!(day_state(&oldest_first), DayState::Open);
    }

    #[test]
    fn second_entrada_without_salida_is_rejected() {
        let today = vec![rec(1, 1, MovementType::Entrada, 0)];
        let err = can_register_entrada(&ana(), &today).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn entrada_allowed_on_fresh_or_closed_day() {
        assert!(can_register_entrada(&ana(), &[]).is_ok());
        let closed = vec![
            rec(2, 1, MovementType::Salida, 60),
            rec(1, 1, MovementType::Entrada, 0),
        ];
        assert!(can_register_entrada(&ana(), &closed).is_ok());
    }

    #[test]
    fn salida_without_entrada_is_rejected() {
        assert!(matches!(
            can_register_salida(&ana(), &[]),
            Err(AppError::Conflict(_))
        ));
        let closed = vec![
            rec(2, 1, MovementType::Salida, 60),
            rec(1, 1, MovementType::Entrada, 0),
        ];
        assert!(can_register_salida(&ana(), &closed).is_err());
    }

    #[test]
    fn salida_returns_open_entrada() {
        let today = vec![
            rec(3, 1, MovementType::Entrada, 120),
            rec(2, 1, MovementType::Salida, 60),
            rec(1, 1, MovementType::Entrada, 0),
        ];
        let open = can_register_salida(&ana(), &today).unwrap();
        assert_eq!(open.id, 3);
    }

    #[test]
    fn board_shows_today_only_unless_asked() {
        let boundary = DayBoundary::default();
        let mut other = ana();
        other.id = 2;
        other.cedula = "999".into();
        let records = vec![
            rec(1, 1, MovementType::Entrada, 0),
            rec(2, 2, MovementType::Entrada, -24 * 60),
        ];
        let roster = vec![ana(), other];
        let today = base().date_naive();

        let board = day_board(&roster, &records, &boundary, today, false);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].employee.cedula, "12345");
        assert_eq!(board[0].state, DayState::Open);
        assert!(board[0].can_check_out);

        let board = day_board(&roster, &records, &boundary, today, true);
        assert_eq!(board.len(), 2);
        // yesterday's open entry does not carry over
        assert_eq!(board[1].state, DayState::NoRecord);
        assert!(!board[1].can_check_out);
    }

    #[test]
    fn board_caps_records_per_employee() {
        let boundary = DayBoundary::default();
        let records: Vec<TimeRecord> = (0..8)
            .map(|i| {
                let movement = if i % 2 == 0 {
                    MovementType::Entrada
                } else {
                    MovementType::Salida
                };
                rec(i + 1, 1, movement, i as i64 * 10)
            })
            .collect();
        let board = day_board(&[ana()], &records, &boundary, base().date_naive(), false);
        assert_eq!(board[0].records.len(), BOARD_RECORDS_PER_EMPLOYEE);
        assert_eq!(board[0].records[0].id, 8);
        assert_eq!(board[0].state, DayState::Closed);
    }
}
