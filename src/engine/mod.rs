//! Attendance engine: the per-day ENTRADA/SALIDA rules, aggregation over
//! record sets and the service that applies them against the store.

pub mod day;
pub mod metrics;
pub mod service;
pub mod state;

pub use day::{Clock, DateRange, DayBoundary, SystemClock};
pub use service::AttendanceService;
