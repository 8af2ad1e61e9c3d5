use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::time_record::{MovementType, RecordWithEmployee};

/// Length of the top rankings in [`MetricsSummary`].
pub const TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct EmployeeMetric {
    pub cedula: String,
    pub nombre: String,
    pub area: String,
    pub entradas: u32,
    pub salidas: u32,
    pub total_movements: u32,
    pub last_movement: DateTime<Utc>,
}

/// One metric per distinct cedula, ordered by cedula.
///
/// Counts do not depend on the order of `records`, and `last_movement` is the
/// latest timestamp seen for that cedula.
pub fn aggregate(records: &[RecordWithEmployee]) -> Vec<EmployeeMetric> {
    let mut by_cedula: BTreeMap<&str, EmployeeMetric> = BTreeMap::new();

    for record in records {
        let ts = record.record.registered_at;
        let metric = by_cedula
            .entry(record.cedula())
            .or_insert_with(|| EmployeeMetric {
                cedula: record.cedula().to_string(),
                nombre: record.nombre().to_string(),
                area: record.area().to_string(),
                entradas: 0,
                salidas: 0,
                total_movements: 0,
                last_movement: ts,
            });

        match record.record.movement {
            MovementType::Entrada => metric.entradas += 1,
            MovementType::Salida => metric.salidas += 1,
        }
        metric.total_movements = metric.entradas + metric.salidas;
        if ts > metric.last_movement {
            metric.last_movement = ts;
        }
    }

    by_cedula.into_values().collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Entradas,
    Salidas,
    #[default]
    Total,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl MetricSort {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Same column flips the order; a new column starts descending.
    pub fn toggle(self, field: SortField) -> Self {
        if self.field == field {
            let order = match self.order {
                SortOrder::Asc => SortOrder::Desc,
                SortOrder::Desc => SortOrder::Asc,
            };
            Self { field, order }
        } else {
            Self {
                field,
                order: SortOrder::Desc,
            }
        }
    }

    fn key(self, metric: &EmployeeMetric) -> u32 {
        match self.field {
            SortField::Entradas => metric.entradas,
            SortField::Salidas => metric.salidas,
            SortField::Total => metric.total_movements,
        }
    }

    /// Stable: ties keep their incoming order.
    pub fn apply(self, metrics: &mut [EmployeeMetric]) {
        metrics.sort_by(|a, b| match self.order {
            SortOrder::Asc => self.key(a).cmp(&self.key(b)),
            SortOrder::Desc => self.key(b).cmp(&self.key(a)),
        });
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MetricsSummary {
    pub total_employees: usize,
    pub total_entradas: u32,
    pub total_salidas: u32,
    /// Movements per employee, one decimal.
    pub average_movements: f64,
    pub top_entradas: Vec<EmployeeMetric>,
    pub top_salidas: Vec<EmployeeMetric>,
}

pub fn summarize(metrics: &[EmployeeMetric]) -> MetricsSummary {
    let total_entradas: u32 = metrics.iter().map(|m| m.entradas).sum();
    let total_salidas: u32 = metrics.iter().map(|m| m.salidas).sum();
    let average_movements = if metrics.is_empty() {
        0.0
    } else {
        let raw = f64::from(total_entradas + total_salidas) / metrics.len() as f64;
        (raw * 10.0).round() / 10.0
    };

    let top = |field: SortField| {
        let mut ranked = metrics.to_vec();
        MetricSort::new(field, SortOrder::Desc).apply(&mut ranked);
        ranked.truncate(TOP_N);
        ranked
    };

    MetricsSummary {
        total_employees: metrics.len(),
        total_entradas,
        total_salidas,
        average_movements,
        top_entradas: top(SortField::Entradas),
        top_salidas: top(SortField::Salidas),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::time_record::{EmployeeSnapshot, TimeRecord};
    use chrono::Duration;
    use rstest::rstest;

    fn base() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-16T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn rec(id: u64, cedula: Option<&str>, movement: MovementType, minutes: i64) -> RecordWithEmployee {
        RecordWithEmployee {
            record: TimeRecord {
                id,
                employee_id: id,
                movement,
                registered_at: base() + Duration::minutes(minutes),
                personal_items: vec![],
                task: None,
            },
            employee: cedula.map(|c| EmployeeSnapshot {
                cedula: c.into(),
                nombre: format!("EMP {c}"),
                area: "EXTERNO".into(),
            }),
        }
    }

    fn sample() -> Vec<RecordWithEmployee> {
        vec![
            rec(1, Some("12345"), MovementType::Entrada, 0),
            rec(2, Some("12345"), MovementType::Salida, 480),
            rec(3, Some("777"), MovementType::Entrada, 30),
            rec(4, Some("12345"), MovementType::Entrada, 1440),
            rec(5, None, MovementType::Salida, 90),
        ]
    }

    #[test]
    fn counts_per_cedula() {
        let metrics = aggregate(&sample());
        assert_eq!(metrics.len(), 3);

        let ana = metrics.iter().find(|m| m.cedula == "12345").unwrap();
        assert_eq!((ana.entradas, ana.salidas, ana.total_movements), (2, 1, 3));
        assert_eq!(ana.last_movement, base() + Duration::minutes(1440));

        let orphan = metrics.iter().find(|m| m.cedula == "N/A").unwrap();
        assert_eq!(orphan.nombre, "N/A");
        assert_eq!(orphan.area, "N/A");
        assert_eq!(orphan.salidas, 1);
    }

    #[rstest]
    #[case::reversed(vec![4, 3, 2, 1, 0])]
    #[case::rotated(vec![2, 3, 4, 0, 1])]
    #[case::shuffled(vec![3, 0, 4, 1, 2])]
    fn aggregate_is_order_independent(#[case] order: Vec<usize>) {
        let records = sample();
        let permuted: Vec<RecordWithEmployee> =
            order.iter().map(|&i| records[i].clone()).collect();
        assert_eq!(aggregate(&permuted), aggregate(&records));
    }

    #[test]
    fn empty_input_gives_no_metrics() {
        assert!(aggregate(&[]).is_empty());
        let summary = summarize(&[]);
        assert_eq!(summary.total_employees, 0);
        assert_eq!(summary.average_movements, 0.0);
    }

    #[test]
    fn sort_is_stable_and_parameterized() {
        let mut metrics = aggregate(&sample());
        // by cedula: "12345" (3), "777" (1), "N/A" (1)
        MetricSort::new(SortField::Total, SortOrder::Asc).apply(&mut metrics);
        let order: Vec<&str> = metrics.iter().map(|m| m.cedula.as_str()).collect();
        assert_eq!(order, vec!["777", "N/A", "12345"]);

        MetricSort::new(SortField::Salidas, SortOrder::Desc).apply(&mut metrics);
        let order: Vec<&str> = metrics.iter().map(|m| m.cedula.as_str()).collect();
        assert_eq!(order, vec!["N/A", "12345", "777"]);
    }

    #[test]
    fn toggle_flips_or_resets() {
        let sort = MetricSort::default();
        assert_eq!(sort, MetricSort::new(SortField::Total, SortOrder::Desc));
        assert_eq!(sort.toggle(SortField::Total).order, SortOrder::Asc);
        let switched = sort.toggle(SortField::Total).toggle(SortField::Entradas);
        assert_eq!(switched, MetricSort::new(SortField::Entradas, SortOrder::Desc));
    }

    #[test]
    fn summary_totals_and_rankings() {
        let summary = summarize(&aggregate(&sample()));
        assert_eq!(summary.total_employees, 3);
        assert_eq!(summary.total_entradas, 3);
        assert_eq!(summary.total_salidas, 2);
        assert_eq!(summary.average_movements, 1.7);
        assert_eq!(summary.top_entradas[0].cedula, "12345");
        assert_eq!(summary.top_salidas.len(), 3);
    }
}
