//! Spreadsheet export: a `Registros` sheet with one row per movement and a
//! `Resumen` sheet with one row per employee.

use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::engine::day::{DateRange, DayBoundary};
use crate::engine::metrics::{EmployeeMetric, MetricSort, aggregate};
use crate::model::time_record::RecordWithEmployee;

pub const CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const DETAIL_SHEET: &str = "Registros";
const SUMMARY_SHEET: &str = "Resumen";

const DETAIL_COLUMNS: [(&str, f64); 8] = [
    ("CÉDULA", 15.0),
    ("NOMBRE", 30.0),
    ("ÁREA", 20.0),
    ("TIPO", 12.0),
    ("FECHA", 15.0),
    ("HORA", 12.0),
    ("TAREA", 25.0),
    ("OBJETOS PERSONALES", 35.0),
];

const SUMMARY_COLUMNS: [(&str, f64); 7] = [
    ("CÉDULA", 15.0),
    ("NOMBRE", 30.0),
    ("ÁREA", 20.0),
    ("ENTRADAS", 12.0),
    ("SALIDAS", 12.0),
    ("TOTAL", 12.0),
    ("ÚLTIMO MOVIMIENTO", 22.0),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    pub cedula: String,
    pub nombre: String,
    pub area: String,
    pub tipo: String,
    pub fecha: String,
    pub hora: String,
    pub tarea: String,
    pub objetos: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Detail rows, most recent first, with local date and time split apart.
pub fn detail_rows(records: &[RecordWithEmployee], boundary: &DayBoundary) -> Vec<DetailRow> {
    let mut sorted: Vec<&RecordWithEmployee> = records.iter().collect();
    sorted.sort_by(|a, b| {
        (b.record.registered_at, b.record.id).cmp(&(a.record.registered_at, a.record.id))
    });

    sorted
        .into_iter()
        .map(|r| {
            let local = boundary.local_time(r.record.registered_at);
            let employee = r.employee.as_ref();
            DetailRow {
                cedula: employee.map(|e| e.cedula.clone()).unwrap_or_default(),
                nombre: employee.map(|e| e.nombre.clone()).unwrap_or_default(),
                area: employee.map(|e| e.area.clone()).unwrap_or_default(),
                tipo: r.record.movement.to_string(),
                fecha: local.format("%d/%m/%Y").to_string(),
                hora: local.format("%H:%M:%S").to_string(),
                tarea: r.record.task.clone().unwrap_or_default(),
                objetos: r.record.personal_items.join(", "),
            }
        })
        .collect()
}

/// `Reporte_Bodega_<dd-mm-yyyy>.xlsx`, or `..._<start>_a_<end>.xlsx` for a range.
pub fn file_name(range: &DateRange, today: NaiveDate) -> String {
    let fmt = |d: NaiveDate| d.format("%d-%m-%Y").to_string();
    match (range.start, range.end) {
        (None, None) => format!("Reporte_Bodega_{}.xlsx", fmt(today)),
        (start, end) => format!(
            "Reporte_Bodega_{}_a_{}.xlsx",
            start.map_or_else(|| "inicio".to_string(), fmt),
            end.map_or_else(|| fmt(today), fmt)
        ),
    }
}

pub fn render(
    records: &[RecordWithEmployee],
    boundary: &DayBoundary,
    range: &DateRange,
    today: NaiveDate,
) -> Result<ExportFile, XlsxError> {
    let detail = detail_rows(records, boundary);
    let mut metrics = aggregate(records);
    MetricSort::default().apply(&mut metrics);

    Ok(ExportFile {
        file_name: file_name(range, today),
        bytes: build_workbook(&detail, &metrics, boundary)?,
    })
}

pub fn build_workbook(
    detail: &[DetailRow],
    metrics: &[EmployeeMetric],
    boundary: &DayBoundary,
) -> Result<Vec<u8>, XlsxError> {
    let header = Format::new().set_bold();
    let mut workbook = Workbook::new();

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(DETAIL_SHEET)?;
        write_header(sheet, &DETAIL_COLUMNS, &header)?;
        for (row, line) in (1u32..).zip(detail) {
            let cells = [
                &line.cedula,
                &line.nombre,
                &line.area,
                &line.tipo,
                &line.fecha,
                &line.hora,
                &line.tarea,
                &line.objetos,
            ];
            for (col, value) in (0u16..).zip(cells) {
                sheet.write_string(row, col, value.as_str())?;
            }
        }
    }

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SUMMARY_SHEET)?;
        write_header(sheet, &SUMMARY_COLUMNS, &header)?;
        for (row, m) in (1u32..).zip(metrics) {
            sheet.write_string(row, 0, m.cedula.as_str())?;
            sheet.write_string(row, 1, m.nombre.as_str())?;
            sheet.write_string(row, 2, m.area.as_str())?;
            sheet.write_number(row, 3, f64::from(m.entradas))?;
            sheet.write_number(row, 4, f64::from(m.salidas))?;
            sheet.write_number(row, 5, f64::from(m.total_movements))?;
            let last = boundary.local_time(m.last_movement);
            sheet.write_string(row, 6, last.format("%d/%m/%Y %H:%M:%S").to_string())?;
        }
    }

    workbook.save_to_buffer()
}

fn write_header(sheet: &mut Worksheet, columns: &[(&str, f64)], format: &Format) -> Result<(), XlsxError> {
    for (col, (title, width)) in (0u16..).zip(columns) {
        sheet.write_string_with_format(0, col, *title, format)?;
        sheet.set_column_width(col, *width)?;
    }
    sheet.set_freeze_panes(1, 0)?;
    Ok(())
}
