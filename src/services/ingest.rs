//! Spreadsheet ingestion for attendance exports from fingerprint machines.
//!
//! An upload is parsed into ordered row records (header name -> cell value)
//! exactly as they appear in the first worksheet. Mapping those rows onto
//! attendance records is a separate, lossy step that reports what it could
//! not understand instead of guessing.

use std::io::Cursor;
use std::str::FromStr;
use std::sync::LazyLock;

use bigdecimal::BigDecimal;
use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::Serialize;
use serde::ser::SerializeMap;
use thiserror::Error;

/// Rows shown back to the operator after an upload.
pub const PREVIEW_ROWS: usize = 10;

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

static HEADER_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s\-\.]+").unwrap());

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Unsupported file type '{0}', expected .xls or .xlsx")]
    UnsupportedFormat(String),

    #[error("Uploaded file is empty")]
    Empty,

    #[error("Could not read spreadsheet: {0}")]
    Unreadable(String),

    #[error("Spreadsheet has no worksheet")]
    NoWorksheet,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Int(i) => Some(i.to_string()),
            CellValue::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => {
                Some(format!("{}", *f as i64))
            }
            CellValue::Float(f) => Some(f.to_string()),
            CellValue::Text(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            CellValue::DateTime(dt) => Some(dt.to_string()),
        }
    }
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty | Data::Error(_) => CellValue::Empty,
            Data::Bool(b) => CellValue::Bool(*b),
            Data::Int(i) => CellValue::Int(*i),
            Data::Float(f) => CellValue::Float(*f),
            Data::String(s) => CellValue::Text(s.clone()),
            Data::DateTime(d) => d
                .as_datetime()
                .map(CellValue::DateTime)
                .unwrap_or_else(|| CellValue::Float(d.as_f64())),
            Data::DateTimeIso(s) => NaiveDateTime::from_str(s)
                .map(CellValue::DateTime)
                .unwrap_or_else(|_| CellValue::Text(s.clone())),
            Data::DurationIso(s) => CellValue::Text(s.clone()),
        }
    }
}

/// One spreadsheet row: column name to cell value, in column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowRecord(Vec<(String, CellValue)>);

impl RowRecord {
    pub fn new(cells: Vec<(String, CellValue)>) -> Self {
        Self(cells)
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.0
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn cells(&self) -> &[(String, CellValue)] {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.iter().all(|(_, value)| value.is_empty())
    }

    /// Lookup by normalised header name (`"Check In"` matches `check_in`).
    fn field(&self, names: &[&str]) -> Option<&CellValue> {
        self.0
            .iter()
            .find(|(name, _)| names.contains(&normalise_header(name).as_str()))
            .map(|(_, value)| value)
            .filter(|value| !value.is_empty())
    }
}

impl Serialize for RowRecord {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSheet {
    pub columns: Vec<String>,
    pub rows: Vec<RowRecord>,
}

impl ParsedSheet {
    pub fn preview(&self) -> &[RowRecord] {
        &self.rows[..self.rows.len().min(PREVIEW_ROWS)]
    }
}

/// Parses the first worksheet of an uploaded `.xls`/`.xlsx` file.
pub fn parse_spreadsheet(file_name: &str, bytes: &[u8]) -> Result<ParsedSheet, IngestError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    if !SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
        return Err(IngestError::UnsupportedFormat(extension));
    }
    if bytes.is_empty() {
        return Err(IngestError::Empty);
    }

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| IngestError::Unreadable(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestError::NoWorksheet)?
        .map_err(|e| IngestError::Unreadable(e.to_string()))?;

    let sheet = rows_from_range(&range);
    log::debug!(
        "Parsed {} with {} columns and {} rows",
        file_name,
        sheet.columns.len(),
        sheet.rows.len()
    );
    Ok(sheet)
}

/// First row is the header; blank header cells become `Unnamed: n` and
/// repeated names get a `.n` suffix. Fully blank data rows are dropped.
pub fn rows_from_range(range: &Range<Data>) -> ParsedSheet {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return ParsedSheet {
            columns: Vec::new(),
            rows: Vec::new(),
        };
    };

    let mut columns: Vec<String> = Vec::with_capacity(header.len());
    for (index, cell) in header.iter().enumerate() {
        let base = CellValue::from(cell)
            .as_text()
            .unwrap_or_else(|| format!("Unnamed: {}", index));
        let mut name = base.clone();
        let mut suffix = 1;
        while columns.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        columns.push(name);
    }

    let records = rows
        .map(|row| {
            RowRecord(
                columns
                    .iter()
                    .enumerate()
                    .map(|(i, name)| {
                        let value = row.get(i).map(CellValue::from).unwrap_or(CellValue::Empty);
                        (name.clone(), value)
                    })
                    .collect(),
            )
        })
        .filter(|record| !record.is_blank())
        .collect();

    ParsedSheet {
        columns,
        rows: records,
    }
}

fn normalise_header(name: &str) -> String {
    HEADER_SEPARATORS
        .replace_all(name.trim(), "_")
        .to_lowercase()
}

/// An uploaded row understood as attendance, still keyed by the employee's
/// business id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceDraft {
    pub row_number: usize,
    pub employee_code: String,
    pub attendance_date: NaiveDate,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub status: String,
    pub late_minutes: i32,
    pub overtime_hours: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowIssue {
    pub row_number: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingReport {
    pub mapped: Vec<AttendanceDraft>,
    pub skipped: Vec<RowIssue>,
}

/// Maps every parsed row. Row numbers are 1-based data rows (the header is
/// row 0).
pub fn map_attendance(sheet: &ParsedSheet) -> MappingReport {
    let mut report = MappingReport::default();
    for (index, row) in sheet.rows.iter().enumerate() {
        let row_number = index + 1;
        match map_attendance_row(row_number, row) {
            Ok(draft) => report.mapped.push(draft),
            Err(reason) => report.skipped.push(RowIssue { row_number, reason }),
        }
    }
    report
}

pub fn map_attendance_row(row_number: usize, row: &RowRecord) -> Result<AttendanceDraft, String> {
    let employee_code = row
        .field(&["employee_id", "emp_id", "employee_code"])
        .and_then(CellValue::as_text)
        .ok_or_else(|| "missing employee_id".to_string())?;

    let date_cell = row
        .field(&["attendance_date", "date"])
        .ok_or_else(|| "missing attendance_date".to_string())?;
    let attendance_date =
        cell_date(date_cell).ok_or_else(|| format!("unreadable date {:?}", date_cell))?;

    let check_in = optional(row.field(&["check_in"]), cell_time, "check_in")?;
    let check_out = optional(row.field(&["check_out"]), cell_time, "check_out")?;
    let late_minutes = optional(row.field(&["late_minutes"]), cell_int, "late_minutes")?
        .unwrap_or(0);
    let overtime_hours = optional(row.field(&["overtime_hours"]), cell_decimal, "overtime_hours")?
        .unwrap_or_else(|| BigDecimal::from(0));
    let status = row
        .field(&["status"])
        .and_then(CellValue::as_text)
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "present".to_string());

    Ok(AttendanceDraft {
        row_number,
        employee_code,
        attendance_date,
        check_in,
        check_out,
        status,
        late_minutes,
        overtime_hours,
    })
}

fn optional<T>(
    cell: Option<&CellValue>,
    convert: fn(&CellValue) -> Option<T>,
    column: &str,
) -> Result<Option<T>, String> {
    match cell {
        None => Ok(None),
        Some(value) => convert(value)
            .map(Some)
            .ok_or_else(|| format!("unreadable {} {:?}", column, value)),
    }
}

fn cell_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::DateTime(dt) => Some(dt.date()),
        CellValue::Text(s) => {
            let s = s.trim();
            ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"]
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .or_else(|| {
                    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                        .ok()
                        .map(|dt| dt.date())
                })
        }
        _ => None,
    }
}

fn cell_time(cell: &CellValue) -> Option<NaiveTime> {
    match cell {
        CellValue::DateTime(dt) => Some(dt.time()),
        CellValue::Text(s) => {
            let s = s.trim();
            ["%H:%M:%S", "%H:%M", "%H.%M"]
                .iter()
                .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
        }
        // Excel stores a bare time as a fraction of a day.
        CellValue::Float(f) if (0.0..1.0).contains(f) => {
            let seconds = (f * 86_400.0).round() as u32;
            NaiveTime::from_num_seconds_from_midnight_opt(seconds.min(86_399), 0)
        }
        _ => None,
    }
}

fn cell_int(cell: &CellValue) -> Option<i32> {
    match cell {
        CellValue::Int(i) => i32::try_from(*i).ok(),
        CellValue::Float(f) if f.is_finite() => Some(f.round() as i32),
        CellValue::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn cell_decimal(cell: &CellValue) -> Option<BigDecimal> {
    match cell {
        CellValue::Int(i) => Some(BigDecimal::from(*i)),
        CellValue::Float(f) if f.is_finite() => BigDecimal::from_str(&f.to_string()).ok(),
        CellValue::Text(s) => BigDecimal::from_str(s.trim().replace(',', ".").as_str()).ok(),
        _ => None,
    }
}
