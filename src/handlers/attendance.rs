use std::collections::HashMap;

use actix_web::{HttpResponse, Result, http::header, web};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::database::models::{
    AttendanceFilter, AttendanceWithEmployee, DateRangeQuery, NewAttendanceRecord,
};
use crate::handlers::shared::{ApiResponse, Notice, or_notice};
use crate::services::export::{ATTENDANCE_CSV_FILENAME, attendance_csv};
use crate::services::ingest::{
    MappingReport, RowIssue, RowRecord, map_attendance, parse_spreadsheet,
};
use crate::services::session::PendingUpload;
use crate::services::{Menu, Session};

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub filename: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPreview {
    pub file_name: String,
    pub total_rows: usize,
    pub columns: Vec<String>,
    pub preview: Vec<RowRecord>,
    pub mapping: MappingReport,
}

impl From<&PendingUpload> for UploadPreview {
    fn from(upload: &PendingUpload) -> Self {
        Self {
            file_name: upload.file_name.clone(),
            total_rows: upload.sheet.rows.len(),
            columns: upload.sheet.columns.clone(),
            preview: upload.sheet.preview().to_vec(),
            mapping: upload.mapping.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadView {
    pub upload: Option<UploadPreview>,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveView {
    pub inserted: usize,
    pub skipped: Vec<RowIssue>,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceView {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub records: Vec<AttendanceWithEmployee>,
    pub upload: Option<UploadPreview>,
    pub notices: Vec<Notice>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Attendance in the inclusive date range, plus the pending upload if any.
pub async fn render(
    state: &AppState,
    upload: Option<&PendingUpload>,
    range: &DateRangeQuery,
) -> AttendanceView {
    let (from, to) = range.resolve(today());
    let mut notices = Vec::new();

    let result = state
        .attendance
        .list(&AttendanceFilter::between(from, to))
        .await;
    let failed = result.is_err();
    let records = or_notice(result, "attendance", &mut notices);
    if records.is_empty() && !failed {
        notices.push(Notice::info("Tidak ada data untuk periode ini"));
    }

    AttendanceView {
        from,
        to,
        records,
        upload: upload.map(UploadPreview::from),
        notices,
    }
}

pub async fn get_attendance(
    state: web::Data<AppState>,
    Session(session): Session,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse> {
    let mut session = session.lock().await;
    session.navigate(Menu::Attendance);

    let view = render(&state, session.attendance.upload.as_ref(), &query).await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(view)))
}

/// Parses an uploaded spreadsheet (request body) and keeps it on the
/// session for preview. Nothing is persisted here.
pub async fn upload_attendance(
    Session(session): Session,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let mut session = session.lock().await;
    session.navigate(Menu::Attendance);

    let mut notices = Vec::new();
    match parse_spreadsheet(&query.filename, &body) {
        Ok(sheet) => {
            let mapping = map_attendance(&sheet);
            log::info!(
                "Parsed upload {}: {} rows, {} mappable",
                query.filename,
                sheet.rows.len(),
                mapping.mapped.len()
            );
            notices.push(Notice::success(format!(
                "File berhasil diupload! Total {} baris data",
                sheet.rows.len()
            )));
            if !mapping.skipped.is_empty() {
                notices.push(Notice::warning(format!(
                    "{} baris tidak dapat dipetakan ke data absensi",
                    mapping.skipped.len()
                )));
            }
            session.attendance.upload = Some(PendingUpload {
                file_name: query.filename.clone(),
                sheet,
                mapping,
            });
        }
        Err(e) => {
            log::warn!("Rejected upload {}: {}", query.filename, e);
            session.attendance.upload = None;
            notices.push(Notice::error(format!("Error reading file: {}", e)));
        }
    }

    let view = UploadView {
        upload: session.attendance.upload.as_ref().map(UploadPreview::from),
        notices,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(view)))
}

/// Persists the mapped rows of the pending upload. Rows whose employee id is
/// unknown are reported and skipped. The upload is dropped once saving was
/// attempted; a failed employee lookup keeps it for a retry.
pub async fn save_upload(
    state: web::Data<AppState>,
    Session(session): Session,
) -> Result<HttpResponse> {
    let mut session = session.lock().await;
    session.navigate(Menu::Attendance);

    let Some(upload) = session.attendance.upload.take() else {
        let view = SaveView {
            inserted: 0,
            skipped: Vec::new(),
            notices: vec![Notice::warning("Belum ada file yang diupload")],
        };
        return Ok(HttpResponse::Ok().json(ApiResponse::success(view)));
    };

    let mut notices = Vec::new();

    // Resolve every business id before writing anything, so a failed lookup
    // leaves nothing half-saved.
    let mut employee_ids: HashMap<&str, Option<Uuid>> = HashMap::new();
    for draft in &upload.mapping.mapped {
        if employee_ids.contains_key(draft.employee_code.as_str()) {
            continue;
        }
        match state.employees.find_by_code(&draft.employee_code).await {
            Ok(employee) => {
                employee_ids.insert(&draft.employee_code, employee.map(|e| e.id));
            }
            Err(e) => {
                notices.push(Notice::error(format!("Error: {}", e)));
                break;
            }
        }
    }
    if !notices.is_empty() {
        drop(employee_ids);
        session.attendance.upload = Some(upload);
        return Ok(HttpResponse::Ok().json(ApiResponse::success(SaveView {
            inserted: 0,
            skipped: Vec::new(),
            notices,
        })));
    }

    let mut skipped = upload.mapping.skipped.clone();
    let mut inserted = 0;
    for draft in &upload.mapping.mapped {
        let Some(employee_id) = employee_ids
            .get(draft.employee_code.as_str())
            .copied()
            .flatten()
        else {
            skipped.push(RowIssue {
                row_number: draft.row_number,
                reason: format!("unknown employee_id {}", draft.employee_code),
            });
            continue;
        };

        let record = NewAttendanceRecord {
            employee_id,
            attendance_date: draft.attendance_date,
            check_in: draft.check_in,
            check_out: draft.check_out,
            status: draft.status.clone(),
            late_minutes: draft.late_minutes,
            overtime_hours: draft.overtime_hours.clone(),
        };
        match state.attendance.insert(record).await {
            Ok(_) => inserted += 1,
            Err(e) => skipped.push(RowIssue {
                row_number: draft.row_number,
                reason: e.to_string(),
            }),
        }
    }

    skipped.sort_by_key(|issue| issue.row_number);
    log::info!(
        "Saved upload {}: {} inserted, {} skipped",
        upload.file_name,
        inserted,
        skipped.len()
    );
    notices.push(Notice::success(format!(
        "Data berhasil disimpan! {} baris tersimpan",
        inserted
    )));
    if !skipped.is_empty() {
        notices.push(Notice::warning(format!("{} baris dilewati", skipped.len())));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(SaveView {
        inserted,
        skipped,
        notices,
    })))
}

/// Filtered attendance as a CSV download.
pub async fn export_attendance(
    state: web::Data<AppState>,
    _session: Session,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse> {
    let (from, to) = query.resolve(today());
    let rows = state
        .attendance
        .list(&AttendanceFilter::between(from, to))
        .await?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", ATTENDANCE_CSV_FILENAME),
        ))
        .body(attendance_csv(&rows)))
}
