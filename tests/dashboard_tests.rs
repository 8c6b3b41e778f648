use std::str::FromStr;

use actix_web::{http::StatusCode, test};
use bigdecimal::BigDecimal;
use chrono::{Duration, NaiveDate, Utc};
use pretty_assertions::assert_eq;
use serde_json::Value;

use payroll_hrd::database::models::{
    NewAttendanceRecord, NewPayrollPeriod, PeriodStatus, SlipStatus,
};
use payroll_hrd::database::repositories::{AttendanceStore, PayrollStore};

#[macro_use]
mod common;

use common::{AuthHelper, TestApp, notice_levels, notice_texts};

fn decimal(value: &Value) -> BigDecimal {
    match value {
        Value::String(s) => BigDecimal::from_str(s).unwrap(),
        other => BigDecimal::from_str(&other.to_string()).unwrap(),
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn period(ctx: &TestApp, name: &str, start: NaiveDate) -> uuid::Uuid {
    ctx.db
        .insert_period(NewPayrollPeriod {
            period_name: name.to_string(),
            period_start: start,
            period_end: start + Duration::days(27),
            payment_date: start + Duration::days(29),
            status: PeriodStatus::Draft,
            created_by: uuid::Uuid::new_v4(),
        })
        .await
        .unwrap()
        .id
}

#[actix_web::test]
async fn test_empty_dashboard_has_zero_average_and_info_notices() {
    let ctx = TestApp::with_operator().await;
    let token = AuthHelper::token(&ctx).await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard")
        .insert_header(AuthHelper::bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let stats = &body["data"]["stats"];
    assert_eq!(stats["totalEmployees"], 0);
    assert_eq!(decimal(&stats["totalPayroll"]), BigDecimal::from(0));
    assert_eq!(decimal(&stats["averageSalary"]), BigDecimal::from(0));
    assert_eq!(stats["pendingApproval"], 0);
    assert_eq!(
        notice_texts(&body["data"]),
        vec!["Belum ada data absensi", "Belum ada slip gaji"]
    );
}

#[actix_web::test]
async fn test_metrics_aggregate_slips_and_active_headcount() {
    let ctx = TestApp::with_operator().await;
    let alice = ctx.add_employee("EMP-001", "Alice Tan").await;
    let budi = ctx.add_employee("EMP-002", "Budi Santoso").await;
    ctx.add_employee("EMP-003", "Citra Dewi").await;
    let january = period(&ctx, "Januari 2025", date(2025, 1, 1)).await;

    let now = Utc::now();
    ctx.db.seed_slip(
        alice.id,
        january,
        Some(BigDecimal::from(6_000_000)),
        SlipStatus::Draft,
        now - Duration::minutes(3),
    );
    ctx.db.seed_slip(
        budi.id,
        january,
        Some(BigDecimal::from(4_000_000)),
        SlipStatus::Approved,
        now - Duration::minutes(2),
    );
    // Not yet computed: counts as pending, adds nothing to the total.
    ctx.db.seed_slip(alice.id, january, None, SlipStatus::Draft, now);

    let token = AuthHelper::token(&ctx).await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard")
        .insert_header(AuthHelper::bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let stats = &body["data"]["stats"];

    assert_eq!(stats["totalEmployees"], 3);
    assert_eq!(decimal(&stats["totalPayroll"]), BigDecimal::from(10_000_000));
    assert_eq!(
        decimal(&stats["averageSalary"]),
        BigDecimal::from_str("3333333.33").unwrap()
    );
    assert_eq!(stats["pendingApproval"], 2);

    let slips = body["data"]["recentSlips"].as_array().unwrap();
    assert_eq!(slips.len(), 3);
    assert!(slips[0]["netSalary"].is_null());
    assert_eq!(slips[1]["employeeName"], "Budi Santoso");
    assert_eq!(slips[1]["periodName"], "Januari 2025");
}

#[actix_web::test]
async fn test_recent_attendance_is_capped_and_newest_first() {
    let ctx = TestApp::with_operator().await;
    let alice = ctx.add_employee("EMP-001", "Alice Tan").await;
    for day in 1..=7 {
        ctx.db
            .insert(NewAttendanceRecord {
                employee_id: alice.id,
                attendance_date: date(2025, 2, day),
                check_in: None,
                check_out: None,
                status: "present".to_string(),
                late_minutes: 0,
                overtime_hours: BigDecimal::from(0),
            })
            .await
            .unwrap();
    }
    let token = AuthHelper::token(&ctx).await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard")
        .insert_header(AuthHelper::bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let rows = body["data"]["recentAttendance"].as_array().unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["attendanceDate"], "2025-02-07");
    assert_eq!(rows[4]["attendanceDate"], "2025-02-03");
    assert_eq!(rows[0]["employeeName"], "Alice Tan");
    assert_eq!(rows[0]["employeeCode"], "EMP-001");
}

#[actix_web::test]
async fn test_unavailable_database_degrades_to_zero_values_with_notices() {
    let ctx = TestApp::with_operator().await;
    ctx.add_employee("EMP-001", "Alice Tan").await;
    let token = AuthHelper::token(&ctx).await;
    ctx.db.set_unavailable(true);
    let app = init_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard")
        .insert_header(AuthHelper::bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let stats = &body["data"]["stats"];
    assert_eq!(stats["totalEmployees"], 0);
    assert_eq!(decimal(&stats["averageSalary"]), BigDecimal::from(0));
    assert!(body["data"]["recentAttendance"].as_array().unwrap().is_empty());

    let levels = notice_levels(&body["data"]);
    assert_eq!(levels.len(), 5);
    assert!(levels.iter().all(|level| level == "error"));
}

#[actix_web::test]
async fn test_reports_screen_is_a_placeholder() {
    let ctx = TestApp::with_operator().await;
    let token = AuthHelper::token(&ctx).await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/v1/reports")
        .insert_header(AuthHelper::bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        notice_texts(&body["data"]),
        vec!["Fitur laporan akan segera hadir"]
    );

    let req = test::TestRequest::get()
        .uri("/api/v1/session")
        .insert_header(AuthHelper::bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["current"], "reports");
}
