#![allow(dead_code, unused_macros)]

use actix_web::web;
use chrono::NaiveDate;
use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use serde_json::Value;

use payroll_hrd::AppState;
use payroll_hrd::config::Config;
use payroll_hrd::database::memory::MemoryDatabase;
use payroll_hrd::database::models::{
    Employee, EmployeeForm, LoginInput, NewEmployee, UserInfo,
};
use payroll_hrd::database::repositories::EmployeeStore;

pub const HRD_EMAIL: &str = "hrd@company.com";
pub const HRD_PASSWORD: &str = "rahasia123";

/// Builds the full actix application over a [`TestApp`]'s state.
macro_rules! init_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($ctx.state.clone())
                .configure(payroll_hrd::routes::configure),
        )
        .await
    };
}

// Test application wrapper
pub struct TestApp {
    pub db: MemoryDatabase,
    pub state: web::Data<AppState>,
    pub config: Config,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = MemoryDatabase::new();
        let config = Config::test_config();
        let state = web::Data::new(AppState::in_memory(config.clone(), db.clone()));

        TestApp { db, state, config }
    }

    /// A fresh app with the HRD operator account provisioned.
    pub async fn with_operator() -> Self {
        let ctx = Self::new().await;
        AuthHelper::provision_hrd(&ctx).await;
        ctx
    }

    pub async fn add_employee(&self, code: &str, name: &str) -> Employee {
        self.db
            .insert(new_employee(
                code,
                name,
                NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
            ))
            .await
            .unwrap()
    }
}

/// Minimal employee record with a known join date.
pub fn new_employee(employee_id: &str, full_name: &str, join_date: NaiveDate) -> NewEmployee {
    NewEmployee {
        employee_id: employee_id.to_string(),
        full_name: full_name.to_string(),
        email: None,
        phone: None,
        department: None,
        position: None,
        join_date,
    }
}

// Mock data generators
pub struct MockData;

impl MockData {
    pub fn employee_form(code: &str) -> EmployeeForm {
        EmployeeForm {
            employee_id: Some(code.to_string()),
            full_name: Some(Name().fake()),
            email: Some(SafeEmail().fake()),
            phone: Some(PhoneNumber().fake()),
            department: Some("Finance".to_string()),
            position: Some("Staff".to_string()),
            join_date: NaiveDate::from_ymd_opt(2024, 7, 15),
        }
    }

    pub fn period_form(name: &str, start: NaiveDate, end: NaiveDate, pay: NaiveDate) -> Value {
        serde_json::json!({
            "periodName": name,
            "periodStart": start,
            "periodEnd": end,
            "paymentDate": pay,
        })
    }
}

// Authentication helpers
pub struct AuthHelper;

impl AuthHelper {
    pub async fn provision_hrd(ctx: &TestApp) -> UserInfo {
        ctx.state
            .auth
            .provision_user(HRD_EMAIL, HRD_PASSWORD, "Sari HRD", "hrd")
            .await
            .unwrap()
    }

    /// Logs the HRD operator in through the service and returns the bearer
    /// token.
    pub async fn token(ctx: &TestApp) -> String {
        ctx.state
            .auth
            .login(LoginInput {
                email: HRD_EMAIL.to_string(),
                password: HRD_PASSWORD.to_string(),
            })
            .await
            .unwrap()
            .expect("operator credentials accepted")
            .token
    }

    pub fn bearer(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", token))
    }
}

/// Texts of every notice in a screen view.
pub fn notice_texts(view: &Value) -> Vec<String> {
    view["notices"]
        .as_array()
        .map(|notices| {
            notices
                .iter()
                .filter_map(|n| n["text"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

pub fn notice_levels(view: &Value) -> Vec<String> {
    view["notices"]
        .as_array()
        .map(|notices| {
            notices
                .iter()
                .filter_map(|n| n["level"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
