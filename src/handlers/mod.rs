use actix_web::{HttpResponse, Responder, get};

pub mod attendance;
pub mod auth;
pub mod dashboard;
pub mod employees;
pub mod payroll;
pub mod reports;
pub mod shared;
pub mod view;

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().body("Payroll HRD API v1.0")
}

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}
