use actix_web::{HttpResponse, Result};
use serde::Serialize;

use crate::handlers::shared::{ApiResponse, Notice};
use crate::services::{Menu, Session};

#[derive(Debug, Serialize)]
pub struct ReportsView {
    pub notices: Vec<Notice>,
}

pub fn render() -> ReportsView {
    ReportsView {
        notices: vec![Notice::info("Fitur laporan akan segera hadir")],
    }
}

pub async fn get_reports(Session(session): Session) -> Result<HttpResponse> {
    session.lock().await.navigate(Menu::Reports);
    Ok(HttpResponse::Ok().json(ApiResponse::success(render())))
}
