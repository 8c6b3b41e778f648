use actix_web::{HttpResponse, Result, web};

use crate::AppState;
use crate::handlers::shared::ApiResponse;
use crate::services::dashboard::{DashboardView, load_dashboard};
use crate::services::{Menu, Session};

pub async fn render(state: &AppState) -> DashboardView {
    load_dashboard(
        state.employees.as_ref(),
        state.attendance.as_ref(),
        state.payroll.as_ref(),
    )
    .await
}

/// Dashboard metrics and latest activity
pub async fn get_dashboard(
    state: web::Data<AppState>,
    Session(session): Session,
) -> Result<HttpResponse> {
    session.lock().await.navigate(Menu::Dashboard);
    let view = render(&state).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(view)))
}
