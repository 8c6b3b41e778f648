use actix_web::{HttpResponse, Result, web};
use serde::Serialize;
use uuid::Uuid;

use crate::AppState;
use crate::database::models::{PayrollPeriod, PeriodForm, PeriodStatus};
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, Notice, or_notice};
use crate::services::{Menu, Session};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRow {
    #[serde(flatten)]
    pub period: PayrollPeriod,
    /// Only drafts offer the calculate action.
    pub can_calculate: bool,
}

#[derive(Debug, Serialize)]
pub struct PayrollView {
    pub periods: Vec<PeriodRow>,
    pub notices: Vec<Notice>,
}

/// Periods newest first by start date.
pub async fn render(state: &AppState, mut notices: Vec<Notice>) -> PayrollView {
    let result = state.payroll.list_periods().await;
    let failed = result.is_err();
    let periods = or_notice(result, "periods", &mut notices);
    if periods.is_empty() && !failed {
        notices.push(Notice::info("Belum ada periode penggajian"));
    }

    PayrollView {
        periods: periods
            .into_iter()
            .map(|period| PeriodRow {
                can_calculate: period.status == PeriodStatus::Draft,
                period,
            })
            .collect(),
        notices,
    }
}

pub async fn get_periods(
    state: web::Data<AppState>,
    Session(session): Session,
) -> Result<HttpResponse> {
    session.lock().await.navigate(Menu::Payroll);

    let view = render(&state, Vec::new()).await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(view)))
}

/// New periods start as drafts stamped with the session user.
pub async fn create_period(
    state: web::Data<AppState>,
    Session(session): Session,
    form: web::Json<PeriodForm>,
) -> Result<HttpResponse> {
    let (user_id, email) = {
        let mut session = session.lock().await;
        session.navigate(Menu::Payroll);
        (session.user.id, session.user.email.clone())
    };

    let new_period = form
        .into_inner()
        .validate(user_id)
        .map_err(AppError::Validation)?;

    let mut notices = Vec::new();
    match state.payroll.insert_period(new_period).await {
        Ok(period) => {
            log::info!(
                "Payroll period '{}' ({}) created by {}",
                period.period_name,
                period.id,
                email
            );
            notices.push(Notice::success("Periode berhasil dibuat!"));
        }
        Err(e) => notices.push(Notice::error(format!("Error: {}", e))),
    }

    let view = render(&state, notices).await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(view)))
}

/// Runs the remote payroll calculation for a draft period, then re-reads
/// the list so status changes made by the procedure show up.
pub async fn calculate_period(
    state: web::Data<AppState>,
    Session(session): Session,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    session.lock().await.navigate(Menu::Payroll);
    let id = path.into_inner();

    let mut notices = Vec::new();
    match state.payroll.find_period(id).await {
        Ok(None) => {
            return Err(AppError::NotFound(format!("Payroll period {} not found", id)).into());
        }
        Ok(Some(period)) if period.status != PeriodStatus::Draft => {
            notices.push(Notice::warning(format!(
                "Periode {} sudah berstatus {}",
                period.period_name, period.status
            )));
        }
        Ok(Some(period)) => match state.payroll.calculate_payroll(period.id).await {
            Ok(()) => {
                log::info!("Payroll calculated for period '{}'", period.period_name);
                notices.push(Notice::success("Perhitungan selesai!"));
            }
            Err(e) => notices.push(Notice::error(format!("Error: {}", e))),
        },
        Err(e) => notices.push(Notice::error(format!("Error: {}", e))),
    }

    let view = render(&state, notices).await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(view)))
}
