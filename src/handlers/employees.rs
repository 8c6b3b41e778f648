use actix_web::{HttpResponse, Result, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::database::models::{
    Employee, EmployeeFilter, EmployeeForm, EmployeePatch, EmployeeStatus,
};
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, Notice, or_notice};
use crate::services::session::{DeleteStep, EmployeeRowState, EmployeeUiState};
use crate::services::{Menu, Session};

#[derive(Debug, Default, Deserialize)]
pub struct EmployeeSearch {
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRow {
    #[serde(flatten)]
    pub employee: Employee,
    pub ui: EmployeeRowState,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeesView {
    pub search: Option<String>,
    pub show_add_form: bool,
    pub employees: Vec<EmployeeRow>,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Serialize)]
pub struct EmployeeDetailView {
    pub employee: Option<EmployeeRow>,
    pub notices: Vec<Notice>,
}

/// Active employees, optionally narrowed by a name/business-id substring,
/// decorated with this session's per-row flags. `notices` from the action
/// that triggered the render come first.
pub async fn render(
    state: &AppState,
    ui: &EmployeeUiState,
    search: Option<&str>,
    mut notices: Vec<Notice>,
) -> EmployeesView {
    let filter = EmployeeFilter::active_matching(search);
    let result = state.employees.list(&filter).await;
    let failed = result.is_err();
    let employees = or_notice(result, "employees", &mut notices);

    if employees.is_empty() && !failed {
        notices.push(Notice::info("Tidak ada data karyawan"));
    }

    EmployeesView {
        search: filter.search,
        show_add_form: ui.show_add_form,
        employees: employees
            .into_iter()
            .map(|employee| EmployeeRow {
                ui: ui.row(employee.id),
                employee,
            })
            .collect(),
        notices,
    }
}

fn respond(view: EmployeesView) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(view))
}

pub async fn get_employees(
    state: web::Data<AppState>,
    Session(session): Session,
    query: web::Query<EmployeeSearch>,
) -> Result<HttpResponse> {
    let mut session = session.lock().await;
    session.navigate(Menu::Employees);

    let view = render(&state, &session.employees, query.search.as_deref(), Vec::new()).await;
    Ok(respond(view))
}

/// Detail row of one employee, whatever its status.
pub async fn get_employee(
    state: web::Data<AppState>,
    Session(session): Session,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let ui = session.lock().await.employees.row(id);

    let mut notices = Vec::new();
    let employee = match state.employees.find_by_id(id).await {
        Ok(Some(employee)) => Some(employee),
        Ok(None) => return Err(AppError::NotFound(format!("Employee {} not found", id)).into()),
        Err(e) => {
            notices.push(Notice::error(format!("Error loading employee: {}", e)));
            None
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(EmployeeDetailView {
        employee: employee.map(|employee| EmployeeRow { employee, ui }),
        notices,
    })))
}

pub async fn open_add_form(
    state: web::Data<AppState>,
    Session(session): Session,
    query: web::Query<EmployeeSearch>,
) -> Result<HttpResponse> {
    let mut session = session.lock().await;
    session.navigate(Menu::Employees);
    session.employees.show_add_form = true;

    let view = render(&state, &session.employees, query.search.as_deref(), Vec::new()).await;
    Ok(respond(view))
}

pub async fn cancel_add_form(
    state: web::Data<AppState>,
    Session(session): Session,
    query: web::Query<EmployeeSearch>,
) -> Result<HttpResponse> {
    let mut session = session.lock().await;
    session.navigate(Menu::Employees);
    session.employees.show_add_form = false;

    let view = render(&state, &session.employees, query.search.as_deref(), Vec::new()).await;
    Ok(respond(view))
}

/// Validates the add form and inserts. A remote failure keeps the form open
/// with an error notice.
pub async fn create_employee(
    state: web::Data<AppState>,
    Session(session): Session,
    query: web::Query<EmployeeSearch>,
    form: web::Json<EmployeeForm>,
) -> Result<HttpResponse> {
    let new_employee = form.into_inner().validate().map_err(|missing| {
        AppError::Validation(format!("Missing required fields: {}", missing.join(", ")))
    })?;

    let mut session = session.lock().await;
    session.navigate(Menu::Employees);

    let mut notices = Vec::new();
    match state.employees.insert(new_employee).await {
        Ok(employee) => {
            log::info!(
                "Employee {} ({}) added by {}",
                employee.employee_id,
                employee.id,
                session.user.email
            );
            session.employees.show_add_form = false;
            notices.push(Notice::success("Karyawan berhasil ditambahkan!"));
        }
        Err(e) => notices.push(Notice::error(format!("Error: {}", e))),
    }

    let view = render(&state, &session.employees, query.search.as_deref(), notices).await;
    Ok(respond(view))
}

/// Inline edit of one row.
pub async fn update_employee(
    state: web::Data<AppState>,
    Session(session): Session,
    path: web::Path<Uuid>,
    query: web::Query<EmployeeSearch>,
    patch: web::Json<EmployeePatch>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let patch = patch.into_inner();
    if patch.is_empty() {
        return Err(AppError::BadRequest("No fields to update".to_string()).into());
    }

    let mut session = session.lock().await;
    session.navigate(Menu::Employees);

    let mut notices = Vec::new();
    match state.employees.update(id, patch).await {
        Ok(Some(employee)) => {
            log::info!("Employee {} updated", employee.employee_id);
            session.employees.finish_editing(id);
            notices.push(Notice::success("Data karyawan berhasil diperbarui"));
        }
        Ok(None) => return Err(AppError::NotFound(format!("Employee {} not found", id)).into()),
        Err(e) => notices.push(Notice::error(format!("Error: {}", e))),
    }

    let view = render(&state, &session.employees, query.search.as_deref(), notices).await;
    Ok(respond(view))
}

pub async fn toggle_edit(
    state: web::Data<AppState>,
    Session(session): Session,
    path: web::Path<Uuid>,
    query: web::Query<EmployeeSearch>,
) -> Result<HttpResponse> {
    let mut session = session.lock().await;
    session.navigate(Menu::Employees);
    session.employees.toggle_editing(path.into_inner());

    let view = render(&state, &session.employees, query.search.as_deref(), Vec::new()).await;
    Ok(respond(view))
}

/// Marks the row as the salary-set target. Salary figures themselves are
/// owned by the payroll procedure.
pub async fn toggle_salary(
    state: web::Data<AppState>,
    Session(session): Session,
    path: web::Path<Uuid>,
    query: web::Query<EmployeeSearch>,
) -> Result<HttpResponse> {
    let mut session = session.lock().await;
    session.navigate(Menu::Employees);
    session.employees.toggle_salary(path.into_inner());

    let view = render(&state, &session.employees, query.search.as_deref(), Vec::new()).await;
    Ok(respond(view))
}

/// Two-step soft delete: the first click only arms the row.
pub async fn delete_employee(
    state: web::Data<AppState>,
    Session(session): Session,
    path: web::Path<Uuid>,
    query: web::Query<EmployeeSearch>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let mut session = session.lock().await;
    session.navigate(Menu::Employees);

    let mut notices = Vec::new();
    match session.employees.request_delete(id) {
        DeleteStep::AwaitingConfirmation => {
            notices.push(Notice::warning("Klik lagi untuk konfirmasi"));
        }
        DeleteStep::Confirmed => {
            match state
                .employees
                .update(id, EmployeePatch::status(EmployeeStatus::Inactive))
                .await
            {
                Ok(Some(employee)) => {
                    log::info!(
                        "Employee {} deactivated by {}",
                        employee.employee_id,
                        session.user.email
                    );
                    notices.push(Notice::success("Karyawan berhasil dihapus"));
                }
                Ok(None) => notices.push(Notice::warning("Karyawan tidak ditemukan")),
                Err(e) => notices.push(Notice::error(format!("Error: {}", e))),
            }
        }
    }

    let view = render(&state, &session.employees, query.search.as_deref(), notices).await;
    Ok(respond(view))
}
