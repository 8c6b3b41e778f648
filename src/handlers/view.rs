use actix_web::{HttpResponse, Result, web};
use serde::Serialize;

use crate::AppState;
use crate::database::models::{DateRangeQuery, UserInfo};
use crate::handlers::shared::ApiResponse;
use crate::handlers::{attendance, dashboard, employees, payroll, reports};
use crate::services::{Menu, Session};

#[derive(Debug, Serialize)]
pub struct MenuEntry {
    pub key: Menu,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarView {
    pub user: UserInfo,
    pub menu: Vec<MenuEntry>,
    pub current: Menu,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenView<T> {
    pub screen: Menu,
    pub view: T,
}

/// Sidebar: who is logged in, the menu and the selected screen.
pub async fn get_session(Session(session): Session) -> Result<HttpResponse> {
    let session = session.lock().await;
    let sidebar = SidebarView {
        user: session.user.clone(),
        menu: Menu::ALL
            .iter()
            .map(|menu| MenuEntry {
                key: *menu,
                label: menu.label(),
            })
            .collect(),
        current: session.screen,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(sidebar)))
}

/// Menu selection: switches the session to `menu` and renders that screen
/// with default inputs.
pub async fn get_screen(
    state: web::Data<AppState>,
    Session(session): Session,
    path: web::Path<Menu>,
) -> Result<HttpResponse> {
    let menu = path.into_inner();
    let mut session = session.lock().await;
    session.navigate(menu);

    let response = match menu {
        Menu::Dashboard => screen(menu, dashboard::render(&state).await),
        Menu::Employees => screen(
            menu,
            employees::render(&state, &session.employees, None, Vec::new()).await,
        ),
        Menu::Attendance => screen(
            menu,
            attendance::render(
                &state,
                session.attendance.upload.as_ref(),
                &DateRangeQuery::default(),
            )
            .await,
        ),
        Menu::Payroll => screen(menu, payroll::render(&state, Vec::new()).await),
        Menu::Reports => screen(menu, reports::render()),
    };

    Ok(response)
}

fn screen<T: Serialize>(menu: Menu, view: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(ScreenView { screen: menu, view }))
}
