use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::database::models::UserInfo;
use crate::services::ingest::{MappingReport, ParsedSheet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Menu {
    #[default]
    Dashboard,
    Employees,
    Attendance,
    Payroll,
    Reports,
}

impl Menu {
    pub const ALL: [Menu; 5] = [
        Menu::Dashboard,
        Menu::Employees,
        Menu::Attendance,
        Menu::Payroll,
        Menu::Reports,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Menu::Dashboard => "Dashboard",
            Menu::Employees => "Karyawan",
            Menu::Attendance => "Absensi",
            Menu::Payroll => "Penggajian",
            Menu::Reports => "Laporan",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRowState {
    pub pending_delete: bool,
    pub editing: bool,
    pub setting_salary: bool,
}

impl EmployeeRowState {
    fn is_idle(&self) -> bool {
        !self.pending_delete && !self.editing && !self.setting_salary
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStep {
    AwaitingConfirmation,
    Confirmed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUiState {
    pub show_add_form: bool,
    pub rows: HashMap<Uuid, EmployeeRowState>,
}

impl EmployeeUiState {
    pub fn row(&self, id: Uuid) -> EmployeeRowState {
        self.rows.get(&id).cloned().unwrap_or_default()
    }

    /// First click arms the row, second click confirms. The flag is cleared
    /// on confirmation whether or not the delete that follows succeeds.
    pub fn request_delete(&mut self, id: Uuid) -> DeleteStep {
        let row = self.rows.entry(id).or_default();
        if row.pending_delete {
            row.pending_delete = false;
            self.prune(id);
            DeleteStep::Confirmed
        } else {
            row.pending_delete = true;
            DeleteStep::AwaitingConfirmation
        }
    }

    pub fn toggle_editing(&mut self, id: Uuid) -> bool {
        let row = self.rows.entry(id).or_default();
        row.editing = !row.editing;
        let editing = row.editing;
        self.prune(id);
        editing
    }

    pub fn finish_editing(&mut self, id: Uuid) {
        if let Some(row) = self.rows.get_mut(&id) {
            row.editing = false;
        }
        self.prune(id);
    }

    pub fn toggle_salary(&mut self, id: Uuid) -> bool {
        let row = self.rows.entry(id).or_default();
        row.setting_salary = !row.setting_salary;
        let setting = row.setting_salary;
        self.prune(id);
        setting
    }

    fn prune(&mut self, id: Uuid) {
        if self.rows.get(&id).is_some_and(EmployeeRowState::is_idle) {
            self.rows.remove(&id);
        }
    }
}

/// The last upload, kept until saved or until the operator leaves the screen.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingUpload {
    pub file_name: String,
    pub sheet: ParsedSheet,
    pub mapping: MappingReport,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceUiState {
    pub upload: Option<PendingUpload>,
}

#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: Uuid,
    pub user: UserInfo,
    pub screen: Menu,
    pub employees: EmployeeUiState,
    pub attendance: AttendanceUiState,
}

impl SessionContext {
    pub fn new(user: UserInfo) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            user,
            screen: Menu::default(),
            employees: EmployeeUiState::default(),
            attendance: AttendanceUiState::default(),
        }
    }

    /// Switches screen. Pending confirmations, open forms and uploads belong
    /// to the screen they were made on and do not survive a switch.
    pub fn navigate(&mut self, menu: Menu) {
        if self.screen != menu {
            log::debug!(
                "Session {} navigating {:?} -> {:?}",
                self.session_id,
                self.screen,
                menu
            );
            self.employees = EmployeeUiState::default();
            self.attendance = AttendanceUiState::default();
            self.screen = menu;
        }
    }
}

pub type SharedSession = Arc<Mutex<SessionContext>>;

/// Live sessions keyed by session id. Each entry lives for the configured TTL
/// from login, matching the `exp` of the token that names it. Activity does
/// not extend it.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<Uuid, SharedSession>,
}

impl SessionStore {
    pub fn new(ttl_hours: u32) -> Self {
        let ttl = Duration::from_secs(u64::from(ttl_hours) * 3600);
        Self {
            sessions: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub async fn create(&self, user: UserInfo) -> SharedSession {
        let context = SessionContext::new(user);
        let id = context.session_id;
        let shared = Arc::new(Mutex::new(context));
        self.sessions.insert(id, shared.clone()).await;
        shared
    }

    pub async fn get(&self, session_id: Uuid) -> Option<SharedSession> {
        self.sessions.get(&session_id).await
    }

    pub async fn remove(&self, session_id: Uuid) {
        self.sessions.invalidate(&session_id).await;
    }
}
