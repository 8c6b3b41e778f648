use std::sync::Arc;

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;
pub use services::AuthService;

use database::memory::MemoryDatabase;
use database::repositories::{
    AttendanceStore, EmployeeStore, PayrollStore, PgAttendanceRepository, PgEmployeeRepository,
    PgPayrollRepository, PgUserRepository, UserStore,
};

pub struct AppState {
    pub config: Config,
    pub auth: AuthService,
    pub employees: Arc<dyn EmployeeStore>,
    pub attendance: Arc<dyn AttendanceStore>,
    pub payroll: Arc<dyn PayrollStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        users: Arc<dyn UserStore>,
        employees: Arc<dyn EmployeeStore>,
        attendance: Arc<dyn AttendanceStore>,
        payroll: Arc<dyn PayrollStore>,
    ) -> Self {
        Self {
            auth: AuthService::new(config.clone(), users),
            config,
            employees,
            attendance,
            payroll,
        }
    }

    /// Wires every store to the remote Postgres database.
    pub fn postgres(config: Config, pool: sqlx::PgPool) -> Self {
        Self::new(
            config,
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgEmployeeRepository::new(pool.clone())),
            Arc::new(PgAttendanceRepository::new(pool.clone())),
            Arc::new(PgPayrollRepository::new(pool)),
        )
    }

    /// Wires every store to one in-process database.
    pub fn in_memory(config: Config, db: MemoryDatabase) -> Self {
        Self::new(
            config,
            Arc::new(db.clone()),
            Arc::new(db.clone()),
            Arc::new(db.clone()),
            Arc::new(db),
        )
    }
}
