//! Data access ports. Each remote table gets a store trait; `Pg*` types talk
//! to the remote Postgres database and [`crate::database::memory`] provides
//! an in-process implementation with the same filter semantics.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::database::models::{
    AttendanceFilter, AttendancePatch, AttendanceRecord, AttendanceWithEmployee, Employee,
    EmployeeFilter, EmployeePatch, NewAttendanceRecord, NewEmployee, NewPayrollPeriod, NewUser,
    PayrollPeriod, PayrollSlip, PeriodPatch, SlipFilter, SlipSummary, User, UserFilter, UserPatch,
};
use crate::error::AppError;

pub mod attendance;
pub mod employee;
pub mod payroll;
pub mod user;

pub use attendance::PgAttendanceRepository;
pub use employee::PgEmployeeRepository;
pub use payroll::PgPayrollRepository;
pub use user::PgUserRepository;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn insert(&self, user: NewUser) -> Result<User, AppError>;
    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, AppError>;
    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AppError>;

    async fn find_active_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .list(&UserFilter::active_email(email))
            .await?
            .into_iter()
            .next())
    }
}

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn list(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>, AppError>;
    async fn count(&self, filter: &EmployeeFilter) -> Result<i64, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, AppError>;
    /// Lookup by business key regardless of status.
    async fn find_by_code(&self, employee_id: &str) -> Result<Option<Employee>, AppError>;
    async fn insert(&self, employee: NewEmployee) -> Result<Employee, AppError>;
    async fn update(&self, id: Uuid, patch: EmployeePatch) -> Result<Option<Employee>, AppError>;
}

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    async fn list(&self, filter: &AttendanceFilter)
    -> Result<Vec<AttendanceWithEmployee>, AppError>;
    async fn count(&self, filter: &AttendanceFilter) -> Result<i64, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AttendanceRecord>, AppError>;
    async fn insert(&self, record: NewAttendanceRecord) -> Result<AttendanceRecord, AppError>;
    async fn update(
        &self,
        id: Uuid,
        patch: AttendancePatch,
    ) -> Result<Option<AttendanceRecord>, AppError>;
    /// Most recent rows by attendance date.
    async fn latest(&self, limit: i64) -> Result<Vec<AttendanceWithEmployee>, AppError>;
}

#[async_trait]
pub trait PayrollStore: Send + Sync {
    /// Periods ordered by `period_start` descending.
    async fn list_periods(&self) -> Result<Vec<PayrollPeriod>, AppError>;
    async fn find_period(&self, id: Uuid) -> Result<Option<PayrollPeriod>, AppError>;
    async fn insert_period(&self, period: NewPayrollPeriod) -> Result<PayrollPeriod, AppError>;
    async fn update_period(
        &self,
        id: Uuid,
        patch: PeriodPatch,
    ) -> Result<Option<PayrollPeriod>, AppError>;

    async fn list_slips(&self, filter: &SlipFilter) -> Result<Vec<PayrollSlip>, AppError>;
    async fn count_slips(&self, filter: &SlipFilter) -> Result<i64, AppError>;
    /// Sum of `net_salary` over every slip, nulls counted as zero.
    async fn total_net_salary(&self) -> Result<BigDecimal, AppError>;
    /// Most recently created slips joined with employee and period names.
    async fn latest_slips(&self, limit: i64) -> Result<Vec<SlipSummary>, AppError>;

    /// Runs the remote `calculate_payroll` procedure for a period. Its
    /// computation is owned by the database; only completion is observed.
    async fn calculate_payroll(&self, period_id: Uuid) -> Result<(), AppError>;
}
