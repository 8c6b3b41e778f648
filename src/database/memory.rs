//! In-process implementation of every store trait. Filters, orderings and
//! joins mirror the Postgres repositories; `set_unavailable(true)` makes
//! every call fail the way a dropped remote connection would.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::database::models::{
    AttendanceFilter, AttendancePatch, AttendanceRecord, AttendanceWithEmployee, Employee,
    EmployeeFilter, EmployeePatch, EmployeeStatus, NewAttendanceRecord, NewEmployee,
    NewPayrollPeriod, NewUser, PayrollPeriod, PayrollSlip, PeriodPatch, PeriodStatus, SlipFilter,
    SlipStatus, SlipSummary, User, UserFilter, UserPatch,
};
use crate::database::repositories::{AttendanceStore, EmployeeStore, PayrollStore, UserStore};
use crate::error::AppError;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    employees: Vec<Employee>,
    attendance: Vec<AttendanceRecord>,
    periods: Vec<PayrollPeriod>,
    slips: Vec<PayrollSlip>,
}

#[derive(Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<RwLock<Tables>>,
    unavailable: Arc<AtomicBool>,
    procedure_calls: Arc<RwLock<Vec<Uuid>>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates an unreachable remote database.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Period ids passed to `calculate_payroll`, in call order.
    pub fn procedure_calls(&self) -> Vec<Uuid> {
        self.procedure_calls
            .read()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Inserts a slip as the remote payroll procedure would.
    pub fn seed_slip(
        &self,
        employee_id: Uuid,
        period_id: Uuid,
        net_salary: Option<BigDecimal>,
        status: SlipStatus,
        created_at: DateTime<Utc>,
    ) -> PayrollSlip {
        let slip = PayrollSlip {
            id: Uuid::new_v4(),
            employee_id,
            period_id,
            net_salary,
            status,
            created_at,
        };
        if let Ok(mut tables) = self.tables.write() {
            tables.slips.push(slip.clone());
        }
        slip
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::remote_read("connection refused"));
        }
        self.tables
            .read()
            .map_err(|_| AppError::remote_read("store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::remote_write("connection refused"));
        }
        self.tables
            .write()
            .map_err(|_| AppError::remote_write("store lock poisoned"))
    }
}

impl Tables {
    fn join_attendance(&self, record: &AttendanceRecord) -> Option<AttendanceWithEmployee> {
        let employee = self.employees.iter().find(|e| e.id == record.employee_id)?;
        Some(AttendanceWithEmployee {
            id: record.id,
            attendance_date: record.attendance_date,
            check_in: record.check_in,
            check_out: record.check_out,
            status: record.status.clone(),
            late_minutes: record.late_minutes,
            overtime_hours: record.overtime_hours.clone(),
            employee_name: employee.full_name.clone(),
            employee_code: employee.employee_id.clone(),
        })
    }

    fn join_slip(&self, slip: &PayrollSlip) -> Option<SlipSummary> {
        let employee = self.employees.iter().find(|e| e.id == slip.employee_id)?;
        let period = self.periods.iter().find(|p| p.id == slip.period_id)?;
        Some(SlipSummary {
            id: slip.id,
            net_salary: slip.net_salary.clone(),
            status: slip.status,
            employee_name: employee.full_name.clone(),
            period_name: period.period_name.clone(),
            created_at: slip.created_at,
        })
    }

    fn sorted_attendance(&self, filter: &AttendanceFilter) -> Vec<AttendanceWithEmployee> {
        let mut rows: Vec<AttendanceWithEmployee> = self
            .attendance
            .iter()
            .filter(|r| filter.contains(r))
            .filter_map(|r| self.join_attendance(r))
            .collect();
        rows.sort_by(|a, b| {
            b.attendance_date
                .cmp(&a.attendance_date)
                .then_with(|| a.employee_code.cmp(&b.employee_code))
        });
        rows
    }
}

#[async_trait]
impl UserStore for MemoryDatabase {
    async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, AppError> {
        let tables = self.read()?;
        let mut users: Vec<User> = tables
            .users
            .iter()
            .filter(|u| filter.matches(u))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let tables = self.read()?;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let mut tables = self.write()?;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::remote_write(format!(
                "duplicate key value violates unique constraint \"users_email_key\": {}",
                user.email
            )));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            full_name: user.full_name,
            role: user.role,
            is_active: true,
            last_login: None,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, AppError> {
        let mut tables = self.write()?;
        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(full_name) = patch.full_name {
            user.full_name = full_name;
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        if let Some(is_active) = patch.is_active {
            user.is_active = is_active;
        }
        if let Some(password_hash) = patch.password_hash {
            user.password_hash = password_hash;
        }
        Ok(Some(user.clone()))
    }

    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AppError> {
        let mut tables = self.write()?;
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == id) {
            user.last_login = Some(at);
        }
        Ok(())
    }
}

#[async_trait]
impl EmployeeStore for MemoryDatabase {
    async fn list(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>, AppError> {
        let tables = self.read()?;
        let mut employees: Vec<Employee> = tables
            .employees
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        employees.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        Ok(employees)
    }

    async fn count(&self, filter: &EmployeeFilter) -> Result<i64, AppError> {
        let tables = self.read()?;
        Ok(tables.employees.iter().filter(|e| filter.matches(e)).count() as i64)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, AppError> {
        let tables = self.read()?;
        Ok(tables.employees.iter().find(|e| e.id == id).cloned())
    }

    async fn find_by_code(&self, employee_id: &str) -> Result<Option<Employee>, AppError> {
        let tables = self.read()?;
        Ok(tables
            .employees
            .iter()
            .find(|e| e.employee_id == employee_id)
            .cloned())
    }

    async fn insert(&self, employee: NewEmployee) -> Result<Employee, AppError> {
        let mut tables = self.write()?;
        if tables
            .employees
            .iter()
            .any(|e| e.employee_id == employee.employee_id)
        {
            return Err(AppError::remote_write(format!(
                "duplicate key value violates unique constraint \"employees_employee_id_key\": {}",
                employee.employee_id
            )));
        }
        let employee = Employee {
            id: Uuid::new_v4(),
            employee_id: employee.employee_id,
            full_name: employee.full_name,
            email: employee.email,
            phone: employee.phone,
            department: employee.department,
            position: employee.position,
            join_date: employee.join_date,
            status: EmployeeStatus::Active,
            created_at: Utc::now(),
        };
        tables.employees.push(employee.clone());
        Ok(employee)
    }

    async fn update(&self, id: Uuid, patch: EmployeePatch) -> Result<Option<Employee>, AppError> {
        let mut tables = self.write()?;
        let Some(employee) = tables.employees.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        patch.apply(employee);
        Ok(Some(employee.clone()))
    }
}

#[async_trait]
impl AttendanceStore for MemoryDatabase {
    async fn list(
        &self,
        filter: &AttendanceFilter,
    ) -> Result<Vec<AttendanceWithEmployee>, AppError> {
        let tables = self.read()?;
        Ok(tables.sorted_attendance(filter))
    }

    async fn count(&self, filter: &AttendanceFilter) -> Result<i64, AppError> {
        let tables = self.read()?;
        Ok(tables.attendance.iter().filter(|r| filter.contains(r)).count() as i64)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AttendanceRecord>, AppError> {
        let tables = self.read()?;
        Ok(tables.attendance.iter().find(|r| r.id == id).cloned())
    }

    async fn insert(&self, record: NewAttendanceRecord) -> Result<AttendanceRecord, AppError> {
        let mut tables = self.write()?;
        if !tables.employees.iter().any(|e| e.id == record.employee_id) {
            return Err(AppError::remote_write(format!(
                "insert violates foreign key constraint \"{}\": {}",
                "attendance_records_employee_id_fkey",
                record.employee_id
            )));
        }
        let record = AttendanceRecord {
            id: Uuid::new_v4(),
            employee_id: record.employee_id,
            attendance_date: record.attendance_date,
            check_in: record.check_in,
            check_out: record.check_out,
            status: record.status,
            late_minutes: record.late_minutes,
            overtime_hours: record.overtime_hours,
            created_at: Utc::now(),
        };
        tables.attendance.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: AttendancePatch,
    ) -> Result<Option<AttendanceRecord>, AppError> {
        let mut tables = self.write()?;
        let Some(record) = tables.attendance.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        patch.apply(record);
        Ok(Some(record.clone()))
    }

    async fn latest(&self, limit: i64) -> Result<Vec<AttendanceWithEmployee>, AppError> {
        let tables = self.read()?;
        let mut rows = tables.sorted_attendance(&AttendanceFilter::default());
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }
}

#[async_trait]
impl PayrollStore for MemoryDatabase {
    async fn list_periods(&self) -> Result<Vec<PayrollPeriod>, AppError> {
        let tables = self.read()?;
        let mut periods = tables.periods.clone();
        periods.sort_by(|a, b| b.period_start.cmp(&a.period_start));
        Ok(periods)
    }

    async fn find_period(&self, id: Uuid) -> Result<Option<PayrollPeriod>, AppError> {
        let tables = self.read()?;
        Ok(tables.periods.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_period(&self, period: NewPayrollPeriod) -> Result<PayrollPeriod, AppError> {
        let mut tables = self.write()?;
        let period = PayrollPeriod {
            id: Uuid::new_v4(),
            period_name: period.period_name,
            period_start: period.period_start,
            period_end: period.period_end,
            payment_date: period.payment_date,
            status: period.status,
            created_by: Some(period.created_by),
            created_at: Utc::now(),
        };
        tables.periods.push(period.clone());
        Ok(period)
    }

    async fn update_period(
        &self,
        id: Uuid,
        patch: PeriodPatch,
    ) -> Result<Option<PayrollPeriod>, AppError> {
        let mut tables = self.write()?;
        let Some(period) = tables.periods.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        patch.apply(period);
        Ok(Some(period.clone()))
    }

    async fn list_slips(&self, filter: &SlipFilter) -> Result<Vec<PayrollSlip>, AppError> {
        let tables = self.read()?;
        let mut slips: Vec<PayrollSlip> = tables
            .slips
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        slips.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(slips)
    }

    async fn count_slips(&self, filter: &SlipFilter) -> Result<i64, AppError> {
        let tables = self.read()?;
        Ok(tables.slips.iter().filter(|s| filter.matches(s)).count() as i64)
    }

    async fn total_net_salary(&self) -> Result<BigDecimal, AppError> {
        let tables = self.read()?;
        Ok(tables
            .slips
            .iter()
            .filter_map(|s| s.net_salary.clone())
            .fold(BigDecimal::from(0), |acc, net| acc + net))
    }

    async fn latest_slips(&self, limit: i64) -> Result<Vec<SlipSummary>, AppError> {
        let tables = self.read()?;
        let mut slips: Vec<SlipSummary> = tables
            .slips
            .iter()
            .filter_map(|s| tables.join_slip(s))
            .collect();
        slips.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        slips.truncate(limit.max(0) as usize);
        Ok(slips)
    }

    /// Stand-in for the remote procedure: marks the period calculated. Slip
    /// generation belongs to the database and is not simulated.
    async fn calculate_payroll(&self, period_id: Uuid) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::remote_procedure("connection refused"));
        }
        let mut tables = self
            .tables
            .write()
            .map_err(|_| AppError::remote_procedure("store lock poisoned"))?;
        let Some(period) = tables.periods.iter_mut().find(|p| p.id == period_id) else {
            return Err(AppError::remote_procedure(format!(
                "payroll period {} does not exist",
                period_id
            )));
        };
        period.status = PeriodStatus::Calculated;
        drop(tables);

        if let Ok(mut calls) = self.procedure_calls.write() {
            calls.push(period_id);
        }
        Ok(())
    }
}
