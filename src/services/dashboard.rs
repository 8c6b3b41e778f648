use bigdecimal::{BigDecimal, Zero};
use serde::Serialize;

use crate::database::models::{
    AttendanceWithEmployee, EmployeeFilter, SlipFilter, SlipStatus, SlipSummary,
};
use crate::database::repositories::{AttendanceStore, EmployeeStore, PayrollStore};
use crate::handlers::shared::{Notice, or_notice};

pub const RECENT_ROWS: i64 = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_employees: i64,
    pub total_payroll: BigDecimal,
    pub average_salary: BigDecimal,
    pub pending_approval: i64,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub stats: DashboardStats,
    pub recent_attendance: Vec<AttendanceWithEmployee>,
    pub recent_slips: Vec<SlipSummary>,
    pub notices: Vec<Notice>,
}

/// Total payroll spread over active employees, rounded to cents. Zero when
/// there are no employees.
pub fn average_salary(total: &BigDecimal, employee_count: i64) -> BigDecimal {
    if employee_count <= 0 {
        return BigDecimal::zero();
    }
    (total / BigDecimal::from(employee_count)).round(2)
}

/// Runs the four aggregate reads and the two "latest" reads. Each read
/// fails on its own: a failed read leaves its default in place and adds an
/// error notice.
pub async fn load_dashboard(
    employees: &dyn EmployeeStore,
    attendance: &dyn AttendanceStore,
    payroll: &dyn PayrollStore,
) -> DashboardView {
    let mut notices = Vec::new();

    let total_employees = or_notice(
        employees.count(&EmployeeFilter::active()).await,
        "employee count",
        &mut notices,
    );
    let total_payroll = or_notice(
        payroll.total_net_salary().await,
        "payroll total",
        &mut notices,
    );
    let pending_approval = or_notice(
        payroll
            .count_slips(&SlipFilter::status(SlipStatus::Draft))
            .await,
        "pending slips",
        &mut notices,
    );
    let average_salary = average_salary(&total_payroll, total_employees);

    let attendance_result = attendance.latest(RECENT_ROWS).await;
    let attendance_failed = attendance_result.is_err();
    let recent_attendance = or_notice(attendance_result, "attendance", &mut notices);
    if recent_attendance.is_empty() && !attendance_failed {
        notices.push(Notice::info("Belum ada data absensi"));
    }

    let slips_result = payroll.latest_slips(RECENT_ROWS).await;
    let slips_failed = slips_result.is_err();
    let recent_slips = or_notice(slips_result, "payroll", &mut notices);
    if recent_slips.is_empty() && !slips_failed {
        notices.push(Notice::info("Belum ada slip gaji"));
    }

    DashboardView {
        stats: DashboardStats {
            total_employees,
            total_payroll,
            average_salary,
            pending_approval,
        },
        recent_attendance,
        recent_slips,
        notices,
    }
}
