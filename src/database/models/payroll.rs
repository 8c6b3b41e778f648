use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PayrollPeriod {
    pub id: Uuid,
    pub period_name: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub payment_date: NaiveDate,
    pub status: PeriodStatus,
    pub created_by: Option<Uuid>, // references users.id
    pub created_at: DateTime<Utc>,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum PeriodStatus {
        Draft => "draft",
        Calculated => "calculated",
        Approved => "approved",
        Paid => "paid",
    }
}

/// Create-period form. Dates are optional so that a missing one is reported
/// as a validation message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodForm {
    pub period_name: Option<String>,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub payment_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPayrollPeriod {
    pub period_name: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub payment_date: NaiveDate,
    pub status: PeriodStatus,
    pub created_by: Uuid,
}

impl PeriodForm {
    /// New periods always start out as drafts owned by `created_by`.
    pub fn validate(self, created_by: Uuid) -> Result<NewPayrollPeriod, String> {
        let period_name = self
            .period_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| "periodName is required".to_string())?;
        let period_start = self
            .period_start
            .ok_or_else(|| "periodStart is required".to_string())?;
        let period_end = self
            .period_end
            .ok_or_else(|| "periodEnd is required".to_string())?;
        let payment_date = self
            .payment_date
            .ok_or_else(|| "paymentDate is required".to_string())?;

        if period_end < period_start {
            return Err("periodEnd must not be before periodStart".to_string());
        }

        Ok(NewPayrollPeriod {
            period_name,
            period_start,
            period_end,
            payment_date,
            status: PeriodStatus::Draft,
            created_by,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct PeriodPatch {
    pub period_name: Option<String>,
    pub payment_date: Option<NaiveDate>,
    pub status: Option<PeriodStatus>,
}

impl PeriodPatch {
    pub fn apply(&self, period: &mut PayrollPeriod) {
        if let Some(ref period_name) = self.period_name {
            period.period_name = period_name.clone();
        }
        if let Some(payment_date) = self.payment_date {
            period.payment_date = payment_date;
        }
        if let Some(status) = self.status {
            period.status = status;
        }
    }
}

/// Slip rows are produced by the `calculate_payroll` procedure; this
/// application only reads them.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PayrollSlip {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub period_id: Uuid,
    pub net_salary: Option<BigDecimal>,
    pub status: SlipStatus,
    pub created_at: DateTime<Utc>,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum SlipStatus {
        Draft => "draft",
        Approved => "approved",
        Paid => "paid",
    }
}

#[derive(Debug, Clone, Default)]
pub struct SlipFilter {
    pub status: Option<SlipStatus>,
    pub period_id: Option<Uuid>,
}

impl SlipFilter {
    pub fn status(status: SlipStatus) -> Self {
        Self {
            status: Some(status),
            period_id: None,
        }
    }

    pub fn matches(&self, slip: &PayrollSlip) -> bool {
        if let Some(status) = self.status {
            if slip.status != status {
                return false;
            }
        }
        match self.period_id {
            Some(id) => slip.period_id == id,
            None => true,
        }
    }
}

/// Slip joined with employee and period names for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SlipSummary {
    pub id: Uuid,
    pub net_salary: Option<BigDecimal>,
    pub status: SlipStatus,
    pub employee_name: String,
    pub period_name: String,
    pub created_at: DateTime<Utc>,
}
