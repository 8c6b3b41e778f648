use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default look-back window of the attendance screen.
pub const DEFAULT_RANGE_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub employee_id: Uuid, // references employees.id
    pub attendance_date: NaiveDate,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub status: String,
    pub late_minutes: i32,
    pub overtime_hours: BigDecimal,
    pub created_at: DateTime<Utc>,
}

/// Attendance row joined with the owning employee's name and business id.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceWithEmployee {
    pub id: Uuid,
    pub attendance_date: NaiveDate,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub status: String,
    pub late_minutes: i32,
    pub overtime_hours: BigDecimal,
    pub employee_name: String,
    pub employee_code: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendanceRecord {
    pub employee_id: Uuid,
    pub attendance_date: NaiveDate,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub status: String,
    pub late_minutes: i32,
    pub overtime_hours: BigDecimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendancePatch {
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub status: Option<String>,
    pub late_minutes: Option<i32>,
    pub overtime_hours: Option<BigDecimal>,
}

impl AttendancePatch {
    pub fn apply(&self, record: &mut AttendanceRecord) {
        if let Some(check_in) = self.check_in {
            record.check_in = Some(check_in);
        }
        if let Some(check_out) = self.check_out {
            record.check_out = Some(check_out);
        }
        if let Some(ref status) = self.status {
            record.status = status.clone();
        }
        if let Some(late_minutes) = self.late_minutes {
            record.late_minutes = late_minutes;
        }
        if let Some(ref overtime_hours) = self.overtime_hours {
            record.overtime_hours = overtime_hours.clone();
        }
    }
}

/// Inclusive date range over `attendance_date`.
#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub employee_id: Option<Uuid>,
}

impl AttendanceFilter {
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            employee_id: None,
        }
    }

    pub fn contains(&self, record: &AttendanceRecord) -> bool {
        if let Some(from) = self.from {
            if record.attendance_date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if record.attendance_date > to {
                return false;
            }
        }
        match self.employee_id {
            Some(id) => record.employee_id == id,
            None => true,
        }
    }
}

/// Date range query of the attendance screen; both ends optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateRangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRangeQuery {
    /// Resolves missing ends to `[today - 30d, today]`.
    pub fn resolve(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let to = self.to.unwrap_or(today);
        let from = self
            .from
            .unwrap_or_else(|| today - Duration::days(DEFAULT_RANGE_DAYS));
        (from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: NaiveDate) -> AttendanceRecord {
        AttendanceRecord {
            id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            attendance_date: date,
            check_in: None,
            check_out: None,
            status: "present".to_string(),
            late_minutes: 0,
            overtime_hours: BigDecimal::from(0),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let from = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let filter = AttendanceFilter::between(from, to);

        assert!(filter.contains(&record(from)));
        assert!(filter.contains(&record(to)));
        assert!(!filter.contains(&record(to.succ_opt().unwrap())));
        assert!(!filter.contains(&record(from.pred_opt().unwrap())));
    }

    #[test]
    fn default_range_is_last_thirty_days() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let (from, to) = DateRangeQuery::default().resolve(today);
        assert_eq!(to, today);
        assert_eq!(from, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }
}
