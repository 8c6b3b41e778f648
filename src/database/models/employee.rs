use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub employee_id: String, // business key shown to HR, unique
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub join_date: NaiveDate,
    pub status: EmployeeStatus,
    pub created_at: DateTime<Utc>,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum EmployeeStatus {
        Active => "active",
        Inactive => "inactive",
    }
}

/// Raw add-employee form as submitted by the browser. Everything is optional
/// here so that missing required fields surface as a validation message
/// rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeForm {
    pub employee_id: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub join_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub employee_id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub join_date: NaiveDate,
}

impl EmployeeForm {
    /// Checks the required fields (`employeeId`, `fullName`, `joinDate`) and
    /// normalises blank optional fields to `None`.
    pub fn validate(self) -> Result<NewEmployee, Vec<&'static str>> {
        let employee_id = non_blank(self.employee_id);
        let full_name = non_blank(self.full_name);

        let mut missing = Vec::new();
        if employee_id.is_none() {
            missing.push("employeeId");
        }
        if full_name.is_none() {
            missing.push("fullName");
        }
        if self.join_date.is_none() {
            missing.push("joinDate");
        }

        match (employee_id, full_name, self.join_date) {
            (Some(employee_id), Some(full_name), Some(join_date)) => Ok(NewEmployee {
                employee_id,
                full_name,
                email: non_blank(self.email),
                phone: non_blank(self.phone),
                department: non_blank(self.department),
                position: non_blank(self.position),
                join_date,
            }),
            _ => Err(missing),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub join_date: Option<NaiveDate>,
    pub status: Option<EmployeeStatus>,
}

impl EmployeePatch {
    pub fn status(status: EmployeeStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.department.is_none()
            && self.position.is_none()
            && self.join_date.is_none()
            && self.status.is_none()
    }

    pub fn apply(&self, employee: &mut Employee) {
        if let Some(ref full_name) = self.full_name {
            employee.full_name = full_name.clone();
        }
        if let Some(ref email) = self.email {
            employee.email = Some(email.clone());
        }
        if let Some(ref phone) = self.phone {
            employee.phone = Some(phone.clone());
        }
        if let Some(ref department) = self.department {
            employee.department = Some(department.clone());
        }
        if let Some(ref position) = self.position {
            employee.position = Some(position.clone());
        }
        if let Some(join_date) = self.join_date {
            employee.join_date = join_date;
        }
        if let Some(status) = self.status {
            employee.status = status;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    pub status: Option<EmployeeStatus>,
    /// Case-insensitive substring over `full_name` or `employee_id`.
    pub search: Option<String>,
}

impl EmployeeFilter {
    pub fn active() -> Self {
        Self {
            status: Some(EmployeeStatus::Active),
            search: None,
        }
    }

    pub fn active_matching(search: Option<&str>) -> Self {
        Self {
            status: Some(EmployeeStatus::Active),
            search: search
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }

    pub fn matches(&self, employee: &Employee) -> bool {
        if let Some(status) = self.status {
            if employee.status != status {
                return false;
            }
        }
        match self.search {
            Some(ref term) => {
                let term = term.to_lowercase();
                employee.full_name.to_lowercase().contains(&term)
                    || employee.employee_id.to_lowercase().contains(&term)
            }
            None => true,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn employee(code: &str, name: &str, status: EmployeeStatus) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            employee_id: code.to_string(),
            full_name: name.to_string(),
            email: None,
            phone: None,
            department: None,
            position: None,
            join_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn search_matches_name_or_business_id_case_insensitively() {
        let filter = EmployeeFilter::active_matching(Some("ali"));

        assert!(filter.matches(&employee("EMP-001", "Alicia Putri", EmployeeStatus::Active)));
        assert!(filter.matches(&employee("EMP-002", "Rizal Khalid", EmployeeStatus::Active)));
        assert!(filter.matches(&employee("KALI-9", "Budi", EmployeeStatus::Active)));
        assert!(!filter.matches(&employee("EMP-003", "Budi Santoso", EmployeeStatus::Active)));
        assert!(!filter.matches(&employee("EMP-004", "Alina", EmployeeStatus::Inactive)));
    }

    #[test]
    fn blank_search_is_ignored() {
        let filter = EmployeeFilter::active_matching(Some("   "));
        assert!(filter.search.is_none());
    }

    #[test]
    fn form_validation_reports_every_missing_required_field() {
        let form = EmployeeForm {
            email: Some("x@company.com".to_string()),
            full_name: Some("  ".to_string()),
            ..Default::default()
        };

        assert_eq!(
            form.validate().unwrap_err(),
            vec!["employeeId", "fullName", "joinDate"]
        );
    }

    #[test]
    fn form_validation_normalises_blank_optionals() {
        let form = EmployeeForm {
            employee_id: Some(" EMP-010 ".to_string()),
            full_name: Some("Dewi Lestari".to_string()),
            phone: Some("".to_string()),
            join_date: NaiveDate::from_ymd_opt(2025, 1, 6),
            ..Default::default()
        };

        let new_employee = form.validate().unwrap();
        assert_eq!(new_employee.employee_id, "EMP-010");
        assert_eq!(new_employee.phone, None);
    }

    #[test]
    fn status_patch_only_flips_status() {
        let mut e = employee("EMP-005", "Eko", EmployeeStatus::Active);
        EmployeePatch::status(EmployeeStatus::Inactive).apply(&mut e);
        assert_eq!(e.status, EmployeeStatus::Inactive);
        assert_eq!(e.full_name, "Eko");
    }
}
