use crate::database::models::AttendanceWithEmployee;

pub const ATTENDANCE_CSV_FILENAME: &str = "attendance_data.csv";

const ATTENDANCE_HEADER: [&str; 8] = [
    "attendance_date",
    "check_in",
    "check_out",
    "status",
    "late_minutes",
    "overtime_hours",
    "full_name",
    "employee_id",
];

/// Renders the filtered attendance rows as comma-separated text with a
/// header line. Fields are quoted only when they contain a delimiter, a
/// quote or a line break.
pub fn attendance_csv(rows: &[AttendanceWithEmployee]) -> String {
    let mut out = String::new();
    push_line(&mut out, ATTENDANCE_HEADER.iter().map(|h| h.to_string()));

    for row in rows {
        push_line(
            &mut out,
            [
                row.attendance_date.to_string(),
                row.check_in.map(|t| t.to_string()).unwrap_or_default(),
                row.check_out.map(|t| t.to_string()).unwrap_or_default(),
                row.status.clone(),
                row.late_minutes.to_string(),
                row.overtime_hours.to_string(),
                row.employee_name.clone(),
                row.employee_code.clone(),
            ]
            .into_iter(),
        );
    }

    out
}

fn push_line(out: &mut String, fields: impl Iterator<Item = String>) {
    let line = fields.map(|f| escape(&f)).collect::<Vec<_>>().join(",");
    out.push_str(&line);
    out.push('\n');
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::{NaiveDate, NaiveTime};
    use pretty_assertions::assert_eq;
    use std::str::FromStr;
    use uuid::Uuid;

    fn row(name: &str) -> AttendanceWithEmployee {
        AttendanceWithEmployee {
            id: Uuid::new_v4(),
            attendance_date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            check_in: NaiveTime::from_hms_opt(8, 12, 0),
            check_out: None,
            status: "late".to_string(),
            late_minutes: 12,
            overtime_hours: BigDecimal::from_str("1.5").unwrap(),
            employee_name: name.to_string(),
            employee_code: "EMP-001".to_string(),
        }
    }

    #[test]
    fn header_only_for_empty_set() {
        assert_eq!(
            attendance_csv(&[]),
            "attendance_date,check_in,check_out,status,late_minutes,overtime_hours,full_name,employee_id\n"
        );
    }

    #[test]
    fn rows_follow_header_in_order() {
        let csv = attendance_csv(&[row("Alice Tan")]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "2025-01-06,08:12:00,,late,12,1.5,Alice Tan,EMP-001");
    }

    #[test]
    fn delimiters_and_quotes_are_escaped() {
        let csv = attendance_csv(&[row("Tan, \"Ali\"")]);
        assert!(csv.contains(",\"Tan, \"\"Ali\"\"\",EMP-001"));
    }
}
