use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::AttendanceStore;
use crate::database::{
    models::{
        AttendanceFilter, AttendancePatch, AttendanceRecord, AttendanceWithEmployee,
        NewAttendanceRecord,
    },
    utils::sql,
};
use crate::error::AppError;

#[derive(Clone)]
pub struct PgAttendanceRepository {
    pool: PgPool,
}

impl PgAttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceStore for PgAttendanceRepository {
    async fn list(
        &self,
        filter: &AttendanceFilter,
    ) -> Result<Vec<AttendanceWithEmployee>, AppError> {
        let rows = sqlx::query_as::<_, AttendanceWithEmployee>(&sql(r#"
            SELECT
                a.id,
                a.attendance_date,
                a.check_in,
                a.check_out,
                a.status,
                a.late_minutes,
                a.overtime_hours,
                e.full_name AS employee_name,
                e.employee_id AS employee_code
            FROM
                attendance_records a
                JOIN employees e ON e.id = a.employee_id
            WHERE
                (?::DATE IS NULL OR a.attendance_date >= ?)
                AND (?::DATE IS NULL OR a.attendance_date <= ?)
                AND (?::UUID IS NULL OR a.employee_id = ?)
            ORDER BY
                a.attendance_date DESC,
                e.employee_id
        "#))
        .bind(filter.from)
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.to)
        .bind(filter.employee_id)
        .bind(filter.employee_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::remote_read)?;

        Ok(rows)
    }

    async fn count(&self, filter: &AttendanceFilter) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(&sql(r#"
            SELECT
                COUNT(*)
            FROM
                attendance_records
            WHERE
                (?::DATE IS NULL OR attendance_date >= ?)
                AND (?::DATE IS NULL OR attendance_date <= ?)
                AND (?::UUID IS NULL OR employee_id = ?)
        "#))
        .bind(filter.from)
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.to)
        .bind(filter.employee_id)
        .bind(filter.employee_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::remote_read)?;

        Ok(count)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AttendanceRecord>, AppError> {
        let record = sqlx::query_as::<_, AttendanceRecord>(&sql(r#"
            SELECT
                id,
                employee_id,
                attendance_date,
                check_in,
                check_out,
                status,
                late_minutes,
                overtime_hours,
                created_at
            FROM
                attendance_records
            WHERE
                id = ?
        "#))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::remote_read)?;

        Ok(record)
    }

    async fn insert(&self, record: NewAttendanceRecord) -> Result<AttendanceRecord, AppError> {
        let record = sqlx::query_as::<_, AttendanceRecord>(&sql(r#"
            INSERT INTO
                attendance_records (
                    employee_id,
                    attendance_date,
                    check_in,
                    check_out,
                    status,
                    late_minutes,
                    overtime_hours
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?)
            RETURNING
                id,
                employee_id,
                attendance_date,
                check_in,
                check_out,
                status,
                late_minutes,
                overtime_hours,
                created_at
        "#))
        .bind(record.employee_id)
        .bind(record.attendance_date)
        .bind(record.check_in)
        .bind(record.check_out)
        .bind(record.status)
        .bind(record.late_minutes)
        .bind(record.overtime_hours)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::remote_write)?;

        Ok(record)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: AttendancePatch,
    ) -> Result<Option<AttendanceRecord>, AppError> {
        let record = sqlx::query_as::<_, AttendanceRecord>(&sql(r#"
            UPDATE attendance_records
            SET
                check_in = COALESCE(?, check_in),
                check_out = COALESCE(?, check_out),
                status = COALESCE(?, status),
                late_minutes = COALESCE(?, late_minutes),
                overtime_hours = COALESCE(?, overtime_hours)
            WHERE
                id = ?
            RETURNING
                id,
                employee_id,
                attendance_date,
                check_in,
                check_out,
                status,
                late_minutes,
                overtime_hours,
                created_at
        "#))
        .bind(patch.check_in)
        .bind(patch.check_out)
        .bind(patch.status)
        .bind(patch.late_minutes)
        .bind(patch.overtime_hours)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::remote_write)?;

        Ok(record)
    }

    async fn latest(&self, limit: i64) -> Result<Vec<AttendanceWithEmployee>, AppError> {
        let rows = sqlx::query_as::<_, AttendanceWithEmployee>(&sql(r#"
            SELECT
                a.id,
                a.attendance_date,
                a.check_in,
                a.check_out,
                a.status,
                a.late_minutes,
                a.overtime_hours,
                e.full_name AS employee_name,
                e.employee_id AS employee_code
            FROM
                attendance_records a
                JOIN employees e ON e.id = a.employee_id
            ORDER BY
                a.attendance_date DESC
            LIMIT
                ?
        "#))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::remote_read)?;

        Ok(rows)
    }
}
