use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::EmployeeStore;
use crate::database::{
    models::{Employee, EmployeeFilter, EmployeePatch, NewEmployee},
    utils::{escape_like, sql},
};
use crate::error::AppError;

#[derive(Clone)]
pub struct PgEmployeeRepository {
    pool: PgPool,
}

impl PgEmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn search_pattern(filter: &EmployeeFilter) -> Option<String> {
    filter
        .search
        .as_deref()
        .map(|term| format!("%{}%", escape_like(term)))
}

#[async_trait]
impl EmployeeStore for PgEmployeeRepository {
    async fn list(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>, AppError> {
        let status = filter.status.map(|s| s.as_str());
        let pattern = search_pattern(filter);

        let employees = sqlx::query_as::<_, Employee>(&sql(r#"
            SELECT
                id,
                employee_id,
                full_name,
                email,
                phone,
                department,
                position,
                join_date,
                status,
                created_at
            FROM
                employees
            WHERE
                (?::TEXT IS NULL OR status = ?)
                AND (
                    ?::TEXT IS NULL
                    OR full_name ILIKE ?
                    OR employee_id ILIKE ?
                )
            ORDER BY
                employee_id
        "#))
        .bind(status)
        .bind(status)
        .bind(pattern.as_deref())
        .bind(pattern.as_deref())
        .bind(pattern.as_deref())
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::remote_read)?;

        Ok(employees)
    }

    async fn count(&self, filter: &EmployeeFilter) -> Result<i64, AppError> {
        let status = filter.status.map(|s| s.as_str());
        let pattern = search_pattern(filter);

        let count: i64 = sqlx::query_scalar(&sql(r#"
            SELECT
                COUNT(*)
            FROM
                employees
            WHERE
                (?::TEXT IS NULL OR status = ?)
                AND (
                    ?::TEXT IS NULL
                    OR full_name ILIKE ?
                    OR employee_id ILIKE ?
                )
        "#))
        .bind(status)
        .bind(status)
        .bind(pattern.as_deref())
        .bind(pattern.as_deref())
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::remote_read)?;

        Ok(count)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>(&sql(r#"
            SELECT
                id,
                employee_id,
                full_name,
                email,
                phone,
                department,
                position,
                join_date,
                status,
                created_at
            FROM
                employees
            WHERE
                id = ?
        "#))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::remote_read)?;

        Ok(employee)
    }

    async fn find_by_code(&self, employee_id: &str) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>(&sql(r#"
            SELECT
                id,
                employee_id,
                full_name,
                email,
                phone,
                department,
                position,
                join_date,
                status,
                created_at
            FROM
                employees
            WHERE
                employee_id = ?
        "#))
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::remote_read)?;

        Ok(employee)
    }

    async fn insert(&self, employee: NewEmployee) -> Result<Employee, AppError> {
        let employee = sqlx::query_as::<_, Employee>(&sql(r#"
            INSERT INTO
                employees (
                    employee_id,
                    full_name,
                    email,
                    phone,
                    department,
                    position,
                    join_date,
                    status
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, 'active')
            RETURNING
                id,
                employee_id,
                full_name,
                email,
                phone,
                department,
                position,
                join_date,
                status,
                created_at
        "#))
        .bind(employee.employee_id)
        .bind(employee.full_name)
        .bind(employee.email)
        .bind(employee.phone)
        .bind(employee.department)
        .bind(employee.position)
        .bind(employee.join_date)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::remote_write)?;

        Ok(employee)
    }

    async fn update(&self, id: Uuid, patch: EmployeePatch) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>(&sql(r#"
            UPDATE employees
            SET
                full_name = COALESCE(?, full_name),
                email = COALESCE(?, email),
                phone = COALESCE(?, phone),
                department = COALESCE(?, department),
                position = COALESCE(?, position),
                join_date = COALESCE(?, join_date),
                status = COALESCE(?, status)
            WHERE
                id = ?
            RETURNING
                id,
                employee_id,
                full_name,
                email,
                phone,
                department,
                position,
                join_date,
                status,
                created_at
        "#))
        .bind(patch.full_name)
        .bind(patch.email)
        .bind(patch.phone)
        .bind(patch.department)
        .bind(patch.position)
        .bind(patch.join_date)
        .bind(patch.status.map(|s| s.as_str()))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::remote_write)?;

        Ok(employee)
    }
}
