use async_trait::async_trait;
use bigdecimal::BigDecimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::PayrollStore;
use crate::database::{
    models::{
        NewPayrollPeriod, PayrollPeriod, PayrollSlip, PeriodPatch, SlipFilter, SlipSummary,
    },
    utils::sql,
};
use crate::error::AppError;

#[derive(Clone)]
pub struct PgPayrollRepository {
    pool: PgPool,
}

impl PgPayrollRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PayrollStore for PgPayrollRepository {
    async fn list_periods(&self) -> Result<Vec<PayrollPeriod>, AppError> {
        let periods = sqlx::query_as::<_, PayrollPeriod>(&sql(r#"
            SELECT
                id,
                period_name,
                period_start,
                period_end,
                payment_date,
                status,
                created_by,
                created_at
            FROM
                payroll_periods
            ORDER BY
                period_start DESC
        "#))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::remote_read)?;

        Ok(periods)
    }

    async fn find_period(&self, id: Uuid) -> Result<Option<PayrollPeriod>, AppError> {
        let period = sqlx::query_as::<_, PayrollPeriod>(&sql(r#"
            SELECT
                id,
                period_name,
                period_start,
                period_end,
                payment_date,
                status,
                created_by,
                created_at
            FROM
                payroll_periods
            WHERE
                id = ?
        "#))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::remote_read)?;

        Ok(period)
    }

    async fn insert_period(&self, period: NewPayrollPeriod) -> Result<PayrollPeriod, AppError> {
        let period = sqlx::query_as::<_, PayrollPeriod>(&sql(r#"
            INSERT INTO
                payroll_periods (
                    period_name,
                    period_start,
                    period_end,
                    payment_date,
                    status,
                    created_by
                )
            VALUES
                (?, ?, ?, ?, ?, ?)
            RETURNING
                id,
                period_name,
                period_start,
                period_end,
                payment_date,
                status,
                created_by,
                created_at
        "#))
        .bind(period.period_name)
        .bind(period.period_start)
        .bind(period.period_end)
        .bind(period.payment_date)
        .bind(period.status)
        .bind(period.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::remote_write)?;

        Ok(period)
    }

    async fn update_period(
        &self,
        id: Uuid,
        patch: PeriodPatch,
    ) -> Result<Option<PayrollPeriod>, AppError> {
        let period = sqlx::query_as::<_, PayrollPeriod>(&sql(r#"
            UPDATE payroll_periods
            SET
                period_name = COALESCE(?, period_name),
                payment_date = COALESCE(?, payment_date),
                status = COALESCE(?, status)
            WHERE
                id = ?
            RETURNING
                id,
                period_name,
                period_start,
                period_end,
                payment_date,
                status,
                created_by,
                created_at
        "#))
        .bind(patch.period_name)
        .bind(patch.payment_date)
        .bind(patch.status.map(|s| s.as_str()))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::remote_write)?;

        Ok(period)
    }

    async fn list_slips(&self, filter: &SlipFilter) -> Result<Vec<PayrollSlip>, AppError> {
        let status = filter.status.map(|s| s.as_str());

        let slips = sqlx::query_as::<_, PayrollSlip>(&sql(r#"
            SELECT
                id,
                employee_id,
                period_id,
                net_salary,
                status,
                created_at
            FROM
                payroll_slips
            WHERE
                (?::TEXT IS NULL OR status = ?)
                AND (?::UUID IS NULL OR period_id = ?)
            ORDER BY
                created_at DESC
        "#))
        .bind(status)
        .bind(status)
        .bind(filter.period_id)
        .bind(filter.period_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::remote_read)?;

        Ok(slips)
    }

    async fn count_slips(&self, filter: &SlipFilter) -> Result<i64, AppError> {
        let status = filter.status.map(|s| s.as_str());

        let count: i64 = sqlx::query_scalar(&sql(r#"
            SELECT
                COUNT(*)
            FROM
                payroll_slips
            WHERE
                (?::TEXT IS NULL OR status = ?)
                AND (?::UUID IS NULL OR period_id = ?)
        "#))
        .bind(status)
        .bind(status)
        .bind(filter.period_id)
        .bind(filter.period_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::remote_read)?;

        Ok(count)
    }

    async fn total_net_salary(&self) -> Result<BigDecimal, AppError> {
        let total: BigDecimal = sqlx::query_scalar(&sql(r#"
            SELECT
                COALESCE(SUM(net_salary), 0)::NUMERIC
            FROM
                payroll_slips
        "#))
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::remote_read)?;

        Ok(total)
    }

    async fn latest_slips(&self, limit: i64) -> Result<Vec<SlipSummary>, AppError> {
        let slips = sqlx::query_as::<_, SlipSummary>(&sql(r#"
            SELECT
                s.id,
                s.net_salary,
                s.status,
                e.full_name AS employee_name,
                p.period_name,
                s.created_at
            FROM
                payroll_slips s
                JOIN employees e ON e.id = s.employee_id
                JOIN payroll_periods p ON p.id = s.period_id
            ORDER BY
                s.created_at DESC
            LIMIT
                ?
        "#))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::remote_read)?;

        Ok(slips)
    }

    async fn calculate_payroll(&self, period_id: Uuid) -> Result<(), AppError> {
        log::info!("Invoking calculate_payroll for period {}", period_id);

        sqlx::query(&sql("SELECT calculate_payroll(p_period_id => ?)"))
            .bind(period_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::remote_procedure)?;

        Ok(())
    }
}
