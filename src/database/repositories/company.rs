use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Company, Employee};

#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_active_companies(&self) -> Result<Vec<Company>> {
        let companies = sqlx::query_as::<_, Company>(
            r#"
            SELECT
                id,
                name,
                is_active
            FROM
                companies
            WHERE
                is_active = TRUE
            ORDER BY
                name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(companies)
    }

    /// Active employees of a company that payroll should consider.
    pub async fn list_eligible_employees(&self, company_id: Uuid) -> Result<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT
                id,
                company_id,
                full_name,
                is_active,
                eligible_from
            FROM
                employees
            WHERE
                company_id = $1
                AND is_active = TRUE
            ORDER BY
                full_name
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }
}
