use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use std::time::Duration;
use tracing::info;

use crate::config::is_identifier;

/// Opens the pool and pins every connection's `search_path` to `schema`.
pub async fn connect(
    database_url: &str,
    schema: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    if !is_identifier(schema) {
        return Err(sqlx::Error::Configuration(
            format!("invalid schema name: {schema}").into(),
        ));
    }
    let schema = schema.to_string();

    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .after_connect(move |conn, _meta| {
            let sql = format!("SET search_path TO {schema}, public");
            Box::pin(async move {
                conn.execute(sql.as_str()).await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await
}

/// Creates the schema, tables and index if absent. Never drops or alters.
pub async fn bootstrap(pool: &PgPool, schema: &str) -> Result<(), sqlx::Error> {
    let statements = [
        format!("CREATE SCHEMA IF NOT EXISTS {schema}"),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {schema}.employees (
                employee_id TEXT PRIMARY KEY,
                first_name TEXT,
                last_name TEXT,
                email TEXT,
                department TEXT,
                job_title TEXT,
                status TEXT,
                hire_date DATE,
                created_at TIMESTAMPTZ
            )
            "#
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {schema}.attendance_log (
                log_id BIGSERIAL PRIMARY KEY,
                employee_id TEXT NOT NULL REFERENCES {schema}.employees(employee_id)
                    ON UPDATE CASCADE ON DELETE RESTRICT,
                date DATE NOT NULL,
                check_in_time TIMESTAMPTZ,
                check_out_time TIMESTAMPTZ,
                status TEXT,
                notes TEXT,
                CONSTRAINT attendance_unique_per_day UNIQUE (employee_id, date)
            )
            "#
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS idx_attendance_employee_date \
             ON {schema}.attendance_log (employee_id, date)"
        ),
    ];

    let mut tx = pool.begin().await?;
    for sql in &statements {
        (&mut *tx).execute(sql.as_str()).await?;
    }
    tx.commit().await?;

    info!(schema, "Schema bootstrap complete");
    Ok(())
}

/// Server clock, used by the health check.
pub async fn server_time(pool: &PgPool) -> Result<DateTime<Utc>, sqlx::Error> {
    sqlx::query_scalar::<_, DateTime<Utc>>("SELECT now() AS server_time")
        .fetch_one(pool)
        .await
}
