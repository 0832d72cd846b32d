use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recovery_status_core::{FileRow, JobRow, RecoveryRecords};
use serde::Deserialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::info;

const SCHEMA_SQL: &str = include_str!("sql/schema.sql");

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Create the recovery tables when they do not exist yet.
    #[serde(default)]
    pub create_schema: bool,
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Clone)]
pub struct RecoveryStorage {
    pool: SqlitePool,
}

impl RecoveryStorage {
    pub async fn connect(config: &StorageConfig) -> Result<Self> {
        let uri = normalize_sqlite_uri(&config.database_url);
        let options = SqliteConnectOptions::from_str(&uri)
            .with_context(|| format!("invalid sqlite URI: {}", uri))?
            .create_if_missing(config.create_schema);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .context("failed to connect sqlite pool")?;

        let storage = Self { pool };
        if config.create_schema {
            storage.migrate().await?;
        }
        Ok(storage)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<()> {
        for statement in SCHEMA_SQL.split(';') {
            let sql = statement.trim();
            if sql.is_empty() {
                continue;
            }
            sqlx::query(sql)
                .execute(&self.pool)
                .await
                .with_context(|| format!("migration failed for statement: {sql}"))?;
        }
        info!("recovery status schema ready");
        Ok(())
    }
}

#[async_trait]
impl RecoveryRecords for RecoveryStorage {
    async fn most_recent_job_id(&self, granule_id: &str) -> Result<Option<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT job_id FROM orca_recoveryjob WHERE granule_id = ? ORDER BY julianday(request_time) DESC LIMIT 1",
        )
        .bind(granule_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("query most recent job for granule {granule_id}"))
    }

    async fn job(&self, granule_id: &str, job_id: &str) -> Result<Option<JobRow>> {
        let row = sqlx::query(
            "SELECT granule_id, job_id, restore_destination, request_time, completion_time FROM orca_recoveryjob WHERE granule_id = ? AND job_id = ?",
        )
        .bind(granule_id)
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("query job {job_id} for granule {granule_id}"))?;

        row.as_ref().map(map_job_row).transpose()
    }

    async fn files(&self, granule_id: &str, job_id: &str) -> Result<Vec<FileRow>> {
        let rows = sqlx::query(
            "SELECT orca_recoverfile.filename AS file_name, orca_status.value AS status, orca_recoverfile.error_message AS error_message \
             FROM orca_recoverfile JOIN orca_status ON orca_recoverfile.status_id = orca_status.id \
             WHERE orca_recoverfile.granule_id = ? AND orca_recoverfile.job_id = ? \
             ORDER BY julianday(orca_recoverfile.last_update) DESC",
        )
        .bind(granule_id)
        .bind(job_id)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("query files of job {job_id} for granule {granule_id}"))?;

        rows.iter().map(map_file_row).collect()
    }
}

fn map_job_row(row: &SqliteRow) -> Result<JobRow> {
    let request_time: DateTime<Utc> = row.try_get("request_time").context("read request_time")?;
    let completion_time: Option<DateTime<Utc>> =
        row.try_get("completion_time").context("read completion_time")?;

    Ok(JobRow {
        granule_id: row.try_get("granule_id").context("read granule_id")?,
        job_id: row.try_get("job_id").context("read job_id")?,
        restore_destination: row
            .try_get("restore_destination")
            .context("read restore_destination")?,
        request_time,
        completion_time,
    })
}

fn map_file_row(row: &SqliteRow) -> Result<FileRow> {
    Ok(FileRow {
        file_name: row.try_get("file_name").context("read file_name")?,
        status: row.try_get("status").context("read status")?,
        error_message: row.try_get("error_message").context("read error_message")?,
    })
}

fn normalize_sqlite_uri(raw: &str) -> String {
    if raw.starts_with("sqlite:") {
        raw.to_string()
    } else {
        format!("sqlite://{raw}")
    }
}
