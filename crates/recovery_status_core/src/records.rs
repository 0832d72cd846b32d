use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A row of the recovery job table as the store returns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRow {
    pub granule_id: String,
    pub job_id: String,
    pub restore_destination: String,
    pub request_time: DateTime<Utc>,
    pub completion_time: Option<DateTime<Utc>>,
}

/// A recovery file row joined with its status label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    pub file_name: String,
    pub status: String,
    pub error_message: Option<String>,
}

/// Read access to recovery job and file records.
///
/// Implementations report their own failures through `anyhow`; callers in this
/// crate translate them into [`crate::StatusError::Database`] so no
/// store-specific error type crosses the boundary.
#[async_trait]
pub trait RecoveryRecords: Send + Sync {
    /// Job id with the latest `request_time` for the granule. Ties follow store order.
    async fn most_recent_job_id(&self, granule_id: &str) -> anyhow::Result<Option<String>>;

    async fn job(&self, granule_id: &str, job_id: &str) -> anyhow::Result<Option<JobRow>>;

    /// File rows for the job, most recently updated first.
    async fn files(&self, granule_id: &str, job_id: &str) -> anyhow::Result<Vec<FileRow>>;
}
