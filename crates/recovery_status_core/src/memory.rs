use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::records::{FileRow, JobRow, RecoveryRecords};

#[derive(Debug, Clone)]
struct StoredFile {
    granule_id: String,
    job_id: String,
    last_update: DateTime<Utc>,
    row: FileRow,
}

/// Records held in memory, for tests and local runs without a database.
#[derive(Debug, Default)]
pub struct InMemoryRecoveryRecords {
    jobs: Vec<JobRow>,
    files: Vec<StoredFile>,
    failure: Option<String>,
    queries: AtomicUsize,
}

impl InMemoryRecoveryRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_job(mut self, job: JobRow) -> Self {
        self.jobs.push(job);
        self
    }

    pub fn with_file(
        mut self,
        granule_id: &str,
        job_id: &str,
        last_update: DateTime<Utc>,
        row: FileRow,
    ) -> Self {
        self.files.push(StoredFile {
            granule_id: granule_id.to_string(),
            job_id: job_id.to_string(),
            last_update,
            row,
        });
        self
    }

    /// Every query fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn begin_query(&self, query: &str) -> anyhow::Result<()> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        debug!(query, "in-memory recovery query");
        match &self.failure {
            Some(message) => Err(anyhow!("{message}")),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecoveryRecords for InMemoryRecoveryRecords {
    async fn most_recent_job_id(&self, granule_id: &str) -> anyhow::Result<Option<String>> {
        self.begin_query("most_recent_job_id")?;
        Ok(self
            .jobs
            .iter()
            .filter(|job| job.granule_id == granule_id)
            // ties resolve to the last inserted job, one valid store order
            .max_by_key(|job| job.request_time)
            .map(|job| job.job_id.clone()))
    }

    async fn job(&self, granule_id: &str, job_id: &str) -> anyhow::Result<Option<JobRow>> {
        self.begin_query("job")?;
        Ok(self
            .jobs
            .iter()
            .find(|job| job.granule_id == granule_id && job.job_id == job_id)
            .cloned())
    }

    async fn files(&self, granule_id: &str, job_id: &str) -> anyhow::Result<Vec<FileRow>> {
        self.begin_query("files")?;
        let mut matching: Vec<&StoredFile> = self
            .files
            .iter()
            .filter(|file| file.granule_id == granule_id && file.job_id == job_id)
            .collect();
        matching.sort_by(|a, b| b.last_update.cmp(&a.last_update));
        Ok(matching.into_iter().map(|file| file.row.clone()).collect())
    }
}
