use std::sync::Arc;

use recovery_status_contract::StatusReport;
use tracing::info;

use crate::error::StatusError;
use crate::fetch::{fetch_files, fetch_job};
use crate::records::RecoveryRecords;
use crate::resolver::resolve_most_recent_job;

#[derive(Clone)]
pub struct StatusAssembler {
    records: Arc<dyn RecoveryRecords>,
}

impl StatusAssembler {
    pub fn new(records: Arc<dyn RecoveryRecords>) -> Self {
        Self { records }
    }

    /// Restoration status of `granule_id` for `job_id`, or for the granule's most
    /// recently requested job when `job_id` is absent or empty.
    ///
    /// Reads run one after another and the first failure aborts the request.
    pub async fn get_status(
        &self,
        granule_id: Option<&str>,
        job_id: Option<&str>,
    ) -> Result<StatusReport, StatusError> {
        let granule_id = match granule_id {
            Some(id) if !id.is_empty() => id,
            _ => return Err(StatusError::InvalidArgument { field: "granule_id" }),
        };

        let records = self.records.as_ref();
        let job_id = match job_id.filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => resolve_most_recent_job(records, granule_id).await?,
        };

        let job = fetch_job(records, granule_id, &job_id).await?;
        let files = fetch_files(records, granule_id, &job.async_operation_id).await?;

        info!(
            granule_id = %granule_id,
            job_id = %job.async_operation_id,
            files = files.len(),
            "granule status assembled"
        );
        Ok(StatusReport::new(job, files))
    }
}
