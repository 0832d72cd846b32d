use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum StatusError {
    #[error("{field} must be set to a non-empty value.")]
    InvalidArgument { field: &'static str },

    #[error("{0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(String),
}

impl StatusError {
    pub fn job_not_found(granule_id: &str, job_id: Option<&str>) -> Self {
        match job_id {
            Some(job_id) => StatusError::NotFound(format!(
                "no recovery job {job_id} found for granule {granule_id}"
            )),
            None => StatusError::NotFound(format!(
                "no recovery job found for granule {granule_id}"
            )),
        }
    }

    /// Translates a store failure and logs it. The only place store errors are logged.
    pub(crate) fn database(operation: &'static str, granule_id: &str, err: anyhow::Error) -> Self {
        let detail = format!("{err:#}");
        error!(operation, granule_id = %granule_id, error = %detail, "recovery store query failed");
        StatusError::Database(detail)
    }
}
