use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StatusParseError;

pub type GranuleId = String;
pub type AsyncOperationId = String;

/// Restoration state of a single file within a recovery job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Pending,
    Success,
    Failed,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Pending => "pending",
            FileStatus::Success => "success",
            FileStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileStatus {
    type Err = StatusParseError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label {
            "pending" => Ok(FileStatus::Pending),
            "success" => Ok(FileStatus::Success),
            "failed" => Ok(FileStatus::Failed),
            other => Err(StatusParseError::UnknownLabel(other.to_string())),
        }
    }
}

/// Job-level view of a recovery request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecoveryJob {
    pub granule_id: GranuleId,
    #[serde(rename = "asyncOperationId")]
    pub async_operation_id: AsyncOperationId,
    pub restore_destination: String,
    pub request_time: DateTime<Utc>,
    /// Unset until every file of the job has left `pending`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileSummary {
    pub file_name: String,
    pub status: FileStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Status of a granule's restoration for one job, files ordered newest-updated first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusReport {
    pub granule_id: GranuleId,
    #[serde(rename = "asyncOperationId")]
    pub async_operation_id: AsyncOperationId,
    pub restore_destination: String,
    pub request_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<DateTime<Utc>>,
    pub files: Vec<FileSummary>,
}

impl StatusReport {
    pub fn new(job: RecoveryJob, files: Vec<FileSummary>) -> Self {
        Self {
            granule_id: job.granule_id,
            async_operation_id: job.async_operation_id,
            restore_destination: job.restore_destination,
            request_time: job.request_time,
            completion_time: job.completion_time,
            files,
        }
    }
}

/// Inbound query. Both fields are optional on the wire so that a missing
/// `granule_id` can be reported as a client error instead of a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusRequest {
    #[serde(default)]
    pub granule_id: Option<GranuleId>,
    #[serde(default, rename = "asyncOperationId")]
    pub async_operation_id: Option<AsyncOperationId>,
}
