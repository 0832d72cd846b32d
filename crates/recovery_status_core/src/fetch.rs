use recovery_status_contract::{FileStatus, FileSummary, RecoveryJob};

use crate::error::StatusError;
use crate::records::{FileRow, JobRow, RecoveryRecords};

pub async fn fetch_job(
    records: &dyn RecoveryRecords,
    granule_id: &str,
    job_id: &str,
) -> Result<RecoveryJob, StatusError> {
    let row = records
        .job(granule_id, job_id)
        .await
        .map_err(|err| StatusError::database("fetch_job", granule_id, err))?
        .ok_or_else(|| StatusError::job_not_found(granule_id, Some(job_id)))?;

    Ok(project_job(row))
}

/// File summaries for the job, most recently updated first. A job without
/// file rows yields an empty list.
pub async fn fetch_files(
    records: &dyn RecoveryRecords,
    granule_id: &str,
    job_id: &str,
) -> Result<Vec<FileSummary>, StatusError> {
    let rows = records
        .files(granule_id, job_id)
        .await
        .map_err(|err| StatusError::database("fetch_files", granule_id, err))?;

    rows.into_iter()
        .map(|row| {
            project_file(row)
                .map_err(|err| StatusError::database("fetch_files", granule_id, err))
        })
        .collect()
}

fn project_job(row: JobRow) -> RecoveryJob {
    RecoveryJob {
        granule_id: row.granule_id,
        async_operation_id: row.job_id,
        restore_destination: row.restore_destination,
        request_time: row.request_time,
        completion_time: row.completion_time,
    }
}

fn project_file(row: FileRow) -> anyhow::Result<FileSummary> {
    let status: FileStatus = row.status.parse()?;
    Ok(FileSummary {
        file_name: row.file_name,
        status,
        error_message: row.error_message,
    })
}

#[cfg(test)]
mod tests {
    use super::{fetch_files, fetch_job};
    use crate::error::StatusError;
    use crate::memory::InMemoryRecoveryRecords;
    use crate::records::{FileRow, JobRow};
    use chrono::{TimeZone, Utc};
    use recovery_status_contract::FileStatus;

    fn job_row(completion: bool) -> JobRow {
        JobRow {
            granule_id: "G1".to_string(),
            job_id: "J1".to_string(),
            restore_destination: "glacier-bucket".to_string(),
            request_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            completion_time: completion.then(|| Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap()),
        }
    }

    fn file_row(name: &str, status: &str, error_message: Option<&str>) -> FileRow {
        FileRow {
            file_name: name.to_string(),
            status: status.to_string(),
            error_message: error_message.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn job_id_is_exposed_as_async_operation_id() {
        let records = InMemoryRecoveryRecords::new().with_job(job_row(true));

        let job = fetch_job(&records, "G1", "J1").await.expect("fetch");
        assert_eq!(job.async_operation_id, "J1");
        assert_eq!(job.restore_destination, "glacier-bucket");
        assert!(job.completion_time.is_some());
    }

    #[tokio::test]
    async fn missing_job_pair_is_not_found() {
        let records = InMemoryRecoveryRecords::new().with_job(job_row(false));

        let err = fetch_job(&records, "G1", "J2").await.unwrap_err();
        assert!(matches!(err, StatusError::NotFound(_)));
    }

    #[tokio::test]
    async fn files_are_newest_first_and_keep_absent_errors_absent() {
        let records = InMemoryRecoveryRecords::new()
            .with_job(job_row(false))
            .with_file(
                "G1",
                "J1",
                Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap(),
                file_row("a.txt", "success", None),
            )
            .with_file(
                "G1",
                "J1",
                Utc.with_ymd_and_hms(2024, 1, 1, 2, 0, 0).unwrap(),
                file_row("b.txt", "failed", Some("timeout")),
            )
            .with_file(
                "G1",
                "J2",
                Utc.with_ymd_and_hms(2024, 1, 1, 3, 0, 0).unwrap(),
                file_row("c.txt", "pending", None),
            );

        let files = fetch_files(&records, "G1", "J1").await.expect("fetch");
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].file_name, "b.txt");
        assert_eq!(files[0].status, FileStatus::Failed);
        assert_eq!(files[0].error_message.as_deref(), Some("timeout"));
        assert_eq!(files[1].file_name, "a.txt");
        assert_eq!(files[1].error_message, None);
    }

    #[tokio::test]
    async fn job_without_files_yields_empty_list() {
        let records = InMemoryRecoveryRecords::new().with_job(job_row(false));

        let files = fetch_files(&records, "G1", "J1").await.expect("fetch");
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn unknown_status_label_is_database_error() {
        let records = InMemoryRecoveryRecords::new().with_file(
            "G1",
            "J1",
            Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap(),
            file_row("a.txt", "staged", None),
        );

        let err = fetch_files(&records, "G1", "J1").await.unwrap_err();
        match err {
            StatusError::Database(detail) => assert!(detail.contains("staged")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
