use crate::error::StatusError;
use crate::records::RecoveryRecords;

/// Job id of the most recently requested job for `granule_id`.
///
/// `granule_id` is expected to be validated by the caller.
pub async fn resolve_most_recent_job(
    records: &dyn RecoveryRecords,
    granule_id: &str,
) -> Result<String, StatusError> {
    let job_id = records
        .most_recent_job_id(granule_id)
        .await
        .map_err(|err| StatusError::database("resolve_most_recent_job", granule_id, err))?;

    job_id.ok_or_else(|| StatusError::job_not_found(granule_id, None))
}

#[cfg(test)]
mod tests {
    use super::resolve_most_recent_job;
    use crate::error::StatusError;
    use crate::memory::InMemoryRecoveryRecords;
    use crate::records::JobRow;
    use chrono::{TimeZone, Utc};

    fn job(granule_id: &str, job_id: &str, day: u32) -> JobRow {
        JobRow {
            granule_id: granule_id.to_string(),
            job_id: job_id.to_string(),
            restore_destination: "glacier-bucket".to_string(),
            request_time: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            completion_time: None,
        }
    }

    #[tokio::test]
    async fn picks_latest_request_time() {
        let records = InMemoryRecoveryRecords::new()
            .with_job(job("G1", "J-old", 1))
            .with_job(job("G1", "J-new", 9))
            .with_job(job("G1", "J-mid", 5))
            .with_job(job("G2", "J-other", 20));

        let job_id = resolve_most_recent_job(&records, "G1").await.expect("resolve");
        assert_eq!(job_id, "J-new");
        assert_eq!(records.query_count(), 1);
    }

    #[tokio::test]
    async fn unknown_granule_is_not_found() {
        let records = InMemoryRecoveryRecords::new().with_job(job("G2", "J1", 1));

        let err = resolve_most_recent_job(&records, "G1").await.unwrap_err();
        assert!(matches!(err, StatusError::NotFound(_)));
    }

    #[tokio::test]
    async fn store_failure_becomes_database_error() {
        let records = InMemoryRecoveryRecords::failing("connection reset");

        let err = resolve_most_recent_job(&records, "G1").await.unwrap_err();
        match err {
            StatusError::Database(detail) => assert!(detail.contains("connection reset")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
