pub mod error;
pub mod report;

pub use error::{ErrorBody, StatusParseError};
pub use report::{
    AsyncOperationId, FileStatus, FileSummary, GranuleId, RecoveryJob, StatusReport,
    StatusRequest,
};
