//! Granule restoration status resolution.
//!
//! [`StatusAssembler`] answers "what is the restoration status of granule G,
//! optionally for job J" by resolving the job id, reading the job and its files
//! through a [`RecoveryRecords`] implementation and projecting them into a
//! [`recovery_status_contract::StatusReport`].

pub mod assembler;
pub mod error;
pub mod fetch;
pub mod memory;
pub mod records;
pub mod resolver;

pub use assembler::StatusAssembler;
pub use error::StatusError;
pub use fetch::{fetch_files, fetch_job};
pub use memory::InMemoryRecoveryRecords;
pub use records::{FileRow, JobRow, RecoveryRecords};
pub use resolver::resolve_most_recent_job;
