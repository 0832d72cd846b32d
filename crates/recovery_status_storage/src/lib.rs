mod repository;

pub use repository::{RecoveryStorage, StorageConfig};
