mod app;

pub use app::{build_router, AppState, REQUEST_ID_HEADER};
