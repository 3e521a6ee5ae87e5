//! Report store: the in-memory report list and the operations that keep it
//! in step with the remote collection.

pub mod controller;
mod draft;
mod error;
pub mod photo;
pub mod state;

pub use controller::ReportController;
pub use draft::ReportDraft;
pub use error::StoreError;
pub use photo::PhotoEncoder;
pub use state::{ReportSnapshot, ReportState};
