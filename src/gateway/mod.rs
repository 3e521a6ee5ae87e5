//! Remote document collection seam.
//!
//! The report store only ever talks to a `ReportGateway`; which backend sits
//! behind it (local SQLite, an in-memory fake, a hosted document database)
//! is decided when `AppState` is assembled.

mod memory;
mod sqlite;

use anyhow::Result;
use async_trait::async_trait;

use crate::db::{NewReport, PollutionReport, ReportStatus};

pub use memory::MemoryGateway;

#[async_trait]
pub trait ReportGateway: Send + Sync {
    /// Every report in the collection, most recent creation first.
    async fn fetch_all(&self) -> Result<Vec<PollutionReport>>;

    /// Persist a new report. The returned record carries the issued id and
    /// creation timestamp.
    async fn create(&self, report: NewReport, photo: Option<String>) -> Result<PollutionReport>;

    /// Partial update of the `status` field only.
    async fn update_status(&self, report_id: &str, status: ReportStatus) -> Result<()>;

    async fn delete(&self, report_id: &str) -> Result<()>;
}
