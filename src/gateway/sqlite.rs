use anyhow::Result;
use async_trait::async_trait;

use super::ReportGateway;
use crate::db::{Database, NewReport, PollutionReport, ReportStatus};

#[async_trait]
impl ReportGateway for Database {
    async fn fetch_all(&self) -> Result<Vec<PollutionReport>> {
        self.list_reports().await
    }

    async fn create(&self, report: NewReport, photo: Option<String>) -> Result<PollutionReport> {
        self.insert_report(report, photo).await
    }

    async fn update_status(&self, report_id: &str, status: ReportStatus) -> Result<()> {
        self.update_report_status(report_id, status).await
    }

    async fn delete(&self, report_id: &str) -> Result<()> {
        self.delete_report(report_id).await
    }
}
