use serde::Serialize;

use crate::{
    db::{PollutionReport, ReportStatus},
    stats::{aggregate, PollutionStats},
};

/// In-memory side of the report store. Only `ReportController` mutates it;
/// everything else sees a `ReportSnapshot`.
#[derive(Debug, Clone, Default)]
pub struct ReportState {
    /// Most recent creation first.
    pub reports: Vec<PollutionReport>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub notification_message: Option<String>,
}

impl ReportState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_all(&mut self, reports: Vec<PollutionReport>) {
        self.reports = reports;
    }

    /// Local inserts go to the head to match server ordering without a refetch.
    pub fn prepend(&mut self, report: PollutionReport) {
        self.reports.insert(0, report);
    }

    /// Returns `false` when no local record has `report_id`.
    pub fn apply_status(&mut self, report_id: &str, status: ReportStatus) -> bool {
        match self.reports.iter().position(|report| report.id == report_id) {
            Some(index) => {
                self.reports[index] = self.reports[index].with_status(status);
                true
            }
            None => false,
        }
    }

    /// Removes every record with `report_id`, keeping the rest in order.
    pub fn remove(&mut self, report_id: &str) -> usize {
        let before = self.reports.len();
        self.reports.retain(|report| report.id != report_id);
        before - self.reports.len()
    }

    pub fn clear(&mut self) {
        self.reports.clear();
    }

    pub fn begin_operation(&mut self) {
        self.is_loading = true;
        self.error_message = None;
    }

    pub fn end_operation(&mut self) {
        self.is_loading = false;
    }

    pub fn snapshot(&self) -> ReportSnapshot {
        ReportSnapshot {
            stats: aggregate(&self.reports),
            reports: self.reports.clone(),
            is_loading: self.is_loading,
            error_message: self.error_message.clone(),
            notification_message: self.notification_message.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSnapshot {
    pub reports: Vec<PollutionReport>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub notification_message: Option<String>,
    pub stats: PollutionStats,
}
