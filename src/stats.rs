//! Derived report statistics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::db::{PollutionReport, ReportCategory, ReportStatus};

/// Snapshot of counts over the current report list. Values with no reports
/// are absent from the maps rather than zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PollutionStats {
    pub total_points: usize,
    pub points_by_status: BTreeMap<ReportStatus, usize>,
    pub points_by_category: BTreeMap<ReportCategory, usize>,
}

impl PollutionStats {
    pub fn status_count(&self, status: ReportStatus) -> usize {
        self.points_by_status.get(&status).copied().unwrap_or(0)
    }

    pub fn category_count(&self, category: ReportCategory) -> usize {
        self.points_by_category.get(&category).copied().unwrap_or(0)
    }
}

pub fn aggregate(reports: &[PollutionReport]) -> PollutionStats {
    let mut stats = PollutionStats {
        total_points: reports.len(),
        ..PollutionStats::default()
    };

    for report in reports {
        *stats.points_by_status.entry(report.status).or_insert(0) += 1;
        *stats.points_by_category.entry(report.category).or_insert(0) += 1;
    }

    stats
}
