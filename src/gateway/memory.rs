use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex, MutexGuard, PoisonError,
    },
    time::Duration,
};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use uuid::Uuid;

use super::ReportGateway;
use crate::db::{
    GeoPoint, NewReport, PollutionReport, ReportCategory, ReportStatus, ANONYMOUS_REPORTER,
};

/// In-process stand-in for the hosted collection. Used for demo mode and
/// tests; `set_available(false)` makes every call fail like a dropped
/// connection.
pub struct MemoryGateway {
    /// Newest first.
    reports: Mutex<Vec<PollutionReport>>,
    available: AtomicBool,
    latency: Duration,
    calls: AtomicUsize,
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self {
            reports: Mutex::new(Vec::new()),
            available: AtomicBool::new(true),
            latency: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Every call sleeps for `latency` before touching the collection.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_reports(self, reports: Vec<PollutionReport>) -> Self {
        *self.lock() = reports;
        self
    }

    /// A handful of reports along the Caspian shore near Aktau.
    pub fn with_demo_reports() -> Self {
        let now = Utc::now();
        let demo = [
            (
                43.6481,
                51.1722,
                ReportCategory::Trash,
                ReportStatus::Detected,
                "Plastic bottles along the waterline",
            ),
            (
                43.6102,
                51.2110,
                ReportCategory::OilSpot,
                ReportStatus::InProgress,
                "Dark sheen near the old pier",
            ),
            (
                43.5733,
                51.2496,
                ReportCategory::IndustrialWaste,
                ReportStatus::Detected,
                "Rusted drums washed ashore",
            ),
            (43.6890, 51.1398, ReportCategory::Other, ReportStatus::Cleared, ""),
        ];

        let reports = demo
            .into_iter()
            .enumerate()
            .map(|(index, (lat, lon, category, status, description))| PollutionReport {
                id: Uuid::new_v4().to_string(),
                location: GeoPoint::new(lat, lon),
                category,
                status,
                description: description.to_string(),
                photo: None,
                reported_by: ANONYMOUS_REPORTER.to_string(),
                created_at: now - ChronoDuration::hours(index as i64 * 6),
            })
            .collect();

        Self::new().with_reports(reports)
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of gateway calls issued so far, including failed ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> Vec<PollutionReport> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PollutionReport>> {
        self.reports.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn begin_call(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if !self.available.load(Ordering::SeqCst) {
            bail!("report collection unreachable");
        }
        Ok(())
    }
}

#[async_trait]
impl ReportGateway for MemoryGateway {
    async fn fetch_all(&self) -> Result<Vec<PollutionReport>> {
        self.begin_call().await?;
        let mut reports = self.lock().clone();
        // Stable sort keeps insertion order (newest first) for equal timestamps.
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reports)
    }

    async fn create(&self, report: NewReport, photo: Option<String>) -> Result<PollutionReport> {
        self.begin_call().await?;
        let stored =
            PollutionReport::from_new(Uuid::new_v4().to_string(), report, photo, Utc::now());
        self.lock().insert(0, stored.clone());
        Ok(stored)
    }

    async fn update_status(&self, report_id: &str, status: ReportStatus) -> Result<()> {
        self.begin_call().await?;
        let mut reports = self.lock();
        let report = reports
            .iter_mut()
            .find(|report| report.id == report_id)
            .ok_or_else(|| anyhow!("report {report_id} not found"))?;
        report.status = status;
        Ok(())
    }

    async fn delete(&self, report_id: &str) -> Result<()> {
        self.begin_call().await?;
        self.lock().retain(|report| report.id != report_id);
        Ok(())
    }
}
