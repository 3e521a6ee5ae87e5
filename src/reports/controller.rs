use std::{fmt::Display, future::Future, sync::Arc};

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use super::{PhotoEncoder, ReportDraft, ReportSnapshot, ReportState, StoreError};
use crate::{
    db::{NewReport, PollutionReport, ReportStatus},
    gateway::ReportGateway,
    stats::PollutionStats,
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

/// Coordinator for the report list: performs the remote call, and only when
/// it succeeds applies the result to local state.
///
/// Mutating operations run one at a time behind `writer`, so a fetch that
/// overlaps an add can no longer overwrite the add's local insert with a
/// stale list. Reads (`snapshot`) never wait on a remote call.
#[derive(Clone)]
pub struct ReportController {
    state: Arc<Mutex<ReportState>>,
    writer: Arc<Mutex<()>>,
    gateway: Arc<dyn ReportGateway>,
    photos: PhotoEncoder,
    cancel_token: CancellationToken,
}

impl ReportController {
    pub fn new(gateway: Arc<dyn ReportGateway>, photos: PhotoEncoder) -> Self {
        Self {
            state: Arc::new(Mutex::new(ReportState::new())),
            writer: Arc::new(Mutex::new(())),
            gateway,
            photos,
            cancel_token: CancellationToken::new(),
        }
    }

    pub async fn snapshot(&self) -> ReportSnapshot {
        self.state.lock().await.snapshot()
    }

    pub async fn reports(&self) -> Vec<PollutionReport> {
        self.state.lock().await.reports.clone()
    }

    pub async fn stats(&self) -> PollutionStats {
        self.state.lock().await.snapshot().stats
    }

    /// Replace the local list with the remote collection.
    pub async fn fetch_all(&self) -> Result<usize, StoreError> {
        let _writer = self.writer.lock().await;
        self.ensure_running()?;
        self.run("Failed to load reports", self.gateway.fetch_all(), |state, reports| {
            let count = reports.len();
            state.replace_all(reports);
            log_info!("Loaded {count} reports");
            count
        })
        .await
    }

    /// Validate a draft and submit it. An invalid draft never reaches the
    /// gateway.
    pub async fn submit(
        &self,
        draft: ReportDraft,
        reported_by: &str,
        photo: Option<Vec<u8>>,
    ) -> Result<PollutionReport, StoreError> {
        match draft.into_new_report(reported_by) {
            Ok(report) => self.add(report, photo).await,
            Err(err) => {
                self.state.lock().await.error_message =
                    Some(format!("Failed to add report: {err}"));
                Err(err)
            }
        }
    }

    /// Persist a new report and put it at the head of the local list.
    ///
    /// A photo that cannot be encoded is dropped and the report goes out
    /// without one.
    pub async fn add(
        &self,
        report: NewReport,
        photo: Option<Vec<u8>>,
    ) -> Result<PollutionReport, StoreError> {
        let _writer = self.writer.lock().await;
        self.ensure_running()?;
        self.state.lock().await.begin_operation();

        let photo = match photo {
            Some(bytes) => self.encode_photo(bytes).await,
            None => None,
        };

        self.run_started(
            "Failed to add report",
            self.gateway.create(report, photo),
            |state, stored: PollutionReport| {
                log_info!("Added report {} ({})", stored.id, stored.category.as_str());
                state.prepend(stored.clone());
                stored
            },
        )
        .await
    }

    /// Remote partial update of `status`, then the matching local record is
    /// replaced. Returns whether a local record matched.
    pub async fn update_status(
        &self,
        report_id: &str,
        status: ReportStatus,
    ) -> Result<bool, StoreError> {
        let _writer = self.writer.lock().await;
        self.ensure_running()?;
        self.run(
            "Failed to update status",
            self.gateway.update_status(report_id, status),
            |state, ()| {
                let found = state.apply_status(report_id, status);
                if !found {
                    log_warn!("Status of {report_id} updated remotely but not present locally");
                }
                found
            },
        )
        .await
    }

    /// Remote delete, then every local record with `report_id` is dropped.
    pub async fn delete(&self, report_id: &str) -> Result<usize, StoreError> {
        let _writer = self.writer.lock().await;
        self.ensure_running()?;
        self.run("Failed to delete report", self.gateway.delete(report_id), |state, ()| {
            let removed = state.remove(report_id);
            log_info!("Deleted report {report_id} ({removed} local records)");
            removed
        })
        .await
    }

    /// Drop every local record. Used when the principal signs out.
    pub async fn clear(&self) {
        let _writer = self.writer.lock().await;
        self.state.lock().await.clear();
    }

    pub async fn set_notification(&self, message: String) {
        self.state.lock().await.notification_message = Some(message);
    }

    pub async fn clear_notification(&self) {
        self.state.lock().await.notification_message = None;
    }

    pub async fn clear_error(&self) {
        self.state.lock().await.error_message = None;
    }

    /// Run an operation that does not touch the list under the shared
    /// loading flag. A failure lands in the error signal as `{context}: {err}`.
    pub async fn track<T, E: Display>(
        &self,
        context: &str,
        operation: impl Future<Output = Result<T, E>>,
    ) -> Result<T, E> {
        self.state.lock().await.begin_operation();
        let result = operation.await;

        let mut state = self.state.lock().await;
        state.end_operation();
        if let Err(err) = &result {
            log_warn!("{context}: {err}");
            state.error_message = Some(format!("{context}: {err}"));
        }
        result
    }

    /// Token that is cancelled when this controller shuts down.
    pub fn child_token(&self) -> CancellationToken {
        self.cancel_token.child_token()
    }

    /// Cancel in-flight remote calls. Later operations fail with
    /// `StoreError::Cancelled` before reaching the gateway.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    fn ensure_running(&self) -> Result<(), StoreError> {
        if self.cancel_token.is_cancelled() {
            Err(StoreError::Cancelled)
        } else {
            Ok(())
        }
    }

    async fn run<T, R>(
        &self,
        context: &str,
        call: impl Future<Output = anyhow::Result<T>>,
        apply: impl FnOnce(&mut ReportState, T) -> R,
    ) -> Result<R, StoreError> {
        self.state.lock().await.begin_operation();
        self.run_started(context, call, apply).await
    }

    /// Await `call` (racing cancellation) and apply its result. Expects
    /// `begin_operation` to have been called already.
    async fn run_started<T, R>(
        &self,
        context: &str,
        call: impl Future<Output = anyhow::Result<T>>,
        apply: impl FnOnce(&mut ReportState, T) -> R,
    ) -> Result<R, StoreError> {
        let result = tokio::select! {
            biased;
            _ = self.cancel_token.cancelled() => Err(StoreError::Cancelled),
            result = call => result.map_err(StoreError::remote),
        };

        let mut state = self.state.lock().await;
        state.end_operation();
        match result {
            Ok(value) => Ok(apply(&mut *state, value)),
            Err(StoreError::Cancelled) => {
                log_info!("{context}: cancelled");
                Err(StoreError::Cancelled)
            }
            Err(err) => {
                log_error!("{context}: {err}");
                state.error_message = Some(format!("{context}: {err}"));
                Err(err)
            }
        }
    }

    async fn encode_photo(&self, bytes: Vec<u8>) -> Option<String> {
        let encoder = self.photos;
        match tokio::task::spawn_blocking(move || encoder.encode(&bytes)).await {
            Ok(Ok(encoded)) => Some(encoded),
            Ok(Err(err)) => {
                log_warn!("Dropping photo that could not be encoded: {err:#}");
                None
            }
            Err(join_err) => {
                log_warn!("Photo encoding task failed: {join_err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{io::Cursor, time::Duration};

    use super::*;
    use crate::{
        db::{Database, GeoPoint, ReportCategory, ANONYMOUS_REPORTER},
        gateway::MemoryGateway,
    };

    fn controller(gateway: MemoryGateway) -> (Arc<MemoryGateway>, ReportController) {
        let gateway = Arc::new(gateway);
        let controller = ReportController::new(gateway.clone(), PhotoEncoder::default());
        (gateway, controller)
    }

    fn new_report(category: ReportCategory) -> NewReport {
        NewReport {
            location: GeoPoint::new(43.65, 51.17),
            category,
            description: "washed up".into(),
            reported_by: ANONYMOUS_REPORTER.into(),
        }
    }

    fn png() -> Vec<u8> {
        let image = image::DynamicImage::ImageRgb8(image::RgbImage::new(8, 8));
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[tokio::test]
    async fn fetch_all_replaces_list() {
        let (gateway, controller) = controller(MemoryGateway::with_demo_reports());
        assert_eq!(controller.fetch_all().await.unwrap(), 4);

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.reports, gateway.fetch_all().await.unwrap());
        assert_eq!(snapshot.stats.total_points, 4);
        assert!(!snapshot.is_loading);
        assert!(snapshot.error_message.is_none());
    }

    #[tokio::test]
    async fn failed_fetch_keeps_last_known_good_list() {
        let (gateway, controller) = controller(MemoryGateway::with_demo_reports());
        controller.fetch_all().await.unwrap();
        let before = controller.reports().await;

        gateway.set_available(false);
        let err = controller.fetch_all().await.unwrap_err();
        assert!(matches!(err, StoreError::RemoteUnavailable(_)));

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.reports, before);
        assert!(!snapshot.is_loading);
        assert!(snapshot
            .error_message
            .unwrap()
            .starts_with("Failed to load reports:"));
    }

    #[tokio::test]
    async fn successful_adds_prepend_with_ids() {
        let (_gateway, controller) = controller(MemoryGateway::new());
        let mut added = Vec::new();
        for category in ReportCategory::ALL {
            added.push(controller.add(new_report(category), None).await.unwrap());
        }

        let reports = controller.reports().await;
        assert_eq!(reports.len(), added.len());
        assert!(reports.iter().all(|report| !report.id.is_empty()));
        assert_eq!(reports[0], added[added.len() - 1]);
        assert!(reports
            .iter()
            .all(|report| report.status == ReportStatus::Detected));
    }

    #[tokio::test]
    async fn failed_add_leaves_list_untouched() {
        let (gateway, controller) = controller(MemoryGateway::new());
        controller
            .add(new_report(ReportCategory::Trash), None)
            .await
            .unwrap();
        gateway.set_available(false);

        assert!(controller
            .add(new_report(ReportCategory::Other), None)
            .await
            .is_err());
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.reports.len(), 1);
        assert!(snapshot
            .error_message
            .unwrap()
            .starts_with("Failed to add report:"));
    }

    #[tokio::test]
    async fn photos_are_encoded_and_bad_photos_dropped() {
        let (_gateway, controller) = controller(MemoryGateway::new());

        let with_photo = controller
            .add(new_report(ReportCategory::Trash), Some(png()))
            .await
            .unwrap();
        assert!(with_photo.photo.is_some());

        let without_photo = controller
            .add(new_report(ReportCategory::Trash), Some(b"corrupt".to_vec()))
            .await
            .unwrap();
        assert!(without_photo.photo.is_none());
        assert_eq!(controller.reports().await.len(), 2);
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_gateway() {
        let (gateway, controller) = controller(MemoryGateway::new());
        let err = controller
            .submit(ReportDraft::default(), ANONYMOUS_REPORTER, None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::LocalInputInvalid(_)));
        assert_eq!(gateway.calls(), 0);
        assert!(controller.snapshot().await.error_message.is_some());

        let draft = ReportDraft::at(GeoPoint::new(43.6, 51.2));
        let stored = controller.submit(draft, "uid-1", None).await.unwrap();
        assert_eq!(stored.reported_by, "uid-1");
    }

    #[tokio::test]
    async fn update_status_applies_after_remote_success() {
        let (gateway, controller) = controller(MemoryGateway::with_demo_reports());
        controller.fetch_all().await.unwrap();
        let before = controller.reports().await;
        let target = before[1].id.clone();

        assert!(controller
            .update_status(&target, ReportStatus::Cleared)
            .await
            .unwrap());
        assert!(controller
            .update_status(&target, ReportStatus::Cleared)
            .await
            .unwrap());

        let after = controller.reports().await;
        assert_eq!(after.len(), before.len());
        for (old, new) in before.iter().zip(&after) {
            if old.id == target {
                assert_eq!(new, &old.with_status(ReportStatus::Cleared));
            } else {
                assert_eq!(new, old);
            }
        }
        let remote = gateway.stored();
        let remote_target = remote.iter().find(|r| r.id == target).unwrap();
        assert_eq!(remote_target.status, ReportStatus::Cleared);
    }

    #[tokio::test]
    async fn update_status_for_unfetched_record_is_local_no_op() {
        let (gateway, controller) = controller(MemoryGateway::with_demo_reports());
        let remote_id = gateway.stored()[0].id.clone();

        let found = controller
            .update_status(&remote_id, ReportStatus::InProgress)
            .await
            .unwrap();
        assert!(!found);
        assert!(controller.reports().await.is_empty());
        assert_eq!(gateway.stored()[0].status, ReportStatus::InProgress);
    }

    #[tokio::test]
    async fn failed_update_keeps_local_status() {
        let (gateway, controller) = controller(MemoryGateway::with_demo_reports());
        controller.fetch_all().await.unwrap();
        let before = controller.reports().await;

        gateway.set_available(false);
        assert!(controller
            .update_status(&before[0].id, ReportStatus::Cleared)
            .await
            .is_err());
        assert_eq!(controller.reports().await, before);
    }

    #[tokio::test]
    async fn delete_removes_matching_record() {
        let (_gateway, controller) = controller(MemoryGateway::with_demo_reports());
        controller.fetch_all().await.unwrap();
        let before = controller.reports().await;

        assert_eq!(controller.delete(&before[0].id).await.unwrap(), 1);
        assert_eq!(controller.reports().await, before[1..].to_vec());
        assert_eq!(controller.stats().await.total_points, before.len() - 1);
    }

    #[tokio::test]
    async fn overlapping_add_and_fetch_do_not_lose_the_add() {
        let gateway = MemoryGateway::new().with_latency(Duration::from_millis(20));
        let (gateway, controller) = controller(gateway);

        let (added, fetched) = tokio::join!(
            controller.add(new_report(ReportCategory::OilSpot), None),
            controller.fetch_all(),
        );
        let added = added.unwrap();
        fetched.unwrap();

        let reports = controller.reports().await;
        assert_eq!(reports, gateway.stored());
        assert_eq!(reports, vec![added]);
    }

    #[tokio::test]
    async fn shutdown_cancels_in_flight_call() {
        let gateway = MemoryGateway::with_demo_reports().with_latency(Duration::from_secs(30));
        let (_gateway, controller) = controller(gateway);

        let pending = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.fetch_all().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        controller.shutdown();

        let result = tokio::time::timeout(Duration::from_secs(5), pending)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result, Err(StoreError::Cancelled));

        let snapshot = controller.snapshot().await;
        assert!(snapshot.reports.is_empty());
        assert!(!snapshot.is_loading);
        assert!(snapshot.error_message.is_none());
        assert!(controller.is_shut_down());
    }

    #[tokio::test]
    async fn operations_after_shutdown_never_reach_gateway() {
        let (gateway, controller) = controller(MemoryGateway::with_demo_reports());
        controller.fetch_all().await.unwrap();
        let remote_before = gateway.stored();
        let local_before = controller.reports().await;
        let calls_before = gateway.calls();
        controller.shutdown();

        for _ in 0..50 {
            assert_eq!(
                controller.add(new_report(ReportCategory::Trash), None).await,
                Err(StoreError::Cancelled)
            );
        }
        assert_eq!(
            controller
                .update_status(&local_before[0].id, ReportStatus::Cleared)
                .await,
            Err(StoreError::Cancelled)
        );
        assert_eq!(
            controller.delete(&local_before[1].id).await,
            Err(StoreError::Cancelled)
        );
        assert_eq!(controller.fetch_all().await, Err(StoreError::Cancelled));

        assert_eq!(gateway.calls(), calls_before);
        assert_eq!(gateway.stored(), remote_before);
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.reports, local_before);
        assert!(!snapshot.is_loading);
    }

    #[tokio::test]
    async fn adds_after_shutdown_commit_nothing_to_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("cancel.sqlite3")).unwrap();
        let controller = ReportController::new(Arc::new(db.clone()), PhotoEncoder::default());
        controller.shutdown();

        for _ in 0..50 {
            assert_eq!(
                controller.add(new_report(ReportCategory::Other), None).await,
                Err(StoreError::Cancelled)
            );
        }

        assert!(db.list_reports().await.unwrap().is_empty());
        assert!(controller.reports().await.is_empty());
    }

    #[tokio::test]
    async fn notification_and_error_signals_reset() {
        let (gateway, controller) = controller(MemoryGateway::new());
        controller.set_notification("New report: Trash".into()).await;
        gateway.set_available(false);
        let _ = controller.fetch_all().await;

        let snapshot = controller.snapshot().await;
        assert!(snapshot.notification_message.is_some());
        assert!(snapshot.error_message.is_some());

        controller.clear_notification().await;
        controller.clear_error().await;
        let snapshot = controller.snapshot().await;
        assert!(snapshot.notification_message.is_none());
        assert!(snapshot.error_message.is_none());
    }

    #[tokio::test]
    async fn clear_empties_list() {
        let (_gateway, controller) = controller(MemoryGateway::with_demo_reports());
        controller.fetch_all().await.unwrap();
        controller.clear().await;
        assert!(controller.reports().await.is_empty());
    }
}
