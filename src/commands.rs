//! Command surface for presentation layers. Every command takes the session's
//! `AppState` and reports failures as display strings.

use crate::{
    db::{PollutionReport, ReportStatus},
    export::export_csv,
    notifications::NEW_REPORTS_TOPIC,
    reports::{ReportDraft, ReportSnapshot},
    session::SessionIdentity,
    settings::UserSettings,
    stats::PollutionStats,
    AppState,
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

fn require_admin(state: &AppState) -> Result<(), String> {
    if state.session.is_admin() {
        Ok(())
    } else {
        Err("admin privileges required".to_string())
    }
}

pub async fn login(
    state: &AppState,
    email: String,
    password: String,
) -> Result<SessionIdentity, String> {
    state
        .reports
        .track("Sign-in failed", state.session.sign_in(&email, &password))
        .await
        .map_err(|e| format!("Sign-in failed: {e}"))
}

pub async fn register(
    state: &AppState,
    email: String,
    password: String,
) -> Result<SessionIdentity, String> {
    state
        .reports
        .track("Registration failed", state.session.sign_up(&email, &password))
        .await
        .map_err(|e| format!("Registration failed: {e}"))
}

pub async fn logout(state: &AppState) -> Result<(), String> {
    state.session.sign_out().await.map_err(|e| e.to_string())
}

pub fn get_session(state: &AppState) -> Option<SessionIdentity> {
    state.session.current()
}

pub async fn fetch_reports(state: &AppState) -> Result<ReportSnapshot, String> {
    state.reports.fetch_all().await.map_err(|e| e.to_string())?;
    Ok(state.reports.snapshot().await)
}

pub async fn get_reports_snapshot(state: &AppState) -> ReportSnapshot {
    state.reports.snapshot().await
}

pub async fn get_stats(state: &AppState) -> PollutionStats {
    state.reports.stats().await
}

pub async fn add_report(
    state: &AppState,
    draft: ReportDraft,
    photo: Option<Vec<u8>>,
) -> Result<PollutionReport, String> {
    let reporter = state.session.reporter_id();
    let stored = state
        .reports
        .submit(draft, &reporter, photo)
        .await
        .map_err(|e| e.to_string())?;

    if state.settings.is_volunteer() {
        let message = state
            .settings
            .language()
            .new_report_notification(stored.category);
        state.reports.set_notification(message).await;
    }

    Ok(stored)
}

pub async fn update_report_status(
    state: &AppState,
    report_id: String,
    status: ReportStatus,
) -> Result<(), String> {
    require_admin(state)?;
    state
        .reports
        .update_status(&report_id, status)
        .await
        .map(|_| ())
        .map_err(|e| e.to_string())
}

pub async fn delete_report(state: &AppState, report_id: String) -> Result<(), String> {
    require_admin(state)?;
    state
        .reports
        .delete(&report_id)
        .await
        .map(|_| ())
        .map_err(|e| e.to_string())
}

pub async fn export_reports_csv(state: &AppState) -> String {
    let reports = state.reports.reports().await;
    export_csv(&reports, state.settings.language())
}

pub fn get_settings(state: &AppState) -> UserSettings {
    state.settings.get()
}

/// Flip the volunteer opt-in and follow it with a topic (un)subscription.
/// A failed subscription is logged; the preference change stands.
pub async fn toggle_volunteer(state: &AppState) -> Result<bool, String> {
    let is_volunteer = state
        .settings
        .toggle_volunteer()
        .map_err(|e| e.to_string())?;

    let result = if is_volunteer {
        state.topics.subscribe(NEW_REPORTS_TOPIC).await
    } else {
        state.topics.unsubscribe(NEW_REPORTS_TOPIC).await
    };
    match result {
        Ok(()) => log_info!("volunteer opt-in now {is_volunteer}"),
        Err(err) => log_warn!("topic subscription change failed: {err:#}"),
    }

    Ok(is_volunteer)
}

pub fn change_language(state: &AppState, language_code: String) -> Result<(), String> {
    state
        .settings
        .set_language(&language_code)
        .map_err(|e| e.to_string())
}

pub async fn dismiss_notification(state: &AppState) {
    state.reports.clear_notification().await;
}

pub async fn dismiss_error(state: &AppState) {
    state.reports.clear_error().await;
}
