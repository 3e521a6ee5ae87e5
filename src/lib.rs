pub mod commands;
pub mod config;
pub mod db;
pub mod export;
pub mod gateway;
pub mod i18n;
pub mod notifications;
pub mod reports;
pub mod session;
pub mod settings;
pub mod stats;
mod utils;

use std::sync::Arc;

use anyhow::{Context, Result};
use config::AppConfig;
use db::Database;
use gateway::{MemoryGateway, ReportGateway};
use log::{info, warn};
use notifications::{LoggingTopicSubscriber, TopicSubscriber};
use reports::{PhotoEncoder, ReportController};
use session::{
    spawn_identity_listener, AdminPolicy, AllowListAdminPolicy, AuthProvider, LocalAuthProvider,
    SessionGate,
};
use settings::SettingsStore;
use tokio::task::JoinHandle;

/// Collaborators an `AppState` is assembled from.
pub struct AppParts {
    pub gateway: Arc<dyn ReportGateway>,
    pub auth: Arc<dyn AuthProvider>,
    pub admin_policy: Arc<dyn AdminPolicy>,
    pub settings: SettingsStore,
    pub topics: Arc<dyn TopicSubscriber>,
    pub photos: PhotoEncoder,
}

/// Everything one active session owns. Presentation surfaces hold a reference
/// to this and go through `commands`.
pub struct AppState {
    pub(crate) reports: ReportController,
    pub(crate) session: SessionGate,
    pub(crate) settings: SettingsStore,
    pub(crate) topics: Arc<dyn TopicSubscriber>,
    listener: JoinHandle<()>,
}

impl AppState {
    /// Must be called from within a Tokio runtime.
    pub fn from_parts(parts: AppParts) -> Self {
        let reports = ReportController::new(parts.gateway, parts.photos);
        let session = SessionGate::new(parts.auth, parts.admin_policy);
        let listener =
            spawn_identity_listener(session.subscribe(), reports.clone(), reports.child_token());

        Self {
            reports,
            session,
            settings: parts.settings,
            topics: parts.topics,
            listener,
        }
    }

    pub fn open(config: &AppConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir).with_context(|| {
            format!("failed to create data directory {}", config.data_dir.display())
        })?;

        let database = Database::new(config.db_path())?;
        let settings = SettingsStore::new(config.settings_path())?;

        let gateway: Arc<dyn ReportGateway> = if config.demo_mode {
            info!("Demo mode: serving seeded in-memory reports");
            Arc::new(MemoryGateway::with_demo_reports())
        } else {
            Arc::new(database.clone())
        };

        Ok(Self::from_parts(AppParts {
            gateway,
            auth: Arc::new(LocalAuthProvider::new(database)),
            admin_policy: Arc::new(AllowListAdminPolicy::new(&config.admin_emails)),
            settings,
            topics: Arc::new(LoggingTopicSubscriber),
            photos: PhotoEncoder::new(config.photo_max_edge, config.photo_jpeg_quality),
        }))
    }

    pub fn reports(&self) -> &ReportController {
        &self.reports
    }

    pub fn session(&self) -> &SessionGate {
        &self.session
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Cancel in-flight remote calls and wait for the identity listener.
    pub async fn shutdown(self) {
        self.reports.shutdown();
        if let Err(err) = self.listener.await {
            warn!("identity listener failed to join: {err}");
        }
    }
}

pub fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    info!("CleanSea starting up...");

    let config = AppConfig::from_env()?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build Tokio runtime")?;

    runtime.block_on(async move {
        let state = AppState::open(&config)?;

        if let Err(err) = commands::fetch_reports(&state).await {
            warn!("Initial fetch failed: {err}");
        }

        let stats = commands::get_stats(&state).await;
        println!("{}", serde_json::to_string_pretty(&stats)?);

        if let Some(path) = &config.export_path {
            let csv = commands::export_reports_csv(&state).await;
            std::fs::write(path, csv)
                .with_context(|| format!("failed to write CSV export to {}", path.display()))?;
            info!("Exported {} reports to {}", stats.total_points, path.display());
        }

        state.shutdown().await;
        Ok::<(), anyhow::Error>(())
    })
}
