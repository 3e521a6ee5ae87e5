//! Pollution report data models.
//!
//! `NewReport` is what a presentation surface submits; `PollutionReport` is
//! what comes back once the remote collection has assigned an id and a
//! creation timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reporter marker used when nobody is signed in.
pub const ANONYMOUS_REPORTER: &str = "anonymous";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportCategory {
    Trash,
    OilSpot,
    IndustrialWaste,
    Other,
}

impl ReportCategory {
    pub const ALL: [ReportCategory; 4] = [
        ReportCategory::Trash,
        ReportCategory::OilSpot,
        ReportCategory::IndustrialWaste,
        ReportCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportCategory::Trash => "TRASH",
            ReportCategory::OilSpot => "OIL_SPOT",
            ReportCategory::IndustrialWaste => "INDUSTRIAL_WASTE",
            ReportCategory::Other => "OTHER",
        }
    }
}

impl Default for ReportCategory {
    fn default() -> Self {
        ReportCategory::Trash
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    Detected,
    InProgress,
    Cleared,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 3] = [
        ReportStatus::Detected,
        ReportStatus::InProgress,
        ReportStatus::Cleared,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Detected => "DETECTED",
            ReportStatus::InProgress => "IN_PROGRESS",
            ReportStatus::Cleared => "CLEARED",
        }
    }
}

impl Default for ReportStatus {
    fn default() -> Self {
        ReportStatus::Detected
    }
}

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A report that has not been persisted yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    pub location: GeoPoint,
    pub category: ReportCategory,
    pub description: String,
    pub reported_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PollutionReport {
    pub id: String,
    pub location: GeoPoint,
    pub category: ReportCategory,
    pub status: ReportStatus,
    pub description: String,
    /// Base64 JPEG payload.
    pub photo: Option<String>,
    pub reported_by: String,
    pub created_at: DateTime<Utc>,
}

impl PollutionReport {
    /// Builds the stored record for `report` once the remote side has issued
    /// `id` and `created_at`. New reports always start out `Detected`.
    pub fn from_new(
        id: String,
        report: NewReport,
        photo: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            location: report.location,
            category: report.category,
            status: ReportStatus::Detected,
            description: report.description,
            photo,
            reported_by: report.reported_by,
            created_at,
        }
    }

    pub fn with_status(&self, status: ReportStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}
