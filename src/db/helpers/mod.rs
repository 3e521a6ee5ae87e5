use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::db::models::{ReportCategory, ReportStatus};

/// Fixed-width RFC 3339 so `ORDER BY created_at` sorts chronologically.
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_category(value: &str) -> Result<ReportCategory> {
    ReportCategory::ALL
        .into_iter()
        .find(|category| category.as_str() == value)
        .ok_or_else(|| anyhow!("unknown report category {value}"))
}

pub fn parse_status(value: &str) -> Result<ReportStatus> {
    ReportStatus::ALL
        .into_iter()
        .find(|status| status.as_str() == value)
        .ok_or_else(|| anyhow!("unknown report status {value}"))
}
