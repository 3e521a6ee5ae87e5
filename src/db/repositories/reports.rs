use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::{
    helpers::{format_datetime, parse_category, parse_datetime, parse_status},
    models::{GeoPoint, NewReport, PollutionReport, ReportStatus},
    Database,
};

fn row_to_report(row: &Row) -> Result<PollutionReport> {
    let category: String = row.get("category")?;
    let status: String = row.get("status")?;
    let created_at: String = row.get("created_at")?;

    Ok(PollutionReport {
        id: row.get("id")?,
        location: GeoPoint {
            latitude: row.get("latitude")?,
            longitude: row.get("longitude")?,
        },
        category: parse_category(&category)?,
        status: parse_status(&status)?,
        description: row.get("description")?,
        photo: row.get("photo")?,
        reported_by: row.get("reported_by")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    /// Insert a report, assigning its id and creation timestamp.
    pub async fn insert_report(
        &self,
        report: NewReport,
        photo: Option<String>,
    ) -> Result<PollutionReport> {
        self.execute(move |conn| {
            let id = Uuid::new_v4().to_string();
            let created_at = format_datetime(Utc::now());

            conn.execute(
                "INSERT INTO reports (id, latitude, longitude, category, status, description, photo, reported_by, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    id,
                    report.location.latitude,
                    report.location.longitude,
                    report.category.as_str(),
                    ReportStatus::Detected.as_str(),
                    report.description,
                    photo,
                    report.reported_by,
                    created_at,
                ],
            )
            .with_context(|| "failed to insert report")?;

            let created_at = parse_datetime(&created_at, "created_at")?;
            Ok(PollutionReport::from_new(id, report, photo, created_at))
        })
        .await
    }

    /// All reports, most recent first.
    pub async fn list_reports(&self) -> Result<Vec<PollutionReport>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, latitude, longitude, category, status, description, photo, reported_by, created_at
                 FROM reports
                 ORDER BY created_at DESC, rowid DESC",
            )?;

            let mut rows = stmt.query([])?;
            let mut reports = Vec::new();
            while let Some(row) = rows.next()? {
                reports.push(row_to_report(row)?);
            }

            Ok(reports)
        })
        .await
    }

    /// Update only the status column. Fails if the report does not exist.
    pub async fn update_report_status(&self, report_id: &str, status: ReportStatus) -> Result<()> {
        let report_id = report_id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn
                .execute(
                    "UPDATE reports SET status = ?1 WHERE id = ?2",
                    params![status.as_str(), report_id],
                )
                .with_context(|| "failed to update report status")?;

            if rows_affected == 0 {
                return Err(anyhow!("report {report_id} not found"));
            }
            Ok(())
        })
        .await
    }

    /// Hard delete. Deleting a missing id is not an error.
    pub async fn delete_report(&self, report_id: &str) -> Result<()> {
        let report_id = report_id.to_string();
        self.execute(move |conn| {
            conn.execute("DELETE FROM reports WHERE id = ?1", params![report_id])
                .with_context(|| "failed to delete report")?;
            Ok(())
        })
        .await
    }
}
