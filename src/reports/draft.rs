use serde::{Deserialize, Serialize};

use super::StoreError;
use crate::db::{GeoPoint, NewReport, ReportCategory};

/// Add-form state before the user submits.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportDraft {
    pub location: Option<GeoPoint>,
    pub category: ReportCategory,
    pub description: String,
}

impl ReportDraft {
    pub fn at(location: GeoPoint) -> Self {
        Self {
            location: Some(location),
            ..Self::default()
        }
    }

    pub fn into_new_report(self, reported_by: impl Into<String>) -> Result<NewReport, StoreError> {
        let location = self.location.ok_or_else(|| {
            StoreError::LocalInputInvalid("a location must be selected".into())
        })?;
        if !location.is_valid() {
            return Err(StoreError::LocalInputInvalid(format!(
                "location ({}, {}) is out of range",
                location.latitude, location.longitude
            )));
        }

        Ok(NewReport {
            location,
            category: self.category,
            description: self.description,
            reported_by: reported_by.into(),
        })
    }
}
