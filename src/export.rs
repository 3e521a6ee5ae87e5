//! CSV export of the in-memory report list.
//!
//! Only the description column is quoted, always, with embedded quotes
//! doubled. Writing the blob somewhere is the caller's business.

use std::fmt::Write as _;

use crate::{db::PollutionReport, i18n::Language};

const PHOTO_PREVIEW_CHARS: usize = 20;
const NO_PHOTO: &str = "N/A";

pub fn export_csv(reports: &[PollutionReport], language: Language) -> String {
    let mut out = String::new();
    out.push_str(language.csv_header());
    out.push('\n');

    for report in reports {
        let photo = report
            .photo
            .as_deref()
            .map(|photo| photo.chars().take(PHOTO_PREVIEW_CHARS).collect::<String>())
            .unwrap_or_else(|| NO_PHOTO.to_string());

        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "{},{},{},{},{:?},{:?},{}",
            report.id,
            language.category_name(report.category),
            language.status_name(report.status),
            quote(&report.description),
            report.location.latitude,
            report.location.longitude,
            photo,
        );
    }

    out
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
