pub mod account;
pub mod report;

pub use account::Account;
pub use report::{
    GeoPoint, NewReport, PollutionReport, ReportCategory, ReportStatus, ANONYMOUS_REPORTER,
};
