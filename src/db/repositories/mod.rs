mod accounts;
mod reports;
