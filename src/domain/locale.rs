//! Italian UI strings shared by the board, the timeline and the roadmap.

use super::enums::Status;
use chrono::{Datelike, NaiveDate};

const MONTH_ABBR: [&str; 12] = [
    "gen", "feb", "mar", "apr", "mag", "giu", "lug", "ago", "set", "ott", "nov", "dic",
];

/// Column label shown to the user (also matched by search)
pub fn status_label(status: Status) -> &'static str {
    match status {
        Status::Todo => "Da fare",
        Status::InProgress => "In corso",
        Status::Pending => "Pending",
        Status::Done => "Completato",
    }
}

/// Abbreviated month name, e.g. "gen" for January
pub fn month_abbr(date: NaiveDate) -> &'static str {
    MONTH_ABBR[date.month0() as usize]
}

/// Month cell label, e.g. "gen 2024"
pub fn month_label(date: NaiveDate) -> String {
    format!("{} {}", month_abbr(date), date.year())
}

/// Day label, e.g. "05 gen 2024"
pub fn day_label(date: NaiveDate) -> String {
    format!("{:02} {} {}", date.day(), month_abbr(date), date.year())
}
