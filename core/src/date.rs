//! Creation-date normalisation.
//!
//! Spreadsheet serial numbers count days from 1899-12-30, so serial 1 is
//! 1899-12-31 and serial 2 is 1900-01-01. The offset absorbs the 1900
//! leap-year bug inherited from the spreadsheet format. The fractional part
//! of a serial is a time of day and never moves the date.

use crate::{table::Cell, types::MonthLabel};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};

/// Serials beyond this many days are treated as garbage, not dates.
const MAX_SERIAL_DAYS: f64 = 2_958_465.0; // 9999-12-31

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%Y年%m月%d日",
    "%m/%d/%Y",
    "%m.%d.%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%d %b %Y",
];

/// Dates without a day; the first of the month is assumed.
const YEAR_MONTH_FORMATS: &[&str] = &["%Y-%m", "%Y/%m", "%Y年%m月"];

pub fn serial_epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)
}

/// Convert a spreadsheet serial day number to a calendar date.
pub fn from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial.abs() > MAX_SERIAL_DAYS {
        return None;
    }
    let days = serial.floor() as i64;
    serial_epoch()?.checked_add_signed(Duration::days(days))
}

/// Best-effort textual date parsing. Unparseable text yields `None`.
pub fn parse_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    // A bare four-digit number is a year, anything else numeric a serial.
    if text.len() == 4 && text.bytes().all(|b| b.is_ascii_digit()) {
        return text.parse().ok().and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1));
    }
    if let Ok(serial) = text.parse::<f64>() {
        return from_serial(serial);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
    {
        return Some(date);
    }
    let with_day = format!("{text} 1");
    YEAR_MONTH_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&with_day, &format!("{fmt} %d")).ok())
}

/// Date held in a spreadsheet or CSV cell.
pub fn from_cell(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Number(n) => from_serial(*n),
        Cell::Text(s) => parse_text(s),
        Cell::Empty | Cell::Bool(_) => None,
    }
}

pub fn month_label(date: Option<NaiveDate>) -> Option<MonthLabel> {
    date.map(|d| format!("{:04}-{:02}", d.year(), d.month()))
}
