//! Input loading — spreadsheet or CSV bytes into typed records.
//!
//! Workbooks (xlsx, xlsb, xls, ods) are recognised by their container magic
//! and read with calamine; the first worksheet's first row is the header.
//! Anything else is read as UTF-8 CSV with a header row.
//!
//! Both loaders check every required column before reading a single row.

use crate::{
    columns,
    date,
    error::{BonusError, BonusResult},
    lead::LeadRecord,
    roster::EmployeeRecord,
    table::{cell_at, Cell, RawTable},
};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;
use std::path::Path;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];
const UTF8_BOM: &str = "\u{feff}";

/// One uploaded input: a display name and its raw bytes.
#[derive(Debug, Clone)]
pub struct InputSource {
    pub name:  String,
    pub bytes: Vec<u8>,
}

impl InputSource {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), bytes }
    }

    pub fn from_path(path: impl AsRef<Path>) -> BonusResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }

    pub fn is_workbook(&self) -> bool {
        self.bytes.starts_with(ZIP_MAGIC) || self.bytes.starts_with(OLE_MAGIC)
    }
}

/// Lead records plus how many non-empty dates could not be read.
#[derive(Debug, Clone, Default)]
pub struct LeadLoad {
    pub leads: Vec<LeadRecord>,
    pub unparseable_dates: usize,
}

pub fn read_table(source: &InputSource) -> BonusResult<RawTable> {
    let table = if source.is_workbook() {
        read_workbook(source)?
    } else {
        read_csv(source)?
    };
    log::debug!(
        "Read '{}': {} columns, {} rows",
        source.name,
        table.headers.len(),
        table.row_count()
    );
    Ok(table)
}

fn read_workbook(source: &InputSource) -> BonusResult<RawTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(source.bytes.clone()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| BonusError::EmptyWorkbook {
            source_name: source.name.clone(),
        })??;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|d| header_text(&cell_from_data(d)))
            .collect(),
        None => return Ok(RawTable::default()),
    };
    let rows = rows
        .map(|row| row.iter().map(cell_from_data).collect::<Vec<_>>())
        .filter(|row| !row.iter().all(Cell::is_empty))
        .collect();

    Ok(RawTable::new(headers, rows))
}

fn read_csv(source: &InputSource) -> BonusResult<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source.bytes.as_slice());

    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches(UTF8_BOM).trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Vec<Cell> = record
            .iter()
            .map(|field| {
                if field.trim().is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(field.to_string())
                }
            })
            .collect();
        if !row.iter().all(Cell::is_empty) {
            rows.push(row);
        }
    }

    Ok(RawTable::new(headers, rows))
}

/// Map a calamine cell onto the loader's cell model. Date-formatted cells
/// keep their serial value so they go through the same epoch conversion
/// as plain numbers.
pub fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        _ => Cell::Empty,
    }
}

fn header_text(cell: &Cell) -> String {
    cell.as_text().map(|s| s.trim().to_string()).unwrap_or_default()
}

fn check_columns(table: &RawTable, table_name: &str, required: &[&str]) -> BonusResult<()> {
    for column in required {
        table.require_column(table_name, column)?;
    }
    Ok(())
}

pub fn load_leads(table: &RawTable) -> BonusResult<LeadLoad> {
    check_columns(table, columns::LEAD_TABLE, &columns::REQUIRED_LEAD_COLUMNS)?;
    let notes_col = table.require_column(columns::LEAD_TABLE, columns::NOTES)?;
    let name_col = table.require_column(columns::LEAD_TABLE, columns::LEAD_NAME)?;
    let status_col = table.require_column(columns::LEAD_TABLE, columns::LEAD_STATUS)?;
    let created_col = table.require_column(columns::LEAD_TABLE, columns::LEADS_CREATED_ON)?;

    let mut load = LeadLoad {
        leads: Vec::with_capacity(table.row_count()),
        unparseable_dates: 0,
    };

    for row in &table.rows {
        let created_cell = cell_at(row, created_col);
        let created_on = date::from_cell(created_cell);
        if created_on.is_none() && !created_cell.is_empty() {
            load.unparseable_dates += 1;
        }
        load.leads.push(LeadRecord::new(
            cell_at(row, notes_col).as_text(),
            cell_at(row, name_col).as_text(),
            cell_at(row, status_col).as_text(),
            created_on,
        ));
    }

    if load.unparseable_dates > 0 {
        log::warn!(
            "{} lead creation dates could not be parsed; their month bucket is empty",
            load.unparseable_dates
        );
    }
    Ok(load)
}

pub fn load_roster(table: &RawTable) -> BonusResult<Vec<EmployeeRecord>> {
    check_columns(table, columns::ROSTER_TABLE, &columns::REQUIRED_ROSTER_COLUMNS)?;
    let col = |name: &str| table.require_column(columns::ROSTER_TABLE, name);
    let name_col = col(columns::NAME_EN)?;
    let title_col = col(columns::JOB_TITLE)?;
    let email_col = col(columns::EMAIL_ADDRESS)?;
    let manager_col = col(columns::MANAGER)?;
    let region8_col = col(columns::REGION8)?;
    let subregion_col = col(columns::SUBREGION29)?;

    Ok(table
        .rows
        .iter()
        .map(|row| EmployeeRecord {
            name_en:       cell_at(row, name_col).as_text(),
            job_title:     cell_at(row, title_col).as_text(),
            email_address: cell_at(row, email_col).as_text(),
            manager:       cell_at(row, manager_col).as_text(),
            region8:       cell_at(row, region8_col).as_text(),
            subregion29:   cell_at(row, subregion_col).as_text(),
        })
        .collect())
}
