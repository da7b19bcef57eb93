//! Report export — one CSV per table plus a JSON summary and manifest.
//!
//! Every table file carries its header row even when it has no data rows.
//! Empty optional cells are written as empty fields.

use crate::{
    bonus_stage::BONUS_COLUMNS,
    error::BonusResult,
    region_rank_stage::REGION_RANK_COLUMNS,
    report::BonusReport,
    tag_stage::TAG_AGGREGATE_COLUMNS,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENGINEER_BONUS_FILE: &str = "engineer_bonus.csv";
pub const PLANNER_BONUS_FILE: &str = "planner_bonus.csv";
pub const REGION_RANK_FILE: &str = "region_rank.csv";
pub const TAG_AGGREGATE_FILE: &str = "tag_aggregate.csv";
pub const LEADS_ENRICHED_FILE: &str = "leads_enriched.csv";
pub const SUMMARY_FILE: &str = "summary.json";
pub const MANIFEST_FILE: &str = "manifest.json";

pub const LEAD_COLUMNS: [&str; 11] = [
    "Notes",
    "Lead Name",
    "Lead Status",
    "Leads Created On",
    "employeeName",
    "Manager",
    "JobTitle",
    "region8",
    "subregion29",
    "opportunityType",
    "hasKeywordTag",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManifestEntry {
    pub file: String,
    pub rows: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportManifest {
    pub run_id: String,
    pub files:  Vec<ManifestEntry>,
}

/// Write one table: header row first, then each record in order.
pub fn write_csv<T: Serialize>(path: &Path, headers: &[&str], rows: &[T]) -> BonusResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(headers)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the whole report into `out_dir`, creating it if needed.
pub fn write_report(report: &BonusReport, out_dir: &Path) -> BonusResult<ExportManifest> {
    std::fs::create_dir_all(out_dir)?;
    let mut files = Vec::new();

    let mut table = |name: &str, rows: usize| -> PathBuf {
        files.push(ManifestEntry { file: name.to_string(), rows });
        out_dir.join(name)
    };

    write_csv(
        &table(ENGINEER_BONUS_FILE, report.engineer_bonus.len()),
        &BONUS_COLUMNS,
        &report.engineer_bonus,
    )?;
    write_csv(
        &table(PLANNER_BONUS_FILE, report.planner_bonus.len()),
        &BONUS_COLUMNS,
        &report.planner_bonus,
    )?;
    write_csv(
        &table(REGION_RANK_FILE, report.region_rank.len()),
        &REGION_RANK_COLUMNS,
        &report.region_rank,
    )?;
    write_csv(
        &table(TAG_AGGREGATE_FILE, report.tag_aggregate.len()),
        &TAG_AGGREGATE_COLUMNS,
        &report.tag_aggregate,
    )?;
    write_csv(
        &table(LEADS_ENRICHED_FILE, report.leads.len()),
        &LEAD_COLUMNS,
        &report.leads,
    )?;

    std::fs::write(
        out_dir.join(SUMMARY_FILE),
        serde_json::to_string_pretty(&report.summary)?,
    )?;

    let manifest = ExportManifest {
        run_id: report.run_id.clone(),
        files,
    };
    std::fs::write(
        out_dir.join(MANIFEST_FILE),
        serde_json::to_string_pretty(&manifest)?,
    )?;

    log::info!("wrote {} report tables to {}", manifest.files.len(), out_dir.display());
    Ok(manifest)
}
