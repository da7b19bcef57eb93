use fse_bonus_core::{
    engine::BonusEngine,
    export::{self, write_report, ExportManifest},
    lead::LeadRecord,
    roster::{EmployeeRecord, Roster},
};
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn roster() -> Roster {
    Roster::new(vec![EmployeeRecord {
        name_en:       Some("Li Wei".into()),
        job_title:     Some("Service Engineer".into()),
        email_address: Some("li.wei@co.com".into()),
        manager:       Some("Mgr A".into()),
        region8:       Some("East".into()),
        subregion29:   Some("E1".into()),
    }])
    .unwrap()
}

fn read(dir: &TempDir, file: &str) -> String {
    std::fs::read_to_string(dir.path().join(file)).unwrap()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn tables_written_with_headers_and_rows() {
    let leads = vec![LeadRecord::new(
        Some("li.wei@co.com".into()),
        Some("X-Y-ABB变频器".into()),
        Some("converted".into()),
        chrono::NaiveDate::from_ymd_opt(2023, 3, 15),
    )];
    let mut engine = BonusEngine::build_default("export-test".into()).unwrap();
    let report = engine.run(leads, &roster()).unwrap();

    let dir = TempDir::new().unwrap();
    let manifest = write_report(&report, dir.path()).unwrap();

    let engineer = read(&dir, export::ENGINEER_BONUS_FILE);
    let mut lines = engineer.lines();
    assert_eq!(
        lines.next(),
        Some("region8,subregion29,JobTitle,employeeName,month,submittedCount,convertedCount,bonusAmount")
    );
    assert_eq!(lines.next(), Some("East,E1,Service Engineer,Li Wei,2023-03,1,1,120"));
    assert_eq!(lines.next(), None);

    let rank = read(&dir, export::REGION_RANK_FILE);
    assert_eq!(
        rank.lines().collect::<Vec<_>>(),
        vec!["subregion29,totalSubmitted,totalConverted,totalBonus,manager", "E1,1,1,120,Mgr A"]
    );

    let written: ExportManifest =
        serde_json::from_str(&read(&dir, export::MANIFEST_FILE)).unwrap();
    assert_eq!(written, manifest);
    assert_eq!(manifest.run_id, "export-test");
    let rows = |file: &str| manifest.files.iter().find(|f| f.file == file).unwrap().rows;
    assert_eq!(rows(export::ENGINEER_BONUS_FILE), 1);
    assert_eq!(rows(export::PLANNER_BONUS_FILE), 0);
    assert_eq!(rows(export::LEADS_ENRICHED_FILE), 1);
}

/// An empty table still gets its header row.
#[test]
fn empty_tables_keep_header_row() {
    let mut engine = BonusEngine::build_default("empty-export".into()).unwrap();
    let report = engine.run(Vec::new(), &roster()).unwrap();

    let dir = TempDir::new().unwrap();
    write_report(&report, dir.path()).unwrap();

    assert_eq!(
        read(&dir, export::PLANNER_BONUS_FILE).trim_end(),
        "region8,subregion29,JobTitle,employeeName,month,submittedCount,convertedCount,bonusAmount"
    );
    assert_eq!(read(&dir, export::TAG_AGGREGATE_FILE).trim_end(), "region8,month,count");
    assert_eq!(
        read(&dir, export::LEADS_ENRICHED_FILE).lines().next().unwrap(),
        export::LEAD_COLUMNS.join(",")
    );

    let summary: serde_json::Value =
        serde_json::from_str(&read(&dir, export::SUMMARY_FILE)).unwrap();
    assert_eq!(summary["lead_count"], 0);
}

#[test]
fn missing_month_written_as_empty_field() {
    let leads = vec![LeadRecord::new(
        Some("li.wei@co.com".into()),
        Some("X-Y-Z".into()),
        Some("open".into()),
        None,
    )];
    let mut engine = BonusEngine::build_default("no-month".into()).unwrap();
    let report = engine.run(leads, &roster()).unwrap();

    let dir = TempDir::new().unwrap();
    write_report(&report, dir.path()).unwrap();
    let engineer = read(&dir, export::ENGINEER_BONUS_FILE);
    assert_eq!(engineer.lines().nth(1), Some("East,E1,Service Engineer,Li Wei,,1,0,20"));
}
