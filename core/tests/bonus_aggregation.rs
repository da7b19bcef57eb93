use chrono::NaiveDate;
use fse_bonus_core::{
    bonus_stage::{aggregate_engineers, aggregate_planners, role_totals, BonusRow},
    config::BonusConfig,
    lead::LeadRecord,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

/// A lead that has already been through resolution, join and classification.
fn enriched(
    employee: &str,
    title: &str,
    region: Option<(&str, &str)>,
    status: &str,
    opportunity: &str,
    created_on: Option<NaiveDate>,
) -> LeadRecord {
    LeadRecord {
        lead_status:      Some(status.into()),
        created_on,
        employee_name:    Some(employee.into()),
        job_title:        Some(title.into()),
        region8:          region.map(|(r, _)| r.to_string()),
        subregion29:      region.map(|(_, s)| s.to_string()),
        opportunity_type: Some(opportunity.into()),
        ..LeadRecord::default()
    }
}

fn find<'a>(rows: &'a [BonusRow], employee: &str, month: Option<&str>) -> &'a BonusRow {
    rows.iter()
        .find(|r| r.employee_name == employee && r.month.as_deref() == month)
        .unwrap_or_else(|| panic!("no row for {employee} {month:?}"))
}

const EAST: Option<(&str, &str)> = Some(("East", "E1"));

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn submissions_and_conversions_counted_per_month() {
    let config = BonusConfig::default();
    let leads = vec![
        enriched("Li Wei", "Service Engineer", EAST, "converted", "ABB变频器", date(2024, 3, 1)),
        enriched("Li Wei", "Service Engineer", EAST, "open", "ABB变频器", date(2024, 3, 9)),
        enriched("Li Wei", "Service Engineer", EAST, "converted", "集控产品", date(2024, 3, 20)),
        enriched("Li Wei", "Service Engineer", EAST, "converted", "ABB变频器", date(2024, 4, 2)),
    ];

    let rows = aggregate_engineers(&leads, &config).rows;
    assert_eq!(rows.len(), 2);

    let march = find(&rows, "Li Wei", Some("2024-03"));
    assert_eq!(march.submitted_count, 3);
    assert_eq!(march.converted_count, 2);
    assert_eq!(march.bonus_amount, 3 * 20 + 2 * 100);

    let april = find(&rows, "Li Wei", Some("2024-04"));
    assert_eq!(april.submitted_count, 1);
    assert_eq!(april.converted_count, 1);
    assert_eq!(april.bonus_amount, 120);
}

/// Conversion needs both the exact status and a target opportunity type.
#[test]
fn conversion_requires_status_and_target_type() {
    let config = BonusConfig::default();
    let leads = vec![
        enriched("Li Wei", "Service Engineer", EAST, "converted", "普通维修", date(2024, 3, 1)),
        enriched("Li Wei", "Service Engineer", EAST, "Converted", "ABB变频器", date(2024, 3, 2)),
        enriched("Li Wei", "Service Engineer", EAST, "open", "ABB变频器", date(2024, 3, 3)),
        enriched("Li Wei", "Service Engineer", EAST, "converted", " ABB变频器", date(2024, 3, 4)),
    ];

    let rows = aggregate_engineers(&leads, &config).rows;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].submitted_count, 4);
    assert_eq!(rows[0].converted_count, 0);
    assert_eq!(rows[0].bonus_amount, 80);
}

#[test]
fn bonus_formula_holds_for_every_row() {
    let config = BonusConfig::default();
    let mut leads = Vec::new();
    for (i, name) in ["A One", "B Two", "C Three"].iter().enumerate() {
        for day in 1..=(i as u32 + 2) {
            let status = if day % 2 == 0 { "converted" } else { "open" };
            leads.push(enriched(name, "Senior Service Engineer", EAST, status, "转子大修商机", date(2024, 1, day)));
        }
    }

    let rows = aggregate_engineers(&leads, &config).rows;
    assert_eq!(rows.len(), 3);
    for row in &rows {
        assert_eq!(row.bonus_amount, row.submitted_count * 20 + row.converted_count * 100);
    }
    let total: u64 = rows.iter().map(|r| r.submitted_count).sum();
    assert_eq!(total as usize, leads.len());
}

/// Rates come from the configuration, not from literals.
#[test]
fn bonus_rates_are_configurable() {
    let config = BonusConfig {
        submission_bonus: 5,
        conversion_bonus: 50,
        ..BonusConfig::default()
    };
    let leads = vec![
        enriched("Li Wei", "Service Engineer", EAST, "converted", "ABB变频器", date(2024, 3, 1)),
        enriched("Li Wei", "Service Engineer", EAST, "open", "ABB变频器", date(2024, 3, 2)),
    ];
    let rows = aggregate_engineers(&leads, &config).rows;
    assert_eq!(rows[0].bonus_amount, 2 * 5 + 50);
}

/// Leads with no creation date form their own empty-month bucket.
#[test]
fn missing_dates_form_their_own_bucket() {
    let config = BonusConfig::default();
    let leads = vec![
        enriched("Li Wei", "Service Engineer", EAST, "open", "x", date(2024, 3, 1)),
        enriched("Li Wei", "Service Engineer", EAST, "open", "x", None),
        enriched("Li Wei", "Service Engineer", EAST, "converted", "ABB变频器", None),
    ];
    let rows = aggregate_engineers(&leads, &config).rows;
    assert_eq!(rows.len(), 2);

    let undated = find(&rows, "Li Wei", None);
    assert_eq!(undated.submitted_count, 2);
    assert_eq!(undated.converted_count, 1);
}

/// Only engineer titles reach the engineer table; only planner titles
/// reach the planner table.
#[test]
fn roles_are_filtered_by_title() {
    let config = BonusConfig::default();
    let leads = vec![
        enriched("Eng One", "Service Engineer", EAST, "open", "x", date(2024, 3, 1)),
        enriched("Plan One", "Planner", EAST, "open", "x", date(2024, 3, 1)),
        enriched("Sales One", "Account Manager", EAST, "open", "x", date(2024, 3, 1)),
    ];

    let engineers = aggregate_engineers(&leads, &config).rows;
    let planners = aggregate_planners(&leads, &config).rows;
    assert_eq!(engineers.len(), 1);
    assert_eq!(engineers[0].employee_name, "Eng One");
    assert_eq!(planners.len(), 1);
    assert_eq!(planners[0].employee_name, "Plan One");
}

/// An engineer without region fields cannot form a key and is left out.
/// A planner without region fields keeps the row with empty regions.
#[test]
fn missing_regions_drop_engineers_but_not_planners() {
    let config = BonusConfig::default();
    let mut half = enriched("Eng Half", "Service Engineer", EAST, "open", "x", date(2024, 3, 1));
    half.subregion29 = None;
    let leads = vec![
        enriched("Eng NoRegion", "Service Engineer", None, "open", "x", date(2024, 3, 1)),
        half,
        enriched("Plan NoRegion", "Senior Planner", None, "converted", "集控产品", date(2024, 3, 1)),
    ];

    let engineers = aggregate_engineers(&leads, &config);
    assert!(engineers.rows.is_empty());
    assert_eq!(engineers.dropped_missing_region, 2);

    let planners = aggregate_planners(&leads, &config).rows;
    assert_eq!(planners.len(), 1);
    let row = &planners[0];
    assert_eq!(row.region8, None);
    assert_eq!(row.subregion29, None);
    assert_eq!(row.submitted_count, 1);
    assert_eq!(row.converted_count, 1);
    assert_eq!(row.bonus_amount, 120);
}

/// Planner regions are attached after counting, from the planner's own leads.
#[test]
fn planner_regions_attached_by_employee() {
    let config = BonusConfig::default();
    let leads = vec![
        enriched("Plan One", "Planner", Some(("North", "N3")), "open", "x", date(2024, 3, 1)),
        enriched("Plan One", "Planner", Some(("North", "N3")), "open", "x", date(2024, 4, 1)),
    ];
    let rows = aggregate_planners(&leads, &config).rows;
    assert_eq!(rows.len(), 2);
    assert!(rows
        .iter()
        .all(|r| r.region8.as_deref() == Some("North") && r.subregion29.as_deref() == Some("N3")));
}

/// Pins current semantics: conversions are counted over the same keyed
/// records as submissions, so a converted engineer lead that cannot form a
/// key (no region) counts for neither. convertedCount is never forced to
/// be at most submittedCount by any clamp.
#[test]
fn conversion_counting_follows_submission_keys() {
    let config = BonusConfig::default();
    let leads = vec![
        enriched("Li Wei", "Service Engineer", EAST, "open", "x", date(2024, 3, 1)),
        enriched("Li Wei", "Service Engineer", None, "converted", "ABB变频器", date(2024, 3, 2)),
    ];
    let aggregate = aggregate_engineers(&leads, &config);
    assert_eq!(aggregate.rows.len(), 1);
    assert_eq!(aggregate.rows[0].submitted_count, 1);
    assert_eq!(aggregate.rows[0].converted_count, 0);
    assert_eq!(aggregate.dropped_missing_region, 1);
}

/// Rows come out in ascending key order: region, sub-region, title, name, month.
#[test]
fn engineer_rows_sorted_by_key() {
    let config = BonusConfig::default();
    let leads = vec![
        enriched("Zed", "Service Engineer", Some(("West", "W1")), "open", "x", date(2024, 3, 1)),
        enriched("Amy", "Service Engineer", Some(("East", "E2")), "open", "x", date(2024, 4, 1)),
        enriched("Amy", "Service Engineer", Some(("East", "E2")), "open", "x", date(2024, 3, 1)),
        enriched("Bob", "Service Engineer", Some(("East", "E1")), "open", "x", date(2024, 3, 1)),
    ];
    let rows = aggregate_engineers(&leads, &config).rows;
    let order: Vec<(&str, Option<&str>)> = rows
        .iter()
        .map(|r| (r.employee_name.as_str(), r.month.as_deref()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("Bob", Some("2024-03")),
            ("Amy", Some("2024-03")),
            ("Amy", Some("2024-04")),
            ("Zed", Some("2024-03")),
        ]
    );
}

/// Average bonus is per distinct employee, not per row.
#[test]
fn role_totals_average_over_employees() {
    let config = BonusConfig::default();
    let leads = vec![
        enriched("Li Wei", "Service Engineer", EAST, "converted", "ABB变频器", date(2024, 3, 1)),
        enriched("Li Wei", "Service Engineer", EAST, "open", "x", date(2024, 4, 1)),
        enriched("Amy", "Service Engineer", EAST, "open", "x", date(2024, 3, 1)),
    ];
    let rows = aggregate_engineers(&leads, &config).rows;
    assert_eq!(rows.len(), 3);

    let totals = role_totals(&rows);
    assert_eq!(totals.employees, 2);
    assert_eq!(totals.bonus, 120 + 20 + 20);
    assert!((totals.average_bonus - 80.0).abs() < 1e-9);

    assert_eq!(role_totals(&[]).average_bonus, 0.0);
}
