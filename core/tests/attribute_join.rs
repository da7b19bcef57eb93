use fse_bonus_core::{
    attribute_join_stage::join_attributes,
    engine::BonusEngine,
    lead::LeadRecord,
    roster::{EmployeeRecord, Roster},
};

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

fn lead_for(name: Option<&str>) -> LeadRecord {
    LeadRecord {
        employee_name: name.map(String::from),
        ..LeadRecord::default()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn known_employee_gets_all_four_attributes() {
    let mut lead = lead_for(Some("Li Wei"));
    assert!(join_attributes(&mut lead, &roster()));
    assert_eq!(lead.manager.as_deref(), Some("Mgr A"));
    assert_eq!(lead.job_title.as_deref(), Some("Service Engineer"));
    assert_eq!(lead.region8.as_deref(), Some("East"));
    assert_eq!(lead.subregion29.as_deref(), Some("E1"));
}

/// Names resolved by pattern but absent from the roster get nothing.
#[test]
fn unknown_employee_gets_no_attributes() {
    let mut lead = lead_for(Some("Ghost Person"));
    assert!(!join_attributes(&mut lead, &roster()));
    assert_eq!(lead.manager, None);
    assert_eq!(lead.job_title, None);
    assert_eq!(lead.region8, None);
    assert_eq!(lead.subregion29, None);
}

/// Lookup is exact: case differences do not match.
#[test]
fn name_lookup_is_case_sensitive() {
    let mut lead = lead_for(Some("li wei"));
    assert!(!join_attributes(&mut lead, &roster()));
    assert_eq!(lead.job_title, None);
}

/// Unmatched leads stay in the lead table.
#[test]
fn unmatched_leads_are_kept() {
    let mut engine = BonusEngine::build_default("join-keep-test".into()).unwrap();
    let leads = vec![
        LeadRecord::new(Some("li.wei@co.com".into()), None, None, None),
        LeadRecord::new(Some("nobody".into()), None, None, None),
        LeadRecord::new(None, None, None, None),
    ];
    let report = engine.run(leads, &roster()).unwrap();

    assert_eq!(report.leads.len(), 3);
    assert_eq!(report.leads[0].region8.as_deref(), Some("East"));
    assert!(report.leads[1..].iter().all(|l| l.region8.is_none() && l.manager.is_none()));
}

#[test]
fn duplicate_roster_names_are_rejected() {
    let dup = EmployeeRecord {
        name_en: Some("Li Wei".into()),
        ..EmployeeRecord::default()
    };
    let err = Roster::new(vec![dup.clone(), dup]).unwrap_err();
    assert_eq!(err.category(), "duplicate_employee");
}
