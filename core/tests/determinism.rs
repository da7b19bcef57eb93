use fse_bonus_core::{engine::BonusEngine, event::PipelineEvent, loader::InputSource};

// ── Helpers ──────────────────────────────────────────────────────────────────

const LEADS_CSV: &str = "\
Notes,Lead Name,Lead Status,Leads Created On
li.wei@co.com,X-Y-ABB变频器,converted,45000
CN12345AB - amy zhou,X-Y-集控产品,converted,2024-02-01
CN54321 - bob li,X-Y-管道过滤器,open,2024-02-03
li.wei@co.com,X-Y-Z,open,
nobody,管道过滤器,open,2024-02-09
";

const ROSTER_CSV: &str = "\
NameEN,JobTitle,EmailAddress,八大区,29小区,Manager
Li Wei,Service Engineer,li.wei@co.com,East,E1,Mgr A
Amy Zhou,Planner,amy@co.com,North,N2,Mgr B
Bob Li,Service Manager,bob@co.com,West,W3,
";

fn run_once(run_id: &str) -> (fse_bonus_core::report::BonusReport, Vec<String>) {
    let mut engine = BonusEngine::build_default(run_id.into()).unwrap();
    let report = engine
        .run_sources(
            &InputSource::new("leads.csv", LEADS_CSV.as_bytes().to_vec()),
            &InputSource::new("roster.csv", ROSTER_CSV.as_bytes().to_vec()),
            &mut |_: &PipelineEvent| {},
        )
        .unwrap();
    let payloads = engine.event_log().iter().map(|e| e.payload.clone()).collect();
    (report, payloads)
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn same_inputs_give_identical_reports() {
    let (first, first_log) = run_once("det");
    let (second, second_log) = run_once("det");
    assert_eq!(first, second);
    assert_eq!(first_log, second_log);
}

#[test]
fn engine_can_be_rerun() {
    let mut engine = BonusEngine::build_default("rerun".into()).unwrap();
    let sources = (
        InputSource::new("leads.csv", LEADS_CSV.as_bytes().to_vec()),
        InputSource::new("roster.csv", ROSTER_CSV.as_bytes().to_vec()),
    );
    let a = engine.run_sources(&sources.0, &sources.1, &mut |_: &PipelineEvent| {}).unwrap();
    let log_len = engine.event_log().len();
    let b = engine.run_sources(&sources.0, &sources.1, &mut |_: &PipelineEvent| {}).unwrap();

    assert_eq!(a, b);
    assert_eq!(engine.event_log().len(), log_len);
}

#[test]
fn mixed_roles_land_in_their_tables() {
    let (report, _) = run_once("roles");

    let engineers: Vec<&str> = report.engineer_bonus.iter().map(|r| r.employee_name.as_str()).collect();
    assert_eq!(engineers, vec!["Li Wei", "Li Wei", "Bob Li"]);

    assert_eq!(report.planner_bonus.len(), 1);
    let amy = &report.planner_bonus[0];
    assert_eq!(amy.employee_name, "Amy Zhou");
    assert_eq!(amy.region8.as_deref(), Some("North"));
    assert_eq!(amy.bonus_amount, 120);

    // W3 has no manager on record.
    let w3 = report.region_rank.iter().find(|r| r.subregion29 == "W3").unwrap();
    assert_eq!(w3.manager, None);
    assert_eq!(report.region_rank[0].subregion29, "E1");
}
