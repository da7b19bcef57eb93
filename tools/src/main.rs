//! bonus-runner: headless bonus report runner.
//!
//! Usage:
//!   bonus-runner --leads FSE.xlsx --roster mapping.xlsx --out ./report
//!   bonus-runner --leads leads.csv --roster roster.csv --rules data/bonus_rules.json --json

use anyhow::{Context, Result};
use clap::Parser;
use fse_bonus_core::{
    config::BonusConfig,
    engine::BonusEngine,
    error::BonusError,
    event::PipelineEvent,
    export,
    loader::InputSource,
    report::BonusReport,
};
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "bonus-runner", version, about = "Compute FSE and planner incentive bonus reports")]
struct Args {
    /// Lead/activity export (xlsx, xls, ods or csv).
    #[arg(long)]
    leads: PathBuf,

    /// Employee roster (xlsx, xls, ods or csv).
    #[arg(long)]
    roster: PathBuf,

    /// Bonus rules JSON. Built-in rules are used when omitted.
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Directory the report tables are written to.
    #[arg(long, default_value = "./bonus_report")]
    out: PathBuf,

    /// Run identifier. A fresh one is generated when omitted.
    #[arg(long)]
    run_id: Option<String>,

    /// Suppress step narration.
    #[arg(long)]
    quiet: bool,

    /// Print the run summary as JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let category = err
                .downcast_ref::<BonusError>()
                .map(BonusError::category)
                .unwrap_or("internal");
            eprintln!("error[{category}]: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.rules {
        Some(path) => BonusConfig::load(path)?,
        None => BonusConfig::default(),
    };
    let run_id = args
        .run_id
        .clone()
        .unwrap_or_else(|| format!("run-{}", Uuid::new_v4()));

    let lead_source = InputSource::from_path(&args.leads)
        .with_context(|| format!("reading {}", args.leads.display()))?;
    let roster_source = InputSource::from_path(&args.roster)
        .with_context(|| format!("reading {}", args.roster.display()))?;

    let narrate = !args.quiet && !args.json;
    if narrate {
        println!("FSE bonus runner");
        println!("  run_id:  {run_id}");
        println!("  leads:   {}", args.leads.display());
        println!("  roster:  {}", args.roster.display());
        println!("  out:     {}", args.out.display());
        println!();
    }

    let mut engine = BonusEngine::build(run_id, config)?;
    let report = engine.run_sources(&lead_source, &roster_source, &mut |event: &PipelineEvent| {
        if narrate {
            print_event(event);
        }
    })?;

    let manifest = export::write_report(&report, &args.out)?;
    log::info!("run {} exported to {}", report.run_id, args.out.display());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.summary)?);
    } else {
        print_summary(&report);
        println!();
        println!("Report written to {}", args.out.join(export::MANIFEST_FILE).display());
        for file in &manifest.files {
            println!("  {:<22} {} rows", file.file, file.rows);
        }
    }
    Ok(())
}

fn print_event(event: &PipelineEvent) {
    match event {
        PipelineEvent::StageStarted { stage, step, total } => {
            println!("step {step}/{total}: {stage}");
        }
        PipelineEvent::InputsLoaded { leads, employees, unparseable_dates } => {
            println!("  leads: {leads}  employees: {employees}  unparseable dates: {unparseable_dates}");
        }
        PipelineEvent::NamesResolved { matched, total, match_rate_pct } => {
            println!("  matched {matched}/{total} ({match_rate_pct:.1}%)");
        }
        PipelineEvent::AttributesJoined { joined, unmatched_names } => {
            println!("  joined {joined}, names not in roster: {unmatched_names}");
        }
        PipelineEvent::OpportunitiesClassified { classified, target_matches } => {
            println!("  classified {classified}, target types: {target_matches}");
        }
        PipelineEvent::BonusComputed { role, employees, rows, bonus, .. } => {
            println!("  {}: {employees} employees, {rows} rows, bonus {bonus}", role.as_str());
        }
        PipelineEvent::RegionsRanked { subregions, top_subregion, .. } => {
            println!(
                "  {subregions} sub-regions, top: {}",
                top_subregion.as_deref().unwrap_or("-")
            );
        }
        PipelineEvent::TagsAggregated { tagged_records, regions } => {
            println!("  {tagged_records} tagged leads across {regions} regions");
        }
        PipelineEvent::RunStarted { .. } | PipelineEvent::RunCompleted { .. } => {}
    }
}

fn print_summary(report: &BonusReport) {
    let s = &report.summary;
    println!();
    println!("=== RUN SUMMARY ===");
    println!("  run_id:            {}", report.run_id);
    println!("  leads:             {}", s.lead_count);
    println!("  employees:         {}", s.roster_count);
    println!("  matched:           {} ({:.1}%)", s.matched_count, s.match_rate_pct);
    println!("  unparseable dates: {}", s.unparseable_dates);
    println!();
    println!("=== BONUS ===");
    for (label, totals) in [("engineers", &s.engineer), ("planners", &s.planner)] {
        println!(
            "  {label:<10} {:>4} people | submitted {:>5} | converted {:>5} | bonus ¥{} | avg ¥{:.0}/person",
            totals.employees, totals.submitted, totals.converted, totals.bonus, totals.average_bonus
        );
    }
    match &s.top_subregion {
        Some(top) => println!(
            "  top sub-region: {} (manager: {}) ¥{}",
            top.subregion29,
            top.manager.as_deref().unwrap_or("-"),
            top.total_bonus
        ),
        None => println!("  top sub-region: (none)"),
    }
    println!(
        "  keyword tagged: {} leads across {} regions",
        s.tagged_record_count, s.tagged_region_count
    );
}
