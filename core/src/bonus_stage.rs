//! Bonus aggregation — monthly submission and conversion counts per employee.
//!
//! Runs once per role category:
//!
//!   Engineer: grouped by (region8, subregion29, job title, employee, month).
//!             A record without region8 or subregion29 cannot form a key and
//!             is left out of the engineer table.
//!   Planner:  grouped by (job title, employee, month), so planners without
//!             a region keep their rows. The region fields are attached
//!             afterwards from the first planner record seen for the employee.
//!
//! Submissions and conversions are counted independently over the role's
//! records and then left-joined on the key; a key with no conversions gets 0.
//! A record with no creation date falls into the `None` month bucket.

use crate::{
    config::BonusConfig,
    error::BonusResult,
    event::PipelineEvent,
    lead::LeadRecord,
    stage::{PipelineStage, RunContext},
    types::{MonthLabel, RoleCategory},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

pub const BONUS_COLUMNS: [&str; 8] = [
    "region8",
    "subregion29",
    "JobTitle",
    "employeeName",
    "month",
    "submittedCount",
    "convertedCount",
    "bonusAmount",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BonusRow {
    pub region8:         Option<String>,
    pub subregion29:     Option<String>,
    #[serde(rename = "JobTitle")]
    pub job_title:       String,
    #[serde(rename = "employeeName")]
    pub employee_name:   String,
    pub month:           Option<MonthLabel>,
    #[serde(rename = "submittedCount")]
    pub submitted_count: u64,
    #[serde(rename = "convertedCount")]
    pub converted_count: u64,
    #[serde(rename = "bonusAmount")]
    pub bonus_amount:    u64,
}

/// Aggregated rows of one role plus the records that could not be keyed.
#[derive(Debug, Clone, Default)]
pub struct RoleAggregate {
    pub rows: Vec<BonusRow>,
    pub dropped_missing_region: usize,
}

/// Dashboard totals over one role's bonus rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RoleTotals {
    pub employees: usize,
    pub submitted: u64,
    pub converted: u64,
    pub bonus:     u64,
    /// Total bonus over distinct employees; 0 when there are none.
    pub average_bonus: f64,
}

pub fn role_totals(rows: &[BonusRow]) -> RoleTotals {
    let employees = rows
        .iter()
        .map(|r| r.employee_name.as_str())
        .collect::<HashSet<_>>()
        .len();
    let bonus: u64 = rows.iter().map(|r| r.bonus_amount).sum();
    RoleTotals {
        employees,
        submitted: rows.iter().map(|r| r.submitted_count).sum(),
        converted: rows.iter().map(|r| r.converted_count).sum(),
        bonus,
        average_bonus: if employees > 0 { bonus as f64 / employees as f64 } else { 0.0 },
    }
}

/// Converted status and a target opportunity type.
pub fn is_conversion(lead: &LeadRecord, config: &BonusConfig) -> bool {
    lead.lead_status.as_deref() == Some(config.converted_status.as_str())
        && config.is_target_opportunity(lead.opportunity_type.as_deref())
}

fn count_by<'a, K, I, F>(leads: I, key: F) -> BTreeMap<K, u64>
where
    K: Ord,
    I: Iterator<Item = &'a LeadRecord>,
    F: Fn(&LeadRecord) -> Option<K>,
{
    let mut counts = BTreeMap::new();
    for k in leads.filter_map(key) {
        *counts.entry(k).or_insert(0) += 1;
    }
    counts
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct EngineerKey {
    region8:       String,
    subregion29:   String,
    job_title:     String,
    employee_name: String,
    month:         Option<MonthLabel>,
}

fn engineer_key(lead: &LeadRecord) -> Option<EngineerKey> {
    Some(EngineerKey {
        region8:       lead.region8.clone()?,
        subregion29:   lead.subregion29.clone()?,
        job_title:     lead.job_title.clone()?,
        employee_name: lead.employee_name.clone()?,
        month:         lead.month(),
    })
}

pub fn aggregate_engineers(leads: &[LeadRecord], config: &BonusConfig) -> RoleAggregate {
    let role_leads: Vec<&LeadRecord> = leads
        .iter()
        .filter(|l| config.has_title(RoleCategory::Engineer, l.job_title.as_deref()))
        .collect();

    let submitted = count_by(role_leads.iter().copied(), engineer_key);
    let converted = count_by(
        role_leads.iter().copied().filter(|l| is_conversion(l, config)),
        engineer_key,
    );
    let dropped_missing_region = role_leads.iter().filter(|l| engineer_key(l).is_none()).count();

    if dropped_missing_region > 0 {
        log::warn!(
            "{dropped_missing_region} engineer leads have no region8/subregion29 and are not in the engineer table"
        );
    }

    let rows = submitted
        .into_iter()
        .map(|(key, submitted_count)| {
            let converted_count = converted.get(&key).copied().unwrap_or(0);
            BonusRow {
                region8:       Some(key.region8),
                subregion29:   Some(key.subregion29),
                job_title:     key.job_title,
                employee_name: key.employee_name,
                month:         key.month,
                submitted_count,
                converted_count,
                bonus_amount:  config.bonus_amount(submitted_count, converted_count),
            }
        })
        .collect();

    RoleAggregate { rows, dropped_missing_region }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct PlannerKey {
    job_title:     String,
    employee_name: String,
    month:         Option<MonthLabel>,
}

fn planner_key(lead: &LeadRecord) -> Option<PlannerKey> {
    Some(PlannerKey {
        job_title:     lead.job_title.clone()?,
        employee_name: lead.employee_name.clone()?,
        month:         lead.month(),
    })
}

pub fn aggregate_planners(leads: &[LeadRecord], config: &BonusConfig) -> RoleAggregate {
    let role_leads: Vec<&LeadRecord> = leads
        .iter()
        .filter(|l| config.has_title(RoleCategory::Planner, l.job_title.as_deref()))
        .collect();

    let submitted = count_by(role_leads.iter().copied(), planner_key);
    let converted = count_by(
        role_leads.iter().copied().filter(|l| is_conversion(l, config)),
        planner_key,
    );

    // Region lookup over the planner subset, first record per employee.
    let mut regions: HashMap<&str, (Option<String>, Option<String>)> = HashMap::new();
    for lead in &role_leads {
        if let Some(name) = lead.employee_name.as_deref() {
            regions
                .entry(name)
                .or_insert_with(|| (lead.region8.clone(), lead.subregion29.clone()));
        }
    }

    let rows = submitted
        .into_iter()
        .map(|(key, submitted_count)| {
            let converted_count = converted.get(&key).copied().unwrap_or(0);
            let (region8, subregion29) = regions
                .get(key.employee_name.as_str())
                .cloned()
                .unwrap_or_default();
            BonusRow {
                region8,
                subregion29,
                job_title:     key.job_title,
                employee_name: key.employee_name,
                month:         key.month,
                submitted_count,
                converted_count,
                bonus_amount:  config.bonus_amount(submitted_count, converted_count),
            }
        })
        .collect();

    RoleAggregate { rows, dropped_missing_region: 0 }
}

fn bonus_event(role: RoleCategory, aggregate: &RoleAggregate) -> PipelineEvent {
    let totals = role_totals(&aggregate.rows);
    log::info!(
        "{} bonus: {} employees, {} rows, submitted={} converted={} bonus={}",
        role.as_str(),
        totals.employees,
        aggregate.rows.len(),
        totals.submitted,
        totals.converted,
        totals.bonus
    );
    PipelineEvent::BonusComputed {
        role,
        rows: aggregate.rows.len(),
        employees: totals.employees,
        submitted: totals.submitted,
        converted: totals.converted,
        bonus: totals.bonus,
        dropped_missing_region: aggregate.dropped_missing_region,
    }
}

pub struct BonusStage;

impl PipelineStage for BonusStage {
    fn name(&self) -> &'static str { "bonus" }

    fn describe(&self) -> &'static str { "computing engineer and planner bonuses" }

    fn run(&mut self, ctx: &mut RunContext<'_>) -> BonusResult<Vec<PipelineEvent>> {
        let engineers = aggregate_engineers(&ctx.leads, ctx.config);
        let planners = aggregate_planners(&ctx.leads, ctx.config);

        let events = vec![
            bonus_event(RoleCategory::Engineer, &engineers),
            bonus_event(RoleCategory::Planner, &planners),
        ];

        ctx.engineer_bonus = engineers.rows;
        ctx.planner_bonus = planners.rows;
        Ok(events)
    }
}
