//! Region ranking — engineer bonus totals per sub-region.
//!
//! Sums the engineer bonus rows by subregion29 and attaches the first
//! manager seen on an engineer lead of that sub-region (lead table order).
//! Rows are sorted by total bonus, highest first. The sort is stable over
//! rows already in ascending sub-region order, so equal totals rank by
//! sub-region name.

use crate::{
    bonus_stage::BonusRow,
    config::BonusConfig,
    error::BonusResult,
    event::PipelineEvent,
    lead::LeadRecord,
    stage::{PipelineStage, RunContext},
    types::RoleCategory,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub const REGION_RANK_COLUMNS: [&str; 5] =
    ["subregion29", "totalSubmitted", "totalConverted", "totalBonus", "manager"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionRankRow {
    pub subregion29:     String,
    #[serde(rename = "totalSubmitted")]
    pub total_submitted: u64,
    #[serde(rename = "totalConverted")]
    pub total_converted: u64,
    #[serde(rename = "totalBonus")]
    pub total_bonus:     u64,
    pub manager:         Option<String>,
}

/// First non-empty manager per sub-region among engineer leads.
fn subregion_managers<'a>(
    leads: &'a [LeadRecord],
    config: &BonusConfig,
) -> HashMap<&'a str, &'a str> {
    let mut managers = HashMap::new();
    let engineer_leads = leads
        .iter()
        .filter(|l| config.has_title(RoleCategory::Engineer, l.job_title.as_deref()));
    for lead in engineer_leads {
        if let (Some(subregion), Some(manager)) = (lead.subregion29.as_deref(), lead.manager.as_deref()) {
            managers.entry(subregion).or_insert(manager);
        }
    }
    managers
}

pub fn rank_regions(
    engineer_rows: &[BonusRow],
    leads: &[LeadRecord],
    config: &BonusConfig,
) -> Vec<RegionRankRow> {
    let mut totals: BTreeMap<&str, (u64, u64, u64)> = BTreeMap::new();
    for row in engineer_rows {
        let Some(subregion) = row.subregion29.as_deref() else { continue };
        let entry = totals.entry(subregion).or_default();
        entry.0 += row.submitted_count;
        entry.1 += row.converted_count;
        entry.2 += row.bonus_amount;
    }

    let managers = subregion_managers(leads, config);

    let mut ranked: Vec<RegionRankRow> = totals
        .into_iter()
        .map(|(subregion, (submitted, converted, bonus))| RegionRankRow {
            subregion29:     subregion.to_string(),
            total_submitted: submitted,
            total_converted: converted,
            total_bonus:     bonus,
            manager:         managers.get(subregion).map(|m| m.to_string()),
        })
        .collect();

    ranked.sort_by(|a, b| b.total_bonus.cmp(&a.total_bonus));
    ranked
}

pub struct RegionRankStage;

impl PipelineStage for RegionRankStage {
    fn name(&self) -> &'static str { "region_rank" }

    fn describe(&self) -> &'static str { "ranking sub-regions by engineer bonus" }

    fn run(&mut self, ctx: &mut RunContext<'_>) -> BonusResult<Vec<PipelineEvent>> {
        ctx.region_rank = rank_regions(&ctx.engineer_bonus, &ctx.leads, ctx.config);

        let top = ctx.region_rank.first();
        let top_subregion = top.map(|r| r.subregion29.clone());
        let top_bonus = top.map(|r| r.total_bonus).unwrap_or(0);

        log::info!(
            "region rank: {} sub-regions, top={} ({top_bonus})",
            ctx.region_rank.len(),
            top_subregion.as_deref().unwrap_or("-")
        );

        Ok(vec![PipelineEvent::RegionsRanked {
            subregions: ctx.region_rank.len(),
            top_subregion,
            top_bonus,
        }])
    }
}
