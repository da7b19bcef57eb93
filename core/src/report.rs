//! The result of one run: the four report tables, the enriched lead table
//! and the dashboard summary.

use crate::{
    bonus_stage::{role_totals, BonusRow, RoleTotals},
    lead::LeadRecord,
    region_rank_stage::RegionRankRow,
    tag_stage::TagAggregateRow,
    types::RunId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopSubregion {
    pub subregion29: String,
    pub manager:     Option<String>,
    pub total_bonus: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    pub lead_count:           usize,
    pub roster_count:         usize,
    pub matched_count:        usize,
    pub match_rate_pct:       f64,
    pub unparseable_dates:    usize,
    pub engineer:             RoleTotals,
    pub planner:              RoleTotals,
    pub top_subregion:        Option<TopSubregion>,
    pub tagged_record_count:  usize,
    pub tagged_region_count:  usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BonusReport {
    pub run_id:         RunId,
    pub engineer_bonus: Vec<BonusRow>,
    pub planner_bonus:  Vec<BonusRow>,
    pub region_rank:    Vec<RegionRankRow>,
    pub tag_aggregate:  Vec<TagAggregateRow>,
    pub leads:          Vec<LeadRecord>,
    pub summary:        RunSummary,
}

impl RunSummary {
    pub fn build(
        leads: &[LeadRecord],
        roster_count: usize,
        unparseable_dates: usize,
        engineer_bonus: &[BonusRow],
        planner_bonus: &[BonusRow],
        region_rank: &[RegionRankRow],
        tag_aggregate: &[TagAggregateRow],
    ) -> Self {
        let lead_count = leads.len();
        let matched_count = leads.iter().filter(|l| l.employee_name.is_some()).count();
        let match_rate_pct = if lead_count > 0 {
            matched_count as f64 / lead_count as f64 * 100.0
        } else {
            0.0
        };

        Self {
            lead_count,
            roster_count,
            matched_count,
            match_rate_pct,
            unparseable_dates,
            engineer: role_totals(engineer_bonus),
            planner: role_totals(planner_bonus),
            top_subregion: region_rank.first().map(|r| TopSubregion {
                subregion29: r.subregion29.clone(),
                manager:     r.manager.clone(),
                total_bonus: r.total_bonus,
            }),
            tagged_record_count: leads.iter().filter(|l| l.has_keyword_tag).count(),
            tagged_region_count: tag_aggregate
                .iter()
                .map(|r| r.region8.as_str())
                .collect::<BTreeSet<_>>()
                .len(),
        }
    }
}
