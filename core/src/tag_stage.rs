//! Keyword tag aggregation.
//!
//! A lead is tagged when its lead name or its notes contain the configured
//! keyword (plain, case-sensitive substring). Tagged leads are counted per
//! (region8, month); a missing region8 is reported under the configured
//! "unassigned" label. Identity resolution plays no part here.

use crate::{
    config::BonusConfig,
    error::BonusResult,
    event::PipelineEvent,
    lead::LeadRecord,
    stage::{PipelineStage, RunContext},
    types::MonthLabel,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const TAG_AGGREGATE_COLUMNS: [&str; 3] = ["region8", "month", "count"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TagAggregateRow {
    pub region8: String,
    pub month:   Option<MonthLabel>,
    pub count:   u64,
}

pub fn is_tagged(lead: &LeadRecord, keyword: &str) -> bool {
    let contains = |field: &Option<String>| field.as_deref().is_some_and(|s| s.contains(keyword));
    contains(&lead.lead_name) || contains(&lead.notes)
}

/// Count tagged leads per (region8, month), in ascending key order.
pub fn aggregate_tags(leads: &[LeadRecord], config: &BonusConfig) -> Vec<TagAggregateRow> {
    let mut counts: BTreeMap<(String, Option<MonthLabel>), u64> = BTreeMap::new();
    for lead in leads.iter().filter(|l| l.has_keyword_tag) {
        let region = lead
            .region8
            .clone()
            .unwrap_or_else(|| config.unassigned_region_label.clone());
        *counts.entry((region, lead.month())).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|((region8, month), count)| TagAggregateRow { region8, month, count })
        .collect()
}

pub struct TagStage;

impl PipelineStage for TagStage {
    fn name(&self) -> &'static str { "keyword_tag" }

    fn describe(&self) -> &'static str { "aggregating keyword-tagged leads" }

    fn run(&mut self, ctx: &mut RunContext<'_>) -> BonusResult<Vec<PipelineEvent>> {
        let keyword = ctx.config.keyword.as_str();
        let mut tagged_records = 0usize;
        for lead in &mut ctx.leads {
            lead.has_keyword_tag = is_tagged(lead, keyword);
            if lead.has_keyword_tag {
                tagged_records += 1;
            }
        }

        ctx.tag_aggregate = aggregate_tags(&ctx.leads, ctx.config);
        let regions = ctx
            .tag_aggregate
            .iter()
            .map(|r| r.region8.as_str())
            .collect::<BTreeSet<_>>()
            .len();

        log::info!("keyword tag: {tagged_records} tagged leads across {regions} regions");

        Ok(vec![PipelineEvent::TagsAggregated { tagged_records, regions }])
    }
}
