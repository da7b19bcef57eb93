//! Opportunity classification from the delimited lead name.
//!
//! `"X-Y-ABB变频器-Z"` with delimiter `-` and segment 2 gives `ABB变频器`.
//! Only surrounding whitespace is stripped; matching against the target
//! list downstream is exact.

use crate::{
    error::BonusResult,
    event::PipelineEvent,
    stage::{PipelineStage, RunContext},
};

pub fn classify_opportunity(
    lead_name: Option<&str>,
    delimiter: char,
    segment: usize,
) -> Option<String> {
    lead_name?
        .split(delimiter)
        .nth(segment)
        .map(|s| s.trim().to_string())
}

pub struct OpportunityStage;

impl PipelineStage for OpportunityStage {
    fn name(&self) -> &'static str { "opportunity_classification" }

    fn describe(&self) -> &'static str { "classifying opportunity types" }

    fn run(&mut self, ctx: &mut RunContext<'_>) -> BonusResult<Vec<PipelineEvent>> {
        let config = ctx.config;
        let mut classified = 0usize;
        let mut target_matches = 0usize;

        for lead in &mut ctx.leads {
            lead.opportunity_type = classify_opportunity(
                lead.lead_name.as_deref(),
                config.opportunity_delimiter,
                config.opportunity_segment_index,
            );
            if lead.opportunity_type.is_some() {
                classified += 1;
            }
            if config.is_target_opportunity(lead.opportunity_type.as_deref()) {
                target_matches += 1;
            }
        }

        log::info!(
            "opportunity classification: {classified} classified, {target_matches} of a target type"
        );

        Ok(vec![PipelineEvent::OpportunitiesClassified { classified, target_matches }])
    }
}
