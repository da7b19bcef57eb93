//! Attribute join — attach manager, job title and regions from the roster.
//!
//! Leads whose employee is unknown, or who have no employee at all, keep
//! all four attributes empty. They stay in the table: the keyword tag
//! aggregation still counts them.

use crate::{
    error::BonusResult,
    event::PipelineEvent,
    lead::LeadRecord,
    roster::{EmployeeAttributes, Roster},
    stage::{PipelineStage, RunContext},
};

/// Fill the roster attributes of one lead. Returns whether a roster row
/// was found.
pub fn join_attributes(lead: &mut LeadRecord, roster: &Roster) -> bool {
    let attributes = lead
        .employee_name
        .as_deref()
        .and_then(|name| roster.attributes(name));
    let found = attributes.is_some();
    let EmployeeAttributes { manager, job_title, region8, subregion29 } =
        attributes.unwrap_or_default();

    lead.manager = manager;
    lead.job_title = job_title;
    lead.region8 = region8;
    lead.subregion29 = subregion29;
    found
}

pub struct AttributeJoinStage;

impl PipelineStage for AttributeJoinStage {
    fn name(&self) -> &'static str { "attribute_join" }

    fn describe(&self) -> &'static str { "matching region and role attributes" }

    fn run(&mut self, ctx: &mut RunContext<'_>) -> BonusResult<Vec<PipelineEvent>> {
        let roster = ctx.roster;
        let mut joined = 0usize;
        let mut unmatched_names = 0usize;

        for lead in &mut ctx.leads {
            if join_attributes(lead, roster) {
                joined += 1;
            } else if lead.employee_name.is_some() {
                unmatched_names += 1;
            }
        }

        if unmatched_names > 0 {
            log::debug!("{unmatched_names} resolved names are not in the roster");
        }
        log::info!("attribute join: {joined} leads joined to the roster");

        Ok(vec![PipelineEvent::AttributesJoined { joined, unmatched_names }])
    }
}
