//! Stage trait and the per-run context the stages share.
//!
//! RULE: Every pipeline step implements PipelineStage.
//! The engine calls run() on each registered stage exactly once,
//! in registration order. Execution order is fixed in engine.rs.

use crate::{
    bonus_stage::BonusRow,
    config::BonusConfig,
    error::BonusResult,
    event::PipelineEvent,
    lead::LeadRecord,
    region_rank_stage::RegionRankRow,
    roster::Roster,
    tag_stage::TagAggregateRow,
};

/// Everything one run owns. Built fresh per run and dropped with it.
///
/// - `config` and `roster` are read-only for the whole run.
/// - `leads` is enriched in place by the early stages.
/// - the output tables start empty and are filled by the later stages.
pub struct RunContext<'a> {
    pub config:          &'a BonusConfig,
    pub roster:          &'a Roster,
    pub leads:           Vec<LeadRecord>,
    pub engineer_bonus:  Vec<BonusRow>,
    pub planner_bonus:   Vec<BonusRow>,
    pub region_rank:     Vec<RegionRankRow>,
    pub tag_aggregate:   Vec<TagAggregateRow>,
}

impl<'a> RunContext<'a> {
    pub fn new(config: &'a BonusConfig, roster: &'a Roster, leads: Vec<LeadRecord>) -> Self {
        Self {
            config,
            roster,
            leads,
            engineer_bonus: Vec::new(),
            planner_bonus:  Vec::new(),
            region_rank:    Vec::new(),
            tag_aggregate:  Vec::new(),
        }
    }
}

/// The contract every stage must fulfill.
pub trait PipelineStage {
    /// Unique stable name for this stage.
    fn name(&self) -> &'static str;

    /// One-line description used for progress narration.
    fn describe(&self) -> &'static str;

    /// Called once per run by the engine.
    ///
    /// Returns the events describing what the stage did.
    fn run(&mut self, ctx: &mut RunContext<'_>) -> BonusResult<Vec<PipelineEvent>>;
}
