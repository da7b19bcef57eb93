//! The bonus engine — runs the pipeline once over two input tables.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   0. Loader                  (run_sources only)
//!   1. Name resolution
//!   2. Attribute join
//!   3. Opportunity classification
//!   4. Bonus aggregation       (engineer, planner)
//!   5. Region rank             (reads engineer bonus rows)
//!   6. Keyword tag aggregation
//!
//! RULES:
//!   - Stages execute in registration order, once per run.
//!   - The roster and config are read-only for the whole run.
//!   - Every stage outcome is recorded in the run's event log.
//!   - Nothing survives between runs except the registered stages.

use crate::{
    attribute_join_stage::AttributeJoinStage,
    bonus_stage::BonusStage,
    config::BonusConfig,
    error::BonusResult,
    event::{EventLogEntry, PipelineEvent, ProgressSink},
    lead::LeadRecord,
    loader::{self, InputSource, LeadLoad},
    name_resolution_stage::NameResolutionStage,
    opportunity_stage::OpportunityStage,
    region_rank_stage::RegionRankStage,
    report::{BonusReport, RunSummary},
    roster::Roster,
    stage::{PipelineStage, RunContext},
    tag_stage::TagStage,
    types::RunId,
};

const ENGINE_STAGE: &str = "engine";
const LOADER_STAGE: &str = "loader";

pub struct BonusEngine {
    pub run_id: RunId,
    config:     BonusConfig,
    stages:     Vec<Box<dyn PipelineStage>>,
    event_log:  Vec<EventLogEntry>,
}

impl BonusEngine {
    pub fn new(run_id: RunId, config: BonusConfig) -> Self {
        Self {
            run_id,
            config,
            stages: Vec::new(),
            event_log: Vec::new(),
        }
    }

    /// Build a fully wired engine with all stages registered.
    /// Call this instead of new() + manual register() calls.
    pub fn build(run_id: RunId, config: BonusConfig) -> BonusResult<Self> {
        config.validate()?;
        let mut engine = BonusEngine::new(run_id, config);

        // EXECUTION ORDER — fixed, documented, never reordered.
        engine.register(Box::new(NameResolutionStage));
        engine.register(Box::new(AttributeJoinStage));
        engine.register(Box::new(OpportunityStage));
        engine.register(Box::new(BonusStage));
        engine.register(Box::new(RegionRankStage));
        engine.register(Box::new(TagStage));
        Ok(engine)
    }

    /// Engine with the default rule set, for tests and examples.
    pub fn build_default(run_id: RunId) -> BonusResult<Self> {
        Self::build(run_id, BonusConfig::default())
    }

    /// Register a stage. Call in the documented execution order.
    pub fn register(&mut self, stage: Box<dyn PipelineStage>) {
        self.stages.push(stage);
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn config(&self) -> &BonusConfig {
        &self.config
    }

    /// Events of the most recent run, in emission order.
    pub fn event_log(&self) -> &[EventLogEntry] {
        &self.event_log
    }

    /// Load both inputs and run the pipeline.
    pub fn run_sources(
        &mut self,
        lead_source: &InputSource,
        roster_source: &InputSource,
        progress: &mut dyn ProgressSink,
    ) -> BonusResult<BonusReport> {
        self.event_log.clear();
        let total = self.stages.len() + 1;
        self.emit(ENGINE_STAGE, PipelineEvent::RunStarted {
            run_id: self.run_id.clone(),
            stages: total,
        }, progress)?;
        self.emit(LOADER_STAGE, PipelineEvent::StageStarted {
            stage: LOADER_STAGE.to_string(),
            step: 1,
            total,
        }, progress)?;

        let lead_load = loader::load_leads(&loader::read_table(lead_source)?)?;
        let roster = Roster::new(loader::load_roster(&loader::read_table(roster_source)?)?)?;
        log::info!(
            "loaded {} leads from '{}' and {} employees from '{}'",
            lead_load.leads.len(),
            lead_source.name,
            roster.len(),
            roster_source.name,
        );

        self.execute(lead_load, &roster, progress, 1)
    }

    /// Run the pipeline over already-loaded leads without progress reporting.
    pub fn run(&mut self, leads: Vec<LeadRecord>, roster: &Roster) -> BonusResult<BonusReport> {
        let load = LeadLoad { leads, unparseable_dates: 0 };
        self.run_with_progress(load, roster, &mut |_: &PipelineEvent| {})
    }

    pub fn run_with_progress(
        &mut self,
        leads: LeadLoad,
        roster: &Roster,
        progress: &mut dyn ProgressSink,
    ) -> BonusResult<BonusReport> {
        self.event_log.clear();
        self.emit(ENGINE_STAGE, PipelineEvent::RunStarted {
            run_id: self.run_id.clone(),
            stages: self.stages.len(),
        }, progress)?;
        self.execute(leads, roster, progress, 0)
    }

    /// Run every registered stage. `steps_done` counts steps already
    /// narrated before the first stage (the loader).
    fn execute(
        &mut self,
        load: LeadLoad,
        roster: &Roster,
        progress: &mut dyn ProgressSink,
        steps_done: usize,
    ) -> BonusResult<BonusReport> {
        let LeadLoad { leads, unparseable_dates } = load;
        self.emit(LOADER_STAGE, PipelineEvent::InputsLoaded {
            leads: leads.len(),
            employees: roster.len(),
            unparseable_dates,
        }, progress)?;

        let Self { run_id, config, stages, event_log } = self;
        let total = stages.len() + steps_done;
        let mut ctx = RunContext::new(config, roster, leads);

        for (idx, stage) in stages.iter_mut().enumerate() {
            let started = PipelineEvent::StageStarted {
                stage: stage.name().to_string(),
                step: steps_done + idx + 1,
                total,
            };
            append(event_log, run_id, stage.name(), &started)?;
            progress.on_event(&started);

            log::debug!("stage {}: {}", stage.name(), stage.describe());
            for event in stage.run(&mut ctx)? {
                append(event_log, run_id, stage.name(), &event)?;
                progress.on_event(&event);
            }
        }

        let summary = RunSummary::build(
            &ctx.leads,
            roster.len(),
            unparseable_dates,
            &ctx.engineer_bonus,
            &ctx.planner_bonus,
            &ctx.region_rank,
            &ctx.tag_aggregate,
        );
        let report = BonusReport {
            run_id:         run_id.clone(),
            engineer_bonus: ctx.engineer_bonus,
            planner_bonus:  ctx.planner_bonus,
            region_rank:    ctx.region_rank,
            tag_aggregate:  ctx.tag_aggregate,
            leads:          ctx.leads,
            summary,
        };

        self.emit(ENGINE_STAGE, PipelineEvent::RunCompleted {
            run_id: self.run_id.clone(),
        }, progress)?;
        Ok(report)
    }

    fn emit(
        &mut self,
        stage: &str,
        event: PipelineEvent,
        progress: &mut dyn ProgressSink,
    ) -> BonusResult<()> {
        append(&mut self.event_log, &self.run_id, stage, &event)?;
        progress.on_event(&event);
        Ok(())
    }
}

fn append(
    log: &mut Vec<EventLogEntry>,
    run_id: &str,
    stage: &str,
    event: &PipelineEvent,
) -> BonusResult<()> {
    log.push(EventLogEntry {
        seq:        log.len() as u64,
        run_id:     run_id.to_string(),
        stage:      stage.to_string(),
        event_type: event.event_type().to_string(),
        payload:    serde_json::to_string(event)?,
    });
    Ok(())
}
