//! Pipeline events — the progress narration of a run.
//!
//! Every stage reports what it did by returning events. The engine appends
//! them to the run's event log and forwards them to the caller's
//! `ProgressSink`, if any. Stages never print.

use crate::types::{RoleCategory, RunId};
use serde::{Deserialize, Serialize};

/// Every event emitted during a run.
/// Variants are appended — never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    // ── Engine events ──────────────────────────────
    RunStarted {
        run_id: RunId,
        stages: usize,
    },
    InputsLoaded {
        leads: usize,
        employees: usize,
        unparseable_dates: usize,
    },
    StageStarted {
        stage: String,
        step: usize,
        total: usize,
    },
    RunCompleted {
        run_id: RunId,
    },

    // ── Stage events ───────────────────────────────
    NamesResolved {
        matched: usize,
        total: usize,
        match_rate_pct: f64,
    },
    AttributesJoined {
        joined: usize,
        unmatched_names: usize,
    },
    OpportunitiesClassified {
        classified: usize,
        target_matches: usize,
    },
    BonusComputed {
        role: RoleCategory,
        rows: usize,
        employees: usize,
        submitted: u64,
        converted: u64,
        bonus: u64,
        dropped_missing_region: usize,
    },
    RegionsRanked {
        subregions: usize,
        top_subregion: Option<String>,
        top_bonus: u64,
    },
    TagsAggregated {
        tagged_records: usize,
        regions: usize,
    },
}

impl PipelineEvent {
    /// Stable string name of the variant, used for the event log.
    pub fn event_type(&self) -> &'static str {
        match self {
            PipelineEvent::RunStarted { .. }              => "run_started",
            PipelineEvent::InputsLoaded { .. }            => "inputs_loaded",
            PipelineEvent::StageStarted { .. }            => "stage_started",
            PipelineEvent::RunCompleted { .. }            => "run_completed",
            PipelineEvent::NamesResolved { .. }           => "names_resolved",
            PipelineEvent::AttributesJoined { .. }        => "attributes_joined",
            PipelineEvent::OpportunitiesClassified { .. } => "opportunities_classified",
            PipelineEvent::BonusComputed { .. }           => "bonus_computed",
            PipelineEvent::RegionsRanked { .. }           => "regions_ranked",
            PipelineEvent::TagsAggregated { .. }          => "tags_aggregated",
        }
    }
}

/// One row of a run's event log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventLogEntry {
    pub seq:        u64,
    pub run_id:     RunId,
    pub stage:      String,
    pub event_type: String,
    pub payload:    String,
}

/// Receives events as they happen. Closures taking `&PipelineEvent`
/// implement it directly.
pub trait ProgressSink {
    fn on_event(&mut self, event: &PipelineEvent);
}

impl<F: FnMut(&PipelineEvent)> ProgressSink for F {
    fn on_event(&mut self, event: &PipelineEvent) {
        self(event)
    }
}

