//! FSE bonus computation core.
//!
//! Turns a lead/activity export and an employee roster into the engineer
//! bonus, planner bonus, region rank and keyword tag tables. See `engine`
//! for the fixed stage order.

pub mod attribute_join_stage;
pub mod bonus_stage;
pub mod columns;
pub mod config;
pub mod date;
pub mod engine;
pub mod error;
pub mod event;
pub mod export;
pub mod lead;
pub mod loader;
pub mod name_resolution_stage;
pub mod opportunity_stage;
pub mod region_rank_stage;
pub mod report;
pub mod roster;
pub mod stage;
pub mod table;
pub mod tag_stage;
pub mod types;
