//! Name resolution — who submitted each lead.
//!
//! The identity is pulled out of the free-text `Notes` field, in strict
//! priority order:
//!   1. The first email address in the text, if the roster knows it.
//!      The roster row's `NameEN` is the identity.
//!   2. An employee code followed by a name, e.g. `CN12345AB - caifeng yang`.
//!      The name is re-cased word by word: `Caifeng Yang`.
//!   3. Nothing.
//!
//! An email that is found in the roster settles the question even when the
//! text also carries a code/name pair.

use crate::{
    error::BonusResult,
    event::PipelineEvent,
    roster::Roster,
    stage::{PipelineStage, RunContext},
};
use once_cell::sync::Lazy;
use regex::Regex;

static RE_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap());

static RE_CODE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z]{2}\d{5}[A-Z]{0,2}\s*-\s*([A-Za-z\s]+)").unwrap());

/// Resolve the employee behind one lead's notes.
pub fn resolve_employee(notes: Option<&str>, roster: &Roster) -> Option<String> {
    let text = notes?;

    if let Some(found) = RE_EMAIL.find(text) {
        let email = found.as_str().to_lowercase();
        if let Some(employee) = roster.by_email(email.trim()) {
            return employee.name_en.clone();
        }
    }

    let captures = RE_CODE_NAME.captures(text)?;
    let name = normalize_name(captures.get(1)?.as_str());
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// `"  caifeng   YANG "` -> `"Caifeng Yang"`.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub struct NameResolutionStage;

impl PipelineStage for NameResolutionStage {
    fn name(&self) -> &'static str { "name_resolution" }

    fn describe(&self) -> &'static str { "extracting employee names from notes" }

    fn run(&mut self, ctx: &mut RunContext<'_>) -> BonusResult<Vec<PipelineEvent>> {
        let roster = ctx.roster;
        let mut matched = 0usize;

        for lead in &mut ctx.leads {
            lead.employee_name = resolve_employee(lead.notes.as_deref(), roster);
            if lead.employee_name.is_some() {
                matched += 1;
            }
        }

        let total = ctx.leads.len();
        let match_rate_pct = if total > 0 {
            matched as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        log::info!("name resolution: {matched}/{total} leads matched ({match_rate_pct:.1}%)");

        Ok(vec![PipelineEvent::NamesResolved {
            matched,
            total,
            match_rate_pct,
        }])
    }
}
