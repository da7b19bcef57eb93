//! One row of the lead/activity export, plus everything the pipeline
//! derives for it.

use crate::{date, types::MonthLabel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LeadRecord {
    // ── Raw fields ────────────────────────────────
    pub notes:       Option<String>,
    pub lead_name:   Option<String>,
    pub lead_status: Option<String>,
    pub created_on:  Option<NaiveDate>,

    // ── Derived by the pipeline ───────────────────
    pub employee_name:    Option<String>,
    pub manager:          Option<String>,
    pub job_title:        Option<String>,
    pub region8:          Option<String>,
    pub subregion29:      Option<String>,
    pub opportunity_type: Option<String>,
    pub has_keyword_tag:  bool,
}

impl LeadRecord {
    pub fn new(
        notes: Option<String>,
        lead_name: Option<String>,
        lead_status: Option<String>,
        created_on: Option<NaiveDate>,
    ) -> Self {
        Self {
            notes,
            lead_name,
            lead_status,
            created_on,
            ..Self::default()
        }
    }

    /// `YYYY-MM` bucket of the creation date; `None` for a missing date.
    pub fn month(&self) -> Option<MonthLabel> {
        date::month_label(self.created_on)
    }
}
