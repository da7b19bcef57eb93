use crate::{
    error::{BonusError, BonusResult},
    types::RoleCategory,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound for either per-lead rate.
pub const MAX_RATE: u64 = 1_000_000;

/// Every adjustable rule of the bonus computation.
///
/// Loaded from `data/bonus_rules.json` by the runner. Any field left out of
/// the file keeps its default value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BonusConfig {
    /// Paid per submitted lead.
    pub submission_bonus: u64,
    /// Paid per converted lead of a target opportunity type.
    pub conversion_bonus: u64,
    pub engineer_titles: Vec<String>,
    pub planner_titles: Vec<String>,
    pub target_opportunity_types: Vec<String>,
    /// Marker substring for the secondary tag table.
    pub keyword: String,
    /// `Lead Status` value that counts as a conversion.
    pub converted_status: String,
    /// Region label used in the tag table when a record has no region.
    pub unassigned_region_label: String,
    pub opportunity_delimiter: char,
    /// Zero-based segment of the lead name holding the opportunity type.
    pub opportunity_segment_index: usize,
}

impl Default for BonusConfig {
    fn default() -> Self {
        Self {
            submission_bonus: 20,
            conversion_bonus: 100,
            engineer_titles: strings(&[
                "Service Supervisor",
                "Service Engineer",
                "Service Manager",
                "Service Supervisor-Marine",
                "Senior Service Engineer",
            ]),
            planner_titles: strings(&[
                "Planner",
                "Senior Planner",
                "Planning Manager",
                "Planner - Cross Border",
                "Service Planning Center Supervisor",
            ]),
            target_opportunity_types: strings(&[
                "ABB变频器",
                "FP转子大修商机",
                "MAM2 Element Exchange/D Visit/E Visit",
                "MAM2 Optimization+Upgrades",
                "转子大修商机",
                "高级产品商机",
                "集控产品",
            ]),
            keyword: "管道过滤器".into(),
            converted_status: "converted".into(),
            unassigned_region_label: "未分配".into(),
            opportunity_delimiter: '-',
            opportunity_segment_index: 2,
        }
    }
}

impl BonusConfig {
    /// Load a rules file. Fields absent from the file fall back to
    /// `BonusConfig::default()`.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: BonusConfig = serde_json::from_str(&content)?;
        config.validate()?;
        log::debug!("Loaded bonus rules from {}", path.display());
        Ok(config)
    }

    /// Reject rule sets the aggregation cannot work with.
    pub fn validate(&self) -> BonusResult<()> {
        if self.engineer_titles.is_empty() {
            return Err(BonusError::InvalidConfig("engineer_titles is empty".into()));
        }
        if self.planner_titles.is_empty() {
            return Err(BonusError::InvalidConfig("planner_titles is empty".into()));
        }
        if let Some(shared) = self
            .engineer_titles
            .iter()
            .find(|t| self.planner_titles.contains(t))
        {
            return Err(BonusError::InvalidConfig(format!(
                "job title '{shared}' is listed as both engineer and planner"
            )));
        }
        for (field, rate) in [
            ("submission_bonus", self.submission_bonus),
            ("conversion_bonus", self.conversion_bonus),
        ] {
            if rate > MAX_RATE {
                return Err(BonusError::InvalidConfig(format!(
                    "{field} {rate} exceeds the maximum of {MAX_RATE}"
                )));
            }
        }
        if self.keyword.is_empty() {
            return Err(BonusError::InvalidConfig("keyword is empty".into()));
        }
        Ok(())
    }

    pub fn titles(&self, role: RoleCategory) -> &[String] {
        match role {
            RoleCategory::Engineer => &self.engineer_titles,
            RoleCategory::Planner  => &self.planner_titles,
        }
    }

    /// Whether `job_title` belongs to `role`. Exact string match.
    pub fn has_title(&self, role: RoleCategory, job_title: Option<&str>) -> bool {
        match job_title {
            Some(title) => self.titles(role).iter().any(|t| t == title),
            None => false,
        }
    }

    pub fn is_target_opportunity(&self, opportunity_type: Option<&str>) -> bool {
        match opportunity_type {
            Some(kind) => self.target_opportunity_types.iter().any(|t| t == kind),
            None => false,
        }
    }

    /// Saturates instead of overflowing for unvalidated rates.
    pub fn bonus_amount(&self, submitted: u64, converted: u64) -> u64 {
        submitted
            .saturating_mul(self.submission_bonus)
            .saturating_add(converted.saturating_mul(self.conversion_bonus))
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
