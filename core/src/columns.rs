//! Column names the two input tables must carry.

pub const LEAD_TABLE: &str = "lead";
pub const ROSTER_TABLE: &str = "roster";

pub const NOTES: &str = "Notes";
pub const LEAD_NAME: &str = "Lead Name";
pub const LEAD_STATUS: &str = "Lead Status";
pub const LEADS_CREATED_ON: &str = "Leads Created On";

pub const NAME_EN: &str = "NameEN";
pub const JOB_TITLE: &str = "JobTitle";
pub const EMAIL_ADDRESS: &str = "EmailAddress";
pub const REGION8: &str = "八大区";
pub const SUBREGION29: &str = "29小区";
pub const MANAGER: &str = "Manager";

pub const REQUIRED_LEAD_COLUMNS: [&str; 4] = [NOTES, LEAD_NAME, LEAD_STATUS, LEADS_CREATED_ON];

pub const REQUIRED_ROSTER_COLUMNS: [&str; 6] =
    [NAME_EN, JOB_TITLE, EMAIL_ADDRESS, REGION8, SUBREGION29, MANAGER];
