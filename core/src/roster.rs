//! Employee roster and its lookup indexes.
//!
//! The indexes are built once per run and never mutated afterwards;
//! every stage borrows the roster read-only.

use crate::error::{BonusError, BonusResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EmployeeRecord {
    pub name_en:       Option<String>,
    pub job_title:     Option<String>,
    pub email_address: Option<String>,
    pub manager:       Option<String>,
    pub region8:       Option<String>,
    pub subregion29:   Option<String>,
}

/// The roster attributes attached to a lead once its employee is known.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EmployeeAttributes {
    pub manager:     Option<String>,
    pub job_title:   Option<String>,
    pub region8:     Option<String>,
    pub subregion29: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    employees: Vec<EmployeeRecord>,
    by_name:   HashMap<String, usize>,
    /// Lowercased email -> first row carrying it.
    by_email:  HashMap<String, usize>,
}

impl Roster {
    /// Index the roster. Names must be unique; rows without a name are
    /// still reachable by email.
    pub fn new(employees: Vec<EmployeeRecord>) -> BonusResult<Self> {
        let mut by_name = HashMap::with_capacity(employees.len());
        let mut by_email = HashMap::with_capacity(employees.len());

        for (idx, employee) in employees.iter().enumerate() {
            if let Some(name) = &employee.name_en {
                if by_name.insert(name.clone(), idx).is_some() {
                    return Err(BonusError::DuplicateEmployee { name: name.clone() });
                }
            }
            if let Some(email) = &employee.email_address {
                by_email.entry(email.to_lowercase()).or_insert(idx);
            }
        }

        Ok(Self { employees, by_name, by_email })
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn employees(&self) -> &[EmployeeRecord] {
        &self.employees
    }

    /// First roster row whose email equals `email`, ignoring case.
    pub fn by_email(&self, email: &str) -> Option<&EmployeeRecord> {
        self.by_email
            .get(&email.to_lowercase())
            .map(|&idx| &self.employees[idx])
    }

    /// Exact, case-sensitive lookup by `NameEN`.
    pub fn by_name(&self, name: &str) -> Option<&EmployeeRecord> {
        self.by_name.get(name).map(|&idx| &self.employees[idx])
    }

    pub fn attributes(&self, name: &str) -> Option<EmployeeAttributes> {
        self.by_name(name).map(|e| EmployeeAttributes {
            manager:     e.manager.clone(),
            job_title:   e.job_title.clone(),
            region8:     e.region8.clone(),
            subregion29: e.subregion29.clone(),
        })
    }
}
