//! Column role inference.
//!
//! Timetable exports name their columns however they like ("Instructor Name",
//! "Teacher", "Session Time (hrs)", "UG/PG"...). Each logical [`Role`] is
//! resolved by an ordered keyword rule: the first column whose lower-cased
//! name contains any keyword wins.

use serde::Serialize;

use crate::error::{TableError, TableResult};
use crate::logs::log_info;

/// Logical purpose of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Faculty,
    Duration,
    Level,
}

/// Keyword rule for one role.
#[derive(Debug, Clone, Copy)]
pub struct RoleRule {
    pub role: Role,
    pub keywords: &'static [&'static str],
}

/// Rules in evaluation order.
pub const ROLE_RULES: &[RoleRule] = &[
    RoleRule {
        role: Role::Faculty,
        keywords: &["faculty", "teacher", "instructor", "professor"],
    },
    RoleRule {
        role: Role::Duration,
        keywords: &["duration", "hours", "time"],
    },
    RoleRule {
        role: Role::Level,
        keywords: &["level", "ug/pg", "program", "degree"],
    },
];

/// A physical column: position and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnRef {
    pub index: usize,
    pub name: String,
}

/// Resolved role → column mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnRoles {
    pub faculty: ColumnRef,
    pub duration: Option<ColumnRef>,
    pub level: Option<ColumnRef>,
}

impl RoleRule {
    /// First column whose lower-cased name contains one of the keywords.
    pub fn find<S: AsRef<str>>(&self, headers: &[S]) -> Option<ColumnRef> {
        headers.iter().enumerate().find_map(|(index, name)| {
            let lowered = name.as_ref().to_lowercase();
            self.keywords
                .iter()
                .any(|k| lowered.contains(k))
                .then(|| ColumnRef {
                    index,
                    name: name.as_ref().to_string(),
                })
        })
    }
}

fn rule_for(role: Role) -> &'static RoleRule {
    // ROLE_RULES lists every role
    ROLE_RULES
        .iter()
        .find(|r| r.role == role)
        .unwrap_or(&ROLE_RULES[0])
}

/// Resolve column roles from the ordered header names.
///
/// The faculty role falls back to the first column, so only a table with no
/// columns fails.
pub fn resolve_roles<S: AsRef<str>>(headers: &[S]) -> TableResult<ColumnRoles> {
    let first = headers.first().ok_or(TableError::NoColumns)?;

    let faculty = rule_for(Role::Faculty).find(headers).unwrap_or_else(|| ColumnRef {
        index: 0,
        name: first.as_ref().to_string(),
    });
    let duration = rule_for(Role::Duration).find(headers);
    let level = rule_for(Role::Level).find(headers);

    let roles = ColumnRoles { faculty, duration, level };
    log_info(format!(
        "Academic Analysis: Faculty={}, Level={}",
        roles.faculty.name,
        roles.level.as_ref().map(|c| c.name.as_str()).unwrap_or("None")
    ));

    Ok(roles)
}
