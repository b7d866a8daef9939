//! Common types used throughout redmine-scroll
//!
//! Entity kinds, the entity schemas returned by the Redmine REST API and a
//! few shared enums.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Entity Kind
// ============================================================================

/// The closed set of collections the client can scroll over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Project,
    Issue,
    TimeEntry,
}

impl EntityKind {
    /// Endpoint path relative to the API base url
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Project => "/projects.json",
            Self::Issue => "/issues.json",
            Self::TimeEntry => "/time_entries.json",
        }
    }

    /// Top-level JSON key holding the item list of a page
    pub fn collection_key(self) -> &'static str {
        match self {
            Self::Project => "projects",
            Self::Issue => "issues",
            Self::TimeEntry => "time_entries",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection_key())
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff between retries of a failed page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

// ============================================================================
// Date
// ============================================================================

/// Calendar date in the `YYYY-MM-DD` form Redmine uses on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(pub NaiveDate);

impl Date {
    /// Wire format of dates
    pub const FORMAT: &'static str = "%Y-%m-%d";

    /// Parse a `YYYY-MM-DD` string
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}

impl FromStr for Date {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, Self::FORMAT).map(Self)
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

// ============================================================================
// Entities
// ============================================================================

/// A Redmine project
///
/// Nested project references (inside issues and time entries) only carry
/// `id` and `name`, the remaining fields fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub identifier: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    pub is_public: bool,
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<5} {} {}", self.id, self.identifier, self.name)
    }
}

/// A Redmine issue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Issue {
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub subject: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    pub project: Project,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<5} {} {}", self.id, self.project.name, self.subject)
    }
}

/// A Redmine user reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

/// A Redmine time entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: u64,
    #[serde(default)]
    pub project: Project,
    #[serde(default)]
    pub issue: Issue,
    #[serde(default)]
    pub user: User,
    #[serde(default)]
    pub hours: f32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: String,
    pub spent_on: Date,
}

impl fmt::Display for TimeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<5} {:5.2} {} {:<15} {}",
            self.issue.id, self.hours, self.spent_on, self.user.name, self.comments
        )
    }
}

/// Redmine sends `null` for unset text fields
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
