//! Typed reference from a notification to the record that triggered it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::id::{InvoiceId, MilestoneId, ProjectId, ServiceId, TaskId, TimeEntryId};

/// The closed set of record kinds a notification may point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Project,
    Milestone,
    Task,
    Service,
    Invoice,
    TimeEntry,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Milestone => "milestone",
            Self::Task => "task",
            Self::Service => "service",
            Self::Invoice => "invoice",
            Self::TimeEntry => "time_entry",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entity kind: {0}")]
pub struct UnknownEntityKind(pub String);

impl FromStr for EntityKind {
    type Err = UnknownEntityKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project" => Ok(Self::Project),
            "milestone" => Ok(Self::Milestone),
            "task" => Ok(Self::Task),
            "service" => Ok(Self::Service),
            "invoice" => Ok(Self::Invoice),
            "time_entry" => Ok(Self::TimeEntry),
            other => Err(UnknownEntityKind(other.to_owned())),
        }
    }
}

/// A reference to one record, tagged with its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EntityRef {
    Project(ProjectId),
    Milestone(MilestoneId),
    Task(TaskId),
    Service(ServiceId),
    Invoice(InvoiceId),
    TimeEntry(TimeEntryId),
}

impl EntityRef {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Project(_) => EntityKind::Project,
            Self::Milestone(_) => EntityKind::Milestone,
            Self::Task(_) => EntityKind::Task,
            Self::Service(_) => EntityKind::Service,
            Self::Invoice(_) => EntityKind::Invoice,
            Self::TimeEntry(_) => EntityKind::TimeEntry,
        }
    }

    /// The raw integer key, as stored next to the kind column.
    pub fn raw_id(&self) -> i32 {
        match self {
            Self::Project(id) => id.0,
            Self::Milestone(id) => id.0,
            Self::Task(id) => id.0,
            Self::Service(id) => id.0,
            Self::Invoice(id) => id.0,
            Self::TimeEntry(id) => id.0,
        }
    }

    pub fn from_parts(kind: EntityKind, id: i32) -> Self {
        match kind {
            EntityKind::Project => Self::Project(ProjectId(id)),
            EntityKind::Milestone => Self::Milestone(MilestoneId(id)),
            EntityKind::Task => Self::Task(TaskId(id)),
            EntityKind::Service => Self::Service(ServiceId(id)),
            EntityKind::Invoice => Self::Invoice(InvoiceId(id)),
            EntityKind::TimeEntry => Self::TimeEntry(TimeEntryId(id)),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind(), self.raw_id())
    }
}
