//! Domain records: tasks, candidates, decisions, and wire messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Caller-assigned task identifier.
pub type TaskId = i64;
/// Candidate (user) identifier.
pub type CandidateId = i64;
/// Owning project identifier.
pub type ProjectId = i64;

/// A work item awaiting assignment. Lives for one decision only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Task identifier.
    pub id: TaskId,
    /// Non-empty title.
    pub title: String,
    /// Free text.
    pub description: String,
    /// Raw priority; scoring clamps it into `[1, 5]`.
    pub priority: i32,
    /// Owning project.
    pub project_id: ProjectId,
    /// Required skill tags; empty means no constraint.
    pub skills: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Role of a candidate record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Administrators never receive work.
    Admin,
    /// Managers never receive work.
    Manager,
    /// Regular users are assignable.
    #[serde(alias = "User")]
    User,
}

/// Assignee pool member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Candidate identifier.
    pub id: CandidateId,
    /// Display name.
    pub name: String,
    /// Contact address.
    #[serde(default)]
    pub email: String,
    /// Role marker.
    pub role: Role,
    /// Skill tags.
    #[serde(default)]
    pub skills: Vec<String>,
    /// Count of open work items.
    #[serde(default)]
    pub current_load: u32,
    /// Maximum simultaneous open work items; zero accepts nothing.
    pub capacity: u32,
    /// Soft-deletion timestamp.
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Candidate {
    /// Create an assignable candidate with no load.
    pub fn new(id: CandidateId, name: impl Into<String>, capacity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            email: String::new(),
            role: Role::User,
            skills: Vec::new(),
            current_load: 0,
            capacity,
            deleted_at: None,
        }
    }

    /// Replace the skill tags.
    #[must_use]
    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    /// Set the current load.
    #[must_use]
    pub const fn with_load(mut self, current_load: u32) -> Self {
        self.current_load = current_load;
        self
    }

    /// Set the role.
    #[must_use]
    pub const fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Only non-deleted users may receive work.
    #[must_use]
    pub const fn is_eligible(&self) -> bool {
        matches!(self.role, Role::User) && self.deleted_at.is_none()
    }
}

/// Scored outcome for one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentResult {
    /// Candidate identifier.
    pub candidate_id: CandidateId,
    /// Candidate display name.
    pub candidate_name: String,
    /// Weighted total in `[0.04, 1.0]`.
    pub total_score: f64,
    /// Skill overlap in `[0, 1]`.
    pub skill_score: f64,
    /// Spare capacity in `[0, 1]`.
    pub load_score: f64,
    /// Priority term in `[0.2, 1.0]`.
    pub priority_bonus: f64,
    /// Audit summary consumed downstream.
    pub rationale: String,
}

/// Inbound task-creation notification.
///
/// Missing or `null` fields decode as their zero value; validation decides
/// which of those are defects. A missing `created_at` is stamped at conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCreatedEvent {
    /// Task identifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub task_id: TaskId,
    /// Task title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Task description.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Raw priority.
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: i32,
    /// Owning project.
    #[serde(default, deserialize_with = "null_as_default")]
    pub project_id: ProjectId,
    /// Required skills.
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    /// Creation timestamp, if the producer sent one.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl TaskCreatedEvent {
    /// Convert the wire message into a domain task.
    #[must_use]
    pub fn into_task(self) -> Task {
        Task {
            id: self.task_id,
            title: self.title,
            description: self.description,
            priority: self.priority,
            project_id: self.project_id,
            skills: self.skills,
            created_at: self.created_at.unwrap_or_else(Utc::now),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Outbound notification that a task was assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskAssignedEvent {
    /// Task identifier.
    pub task_id: TaskId,
    /// Chosen candidate.
    pub assignee_id: CandidateId,
    /// Winning total score.
    pub score: f64,
    /// Winning rationale.
    pub reason: String,
    /// Decision timestamp.
    pub assigned_at: DateTime<Utc>,
}

impl TaskAssignedEvent {
    /// Build the outbound event for a decision made at `assigned_at`.
    #[must_use]
    pub fn from_result(task_id: TaskId, result: &AssignmentResult, assigned_at: DateTime<Utc>) -> Self {
        Self {
            task_id,
            assignee_id: result.candidate_id,
            score: result.total_score,
            reason: result.rationale.clone(),
            assigned_at,
        }
    }
}
