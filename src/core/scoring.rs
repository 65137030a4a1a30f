//! Candidate scoring and selection.
//!
//! Pure computation: no I/O, no clock, no randomness. Each candidate gets
//!
//! ```text
//! total = 0.4 * skill + 0.4 * load + 0.2 * priority
//! ```
//!
//! and the highest total wins, ties going to the earlier candidate in the
//! snapshot.

use crate::core::error::AssignmentError;
use crate::core::model::{AssignmentResult, Candidate, Task};

/// Weight of the skill overlap term.
pub const SKILL_WEIGHT: f64 = 0.4;
/// Weight of the spare capacity term.
pub const LOAD_WEIGHT: f64 = 0.4;
/// Weight of the priority term.
pub const PRIORITY_WEIGHT: f64 = 0.2;

const MIN_PRIORITY: i32 = 1;
const MAX_PRIORITY: i32 = 5;

/// Fraction of required skills the candidate holds, matched case-insensitively.
///
/// An empty requirement list matches everyone.
#[must_use]
pub fn skill_score(candidate_skills: &[String], required: &[String]) -> f64 {
    if required.is_empty() {
        return 1.0;
    }

    let held: Vec<String> = candidate_skills.iter().map(|s| s.to_lowercase()).collect();
    let matched = required
        .iter()
        .filter(|req| {
            let req = req.to_lowercase();
            held.iter().any(|have| *have == req)
        })
        .count();

    count_as_f64(matched) / count_as_f64(required.len())
}

/// Linear preference for idle candidates; saturated or zero-capacity maps to 0.
#[must_use]
pub fn load_score(current_load: u32, capacity: u32) -> f64 {
    if capacity == 0 || current_load >= capacity {
        return 0.0;
    }
    1.0 - f64::from(current_load) / f64::from(capacity)
}

/// Priority clamped into `[1, 5]` and scaled to `[0.2, 1.0]`.
#[must_use]
pub fn priority_bonus(priority: i32) -> f64 {
    f64::from(priority.clamp(MIN_PRIORITY, MAX_PRIORITY)) / f64::from(MAX_PRIORITY)
}

/// Score a single candidate against a task.
#[must_use]
pub fn score_candidate(task: &Task, candidate: &Candidate) -> AssignmentResult {
    let skill = skill_score(&candidate.skills, &task.skills);
    let load = load_score(candidate.current_load, candidate.capacity);
    let priority = priority_bonus(task.priority);
    let total = SKILL_WEIGHT * skill + LOAD_WEIGHT * load + PRIORITY_WEIGHT * priority;

    AssignmentResult {
        candidate_id: candidate.id,
        candidate_name: candidate.name.clone(),
        total_score: total,
        skill_score: skill,
        load_score: load,
        priority_bonus: priority,
        rationale: format!(
            "Skill match: {:.0}%, Load: {}/{}, Priority: {}",
            skill * 100.0,
            candidate.current_load,
            candidate.capacity,
            task.priority
        ),
    }
}

/// Score every candidate and order them best first.
///
/// The sort is stable, so equal totals keep snapshot order.
#[must_use]
pub fn rank_candidates(task: &Task, candidates: &[Candidate]) -> Vec<AssignmentResult> {
    let mut ranked: Vec<AssignmentResult> = candidates
        .iter()
        .map(|candidate| score_candidate(task, candidate))
        .collect();
    ranked.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
    ranked
}

/// Pick the best-fit candidate for a task.
///
/// # Errors
///
/// Returns [`AssignmentError::NoEligibleCandidates`] when `candidates` is empty.
pub fn select_best(task: &Task, candidates: &[Candidate]) -> Result<AssignmentResult, AssignmentError> {
    rank_candidates(task, candidates)
        .into_iter()
        .next()
        .ok_or(AssignmentError::NoEligibleCandidates)
}

#[allow(clippy::cast_precision_loss)]
fn count_as_f64(n: usize) -> f64 {
    n as f64
}
