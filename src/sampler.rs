//! Weighted random choice.
//!
//! Used by the simulation features ("quiz me on a random topic") and by
//! the planner's rotation tie-break. The RNG is always an explicit
//! parameter so behavior is reproducible under a seeded generator.

use std::collections::HashSet;

use rand::Rng;

use crate::types::{Topic, TopicStatus};

/// Numerical stability: minimum positive weight sum.
const EPSILON: f64 = 1e-10;

/// Damping for topics already picked this session. Repetition is
/// discouraged, never impossible: small pools must stay drawable.
const SESSION_DAMPING: f64 = 0.5;

/// Boost for topics whose last diagnostic score was below this bar.
const LOW_SCORE_BAR: f64 = 50.0;
const LOW_SCORE_BOOST: f64 = 3.0;

/// Pick one candidate with probability proportional to its weight.
///
/// Negative weights are floored at zero. When every weight is zero the
/// draw falls back to uniform, so a non-empty input always yields a
/// candidate.
///
/// # Panics
///
/// Panics if `candidates` is empty. Non-empty input is the caller's
/// documented precondition.
pub fn pick<'a, T, F, R>(candidates: &'a [T], weight_fn: F, rng: &mut R) -> &'a T
where
    F: Fn(&T) -> f64,
    R: Rng + ?Sized,
{
    assert!(!candidates.is_empty(), "pick requires a non-empty candidate set");

    let weights: Vec<f64> = candidates.iter().map(|c| weight_fn(c).max(0.0)).collect();
    let total: f64 = weights.iter().sum();

    if total <= EPSILON {
        return &candidates[rng.gen_range(0..candidates.len())];
    }

    let r = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    for (candidate, weight) in candidates.iter().zip(&weights) {
        cumulative += weight;
        if cumulative > r {
            return candidate;
        }
    }
    // Float accumulation can land r on the far edge; the last candidate
    // owns that sliver.
    &candidates[candidates.len() - 1]
}

fn status_base_weight(status: TopicStatus) -> f64 {
    match status {
        TopicStatus::Gray => 4.0,
        TopicStatus::Yellow => 3.0,
        TopicStatus::Orange => 2.0,
        TopicStatus::Green => 1.0,
    }
}

/// Default preference for the topic draw: weaker label and weaker last
/// diagnostic pull harder, topics already picked this session are damped.
pub fn topic_weight(topic: &Topic, session_picked: &HashSet<String>) -> f64 {
    let mut weight = status_base_weight(topic.status);
    if topic.last_diagnostic_score.is_some_and(|s| s < LOW_SCORE_BAR) {
        weight += LOW_SCORE_BOOST;
    }
    if session_picked.contains(&topic.id) {
        weight *= SESSION_DAMPING;
    }
    weight
}

/// Draw one topic for a simulation or diagnostic session.
pub fn pick_study_topic<'a, R>(
    topics: &'a [Topic],
    session_picked: &HashSet<String>,
    rng: &mut R,
) -> Option<&'a Topic>
where
    R: Rng + ?Sized,
{
    if topics.is_empty() {
        return None;
    }
    Some(pick(topics, |t| topic_weight(t, session_picked), rng))
}
