//! FSRS-style memory model.
//!
//! Per-topic spaced-repetition state and forgetting-curve math:
//! - Retrievability: `R = (1 + FACTOR * t / S) ^ DECAY`
//! - Scheduled interval: `t = S / FACTOR * (R_target ^ (1 / DECAY) - 1)`
//! - Review transition: stability/difficulty update driven by a 4-level
//!   rating derived from the app's 2..=6 grade scale.
//!
//! Reference: https://github.com/open-spaced-repetition/fsrs4anki

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{CurveParams, TARGET_RETENTION_MAX, TARGET_RETENTION_MIN};

// ==================== Constants ====================

const SECONDS_PER_DAY: f64 = 86_400.0;

const MIN_STABILITY: f64 = 0.1;
const MIN_DIFFICULTY: f64 = 1.0;
const MAX_DIFFICULTY: f64 = 10.0;

pub const GRADE_MIN: u8 = 2;
pub const GRADE_MAX: u8 = 6;

// ==================== Parameters ====================

/// FSRS weight vector plus the forgetting-curve shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FsrsParams {
    pub w: [f64; 17],
    pub curve: CurveParams,
}

impl Default for FsrsParams {
    fn default() -> Self {
        Self {
            w: [
                0.4, 0.6, 2.4, 5.8, // w0-w3: initial stability per rating
                4.93, 0.94, 0.86, 0.01, 1.49, // w4-w8
                0.14, 0.94, 2.18, 0.05, 0.34, // w9-w13
                1.26, 0.29, 2.61, // w14-w16
            ],
            curve: CurveParams::default(),
        }
    }
}

// ==================== Ratings ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Again = 1,
    Hard = 2,
    Good = 3,
    Easy = 4,
}

impl Rating {
    /// Map an exam-style grade (2 = fail .. 6 = excellent) to a review
    /// rating. Out-of-range grades are clamped to the nearest bound first.
    pub fn from_grade(grade: u8) -> Self {
        match grade.clamp(GRADE_MIN, GRADE_MAX) {
            2 | 3 => Self::Again,
            4 => Self::Hard,
            5 => Self::Good,
            _ => Self::Easy,
        }
    }
}

// ==================== Memory state ====================

/// Created on a topic's first review, mutated on every later one, never
/// deleted while the topic exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryState {
    /// Days until retrievability decays to ~90%.
    pub stability: f64,
    /// 1 (easiest) .. 10 (hardest).
    pub difficulty: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_review: Option<DateTime<Utc>>,
    pub reps: u32,
    pub lapses: u32,
}

fn elapsed_days(last_review: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    ((now - last_review).num_seconds().max(0)) as f64 / SECONDS_PER_DAY
}

// ==================== Curve math ====================

/// Probability the learner still recalls the topic at `now`.
///
/// Never-reviewed topics return 1.0: they are new material, not overdue
/// reviews, and the planner handles them separately.
pub fn retrievability(
    memory: Option<&MemoryState>,
    now: DateTime<Utc>,
    curve: &CurveParams,
) -> f64 {
    let Some(state) = memory else { return 1.0 };
    let Some(last_review) = state.last_review else {
        return 1.0;
    };
    if state.stability <= 0.0 {
        return 0.0;
    }
    let t = elapsed_days(last_review, now);
    (1.0 + curve.factor * t / state.stability).powf(curve.decay)
}

/// Full interval (days since review) at which retrievability hits the
/// target.
fn scheduled_interval(stability: f64, target_retention: f64, curve: &CurveParams) -> f64 {
    let retention = target_retention.clamp(TARGET_RETENTION_MIN, TARGET_RETENTION_MAX);
    stability / curve.factor * (retention.powf(1.0 / curve.decay) - 1.0)
}

/// Whole days from `now` until the topic should be reviewed. Zero means
/// due. Never-reviewed topics are immediately eligible.
pub fn days_until_review(
    memory: Option<&MemoryState>,
    target_retention: f64,
    max_interval_days: u32,
    now: DateTime<Utc>,
    curve: &CurveParams,
) -> u32 {
    let Some(state) = memory else { return 0 };
    let Some(last_review) = state.last_review else {
        return 0;
    };
    let max_days = max_interval_days.max(1) as f64;
    let interval = scheduled_interval(state.stability.max(MIN_STABILITY), target_retention, curve);
    let remaining = interval - elapsed_days(last_review, now);
    remaining.round().clamp(0.0, max_days) as u32
}

// ==================== Review transition ====================

fn initial_stability(w: &[f64; 17], rating: Rating) -> f64 {
    w[rating as usize - 1].max(MIN_STABILITY)
}

fn initial_difficulty(w: &[f64; 17], rating: Rating) -> f64 {
    let d = w[4] - (rating as i32 - 3) as f64 * w[5];
    d.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

fn next_difficulty(w: &[f64; 17], d: f64, rating: Rating) -> f64 {
    let delta = (3 - rating as i32) as f64;
    let d_new = d + w[6] * delta;
    // Mean reversion toward the easy-answer baseline keeps difficulty from
    // saturating after long grade streaks.
    let d_target = initial_difficulty(w, Rating::Easy);
    let d_mean = w[7] * d_target + (1.0 - w[7]) * d_new;
    d_mean.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

fn next_recall_stability(w: &[f64; 17], d: f64, s: f64, r: f64, rating: Rating) -> f64 {
    let hard_penalty = if rating == Rating::Hard { w[15] } else { 1.0 };
    let easy_bonus = if rating == Rating::Easy { w[16] } else { 1.0 };

    let new_s = s
        * (1.0
            + w[8].exp()
                * (11.0 - d)
                * s.powf(-w[9])
                * ((1.0 - r) * w[10]).exp_m1()
                * hard_penalty
                * easy_bonus);
    new_s.max(MIN_STABILITY)
}

fn next_forget_stability(w: &[f64; 17], d: f64, s: f64, r: f64) -> f64 {
    let new_s = w[11] * d.powf(-w[12]) * ((s + 1.0).powf(w[13]) - 1.0) * (w[14] * (1.0 - r)).exp();
    // A lapse never grows stability; the floor still applies to states
    // imported with degenerate values.
    new_s.clamp(MIN_STABILITY, s.max(MIN_STABILITY))
}

/// Fold one graded review into the memory state.
///
/// A missing state (or one that was imported without a review timestamp)
/// takes the first-review path; counters carried on an imported state are
/// preserved.
pub fn apply_review(
    memory: Option<&MemoryState>,
    grade: u8,
    now: DateTime<Utc>,
    params: &FsrsParams,
) -> MemoryState {
    let w = &params.w;
    let rating = Rating::from_grade(grade);
    let lapse = u32::from(rating == Rating::Again);

    let reviewed = memory.and_then(|m| m.last_review.map(|last| (m, last)));
    let Some((state, last_review)) = reviewed else {
        return MemoryState {
            stability: initial_stability(w, rating),
            difficulty: initial_difficulty(w, rating),
            last_review: Some(now),
            reps: memory.map_or(0, |m| m.reps) + 1,
            lapses: memory.map_or(0, |m| m.lapses) + lapse,
        };
    };

    let t = elapsed_days(last_review, now);
    let r = (1.0 + params.curve.factor * t / state.stability.max(MIN_STABILITY))
        .powf(params.curve.decay);
    let difficulty = state.difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);

    let stability = if rating == Rating::Again {
        next_forget_stability(w, difficulty, state.stability, r)
    } else {
        next_recall_stability(w, difficulty, state.stability, r, rating)
    };

    MemoryState {
        stability,
        difficulty: next_difficulty(w, difficulty, rating),
        last_review: Some(now),
        reps: state.reps + 1,
        lapses: state.lapses + lapse,
    }
}
