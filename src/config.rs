//! Scheduler configuration: study goals snapshot, planner thresholds and
//! forgetting-curve parameters.
//!
//! Out-of-range values never abort planning; `StudyGoals::sanitized`
//! clamps every field into its documented range before use.

use serde::{Deserialize, Serialize};

// ==================== Documented ranges ====================

pub const VACATION_MULTIPLIER_MIN: f64 = 0.2;
pub const VACATION_MULTIPLIER_MAX: f64 = 0.8;

pub const TARGET_RETENTION_MIN: f64 = 0.70;
pub const TARGET_RETENTION_MAX: f64 = 0.95;

pub const MAX_REVIEWS_PER_DAY_MIN: u32 = 3;
pub const MAX_REVIEWS_PER_DAY_MAX: u32 = 20;

pub const MAX_INTERVAL_MIN: u32 = 30;
pub const MAX_INTERVAL_MAX: u32 = 365;

// ==================== Study goals ====================

/// Per-user settings snapshot taken at planning time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudyGoals {
    pub daily_minutes: i64,
    pub weekend_daily_minutes: i64,
    pub vacation_mode: bool,
    pub vacation_multiplier: f64,
    pub fsrs_enabled: bool,
    pub fsrs_target_retention: f64,
    pub fsrs_max_reviews_per_day: u32,
    pub fsrs_max_interval: u32,
}

impl Default for StudyGoals {
    fn default() -> Self {
        Self {
            daily_minutes: 240,
            weekend_daily_minutes: 180,
            vacation_mode: false,
            vacation_multiplier: 0.5,
            fsrs_enabled: true,
            fsrs_target_retention: 0.90,
            fsrs_max_reviews_per_day: 10,
            fsrs_max_interval: 180,
        }
    }
}

impl StudyGoals {
    /// Clamp every field into its documented range. Idempotent.
    pub fn sanitized(&self) -> Self {
        let clamped = Self {
            daily_minutes: self.daily_minutes.max(0),
            weekend_daily_minutes: self.weekend_daily_minutes.max(0),
            vacation_mode: self.vacation_mode,
            vacation_multiplier: self
                .vacation_multiplier
                .clamp(VACATION_MULTIPLIER_MIN, VACATION_MULTIPLIER_MAX),
            fsrs_enabled: self.fsrs_enabled,
            fsrs_target_retention: self
                .fsrs_target_retention
                .clamp(TARGET_RETENTION_MIN, TARGET_RETENTION_MAX),
            fsrs_max_reviews_per_day: self
                .fsrs_max_reviews_per_day
                .clamp(MAX_REVIEWS_PER_DAY_MIN, MAX_REVIEWS_PER_DAY_MAX),
            fsrs_max_interval: self
                .fsrs_max_interval
                .clamp(MAX_INTERVAL_MIN, MAX_INTERVAL_MAX),
        };
        if clamped != *self {
            tracing::warn!("study goals contained out-of-range values, clamped before planning");
        }
        clamped
    }
}

// ==================== Planner thresholds ====================

/// Tunable pace thresholds. These are contract values, not magic numbers:
/// the host surfaces them in its settings UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlannerThresholds {
    /// `critical` when the exam is at most this many days away and work remains.
    pub critical_days: i64,
    /// `high` when the exam is at most this many days away.
    pub high_days: i64,
    /// `high` when required pace exceeds this many topics per day.
    pub high_pace: f64,
    /// `medium` when required pace exceeds this many topics per day.
    pub medium_pace: f64,
    /// Warn that the syllabus cannot realistically be finished.
    pub warning_pace: f64,
    /// Fixed daily allotment when both sick and holiday apply.
    pub sick_holiday_floor_minutes: i64,
    /// Smallest usable budget: one small topic's worth of time.
    pub min_budget_minutes: i64,
}

impl Default for PlannerThresholds {
    fn default() -> Self {
        Self {
            critical_days: 3,
            high_days: 7,
            high_pace: 5.0,
            medium_pace: 2.0,
            warning_pace: 8.0,
            sick_holiday_floor_minutes: 60,
            min_budget_minutes: 20,
        }
    }
}

// ==================== Forgetting curve ====================

/// Forgetting-curve shape `R = (1 + factor * t / S) ^ decay`.
///
/// The defaults are the published FSRS values. They are overridable
/// configuration, not a reproduction target: hosts with their own fitted
/// constants substitute them here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CurveParams {
    pub factor: f64,
    pub decay: f64,
}

impl Default for CurveParams {
    fn default() -> Self {
        Self {
            factor: 19.0 / 81.0,
            decay: -0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitized_clamps_every_range() {
        let wild = StudyGoals {
            daily_minutes: -50,
            weekend_daily_minutes: -1,
            vacation_mode: true,
            vacation_multiplier: 1.5,
            fsrs_enabled: true,
            fsrs_target_retention: 1.5,
            fsrs_max_reviews_per_day: 100,
            fsrs_max_interval: 10_000,
        };
        let clean = wild.sanitized();
        assert_eq!(clean.daily_minutes, 0);
        assert_eq!(clean.weekend_daily_minutes, 0);
        assert!((clean.vacation_multiplier - VACATION_MULTIPLIER_MAX).abs() < 1e-9);
        assert!((clean.fsrs_target_retention - TARGET_RETENTION_MAX).abs() < 1e-9);
        assert_eq!(clean.fsrs_max_reviews_per_day, MAX_REVIEWS_PER_DAY_MAX);
        assert_eq!(clean.fsrs_max_interval, MAX_INTERVAL_MAX);
    }

    #[test]
    fn test_sanitized_is_idempotent() {
        let goals = StudyGoals {
            fsrs_target_retention: 0.2,
            ..Default::default()
        };
        let once = goals.sanitized();
        let twice = once.sanitized();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_defaults_are_in_range() {
        let goals = StudyGoals::default();
        assert_eq!(goals, goals.sanitized());
    }
}
