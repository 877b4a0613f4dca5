//! Exam-pace analysis: how much ground a subject must cover per day.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::PlannerThresholds;
use crate::types::Subject;

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    None,
    Normal,
    Medium,
    High,
    Critical,
}

impl Urgency {
    pub fn is_urgent(&self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadReport {
    pub subject_id: String,
    pub subject_name: String,
    /// Whole days until the exam, floored at 1. Zero when there is no exam.
    pub days_left: i64,
    /// Topics not yet marked green.
    pub remaining: usize,
    pub pace_topics_per_day: f64,
    pub urgency: Urgency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Pace math for one subject. Subjects without an exam date stay out of
/// urgency entirely; they reach the plan through the normal rotation.
pub fn analyze_subject(
    subject: &Subject,
    now: DateTime<Utc>,
    thresholds: &PlannerThresholds,
) -> WorkloadReport {
    let remaining = subject.topics.iter().filter(|t| t.pending()).count();

    let Some(exam_date) = subject.exam_date else {
        return WorkloadReport {
            subject_id: subject.id.clone(),
            subject_name: subject.name.clone(),
            days_left: 0,
            remaining,
            pace_topics_per_day: 0.0,
            urgency: Urgency::None,
            warning: None,
        };
    };

    let seconds_left = (exam_date - now).num_seconds() as f64;
    let days_left = (seconds_left / SECONDS_PER_DAY).ceil().max(1.0) as i64;
    let pace = remaining as f64 / days_left as f64;

    // A subject with nothing left to cover cannot be urgent, however close
    // the exam is.
    let urgency = if remaining == 0 {
        Urgency::Normal
    } else if days_left <= thresholds.critical_days {
        Urgency::Critical
    } else if pace > thresholds.high_pace || days_left <= thresholds.high_days {
        Urgency::High
    } else if pace > thresholds.medium_pace {
        Urgency::Medium
    } else {
        Urgency::Normal
    };

    let warning = (pace > thresholds.warning_pace).then(|| {
        format!(
            "Необходими са {pace:.1} теми на ден по {} — материалът едва ли ще бъде покрит навреме",
            subject.name
        )
    });

    WorkloadReport {
        subject_id: subject.id.clone(),
        subject_name: subject.name.clone(),
        days_left,
        remaining,
        pace_topics_per_day: pace,
        urgency,
        warning,
    }
}
