//! Crunch detection: folds per-subject pace into one "switch to triage
//! mode" signal with human-readable tips.

use chrono::{DateTime, Utc};

use crate::config::PlannerThresholds;
use crate::types::{CrunchStatus, Subject, UrgentSubject};
use crate::workload::{analyze_subject, Urgency, WorkloadReport};

/// "1 ден" / "3 дни": Bulgarian day phrase with the singular form.
pub(crate) fn days_phrase(days: i64) -> String {
    if days == 1 {
        "1 ден".to_string()
    } else {
        format!("{days} дни")
    }
}

/// Run the workload analyzer over every non-archived subject with an exam
/// date and decide whether the learner should switch to triage mode.
///
/// Active when any subject is critical, or when two or more are high.
pub fn detect_crunch_mode(
    subjects: &[Subject],
    now: DateTime<Utc>,
    thresholds: &PlannerThresholds,
) -> CrunchStatus {
    let reports: Vec<WorkloadReport> = subjects
        .iter()
        .filter(|s| !s.archived && s.exam_date.is_some())
        .map(|s| analyze_subject(s, now, thresholds))
        .collect();

    let critical_count = reports
        .iter()
        .filter(|r| r.urgency == Urgency::Critical)
        .count();
    let high_count = reports.iter().filter(|r| r.urgency == Urgency::High).count();
    let is_active = critical_count > 0 || high_count >= 2;

    let mut urgent: Vec<&WorkloadReport> =
        reports.iter().filter(|r| r.urgency.is_urgent()).collect();
    urgent.sort_by(|a, b| {
        (a.urgency != Urgency::Critical, a.days_left).cmp(&(b.urgency != Urgency::Critical, b.days_left))
    });

    let reason = urgent.first().map(|r| {
        format!("{} до изпит по {}", days_phrase(r.days_left), r.subject_name)
    });

    let mut tips = Vec::new();
    if is_active {
        if critical_count > 0 {
            tips.push("Започни от сивите теми — те носят най-много пропуснати точки.".to_string());
        }
        if high_count >= 2 {
            tips.push("Редувай предметите на блокове от 25-30 минути, за да не изоставаш по нито един.".to_string());
        }
        if reports.iter().any(|r| r.warning.is_some()) {
            tips.push("Темпото е нереалистично — съкрати обхвата до най-важните теми.".to_string());
        }
        tips.push("Използвай активно припомняне вместо препрочитане.".to_string());

        tracing::info!(
            critical = critical_count,
            high = high_count,
            "crunch mode active"
        );
    }

    let mut urgent_subjects: Vec<UrgentSubject> = urgent
        .iter()
        .map(|r| UrgentSubject {
            name: r.subject_name.clone(),
            days_left: r.days_left,
            workload_per_day: r.pace_topics_per_day,
        })
        .collect();
    urgent_subjects.sort_by_key(|u| u.days_left);

    CrunchStatus {
        is_active,
        reason,
        urgent_subjects,
        tips,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Topic, TopicSize, TopicStatus};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn subject(id: &str, name: &str, exam_in_days: Option<i64>, gray_topics: usize) -> Subject {
        Subject {
            id: id.to_string(),
            name: name.to_string(),
            exam_date: exam_in_days.map(|d| now() + Duration::days(d)),
            archived: false,
            topics: (0..gray_topics)
                .map(|i| Topic {
                    id: format!("{id}-t{i}"),
                    name: format!("Тема {i}"),
                    number: i as i32 + 1,
                    status: TopicStatus::Gray,
                    grades: vec![],
                    memory: None,
                    size: TopicSize::Medium,
                    last_diagnostic_score: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_inactive_without_deadlines() {
        let subjects = vec![subject("bio", "Биология", None, 20)];
        let status = detect_crunch_mode(&subjects, now(), &PlannerThresholds::default());
        assert!(!status.is_active);
        assert!(status.reason.is_none());
        assert!(status.urgent_subjects.is_empty());
    }

    #[test]
    fn test_single_critical_activates() {
        let subjects = vec![
            subject("ana", "Анатомия", Some(3), 9),
            subject("bio", "Биология", None, 5),
        ];
        let status = detect_crunch_mode(&subjects, now(), &PlannerThresholds::default());
        assert!(status.is_active);
        assert_eq!(status.reason.as_deref(), Some("3 дни до изпит по Анатомия"));
        assert_eq!(status.urgent_subjects.len(), 1);
        assert!(!status.tips.is_empty());
    }

    #[test]
    fn test_single_high_does_not_activate() {
        let subjects = vec![subject("ana", "Анатомия", Some(6), 4)];
        let status = detect_crunch_mode(&subjects, now(), &PlannerThresholds::default());
        assert!(!status.is_active);
        // Still listed for the UI, even below the activation bar.
        assert_eq!(status.urgent_subjects.len(), 1);
    }

    #[test]
    fn test_two_high_subjects_activate() {
        let subjects = vec![
            subject("ana", "Анатомия", Some(6), 4),
            subject("his", "Хистология", Some(5), 4),
        ];
        let status = detect_crunch_mode(&subjects, now(), &PlannerThresholds::default());
        assert!(status.is_active);
        assert!(!status.tips.is_empty());
        // Sorted by days left, closest exam first.
        assert_eq!(status.urgent_subjects[0].name, "Хистология");
    }

    #[test]
    fn test_archived_subjects_are_ignored() {
        let mut archived = subject("ana", "Анатомия", Some(2), 9);
        archived.archived = true;
        let status = detect_crunch_mode(&[archived], now(), &PlannerThresholds::default());
        assert!(!status.is_active);
    }

    #[test]
    fn test_singular_day_phrase() {
        let subjects = vec![subject("ana", "Анатомия", Some(1), 9)];
        let status = detect_crunch_mode(&subjects, now(), &PlannerThresholds::default());
        assert_eq!(status.reason.as_deref(), Some("1 ден до изпит по Анатомия"));
    }
}
