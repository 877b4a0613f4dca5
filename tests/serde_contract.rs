//! Serialization contract with the host application: camelCase field
//! names, lowercase labels, lossless round-trips.

use zubri_scheduler::{
    CrunchStatus, DailyTask, MemoryState, StudyGoals, TaskKind, Topic, TopicRef, TopicStatus,
    UrgentSubject,
};

#[test]
fn daily_task_serializes_camel_case() {
    let task = DailyTask {
        id: "pace-ana".to_string(),
        kind: TaskKind::Critical,
        subject_id: Some("ana".to_string()),
        topics: vec![TopicRef {
            id: "t1".to_string(),
            name: "Гръбначен стълб".to_string(),
            number: 4,
            minutes: 35,
        }],
        project_modules: vec![],
        description: "Изпит по Анатомия след 3 дни".to_string(),
    };

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["type"], "critical");
    assert_eq!(json["subjectId"], "ana");
    assert_eq!(json["topics"][0]["minutes"], 35);
    // Empty module lists stay off the wire.
    assert!(json.get("projectModules").is_none());

    let back: DailyTask = serde_json::from_value(json).unwrap();
    assert_eq!(back, task);
}

#[test]
fn topic_round_trips_with_memory_state() {
    let json = serde_json::json!({
        "id": "t9",
        "name": "Кръвоносна система",
        "number": 9,
        "status": "orange",
        "grades": [3, 4, 5],
        "size": "large",
        "memory": {
            "stability": 6.5,
            "difficulty": 4.2,
            "lastReview": "2023-11-01T10:00:00Z",
            "reps": 4,
            "lapses": 1
        }
    });

    let topic: Topic = serde_json::from_value(json).unwrap();
    assert_eq!(topic.status, TopicStatus::Orange);
    assert_eq!(topic.grades, vec![3, 4, 5]);
    let memory: &MemoryState = topic.memory.as_ref().unwrap();
    assert_eq!(memory.reps, 4);
    assert!(memory.last_review.is_some());

    let back = serde_json::to_value(&topic).unwrap();
    assert_eq!(back["status"], "orange");
    assert_eq!(back["memory"]["lastReview"], "2023-11-01T10:00:00Z");
}

#[test]
fn topic_tolerates_sparse_host_records() {
    // Older records carry only the identity fields.
    let topic: Topic = serde_json::from_str(
        r#"{"id": "t1", "name": "Клетка", "number": 1}"#,
    )
    .unwrap();
    assert_eq!(topic.status, TopicStatus::Gray);
    assert!(topic.grades.is_empty());
    assert!(topic.memory.is_none());
    assert_eq!(topic.size.minutes(), 35);
}

#[test]
fn crunch_status_round_trips() {
    let status = CrunchStatus {
        is_active: true,
        reason: Some("3 дни до изпит по Анатомия".to_string()),
        urgent_subjects: vec![UrgentSubject {
            name: "Анатомия".to_string(),
            days_left: 3,
            workload_per_day: 3.0,
        }],
        tips: vec!["Използвай активно припомняне вместо препрочитане.".to_string()],
    };

    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["isActive"], true);
    assert_eq!(json["urgentSubjects"][0]["daysLeft"], 3);
    assert_eq!(json["urgentSubjects"][0]["workloadPerDay"], 3.0);

    let back: CrunchStatus = serde_json::from_value(json).unwrap();
    assert_eq!(back.reason, status.reason);
}

#[test]
fn study_goals_accept_partial_settings() {
    let goals: StudyGoals =
        serde_json::from_str(r#"{"dailyMinutes": 180, "fsrsTargetRetention": 0.85}"#).unwrap();
    assert_eq!(goals.daily_minutes, 180);
    assert!((goals.fsrs_target_retention - 0.85).abs() < 1e-9);
    // Unspecified fields fall back to defaults.
    assert_eq!(goals.fsrs_max_reviews_per_day, 10);
}
