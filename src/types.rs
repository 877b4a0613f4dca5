use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fsrs::MemoryState;

// ========== Topics ==========

/// Coarse mastery label, owner-editable in the UI.
///
/// Independent of the computed memory state: a topic can be `Green` while
/// its retrievability has long decayed, and the planner reads whichever
/// signal the task type calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicStatus {
    Gray,
    Yellow,
    Orange,
    Green,
}

impl Default for TopicStatus {
    fn default() -> Self {
        Self::Gray
    }
}

impl TopicStatus {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "yellow" => Self::Yellow,
            "orange" => Self::Orange,
            "green" => Self::Green,
            _ => Self::Gray,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gray => "gray",
            Self::Yellow => "yellow",
            Self::Orange => "orange",
            Self::Green => "green",
        }
    }
}

/// Estimated study effort for one topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicSize {
    Small,
    Medium,
    Large,
}

impl Default for TopicSize {
    fn default() -> Self {
        Self::Medium
    }
}

impl TopicSize {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "small" => Self::Small,
            "large" => Self::Large,
            _ => Self::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// Estimated minutes to study a topic of this size.
    pub fn minutes(&self) -> i64 {
        match self {
            Self::Small => 20,
            Self::Medium => 35,
            Self::Large => 70,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub name: String,
    pub number: i32,
    #[serde(default)]
    pub status: TopicStatus,
    /// Exam-style grade history on the 2..=6 scale (2 = fail, 6 = excellent).
    #[serde(default)]
    pub grades: Vec<u8>,
    #[serde(default)]
    pub memory: Option<MemoryState>,
    #[serde(default)]
    pub size: TopicSize,
    /// Last diagnostic quiz score on the 0..=100 scale, written by the
    /// quiz feature. Drives the sampler's low-score boost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_diagnostic_score: Option<f64>,
}

impl Topic {
    /// A topic counts as studied once it has any grade or memory state.
    pub fn studied(&self) -> bool {
        !self.grades.is_empty() || self.memory.is_some()
    }

    /// Not yet mastered, still counts toward exam pace.
    pub fn pending(&self) -> bool {
        self.status != TopicStatus::Green
    }
}

// ========== Subjects ==========

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub topics: Vec<Topic>,
}

// ========== Projects ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleState {
    Locked,
    Available,
    InProgress,
    Done,
}

impl ModuleState {
    /// Open for work today.
    pub fn is_workable(&self) -> bool {
        matches!(self, Self::Available | Self::InProgress)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectModule {
    pub id: String,
    pub name: String,
    pub state: ModuleState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub modules: Vec<ProjectModule>,
}

// ========== Daily plan ==========

/// Transient per-day flags, settable once per day by the owner.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStatus {
    #[serde(default)]
    pub sick: bool,
    #[serde(default)]
    pub holiday: bool,
}

/// Task kinds in output priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Setup,
    Critical,
    High,
    Medium,
    Normal,
    Project,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Normal => "normal",
            Self::Project => "project",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicRef {
    pub id: String,
    pub name: String,
    pub number: i32,
    pub minutes: i64,
}

impl TopicRef {
    pub fn from_topic(topic: &Topic) -> Self {
        Self {
            id: topic.id.clone(),
            name: topic.name.clone(),
            number: topic.number,
            minutes: topic.size.minutes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRef {
    pub id: String,
    pub name: String,
}

/// One line of today's plan. Recomputed fresh on every planning call; the
/// id is derived from kind and subject so identical input yields identical
/// output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTask {
    pub id: String,
    /// Serialized as `type`; `kind` only because `type` is reserved.
    #[serde(rename = "type")]
    pub kind: TaskKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<TopicRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub project_modules: Vec<ModuleRef>,
    pub description: String,
}

impl DailyTask {
    pub fn estimated_minutes(&self) -> i64 {
        self.topics.iter().map(|t| t.minutes).sum()
    }
}

/// Aggregate numbers for the host's plan header widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub task_count: usize,
    pub topic_count: usize,
    pub estimated_minutes: i64,
}

pub fn summarize_plan(tasks: &[DailyTask]) -> PlanSummary {
    PlanSummary {
        task_count: tasks.len(),
        topic_count: tasks.iter().map(|t| t.topics.len()).sum(),
        estimated_minutes: tasks.iter().map(|t| t.estimated_minutes()).sum(),
    }
}

// ========== Crunch ==========

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgentSubject {
    pub name: String,
    pub days_left: i64,
    pub workload_per_day: f64,
}

/// Global triage signal, recomputed per call and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrunchStatus {
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urgent_subjects: Vec<UrgentSubject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tips: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_label_round_trip() {
        for s in ["gray", "yellow", "orange", "green"] {
            assert_eq!(TopicStatus::from_str(s).as_str(), s);
        }
        assert_eq!(TopicStatus::from_str("GREEN"), TopicStatus::Green);
        assert_eq!(TopicStatus::from_str("???"), TopicStatus::Gray);
    }

    #[test]
    fn test_size_minutes() {
        assert_eq!(TopicSize::Small.minutes(), 20);
        assert_eq!(TopicSize::Medium.minutes(), 35);
        assert_eq!(TopicSize::Large.minutes(), 70);
        assert_eq!(TopicSize::from_str("unknown"), TopicSize::Medium);
    }

    #[test]
    fn test_kind_priority_order() {
        assert!(TaskKind::Setup < TaskKind::Critical);
        assert!(TaskKind::Critical < TaskKind::High);
        assert!(TaskKind::High < TaskKind::Medium);
        assert!(TaskKind::Medium < TaskKind::Normal);
        assert!(TaskKind::Normal < TaskKind::Project);
    }

    #[test]
    fn test_summarize_plan() {
        let task = DailyTask {
            id: "study-bio".to_string(),
            kind: TaskKind::Normal,
            subject_id: Some("bio".to_string()),
            topics: vec![
                TopicRef {
                    id: "t1".to_string(),
                    name: "Клетка".to_string(),
                    number: 1,
                    minutes: 20,
                },
                TopicRef {
                    id: "t2".to_string(),
                    name: "Тъкани".to_string(),
                    number: 2,
                    minutes: 70,
                },
            ],
            project_modules: vec![],
            description: "Редовно учене".to_string(),
        };
        let summary = summarize_plan(&[task]);
        assert_eq!(summary.task_count, 1);
        assert_eq!(summary.topic_count, 2);
        assert_eq!(summary.estimated_minutes, 90);
    }
}
