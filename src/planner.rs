//! Daily plan composition.
//!
//! Consumes the memory model, the workload analyzer and the weighted
//! sampler, and emits an ordered, budget-capped task list for today:
//! due reviews first, then exam-pace work for urgent subjects, then a
//! round-robin rotation over everything else, plus project and setup
//! tasks outside the time budget.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Datelike, Utc, Weekday};
use rand::Rng;

use crate::config::{PlannerThresholds, StudyGoals};
use crate::crunch::days_phrase;
use crate::fsrs::{self, FsrsParams};
use crate::sampler;
use crate::types::{
    DailyStatus, DailyTask, ModuleRef, Project, Subject, TaskKind, Topic, TopicRef,
};
use crate::workload::{analyze_subject, Urgency, WorkloadReport};

fn topics_phrase(count: usize) -> String {
    if count == 1 {
        "1 тема".to_string()
    } else {
        format!("{count} теми")
    }
}

fn modules_phrase(count: usize) -> String {
    if count == 1 {
        "1 отворен модул".to_string()
    } else {
        format!("{count} отворени модула")
    }
}

pub struct DailyPlanner {
    thresholds: PlannerThresholds,
    fsrs: FsrsParams,
}

impl Default for DailyPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl DailyPlanner {
    pub fn new() -> Self {
        Self {
            thresholds: PlannerThresholds::default(),
            fsrs: FsrsParams::default(),
        }
    }

    pub fn with_config(thresholds: PlannerThresholds, fsrs: FsrsParams) -> Self {
        Self { thresholds, fsrs }
    }

    pub fn thresholds(&self) -> &PlannerThresholds {
        &self.thresholds
    }

    /// Minutes available today after weekend, sick/holiday and vacation
    /// modifiers. Sick/holiday take precedence over vacation; both flags
    /// together floor the day. Never below one small topic's worth.
    pub fn resolve_budget_minutes(
        &self,
        daily_status: DailyStatus,
        goals: &StudyGoals,
        now: DateTime<Utc>,
    ) -> i64 {
        self.budget_from(daily_status, &goals.sanitized(), now)
    }

    fn budget_from(&self, daily_status: DailyStatus, goals: &StudyGoals, now: DateTime<Utc>) -> i64 {
        let is_weekend = matches!(now.weekday(), Weekday::Sat | Weekday::Sun);
        let base = if is_weekend {
            goals.weekend_daily_minutes
        } else {
            goals.daily_minutes
        };

        let resolved = if daily_status.sick && daily_status.holiday {
            // Both flags are at least as reductive as either alone, even
            // with a base below twice the floor.
            (base / 2).min(self.thresholds.sick_holiday_floor_minutes)
        } else if daily_status.sick || daily_status.holiday {
            base / 2
        } else if goals.vacation_mode {
            (base as f64 * goals.vacation_multiplier).round() as i64
        } else {
            base
        };

        if resolved < self.thresholds.min_budget_minutes {
            tracing::warn!(resolved, "daily budget below minimum, clamping");
        }
        resolved.max(self.thresholds.min_budget_minutes)
    }

    /// Compose today's plan. Pure: identical inputs and an identically
    /// seeded RNG produce an identical plan.
    pub fn generate_plan<R: Rng + ?Sized>(
        &self,
        subjects: &[Subject],
        projects: &[Project],
        daily_status: DailyStatus,
        goals: &StudyGoals,
        now: DateTime<Utc>,
        anki_due_count: Option<u32>,
        rng: &mut R,
    ) -> Vec<DailyTask> {
        let goals = goals.sanitized();
        let active: Vec<&Subject> = subjects.iter().filter(|s| !s.archived).collect();
        let mut budget = self.budget_from(daily_status, &goals, now);
        let mut tasks: Vec<DailyTask> = Vec::new();
        let mut used: HashSet<&str> = HashSet::new();

        if goals.fsrs_enabled {
            self.push_review_tasks(&active, &goals, now, &mut budget, &mut used, &mut tasks);
        }

        if let Some(count) = anki_due_count {
            // External card count is surfaced as-is, never interpreted.
            if count > 0 {
                tasks.push(DailyTask {
                    id: "review-anki".to_string(),
                    kind: TaskKind::Critical,
                    subject_id: None,
                    topics: vec![],
                    project_modules: vec![],
                    description: format!("Anki: {count} карти чакат преговор"),
                });
            }
        }

        let reports: Vec<WorkloadReport> = active
            .iter()
            .map(|s| analyze_subject(s, now, &self.thresholds))
            .collect();

        self.push_pace_tasks(&active, &reports, &mut budget, &mut used, &mut tasks);
        self.push_rotation_tasks(&active, &reports, &mut budget, &mut used, &mut tasks, rng);
        push_project_tasks(projects, &mut tasks);
        push_setup_task(&active, &mut tasks);

        // Stable by construction order within a kind.
        tasks.sort_by_key(|t| t.kind);

        tracing::debug!(
            tasks = tasks.len(),
            remaining_budget = budget,
            "daily plan generated"
        );
        tasks
    }

    /// Step 2: topics whose memory decayed to the review point, most
    /// at-risk first, capped per day and metered against the budget.
    fn push_review_tasks<'a>(
        &self,
        active: &[&'a Subject],
        goals: &StudyGoals,
        now: DateTime<Utc>,
        budget: &mut i64,
        used: &mut HashSet<&'a str>,
        tasks: &mut Vec<DailyTask>,
    ) {
        struct Due<'a> {
            subject_idx: usize,
            topic: &'a Topic,
            retrievability: f64,
        }

        let mut due: Vec<Due<'a>> = Vec::new();
        for (subject_idx, subject) in active.iter().enumerate() {
            for topic in &subject.topics {
                // Never-reviewed topics are new material, not overdue
                // reviews; they enter through the pace and rotation steps.
                let reviewed = topic
                    .memory
                    .as_ref()
                    .is_some_and(|m| m.last_review.is_some());
                if !reviewed {
                    continue;
                }
                let days = fsrs::days_until_review(
                    topic.memory.as_ref(),
                    goals.fsrs_target_retention,
                    goals.fsrs_max_interval,
                    now,
                    &self.fsrs.curve,
                );
                if days == 0 {
                    due.push(Due {
                        subject_idx,
                        topic,
                        retrievability: fsrs::retrievability(
                            topic.memory.as_ref(),
                            now,
                            &self.fsrs.curve,
                        ),
                    });
                }
            }
        }

        due.sort_by(|a, b| {
            a.retrievability
                .partial_cmp(&b.retrievability)
                .unwrap_or(Ordering::Equal)
        });
        due.truncate(goals.fsrs_max_reviews_per_day as usize);

        let mut per_subject: Vec<(usize, Vec<&Topic>)> = Vec::new();
        for item in &due {
            if *budget <= 0 {
                break;
            }
            *budget -= item.topic.size.minutes();
            used.insert(item.topic.id.as_str());
            match per_subject
                .iter_mut()
                .find(|(idx, _)| *idx == item.subject_idx)
            {
                Some((_, topics)) => topics.push(item.topic),
                None => per_subject.push((item.subject_idx, vec![item.topic])),
            }
        }

        for (subject_idx, topics) in per_subject {
            let subject = active[subject_idx];
            tasks.push(DailyTask {
                id: format!("review-{}", subject.id),
                kind: TaskKind::Critical,
                subject_id: Some(subject.id.clone()),
                description: format!(
                    "Преговор по {}: {} на ръба на забравянето",
                    subject.name,
                    topics_phrase(topics.len())
                ),
                topics: topics.iter().map(|t| TopicRef::from_topic(t)).collect(),
                project_modules: vec![],
            });
        }
    }

    /// Step 3: urgent subjects split the remaining budget evenly; each
    /// fits as many new/weak topics as its share allows.
    fn push_pace_tasks<'a>(
        &self,
        active: &[&'a Subject],
        reports: &[WorkloadReport],
        budget: &mut i64,
        used: &mut HashSet<&'a str>,
        tasks: &mut Vec<DailyTask>,
    ) {
        let mut urgent: Vec<usize> = (0..reports.len())
            .filter(|&i| reports[i].urgency.is_urgent())
            .collect();
        if urgent.is_empty() || *budget <= 0 {
            return;
        }
        urgent.sort_by_key(|&i| (reports[i].urgency != Urgency::Critical, reports[i].days_left));

        let share = *budget / urgent.len() as i64;
        for &i in &urgent {
            let subject = active[i];
            let report = &reports[i];

            let mut pending: Vec<&Topic> = subject
                .topics
                .iter()
                .filter(|t| t.pending() && !used.contains(t.id.as_str()))
                .collect();
            if pending.is_empty() {
                continue;
            }
            pending.sort_by_key(|t| (t.status, t.number));

            let avg_minutes =
                (pending.iter().map(|t| t.size.minutes()).sum::<i64>() / pending.len() as i64).max(1);
            let mut fit = (share / avg_minutes) as usize;
            if fit == 0 && report.urgency == Urgency::Critical {
                // A critical subject always gets at least one topic while
                // any budget is left.
                fit = 1;
            }

            let mut selected: Vec<&Topic> = Vec::new();
            for topic in pending.into_iter().take(fit) {
                if *budget <= 0 {
                    break;
                }
                *budget -= topic.size.minutes();
                used.insert(topic.id.as_str());
                selected.push(topic);
            }
            if selected.is_empty() {
                continue;
            }

            let (kind, description) = match report.urgency {
                Urgency::Critical => (
                    TaskKind::Critical,
                    format!(
                        "Изпит по {} след {}: покрий {}",
                        subject.name,
                        days_phrase(report.days_left),
                        topics_phrase(selected.len())
                    ),
                ),
                _ => (
                    TaskKind::High,
                    format!(
                        "Изпитът по {} наближава: {} днес",
                        subject.name,
                        topics_phrase(selected.len())
                    ),
                ),
            };

            tasks.push(DailyTask {
                id: format!("pace-{}", subject.id),
                kind,
                subject_id: Some(subject.id.clone()),
                topics: selected.iter().map(|t| TopicRef::from_topic(t)).collect(),
                project_modules: vec![],
                description,
            });
        }
    }

    /// Step 4: whatever budget is left rotates round-robin across the
    /// non-urgent subjects so none of them starves. The starting offset
    /// is a weighted draw, so a tight budget does not always favor the
    /// same subject.
    fn push_rotation_tasks<'a, R: Rng + ?Sized>(
        &self,
        active: &[&'a Subject],
        reports: &[WorkloadReport],
        budget: &mut i64,
        used: &mut HashSet<&'a str>,
        tasks: &mut Vec<DailyTask>,
        rng: &mut R,
    ) {
        if *budget <= 0 {
            return;
        }

        let rotation: Vec<usize> = (0..reports.len())
            .filter(|&i| !reports[i].urgency.is_urgent())
            .collect();
        if rotation.is_empty() {
            return;
        }

        let mut queues: Vec<Vec<&Topic>> = rotation
            .iter()
            .map(|&i| {
                let mut pending: Vec<&Topic> = active[i]
                    .topics
                    .iter()
                    .filter(|t| t.pending() && !used.contains(t.id.as_str()))
                    .collect();
                pending.sort_by_key(|t| (t.status, t.number));
                pending.reverse(); // drain from the back
                pending
            })
            .collect();
        if queues.iter().all(|q| q.is_empty()) {
            return;
        }

        let lanes = rotation.len();
        let offset = if lanes > 1 {
            let lane_ids: Vec<usize> = (0..lanes).collect();
            *sampler::pick(&lane_ids, |&lane| queues[lane].len() as f64, rng)
        } else {
            0
        };

        let mut selections: Vec<Vec<&Topic>> = vec![Vec::new(); lanes];
        let mut cursor = offset;
        while *budget > 0 {
            let mut tried = 0;
            while tried < lanes && queues[cursor % lanes].is_empty() {
                cursor += 1;
                tried += 1;
            }
            if tried == lanes {
                break;
            }
            let lane = cursor % lanes;
            let Some(topic) = queues[lane].pop() else { break };
            *budget -= topic.size.minutes();
            used.insert(topic.id.as_str());
            selections[lane].push(topic);
            cursor += 1;
        }

        for (lane, selected) in selections.iter().enumerate() {
            if selected.is_empty() {
                continue;
            }
            let subject = active[rotation[lane]];
            let report = &reports[rotation[lane]];
            let (kind, description) = if report.urgency == Urgency::Medium {
                (
                    TaskKind::Medium,
                    format!(
                        "Поддържай темпото по {}: {}",
                        subject.name,
                        topics_phrase(selected.len())
                    ),
                )
            } else {
                (
                    TaskKind::Normal,
                    format!(
                        "Редовно учене по {}: {}",
                        subject.name,
                        topics_phrase(selected.len())
                    ),
                )
            };
            tasks.push(DailyTask {
                id: format!("study-{}", subject.id),
                kind,
                subject_id: Some(subject.id.clone()),
                topics: selected.iter().map(|t| TopicRef::from_topic(t)).collect(),
                project_modules: vec![],
                description,
            });
        }
    }
}

/// Step 5: open project modules, not budget-metered. Modules are
/// open-ended work, not timed review.
fn push_project_tasks(projects: &[Project], tasks: &mut Vec<DailyTask>) {
    for project in projects.iter().filter(|p| !p.archived) {
        let modules: Vec<ModuleRef> = project
            .modules
            .iter()
            .filter(|m| m.state.is_workable())
            .map(|m| ModuleRef {
                id: m.id.clone(),
                name: m.name.clone(),
            })
            .collect();
        if modules.is_empty() {
            continue;
        }
        tasks.push(DailyTask {
            id: format!("project-{}", project.id),
            kind: TaskKind::Project,
            subject_id: None,
            topics: vec![],
            description: format!("Проект „{}“: {}", project.name, modules_phrase(modules.len())),
            project_modules: modules,
        });
    }
}

/// Step 6: one onboarding nudge covering every subject that has never
/// been touched.
fn push_setup_task(active: &[&Subject], tasks: &mut Vec<DailyTask>) {
    let unstarted: Vec<&str> = active
        .iter()
        .filter(|s| s.topics.iter().all(|t| !t.studied()))
        .map(|s| s.name.as_str())
        .collect();
    if unstarted.is_empty() {
        return;
    }
    tasks.push(DailyTask {
        id: "setup".to_string(),
        kind: TaskKind::Setup,
        subject_id: None,
        topics: vec![],
        project_modules: vec![],
        description: format!(
            "Начална настройка: въведи теми и пробен тест за {}",
            unstarted.join(", ")
        ),
    });
}
