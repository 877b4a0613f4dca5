//! # zubri-scheduler - адаптивен планер за учене
//!
//! The adaptive study scheduler behind the study-management app. Pure and
//! synchronous: every entry point takes an explicit snapshot of subjects,
//! settings and clock (plus an explicit RNG where randomness matters) and
//! returns a value. No I/O and no hidden state: persistence and UI belong
//! to the host application.
//!
//! Components:
//!
//! - [`fsrs`] - per-topic memory model: forgetting curve
//!   `R = (1 + FACTOR * t / S) ^ DECAY`, next-due inversion, review
//!   transitions driven by the 2..=6 grade scale.
//! - [`workload`] - per-subject exam pace (topics remaining vs. days left).
//! - [`crunch`] - global triage signal with human-readable tips.
//! - [`sampler`] - weighted random choice for simulations and planner
//!   tie-breaks.
//! - [`planner`] - composes everything into today's ordered, budget-capped
//!   task list.
//!
//! ## Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use zubri_scheduler::{DailyPlanner, DailyStatus, StudyGoals};
//!
//! let planner = DailyPlanner::new();
//! let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
//! let mut rng = ChaCha8Rng::seed_from_u64(1);
//! let plan = planner.generate_plan(
//!     &[],
//!     &[],
//!     DailyStatus::default(),
//!     &StudyGoals::default(),
//!     now,
//!     None,
//!     &mut rng,
//! );
//! assert!(plan.is_empty());
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod config;
pub mod crunch;
pub mod fsrs;
pub mod planner;
pub mod sampler;
pub mod types;
pub mod workload;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{CurveParams, PlannerThresholds, StudyGoals};
pub use crunch::detect_crunch_mode;
pub use fsrs::{apply_review, days_until_review, retrievability, FsrsParams, MemoryState, Rating};
pub use planner::DailyPlanner;
pub use sampler::{pick, pick_study_topic, topic_weight};
pub use types::{
    summarize_plan, CrunchStatus, DailyStatus, DailyTask, ModuleRef, ModuleState, PlanSummary,
    Project, ProjectModule, Subject, TaskKind, Topic, TopicRef, TopicSize, TopicStatus,
    UrgentSubject,
};
pub use workload::{analyze_subject, Urgency, WorkloadReport};
