//! Benchmark suite for zubri-scheduler
//!
//! Run with: cargo bench

use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use zubri_scheduler::{
    DailyPlanner, DailyStatus, MemoryState, StudyGoals, Subject, Topic, TopicSize, TopicStatus,
};

fn now() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

fn fixture(subject_count: usize, topics_per_subject: usize) -> Vec<Subject> {
    (0..subject_count)
        .map(|s| Subject {
            id: format!("s{s}"),
            name: format!("Предмет {s}"),
            exam_date: (s % 3 == 0).then(|| now() + Duration::days(5 + s as i64)),
            archived: false,
            topics: (0..topics_per_subject)
                .map(|i| Topic {
                    id: format!("s{s}t{i}"),
                    name: format!("Тема {i}"),
                    number: i as i32,
                    status: match i % 4 {
                        0 => TopicStatus::Gray,
                        1 => TopicStatus::Yellow,
                        2 => TopicStatus::Orange,
                        _ => TopicStatus::Green,
                    },
                    grades: vec![4, 5],
                    memory: (i % 2 == 0).then(|| MemoryState {
                        stability: 1.0 + i as f64,
                        difficulty: 5.0,
                        last_review: Some(now() - Duration::days(i as i64 % 40)),
                        reps: 3,
                        lapses: 0,
                    }),
                    size: TopicSize::Medium,
                    last_diagnostic_score: None,
                })
                .collect(),
        })
        .collect()
}

fn bench_generate_plan(c: &mut Criterion) {
    let planner = DailyPlanner::new();
    let subjects = fixture(20, 30);
    let goals = StudyGoals::default();

    c.bench_function("generate_plan 20x30", |b| {
        b.iter(|| {
            let mut rng = ChaCha8Rng::seed_from_u64(7);
            planner.generate_plan(
                &subjects,
                &[],
                DailyStatus::default(),
                &goals,
                now(),
                None,
                &mut rng,
            )
        })
    });
}

criterion_group!(benches, bench_generate_plan);
criterion_main!(benches);
