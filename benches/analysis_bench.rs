//! Benchmarks for the Moodlens analysis engine
//!
//! Run with: cargo bench

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use moodlens::analysis::{EntryStatistics, EpisodeDetector, PatternAnalysisEngine, RunContinuity};
use moodlens::entries::{EnergyLevel, EntrySeries, Impairment, MoodEntry};

/// Daily entries cycling through elevated, stable and low stretches
fn create_test_entries(count: usize) -> Vec<MoodEntry> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();

    (0..count)
        .map(|i| {
            let date = start + Duration::days(i as i64);
            match (i / 10) % 3 {
                0 => MoodEntry::new(date, 4, EnergyLevel::VeryHigh, 4.5)
                    .risky(i % 2 == 0)
                    .impulsive(i % 3 == 0),
                1 => MoodEntry::new(date, (i % 3) as i8 - 1, EnergyLevel::Normal, 7.5),
                _ => MoodEntry::new(date, -4, EnergyLevel::Low, 10.0)
                    .impairment(Impairment::Moderate),
            }
        })
        .collect()
}

fn bench_detector(c: &mut Criterion) {
    let mut group = c.benchmark_group("detector");

    for size in [30, 365, 3650] {
        let entries = create_test_entries(size);
        group.throughput(Throughput::Elements(size as u64));

        for continuity in [RunContinuity::CalendarDays, RunContinuity::EntryOrder] {
            let detector = EpisodeDetector::new(continuity);
            group.bench_function(format!("{:?}_{}", continuity, size), |b| {
                b.iter(|| detector.detect(black_box(&entries)))
            });
        }
    }

    group.finish();
}

fn bench_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("statistics");

    for size in [30, 365, 3650] {
        let entries = create_test_entries(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("compute_{}", size), |b| {
            b.iter(|| EntryStatistics::compute(black_box(&entries)))
        });
    }

    group.finish();
}

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    let engine = PatternAnalysisEngine::default();

    for size in [30, 365, 3650] {
        let series = EntrySeries::new(create_test_entries(size)).unwrap();
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("analyze_{}", size), |b| {
            b.iter(|| engine.analyze(black_box(&series)))
        });

        group.bench_function(format!("snapshot_{}", size), |b| {
            b.iter(|| engine.snapshot(black_box(&series)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_detector, bench_statistics, bench_engine);
criterion_main!(benches);
