// Benchmark for recurrence calculations
// Measures date generation and series expansion per frequency

use calendar_planner::models::event::Event;
use calendar_planner::models::recurrence::RepeatFrequency;
use calendar_planner::services::recurrence::{expand_series, generate_repeat_dates};
use calendar_planner::services::slots::busy_slots;
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
}

fn template(repeat: RepeatFrequency) -> Event {
    Event::builder()
        .title("Weekly sync")
        .date(start())
        .start_time("09:00".parse().unwrap())
        .end_time("09:45".parse().unwrap())
        .calendar_id("bench")
        .repeat(repeat)
        .build()
        .unwrap()
}

fn bench_repeat_dates(c: &mut Criterion) {
    let mut group = c.benchmark_group("repeat_dates");

    for frequency in [
        RepeatFrequency::Daily,
        RepeatFrequency::Weekly,
        RepeatFrequency::Monthly,
    ] {
        for count in [10, 100, 1000] {
            group.bench_with_input(
                BenchmarkId::new(frequency.as_str(), count),
                &count,
                |b, &count| {
                    b.iter(|| generate_repeat_dates(black_box(start()), frequency, black_box(count)))
                },
            );
        }
    }

    group.finish();
}

fn bench_expand_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("expand_series");
    let weekly = template(RepeatFrequency::Weekly);

    for count in [10, 100, 400] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| expand_series(black_box(&weekly), black_box(count)))
        });
    }

    group.finish();
}

fn bench_busy_slots(c: &mut Criterion) {
    let daily = expand_series(&template(RepeatFrequency::Daily), 100);

    c.bench_function("busy_slots_100_events", |b| {
        b.iter(|| busy_slots(black_box(daily.iter()), black_box(15)))
    });
}

criterion_group!(benches, bench_repeat_dates, bench_expand_series, bench_busy_slots);
criterion_main!(benches);
