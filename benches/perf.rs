use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use wc22_terminal::bracket::{BracketDraw, BracketGeometry, layout_bracket};
use wc22_terminal::config::AppConfig;
use wc22_terminal::knockout::parse_knockout_json;
use wc22_terminal::shot_data::parse_shot_csv;
use wc22_terminal::timeline::{ShotEvent, build_timelines, goal_markers};

const BRACKET_JSON: &str = include_str!("../tests/fixtures/metadata/elimination-bracket.json");
const SHOTS_CSV: &str = include_str!("../tests/fixtures/shot-data/argentina-saudi.csv");

fn sample_events(count: usize) -> Vec<ShotEvent> {
    (0..count)
        .map(|idx| ShotEvent {
            team: if idx % 3 == 0 { "Away" } else { "Home" }.to_string(),
            minute: ((idx * 37) % 95) as f64,
            metric_value: ((idx * 13) % 50) as f64 / 100.0,
            is_qualifying_outcome: idx % 11 == 0,
            actor: format!("player {}", idx % 22),
        })
        .collect()
}

fn bench_build_timelines(c: &mut Criterion) {
    let events = sample_events(400);
    c.bench_function("build_timelines", |b| {
        b.iter(|| {
            let set = build_timelines(black_box(&events), &["Home", "Away"], 95.0);
            let markers = goal_markers(&events, &set);
            black_box((set, markers));
        })
    });
}

fn bench_shot_csv_parse(c: &mut Criterion) {
    c.bench_function("shot_csv_parse", |b| {
        b.iter(|| {
            let data = parse_shot_csv(black_box(SHOTS_CSV.as_bytes())).expect("valid csv");
            black_box(data);
        })
    });
}

fn bench_layout_bracket(c: &mut Criterion) {
    let knockout = parse_knockout_json(BRACKET_JSON).expect("valid fixture json");
    let rounds = AppConfig::default().round_names();
    let draw = BracketDraw::world_cup_2022();
    let geometry = BracketGeometry::default();
    c.bench_function("layout_bracket", |b| {
        b.iter(|| {
            let layout = layout_bracket(
                black_box(&rounds),
                black_box(&knockout.matches_by_round),
                "Argentina",
                &draw,
                &geometry,
            );
            black_box(layout);
        })
    });
}

fn bench_knockout_parse(c: &mut Criterion) {
    c.bench_function("knockout_parse", |b| {
        b.iter(|| {
            let data = parse_knockout_json(black_box(BRACKET_JSON)).expect("valid fixture json");
            black_box(data);
        })
    });
}

criterion_group!(
    perf,
    bench_build_timelines,
    bench_shot_csv_parse,
    bench_layout_bracket,
    bench_knockout_parse
);
criterion_main!(perf);
