use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use wc22_terminal::shot_data::load_shot_csv;
use wc22_terminal::timeline::{
    ShotEvent, build_timelines, goal_markers, match_end_minute,
};

const TEAMS: [&str; 2] = ["Home", "Away"];

fn random_events(rng: &mut StdRng, count: usize) -> Vec<ShotEvent> {
    (0..count)
        .map(|idx| ShotEvent {
            team: TEAMS[rng.gen_range(0..TEAMS.len())].to_string(),
            minute: f64::from(rng.gen_range(0..=97u32)),
            metric_value: rng.gen_range(0.0..0.8),
            is_qualifying_outcome: rng.gen_bool(0.1),
            actor: format!("player {idx}"),
        })
        .collect()
}

#[test]
fn timelines_are_monotonic_and_span_the_match() {
    let mut rng = StdRng::seed_from_u64(2022);
    for _ in 0..50 {
        let count = rng.gen_range(0..40);
        let events = random_events(&mut rng, count);
        let end = match_end_minute(&events, 90.0);
        let set = build_timelines(&events, &TEAMS, end);

        assert!(set.warnings.is_empty());
        for timeline in &set.timelines {
            let first = timeline.points.first().unwrap();
            assert_eq!((first.minute, first.cumulative_value), (0.0, 0.0));
            assert_eq!(timeline.points.last().unwrap().minute, end);
            assert!(timeline.points.windows(2).all(|w| {
                w[0].minute <= w[1].minute && w[0].cumulative_value <= w[1].cumulative_value
            }));

            let expected: f64 = events
                .iter()
                .filter(|e| e.team == timeline.team)
                .map(|e| e.metric_value)
                .sum();
            assert!((timeline.last_value() - expected).abs() < 1e-9);
        }
    }
}

#[test]
fn input_order_does_not_change_the_result() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let mut events = random_events(&mut rng, 25);
        // Distinct minutes keep equal-minute ties out of the comparison.
        for (idx, event) in events.iter_mut().enumerate() {
            event.minute = idx as f64 * 3.0 + 1.0;
        }
        let baseline = build_timelines(&events, &TEAMS, 90.0);
        events.shuffle(&mut rng);
        let shuffled = build_timelines(&events, &TEAMS, 90.0);
        assert_eq!(baseline, shuffled);
        assert_eq!(build_timelines(&events, &TEAMS, 90.0), shuffled);
    }
}

#[test]
fn goal_markers_sit_on_their_team_line() {
    let mut rng = StdRng::seed_from_u64(11);
    let events = random_events(&mut rng, 60);
    let set = build_timelines(&events, &TEAMS, 90.0);
    let markers = goal_markers(&events, &set);
    assert_eq!(
        markers.len(),
        events.iter().filter(|e| e.is_qualifying_outcome).count()
    );
    for marker in markers {
        let timeline = set.get(&marker.team).unwrap();
        let on_line = timeline.points.iter().any(|p| {
            p.minute == marker.minute && (p.cumulative_value - marker.cumulative_value).abs() < 1e-9
        });
        assert!(on_line, "marker at {}' is off the line", marker.minute);
    }
}

#[test]
fn saudi_fixture_builds_expected_lines() {
    let mut path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures/shot-data/argentina-saudi.csv");
    let data = load_shot_csv(&path).expect("fixture should parse");

    let end = match_end_minute(&data.events, 90.0);
    assert_eq!(end, 95.0);
    let set = build_timelines(&data.events, &["Argentina", "Saudi Arabia"], end);

    let argentina = set.get("Argentina").unwrap();
    assert!((argentina.last_value() - 1.16).abs() < 1e-9);
    assert_eq!(argentina.points.last().unwrap().minute, 95.0);
    assert_eq!(argentina.points.len(), 8);

    let saudi = set.get("Saudi Arabia").unwrap();
    let last = saudi.points.last().unwrap();
    assert_eq!(last.minute, 95.0);
    assert!((last.cumulative_value - 0.17).abs() < 1e-9);

    let markers = goal_markers(&data.events, &set);
    let values: Vec<f64> = markers.iter().map(|m| m.cumulative_value).collect();
    assert_eq!(values.len(), 3);
    assert!((values[0] - 0.84).abs() < 1e-9);
    assert!((values[1] - 0.13).abs() < 1e-9);
    assert!((values[2] - 0.17).abs() < 1e-9);
}
