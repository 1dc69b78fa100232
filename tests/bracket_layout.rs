use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use wc22_terminal::bracket::{
    BracketDraw, BracketGeometry, BracketLayout, BracketWarning, TournamentMatch, layout_bracket,
};
use wc22_terminal::config::ROUND_NAMES;
use wc22_terminal::knockout::parse_knockout_json;

fn knockout_fixture() -> HashMap<String, Vec<TournamentMatch>> {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("metadata");
    path.push("elimination-bracket.json");
    let raw = fs::read_to_string(path).expect("fixture file should be readable");
    parse_knockout_json(&raw)
        .expect("fixture should parse")
        .matches_by_round
}

fn rounds() -> Vec<String> {
    ROUND_NAMES.iter().map(|r| r.to_string()).collect()
}

fn layout(by_round: &HashMap<String, Vec<TournamentMatch>>, tracked: &str) -> BracketLayout {
    layout_bracket(
        &rounds(),
        by_round,
        tracked,
        &BracketDraw::world_cup_2022(),
        &BracketGeometry::default(),
    )
}

#[test]
fn full_bracket_places_every_fixture() {
    let layout = layout(&knockout_fixture(), "Argentina");
    assert!(layout.warnings.is_empty(), "{:?}", layout.warnings);
    assert_eq!(layout.nodes.len(), 15);
    assert_eq!(layout.connectors.len(), 21);
    assert_eq!(layout.round_labels.len(), 4);
    assert_eq!(layout.canvas.width, 1210.0);
    assert_eq!(layout.canvas.height, 1042.0);

    let r16: Vec<(&str, &str)> = layout
        .nodes
        .iter()
        .filter(|n| n.round == 0)
        .map(|n| (n.fixture.entrant_a.as_str(), n.fixture.entrant_b.as_str()))
        .collect();
    assert_eq!(r16[0], ("Netherlands", "United States"));
    assert_eq!(r16[2], ("Japan", "Croatia"));
    assert_eq!(r16[6], ("France", "Poland"));
    assert_eq!(r16[7], ("England", "Senegal"));
}

#[test]
fn tracked_path_follows_argentina_to_the_final() {
    let layout = layout(&knockout_fixture(), "Argentina");
    let path: Vec<(usize, usize)> = layout.tracked_nodes().map(|n| (n.round, n.slot)).collect();
    assert_eq!(path, vec![(0, 1), (1, 0), (2, 0), (3, 0)]);
    assert_eq!(
        layout.connectors.iter().filter(|c| c.on_tracked_path).count(),
        6
    );
}

#[test]
fn tracked_path_includes_the_losing_round() {
    let layout = layout(&knockout_fixture(), "Morocco");
    let seen: Vec<usize> = layout.tracked_nodes().map(|n| n.round).collect();
    assert_eq!(seen, vec![0, 1, 2]);

    let nobody = layout_bracket(
        &rounds(),
        &knockout_fixture(),
        "Atlantis",
        &BracketDraw::world_cup_2022(),
        &BracketGeometry::default(),
    );
    assert_eq!(nobody.tracked_nodes().count(), 0);
    assert!(nobody.connectors.iter().all(|c| !c.on_tracked_path));
}

#[test]
fn every_later_node_is_centred_on_its_feeders() {
    let layout = layout(&knockout_fixture(), "Argentina");
    let at = |round: usize, slot: usize| {
        layout
            .nodes
            .iter()
            .find(|n| n.round == round && n.slot == slot)
            .unwrap()
    };
    for round in 1..4 {
        for node in layout.nodes.iter().filter(|n| n.round == round) {
            let a = at(round - 1, 2 * node.slot);
            let b = at(round - 1, 2 * node.slot + 1);
            assert_eq!(node.y, (a.y + b.y) / 2.0);
            assert!(node.fixture.involves(&a.fixture.winner));
            assert!(node.fixture.involves(&b.fixture.winner));
        }
    }
}

#[test]
fn source_order_does_not_change_the_layout() {
    let baseline = layout(&knockout_fixture(), "Argentina");
    let mut rng = StdRng::seed_from_u64(18);
    for _ in 0..10 {
        let mut shuffled = knockout_fixture();
        for fixtures in shuffled.values_mut() {
            fixtures.shuffle(&mut rng);
        }
        assert_eq!(layout(&shuffled, "Argentina"), baseline);
    }
}

#[test]
fn missing_round_keeps_later_rounds_in_place() {
    let full = layout(&knockout_fixture(), "Argentina");
    let mut partial_data = knockout_fixture();
    partial_data.remove("Quarter-finals");
    let partial = layout(&partial_data, "Argentina");

    assert!(partial.warnings.contains(&BracketWarning::MissingRound {
        round: "Quarter-finals".to_string(),
    }));
    assert_eq!(partial.nodes.len(), 11);
    assert!(partial.nodes.iter().all(|n| n.round != 1));

    for node in &partial.nodes {
        let same = full
            .nodes
            .iter()
            .find(|n| n.round == node.round && n.slot == node.slot)
            .unwrap();
        assert_eq!((node.x, node.y), (same.x, same.y));
        assert_eq!(node.fixture, same.fixture);
    }
    assert!(partial.round_labels.iter().all(|l| l.name != "Quarter-finals"));
}

#[test]
fn scale_to_fit_never_enlarges() {
    let layout = layout(&knockout_fixture(), "Argentina");
    assert_eq!(layout.scale_to_fit(1234.0), 1.0);
    assert_eq!(layout.scale_to_fit(5000.0), 1.0);
    assert!((layout.scale_to_fit(630.0) - 606.0 / 1210.0).abs() < 1e-12);

    for width in [0.0, 10.0, 320.0, 640.0, 1024.0, 1233.0, 1920.0] {
        let scale = layout.scale_to_fit(width);
        assert!((0.0..=1.0).contains(&scale));
        assert!(layout.scaled_size(width).width <= width + 1e-9);
        if width > 24.0 {
            assert!(layout.scaled_size(width).width <= width - 24.0 + 1e-9);
        }
    }
}

#[test]
fn empty_data_yields_an_empty_layout() {
    let layout = layout(&HashMap::new(), "Argentina");
    assert!(layout.nodes.is_empty());
    assert!(layout.connectors.is_empty());
    assert_eq!(layout.canvas.width, 0.0);
    assert_eq!(layout.scale_to_fit(800.0), 1.0);
    assert_eq!(layout.warnings.len(), 4);
}
