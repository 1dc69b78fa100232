use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;

use wc22_terminal::bracket::{BracketDraw, BracketGeometry, BracketLayout, layout_bracket};
use wc22_terminal::config::AppConfig;
use wc22_terminal::flags::flag_path;
use wc22_terminal::knockout::load_knockout_json;

const DEFAULT_WIDTH: f64 = 1280.0;

#[derive(Serialize)]
struct Dump<'a> {
    container_width: f64,
    scale: f64,
    layout: &'a BracketLayout,
    flags: serde_json::Value,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let mut config = AppConfig::from_env();
    if let Some(dir) = arg_value("--data") {
        config = config.with_data_dir(PathBuf::from(dir));
    }
    let width = arg_value("--width")
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|w| w.is_finite() && *w > 0.0)
        .unwrap_or(DEFAULT_WIDTH);

    let knockout = load_knockout_json(&config.bracket_path())?;
    for warning in &knockout.warnings {
        eprintln!("[WARN] {warning}");
    }

    let layout = layout_bracket(
        &config.round_names(),
        &knockout.matches_by_round,
        &config.tracked_team,
        &BracketDraw::world_cup_2022(),
        &BracketGeometry::default(),
    );
    for warning in &layout.warnings {
        eprintln!("[WARN] {warning}");
    }

    let mut flags = serde_json::Map::new();
    for node in &layout.nodes {
        for team in [&node.fixture.entrant_a, &node.fixture.entrant_b] {
            flags
                .entry(team.clone())
                .or_insert_with(|| json!(flag_path(team)));
        }
    }

    let dump = Dump {
        container_width: width,
        scale: layout.scale_to_fit(width),
        layout: &layout,
        flags: serde_json::Value::Object(flags),
    };
    let out = serde_json::to_string_pretty(&dump).context("serialize bracket layout")?;
    println!("{out}");
    Ok(())
}

fn arg_value(name: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.clone());
            }
        }
    }
    None
}
