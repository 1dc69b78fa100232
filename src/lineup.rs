use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupPlayer {
    pub name: String,
    pub number: Option<u32>,
    pub position: String,
    /// Percent of pitch length, 0..=100.
    pub x: f64,
    /// Percent of pitch width, 0..=100.
    pub y: f64,
}

impl LineupPlayer {
    pub fn label(&self) -> String {
        let number = self
            .number
            .map(|n| n.to_string())
            .unwrap_or_else(|| "--".to_string());
        if self.position.is_empty() {
            format!("#{number} {}", self.name)
        } else {
            format!("#{number} {} - {}", self.name, self.position)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupTeam {
    pub country: String,
    pub players: Vec<LineupPlayer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lineup {
    pub teams: Vec<LineupTeam>,
}

pub fn load_lineup_json(path: &Path) -> Result<Lineup> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read lineup json {}", path.display()))?;
    parse_lineup_json(&raw).with_context(|| format!("parse lineup json {}", path.display()))
}

pub fn parse_lineup_json(raw: &str) -> Result<Lineup> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Lineup::default());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid lineup json")?;
    let Some(teams) = root.get("teams").and_then(Value::as_array) else {
        return Err(anyhow!("lineup json has no teams"));
    };

    let teams = teams
        .iter()
        .filter_map(|team| {
            let country = team.get("country")?.as_str()?.trim().to_string();
            let players = team
                .get("players")
                .and_then(Value::as_array)
                .map(|list| list.iter().filter_map(parse_player).collect())
                .unwrap_or_default();
            Some(LineupTeam { country, players })
        })
        .collect();
    Ok(Lineup { teams })
}

fn parse_player(v: &Value) -> Option<LineupPlayer> {
    let name = v.get("name")?.as_str()?.trim().to_string();
    let x = v.get("x")?.as_f64()?;
    let y = v.get("y")?.as_f64()?;
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    let number = v.get("number").and_then(|n| {
        n.as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .or_else(|| n.as_str()?.trim().parse().ok())
    });
    let position = v
        .get("position")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();
    Some(LineupPlayer {
        name,
        number,
        position,
        x,
        y,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PitchRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PitchMarkings {
    pub width: f64,
    pub height: f64,
    pub halfway_x: f64,
    pub centre: (f64, f64),
    pub centre_radius: f64,
    pub penalty_areas: [PitchRect; 2],
}

impl PitchMarkings {
    pub fn for_size(width: f64, height: f64) -> Self {
        let area_w = width * 0.18;
        let area_h = height * 0.4;
        let area_y = (height - area_h) / 2.0;
        Self {
            width,
            height,
            halfway_x: width / 2.0,
            centre: (width / 2.0, height / 2.0),
            centre_radius: height / 6.0,
            penalty_areas: [
                PitchRect {
                    x: 0.0,
                    y: area_y,
                    width: area_w,
                    height: area_h,
                },
                PitchRect {
                    x: width - area_w,
                    y: area_y,
                    width: area_w,
                    height: area_h,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerMarker {
    pub x: f64,
    pub y: f64,
    pub label: String,
    pub country: String,
    pub highlighted: bool,
}

/// Maps every player's percent coordinates onto a `width` x `height` pitch.
pub fn pitch_markers(lineup: &Lineup, highlight: &str, width: f64, height: f64) -> Vec<PlayerMarker> {
    let scale = |pct: f64, extent: f64| pct.clamp(0.0, 100.0) / 100.0 * extent;
    lineup
        .teams
        .iter()
        .flat_map(|team| {
            let highlighted = team.country.eq_ignore_ascii_case(highlight);
            team.players.iter().map(move |p| PlayerMarker {
                x: scale(p.x, width),
                y: scale(p.y, height),
                label: p.label(),
                country: team.country.clone(),
                highlighted,
            })
        })
        .collect()
}
