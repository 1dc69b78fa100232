use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use crate::bracket::{TournamentMatch, same_entrant};

const KNOCKOUT_KEY: &str = "Knockout stage";

#[derive(Debug, Clone, Default)]
pub struct KnockoutData {
    pub matches_by_round: HashMap<String, Vec<TournamentMatch>>,
    pub warnings: Vec<String>,
}

impl KnockoutData {
    pub fn fixture_count(&self) -> usize {
        self.matches_by_round.values().map(Vec::len).sum()
    }
}

pub fn load_knockout_json(path: &Path) -> Result<KnockoutData> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read bracket json {}", path.display()))?;
    parse_knockout_json(&raw).with_context(|| format!("parse bracket json {}", path.display()))
}

/// Accepts `{"Knockout stage": {round: {"matches": [...]}}}`; the final may
/// use `"match"` and hold either one object or a list.
pub fn parse_knockout_json(raw: &str) -> Result<KnockoutData> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(KnockoutData::default());
    }

    let root: Value = serde_json::from_str(trimmed).context("invalid bracket json")?;
    let stage = root.get(KNOCKOUT_KEY).unwrap_or(&root);
    let Some(rounds) = stage.as_object() else {
        return Err(anyhow!("knockout stage is not an object"));
    };

    let mut out = KnockoutData::default();
    for (round_name, round) in rounds {
        let items = round_items(round);
        let mut fixtures = Vec::with_capacity(items.len());
        for (idx, item) in items.into_iter().enumerate() {
            match parse_fixture(round_name, item) {
                Ok(fixture) => fixtures.push(fixture),
                Err(reason) => out
                    .warnings
                    .push(format!("{round_name} fixture {}: {reason}", idx + 1)),
            }
        }
        out.matches_by_round.insert(round_name.clone(), fixtures);
    }
    Ok(out)
}

fn round_items(round: &Value) -> Vec<&Value> {
    let list = round
        .get("matches")
        .or_else(|| round.get("match"))
        .unwrap_or(round);
    match list {
        Value::Array(items) => items.iter().collect(),
        Value::Object(_) if list.get("team1").is_some() => vec![list],
        _ => Vec::new(),
    }
}

fn parse_fixture(round_name: &str, v: &Value) -> std::result::Result<TournamentMatch, String> {
    let entrant_a = pick_string(v, &["team1", "home"]).ok_or("missing team1")?;
    let entrant_b = pick_string(v, &["team2", "away"]).ok_or("missing team2")?;
    let score = pick_string(v, &["score"]).unwrap_or_default();
    let (score_a, score_b) =
        parse_score_pair(&score).ok_or_else(|| format!("unreadable score '{score}'"))?;

    let winner = match pick_string(v, &["winners", "winner"]) {
        Some(name) if same_entrant(&name, &entrant_a) => entrant_a.clone(),
        Some(name) if same_entrant(&name, &entrant_b) => entrant_b.clone(),
        Some(name) => return Err(format!("winner '{name}' did not play")),
        None if score_a > score_b => entrant_a.clone(),
        None if score_b > score_a => entrant_b.clone(),
        None => return Err("no winner for a level score".to_string()),
    };

    Ok(TournamentMatch {
        round_name: round_name.to_string(),
        entrant_a,
        entrant_b,
        score_a,
        score_b,
        winner,
    })
}

fn pick_string(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(*key)?.as_str())
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// First two numbers of a score such as `2–1` or `3–3 (4–2 p)`.
pub fn parse_score_pair(raw: &str) -> Option<(u32, u32)> {
    let mut nums = raw
        .split(|ch: char| !ch.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<u32>().ok());
    let a = nums.next()?;
    let b = nums.next()?;
    Some((a, b))
}
