use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryGoals {
    pub country: String,
    pub total_goals: u32,
}

pub fn load_goals_json(path: &Path) -> Result<Vec<CountryGoals>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read goals json {}", path.display()))?;
    parse_goals_json(&raw).with_context(|| format!("parse goals json {}", path.display()))
}

pub fn parse_goals_json(raw: &str) -> Result<Vec<CountryGoals>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid goals json")?;
    let Some(rows) = root.as_array() else {
        return Err(anyhow!("goals json is not a list"));
    };

    // Rows without a country or a readable total are dropped.
    Ok(rows
        .iter()
        .filter_map(|row| {
            let country = row.get("country")?.as_str()?.trim();
            if country.is_empty() {
                return None;
            }
            let goals = row.get("total_goals")?;
            let total_goals = goals
                .as_u64()
                .or_else(|| goals.as_str()?.trim().parse::<u64>().ok())?;
            Some(CountryGoals {
                country: country.to_string(),
                total_goals: u32::try_from(total_goals).ok()?,
            })
        })
        .collect())
}

/// Highest totals first; ties broken by country name.
pub fn top_scorers(rows: &[CountryGoals], n: usize) -> Vec<CountryGoals> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| {
        b.total_goals
            .cmp(&a.total_goals)
            .then_with(|| a.country.cmp(&b.country))
    });
    sorted.truncate(n);
    sorted
}
