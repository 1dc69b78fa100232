use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use csv::StringRecord;
use serde::Serialize;

use crate::timeline::ShotEvent;

const GOAL_OUTCOME: &str = "Goal";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordWarning {
    pub line: u64,
    pub message: String,
}

impl fmt::Display for RecordWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShotData {
    pub events: Vec<ShotEvent>,
    pub warnings: Vec<RecordWarning>,
}

impl ShotData {
    /// Distinct teams in order of first appearance.
    pub fn teams(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for event in &self.events {
            if !out.contains(&event.team.as_str()) {
                out.push(&event.team);
            }
        }
        out
    }
}

pub fn load_shot_csv(path: &Path) -> Result<ShotData> {
    let file =
        File::open(path).with_context(|| format!("open shot csv {}", path.display()))?;
    parse_shot_csv(file).with_context(|| format!("parse shot csv {}", path.display()))
}

/// Reads shot rows (`Minute`, `Squad`, `xG`, optional `Outcome` and `Player`).
/// Rows with an unreadable minute or xG are skipped and reported one by one.
pub fn parse_shot_csv<R: Read>(reader: R) -> Result<ShotData> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().context("read csv header")?.clone();
    let columns = ShotColumns::resolve(&headers)?;

    let mut data = ShotData::default();
    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                let line = err.position().map(|p| p.line()).unwrap_or(0);
                data.warnings.push(RecordWarning {
                    line,
                    message: format!("unreadable row: {err}"),
                });
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        match columns.parse(&record) {
            Ok(event) => data.events.push(event),
            Err(message) => data.warnings.push(RecordWarning { line, message }),
        }
    }
    Ok(data)
}

struct ShotColumns {
    minute: usize,
    team: usize,
    xg: usize,
    outcome: Option<usize>,
    player: Option<usize>,
}

impl ShotColumns {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
        };
        Ok(Self {
            minute: find(&["Minute"]).ok_or_else(|| anyhow!("missing Minute column"))?,
            team: find(&["Squad", "Team"]).ok_or_else(|| anyhow!("missing Squad column"))?,
            xg: find(&["xG"]).ok_or_else(|| anyhow!("missing xG column"))?,
            outcome: find(&["Outcome"]),
            player: find(&["Player"]),
        })
    }

    fn parse(&self, record: &StringRecord) -> std::result::Result<ShotEvent, String> {
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let team = field(self.team);
        if team.is_empty() {
            return Err("missing squad".to_string());
        }
        let raw_minute = field(self.minute);
        let minute =
            parse_minute(raw_minute).ok_or_else(|| format!("invalid minute '{raw_minute}'"))?;
        let raw_xg = field(self.xg);
        let metric_value =
            parse_metric(raw_xg).ok_or_else(|| format!("invalid xG '{raw_xg}'"))?;

        Ok(ShotEvent {
            team: team.to_string(),
            minute,
            metric_value,
            is_qualifying_outcome: self
                .outcome
                .is_some_and(|idx| field(idx).eq_ignore_ascii_case(GOAL_OUTCOME)),
            actor: self.player.map(field).unwrap_or_default().to_string(),
        })
    }
}

/// Match minute, accepting stoppage time written as `45+2`.
pub fn parse_minute(raw: &str) -> Option<f64> {
    let raw = raw.trim().trim_end_matches('\'');
    let total = match raw.split_once('+') {
        Some((base, extra)) => base.trim().parse::<f64>().ok()? + extra.trim().parse::<f64>().ok()?,
        None => raw.parse::<f64>().ok()?,
    };
    (total.is_finite() && total >= 0.0).then_some(total)
}

pub fn parse_metric(raw: &str) -> Option<f64> {
    let value = raw.trim().parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}
