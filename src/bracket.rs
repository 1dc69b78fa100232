use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentMatch {
    pub round_name: String,
    pub entrant_a: String,
    pub entrant_b: String,
    pub score_a: u32,
    pub score_b: u32,
    pub winner: String,
}

impl TournamentMatch {
    pub fn involves(&self, entrant: &str) -> bool {
        same_entrant(&self.entrant_a, entrant) || same_entrant(&self.entrant_b, entrant)
    }

    pub fn is_between(&self, a: &str, b: &str) -> bool {
        (same_entrant(&self.entrant_a, a) && same_entrant(&self.entrant_b, b))
            || (same_entrant(&self.entrant_a, b) && same_entrant(&self.entrant_b, a))
    }

    pub fn won_by(&self, entrant: &str) -> bool {
        same_entrant(&self.winner, entrant)
    }
}

pub fn same_entrant(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Real-world draw: per round, the pairings in bracket order. Round 0 is
/// required for name-based ordering; later rounds are only consulted when a
/// feeder is missing from the data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketDraw {
    pub rounds: Vec<Vec<(String, String)>>,
}

impl BracketDraw {
    pub fn new(rounds: Vec<Vec<(&str, &str)>>) -> Self {
        Self {
            rounds: rounds
                .into_iter()
                .map(|pairs| {
                    pairs
                        .into_iter()
                        .map(|(a, b)| (a.to_string(), b.to_string()))
                        .collect()
                })
                .collect(),
        }
    }

    pub fn world_cup_2022() -> Self {
        Self::new(vec![
            vec![
                ("Netherlands", "United States"),
                ("Argentina", "Australia"),
                ("Croatia", "Japan"),
                ("Brazil", "Korea Republic"),
                ("Morocco", "Spain"),
                ("Portugal", "Switzerland"),
                ("France", "Poland"),
                ("England", "Senegal"),
            ],
            vec![
                ("Argentina", "Netherlands"),
                ("Croatia", "Brazil"),
                ("Morocco", "Portugal"),
                ("France", "England"),
            ],
            vec![("Argentina", "Croatia"), ("France", "Morocco")],
            vec![("Argentina", "France")],
        ])
    }

    fn pairing(&self, round: usize, slot: usize) -> Option<(&str, &str)> {
        self.rounds
            .get(round)?
            .get(slot)
            .map(|(a, b)| (a.as_str(), b.as_str()))
    }

    fn slots_in(&self, round: usize) -> usize {
        self.rounds.get(round).map(Vec::len).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BracketGeometry {
    pub col_w: f64,
    pub card_w: f64,
    pub card_h: f64,
    pub top_pad: f64,
    pub base_gap: f64,
    pub left_pad: f64,
    pub margin: f64,
    pub fit_gutter: f64,
}

impl Default for BracketGeometry {
    fn default() -> Self {
        Self {
            col_w: 300.0,
            card_w: 240.0,
            card_h: 92.0,
            top_pad: 70.0,
            base_gap: 28.0,
            left_pad: 30.0,
            margin: 40.0,
            fit_gutter: 24.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BracketNode {
    #[serde(rename = "match")]
    pub fixture: TournamentMatch,
    pub round: usize,
    pub slot: usize,
    pub x: f64,
    pub y: f64,
    pub is_on_tracked_path: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConnectorKind {
    Feeder,
    IntoNext,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectorPath {
    pub kind: ConnectorKind,
    pub points: Vec<(f64, f64)>,
    pub on_tracked_path: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundLabel {
    pub name: String,
    pub x: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BracketWarning {
    MissingRound { round: String },
    MissingFixture { round: String, slot: usize },
    AmbiguousFeeder { round: String },
    UnplacedFixture { round: String, entrants: (String, String) },
}

impl fmt::Display for BracketWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketWarning::MissingRound { round } => write!(f, "{round}: no fixtures in data"),
            BracketWarning::MissingFixture { round, slot } => {
                write!(f, "{round}: no fixture for bracket slot {}", slot + 1)
            }
            BracketWarning::AmbiguousFeeder { round } => {
                write!(f, "{round}: bracket order unresolved by name, using source order")
            }
            BracketWarning::UnplacedFixture { round, entrants } => {
                write!(f, "{round}: {} vs {} does not fit the bracket", entrants.0, entrants.1)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BracketLayout {
    pub nodes: Vec<BracketNode>,
    pub connectors: Vec<ConnectorPath>,
    pub round_labels: Vec<RoundLabel>,
    pub canvas: CanvasSize,
    pub geometry: BracketGeometry,
    pub warnings: Vec<BracketWarning>,
}

impl BracketLayout {
    /// Uniform factor that fits the canvas into `container_width`. Never
    /// above 1: small brackets keep their natural size.
    pub fn scale_to_fit(&self, container_width: f64) -> f64 {
        if self.canvas.width <= 0.0 || !container_width.is_finite() {
            return 1.0;
        }
        let usable = if container_width > self.geometry.fit_gutter {
            container_width - self.geometry.fit_gutter
        } else {
            container_width.max(0.0)
        };
        (usable / self.canvas.width).min(1.0)
    }

    pub fn scaled_size(&self, container_width: f64) -> CanvasSize {
        let scale = self.scale_to_fit(container_width);
        CanvasSize {
            width: self.canvas.width * scale,
            height: self.canvas.height * scale,
        }
    }

    pub fn tracked_nodes(&self) -> impl Iterator<Item = &BracketNode> {
        self.nodes.iter().filter(|n| n.is_on_tracked_path)
    }
}

pub fn layout_bracket(
    rounds_in_order: &[String],
    matches_by_round: &HashMap<String, Vec<TournamentMatch>>,
    tracked_entrant: &str,
    draw: &BracketDraw,
    geometry: &BracketGeometry,
) -> BracketLayout {
    let mut warnings = Vec::new();
    let slots = resolve_slots(rounds_in_order, matches_by_round, draw, &mut warnings);
    let rows = slot_rows(&slots, geometry);

    let tracked: Vec<Option<usize>> = slots
        .iter()
        .map(|round| {
            round
                .iter()
                .position(|m| m.as_ref().is_some_and(|m| m.involves(tracked_entrant)))
        })
        .collect();

    let column_x = |round: usize| geometry.left_pad + round as f64 * geometry.col_w;

    let mut nodes = Vec::new();
    for (r, round) in slots.iter().enumerate() {
        for (i, fixture) in round.iter().enumerate() {
            let Some(fixture) = fixture else {
                continue;
            };
            nodes.push(BracketNode {
                fixture: fixture.clone(),
                round: r,
                slot: i,
                x: column_x(r),
                y: rows[r][i],
                is_on_tracked_path: tracked[r] == Some(i),
            });
        }
    }

    let mut connectors = Vec::new();
    for r in 0..slots.len().saturating_sub(1) {
        for i in 0..slots[r + 1].len() {
            if slots[r + 1][i].is_none() {
                continue;
            }
            let to_x = column_x(r + 1);
            let to_y = rows[r + 1][i] + geometry.card_h / 2.0;
            let from_x = column_x(r) + geometry.card_w;
            let mid_x = (from_x + to_x) / 2.0;
            let node_on_path = tracked[r + 1] == Some(i);

            let mut fed = false;
            let mut fed_on_path = false;
            for feeder in [2 * i, 2 * i + 1] {
                if !slots[r].get(feeder).is_some_and(Option::is_some) {
                    continue;
                }
                let from_y = rows[r][feeder] + geometry.card_h / 2.0;
                let on_path = node_on_path && tracked[r] == Some(feeder);
                connectors.push(ConnectorPath {
                    kind: ConnectorKind::Feeder,
                    points: vec![(from_x, from_y), (mid_x, from_y), (mid_x, to_y)],
                    on_tracked_path: on_path,
                });
                fed = true;
                fed_on_path |= on_path;
            }
            if fed {
                connectors.push(ConnectorPath {
                    kind: ConnectorKind::IntoNext,
                    points: vec![(mid_x, to_y), (to_x, to_y)],
                    on_tracked_path: fed_on_path,
                });
            }
        }
    }

    let round_labels = slots
        .iter()
        .enumerate()
        .filter(|(_, round)| round.iter().any(Option::is_some))
        .map(|(r, _)| RoundLabel {
            name: rounds_in_order[r].clone(),
            x: column_x(r) + geometry.card_w / 2.0,
        })
        .collect();

    let canvas = if nodes.is_empty() {
        CanvasSize::default()
    } else {
        let max_x = nodes.iter().map(|n| n.x).fold(f64::MIN, f64::max);
        let max_y = nodes.iter().map(|n| n.y).fold(f64::MIN, f64::max);
        CanvasSize {
            width: max_x + geometry.card_w + geometry.margin,
            height: max_y + geometry.card_h + geometry.margin,
        }
    };

    BracketLayout {
        nodes,
        connectors,
        round_labels,
        canvas,
        geometry: *geometry,
        warnings,
    }
}

/// Places every fixture into its bracket slot. Slot `i` of round `r + 1` is
/// fed by slots `2i` and `2i + 1` of round `r`.
fn resolve_slots(
    rounds_in_order: &[String],
    matches_by_round: &HashMap<String, Vec<TournamentMatch>>,
    draw: &BracketDraw,
    warnings: &mut Vec<BracketWarning>,
) -> Vec<Vec<Option<TournamentMatch>>> {
    let mut slots: Vec<Vec<Option<TournamentMatch>>> = Vec::with_capacity(rounds_in_order.len());

    for (r, round_name) in rounds_in_order.iter().enumerate() {
        let pool: &[TournamentMatch] = matches_by_round
            .get(round_name)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        // A previous round with no slots cannot size this one.
        let slot_count = match slots.last().map(|prev| prev.len().div_ceil(2)) {
            Some(fed) if fed > 0 => fed.max(draw.slots_in(r)),
            _ if draw.slots_in(r) > 0 => draw.slots_in(r),
            _ => pool.len(),
        };

        if pool.is_empty() {
            warnings.push(BracketWarning::MissingRound {
                round: round_name.clone(),
            });
            slots.push(vec![None; slot_count]);
            continue;
        }

        let mut used = vec![false; pool.len()];
        let mut placed: Vec<Option<usize>> = vec![None; slot_count];
        for (i, slot) in placed.iter_mut().enumerate() {
            let found = match slots.last() {
                Some(prev) => find_fed_fixture(pool, &used, prev, i)
                    .or_else(|| find_drawn_fixture(pool, &used, draw.pairing(r, i))),
                None => find_drawn_fixture(pool, &used, draw.pairing(r, i)),
            };
            if let Some(idx) = found {
                used[idx] = true;
                *slot = Some(idx);
            }
        }

        let has_gaps = placed.iter().any(Option::is_none);
        if has_gaps && used.iter().any(|u| !u) {
            warnings.push(BracketWarning::AmbiguousFeeder {
                round: round_name.clone(),
            });
            let unused: Vec<usize> = (0..pool.len()).filter(|idx| !used[*idx]).collect();
            let mut leftovers = unused.into_iter();
            for slot in placed.iter_mut().filter(|s| s.is_none()) {
                let Some(idx) = leftovers.next() else {
                    break;
                };
                used[idx] = true;
                *slot = Some(idx);
            }
        }

        for (i, slot) in placed.iter().enumerate() {
            if slot.is_none() {
                warnings.push(BracketWarning::MissingFixture {
                    round: round_name.clone(),
                    slot: i,
                });
            }
        }
        for (idx, fixture) in pool.iter().enumerate() {
            if !used[idx] {
                warnings.push(BracketWarning::UnplacedFixture {
                    round: round_name.clone(),
                    entrants: (fixture.entrant_a.clone(), fixture.entrant_b.clone()),
                });
            }
        }

        slots.push(
            placed
                .into_iter()
                .map(|slot| slot.map(|idx| pool[idx].clone()))
                .collect(),
        );
    }
    slots
}

/// Finds the fixture between the winners of the two feeder slots. With only
/// one feeder known, a unique fixture involving its winner is accepted.
fn find_fed_fixture(
    pool: &[TournamentMatch],
    used: &[bool],
    prev: &[Option<TournamentMatch>],
    slot: usize,
) -> Option<usize> {
    let winner = |idx: usize| prev.get(idx)?.as_ref().map(|m| m.winner.as_str());
    match (winner(2 * slot), winner(2 * slot + 1)) {
        (Some(a), Some(b)) => position_unused(pool, used, |m| m.is_between(a, b)),
        (Some(w), None) | (None, Some(w)) => {
            let mut candidates =
                (0..pool.len()).filter(|idx| !used[*idx] && pool[*idx].involves(w));
            let first = candidates.next()?;
            candidates.next().is_none().then_some(first)
        }
        (None, None) => None,
    }
}

fn find_drawn_fixture(
    pool: &[TournamentMatch],
    used: &[bool],
    pairing: Option<(&str, &str)>,
) -> Option<usize> {
    let (a, b) = pairing?;
    position_unused(pool, used, |m| m.is_between(a, b))
}

fn position_unused(
    pool: &[TournamentMatch],
    used: &[bool],
    pred: impl Fn(&TournamentMatch) -> bool,
) -> Option<usize> {
    (0..pool.len()).find(|idx| !used[*idx] && pred(&pool[*idx]))
}

/// Vertical position of every slot, present or not, so a gap never shifts
/// the rest of the column.
fn slot_rows(slots: &[Vec<Option<TournamentMatch>>], geometry: &BracketGeometry) -> Vec<Vec<f64>> {
    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(slots.len());
    for round in slots {
        let ys = match rows.last().filter(|prev| !prev.is_empty()) {
            None => (0..round.len())
                .map(|j| geometry.top_pad + j as f64 * (geometry.card_h + geometry.base_gap))
                .collect(),
            Some(prev) => (0..round.len())
                .map(|i| match (prev.get(2 * i), prev.get(2 * i + 1)) {
                    (Some(a), Some(b)) => (a + b) / 2.0,
                    (Some(a), None) => *a,
                    _ => geometry.top_pad,
                })
                .collect(),
        };
        rows.push(ys);
    }
    rows
}
