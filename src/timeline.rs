use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotEvent {
    pub team: String,
    pub minute: f64,
    pub metric_value: f64,
    pub is_qualifying_outcome: bool,
    pub actor: String,
}

impl ShotEvent {
    fn is_usable(&self) -> bool {
        self.minute.is_finite()
            && self.minute >= 0.0
            && self.metric_value.is_finite()
            && self.metric_value >= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub minute: f64,
    pub cumulative_value: f64,
}

impl TimelinePoint {
    pub const ORIGIN: TimelinePoint = TimelinePoint {
        minute: 0.0,
        cumulative_value: 0.0,
    };
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamTimeline {
    pub team: String,
    pub points: Vec<TimelinePoint>,
}

impl TeamTimeline {
    pub fn last_value(&self) -> f64 {
        self.points
            .last()
            .map(|p| p.cumulative_value)
            .unwrap_or(0.0)
    }

    /// Cumulative value at `minute`, or at the first point after it when no
    /// point sits exactly there. Several points at the same minute resolve to
    /// the last of them.
    pub fn value_at_or_after(&self, minute: f64) -> f64 {
        let idx = self.points.partition_point(|p| p.minute <= minute);
        if idx > 0 && self.points[idx - 1].minute == minute {
            return self.points[idx - 1].cumulative_value;
        }
        match self.points.get(idx) {
            Some(p) => p.cumulative_value,
            None => self.last_value(),
        }
    }

    /// Vertices of the step-after curve: the value holds until the next
    /// point's minute, then jumps.
    pub fn step_path(&self) -> Vec<(f64, f64)> {
        let mut out = Vec::with_capacity(self.points.len() * 2);
        let mut prev: Option<TimelinePoint> = None;
        for p in &self.points {
            if let Some(prev) = prev
                && p.minute > prev.minute
                && p.cumulative_value != prev.cumulative_value
            {
                out.push((p.minute, prev.cumulative_value));
            }
            out.push((p.minute, p.cumulative_value));
            prev = Some(*p);
        }
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimelineSet {
    pub timelines: Vec<TeamTimeline>,
    pub match_end_minute: f64,
    pub warnings: Vec<String>,
}

impl TimelineSet {
    pub fn get(&self, team: &str) -> Option<&TeamTimeline> {
        self.timelines.iter().find(|t| same_team(&t.team, team))
    }

    pub fn max_value(&self) -> f64 {
        self.timelines
            .iter()
            .map(TeamTimeline::last_value)
            .fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalMarker {
    pub team: String,
    pub minute: f64,
    pub cumulative_value: f64,
    pub actor: String,
    pub metric_value: f64,
}

pub fn build_timelines(events: &[ShotEvent], teams: &[&str], match_end_minute: f64) -> TimelineSet {
    let mut warnings = Vec::new();
    let mut partitions: Vec<Vec<&ShotEvent>> = vec![Vec::new(); teams.len()];

    for event in events {
        if !event.is_usable() {
            warnings.push(format!(
                "skipped {} shot by {}: minute={} value={}",
                event.team, event.actor, event.minute, event.metric_value
            ));
            continue;
        }
        match teams.iter().position(|team| same_team(team, &event.team)) {
            Some(idx) => partitions[idx].push(event),
            None => warnings.push(format!(
                "skipped shot by {} at {}': team {} is not charted",
                event.actor, event.minute, event.team
            )),
        }
    }

    let timelines = teams
        .iter()
        .zip(partitions)
        .map(|(team, mut shots)| {
            // sort_by is stable, so same-minute shots keep their input order.
            shots.sort_by(|a, b| a.minute.total_cmp(&b.minute));

            let running = shots.iter().scan(0.0, |total, shot| {
                *total += shot.metric_value;
                Some(TimelinePoint {
                    minute: shot.minute,
                    cumulative_value: *total,
                })
            });
            let mut points: Vec<TimelinePoint> =
                std::iter::once(TimelinePoint::ORIGIN).chain(running).collect();

            if let Some(last) = points.last().copied()
                && last.minute < match_end_minute
            {
                points.push(TimelinePoint {
                    minute: match_end_minute,
                    cumulative_value: last.cumulative_value,
                });
            }

            TeamTimeline {
                team: (*team).to_string(),
                points,
            }
        })
        .collect();

    TimelineSet {
        timelines,
        match_end_minute,
        warnings,
    }
}

/// Places each qualifying event (a goal) on its own team's line.
pub fn goal_markers(events: &[ShotEvent], timelines: &TimelineSet) -> Vec<GoalMarker> {
    events
        .iter()
        .filter(|e| e.is_qualifying_outcome && e.is_usable())
        .filter_map(|e| {
            let timeline = timelines.get(&e.team)?;
            Some(GoalMarker {
                team: timeline.team.clone(),
                minute: e.minute,
                cumulative_value: timeline.value_at_or_after(e.minute),
                actor: e.actor.clone(),
                metric_value: e.metric_value,
            })
        })
        .collect()
}

fn same_team(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// End of the shared x-domain: the nominal length, stretched to cover
/// stoppage-time shots.
pub fn match_end_minute(events: &[ShotEvent], nominal: f64) -> f64 {
    events
        .iter()
        .map(|e| e.minute)
        .filter(|m| m.is_finite())
        .fold(nominal, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shot(team: &str, minute: f64, value: f64) -> ShotEvent {
        ShotEvent {
            team: team.to_string(),
            minute,
            metric_value: value,
            is_qualifying_outcome: false,
            actor: format!("{team}-{minute}"),
        }
    }

    fn goal(team: &str, minute: f64, value: f64) -> ShotEvent {
        ShotEvent {
            is_qualifying_outcome: true,
            ..shot(team, minute, value)
        }
    }

    fn pairs(timeline: &TeamTimeline) -> Vec<(f64, f64)> {
        timeline
            .points
            .iter()
            .map(|p| (p.minute, (p.cumulative_value * 100.0).round() / 100.0))
            .collect()
    }

    #[test]
    fn builds_running_totals_per_team() {
        let events = vec![shot("A", 10.0, 0.3), shot("A", 45.0, 0.5), shot("B", 80.0, 0.2)];
        let set = build_timelines(&events, &["A", "B"], 90.0);
        assert_eq!(
            pairs(set.get("A").unwrap()),
            vec![(0.0, 0.0), (10.0, 0.3), (45.0, 0.8), (90.0, 0.8)]
        );
        assert_eq!(
            pairs(set.get("B").unwrap()),
            vec![(0.0, 0.0), (80.0, 0.2), (90.0, 0.2)]
        );
        assert!(set.warnings.is_empty());
    }

    #[test]
    fn unsorted_input_is_ordered_by_minute() {
        let events = vec![shot("A", 70.0, 0.1), shot("A", 5.0, 0.2), shot("A", 30.0, 0.4)];
        let set = build_timelines(&events, &["A"], 90.0);
        let minutes: Vec<f64> = set.get("A").unwrap().points.iter().map(|p| p.minute).collect();
        assert_eq!(minutes, vec![0.0, 5.0, 30.0, 70.0, 90.0]);
    }

    #[test]
    fn empty_team_gets_start_and_end() {
        let set = build_timelines(&[], &["A", "B"], 90.0);
        for team in ["A", "B"] {
            assert_eq!(pairs(set.get(team).unwrap()), vec![(0.0, 0.0), (90.0, 0.0)]);
        }
    }

    #[test]
    fn same_minute_shots_accumulate() {
        let events = vec![shot("A", 20.0, 0.1), shot("A", 20.0, 0.25)];
        let set = build_timelines(&events, &["A"], 90.0);
        assert_eq!(
            pairs(set.get("A").unwrap()),
            vec![(0.0, 0.0), (20.0, 0.1), (20.0, 0.35), (90.0, 0.35)]
        );
    }

    #[test]
    fn no_trailing_point_when_data_reaches_the_end() {
        let events = vec![shot("A", 94.0, 0.4)];
        let set = build_timelines(&events, &["A"], 90.0);
        assert_eq!(set.get("A").unwrap().points.last().unwrap().minute, 94.0);
        assert_eq!(set.get("A").unwrap().points.len(), 2);
    }

    #[test]
    fn unusable_and_uncharted_shots_are_reported() {
        let events = vec![
            shot("A", 10.0, f64::NAN),
            shot("A", -1.0, 0.2),
            shot("C", 12.0, 0.2),
            shot("A", 15.0, 0.2),
        ];
        let set = build_timelines(&events, &["A"], 90.0);
        assert_eq!(set.warnings.len(), 3);
        assert_eq!(set.get("A").unwrap().last_value(), 0.2);
    }

    #[test]
    fn goal_marker_uses_last_value_at_its_minute() {
        let events = vec![
            shot("A", 20.0, 0.1),
            goal("A", 20.0, 0.5),
            shot("A", 20.0, 0.2),
            goal("B", 60.0, 0.3),
        ];
        let set = build_timelines(&events, &["A", "B"], 90.0);
        let markers = goal_markers(&events, &set);
        assert_eq!(markers.len(), 2);
        assert!((markers[0].cumulative_value - 0.8).abs() < 1e-9);
        assert_eq!(markers[0].team, "A");
        assert!((markers[1].cumulative_value - 0.3).abs() < 1e-9);
    }

    #[test]
    fn team_names_match_loosely() {
        let events = vec![shot("argentina ", 12.0, 0.4), goal("ARGENTINA", 30.0, 0.3)];
        let set = build_timelines(&events, &["Argentina", "Mexico"], 90.0);
        assert!(set.warnings.is_empty());
        let argentina = set.get("argentina").unwrap();
        assert_eq!(argentina.team, "Argentina");
        assert!((argentina.last_value() - 0.7).abs() < 1e-9);

        let markers = goal_markers(&events, &set);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].team, "Argentina");
        assert!((markers[0].cumulative_value - 0.7).abs() < 1e-9);
    }

    #[test]
    fn value_lookup_falls_forward_then_holds() {
        let timeline = TeamTimeline {
            team: "A".to_string(),
            points: vec![
                TimelinePoint::ORIGIN,
                TimelinePoint {
                    minute: 30.0,
                    cumulative_value: 0.4,
                },
            ],
        };
        assert_eq!(timeline.value_at_or_after(15.0), 0.4);
        assert_eq!(timeline.value_at_or_after(0.0), 0.0);
        assert_eq!(timeline.value_at_or_after(80.0), 0.4);
    }

    #[test]
    fn step_path_holds_value_until_next_minute() {
        let set = build_timelines(&[shot("A", 10.0, 0.5)], &["A"], 90.0);
        assert_eq!(
            set.get("A").unwrap().step_path(),
            vec![(0.0, 0.0), (10.0, 0.0), (10.0, 0.5), (90.0, 0.5)]
        );
    }

    #[test]
    fn match_end_stretches_for_stoppage_time() {
        let events = vec![shot("A", 93.0, 0.1), shot("B", 40.0, 0.1)];
        assert_eq!(match_end_minute(&events, 90.0), 93.0);
        assert_eq!(match_end_minute(&[], 90.0), 90.0);
    }
}
