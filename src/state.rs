use std::collections::VecDeque;

use crate::bracket::{BracketDraw, BracketGeometry, BracketLayout, layout_bracket};
use crate::config::{AppConfig, GROUP_GAMES, GroupGame};
use crate::goals::{CountryGoals, top_scorers};
use crate::knockout::KnockoutData;
use crate::lineup::Lineup;
use crate::shot_data::ShotData;
use crate::timeline::{GoalMarker, TimelineSet, build_timelines, goal_markers, match_end_minute};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Goals,
    Xg,
    Lineup,
    Bracket,
}

impl Screen {
    pub const ALL: [Screen; 4] = [Screen::Goals, Screen::Xg, Screen::Lineup, Screen::Bracket];

    pub fn next(self) -> Self {
        match self {
            Screen::Goals => Screen::Xg,
            Screen::Xg => Screen::Lineup,
            Screen::Lineup => Screen::Bracket,
            Screen::Bracket => Screen::Goals,
        }
    }
}

pub fn screen_label(screen: Screen) -> &'static str {
    match screen {
        Screen::Goals => "GOALS",
        Screen::Xg => "XG",
        Screen::Lineup => "LINEUP",
        Screen::Bracket => "BRACKET",
    }
}

#[derive(Debug, Clone)]
pub struct XgView {
    pub game: GroupGame,
    pub timelines: TimelineSet,
    pub markers: Vec<GoalMarker>,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub config: AppConfig,
    pub game_index: usize,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
    pub goals: Vec<CountryGoals>,
    pub lineup: Lineup,
    pub knockout: KnockoutData,
    /// One entry per `GROUP_GAMES` game; empty when its file failed to load.
    pub shots: Vec<ShotData>,
    pub draw: BracketDraw,
    pub geometry: BracketGeometry,
    /// Rows scrolled in the lineup roster or the bracket; reset on navigation.
    pub scroll: u16,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(AppConfig::from_env())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            screen: Screen::Goals,
            config,
            game_index: 0,
            help_overlay: false,
            logs: VecDeque::new(),
            goals: Vec::new(),
            lineup: Lineup::default(),
            knockout: KnockoutData::default(),
            shots: vec![ShotData::default(); GROUP_GAMES.len()],
            draw: BracketDraw::world_cup_2022(),
            geometry: BracketGeometry::default(),
            scroll: 0,
        }
    }

    /// Drops loaded data so a reload replaces rather than appends.
    pub fn clear_data(&mut self) {
        self.goals.clear();
        self.lineup = Lineup::default();
        self.knockout = KnockoutData::default();
        self.shots = vec![ShotData::default(); GROUP_GAMES.len()];
        self.scroll = 0;
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn set_screen(&mut self, screen: Screen) {
        if self.screen != screen {
            self.screen = screen;
            self.scroll = 0;
        }
    }

    pub fn cycle_screen(&mut self) {
        self.set_screen(self.screen.next());
    }

    // The game selector is a slider: it stops at both ends.
    pub fn select_next_game(&mut self) {
        if self.game_index + 1 < GROUP_GAMES.len() {
            self.game_index += 1;
            self.scroll = 0;
        }
    }

    pub fn select_prev_game(&mut self) {
        if self.game_index > 0 {
            self.game_index -= 1;
            self.scroll = 0;
        }
    }

    pub fn selected_game(&self) -> &'static GroupGame {
        &GROUP_GAMES[self.game_index.min(GROUP_GAMES.len() - 1)]
    }

    pub fn selected_shots(&self) -> Option<&ShotData> {
        self.shots.get(self.game_index)
    }

    pub fn scroll_down(&mut self, max_scroll: u16) {
        self.scroll = self.scroll.saturating_add(1).min(max_scroll);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn top_goals(&self) -> Vec<CountryGoals> {
        top_scorers(&self.goals, self.config.top_n_goals)
    }

    pub fn xg_view(&self) -> XgView {
        let game = *self.selected_game();
        let events = self
            .selected_shots()
            .map(|data| data.events.as_slice())
            .unwrap_or(&[]);
        let end = match_end_minute(events, self.config.match_end_minute);
        let timelines = build_timelines(events, &[game.team, game.opponent], end);
        let markers = goal_markers(events, &timelines);
        XgView {
            game,
            timelines,
            markers,
        }
    }

    pub fn bracket_layout(&self) -> BracketLayout {
        layout_bracket(
            &self.config.round_names(),
            &self.knockout.matches_by_round,
            &self.config.tracked_team,
            &self.draw,
            &self.geometry,
        )
    }
}
