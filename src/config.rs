use std::env;
use std::path::{Path, PathBuf};

pub const ROUND_NAMES: [&str; 4] = ["Round of 16", "Quarter-finals", "Semi-finals", "Final"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupGame {
    pub label: &'static str,
    pub file: &'static str,
    pub team: &'static str,
    pub opponent: &'static str,
    pub analysis: &'static str,
}

pub static GROUP_GAMES: [GroupGame; 3] = [
    GroupGame {
        label: "Argentina 1-2 Saudi Arabia",
        file: "shot-data/argentina-saudi.csv",
        team: "Argentina",
        opponent: "Saudi Arabia",
        analysis: "Heading into their first match, Argentina were considered strong favorites. \
            The xG graph shows Argentina creating more significant chances, as indicated by their \
            higher xG throughout most of the game. However, football's unpredictable nature was on \
            full display as Saudi Arabia turned the tables, winning 2-1 despite Argentina's \
            offensive efforts.",
    },
    GroupGame {
        label: "Argentina 2-0 Mexico",
        file: "shot-data/argentina-mexico.csv",
        team: "Argentina",
        opponent: "Mexico",
        analysis: "After the upset against Saudi Arabia, Argentina faced a crucial match against \
            Mexico. This time, the team showcased their capability for strategic adjustments, \
            leading to a convincing 2-0 victory. The xG graph demonstrates Argentina's improved \
            efficiency in front of goal and a strong defensive performance, reflecting a game \
            well-controlled.",
    },
    GroupGame {
        label: "Poland 0-2 Argentina",
        file: "shot-data/argentina-poland.csv",
        team: "Argentina",
        opponent: "Poland",
        analysis: "Entering their final group match, Argentina needed a win to secure their \
            advancement. They delivered an exceptional performance against Poland, dominating \
            the game as shown by the ascending xG line, resulting in a 2-0 victory. This match \
            underscored Argentina's attacking strength and resilience, clinching their spot in \
            the knockout stages.",
    },
];

const GOALS_FILE: &str = "metadata/wc_goals_by_country.json";
const LINEUP_FILE: &str = "metadata/final-lineup.json";
const BRACKET_FILE: &str = "metadata/elimination-bracket.json";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub tracked_team: String,
    pub match_end_minute: f64,
    pub top_n_goals: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            tracked_team: "Argentina".to_string(),
            match_end_minute: 90.0,
            top_n_goals: 10,
        }
    }
}

impl AppConfig {
    /// Reads `WC22_*` overrides; call after `.env` files are loaded.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let data_dir = env::var("WC22_DATA_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        let tracked_team = env::var("WC22_TRACKED_TEAM")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.tracked_team);
        let match_end_minute = env::var("WC22_MATCH_END_MINUTE")
            .ok()
            .and_then(|val| val.trim().parse::<u16>().ok())
            .unwrap_or(90)
            .max(1);
        let top_n_goals = env::var("WC22_TOP_N_GOALS")
            .ok()
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(defaults.top_n_goals)
            .max(1);
        Self {
            data_dir,
            tracked_team,
            match_end_minute: f64::from(match_end_minute),
            top_n_goals,
        }
    }

    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn goals_path(&self) -> PathBuf {
        self.data_dir.join(GOALS_FILE)
    }

    pub fn lineup_path(&self) -> PathBuf {
        self.data_dir.join(LINEUP_FILE)
    }

    pub fn bracket_path(&self) -> PathBuf {
        self.data_dir.join(BRACKET_FILE)
    }

    pub fn shot_path(&self, game: &GroupGame) -> PathBuf {
        self.data_dir.join(game.file)
    }

    pub fn round_names(&self) -> Vec<String> {
        ROUND_NAMES.iter().map(|r| r.to_string()).collect()
    }
}
