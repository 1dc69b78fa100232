use crate::config::GROUP_GAMES;
use crate::goals::load_goals_json;
use crate::knockout::load_knockout_json;
use crate::lineup::load_lineup_json;
use crate::shot_data::load_shot_csv;
use crate::state::AppState;
use crate::timeline::build_timelines;

/// Loads every fixture file named by the state's config. A file that cannot
/// be read leaves its view empty and is reported on the console.
pub fn load_into_state(state: &mut AppState) {
    let config = state.config.clone();

    match load_goals_json(&config.goals_path()) {
        Ok(goals) => {
            state.push_log(format!("[INFO] Loaded goals for {} countries", goals.len()));
            state.goals = goals;
        }
        Err(err) => state.push_log(format!("[WARN] Goals unavailable: {err:#}")),
    }

    match load_lineup_json(&config.lineup_path()) {
        Ok(lineup) => {
            let players: usize = lineup.teams.iter().map(|t| t.players.len()).sum();
            state.push_log(format!("[INFO] Loaded final lineup ({players} players)"));
            state.lineup = lineup;
        }
        Err(err) => state.push_log(format!("[WARN] Lineup unavailable: {err:#}")),
    }

    match load_knockout_json(&config.bracket_path()) {
        Ok(knockout) => {
            for warning in &knockout.warnings {
                state.push_log(format!("[WARN] Bracket: {warning}"));
            }
            state.push_log(format!(
                "[INFO] Loaded {} knockout fixtures",
                knockout.fixture_count()
            ));
            state.knockout = knockout;
        }
        Err(err) => state.push_log(format!("[WARN] Bracket unavailable: {err:#}")),
    }
    for warning in state.bracket_layout().warnings {
        state.push_log(format!("[WARN] Bracket layout: {warning}"));
    }

    for (idx, game) in GROUP_GAMES.iter().enumerate() {
        let data = match load_shot_csv(&config.shot_path(game)) {
            Ok(data) => data,
            Err(err) => {
                state.push_log(format!("[WARN] {}: shots unavailable: {err:#}", game.label));
                continue;
            }
        };
        for warning in &data.warnings {
            state.push_log(format!("[WARN] {}: {warning}", game.label));
        }
        let charted = build_timelines(
            &data.events,
            &[game.team, game.opponent],
            config.match_end_minute,
        );
        for warning in &charted.warnings {
            state.push_log(format!("[WARN] {}: {warning}", game.label));
        }
        state.push_log(format!(
            "[INFO] {}: {} shots loaded",
            game.label,
            data.events.len()
        ));
        if let Some(slot) = state.shots.get_mut(idx) {
            *slot = data;
        }
    }
}
