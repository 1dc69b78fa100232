// flagcdn.com codes for the 2022 knockout teams.
const FLAG_CODES: &[(&str, &str)] = &[
    ("Netherlands", "nl"),
    ("United States", "us"),
    ("Argentina", "ar"),
    ("Australia", "au"),
    ("Croatia", "hr"),
    ("Japan", "jp"),
    ("Brazil", "br"),
    ("Korea Republic", "kr"),
    ("Morocco", "ma"),
    ("Spain", "es"),
    ("Portugal", "pt"),
    ("Switzerland", "ch"),
    ("France", "fr"),
    ("Poland", "pl"),
    ("England", "gb-eng"),
    ("Senegal", "sn"),
];

pub fn flag_code(team: &str) -> Option<&'static str> {
    let team = team.trim();
    FLAG_CODES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(team))
        .map(|(_, code)| *code)
}

/// Short card badge, e.g. `AR` or `GB-ENG`.
pub fn flag_badge(team: &str) -> String {
    flag_code(team)
        .map(str::to_ascii_uppercase)
        .unwrap_or_else(|| "--".to_string())
}

/// `"Korea Republic"` -> `"korea-republic"`: lowercase, anything outside
/// ASCII word characters and dashes dropped, whitespace runs joined by a
/// single dash.
pub fn slugify_team(name: &str) -> String {
    let kept: String = name
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join("-")
}

pub fn flag_path(team: &str) -> String {
    format!("images/flags/{}.png", slugify_team(team))
}
