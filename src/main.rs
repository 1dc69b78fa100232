use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine, Rectangle};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph,
    Wrap,
};

use wc22_terminal::bracket::{BracketLayout, BracketNode};
use wc22_terminal::config::GROUP_GAMES;
use wc22_terminal::dataset::load_into_state;
use wc22_terminal::flags::flag_badge;
use wc22_terminal::lineup::{PitchMarkings, pitch_markers};
use wc22_terminal::state::{AppState, Screen, screen_label};

// Approximate pixel size of one terminal cell, used to map the bracket's
// pixel layout onto the terminal.
const CELL_W_PX: f64 = 8.0;
const CELL_H_PX: f64 = 16.0;

const PITCH_W: f64 = 600.0;
const PITCH_H: f64 = 300.0;

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new(state: AppState) -> Self {
        Self {
            state,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.set_screen(Screen::Goals),
            KeyCode::Char('2') => self.state.set_screen(Screen::Xg),
            KeyCode::Char('3') => self.state.set_screen(Screen::Lineup),
            KeyCode::Char('4') => self.state.set_screen(Screen::Bracket),
            KeyCode::Tab => self.state.cycle_screen(),
            KeyCode::Char('l') | KeyCode::Right => self.state.select_next_game(),
            KeyCode::Char('h') | KeyCode::Left => self.state.select_prev_game(),
            KeyCode::Char('j') | KeyCode::Down => self.state.scroll_down(u16::MAX),
            KeyCode::Char('k') | KeyCode::Up => self.state.scroll_up(),
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn reload(&mut self) {
        self.state.clear_data();
        self.state.push_log("[INFO] Reloading data");
        load_into_state(&mut self.state);
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let mut state = AppState::new();
    load_into_state(&mut state);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(state);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Goals => render_goals(frame, chunks[1], &app.state),
        Screen::Xg => render_xg(frame, chunks[1], &app.state),
        Screen::Lineup => render_lineup(frame, chunks[1], &app.state),
        Screen::Bracket => render_bracket(frame, chunks[1], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let tabs = Screen::ALL
        .iter()
        .enumerate()
        .map(|(idx, screen)| {
            let label = screen_label(*screen);
            if *screen == state.screen {
                format!("[{} {}]", idx + 1, label)
            } else {
                format!(" {} {} ", idx + 1, label)
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    let line1 = format!("  .-.  WC22 STORY | {tabs}");
    let line2 = format!(" /___\\ Tracking: {}", state.config.tracked_team);
    let line3 = "  |_|".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Goals => "1-4/Tab Screen | r Reload | ? Help | q Quit".to_string(),
        Screen::Xg => "1-4/Tab Screen | h/l/←/→ Game | r Reload | ? Help | q Quit".to_string(),
        Screen::Lineup | Screen::Bracket => {
            "1-4/Tab Screen | j/k/↑/↓ Scroll | r Reload | ? Help | q Quit".to_string()
        }
    }
}

fn render_goals(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(format!("Top {} World Cup Goal Scorers (all time)", state.config.top_n_goals))
        .borders(Borders::ALL);
    let rows = state.top_goals();
    if rows.is_empty() {
        let empty = Paragraph::new("No goal data loaded")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let max = rows.iter().map(|r| u64::from(r.total_goals)).max().unwrap_or(1);
    let bars: Vec<Bar> = rows
        .iter()
        .map(|row| {
            Bar::default()
                .value(u64::from(row.total_goals))
                .label(Line::from(row.country.clone()))
                .text_value(format!("{} goals", row.total_goals))
                .style(Style::default().fg(Color::Cyan))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
        .max(max);
    frame.render_widget(chart, area);
}

fn render_xg(frame: &mut Frame, area: Rect, state: &AppState) {
    let view = state.xg_view();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(8), Constraint::Length(7)])
        .split(area);

    let selector = format!(
        "◀ h  Game {}/{}: {}  l ▶",
        state.game_index + 1,
        GROUP_GAMES.len(),
        view.game.label
    );
    frame.render_widget(
        Paragraph::new(selector).style(Style::default().add_modifier(Modifier::BOLD)),
        rows[0],
    );

    let colors = [Color::Blue, Color::Green];
    let paths: Vec<Vec<(f64, f64)>> = view
        .timelines
        .timelines
        .iter()
        .map(|t| t.step_path())
        .collect();
    let goal_points: Vec<Vec<(f64, f64)>> = view
        .timelines
        .timelines
        .iter()
        .map(|t| {
            view.markers
                .iter()
                .filter(|m| m.team == t.team)
                .map(|m| (m.minute, m.cumulative_value))
                .collect()
        })
        .collect();

    let mut datasets = Vec::new();
    for (idx, timeline) in view.timelines.timelines.iter().enumerate() {
        let color = colors[idx % colors.len()];
        datasets.push(
            Dataset::default()
                .name(timeline.team.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color))
                .data(&paths[idx]),
        );
        datasets.push(
            Dataset::default()
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
                .data(&goal_points[idx]),
        );
    }

    let end = view.timelines.match_end_minute;
    let top = (view.timelines.max_value() * 1.1).max(0.5);
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(format!("{} | cumulative xG", view.game.label))
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title("Minute")
                .bounds([0.0, end])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format!("{:.0}", end / 2.0)),
                    Span::raw(format!("{end:.0}")),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("xG")
                .bounds([0.0, top])
                .labels(vec![
                    Span::raw("0.0"),
                    Span::raw(format!("{:.1}", top / 2.0)),
                    Span::raw(format!("{top:.1}")),
                ]),
        );
    frame.render_widget(chart, rows[1]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[2]);
    let analysis = Paragraph::new(view.game.analysis)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Analysis").borders(Borders::ALL));
    frame.render_widget(analysis, cols[0]);

    let goals_text = if view.markers.is_empty() {
        "No goals recorded".to_string()
    } else {
        view.markers
            .iter()
            .map(|m| {
                format!(
                    "{:.0}' {} ({}) xG {:.2} | total {:.2}",
                    m.minute, m.actor, m.team, m.metric_value, m.cumulative_value
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };
    let goals = Paragraph::new(goals_text)
        .block(Block::default().title("Goals").borders(Borders::ALL));
    frame.render_widget(goals, cols[1]);
}

fn render_lineup(frame: &mut Frame, area: Rect, state: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(34)])
        .split(area);

    let markings = PitchMarkings::for_size(PITCH_W, PITCH_H);
    let markers = pitch_markers(&state.lineup, &state.config.tracked_team, PITCH_W, PITCH_H);

    let pitch = Canvas::default()
        .block(Block::default().title("Final Lineup").borders(Borders::ALL))
        .marker(Marker::Braille)
        .x_bounds([0.0, PITCH_W])
        .y_bounds([0.0, PITCH_H])
        .paint(|ctx| {
            // Canvas y grows upward; lineup y grows downward.
            let flip = |y: f64| PITCH_H - y;
            ctx.draw(&Rectangle {
                x: 0.0,
                y: 0.0,
                width: PITCH_W,
                height: PITCH_H,
                color: Color::White,
            });
            ctx.draw(&CanvasLine {
                x1: markings.halfway_x,
                y1: 0.0,
                x2: markings.halfway_x,
                y2: PITCH_H,
                color: Color::White,
            });
            ctx.draw(&Circle {
                x: markings.centre.0,
                y: flip(markings.centre.1),
                radius: markings.centre_radius,
                color: Color::White,
            });
            for area in markings.penalty_areas {
                ctx.draw(&Rectangle {
                    x: area.x,
                    y: flip(area.y + area.height),
                    width: area.width,
                    height: area.height,
                    color: Color::White,
                });
            }
            ctx.layer();
            for marker in &markers {
                let color = if marker.highlighted {
                    Color::LightBlue
                } else {
                    Color::Blue
                };
                ctx.draw(&Circle {
                    x: marker.x,
                    y: flip(marker.y),
                    radius: 6.0,
                    color,
                });
            }
        });
    frame.render_widget(pitch, cols[0]);

    let mut lines = Vec::new();
    for team in &state.lineup.teams {
        lines.push(Line::styled(
            team.country.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        for player in &team.players {
            lines.push(Line::raw(player.label()));
        }
        lines.push(Line::raw(""));
    }
    if lines.is_empty() {
        lines.push(Line::raw("No lineup loaded"));
    }
    let roster = Paragraph::new(lines)
        .scroll((state.scroll, 0))
        .block(Block::default().title("Players").borders(Borders::ALL));
    frame.render_widget(roster, cols[1]);
}

fn render_bracket(frame: &mut Frame, area: Rect, state: &AppState) {
    let layout = state.bracket_layout();
    let block = Block::default()
        .title(format!("Knockout Stage | {} path", state.config.tracked_team))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }
    if layout.nodes.is_empty() {
        let empty = Paragraph::new("No bracket data loaded")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let container_w = f64::from(inner.width) * CELL_W_PX;
    let scale = layout.scale_to_fit(container_w);
    if scale <= 0.0 {
        return;
    }
    let world_w = container_w / scale;
    let world_h = f64::from(inner.height) * CELL_H_PX / scale;
    let offset = f64::from(state.scroll) * CELL_H_PX / scale;
    // Layout y grows downward from the top; canvas y grows upward.
    let flip = move |y: f64| world_h - (y - offset);

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([0.0, world_w])
        .y_bounds([0.0, world_h])
        .paint(|ctx| {
            for connector in &layout.connectors {
                let color = if connector.on_tracked_path {
                    Color::Yellow
                } else {
                    Color::DarkGray
                };
                for pair in connector.points.windows(2) {
                    ctx.draw(&CanvasLine {
                        x1: pair[0].0,
                        y1: flip(pair[0].1),
                        x2: pair[1].0,
                        y2: flip(pair[1].1),
                        color,
                    });
                }
            }
            for node in &layout.nodes {
                let color = if node.is_on_tracked_path {
                    Color::Yellow
                } else {
                    Color::Gray
                };
                ctx.draw(&Rectangle {
                    x: node.x,
                    y: flip(node.y + layout.geometry.card_h),
                    width: layout.geometry.card_w,
                    height: layout.geometry.card_h,
                    color,
                });
            }
            ctx.layer();
            for label in &layout.round_labels {
                ctx.print(
                    label.x - layout.geometry.card_w / 3.0,
                    flip(layout.geometry.top_pad - CELL_H_PX * 2.0),
                    Line::styled(label.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                );
            }
            for node in &layout.nodes {
                let (first, second) = card_lines(node, &layout);
                let text_x = node.x + layout.geometry.card_w * 0.05;
                ctx.print(text_x, flip(node.y + layout.geometry.card_h * 0.3), first);
                ctx.print(text_x, flip(node.y + layout.geometry.card_h * 0.7), second);
            }
        });
    frame.render_widget(canvas, inner);
}

fn card_lines(node: &BracketNode, layout: &BracketLayout) -> (Line<'static>, Line<'static>) {
    let is_final = layout
        .round_labels
        .last()
        .is_some_and(|label| label.name == node.fixture.round_name);
    let row = |team: &str, score: u32| {
        let won = node.fixture.winner == team;
        let text = if is_final {
            format!("{} {}", flag_badge(team), team)
        } else {
            format!("{} {} {}", flag_badge(team), team, score)
        };
        let mut style = Style::default();
        if won {
            style = style.add_modifier(Modifier::BOLD);
        } else if !node.is_on_tracked_path {
            style = style.fg(Color::DarkGray);
        }
        Line::styled(text, style)
    };
    (
        row(&node.fixture.entrant_a, node.fixture.score_a),
        row(&node.fixture.entrant_b, node.fixture.score_b),
    )
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "WC22 Story - Help",
        "",
        "Global:",
        "  1            Goals by country",
        "  2            Group stage xG",
        "  3            Final lineup",
        "  4            Knockout bracket",
        "  Tab          Next screen",
        "  r            Reload data files",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "xG:",
        "  h/l or ←/→   Previous/next game",
        "",
        "Lineup / Bracket:",
        "  j/k or ↑/↓   Scroll",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
