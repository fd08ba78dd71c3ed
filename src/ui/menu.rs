use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::config::Theme;
use crate::game::DeathCause;
use crate::grid::Level;
use crate::highscore::HighScores;

/// Popup drawn on top of the board.
#[derive(Debug, Clone)]
pub enum Overlay<'a> {
    None,
    Start {
        level: Level,
        best: u32,
        /// A session left with Esc can be picked up again.
        can_continue: bool,
    },
    Paused,
    GameOver {
        score: u32,
        cause: Option<DeathCause>,
        /// Name typed so far, when the score qualifies for the table.
        name_entry: Option<&'a str>,
        /// Rank achieved once the entry has been saved.
        saved_rank: Option<usize>,
    },
    HighScores(&'a HighScores),
}

pub fn render_overlay(frame: &mut Frame<'_>, area: Rect, overlay: &Overlay<'_>, theme: &Theme) {
    match overlay {
        Overlay::None => {}
        Overlay::Start {
            level,
            best,
            can_continue,
        } => render_start_menu(frame, area, *level, *best, *can_continue, theme),
        Overlay::Paused => render_pause_menu(frame, area),
        Overlay::GameOver {
            score,
            cause,
            name_entry,
            saved_rank,
        } => render_game_over_menu(frame, area, *score, *cause, *name_entry, *saved_rank),
        Overlay::HighScores(scores) => render_high_scores(frame, area, scores, theme),
    }
}

/// Draws the start screen as a centered popup.
fn render_start_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    level: Level,
    best: u32,
    can_continue: bool,
    theme: &Theme,
) {
    let popup = centered_popup(area, 70, 50);
    frame.render_widget(Clear, popup);

    let [title_row, body_row, footer_row] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(2),
    ])
    .areas(popup);

    frame.render_widget(
        Paragraph::new(Line::from("HAZARD SNAKE"))
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(theme.menu_title)
                    .add_modifier(Modifier::BOLD),
            ),
        title_row,
    );

    let marker = |candidate: Level| if candidate == level { ">" } else { " " };
    let mut body = vec![
        Line::from(format!("Best score: {best}")),
        Line::from(""),
        Line::from(format!("{} [1] {}", marker(Level::Classic), Level::Classic.label())),
        Line::from(format!(
            "{} [2] {}",
            marker(Level::Obstacles),
            Level::Obstacles.label()
        )),
        Line::from(""),
        Line::from("[Enter] Start   [H] High scores   [Q] Quit"),
    ];
    if can_continue {
        body.push(Line::from("[C] Continue"));
    }
    frame.render_widget(
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" start ")),
        body_row,
    );

    frame.render_widget(
        Paragraph::new(Line::from("Arrows/WASD move, P pauses. Bombs bite."))
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.menu_footer)),
        footer_row,
    );
}

/// Draws the pause screen as a centered popup.
fn render_pause_menu(frame: &mut Frame<'_>, area: Rect) {
    let popup = centered_popup(area, 60, 30);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("PAUSED"),
        Line::from(""),
        Line::from("[P] Resume"),
        Line::from("[R] Restart   [Esc] Menu   [Q] Quit"),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" pause ")),
        popup,
    );
}

/// Draws the game-over screen, with name entry when the score made the table.
fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    score: u32,
    cause: Option<DeathCause>,
    name_entry: Option<&str>,
    saved_rank: Option<usize>,
) {
    let popup = centered_popup(area, 70, 45);
    frame.render_widget(Clear, popup);

    let mut lines = vec![
        Line::from("GAME OVER"),
        Line::from(""),
        Line::from(format!("Score: {score}")),
        Line::from(cause.map_or(String::new(), |cause| {
            format!("Cause: {}", cause.description())
        })),
        Line::from(""),
    ];

    match (name_entry, saved_rank) {
        (Some(name), _) => {
            lines.push(Line::from("New high score! Enter your name:"));
            lines.push(Line::from(format!("{name}_")));
            lines.push(Line::from(""));
            lines.push(Line::from("[Enter] Save   [Esc] Skip"));
        }
        (None, Some(rank)) => {
            lines.push(Line::from(format!("Saved at rank #{rank}")));
            lines.push(Line::from(""));
            lines.push(Line::from("[Enter] Menu   [H] High scores   [Q] Quit"));
        }
        (None, None) => {
            lines.push(Line::from("[Enter] Menu   [H] High scores   [Q] Quit"));
        }
    }

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" game over ")),
        popup,
    );
}

fn render_high_scores(frame: &mut Frame<'_>, area: Rect, scores: &HighScores, theme: &Theme) {
    let popup = centered_popup(area, 60, 70);
    frame.render_widget(Clear, popup);

    let mut lines = vec![
        Line::from("HIGH SCORES").style(
            Style::default()
                .fg(theme.menu_title)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
    ];
    if scores.is_empty() {
        lines.push(Line::from("No scores yet"));
    }
    for (rank, entry) in scores.entries().iter().enumerate() {
        lines.push(Line::from(format!(
            "{:>2}. {:<12} {:>5}",
            rank + 1,
            entry.name,
            entry.score
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("[Esc]/[Enter] Back").style(Style::default().fg(theme.menu_footer)));

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" high scores ")),
        popup,
    );
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}
