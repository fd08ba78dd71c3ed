use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::config::{GLYPH_HAZARD, GLYPH_PINEAPPLE, Theme};
use crate::game::Snapshot;

const SEPARATOR: &str = " │ ";

/// Supplemental values displayed by the HUD rows.
#[derive(Debug, Clone)]
pub struct HudInfo<'a> {
    pub best_score: u32,
    pub theme: &'a Theme,
}

/// Renders the two-line HUD and returns the remaining play area above it.
#[must_use]
pub fn render_hud(
    frame: &mut Frame<'_>,
    area: Rect,
    snapshot: &Snapshot,
    info: &HudInfo<'_>,
) -> Rect {
    let [play_area, score_area, status_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(score_line(snapshot, info))
            .alignment(Alignment::Right)
            .style(Style::default().fg(Color::DarkGray)),
        score_area,
    );

    frame.render_widget(
        Paragraph::new(Line::from(status_spans(snapshot, info.theme)))
            .alignment(Alignment::Right)
            .style(Style::default().fg(Color::DarkGray)),
        status_area,
    );

    play_area
}

fn score_line(snapshot: &Snapshot, info: &HudInfo<'_>) -> Line<'static> {
    let value = Style::default().fg(info.theme.hud_score);
    let best = info.best_score.max(snapshot.score);
    let best_style = if snapshot.score > info.best_score {
        value.add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw("Level: "),
        Span::styled(snapshot.level.label(), value),
        Span::raw(SEPARATOR),
        Span::raw("Length: "),
        Span::styled(snapshot.body.len().to_string(), value),
        Span::raw(SEPARATOR),
        Span::raw("Score: "),
        Span::styled(snapshot.score.to_string(), value),
        Span::raw(SEPARATOR),
        Span::raw("Best: "),
        Span::styled(best.to_string(), best_style),
    ])
}

/// Countdown indicators for whatever is currently timed.
fn status_spans(snapshot: &Snapshot, theme: &Theme) -> Vec<Span<'static>> {
    let timers = &snapshot.timers;
    let mut spans = vec![
        Span::raw("Food: "),
        Span::styled(seconds(timers.food), Style::default().fg(theme.timer_ok)),
    ];

    if let Some(remaining) = timers.hazard {
        spans.push(Span::raw(SEPARATOR));
        spans.push(Span::styled(
            format!("{GLYPH_HAZARD} {}", seconds(remaining)),
            Style::default().fg(theme.hazard),
        ));
    }
    if let Some(remaining) = timers.pineapple {
        spans.push(Span::raw(SEPARATOR));
        spans.push(Span::styled(
            format!("{GLYPH_PINEAPPLE} {}", seconds(remaining)),
            Style::default().fg(theme.pineapple),
        ));
    }
    if timers.bonus.is_some() {
        // Matches what eating the replacement food would pay right now.
        spans.push(Span::raw(SEPARATOR));
        spans.push(Span::styled(
            format!("Bonus +{}", timers.food.as_secs().max(1)),
            Style::default().fg(theme.timer_warn).add_modifier(Modifier::BOLD),
        ));
    }

    spans
}

fn seconds(duration: Duration) -> String {
    format!("{:.1}s", duration.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::seconds;

    #[test]
    fn countdowns_show_tenths() {
        assert_eq!(seconds(Duration::from_millis(4_260)), "4.3s");
        assert_eq!(seconds(Duration::ZERO), "0.0s");
    }
}
