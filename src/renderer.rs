use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Block;

use crate::config::{
    BORDER_HALF_BLOCK, GLYPH_CHERRY, GLYPH_HAZARD, GLYPH_OBSTACLE, GLYPH_PINEAPPLE,
    GLYPH_SNAKE_BODY, GLYPH_SNAKE_HEAD, GLYPH_TIMER, GridSize, Theme,
};
use crate::food::FoodKind;
use crate::game::Snapshot;
use crate::snake::Position;
use crate::timers::TimersRemaining;
use crate::ui::hud::{HudInfo, render_hud};
use crate::ui::menu::{Overlay, render_overlay};

/// Renders the full frame: HUD, board and the active overlay.
pub fn render(
    frame: &mut Frame<'_>,
    snapshot: &Snapshot,
    overlay: &Overlay<'_>,
    hud_info: &HudInfo<'_>,
) {
    let theme = hud_info.theme;
    let area = frame.area();
    let play_area = render_hud(frame, area, snapshot, hud_info);

    let block = Block::bordered()
        .border_set(BORDER_HALF_BLOCK)
        .border_style(Style::new().fg(theme.border_fg).bg(theme.border_bg))
        .style(Style::new().bg(theme.play_bg));

    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    render_obstacles(frame, inner, snapshot, theme);
    render_timer_bar(frame, inner, snapshot.size, &snapshot.timers, theme);
    render_consumables(frame, inner, snapshot, theme);
    render_snake(frame, inner, snapshot, theme);

    render_overlay(frame, play_area, overlay, theme);
}

fn render_obstacles(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot, theme: &Theme) {
    let buffer = frame.buffer_mut();
    for cell in &snapshot.obstacles {
        if let Some((x, y)) = logical_to_terminal(inner, snapshot.size, *cell) {
            buffer.set_string(x, y, GLYPH_OBSTACLE, Style::new().fg(theme.obstacle));
        }
    }
}

fn render_consumables(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot, theme: &Theme) {
    let buffer = frame.buffer_mut();

    if let Some(food) = snapshot.food {
        let (glyph, color) = match food.kind {
            FoodKind::Cherry => (GLYPH_CHERRY, theme.cherry),
            FoodKind::Pineapple => (GLYPH_PINEAPPLE, theme.pineapple),
        };
        if let Some((x, y)) = logical_to_terminal(inner, snapshot.size, food.position) {
            buffer.set_string(x, y, glyph, Style::new().fg(color));
        }
    }

    if let Some(hazard) = snapshot.hazard {
        if let Some((x, y)) = logical_to_terminal(inner, snapshot.size, hazard.position) {
            buffer.set_string(
                x,
                y,
                GLYPH_HAZARD,
                Style::new().fg(theme.hazard).add_modifier(Modifier::BOLD),
            );
        }
    }
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot, theme: &Theme) {
    let buffer = frame.buffer_mut();

    for (index, segment) in snapshot.body.iter().enumerate() {
        let Some((x, y)) = logical_to_terminal(inner, snapshot.size, *segment) else {
            continue;
        };

        if index == 0 {
            buffer.set_string(
                x,
                y,
                GLYPH_SNAKE_HEAD,
                Style::new()
                    .fg(theme.snake_head)
                    .add_modifier(Modifier::BOLD),
            );
            continue;
        }

        let growing = snapshot
            .growth_markers
            .get(index)
            .is_some_and(|marker| *marker > 0);
        let color = if growing {
            theme.snake_growth
        } else {
            theme.snake_body
        };
        buffer.set_string(x, y, GLYPH_SNAKE_BODY, Style::new().fg(color));
    }
}

/// Food timer bar on the reserved bottom row; it shrinks from the right.
fn render_timer_bar(
    frame: &mut Frame<'_>,
    inner: Rect,
    size: GridSize,
    timers: &TimersRemaining,
    theme: &Theme,
) {
    let row = i32::from(size.height) - 1;
    let filled = timer_bar_cells(timers.food, timers.food_total, size.width);
    let style = Style::new().fg(timer_color(timers.food, timers.food_total, theme));

    let buffer = frame.buffer_mut();
    for column in 0..filled {
        let cell = Position::new(i32::from(column), row);
        if let Some((x, y)) = logical_to_terminal(inner, size, cell) {
            buffer.set_string(x, y, GLYPH_TIMER, style);
        }
    }
}

/// Number of bar cells for `remaining` out of `total`, rounded up so the bar
/// only disappears once the timer is fully spent.
#[must_use]
pub fn timer_bar_cells(remaining: Duration, total: Duration, width: u16) -> u16 {
    if total.is_zero() || remaining.is_zero() {
        return 0;
    }
    let ratio = (remaining.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0);
    (ratio * f64::from(width)).ceil() as u16
}

fn timer_color(remaining: Duration, total: Duration, theme: &Theme) -> Color {
    if total.is_zero() {
        return theme.timer_low;
    }
    let ratio = remaining.as_secs_f64() / total.as_secs_f64();
    if ratio > 0.5 {
        theme.timer_ok
    } else if ratio > 0.2 {
        theme.timer_warn
    } else {
        theme.timer_low
    }
}

fn logical_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x >= inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ratatui::layout::Rect;

    use super::{logical_to_terminal, timer_bar_cells};
    use crate::config::GridSize;
    use crate::snake::Position;

    #[test]
    fn timer_bar_rounds_up_until_empty() {
        let total = Duration::from_secs(10);

        assert_eq!(timer_bar_cells(total, total, 40), 40);
        assert_eq!(timer_bar_cells(Duration::from_secs(5), total, 40), 20);
        assert_eq!(timer_bar_cells(Duration::from_millis(10), total, 40), 1);
        assert_eq!(timer_bar_cells(Duration::ZERO, total, 40), 0);
    }

    #[test]
    fn cells_outside_the_viewport_are_clipped() {
        let inner = Rect::new(1, 1, 10, 5);
        let bounds = GridSize::square(40);

        assert_eq!(
            logical_to_terminal(inner, bounds, Position::new(0, 0)),
            Some((1, 1))
        );
        assert_eq!(logical_to_terminal(inner, bounds, Position::new(10, 0)), None);
        assert_eq!(logical_to_terminal(inner, bounds, Position::new(-1, 0)), None);
    }
}
