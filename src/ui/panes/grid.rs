//! Program grid pane rendering
//!
//! Draws the Befunge-93 grid as captured in a snapshot, coloring each cell by the
//! instruction it decodes to and highlighting the cells IPs sit on. The view
//! scrolls to keep the active IP visible on grids larger than the pane.

use crate::befunge93::Command;
use crate::snapshot::Snapshot;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Scroll state for the grid pane
#[derive(Debug, Default)]
pub struct GridScrollState {
    pub x: usize,
    pub y: usize,
}

fn cell_style(cell: u8) -> Style {
    let color = match Command::decode(cell) {
        Command::Push(_) => DEFAULT_THEME.digit,
        Command::Go(_) | Command::Random | Command::HorizontalIf | Command::VerticalIf => {
            DEFAULT_THEME.arrow
        }
        Command::Halt => DEFAULT_THEME.error,
        Command::StringMode => DEFAULT_THEME.secondary,
        Command::OutputNumber
        | Command::OutputChar
        | Command::InputNumber
        | Command::InputChar => DEFAULT_THEME.io,
        Command::Bridge | Command::Get | Command::Put => DEFAULT_THEME.space_op,
        Command::Nop => DEFAULT_THEME.comment,
        _ => DEFAULT_THEME.operator,
    };
    Style::default().fg(color)
}

fn cell_glyph(cell: u8) -> char {
    if cell.is_ascii_graphic() || cell == b' ' {
        char::from(cell)
    } else {
        '·'
    }
}

/// Shift `offset` so that `target` lies inside a window of `visible` cells
fn follow(offset: &mut usize, target: usize, visible: usize, total: usize) {
    if target < *offset {
        *offset = target;
    } else if target >= *offset + visible {
        *offset = target + 1 - visible;
    }
    *offset = (*offset).min(total.saturating_sub(visible));
}

/// Render the program grid pane
pub fn render_grid_pane(
    frame: &mut Frame,
    area: Rect,
    snapshot: &Snapshot,
    is_focused: bool,
    scroll_state: &mut GridScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(format!(" Grid {}x{} ", snapshot.width, snapshot.height))
        .borders(Borders::ALL)
        .border_style(border_style);

    // Account for borders and the row-number gutter
    let visible_width = area.width.saturating_sub(2 + 4).max(1) as usize;
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    let active = snapshot
        .current_ip
        .and_then(|id| snapshot.ips.iter().find(|ip| ip.id == id))
        .or_else(|| snapshot.ips.first());
    if let Some(ip) = active {
        let x = ip.position.get(0).unwrap_or(0).max(0) as usize;
        let y = ip.position.get(1).unwrap_or(0).max(0) as usize;
        follow(&mut scroll_state.x, x, visible_width, snapshot.width);
        follow(&mut scroll_state.y, y, visible_height, snapshot.height);
    }

    let x_end = (scroll_state.x + visible_width).min(snapshot.width);
    let y_end = (scroll_state.y + visible_height).min(snapshot.height);

    let lines: Vec<Line> = (scroll_state.y..y_end)
        .map(|y| {
            let mut spans = vec![Span::styled(
                format!("{:3} ", y),
                Style::default().fg(DEFAULT_THEME.comment),
            )];
            for x in scroll_state.x..x_end {
                let cell = snapshot.cell(x, y).unwrap_or(b' ');
                let mut style = cell_style(cell);
                let mut here = snapshot.ips_at(x, y).peekable();
                if here.peek().is_some() {
                    let is_active = here.any(|ip| Some(ip.id) == active.map(|a| a.id));
                    style = style
                        .bg(if is_active {
                            DEFAULT_THEME.current_ip
                        } else {
                            DEFAULT_THEME.ip_cursor
                        })
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD);
                }
                spans.push(Span::styled(cell_glyph(cell).to_string(), style));
            }
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_keeps_target_visible() {
        let mut offset = 0;
        follow(&mut offset, 70, 40, 80);
        assert_eq!(offset, 31);
        follow(&mut offset, 10, 40, 80);
        assert_eq!(offset, 10);
        follow(&mut offset, 20, 100, 80);
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_glyphs() {
        assert_eq!(cell_glyph(b'>'), '>');
        assert_eq!(cell_glyph(b' '), ' ');
        assert_eq!(cell_glyph(0), '·');
    }
}
