//! Per-IP operand stack pane
//!
//! One section per live IP: a header with its identity, position, heading and
//! string-mode flag, followed by its stack from top to bottom. Values in the
//! printable ASCII range are annotated with their character.

use crate::snapshot::{IpSnapshot, Snapshot};
use crate::space::Direction;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Scroll state for the stack pane
#[derive(Debug, Default)]
pub struct StackScrollState {
    pub offset: usize,
}

fn heading(direction: &Direction) -> String {
    match direction.as_axis() {
        Some((0, true)) => "→".to_string(),
        Some((0, false)) => "←".to_string(),
        Some((1, true)) => "↓".to_string(),
        Some((1, false)) => "↑".to_string(),
        _ => format!("{:?}", direction),
    }
}

fn ip_header(ip: &IpSnapshot, is_active: bool) -> Line<'static> {
    let name_style = if is_active {
        Style::default()
            .fg(DEFAULT_THEME.current_ip)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.ip_cursor)
    };
    let mut spans = vec![
        Span::styled(ip.id.to_string(), name_style),
        Span::styled(
            format!(" at {} ", ip.position),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
        Span::styled(heading(&ip.direction), Style::default().fg(DEFAULT_THEME.arrow)),
    ];
    if ip.string_mode {
        spans.push(Span::styled(
            " \"string\"",
            Style::default().fg(DEFAULT_THEME.secondary),
        ));
    }
    Line::from(spans)
}

fn value_line(value: i32) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("  {:>11}", value),
        Style::default().fg(DEFAULT_THEME.digit),
    )];
    if let Some(c) = u8::try_from(value)
        .ok()
        .filter(|b| b.is_ascii_graphic() || *b == b' ')
    {
        spans.push(Span::styled(
            format!("  '{}'", char::from(c)),
            Style::default().fg(DEFAULT_THEME.comment),
        ));
    }
    Line::from(spans)
}

/// Render the stack pane
pub fn render_stack_pane(
    frame: &mut Frame,
    area: Rect,
    snapshot: &Snapshot,
    is_focused: bool,
    scroll_state: &mut StackScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Stacks ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let mut all_items = Vec::new();
    for ip in &snapshot.ips {
        all_items.push(ListItem::new(ip_header(ip, snapshot.current_ip == Some(ip.id))));
        if ip.stack.is_empty() {
            all_items.push(ListItem::new(Line::from(Span::styled(
                "  (empty)",
                Style::default().fg(DEFAULT_THEME.comment),
            ))));
        }
        for &value in ip.stack.iter().rev() {
            all_items.push(ListItem::new(value_line(value)));
        }
    }
    if all_items.is_empty() {
        all_items.push(ListItem::new(Line::from(Span::styled(
            "(no live IPs)",
            Style::default().fg(DEFAULT_THEME.comment),
        ))));
    }

    let total_items = all_items.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    if total_items > visible_height {
        scroll_state.offset = scroll_state.offset.min(total_items - visible_height);
    } else {
        scroll_state.offset = 0;
    }

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(scroll_state.offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
