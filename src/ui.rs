//! Terminal UI rendering with ratatui
//!
//! Three provider columns side by side, each showing its carousel as a
//! vertical stack: left card on top, active card in the middle, right
//! card at the bottom. The same layout math drives rendering and mouse
//! hit-testing.

use crate::catalog::Provider;
use crate::render::{CardFace, FrameStore};
use crate::ring::RingPosition;
use crate::spin::SpinCoordinator;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const HEADER_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 2;

/// Everything the renderer needs for one frame
pub struct View<'a> {
    pub coordinator: &'a SpinCoordinator,
    pub store: &'a FrameStore,
    pub title: &'a str,
    pub spin_label: &'a str,
    pub play_link: Option<&'a str>,
    /// Column targeted by keyboard rotation
    pub selected: Provider,
    /// Show the jackpot banner
    pub celebrating: bool,
}

/// Render one frame of the picker
pub fn render(frame: &mut Frame, view: &View) {
    let area = frame.area();
    let chunks = outer_layout(area);

    let title = Paragraph::new(vec![
        Line::raw(""),
        Line::styled(view.title, Style::default().fg(Color::Cyan).bold()),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    for (provider, column_area) in Provider::all().iter().zip(column_areas(area)) {
        render_column(frame, column_area, view, *provider);
    }

    let hint = format!(
        "[Space] {}  [1/2/3] Lock  [←/→] Rotate  [Tab] Column  [q] Quit",
        view.spin_label
    );
    let footer = Paragraph::new(Line::styled(hint, Style::default().fg(Color::DarkGray)))
        .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[2]);

    if view.celebrating {
        render_jackpot_banner(frame, area);
    }
}

fn render_column(frame: &mut Frame, area: Rect, view: &View, provider: Provider) {
    let column = view.coordinator.column(provider);
    let display = view.store.column(provider);

    let lock_tag = if column.is_locked() { "🔒 LOCKED" } else { "🔓" };
    let border_style = if column.is_locked() {
        Style::default().fg(Color::DarkGray)
    } else if provider == view.selected {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} {} ", provider.name(), lock_tag));
    frame.render_widget(block, area);

    for (i, card_area) in card_slots(area).into_iter().enumerate() {
        let position = RingPosition::all()[i];
        let slot = column.ring().slot_at(position);
        let card = display.cards.get(slot);
        let winning = display.winning == Some(slot);
        render_card(frame, card_area, view, card, position, winning, display.spinning);
    }
}

fn render_card(
    frame: &mut Frame,
    area: Rect,
    view: &View,
    card: Option<&CardFace>,
    position: RingPosition,
    winning: bool,
    spinning: bool,
) {
    let is_active = position == RingPosition::Active;

    let border_style = if winning {
        Style::default().fg(Color::Green).bold()
    } else if spinning {
        Style::default().fg(Color::Cyan)
    } else if is_active {
        Style::default().fg(Color::White).bold()
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let title = if winning {
        " ★ WINNER ".to_string()
    } else {
        String::new()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(card) = card else {
        let empty = Paragraph::new(Line::styled("—", Style::default().fg(Color::DarkGray)))
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    };

    let name_style = if spinning {
        Style::default().fg(Color::Cyan).italic()
    } else if is_active {
        Style::default().fg(Color::White).bold()
    } else {
        Style::default().fg(Color::Gray)
    };

    let mut lines = vec![
        Line::styled(card.name.clone(), name_style),
        badge_line(card),
    ];
    if is_active && !spinning {
        lines.push(Line::styled(
            card.image.clone(),
            Style::default().fg(Color::DarkGray),
        ));
        if let Some(link) = view.play_link {
            lines.push(Line::styled(
                format!("▶ {}", link),
                Style::default().fg(Color::Magenta),
            ));
        }
    }

    let body = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(body, inner);
}

fn badge_line(card: &CardFace) -> Line<'static> {
    let mut spans = vec![Span::styled(
        card.provider.to_string(),
        Style::default().fg(Color::Blue),
    )];
    if let Some(rtp) = &card.rtp {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("RTP: {}", rtp),
            Style::default().fg(Color::Green),
        ));
    }
    Line::from(spans)
}

fn render_jackpot_banner(frame: &mut Frame, area: Rect) {
    let banner_area = center_rect(area, 26, 3);
    frame.render_widget(Clear, banner_area);
    let banner = Paragraph::new(Line::styled(
        "🎉 JACKPOT! 🎉",
        Style::default().fg(Color::Yellow).bold(),
    ))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(banner, banner_area);
}

/// Header / columns / footer split
fn outer_layout(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(12),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(area)
}

/// The three provider column rects, left to right
pub fn column_areas(area: Rect) -> [Rect; 3] {
    let body = outer_layout(area)[1];
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(body);
    [chunks[0], chunks[1], chunks[2]]
}

/// The three card rects inside one column, top to bottom
/// (left / active / right position order)
fn card_slots(column: Rect) -> [Rect; 3] {
    let inner = Rect {
        x: column.x + 1,
        y: column.y + 1,
        width: column.width.saturating_sub(2),
        height: column.height.saturating_sub(2),
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(inner);
    [chunks[0], chunks[1], chunks[2]]
}

/// Map a mouse click to the card it landed on
pub fn hit_test(area: Rect, x: u16, y: u16) -> Option<(Provider, RingPosition)> {
    for (provider, column_area) in Provider::all().iter().zip(column_areas(area)) {
        if !contains(column_area, x, y) {
            continue;
        }
        for (i, card_area) in card_slots(column_area).into_iter().enumerate() {
            if contains(card_area, x, y) {
                return Some((*provider, RingPosition::all()[i]));
            }
        }
        return None;
    }
    None
}

fn contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

/// Center a fixed-size rect within an area
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
