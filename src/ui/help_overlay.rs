//! Help overlay listing the key bindings of the current view

use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Row, Table},
    Frame,
};

use crate::app::AppState;

type Binding = (&'static str, &'static str);

const LIST_BINDINGS: &[Binding] = &[
    ("↑/k ↓/j", "Move selection"),
    ("PgUp PgDn", "Move a page"),
    ("g G", "First / last country"),
    ("Enter", "Open country details"),
    ("/", "Search (Enter or Esc to finish)"),
    ("Tab S-Tab", "Next / previous region"),
    ("x", "Clear search and region"),
    ("q Esc", "Quit"),
];

const DETAIL_BINDINGS: &[Binding] = &[
    ("←/h →/l", "Choose a border country"),
    ("Enter", "Open border country"),
    ("↑/k ↓/j", "Scroll"),
    ("Esc", "Previous country or list"),
    ("q", "Quit"),
];

const STATUS_BINDINGS: &[Binding] = &[
    ("r", "Retry loading"),
    ("Esc", "Go back"),
    ("q", "Quit"),
];

/// Title and bindings shown for `state`
fn bindings_for(state: &AppState) -> (&'static str, &'static [Binding]) {
    match state {
        AppState::CountryList => ("Country List", LIST_BINDINGS),
        AppState::CountryDetail(_) => ("Country Details", DETAIL_BINDINGS),
        AppState::Loading | AppState::LoadFailed(_) | AppState::NotFound(_) => {
            ("Keys", STATUS_BINDINGS)
        }
    }
}

/// Area of `width` x `height` centered in `area`, clipped to fit
fn overlay_area(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}

/// Renders the help overlay on top of the current view
pub fn render(frame: &mut Frame, state: &AppState) {
    let (title, bindings) = bindings_for(state);

    // Borders, header row, footer row
    let height = bindings.len() as u16 + 4;
    let area = overlay_area(frame.area(), 52, height);
    frame.render_widget(Clear, area);

    let rows = bindings.iter().map(|(keys, action)| {
        Row::new([
            Line::styled(*keys, Style::default().fg(Color::Yellow)),
            Line::raw(*action),
        ])
    });

    let table = Table::new(rows, [Constraint::Length(12), Constraint::Fill(1)])
        .header(
            Row::new(["Key", "Action"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .column_spacing(2)
        .block(
            Block::default()
                .title(format!(" Help: {} ", title))
                .title_bottom(Line::styled(
                    " ? or Esc to close ",
                    Style::default().fg(Color::DarkGray),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

    frame.render_widget(table, area);
}
