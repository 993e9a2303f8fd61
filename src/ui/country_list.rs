//! Country list screen rendering
//!
//! Renders the main list view: a header with the search box and region
//! filter, one row per visible country, and a key hint bar at the bottom.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::{region_label, Country, NOT_AVAILABLE};

/// Width of the name column
const NAME_WIDTH: usize = 28;

/// Width of the population column
const POPULATION_WIDTH: usize = 15;

/// Width of the region column
const REGION_WIDTH: usize = 10;

/// Truncates `text` to `width` characters, marking the cut with an ellipsis
fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return format!("{:<width$}", text, width = width);
    }
    let cut: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", cut)
}

/// First row to draw so that `selected` stays inside a window of `height` rows
fn scroll_offset(selected: usize, height: usize) -> usize {
    if height == 0 || selected < height {
        0
    } else {
        selected + 1 - height
    }
}

/// Renders the country list screen
///
/// Displays the search box, the active region, a result count and a loading
/// marker while a server call is outstanding. The selected country is
/// highlighted with a cursor indicator.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(3),    // Country list
            Constraint::Length(1), // Help text
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_list(frame, app, chunks[1]);
    render_help(frame, app, chunks[2]);
}

/// Renders the title, search box and filter status
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let search_style = if app.search_focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };
    let cursor = if app.search_focused { "▏" } else { "" };

    let mut status = vec![
        Span::styled("Region: ", Style::default().fg(Color::Gray)),
        Span::styled(
            region_label(app.listing.region()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} countries", app.visible_countries().len()),
            Style::default().fg(Color::Gray),
        ),
    ];
    if app.listing.is_loading() {
        status.push(Span::styled(
            "  Loading…",
            Style::default().fg(Color::Yellow),
        ));
    }

    let width = area.width as usize;
    let lines = vec![
        Line::from(vec![
            Span::styled(
                "WHERE IN THE WORLD?",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled("Search: ", Style::default().fg(Color::Gray)),
            Span::styled(format!("{}{}", app.search_input, cursor), search_style),
        ]),
        Line::from(status),
        Line::from(Span::styled(
            "─".repeat(width.saturating_sub(2)),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Paragraph::new(lines), area);
}

/// Builds one row: cursor, name, population, region, capital
fn country_row(country: &Country, is_selected: bool) -> Line<'static> {
    let cursor = if is_selected { "\u{25B8} " } else { "  " }; // ▸ or space

    let name_style = if is_selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    Line::from(vec![
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
        Span::styled(fit(&country.name.common, NAME_WIDTH), name_style),
        Span::raw(" "),
        Span::styled(
            format!(
                "{:>width$}",
                country.formatted_population(),
                width = POPULATION_WIDTH
            ),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw("  "),
        Span::styled(
            fit(&country.region, REGION_WIDTH),
            Style::default().fg(Color::Green),
        ),
        Span::raw(" "),
        Span::styled(
            country.first_capital().unwrap_or(NOT_AVAILABLE).to_string(),
            Style::default().fg(Color::Gray),
        ),
    ])
}

/// Renders the visible slice of the country list
fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Countries ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let countries = app.visible_countries();
    if countries.is_empty() {
        let message = if app.listing.is_loading() {
            "Loading…"
        } else {
            "No countries found"
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(
            message,
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let height = area.height.saturating_sub(2) as usize;
    let offset = scroll_offset(app.selected_index, height);

    let lines: Vec<Line> = countries
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(index, country)| country_row(country, index == app.selected_index))
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Renders the key hint bar
fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let spans = if app.search_focused {
        vec![
            Span::styled("Type", Style::default().fg(Color::Yellow)),
            Span::raw(" to search  "),
            Span::styled("Enter/Esc", Style::default().fg(Color::Yellow)),
            Span::raw(" Done"),
        ]
    } else {
        vec![
            Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
            Span::raw(" Navigate  "),
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" Details  "),
            Span::styled("/", Style::default().fg(Color::Yellow)),
            Span::raw(" Search  "),
            Span::styled("Tab", Style::default().fg(Color::Yellow)),
            Span::raw(" Region  "),
            Span::styled("x", Style::default().fg(Color::Yellow)),
            Span::raw(" Clear  "),
            Span::styled("?", Style::default().fg(Color::Yellow)),
            Span::raw(" Help  "),
            Span::styled("q", Style::default().fg(Color::Yellow)),
            Span::raw(" Quit"),
        ]
    };

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}
