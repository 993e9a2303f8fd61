//! Country detail screen rendering
//!
//! Shows every attribute of one country, its flag references and a row of
//! border countries that can be opened in turn.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, BorderLink, CountryDetailView};
use crate::data::{format_population, Country, NOT_AVAILABLE};

/// Label column width for attribute rows
const LABEL_WIDTH: usize = 18;

/// Creates a "label: value" row
fn field_line(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {:<width$}", format!("{}:", label), width = LABEL_WIDTH),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(value.into(), Style::default().fg(Color::White)),
    ])
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

/// Joins a list for display, or "N/A" when it is empty
fn join_or_na(values: &[String]) -> String {
    if values.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        values.join(", ")
    }
}

/// Formats an area in square kilometres
fn format_area(area: Option<f64>) -> String {
    match area {
        Some(km2) => format!("{} km²", format_population(km2.round() as u64)),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Formats an optional yes/no attribute
fn yes_no(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "Yes",
        Some(false) => "No",
        None => NOT_AVAILABLE,
    }
}

/// Builds the attribute rows shown in the detail body
fn detail_lines(country: &Country) -> Vec<Line<'static>> {
    let tld = country.tld.as_deref().map(join_or_na);
    let capitals = country.capital.as_deref().map(join_or_na);

    let mut lines = vec![
        section_title("Overview"),
        field_line("Native Name", country.native_name()),
        field_line("Official Name", country.name.official.clone()),
        field_line("Population", country.formatted_population()),
        field_line("Region", country.region.clone()),
        field_line(
            "Sub Region",
            country.subregion.as_deref().unwrap_or(NOT_AVAILABLE),
        ),
        field_line("Capital", capitals.unwrap_or_else(|| NOT_AVAILABLE.to_string())),
        field_line("Area", format_area(country.area)),
        Line::from(""),
        section_title("Details"),
        field_line(
            "Top Level Domain",
            tld.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
        field_line("Currencies", country.currencies_display()),
        field_line("Languages", country.languages_display()),
        field_line("Timezones", join_or_na(&country.timezones)),
        field_line("Continents", join_or_na(&country.continents)),
        field_line("Landlocked", yes_no(country.landlocked)),
        field_line("Independent", yes_no(country.independent)),
        field_line("UN Member", yes_no(country.un_member)),
    ];

    if let Some(car) = &country.car {
        if !car.side.is_empty() {
            lines.push(field_line("Drives On", car.side.clone()));
        }
    }
    if let Some(start) = &country.start_of_week {
        lines.push(field_line("Week Starts", start.clone()));
    }

    lines.push(Line::from(""));
    lines.push(section_title("Flag"));
    lines.push(field_line("Description", country.flag_alt()));
    lines.push(field_line(
        "Image",
        country.flag_url().unwrap_or(NOT_AVAILABLE),
    ));

    if let Some(maps) = &country.maps {
        lines.push(Line::from(""));
        lines.push(section_title("Maps"));
        lines.push(field_line("Google Maps", maps.google_maps.clone()));
        lines.push(field_line("OpenStreetMap", maps.open_street_maps.clone()));
    }

    lines
}

/// Builds the border country row with the highlighted entry marked
fn border_spans(borders: &[BorderLink], selected: usize) -> Vec<Span<'static>> {
    if borders.is_empty() {
        return vec![Span::styled(
            "None",
            Style::default().fg(Color::DarkGray),
        )];
    }

    let mut spans = Vec::with_capacity(borders.len() * 2);
    for (index, border) in borders.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw(" "));
        }
        let style = if index == selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        spans.push(Span::styled(format!("[{}]", border.label()), style));
    }
    spans
}

/// Renders the country detail screen
pub fn render(frame: &mut Frame, app: &App) {
    let Some(view) = &app.detail else {
        return;
    };
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Min(5),    // Attributes
            Constraint::Length(4), // Border countries
            Constraint::Length(1), // Help text
        ])
        .split(area);

    render_title(frame, view, chunks[0]);
    render_body(frame, app, view, chunks[1]);
    render_borders(frame, app, view, chunks[2]);
    render_help(frame, chunks[3]);
}

fn render_title(frame: &mut Frame, view: &CountryDetailView, area: Rect) {
    let country = &view.country;
    let mut spans = Vec::new();
    if let Some(flag) = &country.flag {
        spans.push(Span::raw(format!("{} ", flag)));
    }
    spans.push(Span::styled(
        country.name.common.clone(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::styled(
        format!("  ({})", country.cca3),
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_body(frame: &mut Frame, app: &App, view: &CountryDetailView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(detail_lines(&view.country))
        .block(block)
        .scroll((app.detail_scroll_offset, 0));

    frame.render_widget(paragraph, area);
}

fn render_borders(frame: &mut Frame, app: &App, view: &CountryDetailView, area: Rect) {
    let block = Block::default()
        .title(" Border Countries ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(Line::from(border_spans(
        &view.borders,
        app.selected_border,
    )))
    .block(block)
    .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let help_text = Line::from(vec![
        Span::styled("←/→", Style::default().fg(Color::Yellow)),
        Span::raw(" Border  "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Open  "),
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Scroll  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" Back  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" Quit"),
    ]);

    let paragraph = Paragraph::new(help_text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppState;
    use crate::data::fixtures::spain;
    use crate::data::{Currency, CountryClient, Maps, NativeName};
    use ratatui::{backend::TestBackend, Terminal};
    use indexmap::IndexMap;

    fn detailed_spain() -> Country {
        let mut spain = spain();
        spain.flag = Some("🇪🇸".to_string());
        spain.tld = Some(vec![".es".to_string()]);
        spain.area = Some(505_992.0);
        spain.timezones = vec!["UTC".to_string(), "UTC+01:00".to_string()];
        spain.continents = vec!["Europe".to_string()];
        spain.currencies = Some(IndexMap::from([(
            "EUR".to_string(),
            Currency {
                name: "Euro".to_string(),
                symbol: Some("€".to_string()),
            },
        )]));
        spain.languages = Some(IndexMap::from([("spa".to_string(), "Spanish".to_string())]));
        spain.name.native_name = Some(IndexMap::from([(
            "spa".to_string(),
            NativeName {
                official: "Reino de España".to_string(),
                common: "España".to_string(),
            },
        )]));
        spain.flags.svg = "https://flagcdn.com/es.svg".to_string();
        spain.maps = Some(Maps {
            google_maps: "https://goo.gl/maps/138JaXW8EZzRVitY9".to_string(),
            open_street_maps: "https://www.openstreetmap.org/relation/1311341".to_string(),
        });
        spain
    }

    fn app_with_detail(country: Country, borders: Vec<BorderLink>) -> App {
        let mut app = App::new(CountryClient::new());
        app.state = AppState::CountryDetail(country.cca3.clone());
        app.detail = Some(CountryDetailView { country, borders });
        app
    }

    fn render_to_string(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    fn border(code: &str, name: Option<&str>) -> BorderLink {
        BorderLink {
            code: code.to_string(),
            name: name.map(str::to_string),
        }
    }

    #[test]
    fn test_detail_shows_attributes() {
        let app = app_with_detail(detailed_spain(), Vec::new());
        let content = render_to_string(&app, 100, 50);

        assert!(content.contains("Spain"));
        assert!(content.contains("España"));
        assert!(content.contains("47,351,567"));
        assert!(content.contains("Southern Europe"));
        assert!(content.contains("Madrid"));
        assert!(content.contains(".es"));
        assert!(content.contains("Euro"));
        assert!(content.contains("Spanish"));
        assert!(content.contains("505,992 km²"));
        assert!(content.contains("UTC+01:00"));
        assert!(content.contains("flagcdn.com/es.svg"));
        assert!(content.contains("openstreetmap.org"));
    }

    #[test]
    fn test_missing_attributes_show_placeholder() {
        let mut sparse = spain();
        sparse.subregion = None;
        let app = app_with_detail(sparse, Vec::new());
        let content = render_to_string(&app, 100, 50);

        assert!(content.contains("Sub Region:"));
        assert!(content.contains(NOT_AVAILABLE));
        assert!(content.contains("Flag of Spain"));
        assert!(content.contains("None"), "no borders should say None");
    }

    #[test]
    fn test_border_row_uses_names_and_falls_back_to_codes() {
        let borders = vec![border("FRA", Some("France")), border("GIB", None)];
        let app = app_with_detail(spain(), borders);
        let content = render_to_string(&app, 100, 40);

        assert!(content.contains("Border Countries"));
        assert!(content.contains("[France]"));
        assert!(content.contains("[GIB]"));
    }

    #[test]
    fn test_selected_border_is_highlighted() {
        let borders = vec![border("FRA", Some("France")), border("PRT", Some("Portugal"))];
        let mut app = app_with_detail(spain(), borders);
        app.selected_border = 1;

        let spans = border_spans(&app.detail.as_ref().unwrap().borders, app.selected_border);
        assert_eq!(spans[2].content, "[Portugal]");
        assert_eq!(spans[2].style.bg, Some(Color::Cyan));
        assert_eq!(spans[0].style.bg, None);
    }

    #[test]
    fn test_render_without_detail_draws_nothing() {
        let app = App::new(CountryClient::new());
        let content = render_to_string(&app, 60, 10);

        assert!(content.trim().is_empty());
    }

    #[test]
    fn test_format_area_and_yes_no() {
        assert_eq!(format_area(Some(9_984_670.0)), "9,984,670 km²");
        assert_eq!(format_area(None), NOT_AVAILABLE);
        assert_eq!(yes_no(Some(true)), "Yes");
        assert_eq!(yes_no(None), NOT_AVAILABLE);
    }
}
