//! UI rendering module for the country directory
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod country_detail;
pub mod country_list;
pub mod help_overlay;
pub mod status;

pub use country_detail::render as render_country_detail;
pub use country_list::render as render_country_list;
pub use help_overlay::render as render_help_overlay;
pub use status::{render_load_failed, render_loading, render_not_found};

use ratatui::Frame;

use crate::app::{App, AppState};

/// Renders the view for the current state, with the help overlay on top
pub fn render(frame: &mut Frame, app: &App) {
    match &app.state {
        AppState::Loading => render_loading(frame, "Loading countries..."),
        AppState::LoadFailed(error) => render_load_failed(frame, error),
        AppState::CountryList => render_country_list(frame, app),
        AppState::CountryDetail(_) => render_country_detail(frame, app),
        AppState::NotFound(code) => render_not_found(frame, code),
    }

    if app.show_help {
        render_help_overlay(frame, &app.state);
    }
}
