//! Application state management for the country directory
//!
//! This module contains the main application state, handling keyboard input,
//! data loading, and state transitions between the list and detail views.
//! Search and region changes run in background tasks and report back over a
//! channel that the UI loop drains every tick.

use crossterm::event::{KeyCode, KeyEvent};
use futures::future::join_all;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::cli::StartupConfig;
use crate::data::{Country, CountryClient, CountryError, Region};
use crate::debounce::{Debouncer, SEARCH_DEBOUNCE};
use crate::listing::ListingController;

/// Number of rows PageUp/PageDown move the selection by
const PAGE_SIZE: usize = 10;

/// Upper bound for detail view scrolling
const MAX_DETAIL_SCROLL: u16 = 40;

/// Application state enum representing the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Initial loading state while fetching the country list
    Loading,
    /// The initial list fetch failed; holds the error message
    LoadFailed(String),
    /// List view with search and region filter
    CountryList,
    /// Detail view for the country with this three-letter code
    CountryDetail(String),
    /// A detail lookup failed for this code
    NotFound(String),
}

/// Results sent from background tasks back to the UI loop
#[derive(Debug)]
pub enum ListingMessage {
    /// The debounce window for the search box elapsed with this text
    QueryCommitted(String),
    /// A server-side name search finished
    SearchCompleted(Result<Vec<Country>, CountryError>),
    /// A server-side region listing finished
    RegionLoaded(Result<Vec<Country>, CountryError>),
}

/// A neighbouring country shown on the detail view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorderLink {
    /// Three-letter code used for navigation
    pub code: String,
    /// Common name, if it could be resolved
    pub name: Option<String>,
}

impl BorderLink {
    /// Name when known, otherwise the bare code
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.code)
    }
}

/// Everything the detail view renders
#[derive(Debug, Clone)]
pub struct CountryDetailView {
    pub country: Country,
    pub borders: Vec<BorderLink>,
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Index of the highlighted row in the filtered list
    pub selected_index: usize,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Text typed into the search box (committed after the debounce delay)
    pub search_input: String,
    /// Whether keystrokes go to the search box
    pub search_focused: bool,
    /// Listing filter state
    pub listing: ListingController,
    /// Loaded detail record for `AppState::CountryDetail`
    pub detail: Option<CountryDetailView>,
    /// Highlighted border country in the detail view
    pub selected_border: usize,
    /// Scroll offset for the detail view
    pub detail_scroll_offset: u16,
    /// Codes of previously viewed countries, for Esc navigation
    pub history: Vec<String>,
    /// Country code waiting to be fetched by the UI loop
    pending_detail: Option<String>,
    /// Flag set when the user asks to retry the initial load
    retry_requested: bool,
    /// Filters still to be applied after the first successful load
    startup: StartupConfig,
    /// Countries API client
    client: CountryClient,
    /// Delays search box input before it is committed
    debouncer: Debouncer,
    /// Sender cloned into background tasks
    tx: mpsc::Sender<ListingMessage>,
    /// Receiver drained by `process_messages`
    rx: mpsc::Receiver<ListingMessage>,
}

impl App {
    /// Creates a new App instance using the given client
    pub fn new(client: CountryClient) -> Self {
        let (tx, rx) = mpsc::channel(32);
        Self {
            state: AppState::Loading,
            selected_index: 0,
            should_quit: false,
            show_help: false,
            search_input: String::new(),
            search_focused: false,
            listing: ListingController::new(Vec::new()),
            detail: None,
            selected_border: 0,
            detail_scroll_offset: 0,
            history: Vec::new(),
            pending_detail: None,
            retry_requested: false,
            startup: StartupConfig::default(),
            client,
            debouncer: Debouncer::new(SEARCH_DEBOUNCE),
            tx,
            rx,
        }
    }

    /// Creates a new App instance with the given startup configuration.
    ///
    /// The client targets `config.api_url`. Region, search and code from the
    /// config are applied once the first country list has loaded.
    pub fn with_startup_config(config: StartupConfig) -> Self {
        let client = CountryClient::new().with_base_url(config.api_url.clone());
        let mut app = Self::new(client);
        app.startup = config;
        app
    }

    /// Returns the countries currently shown in the list
    pub fn visible_countries(&self) -> &[Country] {
        self.listing.filtered()
    }

    /// Returns the currently selected country, if any
    pub fn selected_country(&self) -> Option<&Country> {
        self.visible_countries().get(self.selected_index)
    }

    /// Returns true when a detail lookup is waiting for `load_pending_detail`
    pub fn has_pending_detail(&self) -> bool {
        self.pending_detail.is_some()
    }

    /// Returns and clears the retry flag
    pub fn take_retry_request(&mut self) -> bool {
        std::mem::take(&mut self.retry_requested)
    }

    /// Fetches the full country list and switches to the list view
    ///
    /// On failure the app moves to `LoadFailed`, the only hard error the user
    /// ever sees. Startup filters are applied after the first success.
    pub async fn load_initial(&mut self) {
        self.state = AppState::Loading;

        match self.client.list_all().await {
            Ok(countries) => {
                info!(count = countries.len(), "loaded country list");
                self.listing = ListingController::new(countries);
                self.selected_index = 0;
                self.state = AppState::CountryList;
                self.apply_startup_filters().await;
            }
            Err(e) => {
                error!(error = %e, "failed to load country list");
                self.state = AppState::LoadFailed(e.to_string());
            }
        }
    }

    /// Applies `--region`, `--search` and the positional code, once
    async fn apply_startup_filters(&mut self) {
        if let Some(region) = self.startup.initial_region.take() {
            self.listing
                .select_region(&self.client, Some(region))
                .await;
        }

        if let Some(query) = self.startup.initial_search.take() {
            self.search_input = query.clone();
            self.listing.search(&self.client, &query).await;
        }

        if let Some(code) = self.startup.initial_code.take() {
            self.pending_detail = Some(code);
        }

        self.clamp_selection();
    }

    /// Fetches the country queued by `open_detail` and shows it
    pub async fn load_pending_detail(&mut self) {
        let Some(code) = self.pending_detail.take() else {
            return;
        };

        match self.client.get_by_code(&code).await {
            Ok(country) => {
                let borders = self.resolve_borders(&country).await;
                debug!(code = %country.cca3, borders = borders.len(), "loaded country detail");
                self.state = AppState::CountryDetail(country.cca3.clone());
                self.detail = Some(CountryDetailView { country, borders });
                self.selected_border = 0;
                self.detail_scroll_offset = 0;
            }
            Err(e) => {
                warn!(code = %code, error = %e, "country lookup failed");
                self.detail = None;
                self.state = AppState::NotFound(code);
            }
        }
    }

    /// Resolves border codes to names, from held data first and the API otherwise
    ///
    /// Lookups run concurrently. A failed lookup leaves the bare code.
    async fn resolve_borders(&self, country: &Country) -> Vec<BorderLink> {
        let codes = country.border_codes();

        let lookups = codes.iter().map(|code| async move {
            if let Some(held) = self.listing.find_by_code(code) {
                return Some(held.name.common.clone());
            }
            self.client
                .get_by_code(code)
                .await
                .ok()
                .map(|c| c.name.common)
        });
        let names = join_all(lookups).await;

        codes
            .iter()
            .cloned()
            .zip(names)
            .map(|(code, name)| BorderLink { code, name })
            .collect()
    }

    /// Queues a detail lookup, starting a fresh navigation history
    pub fn open_detail(&mut self, code: &str) {
        self.history.clear();
        self.pending_detail = Some(code.to_string());
    }

    /// Leaves the current detail or not-found view
    ///
    /// Goes to the previously viewed country if there is one, else to the list.
    fn go_back(&mut self) {
        self.reset_detail_view_state();
        match self.history.pop() {
            Some(previous) => self.pending_detail = Some(previous),
            None => {
                self.detail = None;
                self.state = AppState::CountryList;
            }
        }
    }

    /// Opens the highlighted border country, remembering the current one
    fn open_selected_border(&mut self) {
        let Some(view) = &self.detail else {
            return;
        };
        let Some(border) = view.borders.get(self.selected_border) else {
            return;
        };

        let target = border.code.clone();
        self.history.push(view.country.cca3.clone());
        self.pending_detail = Some(target);
    }

    /// Drains finished background work and folds it into the listing
    ///
    /// Returns true if any message was applied.
    pub fn process_messages(&mut self) -> bool {
        let mut applied = false;
        while let Ok(message) = self.rx.try_recv() {
            self.apply_message(message);
            applied = true;
        }
        applied
    }

    fn apply_message(&mut self, message: ListingMessage) {
        match message {
            ListingMessage::QueryCommitted(query) => {
                if let Some(pending) = self.listing.set_query(&query) {
                    self.spawn_search(pending);
                }
            }
            ListingMessage::SearchCompleted(result) => self.listing.apply_search_result(result),
            ListingMessage::RegionLoaded(result) => self.listing.apply_region_result(result),
        }
        self.clamp_selection();
    }

    fn spawn_search(&self, query: String) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.search(&query).await;
            let _ = tx.send(ListingMessage::SearchCompleted(result)).await;
        });
    }

    fn spawn_region(&self, region: Region) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.list_by_region(region).await;
            let _ = tx.send(ListingMessage::RegionLoaded(result)).await;
        });
    }

    /// Restarts the debounce timer with the current search box text
    fn schedule_search(&mut self) {
        let query = self.search_input.clone();
        let tx = self.tx.clone();
        self.debouncer.schedule(async move {
            let _ = tx.send(ListingMessage::QueryCommitted(query)).await;
        });
    }

    /// Changes the region filter, fetching the region in the background
    fn change_region(&mut self, region: Option<Region>) {
        debug!(region = ?region, "region filter changed");
        if let Some(pending) = self.listing.set_region(region) {
            self.spawn_region(pending);
        }
        self.clamp_selection();
    }

    /// Clears both the search box and the region filter
    fn clear_filters(&mut self) {
        self.debouncer.cancel();
        self.search_input.clear();
        self.listing.set_query("");
        self.change_region(None);
        self.selected_index = 0;
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q`: Quit (outside the search box)
    /// - `Up`/`k`, `Down`/`j`, `PgUp`, `PgDn`, `g`, `G`: Move selection in list
    /// - `Enter`: Open the selected country
    /// - `/`: Focus the search box (`Enter`/`Esc` to leave it)
    /// - `Tab`/`f`, `BackTab`/`F`: Next/previous region filter
    /// - `x`: Clear search and region filter
    /// - `Left`/`h`, `Right`/`l`: Choose a border country (detail view)
    /// - `Esc`/`Backspace`: Go back (detail view), quit (list view)
    /// - `r`: Retry after a failed load
    /// - `?`: Toggle help
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return;
        }

        match self.state {
            AppState::Loading => {
                if key_event.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
            AppState::LoadFailed(_) => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                KeyCode::Char('r') => self.retry_requested = true,
                _ => {}
            },
            AppState::CountryList if self.search_focused => self.handle_search_key(key_event),
            AppState::CountryList => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                KeyCode::Up | KeyCode::Char('k') => self.move_selection_up(),
                KeyCode::Down | KeyCode::Char('j') => self.move_selection_down(),
                KeyCode::PageUp => self.page_up(),
                KeyCode::PageDown => self.page_down(),
                KeyCode::Home | KeyCode::Char('g') => self.selected_index = 0,
                KeyCode::End | KeyCode::Char('G') => {
                    self.selected_index = self.visible_countries().len().saturating_sub(1);
                }
                KeyCode::Enter => {
                    if let Some(code) = self.selected_country().map(|c| c.cca3.clone()) {
                        self.open_detail(&code);
                    }
                }
                KeyCode::Char('/') => self.search_focused = true,
                KeyCode::Tab | KeyCode::Char('f') => {
                    self.change_region(Region::cycle_next(self.listing.region()));
                }
                KeyCode::BackTab | KeyCode::Char('F') => {
                    self.change_region(Region::cycle_prev(self.listing.region()));
                }
                KeyCode::Char('x') => self.clear_filters(),
                KeyCode::Char('?') => self.show_help = true,
                _ => {}
            },
            AppState::CountryDetail(_) => match key_event.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Esc | KeyCode::Backspace => self.go_back(),
                KeyCode::Left | KeyCode::Char('h') => self.move_border_left(),
                KeyCode::Right | KeyCode::Char('l') => self.move_border_right(),
                KeyCode::Enter => self.open_selected_border(),
                KeyCode::Down | KeyCode::Char('j') => self.scroll_down(),
                KeyCode::Up | KeyCode::Char('k') => self.scroll_up(),
                KeyCode::Char('?') => self.show_help = true,
                _ => {}
            },
            AppState::NotFound(_) => match key_event.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Esc | KeyCode::Backspace | KeyCode::Enter => self.go_back(),
                _ => {}
            },
        }
    }

    /// Keys while the search box has focus
    fn handle_search_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Esc | KeyCode::Enter => self.search_focused = false,
            KeyCode::Backspace => {
                if self.search_input.pop().is_some() {
                    self.schedule_search();
                }
            }
            KeyCode::Char(c) => {
                self.search_input.push(c);
                self.schedule_search();
            }
            _ => {}
        }
    }

    /// Keeps the selection inside the filtered list after it changes size
    fn clamp_selection(&mut self) {
        let count = self.visible_countries().len();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }

    /// Moves the selection up in the list, wrapping to bottom if at top
    fn move_selection_up(&mut self) {
        let count = self.visible_countries().len();
        if count == 0 {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = count - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    /// Moves the selection down in the list, wrapping to top if at bottom
    fn move_selection_down(&mut self) {
        let count = self.visible_countries().len();
        if count == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % count;
    }

    fn page_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(PAGE_SIZE);
    }

    fn page_down(&mut self) {
        let last = self.visible_countries().len().saturating_sub(1);
        self.selected_index = (self.selected_index + PAGE_SIZE).min(last);
    }

    fn border_count(&self) -> usize {
        self.detail.as_ref().map_or(0, |view| view.borders.len())
    }

    /// Moves the border highlight left, wrapping at the start
    fn move_border_left(&mut self) {
        let count = self.border_count();
        if count == 0 {
            return;
        }
        self.selected_border = (self.selected_border + count - 1) % count;
    }

    /// Moves the border highlight right, wrapping at the end
    fn move_border_right(&mut self) {
        let count = self.border_count();
        if count == 0 {
            return;
        }
        self.selected_border = (self.selected_border + 1) % count;
    }

    /// Scrolls up in the detail view, stopping at the top
    pub fn scroll_up(&mut self) {
        self.detail_scroll_offset = self.detail_scroll_offset.saturating_sub(1);
    }

    /// Scrolls down in the detail view, up to a fixed maximum
    pub fn scroll_down(&mut self) {
        if self.detail_scroll_offset < MAX_DETAIL_SCROLL {
            self.detail_scroll_offset += 1;
        }
    }

    /// Resets per-country detail view state
    pub fn reset_detail_view_state(&mut self) {
        self.selected_border = 0;
        self.detail_scroll_offset = 0;
    }
}
