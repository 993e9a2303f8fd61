//! Listing state for the country directory
//!
//! The list view narrows a held set of countries by two independent inputs: a
//! free-text query and an optional region. Changes to either input may go to
//! the server (name search or region endpoint), and the controller decides
//! whether to adopt the server's answer or keep filtering what it already holds.
//!
//! Each transition is split in two so that the UI can run the network call in
//! the background: `set_query` / `set_region` update the inputs and say what to
//! fetch, `apply_search_result` / `apply_region_result` fold the answer back in.
//! `search` and `select_region` chain both halves for callers that can await.

use tracing::{debug, info, warn};

use crate::data::{Country, CountryClient, CountryError, Region};

/// Which server endpoint produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Name search
    Search,
    /// Region listing
    Region,
}

/// Where the next full set of countries comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// Replace the held set with the server's answer
    Server,
    /// Keep the held set and rely on local filtering
    Held,
}

/// Decides whether a server answer replaces the held set
///
/// A failed call never does. A successful region listing always does. A
/// successful search only does when it found something: an empty answer falls
/// back to filtering held data locally, since the server's name matching is
/// narrower than the local pass (which also looks at region, subregion and
/// capital).
pub fn choose_source(request: Request, server_ok: bool, result_count: usize) -> DataSource {
    match (request, server_ok) {
        (_, false) => DataSource::Held,
        (Request::Region, true) => DataSource::Server,
        (Request::Search, true) if result_count > 0 => DataSource::Server,
        (Request::Search, true) => DataSource::Held,
    }
}

/// Returns true if `country` matches an already lowercased, trimmed query
fn matches_query(country: &Country, query: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(query);

    contains(country.name.common.as_str())
        || contains(country.name.official.as_str())
        || contains(country.region.as_str())
        || country.subregion.as_deref().is_some_and(contains)
        || country.first_capital().is_some_and(contains)
}

/// Local filter pass
///
/// Narrows by exact region equality first, then by case-insensitive substring
/// match of the trimmed query against common name, official name, region,
/// subregion and first capital. A blank query matches everything.
pub fn filter_countries(countries: &[Country], query: &str, region: Option<Region>) -> Vec<Country> {
    let query = query.trim().to_lowercase();

    countries
        .iter()
        .filter(|c| region.map_or(true, |r| c.region == r.as_str()))
        .filter(|c| query.is_empty() || matches_query(c, &query))
        .cloned()
        .collect()
}

/// Listing controller state
#[derive(Debug, Clone)]
pub struct ListingController {
    /// Snapshot loaded at startup, restored when inputs are cleared
    initial: Vec<Country>,
    /// Current full set the local filter runs over
    countries: Vec<Country>,
    /// What the list view displays
    filtered: Vec<Country>,
    /// Committed search text
    query: String,
    /// Selected region, `None` for all regions
    region: Option<Region>,
    /// True while a server call issued by this controller is outstanding
    loading: bool,
}

impl ListingController {
    /// Creates a controller seeded with the initial snapshot
    pub fn new(initial: Vec<Country>) -> Self {
        Self {
            countries: initial.clone(),
            filtered: initial.clone(),
            initial,
            query: String::new(),
            region: None,
            loading: false,
        }
    }

    /// Countries currently displayed
    pub fn filtered(&self) -> &[Country] {
        &self.filtered
    }

    /// Full set the filter runs over
    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn region(&self) -> Option<Region> {
        self.region
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Looks up a held country by three-letter code, in the initial snapshot
    /// or the current set
    pub fn find_by_code(&self, cca3: &str) -> Option<&Country> {
        self.initial
            .iter()
            .chain(self.countries.iter())
            .find(|c| c.cca3.eq_ignore_ascii_case(cca3))
    }

    fn refilter(&mut self) {
        self.filtered = filter_countries(&self.countries, &self.query, self.region);
    }

    fn restore_initial(&mut self) {
        self.countries = self.initial.clone();
    }

    /// Commits a new search query
    ///
    /// Returns the query to send to the server, or `None` when the query is
    /// blank, in which case the initial snapshot has already been restored.
    pub fn set_query(&mut self, query: &str) -> Option<String> {
        self.query = query.to_string();

        let pending = if query.trim().is_empty() {
            debug!("search cleared, restoring initial countries");
            self.restore_initial();
            self.loading = false;
            None
        } else {
            self.loading = true;
            Some(query.to_string())
        };

        self.refilter();
        pending
    }

    /// Folds a server search answer back into the held set
    pub fn apply_search_result(&mut self, result: Result<Vec<Country>, CountryError>) {
        self.loading = false;

        let (server_ok, count) = match &result {
            Ok(found) => (true, found.len()),
            Err(e) => {
                warn!(query = %self.query, error = %e, "search failed, filtering locally");
                (false, 0)
            }
        };

        match (choose_source(Request::Search, server_ok, count), result) {
            (DataSource::Server, Ok(found)) => {
                info!(query = %self.query, count, "adopting search results");
                self.countries = found;
            }
            _ => debug!(query = %self.query, "keeping held countries"),
        }

        self.refilter();
    }

    /// Selects or clears the region filter
    ///
    /// Returns the region to fetch from the server, or `None` when the filter
    /// was cleared, in which case the initial snapshot has already been restored.
    pub fn set_region(&mut self, region: Option<Region>) -> Option<Region> {
        self.region = region;

        match region {
            Some(_) => self.loading = true,
            None => {
                debug!("region cleared, restoring initial countries");
                self.restore_initial();
                self.loading = false;
            }
        }

        self.refilter();
        region
    }

    /// Folds a server region listing back into the held set
    pub fn apply_region_result(&mut self, result: Result<Vec<Country>, CountryError>) {
        self.loading = false;

        let server_ok = match &result {
            Ok(_) => true,
            Err(e) => {
                warn!(region = ?self.region, error = %e, "region filter failed, filtering locally");
                false
            }
        };

        if let (DataSource::Server, Ok(found)) =
            (choose_source(Request::Region, server_ok, 0), result)
        {
            info!(region = ?self.region, count = found.len(), "adopting region results");
            self.countries = found;
        }

        self.refilter();
    }

    /// Commits a query and, if it is not blank, runs the server search
    pub async fn search(&mut self, client: &CountryClient, query: &str) {
        if let Some(pending) = self.set_query(query) {
            let result = client.search(&pending).await;
            self.apply_search_result(result);
        }
    }

    /// Changes the region and, if one is selected, fetches its countries
    pub async fn select_region(&mut self, client: &CountryClient, region: Option<Region>) {
        if let Some(pending) = self.set_region(region) {
            let result = client.list_by_region(pending).await;
            self.apply_region_result(result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::client::mock::{client_with, MockResponse, MockTransport};
    use crate::data::fixtures::{canada, country, france, spain};

    fn codes(countries: &[Country]) -> Vec<&str> {
        countries.iter().map(|c| c.cca3.as_str()).collect()
    }

    fn sorted_codes(countries: &[Country]) -> Vec<String> {
        let mut codes: Vec<String> = countries.iter().map(|c| c.cca3.clone()).collect();
        codes.sort();
        codes
    }

    // ========================================================================
    // Decision function
    // ========================================================================

    #[test]
    fn test_choose_source_search() {
        assert_eq!(choose_source(Request::Search, true, 3), DataSource::Server);
        assert_eq!(choose_source(Request::Search, true, 0), DataSource::Held);
        assert_eq!(choose_source(Request::Search, false, 0), DataSource::Held);
    }

    #[test]
    fn test_choose_source_region() {
        assert_eq!(choose_source(Request::Region, true, 0), DataSource::Server);
        assert_eq!(choose_source(Request::Region, true, 12), DataSource::Server);
        assert_eq!(choose_source(Request::Region, false, 0), DataSource::Held);
    }

    // ========================================================================
    // Local filter pass
    // ========================================================================

    #[test]
    fn test_query_matches_name_in_any_case() {
        let held = vec![spain()];

        assert_eq!(codes(&filter_countries(&held, "spain", None)), ["ESP"]);
        assert_eq!(codes(&filter_countries(&held, "SPAIN", None)), ["ESP"]);
        assert_eq!(codes(&filter_countries(&held, "  sPaIn  ", None)), ["ESP"]);
        assert!(filter_countries(&held, "zz-nonexistent", None).is_empty());
    }

    #[test]
    fn test_query_matches_official_name_subregion_and_capital() {
        let held = vec![spain(), canada(), france()];

        assert_eq!(codes(&filter_countries(&held, "kingdom", None)), ["ESP"]);
        assert_eq!(codes(&filter_countries(&held, "north america", None)), ["CAN"]);
        assert_eq!(codes(&filter_countries(&held, "paris", None)), ["FRA"]);
        assert_eq!(codes(&filter_countries(&held, "europe", None)), ["ESP", "FRA"]);
    }

    #[test]
    fn test_query_ignores_capitals_after_the_first() {
        let mut bolivia = country("Bolivia", "BOL", "Americas");
        bolivia.capital = Some(vec!["Sucre".to_string(), "La Paz".to_string()]);

        assert!(filter_countries(&[bolivia.clone()], "la paz", None).is_empty());
        assert_eq!(codes(&filter_countries(&[bolivia], "sucre", None)), ["BOL"]);
    }

    #[test]
    fn test_spain_canada_scenario() {
        let held = vec![spain(), canada()];

        assert_eq!(codes(&filter_countries(&held, "can", None)), ["CAN"]);
        assert_eq!(codes(&filter_countries(&held, "", Some(Region::Europe))), ["ESP"]);
        assert!(filter_countries(&held, "can", Some(Region::Europe)).is_empty());
    }

    #[test]
    fn test_blank_query_and_no_region_keeps_everything() {
        let held = vec![spain(), canada(), france()];

        assert_eq!(filter_countries(&held, "   ", None).len(), 3);
    }

    // ========================================================================
    // Controller transitions
    // ========================================================================

    #[test]
    fn test_new_controller_displays_initial_set() {
        let controller = ListingController::new(vec![spain(), canada()]);

        assert_eq!(codes(controller.filtered()), ["ESP", "CAN"]);
        assert!(!controller.is_loading());
        assert!(controller.region().is_none());
        assert_eq!(controller.query(), "");
    }

    #[test]
    fn test_set_query_filters_immediately_and_requests_search() {
        let mut controller = ListingController::new(vec![spain(), canada()]);

        let pending = controller.set_query("can");

        assert_eq!(pending.as_deref(), Some("can"));
        assert!(controller.is_loading());
        assert_eq!(codes(controller.filtered()), ["CAN"]);
    }

    #[test]
    fn test_search_results_replace_held_set() {
        let mut controller = ListingController::new(vec![spain(), canada()]);
        controller.set_query("fra");

        controller.apply_search_result(Ok(vec![france()]));

        assert!(!controller.is_loading());
        assert_eq!(codes(controller.countries()), ["FRA"]);
        assert_eq!(codes(controller.filtered()), ["FRA"]);
    }

    #[test]
    fn test_empty_search_result_falls_back_to_local_filter() {
        let mut controller = ListingController::new(vec![spain(), canada()]);
        controller.set_query("ottawa");

        controller.apply_search_result(Ok(Vec::new()));

        assert_eq!(codes(controller.countries()), ["ESP", "CAN"]);
        assert_eq!(codes(controller.filtered()), ["CAN"]);
    }

    #[test]
    fn test_failed_search_falls_back_to_local_filter() {
        let mut controller = ListingController::new(vec![spain(), canada()]);
        controller.set_query("madrid");

        controller.apply_search_result(Err(CountryError::NotFound("boom".to_string())));

        assert!(!controller.is_loading());
        assert_eq!(codes(controller.filtered()), ["ESP"]);
    }

    #[test]
    fn test_clearing_query_restores_initial_snapshot() {
        let mut controller = ListingController::new(vec![spain(), canada()]);
        controller.set_query("fra");
        controller.apply_search_result(Ok(vec![france()]));

        let pending = controller.set_query("  ");

        assert!(pending.is_none());
        assert!(!controller.is_loading());
        assert_eq!(codes(controller.filtered()), ["ESP", "CAN"]);
    }

    #[test]
    fn test_set_region_narrows_held_set_before_server_answers() {
        let mut controller = ListingController::new(vec![spain(), canada(), france()]);

        let pending = controller.set_region(Some(Region::Europe));

        assert_eq!(pending, Some(Region::Europe));
        assert!(controller.is_loading());
        assert_eq!(codes(controller.filtered()), ["ESP", "FRA"]);
    }

    #[test]
    fn test_region_result_replaces_held_set() {
        let mut controller = ListingController::new(vec![spain(), canada()]);
        controller.set_region(Some(Region::Europe));

        controller.apply_region_result(Ok(vec![spain(), france()]));

        assert_eq!(codes(controller.countries()), ["ESP", "FRA"]);
        assert_eq!(codes(controller.filtered()), ["ESP", "FRA"]);
    }

    #[test]
    fn test_failed_region_fetch_filters_held_set() {
        let mut controller = ListingController::new(vec![spain(), canada()]);
        controller.set_region(Some(Region::Americas));

        controller.apply_region_result(Err(CountryError::InvalidUrl("x".to_string())));

        assert!(!controller.is_loading());
        assert_eq!(codes(controller.countries()), ["ESP", "CAN"]);
        assert_eq!(codes(controller.filtered()), ["CAN"]);
    }

    #[test]
    fn test_find_by_code_searches_initial_and_current_sets() {
        let mut controller = ListingController::new(vec![spain()]);
        controller.set_query("fra");
        controller.apply_search_result(Ok(vec![france()]));

        assert!(controller.find_by_code("esp").is_some());
        assert!(controller.find_by_code("FRA").is_some());
        assert!(controller.find_by_code("CAN").is_none());
    }

    #[tokio::test]
    async fn test_select_then_clear_region_restores_original_set() {
        let transport = MockTransport::new();
        transport.respond_json("/region/Europe", &vec![spain(), france()]);
        let client = client_with(&transport);
        let initial = vec![canada(), spain(), france()];
        let mut controller = ListingController::new(initial.clone());

        controller.select_region(&client, Some(Region::Europe)).await;
        assert_eq!(sorted_codes(controller.filtered()), ["ESP", "FRA"]);

        controller.select_region(&client, None).await;

        assert_eq!(sorted_codes(controller.countries()), sorted_codes(&initial));
        assert_eq!(sorted_codes(controller.filtered()), sorted_codes(&initial));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_search_round_trip_through_client() {
        let transport = MockTransport::new();
        transport.respond_json("/name/can", &vec![canada()]);
        let client = client_with(&transport);
        let mut controller = ListingController::new(vec![spain(), canada(), france()]);

        controller.search(&client, "can").await;

        assert_eq!(codes(controller.filtered()), ["CAN"]);
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_search_with_no_server_matches_keeps_local_results() {
        let transport = MockTransport::new();
        transport.respond("/name/", MockResponse::Status(404));
        let client = client_with(&transport);
        let mut controller = ListingController::new(vec![spain(), canada()]);

        controller.search(&client, "southern").await;

        assert_eq!(codes(controller.filtered()), ["ESP"]);
    }

    #[tokio::test]
    async fn test_blank_search_makes_no_request() {
        let transport = MockTransport::new();
        let client = client_with(&transport);
        let mut controller = ListingController::new(vec![spain()]);

        controller.search(&client, "").await;

        assert_eq!(transport.call_count(), 0);
        assert_eq!(codes(controller.filtered()), ["ESP"]);
    }

    #[tokio::test]
    async fn test_search_results_are_still_narrowed_by_region() {
        let transport = MockTransport::new();
        transport.respond_json("/region/Europe", &vec![spain(), france()]);
        transport.respond_json("/name/", &vec![spain(), canada()]);
        let client = client_with(&transport);
        let mut controller = ListingController::new(vec![spain(), canada(), france()]);

        controller.select_region(&client, Some(Region::Europe)).await;
        controller.search(&client, "a").await;

        assert_eq!(codes(controller.countries()), ["ESP", "CAN"]);
        assert_eq!(codes(controller.filtered()), ["ESP"]);
    }
}
