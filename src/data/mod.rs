//! Core data models for the country directory
//!
//! This module contains the country record as served by the REST Countries API,
//! the fixed set of regions used for filtering, and the display helpers shared
//! by the list and detail views.

pub mod client;

pub use client::{CountryClient, CountryError, HttpTransport, Transport, DEFAULT_BASE_URL};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder shown for attributes the API did not provide
pub const NOT_AVAILABLE: &str = "N/A";

/// One of the five geographic regions the API can filter by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Africa,
    Americas,
    Asia,
    Europe,
    Oceania,
}

impl Region {
    /// Returns a slice containing all region variants in display order.
    pub fn all() -> &'static [Region] {
        &[
            Region::Africa,
            Region::Americas,
            Region::Asia,
            Region::Europe,
            Region::Oceania,
        ]
    }

    /// Returns the region name exactly as the API spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Africa => "Africa",
            Region::Americas => "Americas",
            Region::Asia => "Asia",
            Region::Europe => "Europe",
            Region::Oceania => "Oceania",
        }
    }

    /// Parses user input into a Region.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Returns `None` if the input doesn't name one of the five regions.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Region> {
        match s.trim().to_lowercase().as_str() {
            "africa" => Some(Region::Africa),
            "americas" => Some(Region::Americas),
            "asia" => Some(Region::Asia),
            "europe" => Some(Region::Europe),
            "oceania" => Some(Region::Oceania),
            _ => None,
        }
    }

    /// Steps forward through "no filter" followed by every region, wrapping around.
    pub fn cycle_next(current: Option<Region>) -> Option<Region> {
        let all = Self::all();
        match current {
            None => all.first().copied(),
            Some(region) => {
                let index = all.iter().position(|r| *r == region)?;
                all.get(index + 1).copied()
            }
        }
    }

    /// Steps backward through every region followed by "no filter", wrapping around.
    pub fn cycle_prev(current: Option<Region>) -> Option<Region> {
        let all = Self::all();
        match current {
            None => all.last().copied(),
            Some(region) => {
                let index = all.iter().position(|r| *r == region)?;
                index.checked_sub(1).and_then(|i| all.get(i).copied())
            }
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label for the region filter, "All Regions" when no region is selected
pub fn region_label(region: Option<Region>) -> &'static str {
    region.map(|r| r.as_str()).unwrap_or("All Regions")
}

/// Common and official name of a country, with optional native spellings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryName {
    pub common: String,
    pub official: String,
    /// Native names keyed by ISO 639-3 language code
    pub native_name: Option<IndexMap<String, NativeName>>,
}

/// A country name in one of its native languages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeName {
    pub official: String,
    pub common: String,
}

/// Flag image references
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Flags {
    /// Raster image URL
    #[serde(default)]
    pub png: String,
    /// Vector image URL
    #[serde(default)]
    pub svg: String,
    /// Accessible description of the flag
    pub alt: Option<String>,
}

/// A currency used in a country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub name: String,
    pub symbol: Option<String>,
}

/// Map links for a country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Maps {
    pub google_maps: String,
    pub open_street_maps: String,
}

/// Driving side and international vehicle signs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub signs: Option<Vec<String>>,
    #[serde(default)]
    pub side: String,
}

/// A read-only snapshot of one country from the REST Countries API
///
/// List endpoints are queried with a reduced field projection, so every field
/// outside that projection is optional or defaulted. A missing collection
/// means "unknown", never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub name: CountryName,
    #[serde(default)]
    pub cca2: String,
    /// Three-letter code, the stable identifier for routing and border links
    pub cca3: String,
    pub ccn3: Option<String>,
    pub cioc: Option<String>,
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub region: String,
    pub subregion: Option<String>,
    pub capital: Option<Vec<String>>,
    #[serde(default)]
    pub flags: Flags,
    /// Emoji flag
    pub flag: Option<String>,
    pub currencies: Option<IndexMap<String, Currency>>,
    pub languages: Option<IndexMap<String, String>>,
    pub borders: Option<Vec<String>>,
    pub tld: Option<Vec<String>>,
    pub area: Option<f64>,
    #[serde(default)]
    pub timezones: Vec<String>,
    #[serde(default)]
    pub continents: Vec<String>,
    pub maps: Option<Maps>,
    pub landlocked: Option<bool>,
    pub independent: Option<bool>,
    pub un_member: Option<bool>,
    pub start_of_week: Option<String>,
    pub car: Option<Car>,
}

impl Country {
    /// First listed capital, if any
    pub fn first_capital(&self) -> Option<&str> {
        self.capital
            .as_ref()
            .and_then(|capitals| capitals.first())
            .map(String::as_str)
    }

    /// Common name in the first native language, falling back to the English common name
    pub fn native_name(&self) -> &str {
        self.name
            .native_name
            .as_ref()
            .and_then(|names| names.values().next())
            .map(|native| native.common.as_str())
            .filter(|common| !common.is_empty())
            .unwrap_or(self.name.common.as_str())
    }

    /// Currency names joined with commas, or "N/A"
    pub fn currencies_display(&self) -> String {
        match &self.currencies {
            Some(currencies) if !currencies.is_empty() => currencies
                .values()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            _ => NOT_AVAILABLE.to_string(),
        }
    }

    /// Language names joined with commas, or "N/A"
    pub fn languages_display(&self) -> String {
        match &self.languages {
            Some(languages) if !languages.is_empty() => languages
                .values()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", "),
            _ => NOT_AVAILABLE.to_string(),
        }
    }

    /// Flag alt text, or a generated "Flag of ..." description
    pub fn flag_alt(&self) -> String {
        match &self.flags.alt {
            Some(alt) if !alt.is_empty() => alt.clone(),
            _ => format!("Flag of {}", self.name.common),
        }
    }

    /// Preferred flag image URL (vector first, then raster)
    pub fn flag_url(&self) -> Option<&str> {
        [&self.flags.svg, &self.flags.png]
            .into_iter()
            .find(|url| !url.is_empty())
            .map(String::as_str)
    }

    /// Population with thousands separators
    pub fn formatted_population(&self) -> String {
        format_population(self.population)
    }

    /// Border country codes, empty when unknown
    pub fn border_codes(&self) -> &[String] {
        self.borders.as_deref().unwrap_or(&[])
    }
}

/// Formats a population with en-US thousands separators (e.g. "47,351,567")
pub fn format_population(population: u64) -> String {
    let digits = population.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(ch);
    }

    formatted
}
