use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use utoipa::ToSchema;

// ============ Aggregated Records ============

/// Person produced by the identity upstream, reshaped for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonProfile {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    /// Large portrait URL.
    #[serde(rename = "picture")]
    pub picture_url: String,
    pub age: u32,
    /// Birth date rendered as `M/D/YYYY`.
    pub date_of_birth: String,
    pub city: String,
    #[serde(rename = "country")]
    pub country_name: String,
    /// `"{street number} {street name}, {city}"`.
    pub full_address: String,
    /// Two-letter nationality code as returned upstream (e.g. `FR`).
    #[serde(rename = "nat")]
    pub nationality_code: String,
}

/// Country metadata. Every field is always populated, with sentinels on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountryProfile {
    pub name: String,
    pub capital: String,
    pub languages: String,
    pub currency_name: String,
    pub currency_code: String,
    pub flag_url: String,
}

/// Human-readable exchange rates relative to a base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExchangeRateSummary {
    #[serde(rename = "base")]
    pub base_currency_code: String,
    #[serde(rename = "toUSD")]
    pub to_usd_description: String,
    #[serde(rename = "toKZT")]
    pub to_kzt_description: String,
}

/// One headline, flattened for the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: String,
    pub description: String,
    pub url: String,
    pub image_url: Option<String>,
    #[serde(rename = "source")]
    pub source_name: String,
}

/// Composite response of `GET /api/data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AggregatedResult {
    #[serde(rename = "user")]
    pub profile: PersonProfile,
    pub country: CountryProfile,
    pub rates: ExchangeRateSummary,
    /// At most five articles.
    pub news: Vec<NewsArticle>,
}

/// Identity stage output: the profile plus the lookup key for later stages.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedIdentity {
    pub profile: PersonProfile,
    pub nationality_code: String,
}

// ============ Random User API Models ============

#[derive(Debug, Clone, Deserialize)]
pub struct RandomUserResponse {
    #[serde(default)]
    pub results: Vec<RandomUser>,
    /// Set instead of `results` when the generator is overloaded.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RandomUser {
    pub gender: String,
    pub name: RandomUserName,
    pub location: RandomUserLocation,
    pub dob: RandomUserDob,
    pub picture: RandomUserPicture,
    pub nat: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RandomUserName {
    pub first: String,
    pub last: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RandomUserLocation {
    pub street: RandomUserStreet,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RandomUserStreet {
    pub number: StreetNumber,
    pub name: String,
}

/// Street numbers arrive as integers, but some nationalities use strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StreetNumber {
    Number(i64),
    Text(String),
}

impl fmt::Display for StreetNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreetNumber::Number(n) => write!(f, "{}", n),
            StreetNumber::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RandomUserDob {
    pub date: String,
    pub age: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RandomUserPicture {
    pub large: String,
}

// ============ Countrylayer API Models ============

/// Countrylayer answers `/alpha/{code}` with either an object or a one-element array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CountryLayerPayload {
    Many(Vec<CountryLayerCountry>),
    Single(Box<CountryLayerCountry>),
}

impl CountryLayerPayload {
    pub fn into_first(self) -> Option<CountryLayerCountry> {
        match self {
            CountryLayerPayload::Single(country) => Some(*country),
            CountryLayerPayload::Many(countries) => countries.into_iter().next(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountryLayerCountry {
    pub name: Option<String>,
    pub capital: Option<String>,
    pub languages: Option<Vec<CountryLayerLanguage>>,
    pub currencies: Option<Vec<CountryLayerCurrency>>,
    pub flag: Option<String>,
    // In-band failure markers
    pub status: Option<u16>,
    pub message: Option<String>,
    pub success: Option<bool>,
    pub error: Option<serde_json::Value>,
}

impl CountryLayerCountry {
    /// True when the payload is an error envelope rather than a country.
    pub fn signals_not_found(&self) -> bool {
        self.status == Some(404)
            || self.message.is_some()
            || self.success == Some(false)
            || self.error.is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountryLayerLanguage {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountryLayerCurrency {
    pub code: Option<String>,
    pub name: Option<String>,
}

// ============ ExchangeRate API Models ============

#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeRateResponse {
    pub result: Option<String>,
    #[serde(rename = "error-type")]
    pub error_type: Option<String>,
    pub conversion_rates: Option<HashMap<String, f64>>,
}

// ============ News API Models ============

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsApiResponse {
    pub status: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
    pub total_results: Option<u64>,
    pub articles: Option<Vec<NewsApiArticle>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsApiArticle {
    pub source: Option<NewsApiSource>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub url_to_image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsApiSource {
    pub name: Option<String>,
}
