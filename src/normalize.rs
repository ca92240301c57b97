//! Field-level reshaping and reserve values.
//!
//! Each upstream field that may be missing has one function here with an
//! explicit default table, so adapters never inline fallback chains.

use crate::models::{CountryLayerCurrency, CountryLayerLanguage, NewsApiArticle, NewsArticle};
use chrono::DateTime;

/// Generic placeholder for an unknown value.
pub const NOT_AVAILABLE: &str = "N/A";
/// Placeholder for a value lost to an upstream failure.
pub const API_ERROR: &str = "API error";
/// Currency assumed when the country upstream gives none.
pub const DEFAULT_CURRENCY_CODE: &str = "USD";
/// Name used when the currency was assumed rather than reported.
pub const RESERVE_CURRENCY_NAME: &str = "US Dollar (reserve)";
/// Languages placeholder: the free countrylayer plan often omits them.
pub const LANGUAGES_RESTRICTED: &str = "N/A (API Restriction)";
/// Shown in place of a missing article description.
pub const NO_DESCRIPTION: &str = "There is no description.";
/// Fixed second reference currency for the rates card.
pub const SECONDARY_CURRENCY_CODE: &str = "KZT";
/// Upper bound on returned headlines.
pub const MAX_ARTICLES: usize = 5;

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Resolves the currency pair of a country.
///
/// | code    | name    | result                              |
/// |---------|---------|-------------------------------------|
/// | present | present | (code, name)                        |
/// | present | absent  | (code, "N/A")                       |
/// | absent  | present | ("USD", name)                       |
/// | absent  | absent  | ("USD", "US Dollar (reserve)")      |
///
/// A reported `USD` without a name is also labelled as the reserve.
pub fn normalize_currency(code: Option<&str>, name: Option<&str>) -> (String, String) {
    let final_code = present(code).unwrap_or(DEFAULT_CURRENCY_CODE).to_string();
    let final_name = match present(name) {
        Some(name) => name.to_string(),
        None if final_code == DEFAULT_CURRENCY_CODE => RESERVE_CURRENCY_NAME.to_string(),
        None => NOT_AVAILABLE.to_string(),
    };
    (final_code, final_name)
}

/// Takes the first listed currency, if any, and normalizes it.
pub fn primary_currency(currencies: Option<&[CountryLayerCurrency]>) -> (String, String) {
    let first = currencies.and_then(|list| list.first());
    normalize_currency(
        first.and_then(|c| c.code.as_deref()),
        first.and_then(|c| c.name.as_deref()),
    )
}

/// Joins language names with `", "`, or returns the restriction placeholder.
pub fn normalize_languages(languages: Option<&[CountryLayerLanguage]>) -> String {
    let names: Vec<&str> = languages
        .unwrap_or_default()
        .iter()
        .filter_map(|lang| present(lang.name.as_deref()))
        .collect();

    if names.is_empty() {
        LANGUAGES_RESTRICTED.to_string()
    } else {
        names.join(", ")
    }
}

/// Text field that falls back to `"N/A"`.
pub fn text_or_not_available(value: Option<&str>) -> String {
    present(value).unwrap_or(NOT_AVAILABLE).to_string()
}

/// Effective base currency for the rates lookup: blank or `"N/A"` becomes `USD`.
pub fn effective_base_currency(code: &str) -> String {
    match code.trim() {
        "" | NOT_AVAILABLE => DEFAULT_CURRENCY_CODE.to_string(),
        other => other.to_uppercase(),
    }
}

/// Renders one conversion rate, e.g. `1 EUR = 1.0850 USD`.
pub fn describe_rate(base: &str, target: &str, rate: Option<f64>) -> String {
    match rate {
        Some(rate) if rate.is_finite() => format!("1 {} = {:.4} {}", base, rate, target),
        _ => format!("The {} exchange rate is unavailable", target),
    }
}

/// Formats an RFC 3339 timestamp as an `en-US` short date (`M/D/YYYY`).
///
/// Unparseable input is returned unchanged.
pub fn format_date_of_birth(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => date.format("%-m/%-d/%Y").to_string(),
        Err(e) => {
            tracing::warn!("Could not parse date of birth '{}': {}", raw, e);
            raw.to_string()
        }
    }
}

/// `"{number} {street}, {city}"`.
pub fn compose_address(street_number: &str, street_name: &str, city: &str) -> String {
    format!("{} {}, {}", street_number, street_name, city)
}

/// Flattens one upstream article into the page shape.
pub fn normalize_article(article: NewsApiArticle) -> NewsArticle {
    NewsArticle {
        title: article.title.unwrap_or_default(),
        description: present(article.description.as_deref())
            .unwrap_or(NO_DESCRIPTION)
            .to_string(),
        url: article.url.unwrap_or_default(),
        image_url: article.url_to_image.filter(|u| !u.trim().is_empty()),
        source_name: text_or_not_available(
            article.source.as_ref().and_then(|s| s.name.as_deref()),
        ),
    }
}

/// Keeps the first [`MAX_ARTICLES`] articles and reshapes them.
pub fn take_articles(articles: Vec<NewsApiArticle>) -> Vec<NewsArticle> {
    articles
        .into_iter()
        .take(MAX_ARTICLES)
        .map(normalize_article)
        .collect()
}
