use crate::config::Config;
use crate::errors::AppError;
use crate::models::*;
use crate::normalize::{self, API_ERROR, NOT_AVAILABLE, SECONDARY_CURRENCY_CODE};
use crate::upstream_client::UpstreamClient;

const IDENTITY_UPSTREAM: &str = "Random User API";
const GEOGRAPHY_UPSTREAM: &str = "Countrylayer API";
const CURRENCY_UPSTREAM: &str = "ExchangeRate API";
const NEWS_UPSTREAM: &str = "News API";

fn require_credential<'a>(name: &str, value: &'a str) -> Result<&'a str, AppError> {
    if value.trim().is_empty() {
        return Err(AppError::MissingCredential(name.to_string()));
    }
    Ok(value)
}

// ============ Identity ============

/// Random person generator. Any failure here is fatal for the request.
pub struct IdentityService {
    client: UpstreamClient,
    base_url: String,
}

impl IdentityService {
    pub fn new(config: &Config, client: UpstreamClient) -> Self {
        Self {
            client,
            base_url: config.random_user_base_url.clone(),
        }
    }

    /// Fetches one random person and reshapes it.
    pub async fn fetch_person(&self) -> Result<ResolvedIdentity, AppError> {
        let url = UpstreamClient::endpoint(&self.base_url, &[], &[])?;
        tracing::info!("Fetching random person from {}", IDENTITY_UPSTREAM);

        let payload: RandomUserResponse = self.client.get_json(IDENTITY_UPSTREAM, url, &[]).await?;
        let identity = parse_random_user(payload)?;

        tracing::info!(
            "Identity resolved: nationality {}, country {}",
            identity.nationality_code,
            identity.profile.country_name
        );
        Ok(identity)
    }
}

/// Pure reshape of a random-user payload.
pub fn parse_random_user(payload: RandomUserResponse) -> Result<ResolvedIdentity, AppError> {
    if let Some(error) = payload.error {
        return Err(AppError::MalformedPayload(format!(
            "{} reported an error: {}",
            IDENTITY_UPSTREAM, error
        )));
    }

    let user = payload.results.into_iter().next().ok_or_else(|| {
        AppError::MalformedPayload(format!("{} returned no results", IDENTITY_UPSTREAM))
    })?;

    let nationality_code = user
        .nat
        .map(|nat| nat.trim().to_uppercase())
        .filter(|nat| !nat.is_empty())
        .ok_or_else(|| {
            AppError::MalformedPayload(format!(
                "{} result has no nationality code",
                IDENTITY_UPSTREAM
            ))
        })?;

    let full_address = normalize::compose_address(
        &user.location.street.number.to_string(),
        &user.location.street.name,
        &user.location.city,
    );

    let profile = PersonProfile {
        first_name: user.name.first,
        last_name: user.name.last,
        gender: user.gender,
        picture_url: user.picture.large,
        age: user.dob.age,
        date_of_birth: normalize::format_date_of_birth(&user.dob.date),
        city: user.location.city,
        country_name: user.location.country,
        full_address,
        nationality_code: nationality_code.clone(),
    };

    Ok(ResolvedIdentity {
        profile,
        nationality_code,
    })
}

// ============ Geography ============

/// Country metadata lookup. Never fails; degrades to [`CountryProfile::unavailable`].
pub struct GeographyService {
    client: UpstreamClient,
    base_url: String,
    api_key: String,
}

impl CountryProfile {
    /// Sentinel record used whenever the country lookup fails.
    pub fn unavailable() -> Self {
        Self {
            name: NOT_AVAILABLE.to_string(),
            capital: API_ERROR.to_string(),
            languages: API_ERROR.to_string(),
            currency_name: NOT_AVAILABLE.to_string(),
            currency_code: normalize::DEFAULT_CURRENCY_CODE.to_string(),
            flag_url: String::new(),
        }
    }
}

impl GeographyService {
    pub fn new(config: &Config, client: UpstreamClient) -> Self {
        Self {
            client,
            base_url: config.country_layer_base_url.clone(),
            api_key: config.country_layer_api_key.clone(),
        }
    }

    /// Looks up a country by its two-letter code.
    pub async fn fetch_country(&self, country_code: &str) -> CountryProfile {
        match self.try_fetch_country(country_code).await {
            Ok(country) => country,
            Err(e) => {
                tracing::error!(
                    "{} couldn't find the country by code {}: {}",
                    GEOGRAPHY_UPSTREAM,
                    country_code,
                    e
                );
                CountryProfile::unavailable()
            }
        }
    }

    async fn try_fetch_country(&self, country_code: &str) -> Result<CountryProfile, AppError> {
        let api_key = require_credential("COUNTRY_LAYER_API_KEY", &self.api_key)?;
        let url = UpstreamClient::endpoint(
            &self.base_url,
            &["alpha", country_code],
            &[("access_key", api_key)],
        )?;
        tracing::info!("Fetching country {} from {}", country_code, GEOGRAPHY_UPSTREAM);

        let payload: CountryLayerPayload =
            self.client.get_json(GEOGRAPHY_UPSTREAM, url, &[]).await?;
        parse_country(payload, country_code)
    }
}

/// Pure reshape of a countrylayer payload, applying the reserve tables.
pub fn parse_country(
    payload: CountryLayerPayload,
    country_code: &str,
) -> Result<CountryProfile, AppError> {
    let country = payload
        .into_first()
        .filter(|c| !c.signals_not_found())
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "The country code was not found: {}",
                country_code
            ))
        })?;

    let (currency_code, currency_name) =
        normalize::primary_currency(country.currencies.as_deref());

    Ok(CountryProfile {
        name: normalize::text_or_not_available(country.name.as_deref()),
        capital: normalize::text_or_not_available(country.capital.as_deref()),
        languages: normalize::normalize_languages(country.languages.as_deref()),
        currency_name,
        currency_code,
        flag_url: country.flag.unwrap_or_default(),
    })
}

// ============ Currency ============

/// Exchange rates lookup. Never fails; degrades to "API error" descriptions.
pub struct CurrencyService {
    client: UpstreamClient,
    base_url: String,
    api_key: String,
}

impl ExchangeRateSummary {
    /// Sentinel summary used whenever the rates lookup fails.
    pub fn api_error(base: &str) -> Self {
        Self {
            base_currency_code: base.to_string(),
            to_usd_description: API_ERROR.to_string(),
            to_kzt_description: API_ERROR.to_string(),
        }
    }
}

impl CurrencyService {
    pub fn new(config: &Config, client: UpstreamClient) -> Self {
        Self {
            client,
            base_url: config.exchange_rate_base_url.clone(),
            api_key: config.exchange_rate_api_key.clone(),
        }
    }

    /// Describes the USD and KZT rates of `currency_code` (`"N/A"` means USD).
    pub async fn fetch_rates(&self, currency_code: &str) -> ExchangeRateSummary {
        let base = normalize::effective_base_currency(currency_code);

        match self.try_fetch_rates(&base).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!(
                    "{} could not get the exchange rates for {}: {}",
                    CURRENCY_UPSTREAM,
                    base,
                    e
                );
                ExchangeRateSummary::api_error(&base)
            }
        }
    }

    async fn try_fetch_rates(&self, base: &str) -> Result<ExchangeRateSummary, AppError> {
        let api_key = require_credential("EXCHANGE_RATE_API_KEY", &self.api_key)?;
        let url = UpstreamClient::endpoint(&self.base_url, &[api_key, "latest", base], &[])?;
        tracing::info!("Fetching {} exchange rates from {}", base, CURRENCY_UPSTREAM);

        let payload: ExchangeRateResponse =
            self.client.get_json(CURRENCY_UPSTREAM, url, &[]).await?;
        summarize_rates(payload, base)
    }
}

/// Pure reshape of an exchange-rate payload into descriptions.
pub fn summarize_rates(
    payload: ExchangeRateResponse,
    base: &str,
) -> Result<ExchangeRateSummary, AppError> {
    if payload.result.as_deref() == Some("error") {
        return Err(AppError::MalformedPayload(format!(
            "{} reported an error: {}",
            CURRENCY_UPSTREAM,
            payload.error_type.as_deref().unwrap_or("unknown")
        )));
    }

    let rates = payload.conversion_rates.ok_or_else(|| {
        AppError::MalformedPayload(format!(
            "{} response has no conversion_rates",
            CURRENCY_UPSTREAM
        ))
    })?;

    Ok(ExchangeRateSummary {
        base_currency_code: base.to_string(),
        to_usd_description: normalize::describe_rate(
            base,
            normalize::DEFAULT_CURRENCY_CODE,
            rates.get(normalize::DEFAULT_CURRENCY_CODE).copied(),
        ),
        to_kzt_description: normalize::describe_rate(
            base,
            SECONDARY_CURRENCY_CODE,
            rates.get(SECONDARY_CURRENCY_CODE).copied(),
        ),
    })
}

// ============ News ============

/// Headlines lookup with a name-based fallback search.
///
/// 1. Top headlines for the country code.
/// 2. If that produced nothing (empty or failed), free-text search by
///    country name, newest first.
///
/// Never fails; the worst case is an empty list.
pub struct NewsService {
    client: UpstreamClient,
    base_url: String,
    api_key: String,
}

impl NewsService {
    pub fn new(config: &Config, client: UpstreamClient) -> Self {
        Self {
            client,
            base_url: config.news_api_base_url.clone(),
            api_key: config.news_api_key.clone(),
        }
    }

    /// Returns at most five articles for the country.
    ///
    /// # Arguments
    ///
    /// * `country_code` - Lowercase two-letter code for the headlines query.
    /// * `country_name` - Display name for the fallback search.
    pub async fn fetch_news(&self, country_code: &str, country_name: &str) -> Vec<NewsArticle> {
        let api_key = match require_credential("NEWS_API_KEY", &self.api_key) {
            Ok(key) => key,
            Err(e) => {
                tracing::error!("{} skipped: {}", NEWS_UPSTREAM, e);
                return Vec::new();
            }
        };

        let mut articles = match self.top_headlines(country_code, api_key).await {
            Ok(articles) => articles,
            Err(e) => {
                tracing::error!(
                    "{} - Top Headlines ({}) couldn't get the data: {}",
                    NEWS_UPSTREAM,
                    country_code,
                    e
                );
                Vec::new()
            }
        };

        if articles.is_empty() {
            tracing::warn!(
                "{}: no top news for {}. Searching by name: {}",
                NEWS_UPSTREAM,
                country_code,
                country_name
            );
            articles = match self.search_by_name(country_name, api_key).await {
                Ok(articles) => articles,
                Err(e) => {
                    tracing::error!(
                        "{} - Everything ({}) couldn't get the data: {}",
                        NEWS_UPSTREAM,
                        country_name,
                        e
                    );
                    Vec::new()
                }
            };
        }

        tracing::info!("{}: returning {} articles", NEWS_UPSTREAM, articles.len());
        normalize::take_articles(articles)
    }

    async fn top_headlines(
        &self,
        country_code: &str,
        api_key: &str,
    ) -> Result<Vec<NewsApiArticle>, AppError> {
        let page_size = normalize::MAX_ARTICLES.to_string();
        let url = UpstreamClient::endpoint(
            &self.base_url,
            &["top-headlines"],
            &[("country", country_code), ("pageSize", page_size.as_str())],
        )?;
        self.fetch_articles(url, api_key).await
    }

    async fn search_by_name(
        &self,
        country_name: &str,
        api_key: &str,
    ) -> Result<Vec<NewsApiArticle>, AppError> {
        let page_size = normalize::MAX_ARTICLES.to_string();
        let url = UpstreamClient::endpoint(
            &self.base_url,
            &["everything"],
            &[
                ("q", country_name),
                ("pageSize", page_size.as_str()),
                ("sortBy", "publishedAt"),
            ],
        )?;
        self.fetch_articles(url, api_key).await
    }

    async fn fetch_articles(
        &self,
        url: url::Url,
        api_key: &str,
    ) -> Result<Vec<NewsApiArticle>, AppError> {
        let payload: NewsApiResponse = self
            .client
            .get_json(NEWS_UPSTREAM, url, &[("X-Api-Key", api_key)])
            .await?;
        extract_articles(payload)
    }
}

/// Article list of a news payload; an error envelope or a missing list fails.
pub fn extract_articles(payload: NewsApiResponse) -> Result<Vec<NewsApiArticle>, AppError> {
    if payload.status.as_deref() == Some("error") {
        return Err(AppError::MalformedPayload(format!(
            "{} reported {}: {}",
            NEWS_UPSTREAM,
            payload.code.as_deref().unwrap_or("an error"),
            payload.message.as_deref().unwrap_or("no message")
        )));
    }

    payload.articles.ok_or_else(|| {
        AppError::MalformedPayload(format!("{} response has no articles", NEWS_UPSTREAM))
    })
}
