//! Staged aggregation pipeline.
//!
//! The four upstreams run strictly in sequence, each stage feeding the next:
//!
//! | state             | runs      | on failure                |
//! |-------------------|-----------|---------------------------|
//! | `Start`           | identity  | abort (fatal)             |
//! | `ProfileResolved` | geography | sentinel country record   |
//! | `CountryResolved` | currency  | "API error" descriptions  |
//! | `RatesResolved`   | news      | empty article list        |
//! | `Done`            | -         | -                         |
//!
//! Only the identity stage can end the pipeline early; the other stages
//! absorb their failures inside the adapters.
use crate::config::Config;
use crate::errors::{AppError, ResultExt};
use crate::models::{AggregatedResult, CountryProfile, ExchangeRateSummary, ResolvedIdentity};
use crate::services::{CurrencyService, GeographyService, IdentityService, NewsService};
use crate::upstream_client::UpstreamClient;

/// Pipeline position plus everything produced so far.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineState {
    Start,
    ProfileResolved {
        identity: ResolvedIdentity,
    },
    CountryResolved {
        identity: ResolvedIdentity,
        country: CountryProfile,
    },
    RatesResolved {
        identity: ResolvedIdentity,
        country: CountryProfile,
        rates: ExchangeRateSummary,
    },
    Done(AggregatedResult),
}

impl PipelineState {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineState::Start => "start",
            PipelineState::ProfileResolved { .. } => "profile_resolved",
            PipelineState::CountryResolved { .. } => "country_resolved",
            PipelineState::RatesResolved { .. } => "rates_resolved",
            PipelineState::Done(_) => "done",
        }
    }
}

/// One pipeline instance per inbound request; nothing is shared between runs
/// except the HTTP connection pool inside [`UpstreamClient`].
pub struct AggregationPipeline {
    identity: IdentityService,
    geography: GeographyService,
    currency: CurrencyService,
    news: NewsService,
}

impl AggregationPipeline {
    pub fn new(config: &Config, client: UpstreamClient) -> Self {
        Self {
            identity: IdentityService::new(config, client.clone()),
            geography: GeographyService::new(config, client.clone()),
            currency: CurrencyService::new(config, client.clone()),
            news: NewsService::new(config, client),
        }
    }

    /// Runs every stage and returns the composite record.
    ///
    /// # Returns
    ///
    /// * `Result<AggregatedResult, AppError>` - The record, or the identity stage's fatal error.
    pub async fn run(&self) -> Result<AggregatedResult, AppError> {
        let mut state = PipelineState::Start;

        loop {
            if let PipelineState::Done(result) = state {
                return Ok(result);
            }
            state = self.advance(state).await?;
        }
    }

    /// Executes the stage for `state` and returns the next state.
    pub async fn advance(&self, state: PipelineState) -> Result<PipelineState, AppError> {
        tracing::debug!("Aggregation stage: {}", state.name());

        let next = match state {
            PipelineState::Start => {
                let identity = self
                    .identity
                    .fetch_person()
                    .await
                    .context("Couldn't get data from the identity API")?;
                PipelineState::ProfileResolved { identity }
            }
            PipelineState::ProfileResolved { identity } => {
                let country = self
                    .geography
                    .fetch_country(&identity.nationality_code)
                    .await;
                PipelineState::CountryResolved { identity, country }
            }
            PipelineState::CountryResolved { identity, country } => {
                let rates = self.currency.fetch_rates(&country.currency_code).await;
                PipelineState::RatesResolved {
                    identity,
                    country,
                    rates,
                }
            }
            PipelineState::RatesResolved {
                identity,
                country,
                rates,
            } => {
                let news = self
                    .news
                    .fetch_news(
                        &identity.nationality_code.to_lowercase(),
                        &identity.profile.country_name,
                    )
                    .await;
                PipelineState::Done(AggregatedResult {
                    profile: identity.profile,
                    country,
                    rates,
                    news,
                })
            }
            done @ PipelineState::Done(_) => done,
        };

        Ok(next)
    }
}
