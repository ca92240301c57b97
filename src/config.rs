use serde::Deserialize;
use std::time::Duration;

/// Process-wide settings, read once at startup and shared by reference.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub country_layer_api_key: String,
    pub exchange_rate_api_key: String,
    pub news_api_key: String,
    pub random_user_base_url: String,
    pub country_layer_base_url: String,
    pub exchange_rate_base_url: String,
    pub news_api_base_url: String,
    pub upstream_timeout_ms: u64,
    pub static_dir: String,
}

const DEFAULT_RANDOM_USER_BASE_URL: &str = "https://randomuser.me/api/";
const DEFAULT_COUNTRY_LAYER_BASE_URL: &str = "https://api.countrylayer.com/v2";
const DEFAULT_EXCHANGE_RATE_BASE_URL: &str = "https://v6.exchangerate-api.com/v6";
const DEFAULT_NEWS_API_BASE_URL: &str = "https://newsapi.org/v2";
const DEFAULT_UPSTREAM_TIMEOUT_MS: u64 = 10_000;

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;

        // Log successful configuration load (without secrets)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Random user base URL: {}", config.random_user_base_url);
        tracing::debug!("Countrylayer base URL: {}", config.country_layer_base_url);
        tracing::debug!("ExchangeRate base URL: {}", config.exchange_rate_base_url);
        tracing::debug!("News API base URL: {}", config.news_api_base_url);
        tracing::debug!("Upstream timeout: {}ms", config.upstream_timeout_ms);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// `from_env` delegates here; tests pass a map-backed closure instead of
    /// mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = |name: &str| -> anyhow::Result<String> {
            let value = lookup(name)
                .ok_or_else(|| anyhow::anyhow!("{} environment variable required", name))?;
            if value.trim().is_empty() {
                anyhow::bail!("{} cannot be empty", name);
            }
            Ok(value)
        };

        let base_url = |name: &str, default: &str| -> anyhow::Result<String> {
            let url = lookup(name)
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| default.to_string());
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{} must start with http:// or https://", name);
            }
            Ok(url)
        };

        Ok(Self {
            port: lookup("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            country_layer_api_key: secret("COUNTRY_LAYER_API_KEY")?,
            exchange_rate_api_key: secret("EXCHANGE_RATE_API_KEY")?,
            news_api_key: secret("NEWS_API_KEY")?,
            random_user_base_url: base_url("RANDOM_USER_BASE_URL", DEFAULT_RANDOM_USER_BASE_URL)?,
            country_layer_base_url: base_url(
                "COUNTRY_LAYER_BASE_URL",
                DEFAULT_COUNTRY_LAYER_BASE_URL,
            )?,
            exchange_rate_base_url: base_url(
                "EXCHANGE_RATE_BASE_URL",
                DEFAULT_EXCHANGE_RATE_BASE_URL,
            )?,
            news_api_base_url: base_url("NEWS_API_BASE_URL", DEFAULT_NEWS_API_BASE_URL)?,
            upstream_timeout_ms: lookup("UPSTREAM_TIMEOUT_MS")
                .map(|raw| raw.parse::<u64>())
                .transpose()
                .map_err(|_| anyhow::anyhow!("UPSTREAM_TIMEOUT_MS must be a whole number"))?
                .map(|ms| {
                    if ms == 0 {
                        anyhow::bail!("UPSTREAM_TIMEOUT_MS must be greater than zero");
                    }
                    Ok(ms)
                })
                .transpose()?
                .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_MS),
            static_dir: lookup("STATIC_DIR")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "public".to_string()),
        })
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }
}
