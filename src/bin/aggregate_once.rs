//! Runs the aggregation pipeline once and prints the result.
//!
//! Handy for checking API credentials without starting the server.
use anyhow::Result;
use rust_aggregator_api::aggregation::AggregationPipeline;
use rust_aggregator_api::config::Config;
use rust_aggregator_api::upstream_client::UpstreamClient;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_aggregator_api=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let client = UpstreamClient::new(config.upstream_timeout())?;

    let result = AggregationPipeline::new(&config, client).run().await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
