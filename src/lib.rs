//! Aggregation API Library
//!
//! This library fetches a random person, the person's country, that
//! country's exchange rates and its headlines from four third-party APIs,
//! and merges them into one always-renderable record.
//!
//! # Modules
//!
//! - `aggregation`: Staged pipeline over the four upstreams.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers and router.
//! - `models`: Aggregated records and upstream payloads.
//! - `normalize`: Field-level reshaping and reserve values.
//! - `services`: One adapter per upstream.
//! - `upstream_client`: Shared HTTP client.

pub mod aggregation;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod services;
pub mod upstream_client;
