//! Shared fixtures for the mocked-upstream tests.
#![allow(dead_code)]

use rust_aggregator_api::config::Config;
use serde_json::{json, Value};

/// Config with every upstream pointed at one mock server.
pub fn create_test_config(mock_uri: &str) -> Config {
    Config {
        port: 0,
        country_layer_api_key: "cl-test-key".to_string(),
        exchange_rate_api_key: "er-test-key".to_string(),
        news_api_key: "news-test-key".to_string(),
        random_user_base_url: format!("{}/api/", mock_uri),
        country_layer_base_url: format!("{}/v2", mock_uri),
        exchange_rate_base_url: format!("{}/v6", mock_uri),
        news_api_base_url: format!("{}/v2", mock_uri),
        upstream_timeout_ms: 2_000,
        static_dir: "public".to_string(),
    }
}

pub fn random_user_body(nat: &str, country: &str) -> Value {
    json!({
        "results": [{
            "gender": "female",
            "name": {"title": "Mrs", "first": "Louise", "last": "Bertrand"},
            "location": {
                "street": {"number": 4821, "name": "Rue de la Gare"},
                "city": "Lyon",
                "state": "Rhône",
                "country": country,
                "postcode": 69001
            },
            "email": "louise.bertrand@example.com",
            "dob": {"date": "1987-05-14T09:21:35.123Z", "age": 37},
            "picture": {
                "large": "https://randomuser.me/api/portraits/women/12.jpg",
                "thumbnail": "https://randomuser.me/api/portraits/thumb/women/12.jpg"
            },
            "nat": nat
        }],
        "info": {"seed": "abc", "results": 1, "page": 1, "version": "1.4"}
    })
}

pub fn country_body() -> Value {
    json!({
        "name": "France",
        "capital": "Paris",
        "languages": [{"iso639_1": "fr", "name": "French"}],
        "currencies": [{"code": "EUR", "name": "Euro", "symbol": "€"}],
        "flag": "https://flags.example/fr.svg"
    })
}

pub fn rates_body(base: &str) -> Value {
    let mut body = json!({
        "result": "success",
        "base_code": base,
        "conversion_rates": {"USD": 1.0853, "KZT": 520.12, "GBP": 0.8571}
    });
    body["conversion_rates"][base] = json!(1);
    body
}

pub fn articles_body(count: usize, prefix: &str) -> Value {
    let articles: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "source": {"id": null, "name": format!("{} Source {}", prefix, i)},
                "author": "Staff",
                "title": format!("{} headline {}", prefix, i),
                "description": if i % 2 == 0 { Value::Null } else { json!("Body text") },
                "url": format!("https://news.example/{}/{}", prefix, i),
                "urlToImage": if i % 2 == 0 { Value::Null } else { json!("https://img.example/1.jpg") },
                "publishedAt": "2026-10-18T08:00:00Z"
            })
        })
        .collect();

    json!({"status": "ok", "totalResults": count * 10, "articles": articles})
}
