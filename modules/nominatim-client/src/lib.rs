pub mod error;

pub use error::{NominatimError, Result};

use serde::Deserialize;
use std::time::Duration;

const MAX_QUERY_CHARS: usize = 200;

/// A resolved place: the first match Nominatim returned for a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub lat: f64,
    pub lng: f64,
    pub display_name: String,
}

#[derive(Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    display_name: String,
}

pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve free text to a coordinate. `Ok(None)` when nothing matched.
    pub async fn search(&self, query: &str) -> Result<Option<Place>> {
        let len = query.chars().count();
        if len > MAX_QUERY_CHARS {
            return Err(NominatimError::QueryTooLong {
                len,
                max: MAX_QUERY_CHARS,
            });
        }

        let endpoint = format!("{}/search", self.base_url);
        let resp = self
            .client
            .get(&endpoint)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(NominatimError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await?;
        let place = parse_first(&body)?;
        tracing::debug!(query, found = place.is_some(), "Place search complete");
        Ok(place)
    }
}

/// Parse a Nominatim JSON result list and keep the first entry.
fn parse_first(body: &str) -> Result<Option<Place>> {
    let results: Vec<NominatimResult> = serde_json::from_str(body)?;
    let Some(first) = results.into_iter().next() else {
        return Ok(None);
    };

    let lat: f64 = first
        .lat
        .parse()
        .map_err(|_| NominatimError::Parse(format!("invalid latitude {:?}", first.lat)))?;
    let lng: f64 = first
        .lon
        .parse()
        .map_err(|_| NominatimError::Parse(format!("invalid longitude {:?}", first.lon)))?;

    Ok(Some(Place {
        lat,
        lng,
        display_name: first.display_name,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_result() {
        let body = r#"[
            {"lat": "45.7578137", "lon": "4.8320114", "display_name": "Lyon, Métropole de Lyon"},
            {"lat": "0", "lon": "0", "display_name": "ignored"}
        ]"#;
        let place = parse_first(body).unwrap().unwrap();
        assert_eq!(place.display_name, "Lyon, Métropole de Lyon");
        assert!((place.lat - 45.7578137).abs() < 1e-9);
        assert!((place.lng - 4.8320114).abs() < 1e-9);
    }

    #[test]
    fn empty_list_is_no_match() {
        assert_eq!(parse_first("[]").unwrap(), None);
    }

    #[test]
    fn bad_coordinate_is_parse_error() {
        let body = r#"[{"lat": "north", "lon": "4.8", "display_name": "x"}]"#;
        assert!(matches!(parse_first(body), Err(NominatimError::Parse(_))));
    }

    #[tokio::test]
    async fn overlong_query_is_rejected_before_network() {
        let client = NominatimClient::new("http://127.0.0.1:9", Duration::from_secs(1), "test").unwrap();
        let query = "a".repeat(201);
        assert!(matches!(
            client.search(&query).await,
            Err(NominatimError::QueryTooLong { len: 201, max: 200 })
        ));
    }
}
