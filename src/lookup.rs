use crate::error::LookupFailure;
use crate::models::VolumeHit;
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/books/v1/volumes";
const HTTP_TIMEOUT_SECS: u64 = 10;
const HTTP_USER_AGENT: &str = "Quarto/0.1";

/// Outcome of one metadata search. A failed call yields an empty hit
/// list and a classified failure; `search` never returns `Err`.
#[derive(Debug)]
pub struct SearchOutcome {
    pub hits: Vec<VolumeHit>,
    pub failure: Option<LookupFailure>,
}

/// Client for the Google Books volumes search endpoint.
pub struct SearchClient {
    endpoint: String,
    api_key: Option<String>,
}

impl SearchClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT, api_key)
    }

    /// Point the client at a different endpoint. Used by tests to
    /// target a local stub server.
    pub fn with_endpoint(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        SearchClient {
            endpoint: endpoint.into(),
            api_key,
        }
    }

    pub fn search(&self, query: &str) -> SearchOutcome {
        match self.fetch(query) {
            Ok(hits) => SearchOutcome {
                hits,
                failure: None,
            },
            Err(failure) => {
                log::warn!("book search failed query=\"{}\" failure={}", query, failure);
                SearchOutcome {
                    hits: vec![],
                    failure: Some(failure),
                }
            }
        }
    }

    fn fetch(&self, query: &str) -> Result<Vec<VolumeHit>, LookupFailure> {
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|err| LookupFailure::Other(err.to_string()))?;

        let url = self.build_url(query);
        let response = client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::USER_AGENT, HTTP_USER_AGENT)
            .send()
            .map_err(classify_transport_error)?;

        let status = response.status();
        match status.as_u16() {
            200 => {}
            403 => return Err(LookupFailure::Forbidden),
            429 => return Err(LookupFailure::RateLimited),
            code => return Err(LookupFailure::Unexpected(code)),
        }

        let data: Value = response
            .json()
            .map_err(|err| LookupFailure::Other(err.to_string()))?;
        Ok(parse_items(&data))
    }

    fn build_url(&self, query: &str) -> String {
        let mut url = format!("{}?q={}", self.endpoint, urlencoding::encode(query));
        if let Some(key) = &self.api_key {
            url.push_str(&format!("&key={}", urlencoding::encode(key)));
        }
        url
    }
}

fn classify_transport_error(err: reqwest::Error) -> LookupFailure {
    if err.is_timeout() {
        LookupFailure::Timeout
    } else if err.is_connect() {
        LookupFailure::Connection
    } else {
        LookupFailure::Other(err.to_string())
    }
}

fn parse_items(data: &Value) -> Vec<VolumeHit> {
    let items = data
        .get("items")
        .and_then(|value| value.as_array())
        .cloned()
        .unwrap_or_default();

    items
        .iter()
        .map(|item| {
            let info = item.get("volumeInfo").cloned().unwrap_or(Value::Null);
            let title = info
                .get("title")
                .and_then(|value| value.as_str())
                .unwrap_or("Unknown")
                .to_string();
            let authors = info
                .get("authors")
                .and_then(|value| value.as_array())
                .map(|values| {
                    values
                        .iter()
                        .filter_map(|v| v.as_str().map(|s| s.to_string()))
                        .collect::<Vec<String>>()
                })
                .filter(|values| !values.is_empty())
                .unwrap_or_else(|| vec!["Unknown".to_string()]);
            let info_link = info
                .get("infoLink")
                .and_then(|value| value.as_str())
                .unwrap_or("#")
                .to_string();
            let thumbnail = info
                .get("imageLinks")
                .and_then(|value| value.get("thumbnail").or_else(|| value.get("smallThumbnail")))
                .and_then(|value| value.as_str())
                .map(|value| value.replace("http://", "https://"));
            let description = info
                .get("description")
                .and_then(|value| value.as_str())
                .map(|value| value.to_string());

            VolumeHit {
                title,
                authors,
                info_link,
                thumbnail,
                description,
            }
        })
        .collect()
}
