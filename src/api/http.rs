//! REST client for the research backend.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::models::{Experience, Factor, Note, Page, Strategy};
use super::{ApiError, ResearchSource};
use crate::filters::{ExperienceFilters, FactorFilters, FilterCodec, NoteFilters, StrategyFilters};
use crate::location::View;

/// Blocking HTTP source issuing `GET {base}/api/v1/{resource}?{filters}`.
pub struct HttpSource {
    base_url: Url,
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        // Url::join replaces the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self { base_url, client })
    }

    /// Full request URL for a list endpoint.
    pub fn request_url(
        &self,
        view: View,
        query: &BTreeMap<String, String>,
    ) -> Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join(&format!("api/v1/{}", view.path()))
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        Ok(url)
    }

    fn fetch<T: DeserializeOwned>(
        &self,
        view: View,
        query: &BTreeMap<String, String>,
    ) -> Result<T, ApiError> {
        let url = self.request_url(view, query)?;
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let message = server_message(&body)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_default();
            warn!(status = status.as_u16(), %message, resource = view.path(), "request failed");
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        response.json().map_err(|e| ApiError::Parse(e.to_string()))
    }
}

/// Extracts a readable message from an error body: `{"detail": ...}`,
/// `{"message": ...}`, or the raw text.
fn server_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "message", "error"] {
            match value.get(key) {
                Some(serde_json::Value::String(s)) => return Some(s.clone()),
                Some(other) if !other.is_null() => return Some(other.to_string()),
                _ => {}
            }
        }
    }
    Some(body.chars().take(200).collect())
}

impl ResearchSource for HttpSource {
    fn name(&self) -> String {
        self.base_url.as_str().trim_end_matches('/').to_string()
    }

    fn list_factors(&mut self, filters: &FactorFilters) -> Result<Page<Factor>, ApiError> {
        self.fetch(View::Factors, &filters.encode())
    }

    fn list_strategies(
        &mut self,
        filters: &StrategyFilters,
    ) -> Result<Page<Strategy>, ApiError> {
        self.fetch(View::Strategies, &filters.encode())
    }

    fn list_experiences(
        &mut self,
        filters: &ExperienceFilters,
    ) -> Result<Page<Experience>, ApiError> {
        self.fetch(View::Experiences, &filters.encode())
    }

    fn list_notes(&mut self, filters: &NoteFilters) -> Result<Page<Note>, ApiError> {
        self.fetch(View::Notes, &filters.encode())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::*;
    use crate::filters::{FactorCategory, QueryString};

    /// Serves exactly one request with a canned response and returns the
    /// request line it received.
    fn serve_once(status: &str, body: &str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }
            stream.write_all(response.as_bytes()).unwrap();
            request_line
        });
        (format!("http://{addr}"), handle)
    }

    #[test]
    fn request_url_joins_resource_and_encodes_filters() {
        let source = HttpSource::new("http://research.local/quant", Duration::from_secs(1)).unwrap();
        let filters = FactorFilters {
            search: Some("low vol".into()),
            category: Some(FactorCategory::Volatility),
            ..FactorFilters::default()
        };
        let url = source.request_url(View::Factors, &filters.encode()).unwrap();
        assert_eq!(url.path(), "/quant/api/v1/factors");
        let query = QueryString::parse(url.query().unwrap_or(""));
        assert_eq!(FactorFilters::decode(&query), filters);
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(matches!(
            HttpSource::new("not a url", Duration::from_secs(1)),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn decodes_successful_page() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"items":[],"total":0,"page":2,"page_size":50}"#,
        );
        let mut source = HttpSource::new(&base, Duration::from_secs(5)).unwrap();
        let filters = FactorFilters {
            page: 2,
            page_size: 50,
            ..FactorFilters::default()
        };
        let page = source.list_factors(&filters).unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.page_size, 50);

        let request_line = server.join().unwrap();
        assert!(request_line.starts_with("GET /api/v1/factors?"));
        assert!(request_line.contains("page=2"));
    }

    #[test]
    fn maps_error_status_to_server_error() {
        let (base, server) = serve_once("503 Service Unavailable", r#"{"detail":"db down"}"#);
        let mut source = HttpSource::new(&base, Duration::from_secs(5)).unwrap();
        let err = source.list_notes(&NoteFilters::default()).unwrap_err();
        assert_eq!(
            err,
            ApiError::Server {
                status: 503,
                message: "db down".into()
            }
        );
        server.join().unwrap();
    }

    #[test]
    fn maps_bad_body_to_parse_error() {
        let (base, server) = serve_once("200 OK", r#"{"items": "nope"}"#);
        let mut source = HttpSource::new(&base, Duration::from_secs(5)).unwrap();
        let err = source.list_strategies(&StrategyFilters::default()).unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
        server.join().unwrap();
    }

    #[test]
    fn server_message_prefers_detail() {
        assert_eq!(server_message(r#"{"detail":"x"}"#).as_deref(), Some("x"));
        assert_eq!(server_message(r#"{"message":"y"}"#).as_deref(), Some("y"));
        assert_eq!(server_message("plain text").as_deref(), Some("plain text"));
        assert_eq!(server_message("  "), None);
    }
}
