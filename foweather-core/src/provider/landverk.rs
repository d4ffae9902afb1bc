use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use reqwest::Client;
use tracing::{debug, instrument};

use crate::{
    error::FetchError,
    model::Reading,
    provider::{StationSource, spreadsheet},
    station::Station,
};

pub const DEFAULT_BASE_URL: &str = "https://lv.fo";
const EXPORT_PATH: &str = "/fr/excel.php";

/// Fetches the daily spreadsheet export of a station from lv.fo.
#[derive(Debug, Clone)]
pub struct LandverkSource {
    base_url: String,
    http: Client,
}

impl LandverkSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .user_agent(concat!("foweather/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn export_url(&self) -> String {
        format!("{}{EXPORT_PATH}", self.base_url)
    }
}

#[async_trait]
impl StationSource for LandverkSource {
    #[instrument(skip(self, station), fields(station = station.key))]
    async fn fetch(&self, station: &Station, date: NaiveDate) -> Result<Reading, FetchError> {
        let res = self
            .http
            .get(self.export_url())
            .query(&[
                ("station", station.station_id.to_string()),
                ("year", date.year().to_string()),
                ("month", date.month().to_string()),
                ("day", date.day().to_string()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        debug!(bytes = body.len(), "received station export");
        spreadsheet::parse_reading(&body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((end, _)) => format!("{}...", &body[..end]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_url_ignores_trailing_slash() {
        let source = LandverkSource::new("http://localhost:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(source.export_url(), "http://localhost:8080/fr/excel.php");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "ø".repeat(250);
        let truncated = truncate_body(&long);

        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
