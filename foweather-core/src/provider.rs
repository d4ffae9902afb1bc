use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt::Debug;

use crate::{error::FetchError, model::Reading, station::Station};

pub mod landverk;
pub mod spreadsheet;

pub use landverk::LandverkSource;

/// Where station readings come from.
#[async_trait]
pub trait StationSource: Send + Sync + Debug {
    /// Fetch the current reading of `station` from the export for `date`.
    async fn fetch(&self, station: &Station, date: NaiveDate) -> Result<Reading, FetchError>;
}
