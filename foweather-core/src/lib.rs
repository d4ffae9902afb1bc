//! Core library for the `foweather` integration.
//!
//! This crate defines:
//! - The catalog of Landsverk (lv.fo) weather stations
//! - Configuration handling
//! - The lv.fo spreadsheet client behind the `StationSource` abstraction
//! - Sensor entities and the `EntityHost` they are published to
//! - The poll routine tying it all together
//!
//! It is used by `foweather-cli`, but any host that implements `EntityHost` can drive it.

pub mod config;
pub mod entity;
pub mod error;
pub mod integration;
pub mod model;
pub mod provider;
pub mod sensor;
pub mod station;

pub use config::Config;
pub use entity::{EntityHost, EntityState, SensorEntity};
pub use error::{ConfigError, FetchError, SetupError};
pub use integration::{Integration, PollSummary};
pub use model::{CellValue, Reading, UnitSystem};
pub use provider::{LandverkSource, StationSource};
pub use sensor::SensorKind;
pub use station::Station;
