//! Sensor entities and the host interface they are published through.

use std::{collections::BTreeMap, fmt};

use serde::Serialize;

use crate::{
    model::{CellValue, Reading, UnitSystem},
    sensor::SensorKind,
    station::Station,
};

pub const ATTRIBUTION: &str = "Data provided by the Landverk (lv.fo)";
pub const ATTR_ATTRIBUTION: &str = "attribution";
pub const ATTR_DATE: &str = "date";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum EntityState {
    /// Station answered but did not report this value.
    #[default]
    Unknown,
    /// Station could not be fetched this cycle.
    Unavailable,
    Value(CellValue),
}

impl fmt::Display for EntityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityState::Unknown => f.write_str("unknown"),
            EntityState::Unavailable => f.write_str("unavailable"),
            EntityState::Value(value) => value.fmt(f),
        }
    }
}

/// One measured attribute of one station, as seen by the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorEntity {
    pub entity_id: String,
    pub unique_id: String,
    pub name: String,
    pub icon: &'static str,
    pub unit_of_measurement: Option<&'static str>,
    pub device_class: Option<&'static str>,
    pub state: EntityState,
    pub attributes: BTreeMap<String, String>,
    #[serde(skip)]
    pub station: &'static Station,
    #[serde(skip)]
    pub kind: SensorKind,
}

impl SensorEntity {
    pub fn new(station: &'static Station, kind: SensorKind, units: UnitSystem) -> Self {
        let mut attributes = BTreeMap::new();
        attributes.insert(ATTR_ATTRIBUTION.to_string(), ATTRIBUTION.to_string());

        Self {
            entity_id: format!(
                "sensor.{}",
                slugify(&format!(
                    "fo_weather_{}_{}_{}",
                    station.source, station.station_id, kind
                ))
            ),
            unique_id: format!("{},{},{}", station.source, station.unique_id_base(), kind),
            name: format!("{} ({})", kind.name(), station.name),
            icon: kind.icon(),
            unit_of_measurement: kind.unit(units),
            device_class: kind.device_class(),
            state: EntityState::Unknown,
            attributes,
            station,
            kind,
        }
    }

    /// Apply a fresh reading. Returns `false` when the reading lacks this entity's field.
    pub fn apply(&mut self, reading: &Reading, units: UnitSystem) -> bool {
        if let Some(date) = reading.observed_at() {
            self.attributes.insert(ATTR_DATE.to_string(), date);
        }

        match reading.get(self.kind.field()) {
            Some(raw) => {
                self.state = EntityState::Value(self.kind.convert(raw, units));
                true
            }
            None => {
                self.state = EntityState::Unknown;
                false
            }
        }
    }

    pub fn mark_unavailable(&mut self) {
        self.state = EntityState::Unavailable;
    }

    pub fn is_available(&self) -> bool {
        self.state != EntityState::Unavailable
    }
}

/// The host platform's side of the entity contract.
pub trait EntityHost: Send + Sync {
    /// Register entities. Called once, at setup.
    fn add_entities(&self, entities: Vec<SensorEntity>);

    /// Publish the current state of an entity after a poll cycle.
    fn update_entity(&self, entity: &SensorEntity);
}

/// Entity-id slug: lowercase ASCII alphanumerics, everything else collapsed to `_`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    slug
}
