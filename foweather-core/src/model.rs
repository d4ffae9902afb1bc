use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upstream column carrying the observation time.
pub const TIME_FIELD: &str = "time";

/// A single spreadsheet cell value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// One snapshot of a station's measurements, keyed by upstream column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reading {
    pub values: BTreeMap<String, CellValue>,
}

impl Reading {
    pub fn get(&self, field: &str) -> Option<&CellValue> {
        self.values.get(field)
    }

    /// Observation time as reported by the station, if any.
    pub fn observed_at(&self) -> Option<String> {
        self.get(TIME_FIELD).map(ToString::to_string)
    }
}

impl FromIterator<(String, CellValue)> for Reading {
    fn from_iter<T: IntoIterator<Item = (String, CellValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[UnitSystem::Metric, UnitSystem::Imperial]
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(ConfigError::InvalidUnitSystem(value.to_string())),
        }
    }
}

impl TryFrom<String> for UnitSystem {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observed_at_reads_time_column() {
        let reading: Reading = [
            ("time".to_string(), CellValue::Text("12:40".into())),
            ("temp2".to_string(), CellValue::Number(7.5)),
        ]
        .into_iter()
        .collect();

        assert_eq!(reading.observed_at().as_deref(), Some("12:40"));
        assert_eq!(reading.get("temp2").and_then(CellValue::as_number), Some(7.5));
        assert_eq!(Reading::default().observed_at(), None);
    }

    #[test]
    fn unit_system_parses_case_insensitively() {
        assert_eq!("Imperial".parse::<UnitSystem>(), Ok(UnitSystem::Imperial));
        assert_eq!(
            "kelvin".parse::<UnitSystem>(),
            Err(ConfigError::InvalidUnitSystem("kelvin".into()))
        );
    }
}
