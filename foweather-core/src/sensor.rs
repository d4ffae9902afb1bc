//! Mapping from lv.fo spreadsheet columns to sensor descriptions.

use crate::model::{CellValue, UnitSystem};

/// The sensors registered for every station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Temperature,
    Pressure,
    WindSpeed,
    WindGust,
    PrecipitationRate,
    PrecipitationTotal,
    DewPoint,
    WindDirection,
    Humidity,
    WindDirectionName,
}

/// Physical quantity, used to pick the unit and conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quantity {
    Temperature,
    Pressure,
    Speed,
    Length,
    Angle,
    Percentage,
    Label,
}

impl SensorKind {
    pub const fn all() -> &'static [SensorKind] {
        &[
            SensorKind::Temperature,
            SensorKind::Pressure,
            SensorKind::WindSpeed,
            SensorKind::WindGust,
            SensorKind::PrecipitationRate,
            SensorKind::PrecipitationTotal,
            SensorKind::DewPoint,
            SensorKind::WindDirection,
            SensorKind::Humidity,
            SensorKind::WindDirectionName,
        ]
    }

    /// Suffix used in entity ids and unique ids.
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "temp",
            SensorKind::Pressure => "pressure",
            SensorKind::WindSpeed => "windSpeed",
            SensorKind::WindGust => "windGust",
            SensorKind::PrecipitationRate => "precipRate",
            SensorKind::PrecipitationTotal => "precipTotal",
            SensorKind::DewPoint => "dewpt",
            SensorKind::WindDirection => "winddir",
            SensorKind::Humidity => "humidity",
            SensorKind::WindDirectionName => "windDirectionName",
        }
    }

    /// Upstream spreadsheet column holding the raw value.
    pub fn field(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "temp2",
            SensorKind::Pressure => "press1",
            SensorKind::WindSpeed => "mean1",
            SensorKind::WindGust => "gust2",
            SensorKind::PrecipitationRate => "rain",
            SensorKind::PrecipitationTotal => "rainsum",
            SensorKind::DewPoint => "dew",
            SensorKind::WindDirection | SensorKind::WindDirectionName => "dir",
            SensorKind::Humidity => "hum",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "Temperature",
            SensorKind::Pressure => "Pressure",
            SensorKind::WindSpeed => "Wind speed",
            SensorKind::WindGust => "Wind gust",
            SensorKind::PrecipitationRate => "Precipitation rate",
            SensorKind::PrecipitationTotal => "Precipitation today",
            SensorKind::DewPoint => "Dew point",
            SensorKind::WindDirection => "Wind direction",
            SensorKind::Humidity => "Relative humidity",
            SensorKind::WindDirectionName => "Wind direction name",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "mdi:thermometer",
            SensorKind::Pressure => "mdi:gauge",
            SensorKind::PrecipitationRate | SensorKind::PrecipitationTotal => "mdi:umbrella",
            SensorKind::DewPoint => "mdi:water",
            SensorKind::Humidity => "mdi:water-percent",
            SensorKind::WindSpeed
            | SensorKind::WindGust
            | SensorKind::WindDirection
            | SensorKind::WindDirectionName => "mdi:weather-windy",
        }
    }

    pub fn device_class(&self) -> Option<&'static str> {
        match self {
            SensorKind::Temperature => Some("temperature"),
            SensorKind::Pressure => Some("pressure"),
            SensorKind::Humidity => Some("humidity"),
            _ => None,
        }
    }

    fn quantity(&self) -> Quantity {
        match self {
            SensorKind::Temperature | SensorKind::DewPoint => Quantity::Temperature,
            SensorKind::Pressure => Quantity::Pressure,
            SensorKind::WindSpeed | SensorKind::WindGust => Quantity::Speed,
            SensorKind::PrecipitationRate | SensorKind::PrecipitationTotal => Quantity::Length,
            SensorKind::WindDirection => Quantity::Angle,
            SensorKind::Humidity => Quantity::Percentage,
            SensorKind::WindDirectionName => Quantity::Label,
        }
    }

    pub fn unit(&self, units: UnitSystem) -> Option<&'static str> {
        let unit = match (self.quantity(), units) {
            (Quantity::Temperature, UnitSystem::Metric) => "°C",
            (Quantity::Temperature, UnitSystem::Imperial) => "°F",
            (Quantity::Pressure, UnitSystem::Metric) => "hPa",
            (Quantity::Pressure, UnitSystem::Imperial) => "inHg",
            (Quantity::Speed, UnitSystem::Metric) => "m/s",
            (Quantity::Speed, UnitSystem::Imperial) => "mph",
            (Quantity::Length, UnitSystem::Metric) => "mm",
            (Quantity::Length, UnitSystem::Imperial) => "in",
            (Quantity::Angle, _) => "°",
            (Quantity::Percentage, _) => "%",
            (Quantity::Label, _) => return None,
        };
        Some(unit)
    }

    /// Turn the raw upstream cell into the sensor state value.
    ///
    /// Upstream values are metric; imperial values are converted and rounded to
    /// two decimals. Text cells pass through unchanged.
    pub fn convert(&self, raw: &CellValue, units: UnitSystem) -> CellValue {
        let Some(value) = raw.as_number() else {
            return raw.clone();
        };

        if *self == SensorKind::WindDirectionName {
            return CellValue::Text(compass_point(value).to_string());
        }

        let converted = match (self.quantity(), units) {
            (_, UnitSystem::Metric) => return CellValue::Number(value),
            (Quantity::Temperature, UnitSystem::Imperial) => value * 9.0 / 5.0 + 32.0,
            (Quantity::Pressure, UnitSystem::Imperial) => value * 0.029_529_983,
            (Quantity::Speed, UnitSystem::Imperial) => value * 2.236_936,
            (Quantity::Length, UnitSystem::Imperial) => value / 25.4,
            _ => return CellValue::Number(value),
        };

        CellValue::Number((converted * 100.0).round() / 100.0)
    }
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const COMPASS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// 16-point compass name for a wind direction in degrees.
///
/// Each point covers a 22.5° sector centred on it, so N spans 348.75..11.25.
/// Directions of 360° and above wrap around the circle, so 400° is NE.
/// Negative directions (station reports no direction) give an empty name.
pub fn compass_point(degrees: f64) -> &'static str {
    if degrees < 0.0 || !degrees.is_finite() {
        return "";
    }
    let sector = ((degrees % 360.0 + 11.25) / 22.5).floor() as usize % COMPASS.len();
    COMPASS[sector]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compass_sector_boundaries() {
        assert_eq!(compass_point(0.0), "N");
        assert_eq!(compass_point(11.24), "N");
        assert_eq!(compass_point(11.25), "NNE");
        assert_eq!(compass_point(33.75), "NE");
        assert_eq!(compass_point(180.0), "S");
        assert_eq!(compass_point(326.25), "NNW");
        assert_eq!(compass_point(348.74), "NNW");
        assert_eq!(compass_point(348.75), "N");
        assert_eq!(compass_point(359.9), "N");
        assert_eq!(compass_point(-1.0), "");
    }

    #[test]
    fn compass_wraps_past_full_circle() {
        assert_eq!(compass_point(360.0), "N");
        assert_eq!(compass_point(400.0), "NE");
        assert_eq!(compass_point(720.0 + 90.0), "E");
    }

    #[test]
    fn every_kind_has_a_field_and_icon() {
        for kind in SensorKind::all() {
            assert!(!kind.field().is_empty());
            assert!(kind.icon().starts_with("mdi:"));
        }
    }

    #[test]
    fn metric_values_pass_through() {
        let raw = CellValue::Number(7.3);
        assert_eq!(
            SensorKind::Temperature.convert(&raw, UnitSystem::Metric),
            CellValue::Number(7.3)
        );
        assert_eq!(SensorKind::Temperature.unit(UnitSystem::Metric), Some("°C"));
    }

    #[test]
    fn imperial_values_are_converted() {
        assert_eq!(
            SensorKind::Temperature.convert(&CellValue::Number(10.0), UnitSystem::Imperial),
            CellValue::Number(50.0)
        );
        assert_eq!(
            SensorKind::PrecipitationTotal.convert(&CellValue::Number(25.4), UnitSystem::Imperial),
            CellValue::Number(1.0)
        );
        assert_eq!(
            SensorKind::WindSpeed.convert(&CellValue::Number(10.0), UnitSystem::Imperial),
            CellValue::Number(22.37)
        );
        assert_eq!(
            SensorKind::Humidity.convert(&CellValue::Number(88.0), UnitSystem::Imperial),
            CellValue::Number(88.0)
        );
        assert_eq!(SensorKind::Pressure.unit(UnitSystem::Imperial), Some("inHg"));
    }

    #[test]
    fn wind_direction_name_is_derived_from_degrees() {
        let kind = SensorKind::WindDirectionName;
        assert_eq!(kind.field(), SensorKind::WindDirection.field());
        assert_eq!(
            kind.convert(&CellValue::Number(225.0), UnitSystem::Metric),
            CellValue::Text("SW".into())
        );
        assert_eq!(kind.unit(UnitSystem::Metric), None);
    }

    #[test]
    fn text_cells_are_not_converted() {
        let raw = CellValue::Text("n/a".into());
        assert_eq!(SensorKind::Temperature.convert(&raw, UnitSystem::Imperial), raw);
    }
}
