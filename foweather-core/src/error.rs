use thiserror::Error;

/// Configuration rejected before any station is contacted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown station '{0}'.\nHint: run `foweather stations` to list the known stations.")]
    UnknownStation(String),

    #[error("No stations configured.\nHint: run `foweather configure` to pick at least one station.")]
    NoStations,

    #[error("Unknown unit system '{0}'. Supported unit systems: metric, imperial.")]
    InvalidUnitSystem(String),
}

/// Failure of a single station fetch. Scoped to one station and one poll cycle.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to send request to lv.fo: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Request for station {station} timed out after {secs}s")]
    Timeout { station: String, secs: u64 },

    #[error("lv.fo request failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Malformed lv.fo response: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
