//! Wires configured stations, the upstream source and the entity host together.

use std::{sync::Arc, time::Duration};

use chrono::{Local, NaiveDate};
use futures::future::join_all;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    entity::{EntityHost, SensorEntity},
    error::{FetchError, SetupError},
    model::{Reading, UnitSystem},
    provider::{LandverkSource, StationSource},
    sensor::SensorKind,
    station::Station,
};

/// Outcome of one poll cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    pub ok: usize,
    pub failed: usize,
}

/// The entities belonging to one station.
#[derive(Debug, Clone)]
struct StationEntities {
    station: &'static Station,
    entities: Vec<SensorEntity>,
}

impl StationEntities {
    fn new(station: &'static Station, units: UnitSystem) -> Self {
        Self {
            station,
            entities: SensorKind::all()
                .iter()
                .map(|kind| SensorEntity::new(station, *kind, units))
                .collect(),
        }
    }

    fn apply(&mut self, reading: &Reading, units: UnitSystem) {
        for entity in &mut self.entities {
            if !entity.apply(reading, units) {
                warn!(
                    station = self.station.key,
                    sensor = %entity.kind,
                    field = entity.kind.field(),
                    "field missing from lv.fo reading"
                );
            }
        }
    }

    fn mark_unavailable(&mut self) {
        self.entities.iter_mut().for_each(SensorEntity::mark_unavailable);
    }
}

pub struct Integration {
    stations: Vec<StationEntities>,
    source: Box<dyn StationSource>,
    host: Arc<dyn EntityHost>,
    units: UnitSystem,
    timeout: Duration,
    scan_interval: Duration,
}

impl std::fmt::Debug for Integration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Integration")
            .field("stations", &self.stations.iter().map(|s| s.station.key).collect::<Vec<_>>())
            .field("source", &self.source)
            .field("units", &self.units)
            .field("timeout", &self.timeout)
            .field("scan_interval", &self.scan_interval)
            .finish_non_exhaustive()
    }
}

impl Integration {
    /// Validate `config`, build the entities, run a first refresh and register
    /// the entities with `host`.
    ///
    /// Configuration errors are returned before `source` is contacted.
    pub async fn setup(
        config: &Config,
        source: Box<dyn StationSource>,
        host: Arc<dyn EntityHost>,
    ) -> Result<Self, SetupError> {
        let stations = config.resolve_stations()?;
        info!(
            stations = ?stations.iter().map(|s| s.key).collect::<Vec<_>>(),
            "weather stations in config"
        );

        let units = config.unit_system;
        let stations = stations
            .into_iter()
            .map(|station| {
                info!(station = station.key, name = station.name, "start monitoring station");
                StationEntities::new(station, units)
            })
            .collect();

        let mut integration = Self {
            stations,
            source,
            host,
            units,
            timeout: config.timeout(),
            scan_interval: config.scan_interval(),
        };

        integration.refresh(Local::now().date_naive()).await;
        integration.host.add_entities(integration.entities().cloned().collect());

        Ok(integration)
    }

    /// Set up against lv.fo using the endpoint and timeout from `config`.
    pub async fn setup_landverk(
        config: &Config,
        host: Arc<dyn EntityHost>,
    ) -> Result<Self, SetupError> {
        let source = LandverkSource::new(config.base_url.clone(), config.timeout())
            .map_err(SetupError::Client)?;
        Self::setup(config, Box::new(source), host).await
    }

    pub fn entities(&self) -> impl Iterator<Item = &SensorEntity> {
        self.stations.iter().flat_map(|s| s.entities.iter())
    }

    pub fn stations(&self) -> impl Iterator<Item = &'static Station> + '_ {
        self.stations.iter().map(|s| s.station)
    }

    pub fn scan_interval(&self) -> Duration {
        self.scan_interval
    }

    /// Run one poll cycle and publish every entity's state to the host.
    pub async fn update(&mut self) -> PollSummary {
        let summary = self.refresh(Local::now().date_naive()).await;
        for entity in self.stations.iter().flat_map(|s| s.entities.iter()) {
            self.host.update_entity(entity);
        }
        summary
    }

    /// Poll every scan interval until `cancel` fires.
    pub async fn run(&mut self, cancel: CancellationToken) {
        let mut ticker = time::interval_at(Instant::now() + self.scan_interval, self.scan_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(interval_secs = self.scan_interval.as_secs(), "polling started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let summary = self.update().await;
                    debug!(ok = summary.ok, failed = summary.failed, "poll cycle finished");
                }
            }
        }
        info!("polling stopped");
    }

    /// Fetch all stations concurrently and apply the results to their entities.
    async fn refresh(&mut self, date: NaiveDate) -> PollSummary {
        let source = self.source.as_ref();
        let timeout = self.timeout;
        let results = join_all(
            self.stations
                .iter()
                .map(|s| fetch_with_timeout(source, s.station, date, timeout)),
        )
        .await;

        let mut summary = PollSummary::default();
        for (group, result) in self.stations.iter_mut().zip(results) {
            match result {
                Ok(reading) => {
                    group.apply(&reading, self.units);
                    summary.ok += 1;
                }
                Err(err) => {
                    warn!(station = group.station.key, error = %err, "error fetching weather data");
                    group.mark_unavailable();
                    summary.failed += 1;
                }
            }
        }
        summary
    }
}

async fn fetch_with_timeout(
    source: &dyn StationSource,
    station: &'static Station,
    date: NaiveDate,
    timeout: Duration,
) -> Result<Reading, FetchError> {
    time::timeout(timeout, source.fetch(station, date))
        .await
        .unwrap_or_else(|_| {
            Err(FetchError::Timeout {
                station: station.key.to_string(),
                secs: timeout.as_secs(),
            })
        })
}
