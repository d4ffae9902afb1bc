use foweather_core::{EntityHost, SensorEntity, entity::ATTR_DATE};
use tracing::info;

/// Host that prints entity state changes to stdout.
#[derive(Debug, Default)]
pub struct ConsoleHost {
    quiet: bool,
}

impl ConsoleHost {
    /// A host that only logs registration; used for one-shot output.
    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

impl EntityHost for ConsoleHost {
    fn add_entities(&self, entities: Vec<SensorEntity>) {
        info!(count = entities.len(), "registered sensor entities");
        if self.quiet {
            return;
        }
        for entity in &entities {
            print_state(entity);
        }
    }

    fn update_entity(&self, entity: &SensorEntity) {
        if !self.quiet {
            print_state(entity);
        }
    }
}

fn print_state(entity: &SensorEntity) {
    let date = entity.attributes.get(ATTR_DATE).map(String::as_str).unwrap_or("-");
    println!(
        "{} {} = {} {}",
        date,
        entity.entity_id,
        entity.state,
        entity.unit_of_measurement.unwrap_or("")
    );
}
