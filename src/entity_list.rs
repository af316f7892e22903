use crate::config::Config;
use crate::entities::EntityKind;
use crate::progress::format_number;

/// One row of `tsync entities`.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityStatus {
    pub entity: EntityKind,
    pub collection: &'static str,
    pub batch_size: usize,
}

pub fn entity_statuses(config: &Config) -> Vec<EntityStatus> {
    EntityKind::ALL
        .iter()
        .map(|&kind| EntityStatus {
            entity: kind,
            collection: kind.collection(),
            batch_size: config.batch_size(kind),
        })
        .collect()
}

pub fn list_entities(config: &Config) {
    println!("{:<12} {:<12} BATCH SIZE", "ENTITY", "COLLECTION");
    for status in entity_statuses(config) {
        println!(
            "{:<12} {:<12} {}",
            status.entity.name(),
            status.collection,
            format_number(status.batch_size as u64)
        );
    }
}
