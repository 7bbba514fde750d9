//! The seeder: drives data provider → object builder → repository.

use crate::builder::BuildContext;
use crate::entity_settings::EntityConfiguration;
use crate::error::SeedError;
use crate::provider::EntityDataProvider;
use crate::repository::Repository;
use crate::transform_registry::TypeTransformationRegistry;
use std::fmt;

/// An entity configuration with its effective registry and marker.
pub(crate) struct PreparedEntity {
    pub(crate) configuration: EntityConfiguration,
    pub(crate) registry: TypeTransformationRegistry,
    pub(crate) empty_string_marker: Option<String>,
}

/// Records written for one entity during a seed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntitySummary {
    pub entity_name: &'static str,
    /// Inserted with `save_entity`
    pub saved: usize,
    /// Written with `add_or_update_entity`
    pub upserted: usize,
}

/// Outcome of a successful seed run, in seeding order.
///
/// Entities without matching data are not listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub entities: Vec<EntitySummary>,
}

impl SeedSummary {
    pub fn total(&self) -> usize {
        self.entities.iter().map(|e| e.saved + e.upserted).sum()
    }
}

/// Seeds configured entities in order. Created by
/// [`SeederConfiguration::create_seeder`](crate::SeederConfiguration::create_seeder).
pub struct Seeder<'a> {
    data_provider: Box<dyn EntityDataProvider + 'a>,
    repository: Box<dyn Repository + 'a>,
    entities: Vec<PreparedEntity>,
}

impl<'a> Seeder<'a> {
    pub(crate) fn new(
        data_provider: Box<dyn EntityDataProvider + 'a>,
        repository: Box<dyn Repository + 'a>,
        entities: Vec<PreparedEntity>,
    ) -> Self {
        Self {
            data_provider,
            repository,
            entities,
        }
    }

    /// Configured entity names, in seeding order
    pub fn entity_names(&self) -> Vec<&'static str> {
        self.entities
            .iter()
            .map(|e| e.configuration.entity_name())
            .collect()
    }

    /// Build and persist every configured entity, in configured order.
    ///
    /// Data sets sharing an entity name are seeded one after the other, in the
    /// order the provider returned them.
    /// Each record is committed before the next one is built. The first
    /// failure stops the run; whatever was committed stays committed.
    pub fn seed(&mut self) -> Result<SeedSummary, SeedError> {
        let entity_data = self.data_provider.get_entity_data()?;
        tracing::info!(
            "Seeding {} configured entities from {} data sets",
            self.entities.len(),
            entity_data.len()
        );

        let mut summary = SeedSummary::default();

        for entity in &self.entities {
            let entity_name = entity.configuration.entity_name();
            // Every data set for the entity, in provider order
            let data_sets: Vec<_> = entity_data
                .iter()
                .filter(|d| d.entity_name == entity_name)
                .collect();
            if data_sets.is_empty() {
                tracing::debug!("No data for entity '{}', skipping", entity_name);
                continue;
            }
            if data_sets.len() > 1 {
                tracing::debug!("Merging {} data sets for entity '{}'", data_sets.len(), entity_name);
            }

            let mut counts = EntitySummary {
                entity_name,
                ..EntitySummary::default()
            };

            for record in data_sets.iter().flat_map(|d| &d.objects) {
                let context = BuildContext {
                    registry: &entity.registry,
                    empty_string_marker: entity.empty_string_marker.as_deref(),
                    references: Some(&*self.repository),
                };
                let instance = entity.configuration.binding.build_record(record, context)?;

                match entity.configuration.primary_key() {
                    Some(key) => {
                        self.repository
                            .add_or_update_entity(&key.primary_key_name, instance)?;
                        counts.upserted += 1;
                    }
                    None => {
                        self.repository.save_entity(instance)?;
                        counts.saved += 1;
                    }
                }
            }

            tracing::info!(
                "Seeded {}: {} saved, {} upserted",
                entity_name,
                counts.saved,
                counts.upserted
            );
            summary.entities.push(counts);
        }

        tracing::info!("Seeding finished, {} records written", summary.total());
        Ok(summary)
    }

    /// Remove all instances of the configured entities, in reverse order.
    pub fn clear(&mut self) -> Result<(), SeedError> {
        for entity in self.entities.iter().rev() {
            let entity_name = entity.configuration.entity_name();
            tracing::debug!("Removing all '{}' entities", entity_name);
            self.repository.remove_entities(entity_name)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Seeder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seeder")
            .field("entities", &self.entity_names())
            .finish()
    }
}
