//! Repository collaborator: where seeded instances are persisted.
//!
//! Instances cross this boundary type-erased as [`SeedRecord`]s and are
//! dispatched by their canonical entity name.

use crate::entity::FieldValue;
use crate::error::RepositoryError;
use crate::record::{SeedRecord, Seedable};
use indexmap::IndexMap;

/// Persistence operations used by the seeder.
///
/// Every call must be committed before it returns.
pub trait Repository {
    /// Unconditional insert.
    fn save_entity(&mut self, entity: Box<dyn SeedRecord>) -> Result<(), RepositoryError>;

    /// Upsert keyed by the value of the `identifier` property: overwrite the
    /// stored instance with an equal identity, insert otherwise.
    fn add_or_update_entity(
        &mut self,
        identifier: &str,
        entity: Box<dyn SeedRecord>,
    ) -> Result<(), RepositoryError>;

    /// Delete every stored instance of the entity.
    fn remove_entities(&mut self, entity_name: &str) -> Result<(), RepositoryError>;

    /// Point lookup by identity.
    fn load_entity(
        &self,
        entity_name: &str,
        id: &FieldValue,
    ) -> Result<Option<Box<dyn SeedRecord>>, RepositoryError>;
}

impl<R: Repository + ?Sized> Repository for &mut R {
    fn save_entity(&mut self, entity: Box<dyn SeedRecord>) -> Result<(), RepositoryError> {
        (**self).save_entity(entity)
    }

    fn add_or_update_entity(
        &mut self,
        identifier: &str,
        entity: Box<dyn SeedRecord>,
    ) -> Result<(), RepositoryError> {
        (**self).add_or_update_entity(identifier, entity)
    }

    fn remove_entities(&mut self, entity_name: &str) -> Result<(), RepositoryError> {
        (**self).remove_entities(entity_name)
    }

    fn load_entity(
        &self,
        entity_name: &str,
        id: &FieldValue,
    ) -> Result<Option<Box<dyn SeedRecord>>, RepositoryError> {
        (**self).load_entity(entity_name, id)
    }
}

#[derive(Debug, Default)]
struct Table {
    /// Identity property, known once an instance was upserted
    identifier: Option<String>,
    rows: Vec<Box<dyn SeedRecord>>,
}

/// Repository keeping everything in memory, grouped by entity.
///
/// Instances saved without identity can not be found by [`Repository::load_entity`].
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    tables: IndexMap<&'static str, Table>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored instances
    pub fn count(&self) -> usize {
        self.tables.values().map(|t| t.rows.len()).sum()
    }

    pub fn count_of<T: Seedable>(&self) -> usize {
        self.tables.get(T::TYPE_NAME).map_or(0, |t| t.rows.len())
    }

    /// Stored instances of `T`, in insertion order.
    pub fn entities<T: Seedable>(&self) -> Vec<&T> {
        self.tables
            .get(T::TYPE_NAME)
            .map(|t| t.rows.iter().filter_map(|row| row.downcast_ref::<T>()).collect())
            .unwrap_or_default()
    }

    /// Entity names in the order they were first stored
    pub fn entity_names(&self) -> Vec<&'static str> {
        self.tables.keys().copied().collect()
    }
}

impl Repository for InMemoryRepository {
    fn save_entity(&mut self, entity: Box<dyn SeedRecord>) -> Result<(), RepositoryError> {
        self.tables
            .entry(entity.entity_name())
            .or_default()
            .rows
            .push(entity);
        Ok(())
    }

    fn add_or_update_entity(
        &mut self,
        identifier: &str,
        entity: Box<dyn SeedRecord>,
    ) -> Result<(), RepositoryError> {
        let entity_name = entity.entity_name();
        let id = entity
            .property_value(identifier)
            .ok_or_else(|| RepositoryError::MissingIdentifier {
                entity: entity_name,
                property: identifier.to_string(),
            })?;

        let table = self.tables.entry(entity_name).or_default();
        table.identifier = Some(identifier.to_string());

        let existing = table
            .rows
            .iter()
            .position(|row| row.property_value(identifier).as_ref() == Some(&id));

        match existing {
            Some(index) => {
                tracing::debug!("Updating {} with {} = {}", entity_name, identifier, id);
                table.rows[index] = entity;
            }
            None => table.rows.push(entity),
        }
        Ok(())
    }

    fn remove_entities(&mut self, entity_name: &str) -> Result<(), RepositoryError> {
        if let Some(table) = self.tables.get_mut(entity_name) {
            table.rows.clear();
        }
        Ok(())
    }

    fn load_entity(
        &self,
        entity_name: &str,
        id: &FieldValue,
    ) -> Result<Option<Box<dyn SeedRecord>>, RepositoryError> {
        let Some(table) = self.tables.get(entity_name) else {
            return Ok(None);
        };
        let Some(identifier) = &table.identifier else {
            return Ok(None);
        };

        Ok(table
            .rows
            .iter()
            .find(|row| row.property_value(identifier).as_ref() == Some(id))
            .map(|row| row.clone_record()))
    }
}

/// Repository that accepts and forgets everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyRepository;

impl Repository for EmptyRepository {
    fn save_entity(&mut self, _entity: Box<dyn SeedRecord>) -> Result<(), RepositoryError> {
        Ok(())
    }

    fn add_or_update_entity(
        &mut self,
        _identifier: &str,
        _entity: Box<dyn SeedRecord>,
    ) -> Result<(), RepositoryError> {
        Ok(())
    }

    fn remove_entities(&mut self, _entity_name: &str) -> Result<(), RepositoryError> {
        Ok(())
    }

    fn load_entity(
        &self,
        _entity_name: &str,
        _id: &FieldValue,
    ) -> Result<Option<Box<dyn SeedRecord>>, RepositoryError> {
        Ok(None)
    }
}
