//! Object builder: turns raw records into typed instances.

use crate::entity::{FieldValue, Record};
use crate::error::{PropertyFault, PropertyTransformationError};
use crate::record::{SeedRecord, Seedable};
use crate::repository::Repository;
use crate::transform_registry::TypeTransformationRegistry;
use crate::types::{TypeDescriptor, TypeKind};
use std::marker::PhantomData;

/// Everything a build needs besides the records themselves.
#[derive(Clone, Copy)]
pub struct BuildContext<'c> {
    pub registry: &'c TypeTransformationRegistry,
    /// Active empty-string marker; `None` disables substitution (the string
    /// transformation is overridden).
    pub empty_string_marker: Option<&'c str>,
    /// Where referenced entities are looked up. Without it references are
    /// converted but not checked.
    pub references: Option<&'c dyn Repository>,
}

impl<'c> BuildContext<'c> {
    pub fn new(registry: &'c TypeTransformationRegistry) -> Self {
        Self {
            registry,
            empty_string_marker: None,
            references: None,
        }
    }

    /// Apply the empty-string rule. `None` means the value is null.
    fn effective_value<'v>(&self, raw: Option<&'v str>) -> Option<&'v str> {
        let raw = raw?;
        match self.empty_string_marker {
            Some(_) if raw.is_empty() => None,
            Some(marker) if raw == marker => Some(""),
            _ => Some(raw),
        }
    }
}

/// Builds instances of `T`, one per record, field by field.
pub struct ObjectBuilder<'c, T> {
    context: BuildContext<'c>,
    entity: PhantomData<fn() -> T>,
}

impl<'c, T: Seedable> ObjectBuilder<'c, T> {
    pub fn new(registry: &'c TypeTransformationRegistry) -> Self {
        Self::from_context(BuildContext::new(registry))
    }

    pub fn from_context(context: BuildContext<'c>) -> Self {
        Self {
            context,
            entity: PhantomData,
        }
    }

    pub fn with_empty_string_marker(mut self, marker: &'c str) -> Self {
        self.context.empty_string_marker = Some(marker);
        self
    }

    pub fn with_references(mut self, repository: &'c dyn Repository) -> Self {
        self.context.references = Some(repository);
        self
    }

    /// Build one instance per record, in record order.
    pub fn build(&self, objects: &[Record]) -> Result<Vec<T>, PropertyTransformationError> {
        objects.iter().map(|record| self.build_record(record)).collect()
    }

    /// Build a single instance, starting from `T::default()`.
    pub fn build_record(&self, record: &Record) -> Result<T, PropertyTransformationError> {
        let mut entity = T::default();

        for (field, raw) in record {
            self.populate(&mut entity, field, raw.as_deref())
                .map_err(|cause| PropertyTransformationError::new(field, T::TYPE_NAME, raw.as_deref(), cause))?;
        }

        tracing::trace!("Built {} from {} fields", T::TYPE_NAME, record.len());
        Ok(entity)
    }

    fn populate(&self, entity: &mut T, field: &str, raw: Option<&str>) -> Result<(), PropertyFault> {
        let property = T::property(field).ok_or(PropertyFault::MissingProperty)?;
        let descriptor = (property.descriptor)();

        let Some(value) = self.context.effective_value(raw) else {
            // Non-nullable properties keep their default
            if descriptor.is_nullable() {
                property.assign(entity, FieldValue::Null)?;
            }
            return Ok(());
        };

        let converted = self.convert(&descriptor, value)?;
        property.assign(entity, converted)?;
        Ok(())
    }

    fn convert(&self, descriptor: &TypeDescriptor, value: &str) -> Result<FieldValue, PropertyFault> {
        let TypeKind::Reference { entity, key } = &descriptor.underlying().kind else {
            return self.context.registry.transform(value, descriptor);
        };

        let id = self.context.registry.transform(value, key)?;
        if let Some(repository) = self.context.references {
            if repository.load_entity(entity, &id)?.is_none() {
                return Err(PropertyFault::ReferenceNotFound {
                    entity: *entity,
                    id: id.to_string(),
                });
            }
        }
        Ok(id)
    }
}

/// Type-erased builder for one configured entity type.
pub trait EntityBinding {
    fn entity_name(&self) -> &'static str;

    fn has_property(&self, name: &str) -> bool;

    fn build_record(
        &self,
        record: &Record,
        context: BuildContext<'_>,
    ) -> Result<Box<dyn SeedRecord>, PropertyTransformationError>;
}

pub struct TypedBinding<T>(PhantomData<fn() -> T>);

impl<T> TypedBinding<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for TypedBinding<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Seedable> EntityBinding for TypedBinding<T> {
    fn entity_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn has_property(&self, name: &str) -> bool {
        T::property(name).is_some()
    }

    fn build_record(
        &self,
        record: &Record,
        context: BuildContext<'_>,
    ) -> Result<Box<dyn SeedRecord>, PropertyTransformationError> {
        let entity = ObjectBuilder::<T>::from_context(context).build_record(record)?;
        Ok(Box::new(entity))
    }
}
