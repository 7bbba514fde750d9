//! Seeder configuration builder and validation.

use crate::entity_settings::{EntityConfiguration, EntitySettings};
use crate::error::{ConfigurationError, SeedError};
use crate::provider::EntityDataProvider;
use crate::record::Seedable;
use crate::repository::Repository;
use crate::seeder::{PreparedEntity, Seeder};
use crate::settings::{SeederSettings, DEFAULT_EMPTY_STRING_MARKER};
use crate::transform_registry::{TransformationOverride, TypeTransformation, TypeTransformationRegistry};
use crate::types::SeedType;
use std::collections::HashSet;

/// Accumulates everything a [`Seeder`] needs.
///
/// Nothing is validated until [`create_seeder`](Self::create_seeder), so the
/// calls may come in any order.
///
/// # Example
///
/// ```
/// use seedbed::{seedable, DictionaryDataProvider, EntityDataBuilder, InMemoryRepository, SeederConfiguration};
///
/// #[derive(Debug, Clone, Default)]
/// pub struct Customer {
///     pub id: i32,
///     pub name: String,
/// }
/// seedable!(Customer as "shop::Customer" { id: i32, name: String });
///
/// let data = vec![EntityDataBuilder::new("shop::Customer", &["Id", "Name"])
///     .with_entity(&["1", "Alice"])
///     .build()];
/// let mut repository = InMemoryRepository::new();
///
/// SeederConfiguration::new()
///     .with_data_provider(DictionaryDataProvider::new(data))
///     .with_repository(&mut repository)
///     .for_entity_with::<Customer>(|e| e.with_primary_key("id"))
///     .create_seeder()?
///     .seed()?;
///
/// assert_eq!(repository.entities::<Customer>()[0].name, "Alice");
/// # Ok::<(), seedbed::SeedError>(())
/// ```
#[derive(Default)]
pub struct SeederConfiguration<'a> {
    data_provider: Option<Box<dyn EntityDataProvider + 'a>>,
    repository: Option<Box<dyn Repository + 'a>>,
    settings: SeederSettings,
    empty_string_marker: Option<String>,
    transformations: Vec<TransformationOverride>,
    entities: Vec<EntityConfiguration>,
}

impl<'a> SeederConfiguration<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_provider(mut self, provider: impl EntityDataProvider + 'a) -> Self {
        self.data_provider = Some(Box::new(provider));
        self
    }

    pub fn with_repository(mut self, repository: impl Repository + 'a) -> Self {
        self.repository = Some(Box::new(repository));
        self
    }

    pub fn with_settings(mut self, settings: SeederSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Raw value that stands for the empty string (default `$EMPTY$`).
    pub fn with_empty_string_marker(mut self, marker: impl Into<String>) -> Self {
        self.empty_string_marker = Some(marker.into());
        self
    }

    /// Register a transformation for properties of type `T`, for all
    /// entities. Replaces a built-in or earlier registration.
    pub fn add_type_transformation<T: SeedType>(mut self, transformation: impl TypeTransformation + 'static) -> Self {
        self.transformations
            .push(TransformationOverride::for_type::<T>(transformation));
        self
    }

    /// Replace the transformation shared by all enum types.
    pub fn add_enum_transformation(mut self, transformation: impl TypeTransformation + 'static) -> Self {
        self.transformations
            .push(TransformationOverride::for_enums(transformation));
        self
    }

    /// Seed `T` after the entities configured so far, always inserting.
    pub fn for_entity<T: Seedable>(self) -> Self {
        self.for_entity_with::<T>(|settings| settings)
    }

    /// Seed `T` after the entities configured so far, with entity settings.
    pub fn for_entity_with<T: Seedable>(
        mut self,
        configure: impl FnOnce(EntitySettings<T>) -> EntitySettings<T>,
    ) -> Self {
        let settings = configure(EntitySettings::new());
        self.entities.push(settings.into_configuration());
        self
    }

    /// Validate the configuration and build the seeder.
    pub fn create_seeder(self) -> Result<Seeder<'a>, SeedError> {
        let data_provider = self.data_provider.ok_or(SeedError::MissingConfiguration {
            component: "DataProvider",
        })?;
        let repository = self.repository.ok_or(SeedError::MissingConfiguration {
            component: "Repository",
        })?;

        let mut seen = HashSet::new();
        for entity in &self.entities {
            entity.validate()?;
            if !seen.insert(entity.entity_name()) {
                return Err(ConfigurationError::DuplicateEntity {
                    entity: entity.entity_name(),
                }
                .into());
            }
        }

        let mut registry = TypeTransformationRegistry::from_settings(&self.settings);
        for registration in &self.transformations {
            registry.apply(registration.clone());
        }

        let explicit_marker = self
            .empty_string_marker
            .clone()
            .or_else(|| self.settings.empty_string_marker.clone());

        let mut entities = Vec::with_capacity(self.entities.len());
        for configuration in self.entities {
            let entity_registry = registry.with_overrides(configuration.overrides());

            let empty_string_marker = if entity_registry.is_overridden::<String>() {
                if explicit_marker.is_some() {
                    return Err(ConfigurationError::EmptyStringMarkerConflict.into());
                }
                None
            } else {
                Some(
                    explicit_marker
                        .clone()
                        .unwrap_or_else(|| DEFAULT_EMPTY_STRING_MARKER.to_string()),
                )
            };

            entities.push(PreparedEntity {
                configuration,
                registry: entity_registry,
                empty_string_marker,
            });
        }

        // A global string override conflicts even when no entity is configured
        if explicit_marker.is_some() && registry.is_overridden::<String>() {
            return Err(ConfigurationError::EmptyStringMarkerConflict.into());
        }

        tracing::debug!(
            "Created seeder for {} entities ({:?})",
            entities.len(),
            registry
        );

        Ok(Seeder::new(data_provider, repository, entities))
    }
}
