//! Per-entity configuration: identity and entity-scoped transformations.

use crate::builder::{EntityBinding, TypedBinding};
use crate::error::ConfigurationError;
use crate::member::MemberSelector;
use crate::record::Seedable;
use crate::transform_registry::{TransformationOverride, TypeTransformation};
use crate::types::SeedType;
use std::fmt;
use std::marker::PhantomData;

/// Names the identity property used to upsert an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKeySetting {
    pub primary_key_name: String,
}

impl PrimaryKeySetting {
    pub fn new(primary_key_name: impl Into<String>) -> Self {
        Self {
            primary_key_name: primary_key_name.into(),
        }
    }

    pub fn from_selector(selector: &MemberSelector) -> Result<Self, ConfigurationError> {
        selector.member_name().map(Self::new)
    }
}

/// Settings for one entity type, passed to
/// [`SeederConfiguration::for_entity_with`](crate::SeederConfiguration::for_entity_with).
///
/// ```
/// # use seedbed::{seedable, member, EntitySettings};
/// #[derive(Debug, Clone, Default)]
/// pub struct Customer {
///     pub id: i32,
/// }
/// seedable!(Customer { id: i32 });
///
/// let settings = EntitySettings::<Customer>::new().with_primary_key_selector(member!(Customer, id));
/// ```
pub struct EntitySettings<T> {
    primary_key: Result<Option<PrimaryKeySetting>, ConfigurationError>,
    overrides: Vec<TransformationOverride>,
    entity: PhantomData<fn() -> T>,
}

impl<T: Seedable> EntitySettings<T> {
    pub fn new() -> Self {
        Self {
            primary_key: Ok(None),
            overrides: Vec::new(),
            entity: PhantomData,
        }
    }

    pub fn with_primary_key(mut self, name: impl Into<String>) -> Self {
        self.primary_key = Ok(Some(PrimaryKeySetting::new(name)));
        self
    }

    /// Primary key from a member selector. An invalid selector is reported
    /// when the seeder is created.
    pub fn with_primary_key_selector(mut self, selector: MemberSelector) -> Self {
        self.primary_key = PrimaryKeySetting::from_selector(&selector).map(Some);
        self
    }

    /// Transformation for properties of type `P`, for this entity only.
    pub fn add_type_transformation<P: SeedType>(mut self, transformation: impl TypeTransformation + 'static) -> Self {
        self.overrides.push(TransformationOverride::for_type::<P>(transformation));
        self
    }

    pub(crate) fn into_configuration(self) -> EntityConfiguration {
        EntityConfiguration {
            entity_name: T::TYPE_NAME,
            primary_key: self.primary_key,
            overrides: self.overrides,
            binding: Box::new(TypedBinding::<T>::new()),
        }
    }
}

impl<T: Seedable> Default for EntitySettings<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased configuration of one entity, in seeding order.
pub struct EntityConfiguration {
    pub(crate) entity_name: &'static str,
    pub(crate) primary_key: Result<Option<PrimaryKeySetting>, ConfigurationError>,
    pub(crate) overrides: Vec<TransformationOverride>,
    pub(crate) binding: Box<dyn EntityBinding>,
}

impl EntityConfiguration {
    pub fn entity_name(&self) -> &'static str {
        self.entity_name
    }

    /// Check the entity's own settings.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match &self.primary_key {
            Err(e) => Err(e.clone()),
            Ok(Some(key)) if !self.binding.has_property(&key.primary_key_name) => {
                Err(ConfigurationError::UnknownPrimaryKey {
                    entity: self.entity_name,
                    property: key.primary_key_name.clone(),
                })
            }
            Ok(_) => Ok(()),
        }
    }

    pub fn primary_key(&self) -> Option<&PrimaryKeySetting> {
        self.primary_key.as_ref().ok().and_then(|key| key.as_ref())
    }

    pub fn overrides(&self) -> &[TransformationOverride] {
        &self.overrides
    }
}

impl fmt::Debug for EntityConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityConfiguration")
            .field("entity_name", &self.entity_name)
            .field("primary_key", &self.primary_key)
            .field("overrides", &self.overrides)
            .finish()
    }
}
