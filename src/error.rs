//! Error types for seeding operations.
//!
//! Every failure carries enough context (field, entity type, raw value and root
//! cause) to be diagnosed without re-running the seed with extra logging.

use thiserror::Error;

/// A raw string could not be converted by a transformation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("'{value}' is not a valid {expected}")]
    InvalidFormat { value: String, expected: &'static str },

    #[error("'{value}' is out of range for '{target}'")]
    OutOfRange { value: String, target: &'static str },

    #[error("'{value}' is not a variant of enum '{enum_name}'")]
    UnknownVariant { value: String, enum_name: &'static str },

    #[error("{0}")]
    Custom(String),
}

impl TransformError {
    pub fn invalid_format(value: &str, expected: &'static str) -> Self {
        TransformError::InvalidFormat {
            value: value.to_string(),
            expected,
        }
    }
}

/// A converted value could not be stored in the destination property.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssignError {
    #[error("expected a value of type '{expected}', got {found}")]
    TypeMismatch { expected: &'static str, found: String },

    #[error("value {value} is out of range for '{target}'")]
    OutOfRange { value: String, target: &'static str },

    #[error("null can not be assigned to non-nullable type '{target}'")]
    NullNotAllowed { target: &'static str },

    #[error("property is not writable")]
    NotWritable,
}

/// The one root cause wrapped by a [`PropertyTransformationError`].
#[derive(Debug, Error)]
pub enum PropertyFault {
    #[error("Property is missing")]
    MissingProperty,

    #[error(transparent)]
    Format(#[from] TransformError),

    #[error("Transformation of type '{type_name}' is currently not supported")]
    UnsupportedType { type_name: &'static str },

    #[error("Set property failed: {0}")]
    Assignment(#[from] AssignError),

    #[error("no '{entity}' with identity {id} has been seeded")]
    ReferenceNotFound { entity: &'static str, id: String },

    #[error("reference lookup failed: {0}")]
    Lookup(#[from] RepositoryError),
}

/// Converting or assigning one record field failed.
#[derive(Debug, Error)]
#[error("Transformation of Property '{field}' of type '{type_name}' to value '{value}' failed")]
pub struct PropertyTransformationError {
    pub field: String,
    pub type_name: &'static str,
    pub value: String,
    #[source]
    pub cause: PropertyFault,
}

impl PropertyTransformationError {
    pub fn new(field: &str, type_name: &'static str, value: Option<&str>, cause: PropertyFault) -> Self {
        Self {
            field: field.to_string(),
            type_name,
            value: value.unwrap_or_default().to_string(),
            cause,
        }
    }
}

/// Mutually exclusive or inconsistent configuration choices.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("EmptyString marker can not be set, because the string transformation logic is overridden")]
    EmptyStringMarkerConflict,

    #[error("not a proper member selector")]
    NotAMemberSelector,

    #[error("primary key '{property}' is not a property of '{entity}'")]
    UnknownPrimaryKey { entity: &'static str, property: String },

    #[error("entity '{entity}' is configured more than once")]
    DuplicateEntity { entity: &'static str },
}

/// Failure inside a data provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{0}")]
    Other(String),
}

/// Failure inside a repository.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RepositoryError {
    #[error("entity '{entity}' has no property '{property}'")]
    MissingIdentifier { entity: &'static str, property: String },

    #[error("entity '{entity}' is not managed by this repository")]
    UnknownEntity { entity: String },

    #[error("{0}")]
    Backend(String),
}

/// Failure while loading [`crate::SeederSettings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Top-level error returned by seeder creation and seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// A required component was never supplied. Displays as the component name.
    #[error("{component}")]
    MissingConfiguration { component: &'static str },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    PropertyTransformation(#[from] PropertyTransformationError),

    #[error("data provider failed: {0}")]
    DataProvider(#[from] ProviderError),

    #[error("repository failed: {0}")]
    Repository(#[from] RepositoryError),
}
