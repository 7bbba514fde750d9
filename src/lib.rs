//! # Seedbed: Typed Seed Data for Repositories
//!
//! Seedbed turns raw string records into typed entity instances and hands them
//! to a repository, in a configured order, inserting or upserting each one.
//!
//! ## Features
//!
//! - **Type transformation registry**: Built-in string conversions for numbers, booleans, dates, strings and enums, replaceable globally or per entity
//! - **Object builder**: Field-by-field construction with precise error reporting (field, entity type, raw value)
//! - **Empty-string marker**: Distinguish "no value" from "empty string" in string-only sources
//! - **Ordered seeding**: Entities are seeded in configuration order; references to earlier entities are checked
//! - **Upserts**: Entities with a primary key are added or updated instead of inserted
//! - **Data providers**: In-memory data or YAML/JSON documents on disk
//!
//! ## Example
//!
//! ```
//! use seedbed::{seedable, EntityDataBuilder, DictionaryDataProvider, InMemoryRepository, SeederConfiguration};
//!
//! #[derive(Debug, Clone, Default)]
//! pub struct Product {
//!     pub sku: String,
//!     pub price: f64,
//!     pub discontinued: bool,
//! }
//!
//! seedable!(Product as "shop::Product" { sku: String, price: f64, discontinued: bool });
//!
//! let data = EntityDataBuilder::new("shop::Product", &["Sku", "Price", "Discontinued"])
//!     .with_entity(&["A-100", "19,99", "false"])
//!     .with_entity(&["A-200", "4,50", "true"])
//!     .build();
//!
//! let mut repository = InMemoryRepository::new();
//! SeederConfiguration::new()
//!     .with_data_provider(DictionaryDataProvider::new(vec![data]))
//!     .with_repository(&mut repository)
//!     .for_entity_with::<Product>(|e| e.with_primary_key("sku"))
//!     .create_seeder()?
//!     .seed()?;
//!
//! assert_eq!(repository.entities::<Product>()[1].price, 4.5);
//! # Ok::<(), seedbed::SeedError>(())
//! ```

// Core modules
pub mod entity;
pub mod error;
pub mod types;
pub mod record;
pub mod member;

// Type transformations
pub mod transformations;
pub mod transform_registry;

// Building and persisting entities
pub mod builder;
pub mod provider;
pub mod repository;

// Configuration and orchestration
pub mod settings;
pub mod entity_settings;
pub mod configuration;
pub mod seeder;

// Re-export key types
pub use entity::{EntityData, EntityDataBuilder, FieldValue, Record};
pub use error::{
    AssignError, ConfigurationError, PropertyFault, PropertyTransformationError, ProviderError,
    RepositoryError, SeedError, SettingsError, TransformError,
};
pub use types::{Ref, SeedType, TypeDescriptor, TypeKind};
pub use record::{Property, SeedRecord, Seedable};
pub use member::MemberSelector;

// Re-export transformation types
pub use transform_registry::{CustomTypeTransformation, Origin, TypeTransformation, TypeTransformationRegistry};
pub use transformations::NumberFormat;

// Re-export builder, provider and repository types
pub use builder::{BuildContext, ObjectBuilder};
pub use provider::{DictionaryDataProvider, DocumentDataProvider, EntityDataProvider};
pub use repository::{EmptyRepository, InMemoryRepository, Repository};

// Re-export configuration types
pub use settings::{SeederSettings, DEFAULT_EMPTY_STRING_MARKER};
pub use entity_settings::{EntitySettings, PrimaryKeySetting};
pub use configuration::SeederConfiguration;
pub use seeder::{EntitySummary, SeedSummary, Seeder};
