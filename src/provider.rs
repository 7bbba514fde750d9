//! Data providers: where raw [`EntityData`] comes from.

use crate::entity::{EntityData, Record};
use crate::error::ProviderError;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Source of raw entity data. Called exactly once per seed run.
pub trait EntityDataProvider {
    fn get_entity_data(&self) -> Result<Vec<EntityData>, ProviderError>;
}

impl<P: EntityDataProvider + ?Sized> EntityDataProvider for &P {
    fn get_entity_data(&self) -> Result<Vec<EntityData>, ProviderError> {
        (**self).get_entity_data()
    }
}

/// Provider over entity data that is already in memory.
#[derive(Debug, Clone, Default)]
pub struct DictionaryDataProvider {
    entity_data: Vec<EntityData>,
}

impl DictionaryDataProvider {
    pub fn new(entity_data: Vec<EntityData>) -> Self {
        Self { entity_data }
    }
}

impl EntityDataProvider for DictionaryDataProvider {
    fn get_entity_data(&self) -> Result<Vec<EntityData>, ProviderError> {
        Ok(self.entity_data.clone())
    }
}

impl From<Vec<EntityData>> for DictionaryDataProvider {
    fn from(entity_data: Vec<EntityData>) -> Self {
        Self::new(entity_data)
    }
}

#[derive(Debug, Deserialize)]
struct RawEntityData {
    entity_name: String,
    #[serde(default)]
    objects: Vec<IndexMap<String, serde_yaml::Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDocument {
    Many(Vec<RawEntityData>),
    One(RawEntityData),
}

/// Provider reading entity data from YAML or JSON documents.
///
/// The path is either one file or a directory whose `.yaml`, `.yml` and
/// `.json` files are read in file name order. A document holds one entity or
/// a list of them:
///
/// ```yaml
/// - entity_name: shop::Customer
///   objects:
///     - Id: 1
///       Name: Alice
///       Nickname: ~
/// ```
///
/// Scalars are kept as their textual form; `null` becomes an absent value.
#[derive(Debug, Clone)]
pub struct DocumentDataProvider {
    path: PathBuf,
}

impl DocumentDataProvider {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn document_paths(&self) -> Result<Vec<PathBuf>, ProviderError> {
        if !self.path.is_dir() {
            return Ok(vec![self.path.clone()]);
        }

        let entries = fs::read_dir(&self.path).map_err(|source| ProviderError::Io {
            path: self.path.display().to_string(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ProviderError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
            let path = entry.path();

            let is_document = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| matches!(ext, "yaml" | "yml" | "json"));
            if is_document {
                paths.push(path);
            }
        }

        paths.sort();
        Ok(paths)
    }

    fn read_document(path: &Path) -> Result<Vec<EntityData>, ProviderError> {
        let contents = fs::read_to_string(path).map_err(|source| ProviderError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let document: RawDocument =
            serde_yaml::from_str(&contents).map_err(|source| ProviderError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        let raw_entities = match document {
            RawDocument::Many(entities) => entities,
            RawDocument::One(entity) => vec![entity],
        };

        raw_entities.into_iter().map(into_entity_data).collect()
    }
}

impl EntityDataProvider for DocumentDataProvider {
    fn get_entity_data(&self) -> Result<Vec<EntityData>, ProviderError> {
        let mut entity_data = Vec::new();
        for path in self.document_paths()? {
            let entities = Self::read_document(&path)?;
            tracing::debug!("Read {} entities from {}", entities.len(), path.display());
            entity_data.extend(entities);
        }
        Ok(entity_data)
    }
}

fn into_entity_data(raw: RawEntityData) -> Result<EntityData, ProviderError> {
    let objects = raw
        .objects
        .into_iter()
        .map(|object| {
            object
                .into_iter()
                .map(|(field, value)| {
                    let value = scalar_text(&raw.entity_name, &field, value)?;
                    Ok((field, value))
                })
                .collect::<Result<Record, ProviderError>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(EntityData {
        entity_name: raw.entity_name,
        objects,
    })
}

fn scalar_text(entity: &str, field: &str, value: serde_yaml::Value) -> Result<Option<String>, ProviderError> {
    match value {
        serde_yaml::Value::Null => Ok(None),
        serde_yaml::Value::Bool(b) => Ok(Some(b.to_string())),
        serde_yaml::Value::Number(n) => Ok(Some(n.to_string())),
        serde_yaml::Value::String(s) => Ok(Some(s)),
        _ => Err(ProviderError::Other(format!(
            "field '{}' of '{}' is not a scalar value",
            field, entity
        ))),
    }
}
