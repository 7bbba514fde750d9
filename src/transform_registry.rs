//! Transformation registry: maps a property type to the logic converting a raw
//! string into it.
//!
//! Built-in registrations cover the closed default set (integers, floating
//! point, decimal, boolean, date/time, string, enum). Callers extend or
//! override it by registering a transformation for a type; the last
//! registration for a type wins.

use crate::entity::FieldValue;
use crate::error::{PropertyFault, TransformError};
use crate::settings::SeederSettings;
use crate::transformations::{
    BooleanTransformation, DateTimeTransformation, DecimalTransformation, EnumTransformation,
    FloatTransformation, IntegerTransformation, NumberFormat, StringTransformation,
};
use crate::types::{SeedType, TypeDescriptor};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Registry key shared by all enum types.
pub const ENUM_TYPE_KEY: &str = "enum";

/// Converts one raw string into a value of the target type.
pub trait TypeTransformation: Send + Sync {
    /// `target` is the property type with any `Option` wrapper removed.
    fn transform(&self, value: &str, target: &TypeDescriptor) -> Result<FieldValue, TransformError>;
}

/// Closures with the right signature are transformations
impl<F> TypeTransformation for F
where
    F: Fn(&str, &TypeDescriptor) -> Result<FieldValue, TransformError> + Send + Sync,
{
    fn transform(&self, value: &str, target: &TypeDescriptor) -> Result<FieldValue, TransformError> {
        self(value, target)
    }
}

type ConvertFn = dyn Fn(&str) -> Result<FieldValue, TransformError> + Send + Sync;

/// User-supplied transformation for one concrete type.
///
/// # Example
///
/// ```
/// use seedbed::{CustomTypeTransformation, TransformError};
///
/// let hex = CustomTypeTransformation::new(|value: &str| {
///     u32::from_str_radix(value.trim_start_matches("0x"), 16)
///         .map_err(|e| TransformError::Custom(e.to_string()))
/// });
/// let always_one = CustomTypeTransformation::constant(1u32);
/// ```
#[derive(Clone)]
pub struct CustomTypeTransformation {
    convert: Arc<ConvertFn>,
}

impl CustomTypeTransformation {
    pub fn new<T, F>(convert: F) -> Self
    where
        T: SeedType,
        F: Fn(&str) -> Result<T, TransformError> + Send + Sync + 'static,
    {
        Self {
            convert: Arc::new(move |value| convert(value).map(|v| v.to_field_value())),
        }
    }

    /// Ignore the input and always produce `value`.
    pub fn constant<T: SeedType>(value: T) -> Self {
        let value = value.to_field_value();
        Self {
            convert: Arc::new(move |_| Ok(value.clone())),
        }
    }
}

impl TypeTransformation for CustomTypeTransformation {
    fn transform(&self, value: &str, _target: &TypeDescriptor) -> Result<FieldValue, TransformError> {
        (self.convert)(value)
    }
}

impl fmt::Debug for CustomTypeTransformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomTypeTransformation")
    }
}

/// Where the active registration for a type came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    BuiltIn,
    Custom,
}

#[derive(Clone)]
struct Registration {
    transformation: Arc<dyn TypeTransformation>,
    origin: Origin,
}

/// A custom registration, kept until the registry is assembled.
#[derive(Clone)]
pub struct TransformationOverride {
    pub type_key: &'static str,
    pub transformation: Arc<dyn TypeTransformation>,
}

impl TransformationOverride {
    pub fn for_type<T: SeedType>(transformation: impl TypeTransformation + 'static) -> Self {
        Self {
            type_key: T::descriptor().underlying().name,
            transformation: Arc::new(transformation),
        }
    }

    pub fn for_enums(transformation: impl TypeTransformation + 'static) -> Self {
        Self {
            type_key: ENUM_TYPE_KEY,
            transformation: Arc::new(transformation),
        }
    }
}

impl fmt::Debug for TransformationOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformationOverride")
            .field("type_key", &self.type_key)
            .finish()
    }
}

/// Registry of transformations keyed by canonical type name
#[derive(Clone, Default)]
pub struct TypeTransformationRegistry {
    transformations: HashMap<&'static str, Registration>,
}

impl TypeTransformationRegistry {
    /// Create an empty registry (no built-ins).
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in transformations, using default settings.
    pub fn with_builtins() -> Self {
        Self::from_settings(&SeederSettings::default())
    }

    /// Registry with the built-in transformations configured by `settings`.
    pub fn from_settings(settings: &SeederSettings) -> Self {
        let format = NumberFormat::new(settings.decimal_separator);
        let date_time = Arc::new(DateTimeTransformation::new(
            settings.datetime_formats.clone(),
            settings.date_formats.clone(),
        ));
        let integer = Arc::new(IntegerTransformation);
        let float = Arc::new(FloatTransformation::new(format));

        let mut registry = Self::new();
        for key in [
            i8::descriptor().name,
            i16::descriptor().name,
            i32::descriptor().name,
            i64::descriptor().name,
        ] {
            registry.insert(key, integer.clone(), Origin::BuiltIn);
        }
        registry.insert(f32::descriptor().name, float.clone(), Origin::BuiltIn);
        registry.insert(f64::descriptor().name, float, Origin::BuiltIn);
        registry.insert(
            Decimal::descriptor().name,
            Arc::new(DecimalTransformation::new(format)),
            Origin::BuiltIn,
        );
        registry.insert(bool::descriptor().name, Arc::new(BooleanTransformation), Origin::BuiltIn);
        registry.insert(NaiveDate::descriptor().name, date_time.clone(), Origin::BuiltIn);
        registry.insert(NaiveDateTime::descriptor().name, date_time, Origin::BuiltIn);
        registry.insert(String::descriptor().name, Arc::new(StringTransformation), Origin::BuiltIn);
        registry.insert(ENUM_TYPE_KEY, Arc::new(EnumTransformation), Origin::BuiltIn);
        registry
    }

    fn insert(&mut self, key: &'static str, transformation: Arc<dyn TypeTransformation>, origin: Origin) {
        self.transformations.insert(
            key,
            Registration {
                transformation,
                origin,
            },
        );
    }

    /// Register a custom transformation for `T`, replacing any previous one.
    ///
    /// Registering for `Option<T>` registers for `T`.
    pub fn register<T: SeedType>(&mut self, transformation: impl TypeTransformation + 'static) {
        self.apply(TransformationOverride::for_type::<T>(transformation));
    }

    /// Replace the transformation shared by all enum types.
    pub fn register_enum(&mut self, transformation: impl TypeTransformation + 'static) {
        self.apply(TransformationOverride::for_enums(transformation));
    }

    pub fn apply(&mut self, registration: TransformationOverride) {
        tracing::debug!("Registering custom transformation for '{}'", registration.type_key);
        self.insert(registration.type_key, registration.transformation, Origin::Custom);
    }

    /// Copy of this registry with `overrides` layered on top.
    pub fn with_overrides(&self, overrides: &[TransformationOverride]) -> Self {
        let mut registry = self.clone();
        for registration in overrides {
            registry.apply(registration.clone());
        }
        registry
    }

    /// Find the transformation for a property type.
    ///
    /// `Option<T>` resolves like `T`. Enums resolve to their own registration
    /// if there is one, otherwise to the shared enum transformation.
    pub fn resolve(&self, descriptor: &TypeDescriptor) -> Result<Arc<dyn TypeTransformation>, PropertyFault> {
        let relevant = descriptor.underlying();

        let registration = self.transformations.get(relevant.name).or_else(|| {
            if relevant.is_enum() {
                self.transformations.get(ENUM_TYPE_KEY)
            } else {
                None
            }
        });

        registration
            .map(|r| r.transformation.clone())
            .ok_or(PropertyFault::UnsupportedType {
                type_name: relevant.name,
            })
    }

    /// Convert `value` for a property of type `descriptor`.
    pub fn transform(&self, value: &str, descriptor: &TypeDescriptor) -> Result<FieldValue, PropertyFault> {
        let transformation = self.resolve(descriptor)?;
        Ok(transformation.transform(value, descriptor.underlying())?)
    }

    /// Whether the active registration for `T` was supplied by the caller.
    pub fn is_overridden<T: SeedType>(&self) -> bool {
        self.origin(T::descriptor().underlying().name) == Some(Origin::Custom)
    }

    pub fn origin(&self, type_key: &str) -> Option<Origin> {
        self.transformations.get(type_key).map(|r| r.origin)
    }

    /// Names of all registered types
    pub fn type_keys(&self) -> Vec<&'static str> {
        self.transformations.keys().copied().collect()
    }
}

impl fmt::Debug for TypeTransformationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys = self.type_keys();
        keys.sort_unstable();
        f.debug_struct("TypeTransformationRegistry")
            .field("types", &keys)
            .finish()
    }
}
