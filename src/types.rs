//! Property type descriptors and the conversions between Rust values and
//! [`FieldValue`].
//!
//! Every property type an entity exposes implements [`SeedType`]. The
//! descriptor's name is the canonical identity the transformation registry is
//! keyed by; its kind tells the registry how to unwrap it.

use crate::entity::FieldValue;
use crate::error::AssignError;
use crate::record::Seedable;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;

/// Canonical identity of a property type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub name: &'static str,
    pub kind: TypeKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Value,
    /// `Option<T>`; resolves to the inner type's transformation.
    Nullable(Box<TypeDescriptor>),
    Enum { variants: &'static [&'static str] },
    /// Identity of another seeded entity, converted like `key`.
    Reference {
        entity: &'static str,
        key: Box<TypeDescriptor>,
    },
}

impl TypeDescriptor {
    pub fn value<T: ?Sized>() -> Self {
        Self {
            name: type_name::<T>(),
            kind: TypeKind::Value,
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self.kind, TypeKind::Nullable(_))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.kind, TypeKind::Enum { .. })
    }

    /// The descriptor with any `Option` wrappers removed.
    pub fn underlying(&self) -> &TypeDescriptor {
        match &self.kind {
            TypeKind::Nullable(inner) => inner.underlying(),
            _ => self,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A Rust type that can be the type of a seedable property.
pub trait SeedType: Sized {
    fn descriptor() -> TypeDescriptor;

    fn from_field_value(value: FieldValue) -> Result<Self, AssignError>;

    fn to_field_value(&self) -> FieldValue;
}

fn mismatch<T>(value: &FieldValue) -> AssignError {
    match value {
        FieldValue::Null => AssignError::NullNotAllowed {
            target: type_name::<T>(),
        },
        other => AssignError::TypeMismatch {
            expected: type_name::<T>(),
            found: other.kind().to_string(),
        },
    }
}

macro_rules! integer_seed_type {
    ($($t:ty),*) => {
        $(
            impl SeedType for $t {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::value::<$t>()
                }

                fn from_field_value(value: FieldValue) -> Result<Self, AssignError> {
                    let converted = match &value {
                        FieldValue::Int(i) => <$t>::try_from(*i).ok(),
                        FieldValue::UInt(u) => <$t>::try_from(*u).ok(),
                        _ => return Err(mismatch::<$t>(&value)),
                    };
                    converted.ok_or_else(|| AssignError::OutOfRange {
                        value: value.to_string(),
                        target: type_name::<$t>(),
                    })
                }

                fn to_field_value(&self) -> FieldValue {
                    match i64::try_from(*self) {
                        Ok(i) => FieldValue::Int(i),
                        Err(_) => FieldValue::UInt(*self as u64),
                    }
                }
            }
        )*
    };
}

integer_seed_type!(i8, i16, i32, i64, u8, u16, u32, u64);

impl SeedType for f64 {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::value::<f64>()
    }

    fn from_field_value(value: FieldValue) -> Result<Self, AssignError> {
        match value {
            FieldValue::Float(f) => Ok(f),
            FieldValue::Int(i) => Ok(i as f64),
            other => Err(mismatch::<f64>(&other)),
        }
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Float(*self)
    }
}

impl SeedType for f32 {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::value::<f32>()
    }

    fn from_field_value(value: FieldValue) -> Result<Self, AssignError> {
        match value {
            FieldValue::Float(f) if f.is_finite() && f.abs() > f32::MAX as f64 => {
                Err(AssignError::OutOfRange {
                    value: f.to_string(),
                    target: "f32",
                })
            }
            FieldValue::Float(f) => Ok(f as f32),
            FieldValue::Int(i) => Ok(i as f32),
            other => Err(mismatch::<f32>(&other)),
        }
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Float(f64::from(*self))
    }
}

impl SeedType for Decimal {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::value::<Decimal>()
    }

    fn from_field_value(value: FieldValue) -> Result<Self, AssignError> {
        match value {
            FieldValue::Decimal(d) => Ok(d),
            FieldValue::Int(i) => Ok(Decimal::from(i)),
            other => Err(mismatch::<Decimal>(&other)),
        }
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Decimal(*self)
    }
}

impl SeedType for bool {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::value::<bool>()
    }

    fn from_field_value(value: FieldValue) -> Result<Self, AssignError> {
        match value {
            FieldValue::Bool(b) => Ok(b),
            other => Err(mismatch::<bool>(&other)),
        }
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Bool(*self)
    }
}

impl SeedType for String {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::value::<String>()
    }

    fn from_field_value(value: FieldValue) -> Result<Self, AssignError> {
        match value {
            FieldValue::String(s) => Ok(s),
            other => Err(mismatch::<String>(&other)),
        }
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::String(self.clone())
    }
}

impl SeedType for NaiveDateTime {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::value::<NaiveDateTime>()
    }

    fn from_field_value(value: FieldValue) -> Result<Self, AssignError> {
        match value {
            FieldValue::DateTime(dt) => Ok(dt),
            other => Err(mismatch::<NaiveDateTime>(&other)),
        }
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::DateTime(*self)
    }
}

impl SeedType for NaiveDate {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::value::<NaiveDate>()
    }

    fn from_field_value(value: FieldValue) -> Result<Self, AssignError> {
        match value {
            FieldValue::DateTime(dt) => Ok(dt.date()),
            other => Err(mismatch::<NaiveDate>(&other)),
        }
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::DateTime(self.and_time(chrono::NaiveTime::MIN))
    }
}

impl<T: SeedType> SeedType for Option<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor {
            name: type_name::<Option<T>>(),
            kind: TypeKind::Nullable(Box::new(T::descriptor())),
        }
    }

    fn from_field_value(value: FieldValue) -> Result<Self, AssignError> {
        match value {
            FieldValue::Null => Ok(None),
            other => T::from_field_value(other).map(Some),
        }
    }

    fn to_field_value(&self) -> FieldValue {
        match self {
            Some(v) => v.to_field_value(),
            None => FieldValue::Null,
        }
    }
}

/// Reference to another seeded entity by its identity.
///
/// The raw value is converted like `K`, and the referenced entity must already
/// be in the repository when the referencing record is built.
pub struct Ref<T, K = i64> {
    pub id: K,
    entity: PhantomData<fn() -> T>,
}

impl<T, K> Ref<T, K> {
    pub fn new(id: K) -> Self {
        Self {
            id,
            entity: PhantomData,
        }
    }
}

impl<T, K: Default> Default for Ref<T, K> {
    fn default() -> Self {
        Self::new(K::default())
    }
}

impl<T, K: Clone> Clone for Ref<T, K> {
    fn clone(&self) -> Self {
        Self::new(self.id.clone())
    }
}

impl<T, K: PartialEq> PartialEq for Ref<T, K> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T, K: fmt::Debug> fmt::Debug for Ref<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Ref").field(&self.id).finish()
    }
}

impl<T: Seedable, K: SeedType> SeedType for Ref<T, K> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor {
            name: type_name::<Ref<T, K>>(),
            kind: TypeKind::Reference {
                entity: T::TYPE_NAME,
                key: Box::new(K::descriptor()),
            },
        }
    }

    fn from_field_value(value: FieldValue) -> Result<Self, AssignError> {
        K::from_field_value(value).map(Ref::new)
    }

    fn to_field_value(&self) -> FieldValue {
        self.id.to_field_value()
    }
}

/// Implements [`SeedType`] for a fieldless enum.
///
/// Values are converted by the shared enum transformation unless a
/// transformation was registered for the concrete enum type.
///
/// ```
/// #[derive(Debug, Clone, Copy, Default, PartialEq)]
/// pub enum Status {
///     #[default]
///     Active,
///     Retired,
/// }
///
/// seedbed::seed_enum!(Status { Active, Retired });
/// ```
#[macro_export]
macro_rules! seed_enum {
    ($ty:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::SeedType for $ty {
            fn descriptor() -> $crate::TypeDescriptor {
                const VARIANTS: &[&str] = &[$(stringify!($variant)),+];
                $crate::TypeDescriptor {
                    name: ::std::any::type_name::<$ty>(),
                    kind: $crate::TypeKind::Enum { variants: VARIANTS },
                }
            }

            fn from_field_value(
                value: $crate::FieldValue,
            ) -> ::std::result::Result<Self, $crate::AssignError> {
                match &value {
                    $crate::FieldValue::Enum(name) => match name.as_str() {
                        $(stringify!($variant) => Ok($ty::$variant),)+
                        _ => Err($crate::AssignError::TypeMismatch {
                            expected: ::std::any::type_name::<$ty>(),
                            found: format!("variant '{}'", name),
                        }),
                    },
                    $crate::FieldValue::Null => Err($crate::AssignError::NullNotAllowed {
                        target: ::std::any::type_name::<$ty>(),
                    }),
                    other => Err($crate::AssignError::TypeMismatch {
                        expected: ::std::any::type_name::<$ty>(),
                        found: other.kind().to_string(),
                    }),
                }
            }

            fn to_field_value(&self) -> $crate::FieldValue {
                let name = match self {
                    $($ty::$variant => stringify!($variant),)+
                };
                $crate::FieldValue::Enum(name.to_string())
            }
        }
    };
}
