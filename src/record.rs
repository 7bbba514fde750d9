//! Typed records: the destination side of a transformation.
//!
//! A [`Seedable`] type exposes a static table of [`Property`] entries (name,
//! declared type, getter, setter). The object builder only ever goes through
//! that table, so it works the same for macro-generated and hand-written
//! implementations.

use crate::entity::FieldValue;
use crate::error::AssignError;
use crate::types::TypeDescriptor;
use convert_case::{Case, Casing};
use std::any::Any;
use std::fmt;

/// One named property of a seedable type.
pub struct Property<T> {
    pub name: &'static str,
    pub descriptor: fn() -> TypeDescriptor,
    pub get: fn(&T) -> FieldValue,
    pub set: fn(&mut T, FieldValue) -> Result<(), AssignError>,
    pub writable: bool,
}

impl<T> Property<T> {
    /// Store `value`, failing for read-only properties.
    pub fn assign(&self, entity: &mut T, value: FieldValue) -> Result<(), AssignError> {
        if !self.writable {
            return Err(AssignError::NotWritable);
        }
        (self.set)(entity, value)
    }
}

impl<T> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("type", &(self.descriptor)().name)
            .field("writable", &self.writable)
            .finish()
    }
}

/// A destination type for seeded records.
///
/// Usually implemented with [`seedable!`](crate::seedable).
pub trait Seedable: Default + Clone + fmt::Debug + 'static {
    /// Canonical type identity, matched against [`crate::EntityData::entity_name`].
    const TYPE_NAME: &'static str;

    fn properties() -> &'static [Property<Self>];

    /// Look a property up by record field name.
    ///
    /// Exact names win; otherwise the snake_case form of `name` is tried, so a
    /// `MyInteger` column finds a `my_integer` field.
    fn property(name: &str) -> Option<&'static Property<Self>> {
        let properties = Self::properties();
        properties.iter().find(|p| p.name == name).or_else(|| {
            let snake = name.to_case(Case::Snake);
            properties.iter().find(|p| p.name == snake)
        })
    }
}

/// Type-erased view of a seeded instance, as handed to repositories.
pub trait SeedRecord: Any + fmt::Debug {
    fn entity_name(&self) -> &'static str;

    /// Current value of the named property, `None` if there is no such property.
    fn property_value(&self, name: &str) -> Option<FieldValue>;

    fn as_any(&self) -> &dyn Any;

    fn clone_record(&self) -> Box<dyn SeedRecord>;
}

impl<T: Seedable> SeedRecord for T {
    fn entity_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn property_value(&self, name: &str) -> Option<FieldValue> {
        T::property(name).map(|p| (p.get)(self))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_record(&self) -> Box<dyn SeedRecord> {
        Box::new(self.clone())
    }
}

impl dyn SeedRecord {
    pub fn downcast_ref<T: Seedable>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Implements [`Seedable`] for a struct by listing its seedable fields.
///
/// The canonical type name defaults to `module_path!()::TypeName`; pass
/// `as "name"` to choose another one.
///
/// ```
/// use seedbed::seedable;
///
/// #[derive(Debug, Clone, Default)]
/// pub struct Customer {
///     pub id: i32,
///     pub name: String,
///     pub nickname: Option<String>,
/// }
///
/// seedable!(Customer as "shop::Customer" {
///     id: i32,
///     name: String,
///     nickname: Option<String>,
/// });
/// ```
#[macro_export]
macro_rules! seedable {
    ($ty:ident { $($field:ident : $fty:ty),* $(,)? }) => {
        $crate::seedable!(@impl $ty, concat!(module_path!(), "::", stringify!($ty)), { $($field : $fty),* });
    };
    ($ty:ident as $name:literal { $($field:ident : $fty:ty),* $(,)? }) => {
        $crate::seedable!(@impl $ty, $name, { $($field : $fty),* });
    };
    (@impl $ty:ident, $name:expr, { $($field:ident : $fty:ty),* }) => {
        impl $crate::Seedable for $ty {
            const TYPE_NAME: &'static str = $name;

            fn properties() -> &'static [$crate::Property<Self>] {
                const PROPERTIES: &[$crate::Property<$ty>] = &[
                    $(
                        $crate::Property {
                            name: stringify!($field),
                            descriptor: <$fty as $crate::SeedType>::descriptor,
                            get: |entity: &$ty| $crate::SeedType::to_field_value(&entity.$field),
                            set: |entity: &mut $ty, value: $crate::FieldValue| {
                                entity.$field = <$fty as $crate::SeedType>::from_field_value(value)?;
                                Ok(())
                            },
                            writable: true,
                        },
                    )*
                ];
                PROPERTIES
            }
        }
    };
}
