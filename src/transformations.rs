//! Built-in transformations for the closed default type set.
//!
//! Number and date conventions are fixed by [`SeederSettings`], never taken
//! from the ambient locale.

use crate::entity::FieldValue;
use crate::error::TransformError;
use crate::settings::SeederSettings;
use crate::transform_registry::TypeTransformation;
use crate::types::{TypeDescriptor, TypeKind};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::borrow::Cow;
use std::num::IntErrorKind;
use std::str::FromStr;

/// Decimal separator convention for floating point and decimal values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    pub decimal_separator: char,
}

impl NumberFormat {
    pub fn new(decimal_separator: char) -> Self {
        Self { decimal_separator }
    }

    /// Rewrite `value` into the `.`-separated form Rust parsers expect.
    /// A literal `.` is still accepted as decimal point.
    fn normalize<'v>(&self, value: &'v str) -> Cow<'v, str> {
        let value = value.trim();
        if self.decimal_separator == '.' || !value.contains(self.decimal_separator) {
            Cow::Borrowed(value)
        } else {
            Cow::Owned(value.replace(self.decimal_separator, "."))
        }
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::new(',')
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerTransformation;

/// Value range of the built-in integer targets.
fn integer_bounds(type_name: &str) -> Option<(i64, i64)> {
    match type_name {
        "i8" => Some((i8::MIN.into(), i8::MAX.into())),
        "i16" => Some((i16::MIN.into(), i16::MAX.into())),
        "i32" => Some((i32::MIN.into(), i32::MAX.into())),
        _ => None,
    }
}

/// Parses decimal integers and checks them against the target's width.
impl TypeTransformation for IntegerTransformation {
    fn transform(&self, value: &str, target: &TypeDescriptor) -> Result<FieldValue, TransformError> {
        let out_of_range = || TransformError::OutOfRange {
            value: value.to_string(),
            target: target.name,
        };

        let parsed = value.trim().parse::<i64>().map_err(|e| match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => out_of_range(),
            _ => TransformError::invalid_format(value, "integer"),
        })?;

        match integer_bounds(target.name) {
            Some((min, max)) if parsed < min || parsed > max => Err(out_of_range()),
            _ => Ok(FieldValue::Int(parsed)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FloatTransformation {
    format: NumberFormat,
}

impl FloatTransformation {
    pub fn new(format: NumberFormat) -> Self {
        Self { format }
    }
}

impl TypeTransformation for FloatTransformation {
    fn transform(&self, value: &str, _target: &TypeDescriptor) -> Result<FieldValue, TransformError> {
        self.format
            .normalize(value)
            .parse::<f64>()
            .map(FieldValue::Float)
            .map_err(|_| TransformError::invalid_format(value, "floating point number"))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalTransformation {
    format: NumberFormat,
}

impl DecimalTransformation {
    pub fn new(format: NumberFormat) -> Self {
        Self { format }
    }
}

impl TypeTransformation for DecimalTransformation {
    fn transform(&self, value: &str, _target: &TypeDescriptor) -> Result<FieldValue, TransformError> {
        Decimal::from_str(&self.format.normalize(value))
            .map(FieldValue::Decimal)
            .map_err(|_| TransformError::invalid_format(value, "decimal"))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanTransformation;

impl TypeTransformation for BooleanTransformation {
    fn transform(&self, value: &str, _target: &TypeDescriptor) -> Result<FieldValue, TransformError> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            Ok(FieldValue::Bool(true))
        } else if trimmed.eq_ignore_ascii_case("false") {
            Ok(FieldValue::Bool(false))
        } else {
            Err(TransformError::invalid_format(value, "boolean"))
        }
    }
}

/// Parses dates and date-times with an ordered list of `chrono` formats.
///
/// Date-time formats are tried first; a plain date becomes midnight.
#[derive(Debug, Clone)]
pub struct DateTimeTransformation {
    datetime_formats: Vec<String>,
    date_formats: Vec<String>,
}

impl DateTimeTransformation {
    pub fn new(datetime_formats: Vec<String>, date_formats: Vec<String>) -> Self {
        Self {
            datetime_formats,
            date_formats,
        }
    }

    fn parse(&self, value: &str) -> Option<NaiveDateTime> {
        let value = value.trim();
        self.datetime_formats
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
            .or_else(|| {
                self.date_formats
                    .iter()
                    .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
                    .map(|date| date.and_time(chrono::NaiveTime::MIN))
            })
    }
}

impl Default for DateTimeTransformation {
    fn default() -> Self {
        let settings = SeederSettings::default();
        Self::new(settings.datetime_formats, settings.date_formats)
    }
}

impl TypeTransformation for DateTimeTransformation {
    fn transform(&self, value: &str, _target: &TypeDescriptor) -> Result<FieldValue, TransformError> {
        self.parse(value)
            .map(FieldValue::DateTime)
            .ok_or_else(|| TransformError::invalid_format(value, "date/time"))
    }
}

/// Passes the raw value through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringTransformation;

impl TypeTransformation for StringTransformation {
    fn transform(&self, value: &str, _target: &TypeDescriptor) -> Result<FieldValue, TransformError> {
        Ok(FieldValue::String(value.to_string()))
    }
}

/// Shared transformation for every enum type.
///
/// Accepts the variant name (exact, then ASCII case-insensitive) or the
/// variant's zero-based position.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumTransformation;

impl TypeTransformation for EnumTransformation {
    fn transform(&self, value: &str, target: &TypeDescriptor) -> Result<FieldValue, TransformError> {
        let TypeKind::Enum { variants } = &target.kind else {
            return Err(TransformError::Custom(format!(
                "'{}' is not an enum type",
                target.name
            )));
        };

        let trimmed = value.trim();
        let variant = variants
            .iter()
            .find(|v| **v == trimmed)
            .or_else(|| variants.iter().find(|v| v.eq_ignore_ascii_case(trimmed)))
            .or_else(|| trimmed.parse::<usize>().ok().and_then(|i| variants.get(i)));

        variant
            .map(|v| FieldValue::Enum(v.to_string()))
            .ok_or_else(|| TransformError::UnknownVariant {
                value: value.to_string(),
                enum_name: target.name,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SeedType;

    fn any_target() -> TypeDescriptor {
        i32::descriptor()
    }

    #[test]
    fn test_float_comma_decimal() {
        let t = FloatTransformation::default();
        assert_eq!(t.transform("123,12", &any_target()), Ok(FieldValue::Float(123.12)));
        assert_eq!(t.transform("123.12", &any_target()), Ok(FieldValue::Float(123.12)));
        assert!(t.transform("abc", &any_target()).is_err());
    }

    #[test]
    fn test_decimal_comma_decimal() {
        let t = DecimalTransformation::default();
        assert_eq!(
            t.transform("12,33", &any_target()),
            Ok(FieldValue::Decimal(Decimal::new(1233, 2)))
        );
    }

    #[test]
    fn test_decimal_point_format() {
        let t = FloatTransformation::new(NumberFormat::new('.'));
        assert_eq!(t.transform("0.5", &any_target()), Ok(FieldValue::Float(0.5)));
        assert!(t.transform("0,5", &any_target()).is_err());
    }

    #[test]
    fn test_integer_format_error() {
        let result = IntegerTransformation.transform("NotANumber", &any_target());
        assert_eq!(
            result,
            Err(TransformError::InvalidFormat {
                value: "NotANumber".to_string(),
                expected: "integer"
            })
        );
        assert_eq!(IntegerTransformation.transform(" 42 ", &any_target()), Ok(FieldValue::Int(42)));
    }

    #[test]
    fn test_integer_checks_target_width() {
        assert_eq!(
            IntegerTransformation.transform("99999999999", &i32::descriptor()),
            Err(TransformError::OutOfRange {
                value: "99999999999".to_string(),
                target: "i32"
            })
        );
        assert!(matches!(
            IntegerTransformation.transform("-129", &i8::descriptor()),
            Err(TransformError::OutOfRange { target: "i8", .. })
        ));
        assert_eq!(
            IntegerTransformation.transform("99999999999", &i64::descriptor()),
            Ok(FieldValue::Int(99_999_999_999))
        );
        assert!(matches!(
            IntegerTransformation.transform("99999999999999999999", &i64::descriptor()),
            Err(TransformError::OutOfRange { target: "i64", .. })
        ));
    }

    #[test]
    fn test_boolean_ignores_case() {
        assert_eq!(BooleanTransformation.transform("True", &any_target()), Ok(FieldValue::Bool(true)));
        assert_eq!(BooleanTransformation.transform("false", &any_target()), Ok(FieldValue::Bool(false)));
        assert!(BooleanTransformation.transform("yes", &any_target()).is_err());
    }

    #[test]
    fn test_date_time_formats() {
        let t = DateTimeTransformation::default();
        let expected = NaiveDate::from_ymd_opt(2016, 5, 3).unwrap();

        assert_eq!(
            t.transform("2016/05/03", &any_target()),
            Ok(FieldValue::DateTime(expected.and_hms_opt(0, 0, 0).unwrap()))
        );
        assert_eq!(
            t.transform("2016-05-03 14:30:00", &any_target()),
            Ok(FieldValue::DateTime(expected.and_hms_opt(14, 30, 0).unwrap()))
        );
        assert!(t.transform("03 May", &any_target()).is_err());
    }

    #[test]
    fn test_string_passes_through() {
        assert_eq!(
            StringTransformation.transform(" as is ", &any_target()),
            Ok(FieldValue::String(" as is ".to_string()))
        );
    }

    #[test]
    fn test_enum_by_name_and_index() {
        let target = TypeDescriptor {
            name: "Color",
            kind: TypeKind::Enum {
                variants: &["Red", "Green"],
            },
        };

        assert_eq!(EnumTransformation.transform("Green", &target), Ok(FieldValue::Enum("Green".to_string())));
        assert_eq!(EnumTransformation.transform("red", &target), Ok(FieldValue::Enum("Red".to_string())));
        assert_eq!(EnumTransformation.transform("1", &target), Ok(FieldValue::Enum("Green".to_string())));
        assert!(matches!(
            EnumTransformation.transform("Blue", &target),
            Err(TransformError::UnknownVariant { .. })
        ));
    }
}
