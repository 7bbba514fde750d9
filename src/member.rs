//! Member selectors: typed descriptions of a property accessor.
//!
//! A selector is a small expression tree. It reduces to a property name when
//! its core is a parameter, member access, method call or array length,
//! reached through any number of conversion or invocation wrappers.

use crate::error::ConfigurationError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberSelector {
    Parameter(String),
    Member(String),
    /// Method call, reduces to the method name
    Call(String),
    ArrayLength,
    Convert(Box<MemberSelector>),
    Invoke(Box<MemberSelector>),
    /// Any other expression (constants, arithmetic, ...); never a member.
    Other(String),
}

impl MemberSelector {
    pub fn member(name: impl Into<String>) -> Self {
        MemberSelector::Member(name.into())
    }

    pub fn convert(self) -> Self {
        MemberSelector::Convert(Box::new(self))
    }

    pub fn invoke(self) -> Self {
        MemberSelector::Invoke(Box::new(self))
    }

    /// Reduce the selector to exactly one member name.
    pub fn member_name(&self) -> Result<String, ConfigurationError> {
        let mut current = self;
        loop {
            match current {
                MemberSelector::Parameter(name)
                | MemberSelector::Member(name)
                | MemberSelector::Call(name) => return Ok(name.clone()),
                MemberSelector::ArrayLength => return Ok("Length".to_string()),
                MemberSelector::Convert(inner) | MemberSelector::Invoke(inner) => current = &**inner,
                MemberSelector::Other(_) => return Err(ConfigurationError::NotAMemberSelector),
            }
        }
    }
}

impl fmt::Display for MemberSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberSelector::Parameter(name) => write!(f, "{}", name),
            MemberSelector::Member(name) => write!(f, "x.{}", name),
            MemberSelector::Call(name) => write!(f, "x.{}()", name),
            MemberSelector::ArrayLength => write!(f, "x.len()"),
            MemberSelector::Convert(inner) => write!(f, "({}) as _", inner),
            MemberSelector::Invoke(inner) => write!(f, "({})()", inner),
            MemberSelector::Other(expr) => write!(f, "{}", expr),
        }
    }
}

/// Build a [`MemberSelector`] for a field, checked at compile time.
///
/// ```
/// #[derive(Default)]
/// struct Customer {
///     id: i32,
/// }
///
/// let selector = seedbed::member!(Customer, id);
/// assert_eq!(selector.member_name().unwrap(), "id");
/// ```
#[macro_export]
macro_rules! member {
    ($ty:ty, $field:ident) => {{
        let _ = |entity: &$ty| {
            let _ = &entity.$field;
        };
        $crate::MemberSelector::Member(stringify!($field).to_string())
    }};
}
