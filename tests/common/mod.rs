//! Shared fixtures for the integration tests

#![allow(dead_code)]

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use seedbed::{seed_enum, seedable, EntityData, EntityDataBuilder, Ref};
use std::sync::Once;

static TRACING: Once = Once::new();

/// Route `tracing` output to the test harness, filtered by `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityWithSimpleProperties {
    pub my_integer: i32,
    pub my_string: Option<String>,
    pub my_bool: bool,
    pub my_date_time: NaiveDateTime,
    pub my_double: f64,
    pub my_decimal: Decimal,
}

seedable!(EntityWithSimpleProperties as "fixtures::EntityWithSimpleProperties" {
    my_integer: i32,
    my_string: Option<String>,
    my_bool: bool,
    my_date_time: NaiveDateTime,
    my_double: f64,
    my_decimal: Decimal,
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityWithNotSupportedTypeProperty {
    pub uint_property: u32,
}

seedable!(EntityWithNotSupportedTypeProperty as "fixtures::EntityWithNotSupportedTypeProperty" {
    uint_property: u32,
});

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Membership {
    #[default]
    Basic,
    Premium,
    Lifetime,
}

seed_enum!(Membership { Basic, Premium, Lifetime });

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Member {
    pub id: i32,
    pub name: String,
    pub membership: Membership,
    pub upgrade: Option<Membership>,
}

seedable!(Member as "fixtures::Member" {
    id: i32,
    name: String,
    membership: Membership,
    upgrade: Option<Membership>,
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Loan {
    pub book: String,
    pub member: Ref<Member, i32>,
}

seedable!(Loan as "fixtures::Loan" { book: String, member: Ref<Member, i32> });

/// One simple entity with every column set.
pub fn simple_entity_data() -> EntityData {
    EntityDataBuilder::new(
        "fixtures::EntityWithSimpleProperties",
        &["MyInteger", "MyString", "MyBool", "MyDateTime", "MyDouble", "MyDecimal"],
    )
    .with_entity(&["1", "MyString 1", "true", "2016/05/03", "123,12", "12,33"])
    .build()
}

/// Simple entities with only `MyString` set.
pub fn strings_entity_data(values: &[&str]) -> EntityData {
    values
        .iter()
        .fold(
            EntityDataBuilder::new("fixtures::EntityWithSimpleProperties", &["MyString"]),
            |builder, value| builder.with_entity(&[*value]),
        )
        .build()
}

pub fn members() -> EntityData {
    EntityDataBuilder::new("fixtures::Member", &["Id", "Name", "Membership", "Upgrade"])
        .with_entity(&["1", "Ada", "Premium", ""])
        .with_entity(&["2", "Grace", "lifetime", "Premium"])
        .with_entity(&["3", "Linus", "0"])
        .build()
}

pub fn loans() -> EntityData {
    EntityDataBuilder::new("fixtures::Loan", &["Book", "Member"])
        .with_entity(&["The Art of Computer Programming", "1"])
        .with_entity(&["Structure and Interpretation", "3"])
        .build()
}
