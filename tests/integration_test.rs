//! Integration tests for ordered seeding, upserts and data providers

mod common;

use common::*;
use seedbed::{
    member, ConfigurationError, CustomTypeTransformation, DictionaryDataProvider, DocumentDataProvider,
    InMemoryRepository, MemberSelector, PropertyFault, SeedError, SeederConfiguration, SeederSettings,
};
use std::fs;
use tempfile::TempDir;

fn library() -> DictionaryDataProvider {
    DictionaryDataProvider::new(vec![loans(), members()])
}

#[test]
fn test_referenced_entity_seeded_first() {
    init_tracing();
    let mut repository = InMemoryRepository::new();

    let summary = SeederConfiguration::new()
        .with_data_provider(library())
        .with_repository(&mut repository)
        .for_entity_with::<Member>(|e| e.with_primary_key("id"))
        .for_entity::<Loan>()
        .create_seeder()
        .unwrap()
        .seed()
        .unwrap();

    assert_eq!(summary.total(), 5);
    assert_eq!(repository.entity_names(), vec!["fixtures::Member", "fixtures::Loan"]);

    let loans = repository.entities::<Loan>();
    assert_eq!(loans.len(), 2);
    assert_eq!(loans[1].member.id, 3);
}

#[test]
fn test_reference_to_unseeded_entity_fails() {
    init_tracing();
    let mut repository = InMemoryRepository::new();

    let err = SeederConfiguration::new()
        .with_data_provider(library())
        .with_repository(&mut repository)
        .for_entity::<Loan>()
        .for_entity_with::<Member>(|e| e.with_primary_key("id"))
        .create_seeder()
        .unwrap()
        .seed()
        .unwrap_err();

    let SeedError::PropertyTransformation(err) = err else {
        panic!("expected a property transformation error");
    };
    assert_eq!(err.field, "Member");
    assert_eq!(err.type_name, "fixtures::Loan");
    assert!(matches!(
        err.cause,
        PropertyFault::ReferenceNotFound { entity: "fixtures::Member", .. }
    ));
    assert_eq!(repository.count(), 0);
}

#[test]
fn test_enum_properties() {
    init_tracing();
    let mut repository = InMemoryRepository::new();

    SeederConfiguration::new()
        .with_data_provider(library())
        .with_repository(&mut repository)
        .for_entity::<Member>()
        .create_seeder()
        .unwrap()
        .seed()
        .unwrap();

    let members = repository.entities::<Member>();
    assert_eq!(members[0].membership, Membership::Premium);
    assert_eq!(members[0].upgrade, None);
    assert_eq!(members[1].membership, Membership::Lifetime);
    assert_eq!(members[1].upgrade, Some(Membership::Premium));
    assert_eq!(members[2].membership, Membership::Basic);
}

#[test]
fn test_shared_enum_transformation_override() {
    init_tracing();
    let mut shared = InMemoryRepository::new();
    let mut concrete = InMemoryRepository::new();

    SeederConfiguration::new()
        .with_data_provider(library())
        .with_repository(&mut shared)
        .add_enum_transformation(CustomTypeTransformation::constant(Membership::Lifetime))
        .for_entity::<Member>()
        .create_seeder()
        .unwrap()
        .seed()
        .unwrap();
    SeederConfiguration::new()
        .with_data_provider(library())
        .with_repository(&mut concrete)
        .add_enum_transformation(CustomTypeTransformation::constant(Membership::Lifetime))
        .for_entity_with::<Member>(|e| {
            e.add_type_transformation::<Membership>(CustomTypeTransformation::constant(Membership::Basic))
        })
        .create_seeder()
        .unwrap()
        .seed()
        .unwrap();

    let shared = shared.entities::<Member>();
    assert!(shared.iter().all(|m| m.membership == Membership::Lifetime));
    assert_eq!(shared[1].upgrade, Some(Membership::Lifetime));
    assert_eq!(shared[0].upgrade, None);

    let concrete = concrete.entities::<Member>();
    assert!(concrete.iter().all(|m| m.membership == Membership::Basic));
    assert_eq!(concrete[1].upgrade, Some(Membership::Basic));
}

#[test]
fn test_unknown_enum_variant() {
    init_tracing();
    let data = seedbed::EntityDataBuilder::new("fixtures::Member", &["Id", "Membership"])
        .with_entity(&["1", "Platinum"])
        .build();

    let err = SeederConfiguration::new()
        .with_data_provider(DictionaryDataProvider::new(vec![data]))
        .with_repository(InMemoryRepository::new())
        .for_entity::<Member>()
        .create_seeder()
        .unwrap()
        .seed()
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Transformation of Property 'Membership' of type 'fixtures::Member' to value 'Platinum' failed"
    );
}

#[test]
fn test_seeding_twice_upserts_with_primary_key() {
    init_tracing();
    let mut repository = InMemoryRepository::new();

    {
        let mut seeder = SeederConfiguration::new()
            .with_data_provider(library())
            .with_repository(&mut repository)
            .for_entity_with::<Member>(|e| e.with_primary_key_selector(member!(Member, id)))
            .for_entity::<Loan>()
            .create_seeder()
            .unwrap();

        seeder.seed().unwrap();
        let summary = seeder.seed().unwrap();
        assert_eq!(summary.entities[0].upserted, 3);
        assert_eq!(summary.entities[1].saved, 2);
    }

    assert_eq!(repository.count_of::<Member>(), 3);
    assert_eq!(repository.count_of::<Loan>(), 4);
}

#[test]
fn test_upsert_updates_existing_instance() {
    init_tracing();
    let mut repository = InMemoryRepository::new();
    let updated = seedbed::EntityDataBuilder::new("fixtures::Member", &["Id", "Name", "Membership"])
        .with_entity(&["1", "Ada Lovelace", "Lifetime"])
        .build();

    for data in [members(), updated] {
        SeederConfiguration::new()
            .with_data_provider(DictionaryDataProvider::new(vec![data]))
            .with_repository(&mut repository)
            .for_entity_with::<Member>(|e| e.with_primary_key("Id"))
            .create_seeder()
            .unwrap()
            .seed()
            .unwrap();
    }

    let members = repository.entities::<Member>();
    assert_eq!(members.len(), 3);
    assert_eq!(members[0].name, "Ada Lovelace");
    assert_eq!(members[0].membership, Membership::Lifetime);
}

#[test]
fn test_clear_removes_in_reverse_order() {
    init_tracing();
    let mut repository = InMemoryRepository::new();

    {
        let mut seeder = SeederConfiguration::new()
            .with_data_provider(library())
            .with_repository(&mut repository)
            .for_entity_with::<Member>(|e| e.with_primary_key("id"))
            .for_entity::<Loan>()
            .create_seeder()
            .unwrap();
        seeder.seed().unwrap();
        seeder.clear().unwrap();
    }

    assert_eq!(repository.count(), 0);
}

#[test]
fn test_entity_without_data_is_skipped() {
    init_tracing();
    let mut repository = InMemoryRepository::new();

    let summary = SeederConfiguration::new()
        .with_data_provider(DictionaryDataProvider::new(vec![members()]))
        .with_repository(&mut repository)
        .for_entity::<EntityWithSimpleProperties>()
        .for_entity::<Member>()
        .create_seeder()
        .unwrap()
        .seed()
        .unwrap();

    assert_eq!(summary.entities.len(), 1);
    assert_eq!(summary.entities[0].entity_name, "fixtures::Member");
    assert_eq!(repository.count_of::<EntityWithSimpleProperties>(), 0);
}

#[test]
fn test_missing_components() {
    let no_provider = SeederConfiguration::new()
        .with_repository(InMemoryRepository::new())
        .create_seeder()
        .unwrap_err();
    let no_repository = SeederConfiguration::new()
        .with_data_provider(library())
        .create_seeder()
        .unwrap_err();

    assert_eq!(no_provider.to_string(), "DataProvider");
    assert_eq!(no_repository.to_string(), "Repository");
}

#[test]
fn test_invalid_primary_keys() {
    let unknown = SeederConfiguration::new()
        .with_data_provider(library())
        .with_repository(InMemoryRepository::new())
        .for_entity_with::<Member>(|e| e.with_primary_key("member_number"))
        .create_seeder()
        .unwrap_err();
    let not_a_member = SeederConfiguration::new()
        .with_data_provider(library())
        .with_repository(InMemoryRepository::new())
        .for_entity_with::<Member>(|e| e.with_primary_key_selector(MemberSelector::Other("x => 42".to_string())))
        .create_seeder()
        .unwrap_err();

    assert!(matches!(
        unknown,
        SeedError::Configuration(ConfigurationError::UnknownPrimaryKey { entity: "fixtures::Member", .. })
    ));
    assert_eq!(not_a_member.to_string(), "not a proper member selector");
}

#[test]
fn test_document_provider_end_to_end() {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("01_members.yaml"),
        r#"
entity_name: fixtures::Member
objects:
  - Id: 1
    Name: Ada
    Membership: Premium
    Upgrade: ~
"#,
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("02_loans.json"),
        r#"{"entity_name": "fixtures::Loan", "objects": [{"Book": "Sketchpad", "Member": 1}]}"#,
    )
    .unwrap();

    let mut repository = InMemoryRepository::new();
    SeederConfiguration::new()
        .with_data_provider(DocumentDataProvider::new(temp_dir.path()))
        .with_repository(&mut repository)
        .for_entity_with::<Member>(|e| e.with_primary_key("id"))
        .for_entity::<Loan>()
        .create_seeder()
        .unwrap()
        .seed()
        .unwrap();

    assert_eq!(repository.entities::<Member>()[0].upgrade, None);
    assert_eq!(repository.entities::<Loan>()[0].book, "Sketchpad");
}

#[test]
fn test_documents_for_same_entity_are_all_seeded() {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("01_a.yaml"),
        "entity_name: fixtures::Member\nobjects:\n  - Id: 1\n    Name: Ada\n",
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("02_b.yaml"),
        "entity_name: fixtures::Member\nobjects:\n  - Id: 2\n    Name: Grace\n",
    )
    .unwrap();

    let mut repository = InMemoryRepository::new();
    let summary = SeederConfiguration::new()
        .with_data_provider(DocumentDataProvider::new(temp_dir.path()))
        .with_repository(&mut repository)
        .for_entity_with::<Member>(|e| e.with_primary_key("id"))
        .create_seeder()
        .unwrap()
        .seed()
        .unwrap();

    assert_eq!(summary.total(), 2);
    assert_eq!(repository.count_of::<Member>(), 2);
    let names: Vec<&str> = repository
        .entities::<Member>()
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(names, vec!["Ada", "Grace"]);
}

#[test]
fn test_settings_from_file() {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("seeder.yaml");
    fs::write(&path, "empty_string_marker: \"<empty>\"\ndecimal_separator: \".\"\n").unwrap();
    let settings = SeederSettings::load_from_file(&path).unwrap();

    let data = seedbed::EntityDataBuilder::new(
        "fixtures::EntityWithSimpleProperties",
        &["MyString", "MyDouble"],
    )
    .with_entity(&["<empty>", "1.5"])
    .build();
    let mut repository = InMemoryRepository::new();

    SeederConfiguration::new()
        .with_data_provider(DictionaryDataProvider::new(vec![data]))
        .with_repository(&mut repository)
        .with_settings(settings)
        .for_entity::<EntityWithSimpleProperties>()
        .create_seeder()
        .unwrap()
        .seed()
        .unwrap();

    let entity = repository.entities::<EntityWithSimpleProperties>()[0];
    assert_eq!(entity.my_string.as_deref(), Some(""));
    assert_eq!(entity.my_double, 1.5);
}
