mod common;

use common::*;
use ormedm::core::{ModelError, PrimitiveKind};
use ormedm::edm::{
    Cardinality, ElementNaming, JoinColumn, MetadataPostProcessor, NavigationProperty, Phase,
    SchemaRegistry,
};
use ormedm::metamodel::{Attribute, JoinColumnDef, ManagedType, Metamodel, Relationship, RelationshipKind};
use ormedm::MapperConfig;
use std::sync::Arc;

fn registry() -> SchemaRegistry {
    SchemaRegistry::new(&model(), MapperConfig::new(NAMESPACE)).unwrap()
}

fn navigation<'r>(registry: &'r SchemaRegistry, class: &str, name: &str) -> NavigationProperty<'r> {
    registry
        .structured_type(class)
        .unwrap()
        .navigation_property(name)
        .unwrap()
}

fn entity(class: &str) -> ManagedType {
    ManagedType::entity(class).with_attribute(Attribute::basic("id", PrimitiveKind::Int64).key().column("ID"))
}

#[test]
fn test_target_type_and_cardinality() {
    let registry = registry();

    let roles = navigation(&registry, BUSINESS_PARTNER, "roles");
    assert_eq!(roles.target_entity().unwrap().class_name(), BUSINESS_PARTNER_ROLE);
    assert_eq!(roles.cardinality().unwrap(), Cardinality::ToMany);
    assert_eq!(roles.join_cardinality(), RelationshipKind::OneToMany);
    assert!(roles.is_collection());
    assert_eq!(roles.nullable().unwrap(), None);

    let partner = navigation(&registry, BUSINESS_PARTNER_ROLE, "businessPartner");
    assert_eq!(partner.target_entity().unwrap().class_name(), BUSINESS_PARTNER);
    assert_eq!(partner.cardinality().unwrap(), Cardinality::ToOneRequired);
    assert_eq!(partner.nullable().unwrap(), Some(false));
    assert!(!partner.is_collection());

    let image = navigation(&registry, BUSINESS_PARTNER, "image");
    assert_eq!(image.cardinality().unwrap(), Cardinality::ToOneOptional);
    assert_eq!(image.nullable().unwrap(), Some(true));
}

#[test]
fn test_resolution_is_idempotent() {
    let registry = registry();
    let roles = navigation(&registry, BUSINESS_PARTNER, "roles");
    assert_eq!(roles.phase(), Phase::NameAssigned);

    let first = roles.join_columns().unwrap();
    assert_eq!(roles.phase(), Phase::FullyResolved);
    let second = roles.join_columns().unwrap();
    assert!(std::ptr::eq(first, second));

    let item = roles.edm_item().unwrap();
    assert_eq!(item, roles.edm_item().unwrap());
    assert_eq!(roles.partner_name().unwrap(), roles.partner_name().unwrap());
}

#[test]
fn test_many_to_one_infers_referenced_column_from_target_key() {
    let registry = registry();
    let partner = navigation(&registry, BUSINESS_PARTNER_ROLE, "businessPartner");
    assert_eq!(
        partner.join_columns().unwrap(),
        &[JoinColumn::new("BusinessPartnerID", "ID")]
    );
}

#[test]
fn test_one_to_one_infers_referenced_column_from_source_key() {
    let registry = registry();
    let image = navigation(&registry, BUSINESS_PARTNER, "image");
    assert_eq!(image.join_columns().unwrap(), &[JoinColumn::new("ImageID", "ID")]);
}

fn keyed(class: &str, column: &str) -> ManagedType {
    ManagedType::entity(class).with_attribute(Attribute::basic("id", PrimitiveKind::Int64).key().column(column))
}

fn two_sided_model(kind: RelationshipKind, column: JoinColumnDef) -> Metamodel {
    Metamodel::new()
        .with_type(keyed("org.example.A", "A_KEY").with_attribute(Attribute::relationship(
            "b",
            Relationship::new(kind, "org.example.B").join_column(column),
        )))
        .with_type(keyed("org.example.B", "B_KEY"))
}

fn inferred(kind: RelationshipKind, column: JoinColumnDef) -> JoinColumn {
    let registry = SchemaRegistry::new(&two_sided_model(kind, column), MapperConfig::default()).unwrap();
    let columns = navigation(&registry, "org.example.A", "b").join_columns().unwrap();
    assert_eq!(columns.len(), 1);
    columns[0].clone()
}

#[test]
fn test_referenced_column_inferred_from_one_side_key() {
    assert_eq!(
        inferred(RelationshipKind::OneToOne, JoinColumnDef::named("BID")),
        JoinColumn::new("BID", "A_KEY")
    );
    assert_eq!(
        inferred(RelationshipKind::OneToMany, JoinColumnDef::named("A_REF")),
        JoinColumn::new("A_REF", "A_KEY")
    );
    assert_eq!(
        inferred(RelationshipKind::ManyToOne, JoinColumnDef::named("BID")),
        JoinColumn::new("BID", "B_KEY")
    );
}

#[test]
fn test_local_column_inferred_from_one_side_key() {
    assert_eq!(
        inferred(RelationshipKind::ManyToOne, JoinColumnDef::new("", "X")),
        JoinColumn::new("B_KEY", "X")
    );
    assert_eq!(
        inferred(RelationshipKind::OneToOne, JoinColumnDef::new("", "X")),
        JoinColumn::new("A_KEY", "X")
    );
}

#[test]
fn test_inverse_side_copies_owning_columns() {
    let registry = registry();
    let roles = navigation(&registry, BUSINESS_PARTNER, "roles");
    assert_eq!(
        roles.join_columns().unwrap(),
        &[JoinColumn::new("BusinessPartnerID", "ID")]
    );
}

#[test]
fn test_inverse_side_resolves_owning_side_on_demand() {
    let model = Metamodel::new()
        .with_type(entity("org.example.Order").with_attribute(Attribute::relationship(
            "items",
            Relationship::one_to_many("org.example.Item").mapped_by("order"),
        )))
        .with_type(entity("org.example.Item").with_attribute(Attribute::relationship(
            "order",
            Relationship::many_to_one("org.example.Order").join_column(JoinColumnDef::new("OrderID", "")),
        )));
    let registry = SchemaRegistry::new(&model, MapperConfig::default()).unwrap();
    let items = navigation(&registry, "org.example.Order", "items");
    let order = navigation(&registry, "org.example.Item", "order");

    assert_eq!(items.join_columns().unwrap(), &[JoinColumn::new("OrderID", "ID")]);
    assert_eq!(order.phase(), Phase::FullyResolved);
    assert_eq!(items.partner_name().unwrap(), Some("Order"));
    assert_eq!(order.partner_name().unwrap(), Some("Items"));
}

#[test]
fn test_self_referencing_association() {
    let registry = registry();
    let children = navigation(&registry, ADMINISTRATIVE_DIVISION, "children");
    let parent = navigation(&registry, ADMINISTRATIVE_DIVISION, "parent");

    let expected = [
        JoinColumn::new("CodePublisher", "CodePublisher"),
        JoinColumn::new("ParentCodeID", "CodeID"),
        JoinColumn::new("ParentDivisionCode", "DivisionCode"),
    ];
    assert_eq!(children.join_columns().unwrap(), &expected);
    assert_eq!(parent.join_columns().unwrap(), &expected);

    assert_eq!(children.partner_name().unwrap(), Some("Parent"));
    assert_eq!(parent.partner_name().unwrap(), Some("Children"));
}

#[test]
fn test_partner_symmetry() {
    for start_with_owner in [true, false] {
        let registry = registry();
        let roles = navigation(&registry, BUSINESS_PARTNER, "roles");
        let partner = navigation(&registry, BUSINESS_PARTNER_ROLE, "businessPartner");
        if start_with_owner {
            partner.resolve().unwrap();
        } else {
            roles.resolve().unwrap();
        }

        assert_eq!(roles.partner().unwrap(), Some(partner));
        assert_eq!(partner.partner().unwrap(), Some(roles));
        assert_eq!(roles.partner_name().unwrap(), Some("BusinessPartner"));
        assert_eq!(partner.partner_name().unwrap(), Some("Roles"));
    }
}

struct RoleRenamer;

impl MetadataPostProcessor for RoleRenamer {
    fn process_navigation_property(&self, property: &mut ElementNaming<'_>, class_name: &str) {
        if class_name == BUSINESS_PARTNER && property.internal_name() == "roles" {
            property.set_external_name("RoleAssignment");
        }
    }
}

#[test]
fn test_partner_uses_post_processed_names() {
    let config = MapperConfig::new(NAMESPACE).post_processor(Arc::new(RoleRenamer));
    let registry = SchemaRegistry::build(&model(), config).unwrap();

    let partner = navigation(&registry, BUSINESS_PARTNER_ROLE, "businessPartner");
    assert_eq!(partner.partner_name().unwrap(), Some("RoleAssignment"));
    let roles = navigation(&registry, BUSINESS_PARTNER, "roles");
    assert_eq!(roles.external_name(), "RoleAssignment");
    assert_eq!(roles.partner_name().unwrap(), Some("BusinessPartner"));

    let item = partner.edm_item().unwrap();
    assert_eq!(item.partner.as_deref(), Some("RoleAssignment"));
    assert_eq!(item.type_name, "org.example.model.BusinessPartner");
}

#[test]
fn test_unidirectional_relationship_has_no_partner() {
    let registry = registry();
    let image = navigation(&registry, BUSINESS_PARTNER, "image");
    assert!(image.partner().unwrap().is_none());
    assert!(image.edm_item().unwrap().partner.is_none());
}

#[test]
fn test_second_implicit_column_rejected() {
    let model = Metamodel::new()
        .with_type(entity("org.example.Order").with_attribute(Attribute::relationship(
            "customer",
            Relationship::many_to_one("org.example.Customer").join_columns(vec![
                JoinColumnDef::named("CustomerID"),
                JoinColumnDef::named("CustomerRegion"),
            ]),
        )))
        .with_type(entity("org.example.Customer"));
    let registry = SchemaRegistry::new(&model, MapperConfig::default()).unwrap();

    let err = navigation(&registry, "org.example.Order", "customer")
        .join_columns()
        .unwrap_err();
    assert!(matches!(&err, ModelError::NotSupported(msg) if msg.contains("customer")));
}

#[test]
fn test_columns_without_any_name_rejected() {
    let model = Metamodel::new()
        .with_type(entity("org.example.Order").with_attribute(Attribute::relationship(
            "customer",
            Relationship::many_to_one("org.example.Customer")
                .join_columns(vec![JoinColumnDef::default(), JoinColumnDef::default()]),
        )))
        .with_type(entity("org.example.Customer"));

    let err = SchemaRegistry::build(&model, MapperConfig::default()).unwrap_err();
    assert!(matches!(err, ModelError::NotSupported(_)));
}

#[test]
fn test_inference_against_composite_key_rejected() {
    let model = Metamodel::new()
        .with_type(entity("org.example.Order").with_attribute(Attribute::relationship(
            "division",
            Relationship::many_to_one(ADMINISTRATIVE_DIVISION).join_column(JoinColumnDef::named("DivisionCode")),
        )))
        .with_type(administrative_division());
    let registry = SchemaRegistry::new(&model, MapperConfig::default()).unwrap();

    let err = navigation(&registry, "org.example.Order", "division")
        .join_columns()
        .unwrap_err();
    assert!(matches!(err, ModelError::NotSupported(_)));
}

#[test]
fn test_missing_target_type() {
    let model = Metamodel::new().with_type(entity("org.example.Order").with_attribute(
        Attribute::relationship("customer", Relationship::many_to_one("org.example.Customer")),
    ));
    let registry = SchemaRegistry::new(&model, MapperConfig::default()).unwrap();

    let customer = navigation(&registry, "org.example.Order", "customer");
    let err = customer.target_entity().unwrap_err();
    assert_eq!(
        err,
        ModelError::TargetTypeNotFound("customer".into(), "org.example.Customer".into())
    );
    // The failure is cached like a success.
    assert_eq!(customer.join_columns().unwrap_err(), err);
    assert_eq!(customer.phase(), Phase::FullyResolved);
}

#[test]
fn test_embeddable_target_rejected() {
    let model = Metamodel::new()
        .with_type(entity("org.example.Order").with_attribute(Attribute::relationship(
            "address",
            Relationship::many_to_one("org.example.Address").join_column(JoinColumnDef::new("AddressID", "ID")),
        )))
        .with_type(
            ManagedType::embeddable("org.example.Address")
                .with_attribute(Attribute::basic("city", PrimitiveKind::String)),
        );
    let registry = SchemaRegistry::new(&model, MapperConfig::default()).unwrap();

    let err = navigation(&registry, "org.example.Order", "address")
        .target_entity()
        .unwrap_err();
    assert_eq!(
        err,
        ModelError::TargetTypeNotFound("address".into(), "org.example.Address".into())
    );
    assert_eq!(
        SchemaRegistry::build(&model, MapperConfig::default()).unwrap_err(),
        err
    );
}

#[test]
fn test_mapped_by_not_found() {
    let model = Metamodel::new()
        .with_type(entity("org.example.Order").with_attribute(Attribute::relationship(
            "items",
            Relationship::one_to_many("org.example.Item").mapped_by("purchase"),
        )))
        .with_type(entity("org.example.Item"));
    let registry = SchemaRegistry::new(&model, MapperConfig::default()).unwrap();

    let err = navigation(&registry, "org.example.Order", "items").resolve().unwrap_err();
    assert_eq!(err, ModelError::MappedByNotFound("items".into(), "purchase".into()));
}

#[test]
fn test_mutually_mapped_sides_are_a_cycle() {
    let model = Metamodel::new()
        .with_type(entity("org.example.Person").with_attribute(Attribute::relationship(
            "passport",
            Relationship::one_to_one("org.example.Passport").mapped_by("holder"),
        )))
        .with_type(entity("org.example.Passport").with_attribute(Attribute::relationship(
            "holder",
            Relationship::one_to_one("org.example.Person").mapped_by("passport"),
        )));
    let registry = SchemaRegistry::new(&model, MapperConfig::default()).unwrap();

    let err = navigation(&registry, "org.example.Person", "passport")
        .join_columns()
        .unwrap_err();
    assert!(matches!(err, ModelError::CyclicResolution(_)));
}

#[test]
fn test_embeddable_source_gets_no_partner() {
    let model = Metamodel::new()
        .with_type(entity("org.example.Country"))
        .with_type(
            ManagedType::embeddable("org.example.Location").with_attribute(Attribute::relationship(
                "country",
                Relationship::many_to_one("org.example.Country").join_column(JoinColumnDef::new("CountryID", "ID")),
            )),
        );
    let registry = SchemaRegistry::new(&model, MapperConfig::default()).unwrap();

    let country = navigation(&registry, "org.example.Location", "country");
    assert_eq!(country.join_columns().unwrap(), &[JoinColumn::new("CountryID", "ID")]);
    assert!(country.partner().unwrap().is_none());
}

#[test]
fn test_quoted_db_identifiers_flow_into_inferred_columns() {
    let config = MapperConfig::new(NAMESPACE).quote_db_identifiers(true);
    let registry = SchemaRegistry::build(&model(), config).unwrap();
    let partner = navigation(&registry, BUSINESS_PARTNER_ROLE, "businessPartner");
    assert_eq!(
        partner.join_columns().unwrap(),
        &[JoinColumn::new("BusinessPartnerID", "\"ID\"")]
    );
}

#[test]
fn test_concurrent_resolution_yields_one_result() {
    let registry = registry();
    let addresses: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let roles = navigation(&registry, BUSINESS_PARTNER, "roles");
                    roles.join_columns().unwrap().as_ptr() as usize
                })
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });
    assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));
}
