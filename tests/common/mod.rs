#![allow(dead_code)]

use ormedm::core::PrimitiveKind;
use ormedm::metamodel::{Attribute, JoinColumnDef, ManagedType, Metamodel, Relationship};

pub const NAMESPACE: &str = "org.example.model";

pub const BUSINESS_PARTNER: &str = "org.example.BusinessPartner";
pub const ORGANIZATION: &str = "org.example.Organization";
pub const BUSINESS_PARTNER_ROLE: &str = "org.example.BusinessPartnerRole";
pub const BUSINESS_PARTNER_IMAGE: &str = "org.example.BusinessPartnerImage";
pub const ADMINISTRATIVE_DIVISION: &str = "org.example.AdministrativeDivision";
pub const POSTAL_ADDRESS: &str = "org.example.PostalAddressData";

fn string(name: &str, column: &str) -> Attribute {
    Attribute::basic(name, PrimitiveKind::String).column(column)
}

pub fn postal_address() -> ManagedType {
    ManagedType::embeddable(POSTAL_ADDRESS)
        .with_attribute(string("streetName", "Address.StreetName"))
        .with_attribute(string("cityName", "Address.CityName"))
        .with_attribute(string("postalCode", "Address.PostalCode"))
        .with_attribute(string("country", "Address.Country"))
}

pub fn business_partner() -> ManagedType {
    ManagedType::entity(BUSINESS_PARTNER)
        .with_attribute(string("id", "ID").key())
        .with_attribute(string("country", "Country"))
        .with_attribute(Attribute::embedded("address", POSTAL_ADDRESS))
        .with_attribute(Attribute::relationship(
            "roles",
            Relationship::one_to_many(BUSINESS_PARTNER_ROLE).mapped_by("businessPartner"),
        ))
        .with_attribute(Attribute::relationship(
            "image",
            Relationship::one_to_one(BUSINESS_PARTNER_IMAGE).join_column(JoinColumnDef::named("ImageID")),
        ))
}

pub fn organization() -> ManagedType {
    ManagedType::entity(ORGANIZATION)
        .extends(BUSINESS_PARTNER)
        .with_attribute(string("name1", "NameLine1"))
        .with_attribute(string("name2", "NameLine2"))
}

pub fn business_partner_role() -> ManagedType {
    ManagedType::entity(BUSINESS_PARTNER_ROLE)
        .with_attribute(string("businessPartnerID", "BusinessPartnerID").key())
        .with_attribute(string("roleCategory", "BusinessPartnerRole").key())
        .with_attribute(Attribute::relationship(
            "businessPartner",
            Relationship::many_to_one(BUSINESS_PARTNER)
                .required()
                .join_column(JoinColumnDef::named("BusinessPartnerID")),
        ))
}

pub fn business_partner_image() -> ManagedType {
    ManagedType::entity(BUSINESS_PARTNER_IMAGE)
        .with_attribute(string("id", "ID").key())
        .with_attribute(Attribute::basic("image", PrimitiveKind::Binary))
}

pub fn administrative_division() -> ManagedType {
    ManagedType::entity(ADMINISTRATIVE_DIVISION)
        .with_attribute(string("codePublisher", "CodePublisher").key())
        .with_attribute(string("codeID", "CodeID").key())
        .with_attribute(string("divisionCode", "DivisionCode").key())
        .with_attribute(string("parentCodeID", "ParentCodeID"))
        .with_attribute(string("parentDivisionCode", "ParentDivisionCode"))
        .with_attribute(Attribute::basic("area", PrimitiveKind::Int32).column("Area"))
        .with_attribute(Attribute::relationship(
            "parent",
            Relationship::many_to_one(ADMINISTRATIVE_DIVISION).join_columns(vec![
                JoinColumnDef::new("CodePublisher", "CodePublisher"),
                JoinColumnDef::new("ParentCodeID", "CodeID"),
                JoinColumnDef::new("ParentDivisionCode", "DivisionCode"),
            ]),
        ))
        .with_attribute(Attribute::relationship(
            "children",
            Relationship::one_to_many(ADMINISTRATIVE_DIVISION).mapped_by("parent"),
        ))
}

/// Business partners with roles, an image, an organization subtype,
/// an embedded postal address and self-referencing administrative
/// divisions.
pub fn model() -> Metamodel {
    Metamodel::new()
        .with_type(business_partner())
        .with_type(organization())
        .with_type(business_partner_role())
        .with_type(business_partner_image())
        .with_type(administrative_division())
        .with_type(postal_address())
}
