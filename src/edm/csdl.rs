//! Serializable metadata documents handed to the protocol layer.

use serde::Serialize;

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CsdlProperty {
    pub name: String,
    #[serde(rename = "Type")]
    pub type_name: String,
    pub nullable: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub collection: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CsdlPropertyRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CsdlNavigationProperty {
    pub name: String,
    #[serde(rename = "Type")]
    pub type_name: String,
    #[serde(skip_serializing_if = "is_false")]
    pub collection: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner: Option<String>,
}

impl CsdlNavigationProperty {
    /// Unset nullability reads as nullable.
    pub fn is_nullable(&self) -> bool {
        self.nullable.unwrap_or(true)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CsdlEntityType {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_type: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub r#abstract: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<Vec<CsdlPropertyRef>>,
    pub properties: Vec<CsdlProperty>,
    pub navigation_properties: Vec<CsdlNavigationProperty>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CsdlComplexType {
    pub name: String,
    pub properties: Vec<CsdlProperty>,
    pub navigation_properties: Vec<CsdlNavigationProperty>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CsdlSchema {
    pub namespace: String,
    pub entity_types: Vec<CsdlEntityType>,
    pub complex_types: Vec<CsdlComplexType>,
}
