//! Variables and variable structures
//!
//! A variable models one piece of input data. A variable structure maps
//! variable ids to their paths in the external data backend and optionally
//! names the variable that selects the output language.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::object::{EntityKind, MigrationObject};
use super::refs::{CollectRefs, Ref, VariableRef};

/// Data type of a variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    #[default]
    String,
    Integer,
    Double,
    Boolean,
    DateTime,
    Date,
    Currency,
}

/// A single input-data variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub origin_locations: Vec<String>,
    #[serde(default)]
    pub custom_fields: BTreeMap<String, String>,
    pub created: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub data_type: DataType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl Variable {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: None,
            origin_locations: Vec::new(),
            custom_fields: BTreeMap::new(),
            created: now,
            last_updated: now,
            data_type: DataType::default(),
            default_value: None,
        }
    }
}

impl MigrationObject for Variable {
    const KIND: EntityKind = EntityKind::Variable;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl CollectRefs for Variable {
    fn collect_refs(&self) -> Vec<Ref> {
        // Variables have no outgoing references.
        Vec::new()
    }
}

/// Path of a variable in the external data backend, plus an optional
/// friendly name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariablePathData {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A mapping from variable ids to backend path descriptors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableStructure {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub origin_locations: Vec<String>,
    #[serde(default)]
    pub custom_fields: BTreeMap<String, String>,
    pub created: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    /// Variable id → backend path descriptor. Ordered map so reference
    /// collection is deterministic.
    #[serde(default)]
    pub structure: BTreeMap<String, VariablePathData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_variable: Option<VariableRef>,
}

impl VariableStructure {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: None,
            origin_locations: Vec::new(),
            custom_fields: BTreeMap::new(),
            created: now,
            last_updated: now,
            structure: BTreeMap::new(),
            language_variable: None,
        }
    }
}

impl MigrationObject for VariableStructure {
    const KIND: EntityKind = EntityKind::VariableStructure;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl CollectRefs for VariableStructure {
    fn collect_refs(&self) -> Vec<Ref> {
        let mut refs: Vec<Ref> = self
            .structure
            .keys()
            .map(|id| Ref::Variable(VariableRef::new(id.clone())))
            .collect();
        if let Some(language) = &self.language_variable {
            refs.push(Ref::Variable(language.clone()));
        }
        refs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_references_every_mapped_variable() {
        let mut structure = VariableStructure::new("vs1");
        structure.structure.insert(
            "v1".into(),
            VariablePathData { path: "Data.Client.Name".into(), name: Some("Name".into()) },
        );
        structure.structure.insert(
            "v2".into(),
            VariablePathData { path: "Data.Client.Surname".into(), name: None },
        );
        structure.language_variable = Some(VariableRef::new("lang"));

        assert_eq!(
            structure.collect_refs(),
            vec![
                Ref::Variable(VariableRef::new("v1")),
                Ref::Variable(VariableRef::new("v2")),
                Ref::Variable(VariableRef::new("lang")),
            ]
        );
    }
}
