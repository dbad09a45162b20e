//! Document objects
//!
//! The central deployable resource: templates, pages, sections and blocks,
//! each holding an ordered sequence of [`DocumentContent`] nodes. Document
//! objects reference each other (nested blocks), display rules, and
//! variable structures, which makes them the usual roots of reference
//! validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::content::DocumentContent;
use super::object::{EntityKind, Metadata, MigrationObject, SkipOptions};
use super::refs::{CollectRefs, DisplayRuleRef, Ref, VariableStructureRef};
use super::units::{Size, TargetPath};

/// What a document object deploys as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentObjectType {
    Template,
    Page,
    Block,
    Section,
    Unsupported,
}

impl DocumentObjectType {
    /// Target folder name used by the interactive deployment flavor.
    pub fn interactive_folder(&self) -> Option<&'static str> {
        match self {
            DocumentObjectType::Template | DocumentObjectType::Page => Some("Templates"),
            DocumentObjectType::Block | DocumentObjectType::Section => Some("Blocks"),
            DocumentObjectType::Unsupported => None,
        }
    }
}

/// Type-specific deployment options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DocumentObjectOptions {
    #[serde(rename_all = "camelCase")]
    Page {
        #[serde(skip_serializing_if = "Option::is_none")]
        width: Option<Size>,
        #[serde(skip_serializing_if = "Option::is_none")]
        height: Option<Size>,
    },
}

/// A deployable document object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentObject {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub object_type: DocumentObjectType,
    #[serde(default)]
    pub content: Vec<DocumentContent>,
    /// Internal objects are referenced by others but never deployed
    /// directly.
    #[serde(default)]
    pub internal: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_folder: Option<TargetPath>,
    #[serde(default)]
    pub origin_locations: Vec<String>,
    #[serde(default)]
    pub custom_fields: BTreeMap<String, String>,
    pub created: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_rule_ref: Option<DisplayRuleRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_structure_ref: Option<VariableStructureRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<DocumentObjectOptions>,
    #[serde(default)]
    pub skip: SkipOptions,
    #[serde(default)]
    pub metadata: Metadata,
}

impl DocumentObject {
    pub fn new(id: impl Into<String>, object_type: DocumentObjectType) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: None,
            object_type,
            content: Vec::new(),
            internal: false,
            target_folder: None,
            origin_locations: Vec::new(),
            custom_fields: BTreeMap::new(),
            created: now,
            last_updated: now,
            display_rule_ref: None,
            variable_structure_ref: None,
            base_template: None,
            options: None,
            skip: SkipOptions::default(),
            metadata: Metadata::new(),
        }
    }
}

impl MigrationObject for DocumentObject {
    const KIND: EntityKind = EntityKind::DocumentObject;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl CollectRefs for DocumentObject {
    fn collect_refs(&self) -> Vec<Ref> {
        let mut refs: Vec<Ref> = self.content.iter().flat_map(CollectRefs::collect_refs).collect();
        if let Some(rule) = &self.display_rule_ref {
            refs.push(Ref::DisplayRule(rule.clone()));
        }
        if let Some(structure) = &self.variable_structure_ref {
            refs.push(Ref::VariableStructure(structure.clone()));
        }
        refs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::refs::DocumentObjectRef;

    #[test]
    fn content_refs_come_before_own_refs() {
        let mut block = DocumentObject::new("b1", DocumentObjectType::Block);
        block.content = vec![DocumentContent::DocumentObjectRef(DocumentObjectRef::new("nested"))];
        block.display_rule_ref = Some(DisplayRuleRef::new("r1"));
        block.variable_structure_ref = Some(VariableStructureRef::new("vs1"));

        assert_eq!(
            block.collect_refs(),
            vec![
                Ref::DocumentObject(DocumentObjectRef::new("nested")),
                Ref::DisplayRule(DisplayRuleRef::new("r1")),
                Ref::VariableStructure(VariableStructureRef::new("vs1")),
            ]
        );
    }

    #[test]
    fn leaf_object_collects_nothing() {
        let block = DocumentObject::new("b1", DocumentObjectType::Block);
        assert!(block.collect_refs().is_empty());
    }
}
