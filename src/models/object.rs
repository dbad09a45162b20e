//! Common surface of every top-level migration object
//!
//! Every resource produced by a migration script (document objects, styles,
//! variables, rules, assets) shares the same envelope: a project-unique id,
//! an optional display name, provenance locations, free-form custom fields,
//! and timestamps maintained by the repository layer.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The closed set of migration-object kinds stored in the relational model.
///
/// Each kind maps to one table in the backing store and one repository
/// instance per project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    DocumentObject,
    Variable,
    TextStyle,
    ParagraphStyle,
    VariableStructure,
    DisplayRule,
    Image,
    File,
    Attachment,
}

impl EntityKind {
    /// All kinds, in the order `validate_all` walks them.
    pub const ALL: [EntityKind; 9] = [
        EntityKind::DocumentObject,
        EntityKind::Variable,
        EntityKind::TextStyle,
        EntityKind::ParagraphStyle,
        EntityKind::VariableStructure,
        EntityKind::DisplayRule,
        EntityKind::Image,
        EntityKind::File,
        EntityKind::Attachment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::DocumentObject => "document_object",
            EntityKind::Variable => "variable",
            EntityKind::TextStyle => "text_style",
            EntityKind::ParagraphStyle => "paragraph_style",
            EntityKind::VariableStructure => "variable_structure",
            EntityKind::DisplayRule => "display_rule",
            EntityKind::Image => "image",
            EntityKind::File => "file",
            EntityKind::Attachment => "attachment",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared accessors implemented by every top-level migration object.
pub trait MigrationObject: Clone + Serialize + DeserializeOwned + Send {
    /// The entity kind this model persists as.
    const KIND: EntityKind;

    fn id(&self) -> &str;

    fn name(&self) -> Option<&str>;

    /// Display name when present and non-blank, raw id otherwise.
    fn name_or_id(&self) -> &str {
        match self.name() {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.id(),
        }
    }
}

/// A single typed metadata value.
///
/// The composition engine's metadata store is typed, so the discriminator is
/// preserved through the JSON payload rather than collapsing everything to
/// strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum MetadataValue {
    String(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Datetime(chrono::DateTime<chrono::Utc>),
}

/// Metadata attached to deployable objects, keyed by metadata field name.
pub type Metadata = BTreeMap<String, Vec<MetadataValue>>;

/// Marker recording that migration intentionally omits an object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipOptions {
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SkipOptions {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self { skipped: true, placeholder: None, reason: Some(reason.into()) }
    }
}
