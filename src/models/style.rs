//! Text and paragraph styles
//!
//! Both style kinds share the same def-or-ref duality: a style either
//! carries a concrete definition or points at another style's id. Chains of
//! refs must bottom out at a definition (or a missing id); the deploy-time
//! resolver in [`crate::validation::styles`] follows them with a cycle
//! guard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::object::{EntityKind, MigrationObject};
use super::refs::{CollectRefs, ParagraphStyleRef, Ref, TextStyleRef};
use super::units::{Color, Size};

/// Vertical offset of a text run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuperOrSubscript {
    #[default]
    None,
    Superscript,
    Subscript,
}

/// Concrete text style attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyleDefinition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub strikethrough: bool,
    #[serde(default)]
    pub super_or_subscript: SuperOrSubscript,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interspacing: Option<Size>,
}

/// A text style's payload: concrete definition or indirection to another
/// text style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TextStyleDefOrRef {
    Definition(TextStyleDefinition),
    Ref(TextStyleRef),
}

/// A named, referencable text style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub origin_locations: Vec<String>,
    #[serde(default)]
    pub custom_fields: BTreeMap<String, String>,
    pub created: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub definition: TextStyleDefOrRef,
}

impl TextStyle {
    pub fn new(id: impl Into<String>, definition: TextStyleDefOrRef) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: None,
            origin_locations: Vec::new(),
            custom_fields: BTreeMap::new(),
            created: now,
            last_updated: now,
            definition,
        }
    }
}

impl MigrationObject for TextStyle {
    const KIND: EntityKind = EntityKind::TextStyle;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl CollectRefs for TextStyle {
    fn collect_refs(&self) -> Vec<Ref> {
        match &self.definition {
            TextStyleDefOrRef::Definition(_) => Vec::new(),
            TextStyleDefOrRef::Ref(r) => vec![Ref::TextStyle(r.clone())],
        }
    }
}

/// Paragraph alignment modes supported by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    #[default]
    Left,
    Right,
    Center,
    JustifyLeft,
    JustifyRight,
    JustifyCenter,
    JustifyBlock,
    JustifyWithMargins,
    JustifyBlockUniform,
}

/// Line spacing interpretation modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineSpacing {
    #[default]
    Additional,
    Exact,
    AtLeast,
    MultipleOf,
    ExactFromPreviousWithAdjustLegacy,
    ExactFromPreviousWithAdjust,
    ExactFromPrevious,
}

/// Tab stop alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabType {
    Left,
    Right,
    Center,
    DecimalWord,
    Decimal,
}

/// A single tab stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub position: Size,
    pub tab_type: TabType,
}

/// Tab stop configuration of a paragraph style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tabs {
    #[serde(default)]
    pub tabs: Vec<Tab>,
    #[serde(default)]
    pub use_outside_tabs: bool,
}

/// Concrete paragraph style attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyleDefinition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_indent: Option<Size>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_indent: Option<Size>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_tab_size: Option<Size>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_before: Option<Size>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_after: Option<Size>,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_line_indent: Option<Size>,
    #[serde(default)]
    pub line_spacing: LineSpacing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_with_next_paragraph: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tabs: Option<Tabs>,
}

/// A paragraph style's payload: concrete definition or indirection to
/// another paragraph style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ParagraphStyleDefOrRef {
    Definition(ParagraphStyleDefinition),
    Ref(ParagraphStyleRef),
}

/// A named, referencable paragraph style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub origin_locations: Vec<String>,
    #[serde(default)]
    pub custom_fields: BTreeMap<String, String>,
    pub created: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub definition: ParagraphStyleDefOrRef,
}

impl ParagraphStyle {
    pub fn new(id: impl Into<String>, definition: ParagraphStyleDefOrRef) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: None,
            origin_locations: Vec::new(),
            custom_fields: BTreeMap::new(),
            created: now,
            last_updated: now,
            definition,
        }
    }
}

impl MigrationObject for ParagraphStyle {
    const KIND: EntityKind = EntityKind::ParagraphStyle;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl CollectRefs for ParagraphStyle {
    fn collect_refs(&self) -> Vec<Ref> {
        match &self.definition {
            ParagraphStyleDefOrRef::Definition(_) => Vec::new(),
            ParagraphStyleDefOrRef::Ref(r) => vec![Ref::ParagraphStyle(r.clone())],
        }
    }
}
