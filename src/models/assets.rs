//! Binary assets: images, files, attachments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::object::{EntityKind, Metadata, MigrationObject, SkipOptions};
use super::refs::{CollectRefs, ImageRef, Ref};
use super::units::{Size, TargetPath};

/// Image formats recognized by the migration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageType {
    Bmp,
    Gif,
    Jpeg,
    Png,
    Tga,
    Tiff,
    Svg,
    #[default]
    Unknown,
}

impl ImageType {
    /// File extension for the type, if one is known.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            ImageType::Bmp => Some(".bmp"),
            ImageType::Gif => Some(".gif"),
            ImageType::Jpeg => Some(".jpg"),
            ImageType::Png => Some(".png"),
            ImageType::Tga => Some(".tga"),
            ImageType::Tiff => Some(".tiff"),
            ImageType::Svg => Some(".svg"),
            ImageType::Unknown => None,
        }
    }
}

/// Optional resize applied when the image is deployed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize_width: Option<Size>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize_height: Option<Size>,
}

/// A migrated image asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub origin_locations: Vec<String>,
    #[serde(default)]
    pub custom_fields: BTreeMap<String, String>,
    pub created: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
    #[serde(default)]
    pub image_type: ImageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<ImageOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_folder: Option<TargetPath>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub skip: SkipOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_text: Option<String>,
}

impl Image {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: None,
            origin_locations: Vec::new(),
            custom_fields: BTreeMap::new(),
            created: now,
            last_updated: now,
            source_path: None,
            image_type: ImageType::default(),
            options: None,
            target_folder: None,
            metadata: Metadata::new(),
            skip: SkipOptions::default(),
            alternate_text: None,
        }
    }
}

impl MigrationObject for Image {
    const KIND: EntityKind = EntityKind::Image;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl CollectRefs for Image {
    fn collect_refs(&self) -> Vec<Ref> {
        Vec::new()
    }
}

/// Non-image file formats carried along by the migration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileType {
    Html,
    Css,
    Text,
    Binary,
    #[default]
    Unknown,
}

/// A migrated plain file asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAsset {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub origin_locations: Vec<String>,
    #[serde(default)]
    pub custom_fields: BTreeMap<String, String>,
    pub created: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_folder: Option<TargetPath>,
    #[serde(default)]
    pub file_type: FileType,
    #[serde(default)]
    pub skip: SkipOptions,
}

impl FileAsset {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: None,
            origin_locations: Vec::new(),
            custom_fields: BTreeMap::new(),
            created: now,
            last_updated: now,
            source_path: None,
            target_folder: None,
            file_type: FileType::default(),
            skip: SkipOptions::default(),
        }
    }
}

impl MigrationObject for FileAsset {
    const KIND: EntityKind = EntityKind::File;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl CollectRefs for FileAsset {
    fn collect_refs(&self) -> Vec<Ref> {
        Vec::new()
    }
}

/// Attachment formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttachmentType {
    Pdf,
    Html,
    Text,
    #[default]
    Unknown,
}

/// A document attachment. May point at a migrated image that replaces it
/// in the target system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub origin_locations: Vec<String>,
    #[serde(default)]
    pub custom_fields: BTreeMap<String, String>,
    pub created: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_folder: Option<TargetPath>,
    #[serde(default)]
    pub attachment_type: AttachmentType,
    #[serde(default)]
    pub skip: SkipOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_image_id: Option<String>,
}

impl Attachment {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: None,
            origin_locations: Vec::new(),
            custom_fields: BTreeMap::new(),
            created: now,
            last_updated: now,
            source_path: None,
            target_folder: None,
            attachment_type: AttachmentType::default(),
            skip: SkipOptions::default(),
            target_image_id: None,
        }
    }
}

impl MigrationObject for Attachment {
    const KIND: EntityKind = EntityKind::Attachment;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl CollectRefs for Attachment {
    fn collect_refs(&self) -> Vec<Ref> {
        self.target_image_id
            .as_ref()
            .map(|id| vec![Ref::Image(ImageRef::new(id.clone()))])
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_references_its_target_image() {
        let mut attachment = Attachment::new("a1");
        assert!(attachment.collect_refs().is_empty());

        attachment.target_image_id = Some("img1".into());
        assert_eq!(attachment.collect_refs(), vec![Ref::Image(ImageRef::new("img1"))]);
    }
}
