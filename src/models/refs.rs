//! Typed references between migration objects
//!
//! A [`Ref`] is a pointer from one migration object to another by id,
//! without ownership. Every content node can enumerate the references it
//! directly contains via [`CollectRefs`]; the validators build the
//! transitive reference closure from that.

use serde::{Deserialize, Serialize};

use super::object::EntityKind;

/// Anything that can enumerate the references it directly contains.
///
/// Leaf literals return an empty list, a bare reference returns itself, and
/// composite nodes concatenate their children's references in natural
/// (left-to-right, top-to-bottom) order followed by refs held by the node
/// itself. The order carries no semantic weight but keeps validation output
/// deterministic.
pub trait CollectRefs {
    fn collect_refs(&self) -> Vec<Ref>;
}

macro_rules! id_ref {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name {
            pub id: String,
        }

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self { id: id.into() }
            }
        }
    };
}

id_ref!(
    /// Reference to a [`Variable`](super::variable::Variable).
    VariableRef
);
id_ref!(
    /// Reference to a [`TextStyle`](super::style::TextStyle).
    TextStyleRef
);
id_ref!(
    /// Reference to a [`ParagraphStyle`](super::style::ParagraphStyle).
    ParagraphStyleRef
);
id_ref!(
    /// Reference to a [`DisplayRule`](super::display_rule::DisplayRule).
    DisplayRuleRef
);
id_ref!(
    /// Reference to an [`Image`](super::assets::Image).
    ImageRef
);
id_ref!(
    /// Reference to a [`FileAsset`](super::assets::FileAsset).
    FileRef
);
id_ref!(
    /// Reference to an [`Attachment`](super::assets::Attachment).
    AttachmentRef
);
id_ref!(
    /// Reference to a [`VariableStructure`](super::variable::VariableStructure).
    VariableStructureRef
);

/// Reference to a [`DocumentObject`](super::document_object::DocumentObject),
/// optionally guarded by a display rule deciding whether the target is
/// rendered at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentObjectRef {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_rule_ref: Option<DisplayRuleRef>,
}

impl DocumentObjectRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), display_rule_ref: None }
    }

    pub fn with_display_rule(id: impl Into<String>, rule: DisplayRuleRef) -> Self {
        Self { id: id.into(), display_rule_ref: Some(rule) }
    }
}

/// A typed reference to any migration object kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Ref {
    DocumentObject(DocumentObjectRef),
    Variable(VariableRef),
    TextStyle(TextStyleRef),
    ParagraphStyle(ParagraphStyleRef),
    DisplayRule(DisplayRuleRef),
    Image(ImageRef),
    File(FileRef),
    Attachment(AttachmentRef),
    VariableStructure(VariableStructureRef),
}

impl Ref {
    /// Id of the referenced object.
    pub fn target_id(&self) -> &str {
        match self {
            Ref::DocumentObject(r) => &r.id,
            Ref::Variable(r) => &r.id,
            Ref::TextStyle(r) => &r.id,
            Ref::ParagraphStyle(r) => &r.id,
            Ref::DisplayRule(r) => &r.id,
            Ref::Image(r) => &r.id,
            Ref::File(r) => &r.id,
            Ref::Attachment(r) => &r.id,
            Ref::VariableStructure(r) => &r.id,
        }
    }

    /// Kind of the referenced object.
    pub fn kind(&self) -> EntityKind {
        match self {
            Ref::DocumentObject(_) => EntityKind::DocumentObject,
            Ref::Variable(_) => EntityKind::Variable,
            Ref::TextStyle(_) => EntityKind::TextStyle,
            Ref::ParagraphStyle(_) => EntityKind::ParagraphStyle,
            Ref::DisplayRule(_) => EntityKind::DisplayRule,
            Ref::Image(_) => EntityKind::Image,
            Ref::File(_) => EntityKind::File,
            Ref::Attachment(_) => EntityKind::Attachment,
            Ref::VariableStructure(_) => EntityKind::VariableStructure,
        }
    }
}

impl CollectRefs for Ref {
    fn collect_refs(&self) -> Vec<Ref> {
        match self {
            // An attached display rule is a reference of its own.
            Ref::DocumentObject(r) => r.collect_refs(),
            other => vec![other.clone()],
        }
    }
}

impl CollectRefs for DocumentObjectRef {
    fn collect_refs(&self) -> Vec<Ref> {
        let mut refs = vec![Ref::DocumentObject(self.clone())];
        if let Some(rule) = &self.display_rule_ref {
            refs.push(Ref::DisplayRule(rule.clone()));
        }
        refs
    }
}

impl From<DocumentObjectRef> for Ref {
    fn from(value: DocumentObjectRef) -> Self {
        Ref::DocumentObject(value)
    }
}

impl From<VariableRef> for Ref {
    fn from(value: VariableRef) -> Self {
        Ref::Variable(value)
    }
}

impl From<TextStyleRef> for Ref {
    fn from(value: TextStyleRef) -> Self {
        Ref::TextStyle(value)
    }
}

impl From<ParagraphStyleRef> for Ref {
    fn from(value: ParagraphStyleRef) -> Self {
        Ref::ParagraphStyle(value)
    }
}

impl From<DisplayRuleRef> for Ref {
    fn from(value: DisplayRuleRef) -> Self {
        Ref::DisplayRule(value)
    }
}

impl From<ImageRef> for Ref {
    fn from(value: ImageRef) -> Self {
        Ref::Image(value)
    }
}

impl From<FileRef> for Ref {
    fn from(value: FileRef) -> Self {
        Ref::File(value)
    }
}

impl From<AttachmentRef> for Ref {
    fn from(value: AttachmentRef) -> Self {
        Ref::Attachment(value)
    }
}

impl From<VariableStructureRef> for Ref {
    fn from(value: VariableStructureRef) -> Self {
        Ref::VariableStructure(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_ref_collects_itself() {
        let var = Ref::Variable(VariableRef::new("v1"));
        assert_eq!(var.collect_refs(), vec![var.clone()]);
    }

    #[test]
    fn document_object_ref_contributes_attached_rule() {
        let doc = DocumentObjectRef::with_display_rule("d1", DisplayRuleRef::new("r1"));
        assert_eq!(
            doc.collect_refs(),
            vec![
                Ref::DocumentObject(doc.clone()),
                Ref::DisplayRule(DisplayRuleRef::new("r1")),
            ]
        );
    }

    #[test]
    fn ref_serde_carries_discriminator() {
        let r = Ref::TextStyle(TextStyleRef::new("t1"));
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["type"], "TextStyle");
        assert_eq!(json["id"], "t1");
        let back: Ref = serde_json::from_value(json).unwrap();
        assert_eq!(back, r);
    }
}
