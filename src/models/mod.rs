//! Content model for the migration SDK
//!
//! Defines the migration objects stored in the relational content model and
//! the recursively-nested document content they carry. Everything here is
//! plain serde-serializable data; persistence lives in
//! [`crate::repository`] and graph validation in [`crate::validation`].

pub mod assets;
pub mod content;
pub mod display_rule;
pub mod document_object;
pub mod object;
pub mod refs;
pub mod style;
pub mod units;
pub mod variable;

pub use assets::{Attachment, AttachmentType, FileAsset, FileType, Image, ImageOptions, ImageType};
pub use content::{
    Area, BorderLine, BorderOptions, ColumnWidth, DocumentContent, FirstMatch, FirstMatchCase,
    FlowArea, Hyperlink, LanguageCase, Paragraph, SelectByLanguage, StringValue, Table,
    TableAlignment, TableCell, TableOptions, TableRow, TextContent, TextRun,
};
pub use display_rule::{
    BinOp, Binary, DisplayRule, Group, GroupOp, Literal, LiteralKind, RuleDefinition, RuleFunction,
    RuleFunctionName, RuleNode, RuleOperand,
};
pub use document_object::{DocumentObject, DocumentObjectOptions, DocumentObjectType};
pub use object::{EntityKind, Metadata, MetadataValue, MigrationObject, SkipOptions};
pub use refs::{
    AttachmentRef, CollectRefs, DisplayRuleRef, DocumentObjectRef, FileRef, ImageRef,
    ParagraphStyleRef, Ref, TextStyleRef, VariableRef, VariableStructureRef,
};
pub use style::{
    Alignment, LineSpacing, ParagraphStyle, ParagraphStyleDefOrRef, ParagraphStyleDefinition,
    SuperOrSubscript, Tab, TabType, Tabs, TextStyle, TextStyleDefOrRef, TextStyleDefinition,
};
pub use units::{Color, Position, Size, SizeUnit, TargetPath};
pub use variable::{DataType, Variable, VariablePathData, VariableStructure};
