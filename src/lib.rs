//! Document Migration SDK - Shared library for legacy document-composition migration
//!
//! Provides unified interfaces for:
//! - The typed content model (document objects, styles, rules, variables, assets)
//! - Project-scoped cached repositories over a pluggable object store
//! - Reference-closure validation across the stored object graph
//! - Deploy-time style resolution against the composition engine's catalog

pub mod models;
pub mod repository;
pub mod storage;
pub mod validation;

// Re-export commonly used types
pub use repository::{Repository, RepositoryError, RepositoryResult};
pub use storage::{InMemoryStore, ObjectStore, Scope, StorageError, StoredObject};
pub use validation::{
    CompositionEngine, DeployList, ReferenceValidator, StyleValidationError,
    StyleValidationReport, StylesValidator, ValidationResult,
};

// Re-export models
pub use models::{
    Attachment, CollectRefs, DisplayRule, DocumentContent, DocumentObject, DocumentObjectType,
    EntityKind, FileAsset, Image, MigrationObject, Paragraph, ParagraphStyle, Ref, Table,
    TextStyle, Variable, VariableStructure,
};
