//! Reference closure validation
//!
//! Walks the object graph breadth-first from a root, resolving each
//! reference against the matching repository. Found targets contribute
//! their own references to the traversal; missing targets are reported,
//! not raised.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::{
    Attachment, CollectRefs, DisplayRule, DocumentObject, FileAsset, Image, MigrationObject,
    ParagraphStyle, Ref, TextStyle, Variable, VariableStructure,
};
use crate::repository::{Repository, RepositoryResult};

/// Outcome of one [`ReferenceValidator::validate`] call.
///
/// `validated_refs` and `missing_refs` both preserve breadth-first
/// discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub validated_refs: Vec<Ref>,
    pub missing_refs: Vec<Ref>,
}

/// Resolves the transitive reference closure of migration objects against
/// one repository per referenceable kind.
pub struct ReferenceValidator {
    document_objects: Arc<Repository<DocumentObject>>,
    variables: Arc<Repository<Variable>>,
    text_styles: Arc<Repository<TextStyle>>,
    paragraph_styles: Arc<Repository<ParagraphStyle>>,
    variable_structures: Arc<Repository<VariableStructure>>,
    display_rules: Arc<Repository<DisplayRule>>,
    images: Arc<Repository<Image>>,
    files: Arc<Repository<FileAsset>>,
    attachments: Arc<Repository<Attachment>>,
}

impl ReferenceValidator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        document_objects: Arc<Repository<DocumentObject>>,
        variables: Arc<Repository<Variable>>,
        text_styles: Arc<Repository<TextStyle>>,
        paragraph_styles: Arc<Repository<ParagraphStyle>>,
        variable_structures: Arc<Repository<VariableStructure>>,
        display_rules: Arc<Repository<DisplayRule>>,
        images: Arc<Repository<Image>>,
        files: Arc<Repository<FileAsset>>,
        attachments: Arc<Repository<Attachment>>,
    ) -> Self {
        Self {
            document_objects,
            variables,
            text_styles,
            paragraph_styles,
            variable_structures,
            display_rules,
            images,
            files,
            attachments,
        }
    }

    /// Validate the reference closure of one root.
    ///
    /// `already_valid` is caller-owned and shared across calls so that
    /// incremental validation of several roots never re-resolves a
    /// reference. Missing references are never added to it; a later run
    /// re-attempts them, since the target may have been created meanwhile.
    pub fn validate(
        &self,
        root: &dyn CollectRefs,
        already_valid: &mut HashSet<Ref>,
    ) -> RepositoryResult<ValidationResult> {
        let mut queue: VecDeque<Ref> = root.collect_refs().into();
        let mut validated = Vec::new();
        let mut missing: Vec<Ref> = Vec::new();

        while let Some(current) = queue.pop_front() {
            if already_valid.contains(&current) {
                continue;
            }

            match self.resolve(&current)? {
                Some(children) => {
                    already_valid.insert(current.clone());
                    validated.push(current);
                    queue.extend(children);
                }
                None => {
                    warn!(kind = %current.kind(), id = current.target_id(), "missing reference");
                    if !missing.contains(&current) {
                        missing.push(current);
                    }
                }
            }
        }

        debug!(
            validated = validated.len(),
            missing = missing.len(),
            "reference validation finished"
        );
        Ok(ValidationResult { validated_refs: validated, missing_refs: missing })
    }

    /// Validate every stored object of every kind, sharing one
    /// already-valid set across the whole run. Returns the deduplicated
    /// missing references in discovery order.
    pub fn validate_all(&self) -> RepositoryResult<Vec<Ref>> {
        let mut already_valid = HashSet::new();
        let mut seen = HashSet::new();
        let mut missing = Vec::new();

        self.validate_roots(&self.document_objects, &mut already_valid, &mut seen, &mut missing)?;
        self.validate_roots(&self.variables, &mut already_valid, &mut seen, &mut missing)?;
        self.validate_roots(&self.text_styles, &mut already_valid, &mut seen, &mut missing)?;
        self.validate_roots(&self.paragraph_styles, &mut already_valid, &mut seen, &mut missing)?;
        self.validate_roots(&self.variable_structures, &mut already_valid, &mut seen, &mut missing)?;
        self.validate_roots(&self.display_rules, &mut already_valid, &mut seen, &mut missing)?;
        self.validate_roots(&self.images, &mut already_valid, &mut seen, &mut missing)?;
        self.validate_roots(&self.files, &mut already_valid, &mut seen, &mut missing)?;
        self.validate_roots(&self.attachments, &mut already_valid, &mut seen, &mut missing)?;

        Ok(missing)
    }

    fn validate_roots<T>(
        &self,
        repository: &Repository<T>,
        already_valid: &mut HashSet<Ref>,
        seen: &mut HashSet<Ref>,
        missing: &mut Vec<Ref>,
    ) -> RepositoryResult<()>
    where
        T: MigrationObject + CollectRefs,
    {
        for root in repository.list_all_model()? {
            let result = self.validate(&root, already_valid)?;
            for r in result.missing_refs {
                if seen.insert(r.clone()) {
                    missing.push(r);
                }
            }
        }
        Ok(())
    }

    /// Look up one reference's target. `Some` carries the target's own
    /// references for further traversal; `None` means the target does not
    /// exist.
    fn resolve(&self, reference: &Ref) -> RepositoryResult<Option<Vec<Ref>>> {
        let refs = match reference {
            Ref::DocumentObject(r) => {
                self.document_objects.find_model(&r.id)?.map(|m| m.collect_refs())
            }
            Ref::Variable(r) => self.variables.find_model(&r.id)?.map(|m| m.collect_refs()),
            Ref::TextStyle(r) => self.text_styles.find_model(&r.id)?.map(|m| m.collect_refs()),
            Ref::ParagraphStyle(r) => {
                self.paragraph_styles.find_model(&r.id)?.map(|m| m.collect_refs())
            }
            Ref::VariableStructure(r) => {
                self.variable_structures.find_model(&r.id)?.map(|m| m.collect_refs())
            }
            Ref::DisplayRule(r) => self.display_rules.find_model(&r.id)?.map(|m| m.collect_refs()),
            Ref::Image(r) => self.images.find_model(&r.id)?.map(|m| m.collect_refs()),
            Ref::File(r) => self.files.find_model(&r.id)?.map(|m| m.collect_refs()),
            Ref::Attachment(r) => self.attachments.find_model(&r.id)?.map(|m| m.collect_refs()),
        };
        Ok(refs)
    }
}
