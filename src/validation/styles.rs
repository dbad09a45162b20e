//! Deploy-time style validation
//!
//! Before deployment, every text and paragraph style referenced by the
//! in-scope document objects must resolve, through any chain of style
//! refs, to a locally stored concrete definition AND to a matching named
//! style in the composition engine's catalog. Missing styles are reported
//! as findings; failures to reach the engine abort the whole validation.

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::sync::Arc;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, warn};

use crate::models::{
    CollectRefs, DocumentObject, MigrationObject, ParagraphStyle, ParagraphStyleDefOrRef, Ref,
    TextStyle, TextStyleDefOrRef,
};
use crate::repository::{Repository, RepositoryError};

/// Supplies the document objects in deployment scope.
pub trait DeployList {
    /// Every deployable document object of the project.
    fn all_document_objects(&self) -> anyhow::Result<Vec<DocumentObject>>;

    /// The deployable document objects for an explicit id selection.
    fn document_objects_by_ids(&self, ids: &[String]) -> anyhow::Result<Vec<DocumentObject>>;
}

/// Opaque client of the target composition engine, reduced to the three
/// operations style validation needs.
pub trait CompositionEngine {
    /// Path of the style definition resource inside the engine's content
    /// repository.
    fn style_definition_path(&self) -> anyhow::Result<String>;

    /// Whether a resource exists at the given path.
    fn file_exists(&self, path: &str) -> anyhow::Result<bool>;

    /// Export the style catalog at the given path as XML.
    fn fetch_style_catalog_xml(&self, path: &str) -> anyhow::Result<String>;
}

/// Error type for deploy-time style validation.
///
/// Everything here is fatal for the validation call; missing styles are
/// not errors but [`StyleValidationReport`] findings.
#[derive(Debug, thiserror::Error)]
pub enum StyleValidationError {
    #[error("failed to resolve the deploy list")]
    DeployList(#[source] anyhow::Error),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("failed to check whether style definition '{path}' exists")]
    CatalogProbe {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("style definition '{0}' does not exist, cannot validate")]
    CatalogMissing(String),

    #[error("style catalog export failed for '{path}'")]
    CatalogExport {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("malformed style catalog XML")]
    CatalogParse(#[from] quick_xml::Error),
}

/// Outcome of one style validation run. Each list is sorted and
/// deduplicated; present and missing styles are keyed by the display name
/// (or raw id) of the style holding the resolved definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleValidationReport {
    pub text_styles: Vec<String>,
    pub paragraph_styles: Vec<String>,
    pub missing_text_styles: Vec<String>,
    pub missing_paragraph_styles: Vec<String>,
}

impl StyleValidationReport {
    pub fn is_clean(&self) -> bool {
        self.missing_text_styles.is_empty() && self.missing_paragraph_styles.is_empty()
    }
}

/// Validates style resolution for a deployment scope against the local
/// repositories and the engine's style catalog.
pub struct StylesValidator {
    document_objects: Arc<Repository<DocumentObject>>,
    text_styles: Arc<Repository<TextStyle>>,
    paragraph_styles: Arc<Repository<ParagraphStyle>>,
    deploy_list: Box<dyn DeployList>,
    engine: Box<dyn CompositionEngine>,
}

impl StylesValidator {
    pub fn new(
        document_objects: Arc<Repository<DocumentObject>>,
        text_styles: Arc<Repository<TextStyle>>,
        paragraph_styles: Arc<Repository<ParagraphStyle>>,
        deploy_list: Box<dyn DeployList>,
        engine: Box<dyn CompositionEngine>,
    ) -> Self {
        Self { document_objects, text_styles, paragraph_styles, deploy_list, engine }
    }

    /// Validate styles for every deployable document object.
    pub fn validate_all(&self) -> Result<StyleValidationReport, StyleValidationError> {
        let roots = self
            .deploy_list
            .all_document_objects()
            .map_err(StyleValidationError::DeployList)?;
        self.validate_roots(roots)
    }

    /// Validate styles for an explicit document object selection.
    pub fn validate(&self, ids: &[String]) -> Result<StyleValidationReport, StyleValidationError> {
        let roots = self
            .deploy_list
            .document_objects_by_ids(ids)
            .map_err(StyleValidationError::DeployList)?;
        self.validate_roots(roots)
    }

    fn validate_roots(
        &self,
        roots: Vec<DocumentObject>,
    ) -> Result<StyleValidationReport, StyleValidationError> {
        let refs = self.collect_scope_refs(roots)?;

        let mut needed_text = BTreeSet::new();
        let mut needed_paragraph = BTreeSet::new();
        let mut missing_text = BTreeSet::new();
        let mut missing_paragraph = BTreeSet::new();

        for reference in &refs {
            match reference {
                Ref::TextStyle(r) => match self.text_styles.find_model(&r.id)? {
                    Some(style) => {
                        self.resolve_text_style(style, &mut needed_text, &mut missing_text)?
                    }
                    None => {
                        missing_text.insert(r.id.clone());
                    }
                },
                Ref::ParagraphStyle(r) => match self.paragraph_styles.find_model(&r.id)? {
                    Some(style) => self.resolve_paragraph_style(
                        style,
                        &mut needed_paragraph,
                        &mut missing_paragraph,
                    )?,
                    None => {
                        missing_paragraph.insert(r.id.clone());
                    }
                },
                _ => {}
            }
        }

        let (catalog_text, catalog_paragraph) = self.load_style_catalog()?;

        let present_text: Vec<String> =
            needed_text.intersection(&catalog_text).cloned().collect();
        let present_paragraph: Vec<String> =
            needed_paragraph.intersection(&catalog_paragraph).cloned().collect();
        missing_text.extend(needed_text.difference(&catalog_text).cloned());
        missing_paragraph.extend(needed_paragraph.difference(&catalog_paragraph).cloned());

        if !missing_text.is_empty() || !missing_paragraph.is_empty() {
            warn!(
                missing_text = missing_text.len(),
                missing_paragraph = missing_paragraph.len(),
                "style validation found unresolved styles"
            );
        }

        Ok(StyleValidationReport {
            text_styles: present_text,
            paragraph_styles: present_paragraph,
            missing_text_styles: missing_text.into_iter().collect(),
            missing_paragraph_styles: missing_paragraph.into_iter().collect(),
        })
    }

    /// Expand the root set over nested document-object references and
    /// collect every reference the expanded set contains.
    ///
    /// Deploy scope must be complete, so an absent nested document object
    /// is an error here, unlike the reporting-only reference validator.
    fn collect_scope_refs(
        &self,
        roots: Vec<DocumentObject>,
    ) -> Result<HashSet<Ref>, StyleValidationError> {
        let mut queue: VecDeque<DocumentObject> = roots.into();
        let mut visited: HashSet<String> = HashSet::new();
        let mut refs: HashSet<Ref> = HashSet::new();

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.id.clone()) {
                continue;
            }

            let collected = current.collect_refs();
            for reference in &collected {
                if let Ref::DocumentObject(r) = reference {
                    if !visited.contains(&r.id) {
                        queue.push_back(self.document_objects.find_model_or_fail(&r.id)?);
                    }
                }
            }
            refs.extend(collected);
        }

        debug!(objects = visited.len(), refs = refs.len(), "resolved deploy scope");
        Ok(refs)
    }

    /// Follow a text style's def-or-ref chain to its concrete definition.
    ///
    /// The definition holder's display name (or id) lands in `needed`; a
    /// dangling link records the id of the style holding it. A cyclic
    /// chain never reaches a definition and counts as missing.
    fn resolve_text_style(
        &self,
        style: TextStyle,
        needed: &mut BTreeSet<String>,
        missing: &mut BTreeSet<String>,
    ) -> Result<(), StyleValidationError> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut current = style;
        loop {
            if !visited.insert(current.id.clone()) {
                warn!(id = %current.id, "cycle in text style chain");
                missing.insert(current.id);
                return Ok(());
            }
            match &current.definition {
                TextStyleDefOrRef::Definition(_) => {
                    needed.insert(current.name_or_id().to_owned());
                    return Ok(());
                }
                TextStyleDefOrRef::Ref(next) => match self.text_styles.find_model(&next.id)? {
                    Some(model) => current = model,
                    None => {
                        missing.insert(current.id);
                        return Ok(());
                    }
                },
            }
        }
    }

    fn resolve_paragraph_style(
        &self,
        style: ParagraphStyle,
        needed: &mut BTreeSet<String>,
        missing: &mut BTreeSet<String>,
    ) -> Result<(), StyleValidationError> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut current = style;
        loop {
            if !visited.insert(current.id.clone()) {
                warn!(id = %current.id, "cycle in paragraph style chain");
                missing.insert(current.id);
                return Ok(());
            }
            match &current.definition {
                ParagraphStyleDefOrRef::Definition(_) => {
                    needed.insert(current.name_or_id().to_owned());
                    return Ok(());
                }
                ParagraphStyleDefOrRef::Ref(next) => {
                    match self.paragraph_styles.find_model(&next.id)? {
                        Some(model) => current = model,
                        None => {
                            missing.insert(current.id);
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    /// Fetch and parse the engine's style catalog, yielding the text and
    /// paragraph style name sets it contains.
    fn load_style_catalog(
        &self,
    ) -> Result<(BTreeSet<String>, BTreeSet<String>), StyleValidationError> {
        let path = self
            .engine
            .style_definition_path()
            .map_err(|source| StyleValidationError::CatalogProbe {
                path: String::from("<unresolved>"),
                source,
            })?;

        let exists = self
            .engine
            .file_exists(&path)
            .map_err(|source| StyleValidationError::CatalogProbe { path: path.clone(), source })?;
        if !exists {
            return Err(StyleValidationError::CatalogMissing(path));
        }

        let xml = self
            .engine
            .fetch_style_catalog_xml(&path)
            .map_err(|source| StyleValidationError::CatalogExport { path: path.clone(), source })?;

        Ok(parse_style_catalog(&xml)?)
    }
}

/// Extract the text and paragraph style names from a style catalog export.
///
/// The export nests them at `Layout/Layout/TextStyle/Name` and
/// `Layout/Layout/ParaStyle/Name` under the document root; anything else
/// in the export is ignored.
fn parse_style_catalog(xml: &str) -> Result<(BTreeSet<String>, BTreeSet<String>), quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut text_styles = BTreeSet::new();
    let mut paragraph_styles = BTreeSet::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                path.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            }
            Event::End(_) => {
                path.pop();
            }
            Event::Text(t) => {
                if path.len() == 5
                    && path[1] == "Layout"
                    && path[2] == "Layout"
                    && path[4] == "Name"
                {
                    let name = t.unescape()?.into_owned();
                    match path[3].as_str() {
                        "TextStyle" => {
                            text_styles.insert(name);
                        }
                        "ParaStyle" => {
                            paragraph_styles.insert(name);
                        }
                        _ => {}
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok((text_styles, paragraph_styles))
}
