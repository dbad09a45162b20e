//! Reference validator traversal tests

use std::collections::HashSet;
use std::sync::Arc;

use doc_migration_sdk::models::{
    Attachment, DisplayRule, DocumentContent, DocumentObject, DocumentObjectRef,
    DocumentObjectType, FileAsset, Image, Paragraph, Ref, TextRun, TextStyle, TextStyleDefOrRef,
    TextStyleDefinition, TextStyleRef, Variable, VariableRef, VariableStructure,
};
use doc_migration_sdk::storage::InMemoryStore;
use doc_migration_sdk::{ReferenceValidator, Repository};

struct Fixture {
    document_objects: Arc<Repository<DocumentObject>>,
    variables: Arc<Repository<Variable>>,
    text_styles: Arc<Repository<TextStyle>>,
    validator: ReferenceValidator,
}

fn fixture() -> Fixture {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let store = Arc::new(InMemoryStore::new());
    let document_objects = Arc::new(Repository::new(store.clone(), "project"));
    let variables = Arc::new(Repository::new(store.clone(), "project"));
    let text_styles = Arc::new(Repository::new(store.clone(), "project"));
    let paragraph_styles = Arc::new(Repository::new(store.clone(), "project"));
    let variable_structures: Arc<Repository<VariableStructure>> =
        Arc::new(Repository::new(store.clone(), "project"));
    let display_rules: Arc<Repository<DisplayRule>> =
        Arc::new(Repository::new(store.clone(), "project"));
    let images: Arc<Repository<Image>> = Arc::new(Repository::new(store.clone(), "project"));
    let files: Arc<Repository<FileAsset>> = Arc::new(Repository::new(store.clone(), "project"));
    let attachments: Arc<Repository<Attachment>> = Arc::new(Repository::new(store, "project"));

    let validator = ReferenceValidator::new(
        document_objects.clone(),
        variables.clone(),
        text_styles.clone(),
        paragraph_styles,
        variable_structures,
        display_rules,
        images,
        files,
        attachments,
    );

    Fixture { document_objects, variables, text_styles, validator }
}

fn block_with_refs(fixture: &Fixture, id: &str, targets: &[&str]) -> DocumentObject {
    let content = targets
        .iter()
        .map(|target| DocumentContent::DocumentObjectRef(DocumentObjectRef::new(*target)))
        .collect();
    fixture
        .document_objects
        .upsert(id, |_| {
            let mut block = DocumentObject::new(id, DocumentObjectType::Block);
            block.content = content;
            block
        })
        .unwrap()
}

fn doc_ref(id: &str) -> Ref {
    Ref::DocumentObject(DocumentObjectRef::new(id))
}

#[test]
fn leaf_object_validates_to_empty_result() {
    let f = fixture();
    let leaf = block_with_refs(&f, "leaf", &[]);

    let mut already_valid = HashSet::new();
    let result = f.validator.validate(&leaf, &mut already_valid).unwrap();

    assert!(result.validated_refs.is_empty());
    assert!(result.missing_refs.is_empty());
    assert!(already_valid.is_empty());
}

#[test]
fn traversal_is_breadth_first_in_discovery_order() {
    let f = fixture();
    block_with_refs(&f, "11", &["111", "211"]);
    block_with_refs(&f, "21", &[]);
    block_with_refs(&f, "111", &[]);
    block_with_refs(&f, "211", &[]);
    let root = block_with_refs(&f, "1", &["11", "21"]);

    let mut already_valid = HashSet::new();
    let result = f.validator.validate(&root, &mut already_valid).unwrap();

    assert_eq!(
        result.validated_refs,
        vec![doc_ref("11"), doc_ref("21"), doc_ref("111"), doc_ref("211")]
    );
    assert!(result.missing_refs.is_empty());
}

#[test]
fn nested_missing_ref_is_reported_not_validated() {
    let f = fixture();
    block_with_refs(&f, "11", &["obj111"]);
    block_with_refs(&f, "21", &[]);
    let root = block_with_refs(&f, "1", &["11", "21"]);

    let mut already_valid = HashSet::new();
    let result = f.validator.validate(&root, &mut already_valid).unwrap();

    assert_eq!(result.missing_refs, vec![doc_ref("obj111")]);
    assert_eq!(result.validated_refs, vec![doc_ref("11"), doc_ref("21")]);
    assert!(!already_valid.contains(&doc_ref("obj111")));
}

#[test]
fn second_validation_with_shared_set_is_empty() {
    let f = fixture();
    block_with_refs(&f, "11", &[]);
    let root = block_with_refs(&f, "1", &["11"]);

    let mut already_valid = HashSet::new();
    let first = f.validator.validate(&root, &mut already_valid).unwrap();
    let second = f.validator.validate(&root, &mut already_valid).unwrap();

    assert_eq!(first.validated_refs, vec![doc_ref("11")]);
    assert!(second.validated_refs.is_empty());
    assert!(second.missing_refs.is_empty());
}

#[test]
fn missing_refs_are_retried_on_later_runs() {
    let f = fixture();
    let root = block_with_refs(&f, "1", &["late"]);

    let mut already_valid = HashSet::new();
    let first = f.validator.validate(&root, &mut already_valid).unwrap();
    assert_eq!(first.missing_refs, vec![doc_ref("late")]);

    // The target is created between runs; the retry now resolves it.
    block_with_refs(&f, "late", &[]);
    let second = f.validator.validate(&root, &mut already_valid).unwrap();
    assert_eq!(second.validated_refs, vec![doc_ref("late")]);
    assert!(second.missing_refs.is_empty());
}

#[test]
fn traversal_crosses_entity_kinds() {
    let f = fixture();
    f.variables.upsert("v1", |_| Variable::new("v1")).unwrap();
    f.text_styles
        .upsert("t1", |_| {
            TextStyle::new("t1", TextStyleDefOrRef::Ref(TextStyleRef::new("t2")))
        })
        .unwrap();
    f.text_styles
        .upsert("t2", |_| {
            TextStyle::new("t2", TextStyleDefOrRef::Definition(TextStyleDefinition::default()))
        })
        .unwrap();

    let root = f
        .document_objects
        .upsert("1", |_| {
            let mut doc = DocumentObject::new("1", DocumentObjectType::Template);
            doc.content = vec![DocumentContent::Paragraph(Paragraph {
                content: vec![TextRun {
                    content: vec![doc_migration_sdk::models::TextContent::VariableRef(
                        VariableRef::new("v1"),
                    )],
                    style_ref: Some(TextStyleRef::new("t1")),
                    display_rule_ref: None,
                }],
                style_ref: None,
                display_rule_ref: None,
            })];
            doc
        })
        .unwrap();

    let mut already_valid = HashSet::new();
    let result = f.validator.validate(&root, &mut already_valid).unwrap();

    assert_eq!(
        result.validated_refs,
        vec![
            Ref::Variable(VariableRef::new("v1")),
            Ref::TextStyle(TextStyleRef::new("t1")),
            Ref::TextStyle(TextStyleRef::new("t2")),
        ]
    );
    assert!(result.missing_refs.is_empty());
}

#[test]
fn validate_all_deduplicates_missing_refs_across_roots() {
    let f = fixture();
    block_with_refs(&f, "a", &["ghost"]);
    block_with_refs(&f, "b", &["ghost", "other-ghost"]);

    let missing = f.validator.validate_all().unwrap();
    assert_eq!(missing, vec![doc_ref("ghost"), doc_ref("other-ghost")]);
}

#[test]
fn validate_all_is_empty_for_a_consistent_project() {
    let f = fixture();
    block_with_refs(&f, "11", &[]);
    block_with_refs(&f, "1", &["11"]);
    f.variables.upsert("v1", |_| Variable::new("v1")).unwrap();

    assert!(f.validator.validate_all().unwrap().is_empty());
}
