//! Document content nodes
//!
//! The recursively-nested content tree a document object is built from:
//! paragraphs of styled text runs, tables, positioned areas, conditional
//! blocks, language selectors, plus reference and literal leaves. The tree
//! is the serialization unit — it persists as one JSON payload column.
//!
//! Every node implements [`CollectRefs`]; composite nodes concatenate their
//! children's refs left-to-right then append refs held by the node itself.

use serde::{Deserialize, Serialize};

use super::refs::{
    AttachmentRef, CollectRefs, DisplayRuleRef, DocumentObjectRef, FileRef, ImageRef,
    ParagraphStyleRef, Ref, TextStyleRef, VariableRef,
};
use super::units::{Color, Position, Size};

/// A literal piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringValue {
    pub value: String,
}

impl StringValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }
}

/// A hyperlink literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hyperlink {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_text: Option<String>,
}

/// One node of document content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DocumentContent {
    Paragraph(Paragraph),
    Table(Table),
    Area(Area),
    FlowArea(FlowArea),
    FirstMatch(FirstMatch),
    SelectByLanguage(SelectByLanguage),
    DocumentObjectRef(DocumentObjectRef),
    ImageRef(ImageRef),
    FileRef(FileRef),
    AttachmentRef(AttachmentRef),
    VariableRef(VariableRef),
    String(StringValue),
    Hyperlink(Hyperlink),
}

impl CollectRefs for DocumentContent {
    fn collect_refs(&self) -> Vec<Ref> {
        match self {
            DocumentContent::Paragraph(p) => p.collect_refs(),
            DocumentContent::Table(t) => t.collect_refs(),
            DocumentContent::Area(a) => a.collect_refs(),
            DocumentContent::FlowArea(a) => a.collect_refs(),
            DocumentContent::FirstMatch(f) => f.collect_refs(),
            DocumentContent::SelectByLanguage(s) => s.collect_refs(),
            DocumentContent::DocumentObjectRef(r) => r.collect_refs(),
            DocumentContent::ImageRef(r) => vec![Ref::Image(r.clone())],
            DocumentContent::FileRef(r) => vec![Ref::File(r.clone())],
            DocumentContent::AttachmentRef(r) => vec![Ref::Attachment(r.clone())],
            DocumentContent::VariableRef(r) => vec![Ref::Variable(r.clone())],
            DocumentContent::String(_) | DocumentContent::Hyperlink(_) => Vec::new(),
        }
    }
}

/// An inline content item inside a text run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TextContent {
    String(StringValue),
    Hyperlink(Hyperlink),
    VariableRef(VariableRef),
    DocumentObjectRef(DocumentObjectRef),
    ImageRef(ImageRef),
    Table(Table),
    FirstMatch(FirstMatch),
}

impl CollectRefs for TextContent {
    fn collect_refs(&self) -> Vec<Ref> {
        match self {
            TextContent::String(_) | TextContent::Hyperlink(_) => Vec::new(),
            TextContent::VariableRef(r) => vec![Ref::Variable(r.clone())],
            TextContent::DocumentObjectRef(r) => r.collect_refs(),
            TextContent::ImageRef(r) => vec![Ref::Image(r.clone())],
            TextContent::Table(t) => t.collect_refs(),
            TextContent::FirstMatch(f) => f.collect_refs(),
        }
    }
}

/// A run of text sharing one text style and one visibility rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    #[serde(default)]
    pub content: Vec<TextContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_ref: Option<TextStyleRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_rule_ref: Option<DisplayRuleRef>,
}

impl CollectRefs for TextRun {
    fn collect_refs(&self) -> Vec<Ref> {
        let mut refs: Vec<Ref> = self.content.iter().flat_map(CollectRefs::collect_refs).collect();
        if let Some(style) = &self.style_ref {
            refs.push(Ref::TextStyle(style.clone()));
        }
        if let Some(rule) = &self.display_rule_ref {
            refs.push(Ref::DisplayRule(rule.clone()));
        }
        refs
    }
}

/// A paragraph of text runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    #[serde(default)]
    pub content: Vec<TextRun>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_ref: Option<ParagraphStyleRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_rule_ref: Option<DisplayRuleRef>,
}

impl CollectRefs for Paragraph {
    fn collect_refs(&self) -> Vec<Ref> {
        let mut refs: Vec<Ref> = self.content.iter().flat_map(CollectRefs::collect_refs).collect();
        if let Some(style) = &self.style_ref {
            refs.push(Ref::ParagraphStyle(style.clone()));
        }
        if let Some(rule) = &self.display_rule_ref {
            refs.push(Ref::DisplayRule(rule.clone()));
        }
        refs
    }
}

/// Horizontal placement of a table within its flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableAlignment {
    Left,
    Center,
    Right,
    #[default]
    Inherit,
}

/// One border edge: color plus stroke width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderLine {
    pub color: Color,
    pub width: Size,
}

/// Cell and table border/padding options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_line: Option<BorderLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_line: Option<BorderLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_line: Option<BorderLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_line: Option<BorderLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
}

/// Table-level presentation options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableOptions {
    #[serde(default)]
    pub alignment: TableAlignment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<BorderOptions>,
}

/// A single table cell holding nested content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    #[serde(default)]
    pub content: Vec<DocumentContent>,
    #[serde(default)]
    pub merge_left: bool,
    #[serde(default)]
    pub merge_up: bool,
}

/// A table row: cells plus an optional visibility rule for the whole row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    #[serde(default)]
    pub cells: Vec<TableCell>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_rule_ref: Option<DisplayRuleRef>,
}

/// Column sizing: a hard minimum plus a percentage of the remaining width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnWidth {
    pub min_width: Size,
    pub percent_width: f64,
}

/// A table of nested content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default)]
    pub rows: Vec<TableRow>,
    #[serde(default)]
    pub header_rows: Vec<TableRow>,
    #[serde(default)]
    pub footer_rows: Vec<TableRow>,
    #[serde(default)]
    pub column_widths: Vec<ColumnWidth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<TableOptions>,
}

fn row_refs(rows: &[TableRow]) -> impl Iterator<Item = Ref> + '_ {
    rows.iter().flat_map(|row| {
        let mut refs: Vec<Ref> = row
            .cells
            .iter()
            .flat_map(|cell| cell.content.iter().flat_map(CollectRefs::collect_refs))
            .collect();
        if let Some(rule) = &row.display_rule_ref {
            refs.push(Ref::DisplayRule(rule.clone()));
        }
        refs
    })
}

impl CollectRefs for Table {
    fn collect_refs(&self) -> Vec<Ref> {
        row_refs(&self.header_rows)
            .chain(row_refs(&self.rows))
            .chain(row_refs(&self.footer_rows))
            .collect()
    }
}

/// Content placed at a fixed position on the page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    #[serde(default)]
    pub content: Vec<DocumentContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interactive_flow_name: Option<String>,
}

impl CollectRefs for Area {
    fn collect_refs(&self) -> Vec<Ref> {
        self.content.iter().flat_map(CollectRefs::collect_refs).collect()
    }
}

/// A positioned flow area whose content reflows within the rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowArea {
    pub position: Position,
    #[serde(default)]
    pub content: Vec<DocumentContent>,
}

impl CollectRefs for FlowArea {
    fn collect_refs(&self) -> Vec<Ref> {
        self.content.iter().flat_map(CollectRefs::collect_refs).collect()
    }
}

/// One branch of a [`FirstMatch`]: rendered when its rule matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstMatchCase {
    pub display_rule_ref: DisplayRuleRef,
    #[serde(default)]
    pub content: Vec<DocumentContent>,
}

/// Conditional content: the first case whose rule matches wins at
/// deployment time, the default branch renders when none do.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstMatch {
    #[serde(default)]
    pub cases: Vec<FirstMatchCase>,
    #[serde(default)]
    pub default: Vec<DocumentContent>,
}

impl CollectRefs for FirstMatch {
    fn collect_refs(&self) -> Vec<Ref> {
        let mut refs = Vec::new();
        for case in &self.cases {
            refs.push(Ref::DisplayRule(case.display_rule_ref.clone()));
            refs.extend(case.content.iter().flat_map(CollectRefs::collect_refs));
        }
        refs.extend(self.default.iter().flat_map(CollectRefs::collect_refs));
        refs
    }
}

/// One language branch of a [`SelectByLanguage`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageCase {
    pub language: String,
    #[serde(default)]
    pub content: Vec<DocumentContent>,
}

/// Language-keyed content variants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectByLanguage {
    #[serde(default)]
    pub cases: Vec<LanguageCase>,
}

impl CollectRefs for SelectByLanguage {
    fn collect_refs(&self) -> Vec<Ref> {
        self.cases
            .iter()
            .flat_map(|case| case.content.iter().flat_map(CollectRefs::collect_refs))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_collect_nothing() {
        assert!(DocumentContent::String(StringValue::new("hi")).collect_refs().is_empty());
        let link = DocumentContent::Hyperlink(Hyperlink {
            url: "https://example.com".into(),
            display_text: None,
            alternate_text: None,
        });
        assert!(link.collect_refs().is_empty());
    }

    #[test]
    fn paragraph_appends_own_refs_after_content() {
        let paragraph = Paragraph {
            content: vec![TextRun {
                content: vec![
                    TextContent::String(StringValue::new("amount: ")),
                    TextContent::VariableRef(VariableRef::new("v1")),
                ],
                style_ref: Some(TextStyleRef::new("t1")),
                display_rule_ref: None,
            }],
            style_ref: Some(ParagraphStyleRef::new("p1")),
            display_rule_ref: Some(DisplayRuleRef::new("r1")),
        };

        assert_eq!(
            paragraph.collect_refs(),
            vec![
                Ref::Variable(VariableRef::new("v1")),
                Ref::TextStyle(TextStyleRef::new("t1")),
                Ref::ParagraphStyle(ParagraphStyleRef::new("p1")),
                Ref::DisplayRule(DisplayRuleRef::new("r1")),
            ]
        );
    }

    #[test]
    fn table_appends_row_rule_after_cells() {
        let table = Table {
            rows: vec![TableRow {
                cells: vec![
                    TableCell {
                        content: vec![DocumentContent::ImageRef(ImageRef::new("img1"))],
                        ..Default::default()
                    },
                    TableCell {
                        content: vec![DocumentContent::VariableRef(VariableRef::new("v1"))],
                        ..Default::default()
                    },
                ],
                display_rule_ref: Some(DisplayRuleRef::new("row-rule")),
            }],
            ..Default::default()
        };

        assert_eq!(
            table.collect_refs(),
            vec![
                Ref::Image(ImageRef::new("img1")),
                Ref::Variable(VariableRef::new("v1")),
                Ref::DisplayRule(DisplayRuleRef::new("row-rule")),
            ]
        );
    }

    #[test]
    fn first_match_orders_case_rule_before_case_content() {
        let first_match = FirstMatch {
            cases: vec![FirstMatchCase {
                display_rule_ref: DisplayRuleRef::new("r1"),
                content: vec![DocumentContent::DocumentObjectRef(DocumentObjectRef::new("d1"))],
            }],
            default: vec![DocumentContent::ImageRef(ImageRef::new("img1"))],
        };

        assert_eq!(
            first_match.collect_refs(),
            vec![
                Ref::DisplayRule(DisplayRuleRef::new("r1")),
                Ref::DocumentObject(DocumentObjectRef::new("d1")),
                Ref::Image(ImageRef::new("img1")),
            ]
        );
    }

    #[test]
    fn content_round_trips_through_json() {
        let node = DocumentContent::FirstMatch(FirstMatch {
            cases: vec![FirstMatchCase {
                display_rule_ref: DisplayRuleRef::new("r1"),
                content: vec![DocumentContent::Paragraph(Paragraph {
                    content: vec![TextRun {
                        content: vec![TextContent::String(StringValue::new("hello"))],
                        style_ref: Some(TextStyleRef::new("t1")),
                        display_rule_ref: None,
                    }],
                    style_ref: None,
                    display_rule_ref: None,
                })],
            }],
            default: vec![DocumentContent::Table(Table {
                rows: vec![TableRow {
                    cells: vec![TableCell::default()],
                    display_rule_ref: None,
                }],
                column_widths: vec![ColumnWidth {
                    min_width: Size::of_millimeters(10.0),
                    percent_width: 50.0,
                }],
                ..Default::default()
            })],
        });

        let json = serde_json::to_string(&node).unwrap();
        let back: DocumentContent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}
