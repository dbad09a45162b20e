//! Display rules
//!
//! A display rule is a boolean predicate tree selecting content variants at
//! deployment time. Content nodes reference rules by id rather than
//! embedding them, so rules participate in reference validation like any
//! other migration object. Variable operands inside a rule contribute
//! [`VariableRef`]s to the rule's reference list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::object::{EntityKind, MigrationObject};
use super::refs::{CollectRefs, Ref, VariableRef};

/// How a group combines its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupOp {
    And,
    Or,
}

impl GroupOp {
    /// The operator keyword used in the engine's inline-condition syntax.
    pub fn as_inline_condition(&self) -> &'static str {
        match self {
            GroupOp::And => "and",
            GroupOp::Or => "or",
        }
    }
}

/// Comparison operator of a binary predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Equals,
    EqualsCaseInsensitive,
    NotEquals,
    NotEqualsCaseInsensitive,
    GreaterThan,
    GreaterOrEqualThan,
    LessThan,
    LessOrEqualThan,
}

/// Type of a literal operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiteralKind {
    Variable,
    String,
    Number,
    Boolean,
}

/// A literal operand. `Variable` literals hold a variable id and therefore
/// reference that variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Literal {
    pub value: String,
    pub kind: LiteralKind,
}

impl Literal {
    pub fn variable(id: impl Into<String>) -> Self {
        Self { value: id.into(), kind: LiteralKind::Variable }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self { value: value.into(), kind: LiteralKind::String }
    }

    pub fn number(value: impl Into<String>) -> Self {
        Self { value: value.into(), kind: LiteralKind::Number }
    }
}

impl CollectRefs for Literal {
    fn collect_refs(&self) -> Vec<Ref> {
        match self.kind {
            LiteralKind::Variable => vec![Ref::Variable(VariableRef::new(self.value.clone()))],
            _ => Vec::new(),
        }
    }
}

/// Functions the engine can apply to operands before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleFunctionName {
    UpperCase,
    LowerCase,
}

/// A function call operand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleFunction {
    pub name: RuleFunctionName,
    pub args: Vec<RuleOperand>,
}

impl CollectRefs for RuleFunction {
    fn collect_refs(&self) -> Vec<Ref> {
        self.args.iter().flat_map(CollectRefs::collect_refs).collect()
    }
}

/// An operand of a binary predicate: a literal or a computed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RuleOperand {
    Literal(Literal),
    Function(RuleFunction),
}

impl CollectRefs for RuleOperand {
    fn collect_refs(&self) -> Vec<Ref> {
        match self {
            RuleOperand::Literal(l) => l.collect_refs(),
            RuleOperand::Function(f) => f.collect_refs(),
        }
    }
}

/// A single comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binary {
    pub left: RuleOperand,
    pub operator: BinOp,
    pub right: RuleOperand,
}

impl CollectRefs for Binary {
    fn collect_refs(&self) -> Vec<Ref> {
        let mut refs = self.left.collect_refs();
        refs.extend(self.right.collect_refs());
        refs
    }
}

/// One item of a group: a nested group or a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RuleNode {
    Group(Group),
    Binary(Binary),
}

impl CollectRefs for RuleNode {
    fn collect_refs(&self) -> Vec<Ref> {
        match self {
            RuleNode::Group(g) => g.collect_refs(),
            RuleNode::Binary(b) => b.collect_refs(),
        }
    }
}

/// An And/Or composition of predicates, optionally negated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub items: Vec<RuleNode>,
    pub operator: GroupOp,
    #[serde(default)]
    pub negation: bool,
}

impl CollectRefs for Group {
    fn collect_refs(&self) -> Vec<Ref> {
        self.items.iter().flat_map(CollectRefs::collect_refs).collect()
    }
}

/// The predicate tree of a display rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub group: Group,
}

impl CollectRefs for RuleDefinition {
    fn collect_refs(&self) -> Vec<Ref> {
        self.group.collect_refs()
    }
}

/// A named, referencable display rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRule {
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
    pub definition: Option<RuleDefinition>,
}

impl DisplayRule {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: None,
            origin_locations: Vec::new(),
            custom_fields: BTreeMap::new(),
            created: now,
            last_updated: now,
            definition: None,
        }
    }
}

impl MigrationObject for DisplayRule {
    const KIND: EntityKind = EntityKind::DisplayRule;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl CollectRefs for DisplayRule {
    fn collect_refs(&self) -> Vec<Ref> {
        self.definition.as_ref().map(CollectRefs::collect_refs).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_literals_reference_their_variable() {
        let mut rule = DisplayRule::new("r1");
        rule.definition = Some(RuleDefinition {
            group: Group {
                items: vec![
                    RuleNode::Binary(Binary {
                        left: RuleOperand::Literal(Literal::variable("v1")),
                        operator: BinOp::Equals,
                        right: RuleOperand::Literal(Literal::string("CZ")),
                    }),
                    RuleNode::Group(Group {
                        items: vec![RuleNode::Binary(Binary {
                            left: RuleOperand::Function(RuleFunction {
                                name: RuleFunctionName::UpperCase,
                                args: vec![RuleOperand::Literal(Literal::variable("v2"))],
                            }),
                            operator: BinOp::NotEquals,
                            right: RuleOperand::Literal(Literal::number("42")),
                        })],
                        operator: GroupOp::Or,
                        negation: true,
                    }),
                ],
                operator: GroupOp::And,
                negation: false,
            },
        });

        assert_eq!(
            rule.collect_refs(),
            vec![
                Ref::Variable(VariableRef::new("v1")),
                Ref::Variable(VariableRef::new("v2")),
            ]
        );
    }

    #[test]
    fn rule_without_definition_collects_nothing() {
        assert!(DisplayRule::new("empty").collect_refs().is_empty());
    }
}
