//! Constant annotator
//!
//! Walks every object property in pre-order and asks each rule whether it
//! applies. Matching rules produce inline annotations: the enum member name of
//! a numeric constant, or a readable description of a business rule.

use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use crate::data::terrasoft::{
    COMPARISON_TYPE, CONTENT_TYPE, DATA_VALUE_TYPE, LOGICAL_OPERATOR_TYPE, VIEW_ITEM_TYPE,
    VIEW_MODEL_COLUMN_TYPE,
};
use crate::data::{EnumDef, UNKNOWN_PLACEHOLDER};
use crate::extractors::base::{as_integer, SourceLocation, SyntaxTree};
use crate::extractors::schema::BusinessRuleSpec;

/// Lines around the visible range that still get annotations
pub const VISIBLE_MARGIN: u32 = 10;

/// An inline annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub name: String,
    /// Zero-width location the annotation renders at
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
}

/// Annotates `attribute: <number>` with the matching enum member name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRule {
    pub attribute: String,
    pub members: Vec<EnumMember>,
    /// Property name that must appear somewhere up the ancestor chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ancestor: Option<String>,
}

impl ValueRule {
    pub fn from_enum(attribute: &str, def: &EnumDef, ancestor: Option<&str>) -> Self {
        ValueRule {
            attribute: attribute.to_string(),
            members: def
                .members
                .iter()
                .map(|(name, value)| EnumMember {
                    name: name.to_string(),
                    value: *value,
                })
                .collect(),
            ancestor: ancestor.map(str::to_string),
        }
    }

    fn member_name(&self, value: f64) -> &str {
        as_integer(value)
            .and_then(|v| self.members.iter().find(|m| m.value == v))
            .map(|m| m.name.as_str())
            .unwrap_or(UNKNOWN_PLACEHOLDER)
    }

    fn highlight(&self, tree: &SyntaxTree, pair: &Node) -> Option<Highlight> {
        if tree.property_name(pair).as_deref() != Some(self.attribute.as_str()) {
            return None;
        }
        let value = pair.child_by_field_name("value")?;
        let number = tree.number_value(&value)?;
        if let Some(ancestor) = &self.ancestor {
            if !has_ancestor_property(tree, pair, ancestor) {
                return None;
            }
        }
        Some(Highlight {
            name: self.member_name(number).to_string(),
            location: tree.location(&value).end_point(),
        })
    }
}

/// A rule of the constant annotator
///
/// Rules are plain data so a rule set can be handed to another thread or
/// process by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HighlightRule {
    Value(ValueRule),
    /// Describes rule objects (`{ uId, ruleType, ... }`) declared under `businessRules`
    BusinessRule,
}

impl HighlightRule {
    pub fn highlight(&self, tree: &SyntaxTree, pair: &Node) -> Option<Highlight> {
        match self {
            HighlightRule::Value(rule) => rule.highlight(tree, pair),
            HighlightRule::BusinessRule => business_rule_highlight(tree, pair),
        }
    }
}

fn business_rule_highlight(tree: &SyntaxTree, pair: &Node) -> Option<Highlight> {
    let rule = tree.unwrap_parens(pair.child_by_field_name("value")?);
    let spec = BusinessRuleSpec::from_node(tree, &rule)?;
    if !has_ancestor_property(tree, pair, "businessRules") {
        return None;
    }

    // pair -> rules object -> attribute pair
    let attribute = pair
        .parent()
        .and_then(|object| object.parent())
        .filter(|grandparent| grandparent.kind() == "pair")
        .and_then(|grandparent| tree.property_name(&grandparent))
        .unwrap_or_else(|| UNKNOWN_PLACEHOLDER.to_string());

    Some(Highlight {
        name: spec.describe(&attribute),
        location: tree.location(&rule).start_point(),
    })
}

/// Whether any enclosing pair above `pair` is named `name`
fn has_ancestor_property(tree: &SyntaxTree, pair: &Node, name: &str) -> bool {
    let mut current = pair.parent();
    while let Some(node) = current {
        if node.kind() == "pair" && tree.property_name(&node).as_deref() == Some(name) {
            return true;
        }
        current = node.parent();
    }
    false
}

/// The rule set used when the host does not supply one
pub fn default_rules() -> Vec<HighlightRule> {
    vec![
        HighlightRule::Value(ValueRule::from_enum("itemType", &VIEW_ITEM_TYPE, Some("diff"))),
        HighlightRule::Value(ValueRule::from_enum("dataValueType", &DATA_VALUE_TYPE, None)),
        HighlightRule::Value(ValueRule::from_enum("comparisonType", &COMPARISON_TYPE, None)),
        HighlightRule::Value(ValueRule::from_enum("contentType", &CONTENT_TYPE, Some("diff"))),
        HighlightRule::Value(ValueRule::from_enum(
            "type",
            &VIEW_MODEL_COLUMN_TYPE,
            Some("attributes"),
        )),
        HighlightRule::Value(ValueRule::from_enum(
            "logical",
            &LOGICAL_OPERATOR_TYPE,
            Some("businessRules"),
        )),
        HighlightRule::BusinessRule,
    ]
}

/// Run every rule against every object property of `tree`
pub fn annotate(tree: Option<&SyntaxTree>, rules: &[HighlightRule]) -> Vec<Highlight> {
    let Some(tree) = tree else {
        return Vec::new();
    };
    let mut highlights = Vec::new();
    tree.walk_tree(|node| {
        if node.kind() == "pair" {
            highlights.extend(rules.iter().filter_map(|rule| rule.highlight(tree, &node)));
        }
    });
    highlights
}

/// Highlights on lines within `first_line..=last_line`, widened by `VISIBLE_MARGIN`
pub fn visible_highlights(highlights: &[Highlight], first_line: u32, last_line: u32) -> Vec<Highlight> {
    let from = first_line.saturating_sub(VISIBLE_MARGIN);
    let to = last_line.saturating_add(VISIBLE_MARGIN);
    highlights
        .iter()
        .filter(|h| (from..=to).contains(&h.location.start.line))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::schema::business_rules::{ENABLES_FIELD, SHOWS_FIELD};
    use crate::language::create_parser;

    fn parse(source: &str) -> SyntaxTree {
        let mut parser = create_parser().unwrap();
        SyntaxTree::parse(&mut parser, source).unwrap()
    }

    fn names(highlights: &[Highlight]) -> Vec<&str> {
        highlights.iter().map(|h| h.name.as_str()).collect()
    }

    #[test]
    fn test_item_type_under_diff_values() {
        let source = "var x = { diff: [ { values: { itemType: 5 } } ] };";
        let tree = parse(source);
        let rules = vec![HighlightRule::Value(ValueRule::from_enum(
            "itemType",
            &VIEW_ITEM_TYPE,
            Some("diff"),
        ))];

        let highlights = annotate(Some(&tree), &rules);
        assert_eq!(names(&highlights), vec!["BUTTON"]);

        let literal_end = (source.find("5 }").unwrap() + 1) as u32;
        assert_eq!(highlights[0].location.start_byte, literal_end);
        assert_eq!(highlights[0].location.end_byte, literal_end);
    }

    #[test]
    fn test_ancestor_constraint() {
        let tree = parse("var x = { values: { itemType: 5 }, other: { itemType: 99 } };");
        let constrained = vec![HighlightRule::Value(ValueRule::from_enum(
            "itemType",
            &VIEW_ITEM_TYPE,
            Some("diff"),
        ))];
        assert!(annotate(Some(&tree), &constrained).is_empty());

        let free = vec![HighlightRule::Value(ValueRule::from_enum(
            "itemType",
            &VIEW_ITEM_TYPE,
            None,
        ))];
        // unknown members fall back to the placeholder
        assert_eq!(names(&annotate(Some(&tree), &free)), vec!["BUTTON", UNKNOWN_PLACEHOLDER]);
    }

    #[test]
    fn test_non_numeric_values_are_skipped() {
        let tree = parse(r#"var x = { dataValueType: "12", y: { dataValueType: Terrasoft.DataValueType.TEXT } };"#);
        assert!(annotate(Some(&tree), &default_rules()).is_empty());
    }

    #[test]
    fn test_business_rule_description() {
        let source = r#"var x = {
            businessRules: {
                "Owner": {
                    "r1": { uId: "x", ruleType: 0, property: 1 }
                }
            }
        };"#;
        let tree = parse(source);
        let highlights = annotate(Some(&tree), &[HighlightRule::BusinessRule]);

        assert_eq!(names(&highlights), vec![ENABLES_FIELD]);
        let object_start = source.find("{ uId").unwrap() as u32;
        assert_eq!(highlights[0].location.start_byte, object_start);
    }

    #[test]
    fn test_business_rule_outside_business_rules() {
        let tree = parse(r#"var x = { rules: { "Owner": { "r1": { uId: "x", ruleType: 0, property: 0 } } } };"#);
        assert!(annotate(Some(&tree), &[HighlightRule::BusinessRule]).is_empty());
    }

    #[test]
    fn test_sample_with_default_rules() {
        let tree = parse(include_str!("../../test_samples/SomePage1.js"));
        let highlights = annotate(Some(&tree), &default_rules());
        let found = names(&highlights);

        assert!(found.contains(&"BUTTON"));
        assert!(found.contains(&"BOOLEAN"));
        assert!(found.contains(&SHOWS_FIELD));
        assert!(found.contains(&"SomeField2.SomeColumn1 === SomeField3"));
        // "type": 1 inside business rule expressions is not under `attributes`
        assert!(!found.contains(&"CALCULATED_COLUMN"));
    }

    #[test]
    fn test_no_tree() {
        assert!(annotate(None, &default_rules()).is_empty());
    }

    #[test]
    fn test_visible_window() {
        let at = |line: u32| Highlight {
            name: line.to_string(),
            location: SourceLocation {
                start: crate::extractors::base::Position { line, column: 0 },
                end: crate::extractors::base::Position { line, column: 0 },
                start_byte: 0,
                end_byte: 0,
            },
        };
        let all = vec![at(1), at(40), at(55), at(100)];
        assert_eq!(names(&visible_highlights(&all, 50, 60)), vec!["40", "55"]);
    }

    #[test]
    fn test_rules_round_trip_through_json() {
        let json = serde_json::to_value(default_rules()).unwrap();
        assert_eq!(json[0]["kind"], "value");
        assert_eq!(json[0]["attribute"], "itemType");
        assert_eq!(json[6]["kind"], "businessRule");
        let back: Vec<HighlightRule> = serde_json::from_value(json).unwrap();
        assert_eq!(back, default_rules());
    }
}
