//! Business rule root and the natural-language rule descriptions
//!
//! ```text
//! businessRules: {
//!     "Attribute": {
//!         "<uId>": { uId: "<uId>", ruleType: 0, property: 1, ... }
//!     }
//! }
//! ```

use serde::Serialize;
use tree_sitter::Node;

use super::located_object;
use crate::data::business_rule::{PROPERTY, RULE_TYPE, VALUE_TYPE};
use crate::data::UNKNOWN_PLACEHOLDER;
use crate::extractors::base::{as_integer, SchemaNode, SourceLocation, SyntaxTree};

pub const SHOWS_FIELD: &str = "shows the field";
pub const ENABLES_FIELD: &str = "enables the field";
pub const REQUIRES_FIELD: &str = "makes the field required";
pub const READ_ONLY_FIELD: &str = "makes the field read-only";

/// The numeric and naming fields of one rule object that descriptions depend on
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BusinessRuleSpec {
    pub uid: String,
    pub rule_type: Option<i64>,
    pub property: Option<i64>,
    /// `type`: where the right-hand side of a filtration comes from
    pub value_type: Option<i64>,
    pub base_attribute_patch: Option<String>,
    /// Source text of `value`
    pub value: Option<String>,
    pub attribute: Option<String>,
    pub attribute_path: Option<String>,
}

impl BusinessRuleSpec {
    /// Read a rule object; `None` unless it has a string `uId`
    pub fn from_node(tree: &SyntaxTree, object: &Node) -> Option<Self> {
        if object.kind() != "object" {
            return None;
        }
        let uid = tree.object_string(object, "uId")?;
        let integer = |name: &str| tree.object_number(object, name).and_then(as_integer);

        Some(BusinessRuleSpec {
            uid,
            rule_type: integer("ruleType"),
            property: integer("property"),
            value_type: integer("type"),
            base_attribute_patch: tree.object_string(object, "baseAttributePatch"),
            value: tree
                .object_property(object, "value")
                .map(|v| tree.get_node_text(&v).to_string()),
            attribute: tree.object_string(object, "attribute"),
            attribute_path: tree.object_string(object, "attributePath"),
        })
    }

    /// Human readable summary; `parent_attribute` is the attribute the rule is declared on
    pub fn describe(&self, parent_attribute: &str) -> String {
        let rule_type = self.rule_type.and_then(|v| RULE_TYPE.name_of(v));
        match rule_type {
            Some("BINDPARAMETER") => match self.property.and_then(|v| PROPERTY.name_of(v)) {
                Some("VISIBLE") => SHOWS_FIELD.to_string(),
                Some("ENABLED") => ENABLES_FIELD.to_string(),
                Some("REQUIRED") => REQUIRES_FIELD.to_string(),
                Some("READONLY") => READ_ONLY_FIELD.to_string(),
                _ => UNKNOWN_PLACEHOLDER.to_string(),
            },
            Some("FILTRATION") => self
                .filtration_operand()
                .map(|operand| {
                    format!(
                        "{}.{} === {}",
                        parent_attribute,
                        self.base_attribute_patch.as_deref().unwrap_or(UNKNOWN_PLACEHOLDER),
                        operand
                    )
                })
                .unwrap_or_else(|| UNKNOWN_PLACEHOLDER.to_string()),
            _ => UNKNOWN_PLACEHOLDER.to_string(),
        }
    }

    fn filtration_operand(&self) -> Option<String> {
        match self.value_type.and_then(|v| VALUE_TYPE.name_of(v)) {
            Some("CONSTANT") => self.value.clone(),
            Some("ATTRIBUTE") => {
                let attribute = self.attribute.as_deref()?;
                Some(match self.attribute_path.as_deref() {
                    Some(path) if !path.is_empty() => format!("{}.{}", attribute, path),
                    _ => attribute.to_string(),
                })
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessRuleItem {
    pub spec: BusinessRuleSpec,
    pub description: String,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessRuleGroup {
    /// Target attribute name
    pub attribute: String,
    pub rules: Vec<BusinessRuleItem>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessRuleRoot {
    pub groups: Vec<BusinessRuleGroup>,
    pub location: SourceLocation,
}

pub fn extract_business_rules(tree: Option<&SyntaxTree>) -> Option<BusinessRuleRoot> {
    let (tree, property, pairs) = located_object(tree, "businessRules")?;

    let groups = pairs
        .iter()
        .filter_map(|group_pair| {
            let attribute = tree.property_name(group_pair)?;
            let rules_object = tree.unwrap_parens(group_pair.child_by_field_name("value")?);

            let rules = tree
                .object_pairs(&rules_object)
                .iter()
                .filter_map(|rule_pair| {
                    let rule = tree.unwrap_parens(rule_pair.child_by_field_name("value")?);
                    let spec = BusinessRuleSpec::from_node(tree, &rule)?;
                    Some(BusinessRuleItem {
                        description: spec.describe(&attribute),
                        spec,
                        location: tree.location(rule_pair),
                    })
                })
                .collect();

            Some(BusinessRuleGroup {
                attribute,
                rules,
                location: tree.location(group_pair),
            })
        })
        .collect();

    Some(BusinessRuleRoot {
        groups,
        location: property.location,
    })
}

impl SchemaNode for BusinessRuleItem {
    fn name(&self) -> String {
        self.description.clone()
    }

    fn location(&self) -> Option<SourceLocation> {
        Some(self.location)
    }

    fn tooltip(&self) -> Option<String> {
        Some(self.spec.uid.clone())
    }
}

impl SchemaNode for BusinessRuleGroup {
    fn name(&self) -> String {
        self.attribute.clone()
    }

    fn location(&self) -> Option<SourceLocation> {
        Some(self.location)
    }

    fn has_children(&self) -> bool {
        !self.rules.is_empty()
    }

    fn children(&self) -> Vec<Box<dyn SchemaNode>> {
        self.rules
            .iter()
            .map(|rule| Box::new(rule.clone()) as Box<dyn SchemaNode>)
            .collect()
    }
}

impl SchemaNode for BusinessRuleRoot {
    fn name(&self) -> String {
        "Business rules".to_string()
    }

    fn location(&self) -> Option<SourceLocation> {
        Some(self.location)
    }

    fn has_children(&self) -> bool {
        !self.groups.is_empty()
    }

    fn children(&self) -> Vec<Box<dyn SchemaNode>> {
        self.groups
            .iter()
            .map(|group| Box::new(group.clone()) as Box<dyn SchemaNode>)
            .collect()
    }
}
