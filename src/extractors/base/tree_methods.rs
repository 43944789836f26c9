// Tree navigation methods for SyntaxTree
//
// Shape helpers for the small subset of JavaScript that schema sources use:
// object literals, string and number literals, member access chains.

use tree_sitter::Node;

use super::syntax_tree::SyntaxTree;

/// Node kinds accepted as the factory callback
pub const FUNCTION_KINDS: &[&str] = &["function_expression", "function", "arrow_function"];

impl SyntaxTree {
    /// Named children without interleaved comments
    pub fn named_children_of<'t>(&self, node: &Node<'t>) -> Vec<Node<'t>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .collect()
    }

    /// Skip `( ... )` wrappers around an expression
    pub fn unwrap_parens<'t>(&self, node: Node<'t>) -> Node<'t> {
        let mut current = node;
        while current.kind() == "parenthesized_expression" {
            match self.named_children_of(&current).into_iter().next() {
                Some(inner) => current = inner,
                None => break,
            }
        }
        current
    }

    /// Key of a `pair` when it is an identifier or a string literal
    ///
    /// Computed keys (`[expr]: ...`) and numeric keys have no static name.
    pub fn property_name(&self, pair: &Node) -> Option<String> {
        if pair.kind() != "pair" {
            return None;
        }
        let key = pair.child_by_field_name("key")?;
        match key.kind() {
            "property_identifier" | "identifier" => Some(self.get_node_text(&key).to_string()),
            "string" => self.string_value(&key),
            _ => None,
        }
    }

    /// Content of a string literal, quotes stripped
    pub fn string_value(&self, node: &Node) -> Option<String> {
        if node.kind() != "string" {
            return None;
        }
        let text = self.get_node_text(node);
        if text.len() < 2 {
            return None;
        }
        Some(text[1..text.len() - 1].to_string())
    }

    /// A plain numeric literal (no sign, no expression)
    pub fn number_value(&self, node: &Node) -> Option<f64> {
        if node.kind() != "number" {
            return None;
        }
        parse_js_number(self.get_node_text(node))
    }

    /// A numeric literal, optionally negated (`-1`)
    pub fn signed_number_value(&self, node: &Node) -> Option<f64> {
        if node.kind() == "unary_expression" {
            let operator = node.child_by_field_name("operator")?;
            let argument = node.child_by_field_name("argument")?;
            let value = self.number_value(&argument)?;
            return match self.get_node_text(&operator) {
                "-" => Some(-value),
                "+" => Some(value),
                _ => None,
            };
        }
        self.number_value(node)
    }

    /// Statically named `key: value` members of an object literal
    ///
    /// Spreads, method shorthand, shorthand properties and computed keys are skipped.
    pub fn object_pairs<'t>(&self, object: &Node<'t>) -> Vec<Node<'t>> {
        if object.kind() != "object" {
            return Vec::new();
        }
        self.named_children_of(object)
            .into_iter()
            .filter(|child| child.kind() == "pair" && self.property_name(child).is_some())
            .filter(|child| child.child_by_field_name("value").is_some())
            .collect()
    }

    /// Value of the first member named `name`
    pub fn object_property<'t>(&self, object: &Node<'t>, name: &str) -> Option<Node<'t>> {
        self.object_pairs(object)
            .into_iter()
            .find(|pair| self.property_name(pair).as_deref() == Some(name))
            .and_then(|pair| pair.child_by_field_name("value"))
            .map(|value| self.unwrap_parens(value))
    }

    /// String value of member `name`
    pub fn object_string(&self, object: &Node, name: &str) -> Option<String> {
        self.object_property(object, name)
            .and_then(|value| self.string_value(&value))
    }

    /// Numeric value of member `name` (sign allowed)
    pub fn object_number(&self, object: &Node, name: &str) -> Option<f64> {
        self.object_property(object, name)
            .and_then(|value| self.signed_number_value(&value))
    }

    /// Segments of a dotted access (`a.b.c` -> `["a", "b", "c"]`)
    pub fn member_path(&self, node: &Node) -> Option<Vec<String>> {
        match node.kind() {
            "identifier" | "property_identifier" | "this" => {
                Some(vec![self.get_node_text(node).to_string()])
            }
            "member_expression" => {
                let object = node.child_by_field_name("object")?;
                let property = node.child_by_field_name("property")?;
                if property.kind() != "property_identifier" {
                    return None;
                }
                let mut path = self.member_path(&object)?;
                path.push(self.get_node_text(&property).to_string());
                Some(path)
            }
            _ => None,
        }
    }

    /// Whether `node` is a function literal usable as a factory callback
    pub fn is_function_literal(&self, node: &Node) -> bool {
        FUNCTION_KINDS.contains(&node.kind())
    }
}

/// Parse a JavaScript numeric literal (decimal, hex, octal, binary, separators)
pub fn parse_js_number(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();
    let radix_value = |digits: &str, radix: u32| i64::from_str_radix(digits, radix).ok().map(|v| v as f64);

    if let Some(digits) = lower.strip_prefix("0x") {
        return radix_value(digits, 16);
    }
    if let Some(digits) = lower.strip_prefix("0o") {
        return radix_value(digits, 8);
    }
    if let Some(digits) = lower.strip_prefix("0b") {
        return radix_value(digits, 2);
    }
    lower.trim_end_matches('n').parse::<f64>().ok()
}

/// Integral value of a parsed number, if it has no fractional part
pub fn as_integer(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 {
        Some(value as i64)
    } else {
        None
    }
}
