//! Property locator
//!
//! Finds the `define(name, [deps], function(...) { return { ... }; })` factory
//! call and the members of the schema object it returns.
//!
//! When a file holds several factory calls, the first matching property in
//! pre-order wins. That is a traversal-order rule, not a disambiguation.

use serde::Serialize;
use tree_sitter::Node;

use crate::extractors::base::{SourceLocation, SyntaxTree};

/// Identifier of the module factory
pub const FACTORY_FUNCTION: &str = "define";

/// A string or identifier with its location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedLiteral {
    pub name: String,
    pub location: SourceLocation,
}

/// Owned summary of the factory call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactoryCallInfo {
    pub module_name: Option<String>,
    /// String elements of the dependency array, in order
    pub dependencies: Vec<NamedLiteral>,
    /// Identifier parameters of the callback, in order (patterns are dropped)
    pub parameters: Vec<NamedLiteral>,
    pub location: SourceLocation,
}

impl FactoryCallInfo {
    /// Dependencies and parameters zipped positionally; the shorter side is padded with `None`
    pub fn pairs(&self) -> Vec<(Option<&NamedLiteral>, Option<&NamedLiteral>)> {
        let len = self.dependencies.len().max(self.parameters.len());
        (0..len)
            .map(|i| (self.dependencies.get(i), self.parameters.get(i)))
            .collect()
    }
}

/// A member of the returned schema object
#[derive(Debug, Clone, Copy)]
pub struct LocatedProperty<'t> {
    pub pair: Node<'t>,
    pub value: Node<'t>,
    pub location: SourceLocation,
}

/// Find the first `define` call with three arguments whose third argument is a function
pub fn locate_factory_call(tree: Option<&SyntaxTree>) -> Option<FactoryCallInfo> {
    let tree = tree?;
    let call = tree.find_first(|node| is_factory_call(tree, &node))?;
    let args = factory_arguments(tree, &call)?;

    let module_name = tree.string_value(&args[0]);

    let dependencies = if args[1].kind() == "array" {
        tree.named_children_of(&args[1])
            .into_iter()
            .filter_map(|element| {
                tree.string_value(&element).map(|name| NamedLiteral {
                    name,
                    location: tree.location(&element),
                })
            })
            .collect()
    } else {
        Vec::new()
    };

    let parameters = callback_parameters(tree, &args[2])
        .into_iter()
        .map(|param| NamedLiteral {
            name: tree.get_node_text(&param).to_string(),
            location: tree.location(&param),
        })
        .collect();

    Some(FactoryCallInfo {
        module_name,
        dependencies,
        parameters,
        location: tree.location(&call),
    })
}

/// Find the first member named `property_name` of an object returned at the top
/// of a factory callback body
pub fn locate_top_level_property<'t>(
    tree: Option<&'t SyntaxTree>,
    property_name: &str,
) -> Option<LocatedProperty<'t>> {
    let tree = tree?;
    let pair = tree.find_first(|node| {
        node.kind() == "pair"
            && tree.property_name(&node).as_deref() == Some(property_name)
            && node
                .parent()
                .is_some_and(|object| is_schema_object(tree, &object))
    })?;

    let value = tree.unwrap_parens(pair.child_by_field_name("value")?);
    Some(LocatedProperty {
        pair,
        value,
        location: tree.location(&pair),
    })
}

/// The object literal returned by the factory callback, if any
pub fn locate_schema_object(tree: Option<&SyntaxTree>) -> Option<Node<'_>> {
    let tree = tree?;
    tree.find_first(|node| is_schema_object(tree, &node))
}

fn is_factory_call(tree: &SyntaxTree, node: &Node) -> bool {
    node.kind() == "call_expression" && factory_arguments(tree, node).is_some()
}

/// The three arguments of a factory call, `None` when `call` has another shape
fn factory_arguments<'t>(tree: &SyntaxTree, call: &Node<'t>) -> Option<Vec<Node<'t>>> {
    let function = call.child_by_field_name("function")?;
    if function.kind() != "identifier" || tree.get_node_text(&function) != FACTORY_FUNCTION {
        return None;
    }
    let arguments = call.child_by_field_name("arguments")?;
    let args = tree.named_children_of(&arguments);
    if args.len() != 3 || !tree.is_function_literal(&args[2]) {
        return None;
    }
    Some(args)
}

fn callback_parameters<'t>(tree: &SyntaxTree, callback: &Node<'t>) -> Vec<Node<'t>> {
    // Arrow functions with a single bare parameter have no parameter list
    if let Some(single) = callback.child_by_field_name("parameter") {
        return if single.kind() == "identifier" {
            vec![single]
        } else {
            Vec::new()
        };
    }
    callback
        .child_by_field_name("parameters")
        .map(|params| {
            tree.named_children_of(&params)
                .into_iter()
                .filter(|param| param.kind() == "identifier")
                .collect()
        })
        .unwrap_or_default()
}

/// `object` is `return { ... }` directly inside a factory callback body
fn is_schema_object(tree: &SyntaxTree, object: &Node) -> bool {
    if object.kind() != "object" {
        return false;
    }

    let mut parent = object.parent();
    while let Some(p) = parent {
        if p.kind() != "parenthesized_expression" {
            break;
        }
        parent = p.parent();
    }

    let Some(statement) = parent.filter(|p| p.kind() == "return_statement") else {
        return false;
    };
    let Some(body) = statement.parent().filter(|p| p.kind() == "statement_block") else {
        return false;
    };
    let Some(callback) = body.parent().filter(|p| tree.is_function_literal(p)) else {
        return false;
    };
    let Some(call) = callback
        .parent()
        .filter(|p| p.kind() == "arguments")
        .and_then(|args| args.parent())
    else {
        return false;
    };

    factory_arguments(tree, &call)
        .map(|args| args[2].id() == callback.id())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::create_parser;

    fn parse(source: &str) -> SyntaxTree {
        let mut parser = create_parser().unwrap();
        SyntaxTree::parse(&mut parser, source).unwrap()
    }

    #[test]
    fn test_factory_call_zips_dependencies_and_parameters() {
        let tree = parse(
            r#"define("Page", ["A", "B", "C"], function(a, { b }, c) { return {}; });"#,
        );
        let info = locate_factory_call(Some(&tree)).unwrap();

        assert_eq!(info.module_name.as_deref(), Some("Page"));
        let deps: Vec<&str> = info.dependencies.iter().map(|d| d.name.as_str()).collect();
        let params: Vec<&str> = info.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(deps, vec!["A", "B", "C"]);
        // destructuring parameter dropped
        assert_eq!(params, vec!["a", "c"]);

        let pairs = info.pairs();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[2].0.unwrap().name, "C");
        assert!(pairs[2].1.is_none());
    }

    #[test]
    fn test_more_parameters_than_dependencies() {
        let tree = parse(r#"define("Page", ["A"], function(a, b) { return {}; });"#);
        let info = locate_factory_call(Some(&tree)).unwrap();
        let pairs = info.pairs();
        assert_eq!(pairs.len(), 2);
        assert!(pairs[1].0.is_none());
        assert_eq!(pairs[1].1.unwrap().name, "b");
    }

    #[test]
    fn test_wrong_shape_is_not_a_factory_call() {
        let tree = parse(r#"define("Page", ["A"]); define("Page", ["A"], "x");"#);
        assert!(locate_factory_call(Some(&tree)).is_none());
        assert!(locate_factory_call(None).is_none());
    }

    #[test]
    fn test_locate_top_level_property() {
        let tree = parse(
            r#"define("Page", [], function() {
                return {
                    methods: {
                        init: function() { return { mixins: 1 }; }
                    },
                    "mixins": { A: "B" }
                };
            });"#,
        );
        let mixins = locate_top_level_property(Some(&tree), "mixins").unwrap();
        assert_eq!(mixins.value.kind(), "object");
        assert_eq!(mixins.location.start.line, 6);
        assert!(locate_top_level_property(Some(&tree), "diff").is_none());
    }

    #[test]
    fn test_return_outside_factory_is_ignored() {
        let tree = parse(r#"function f() { return { mixins: {} }; }"#);
        assert!(locate_top_level_property(Some(&tree), "mixins").is_none());
        assert!(locate_schema_object(Some(&tree)).is_none());
    }
}
